use oralscan_classify::error::ClassificationErrorKind;
use oralscan_classify::validate::{upload_filename, validate_image};

#[test]
fn image_types_are_accepted() {
    for mime in ["image/png", "image/jpeg", "IMAGE/WEBP", " image/gif "] {
        assert!(validate_image(b"x", mime).is_ok(), "{mime} should be accepted");
    }
}

#[test]
fn non_image_types_are_rejected() {
    for mime in [
        "text/plain",
        "application/pdf",
        "image/",
        "",
        "imagery/png",
        "image/ png",
        "image/*",
        "image/png png",
    ] {
        let err = validate_image(b"x", mime).unwrap_err();
        assert_eq!(err.kind(), ClassificationErrorKind::InvalidInput, "{mime}");
    }
}

#[test]
fn parsed_type_is_normalized() {
    let mime = validate_image(b"x", " IMAGE/WebP ").unwrap();
    assert_eq!(mime.essence_str(), "image/webp");
}

#[test]
fn empty_payload_is_rejected() {
    let err = validate_image(b"", "image/png").unwrap_err();
    assert_eq!(err.kind(), ClassificationErrorKind::InvalidInput);
}

#[test]
fn upload_filename_follows_subtype() {
    assert_eq!(upload_filename("image/png"), "upload.png");
    assert_eq!(upload_filename("image/jpeg"), "upload.jpg");
    assert_eq!(upload_filename("image/svg+xml"), "upload.svg");
    assert_eq!(upload_filename("image/webp; q=1"), "upload.webp");
}
