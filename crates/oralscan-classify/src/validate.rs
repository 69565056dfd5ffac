use mime::Mime;

use crate::error::ClassificationError;

/// Check an upload before any network round trip: the MIME type must parse
/// as a concrete `image/*` type and the payload must not be empty.
///
/// Returns the parsed type so the upload sends exactly what was checked.
pub fn validate_image(bytes: &[u8], mime_type: &str) -> Result<Mime, ClassificationError> {
    let rejected = || {
        ClassificationError::InvalidInput(format!(
            "Please select an image file (JPG, PNG, WEBP); got \"{mime_type}\"."
        ))
    };

    let mime: Mime = mime_type
        .trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| rejected())?;
    let subtype = mime.subtype();
    if mime.type_() != mime::IMAGE || subtype.as_str().is_empty() || subtype == mime::STAR {
        return Err(rejected());
    }

    if bytes.is_empty() {
        return Err(ClassificationError::InvalidInput(
            "The selected image file is empty.".to_string(),
        ));
    }

    Ok(mime)
}

/// Upload filename derived from the MIME subtype, e.g. `image/png` → `upload.png`.
pub fn upload_filename(mime_type: &str) -> String {
    let subtype = mime_type
        .trim()
        .split_once('/')
        .map(|(_, sub)| sub)
        .unwrap_or("bin");
    // Drop parameters and structured-syntax suffixes: `svg+xml; q=1` → `svg`.
    let ext = subtype
        .split([';', '+'])
        .next()
        .unwrap_or("bin")
        .trim();
    let ext = match ext {
        "jpeg" => "jpg",
        "" => "bin",
        other => other,
    };
    format!("upload.{ext}")
}
