use oralscan_core::models::bucket::Bucket;
use oralscan_core::models::confidence::Confidence;
use oralscan_suggest::error::EnrichmentError;
use oralscan_suggest::fallback::fallback_suggestions;
use oralscan_suggest::parse::extract_suggestions;
use oralscan_suggest::prompt::build_prompt;

const FOUR: &str = r#"[
  {"title": "Daily Care", "description": "Brush twice daily with fluoride toothpaste"},
  {"title": "Regular Checkups", "description": "Visit your dentist every 6 months"},
  {"title": "Limit Sugar", "description": "Cut back on sugary snacks"},
  {"title": "Hydrate", "description": "Drink water throughout the day"}
]"#;

#[test]
fn parses_bare_array() {
    let items = extract_suggestions(FOUR).unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].title, "Daily Care");
    assert_eq!(items[3].description, "Drink water throughout the day");
}

#[test]
fn parses_array_inside_prose_and_fences() {
    let text = format!("Here are your suggestions [see below]:\n```json\n{FOUR}\n```\nStay healthy!");
    let items = extract_suggestions(&text).unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[1].title, "Regular Checkups");
}

#[test]
fn truncates_to_four() {
    let text = r#"[
      {"title": "A", "description": "a"},
      {"title": "B", "description": "b"},
      {"title": "C", "description": "c"},
      {"title": "D", "description": "d"},
      {"title": "E", "description": "e"}
    ]"#;
    let items = extract_suggestions(text).unwrap();
    let titles: Vec<_> = items.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C", "D"]);
}

#[test]
fn fewer_than_four_is_schema_violation() {
    let text = r#"[{"title": "A", "description": "a"}, {"title": "B", "description": "  "}]"#;
    let err = extract_suggestions(text).unwrap_err();
    assert!(matches!(err, EnrichmentError::SchemaViolation(_)));
}

#[test]
fn no_array_is_parse_error() {
    let err = extract_suggestions("I cannot help with that.").unwrap_err();
    assert!(matches!(err, EnrichmentError::ResponseParse(_)));
}

#[test]
fn fallback_sets_have_four_items_per_bucket() {
    for bucket in [Bucket::Healthy, Bucket::Malignant, Bucket::Benign] {
        let items = fallback_suggestions(bucket);
        assert_eq!(items.len(), 4, "{bucket:?}");
        assert!(items.iter().all(|s| s.is_usable()));
        assert_eq!(items, fallback_suggestions(bucket));
    }
}

#[test]
fn fallback_sets_differ_by_bucket() {
    assert_eq!(fallback_suggestions(Bucket::Healthy)[0].title, "Maintain Routine");
    assert_eq!(fallback_suggestions(Bucket::Malignant)[0].title, "Seek Specialist");
    assert_eq!(
        fallback_suggestions(Bucket::Benign)[0].title,
        "Professional Evaluation"
    );
}

#[test]
fn prompt_names_finding_and_confidence() {
    let prompt = build_prompt(Bucket::Malignant, Confidence::from_raw(Some(88.04)));
    assert!(prompt.contains("\"potentially malignant lesion detected\""));
    assert!(prompt.contains("with 88.0% confidence"));
    assert!(prompt.contains("\"title\" and \"description\""));
}
