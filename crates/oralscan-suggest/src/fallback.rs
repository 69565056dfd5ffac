use oralscan_core::models::bucket::Bucket;
use oralscan_core::models::suggestion::Suggestion;

const HEALTHY: [(&str, &str); 4] = [
    ("Maintain Routine", "Continue your current oral hygiene practices"),
    ("Regular Checkups", "Visit your dentist every 6 months"),
    ("Healthy Diet", "Limit sugary foods and acidic beverages"),
    ("Stay Hydrated", "Drink plenty of water throughout the day"),
];

const MALIGNANT: [(&str, &str); 4] = [
    ("Seek Specialist", "Consult an oral surgeon immediately"),
    ("Document Changes", "Track any changes in the lesion"),
    ("Avoid Irritants", "Stop smoking and limit alcohol"),
    ("Follow Up", "Schedule regular monitoring appointments"),
];

const BENIGN: [(&str, &str); 4] = [
    ("Professional Evaluation", "Get examined by a dental professional"),
    ("Monitor Changes", "Watch for size or color changes"),
    ("Gentle Care", "Use a soft toothbrush in the area"),
    ("Stay Informed", "Learn about benign oral conditions"),
];

/// The fixed suggestion set for a bucket. A pure function of the bucket.
pub fn fallback_suggestions(bucket: Bucket) -> Vec<Suggestion> {
    let set = match bucket {
        Bucket::Healthy => &HEALTHY,
        Bucket::Malignant => &MALIGNANT,
        Bucket::Benign => &BENIGN,
    };
    set.iter()
        .map(|(title, description)| Suggestion::new(*title, *description))
        .collect()
}
