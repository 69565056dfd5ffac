use oralscan_core::models::bucket::Bucket;
use oralscan_core::models::confidence::Confidence;

/// Build the single generation prompt for a result.
///
/// Keyed only on the bucket and the level 1 confidence, so two results with
/// the same inputs produce the same request.
pub fn build_prompt(bucket: Bucket, confidence: Confidence) -> String {
    format!(
        "You are a dental health advisor AI. Based on an oral lesion analysis result showing \
\"{finding}\" with {confidence}% confidence, provide exactly 4 personalized oral health suggestions.

Format your response as a JSON array of exactly 4 objects, each with \"title\" and \"description\" keys. \
Keep descriptions under 60 characters.

Example format:
[
    {{\"title\": \"Daily Care\", \"description\": \"Brush twice daily with fluoride toothpaste\"}},
    {{\"title\": \"Regular Checkups\", \"description\": \"Visit your dentist every 6 months\"}}
]

Provide practical, actionable advice specific to the analysis result.",
        finding = bucket.finding(),
    )
}
