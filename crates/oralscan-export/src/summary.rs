use oralscan_core::models::bucket::Bucket;

pub const DISCLAIMER: &str = "This AI analysis is for educational and informational purposes only. \
It should not be used as a substitute for professional medical diagnosis, advice, or treatment. \
Always consult with a qualified healthcare provider for proper evaluation of any oral health concerns.";

/// Clinical summary prose for a bucket.
pub fn clinical_summary(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Healthy => {
            "The AI analysis indicates that the oral tissue appears healthy with no signs of \
concerning lesions. Regular dental check-ups are recommended to maintain oral health."
        }
        Bucket::Malignant => {
            "The AI analysis has detected characteristics that may indicate a potentially \
malignant lesion. Immediate consultation with an oral surgeon or oncologist is strongly \
recommended for further evaluation and biopsy."
        }
        Bucket::Benign => {
            "The AI analysis has detected a lesion that appears to be benign (non-cancerous). \
While likely not serious, professional evaluation by a dental specialist is recommended for \
confirmation and proper care guidance."
        }
    }
}
