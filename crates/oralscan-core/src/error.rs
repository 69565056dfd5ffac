use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("result invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid patient context: {0}")]
    InvalidPatientContext(String),
}
