//! oralscan-classify
//!
//! Client for the remote two-stage lesion classifier. Validates input
//! locally, sends one multipart request, and normalizes the response (or the
//! failure) into a `ResultModel` or a typed `ClassificationError`.

pub mod classifier;
pub mod client;
pub mod error;
pub mod validate;
mod wire;
