//! oralscan-suggest
//!
//! Health-suggestion enrichment: prompt construction, generative backends
//! (Gemini REST, Bedrock Converse), response parsing, deterministic
//! fallback sets, and the per-result cache.

pub mod bedrock;
pub mod enricher;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod generator;
pub mod parse;
pub mod prompt;
