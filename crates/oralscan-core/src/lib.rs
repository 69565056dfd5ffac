//! oralscan-core
//!
//! Pure domain types for the OralScan workflow: the two-level classification
//! result, suggestions, patient context, and the narrative bucket shared by
//! enrichment and reporting. No network or I/O dependency.

pub mod error;
pub mod models;
