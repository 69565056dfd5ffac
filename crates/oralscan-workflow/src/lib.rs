//! oralscan-workflow
//!
//! The diagnostic-workflow state machine: image selection, classification,
//! background suggestion enrichment, and on-demand report synthesis.

pub mod error;
pub mod orchestrator;
pub mod state;
