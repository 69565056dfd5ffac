//! oralscan-export
//!
//! Report synthesis: a fixed-layout block document built from a result and
//! its suggestions, rendered to DOCX and to a Markdown preview.

pub mod artifact;
pub mod docx;
pub mod error;
pub mod render;
pub mod report;
pub mod styles;
pub mod summary;
