//! AI Response Validation
//!
//! Structural checks for model output that must be machine-readable.
//! Fail on structural errors, repair only cosmetic formatting issues.

mod json_repair;

pub use json_repair::{JsonRepairer, extract_json_from_response};
