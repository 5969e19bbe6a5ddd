//! Contract risk assessment.

mod aggregate;
mod engine;
pub mod prompts;

pub use aggregate::{overall_level, summarize};
pub use engine::{validate_risks, RiskAssessmentEngine};
