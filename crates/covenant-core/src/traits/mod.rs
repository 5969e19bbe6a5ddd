//! Core traits for covenant collaborators.

mod llm;
mod parser;
mod store;

pub use llm::*;
pub use parser::*;
pub use store::*;
