//! Core types for covenant.

mod document;
mod message;
mod record;
mod risk;

pub use document::*;
pub use message::*;
pub use record::*;
pub use risk::*;
