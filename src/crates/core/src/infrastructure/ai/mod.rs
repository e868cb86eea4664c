//! AI infrastructure
//!
//! `ModelRunner` is the seam the chat processor talks to; providers implement it.

pub mod providers;
pub mod runner;

pub use providers::OpenAICompatRunner;
pub use runner::{BoundRunner, ModelRunner};
