//! AI provider module
//!
//! Model runners backed by concrete inference servers

pub mod openai;

pub use openai::OpenAICompatRunner;
