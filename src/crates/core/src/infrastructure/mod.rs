//! Infrastructure layer - model runner seam and AI provider clients

pub mod ai;

pub use ai::{BoundRunner, ModelRunner, OpenAICompatRunner};
