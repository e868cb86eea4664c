//! Chat-with-tools request assembly

pub mod processor;

pub use processor::ChatWithToolsProcessor;
