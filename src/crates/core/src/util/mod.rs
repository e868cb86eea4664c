//! Utility layer - errors and shared helpers

pub mod errors;
