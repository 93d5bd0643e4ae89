//! Test support: backend doubles used by unit and integration tests.

pub mod mock;

pub use mock::{Op, RecordingToolkit};
