//! Digits-in-noise hearing test engine.
//!
//! A test runs ten rounds. Each round plays three spoken digits over
//! background noise, the subject types what they heard, and a one-up
//! one-down staircase moves the noise level. The finished result is uploaded
//! to a remote collector and kept in a local session history.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AudioError, EngineError, GeneratorError, NetworkError, StorageError};
pub use models::{TestResult, TestSession, TestState, TestSummary};
pub use services::hearing_test::{HearingTest, TestSettings};
