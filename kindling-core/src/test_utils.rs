//! Minimal [`Executable`] implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These prove the trait API
//! is usable and give downstream crates shared fakes for ordering and
//! failure-path tests.

use crate::error::ExecError;
use crate::executable::Executable;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// An executable that completes immediately and does nothing.
#[derive(Debug, Default)]
pub struct NoopExecutable;

#[async_trait]
impl Executable for NoopExecutable {
    async fn execute(&self, _args: &[String]) -> Result<(), ExecError> {
        Ok(())
    }
}

/// An executable that appends its label to a shared log when executed.
///
/// The log makes execution order observable in tests.
#[derive(Debug)]
pub struct RecordingExecutable {
    label: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingExecutable {
    /// Create a recording executable writing to the given shared log.
    pub fn new(label: impl Into<String>, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }
}

#[async_trait]
impl Executable for RecordingExecutable {
    async fn execute(&self, _args: &[String]) -> Result<(), ExecError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(self.label.clone());
        Ok(())
    }
}

/// An executable that always fails with the given message.
#[derive(Debug)]
pub struct FailingExecutable {
    message: String,
}

impl FailingExecutable {
    /// Create a failing executable with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Executable for FailingExecutable {
    async fn execute(&self, _args: &[String]) -> Result<(), ExecError> {
        Err(ExecError::Failed(self.message.clone()))
    }
}
