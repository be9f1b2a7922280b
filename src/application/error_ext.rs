//! Error conversion helpers for process I/O
//!
//! Provides extension traits for cleaner error handling with invocation context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add the failing action and its command line to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// runner.run(&line).with_command_context("run", &line)?;
    /// ```
    fn with_command_context(self, action: &str, command_line: &str) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_command_context(self, action: &str, command_line: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, command_line),
            source: Box::new(e),
        })
    }
}
