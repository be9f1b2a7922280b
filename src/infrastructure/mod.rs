//! Infrastructure layer: process execution
//!
//! This layer implements the I/O boundary traits used by the dispatcher.

pub mod error;
pub mod traits;

pub use error::InfraError;
pub use traits::{CapturedOutput, CommandRunner, ShellCommandRunner};
