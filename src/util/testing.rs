//! Test support: logging setup and a scripted command runner

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, Once, PoisonError};

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{CapturedOutput, CommandRunner};

static TEST_SETUP: Once = Once::new();

/// Install the global test subscriber once; honours `RUST_LOG`, defaults to debug.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Command runner double: replays canned output per command line and
/// records every command line it was asked to run.
///
/// Unknown command lines produce no output and exit status 0.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CapturedOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command_line` with `lines` and exit status 0.
    pub fn respond<I, S>(self, command_line: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.respond_with(command_line, CapturedOutput::new(lines, 0))
    }

    /// Answer `command_line` with a complete captured output.
    pub fn respond_with(mut self, command_line: &str, output: CapturedOutput) -> Self {
        self.responses.insert(command_line.to_string(), output);
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command_line: &str) -> io::Result<CapturedOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command_line.to_string());
        Ok(self
            .responses
            .get(command_line)
            .cloned()
            .unwrap_or_else(|| CapturedOutput::new(Vec::<String>::new(), 0)))
    }
}
