//! Command dispatcher for the p4 script protocol
//!
//! Any subcommand name is accepted: the dispatcher composes `p4 -s <command>
//! <quoted args>`, runs it at most once per client (see [`ResultCache`]),
//! and returns the lines of the requested channel with their tag stripped.
//!
//! Tool-level failures are not interpreted here. They show up as lines on
//! [`Channel::Error`], which stay cached and can be asked for later.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, ResultCache};
use crate::config::P4Config;
use crate::domain::{split_channel_suffix, Channel, Invocation};
use crate::infrastructure::traits::{CommandRunner, ShellCommandRunner};
use crate::infrastructure::InfraError;

/// Exit status of `sh -c` when the command itself cannot be found.
const SHELL_COMMAND_NOT_FOUND: i32 = 127;

/// Client owning one result cache and one resolved configuration.
///
/// Methods take `&mut self`: a client serves one caller at a time. Use one
/// client per thread of control, and a fresh client to bypass cached output.
pub struct P4Client {
    runner: Arc<dyn CommandRunner>,
    cache: ResultCache,
    config: Option<P4Config>,
}

impl Default for P4Client {
    fn default() -> Self {
        Self::new()
    }
}

impl P4Client {
    /// Client running `p4` through the shell, configured from the process
    /// environment on first use.
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ShellCommandRunner))
    }

    /// Client with a custom runner (for testing).
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            cache: ResultCache::new(),
            config: None,
        }
    }

    /// Use an already resolved configuration instead of the process environment.
    pub fn with_config(mut self, config: P4Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Resolved configuration, loaded once and then memoized.
    pub fn config(&mut self) -> ApplicationResult<&P4Config> {
        let config = match self.config.take() {
            Some(config) => config,
            None => P4Config::from_process_env()?,
        };
        Ok(&*self.config.insert(config))
    }

    /// Configured value for `key`.
    pub fn resolve(&mut self, key: &str) -> ApplicationResult<Option<String>> {
        Ok(self.config()?.get(key).map(str::to_string))
    }

    /// Active client workspace (`P4CLIENT`).
    pub fn client_name(&mut self) -> ApplicationResult<Option<String>> {
        Ok(self.config()?.client_name().map(str::to_string))
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Run `command` and collect the lines on `channel`.
    pub fn invoke<I, S>(
        &mut self,
        command: &str,
        channel: Channel,
        args: I,
    ) -> ApplicationResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected = Vec::new();
        self.invoke_each(command, channel, args, |line| collected.push(line.to_string()))?;
        Ok(collected)
    }

    /// Run `command` and hand each line on `channel` to `on_line`, in output order.
    #[instrument(level = "debug", skip(self, args, on_line))]
    pub fn invoke_each<I, S, F>(
        &mut self,
        command: &str,
        channel: Channel,
        args: I,
        mut on_line: F,
    ) -> ApplicationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&str),
    {
        let invocation = Invocation::new(command, args)?;
        let lines = self.raw_output(&invocation)?;
        let mut emitted = 0usize;
        for text in lines.iter().filter_map(|line| channel.select(line)) {
            on_line(text);
            emitted += 1;
        }
        debug!("{} of {} lines on {}", emitted, lines.len(), channel);
        Ok(())
    }

    /// Like [`invoke`](Self::invoke), with the channel encoded in the name
    /// (`info_EXIT`, `describe_TEXT`). Plain names use [`Channel::All`].
    pub fn invoke_named<I, S>(&mut self, name: &str, args: I) -> ApplicationResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (command, channel) = split_channel_suffix(name)?;
        self.invoke(command, channel, args)
    }

    /// Callback form of [`invoke_named`](Self::invoke_named).
    pub fn invoke_named_each<I, S, F>(
        &mut self,
        name: &str,
        args: I,
        on_line: F,
    ) -> ApplicationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&str),
    {
        let (command, channel) = split_channel_suffix(name)?;
        self.invoke_each(command, channel, args, on_line)
    }

    /// Every raw line of an invocation, running it only if not cached yet.
    pub fn raw_output(&mut self, invocation: &Invocation) -> ApplicationResult<&[String]> {
        let command_line = invocation.command_line();
        let runner = &self.runner;
        self.cache
            .get_or_compute(&command_line, || execute(runner.as_ref(), &command_line))
    }
}

fn execute(runner: &dyn CommandRunner, command_line: &str) -> ApplicationResult<Vec<String>> {
    let output = runner
        .run(command_line)
        .with_command_context("spawn", command_line)?;

    let untagged = output
        .lines
        .iter()
        .all(|line| Channel::classify(line).is_none());
    if output.exit_code == Some(SHELL_COMMAND_NOT_FOUND) && untagged {
        let message = output.lines.join("; ");
        return Err(ApplicationError::OperationFailed {
            context: format!("run {}: {}", command_line, message),
            source: Box::new(InfraError::Tool {
                message,
                exit_code: output.exit_code,
            }),
        });
    }

    debug!(
        "{} exited with {:?}, {} lines",
        command_line,
        output.exit_code,
        output.lines.len()
    );
    Ok(output.lines)
}
