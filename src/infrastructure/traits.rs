//! I/O boundary traits for testability
//!
//! The dispatcher never spawns processes itself; it hands composed command
//! lines to a `CommandRunner`, which tests replace with a recording double.

use std::borrow::Cow;
use std::io;
use std::process::{Command, Stdio};

use tracing::{debug, trace, warn};

/// Everything a finished command printed, split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output lines in order, followed by standard error lines.
    pub lines: Vec<String>,
    /// Exit code, `None` when terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn new<I, S>(lines: I, exit_code: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit_code: Some(exit_code),
        }
    }
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a shell command line to completion and capture its output.
    ///
    /// Blocks until the process exits; there is no timeout. Output is text:
    /// bytes that are not valid UTF-8 (e.g. in depot paths) come back as
    /// U+FFFD, and that altered text is what gets cached.
    fn run(&self, command_line: &str) -> io::Result<CapturedOutput>;
}

// ============================================================
// REAL IMPLEMENTATION
// ============================================================

/// Runs command lines through `/bin/sh -c`, so the quoting of arguments is
/// interpreted by a POSIX shell.
///
/// Stdout and stderr are captured separately: all stdout lines come first,
/// then all stderr lines. Their relative order as printed is not preserved.
#[derive(Debug, Default)]
pub struct ShellCommandRunner;

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command_line: &str) -> io::Result<CapturedOutput> {
        trace!("spawning: sh -c {}", command_line);
        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        let stdout = decode(&output.stdout, "stdout", command_line);
        let stderr = decode(&output.stderr, "stderr", command_line);
        let lines = stdout
            .lines()
            .chain(stderr.lines())
            .map(str::to_string)
            .collect::<Vec<_>>();

        debug!(
            "finished: {} (status={:?}, {} lines)",
            command_line,
            output.status.code(),
            lines.len()
        );
        Ok(CapturedOutput {
            lines,
            exit_code: output.status.code(),
        })
    }
}

fn decode<'a>(bytes: &'a [u8], stream: &str, command_line: &str) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!(
            "{} of {} is not valid UTF-8, invalid bytes replaced",
            stream, command_line
        );
    }
    text
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn given_quoted_args_when_run_then_shell_passes_tokens_verbatim() {
        let out = ShellCommandRunner
            .run("printf '%s\\n' 'a b' 'it'\\''s' '$HOME'")
            .unwrap();
        assert_eq!(out.lines, vec!["a b", "it's", "$HOME"]);
        assert_eq!(out.exit_code, Some(0));
    }

    #[test]
    fn given_stderr_output_when_run_then_follows_stdout() {
        let out = ShellCommandRunner
            .run("echo 'exit: 1'; echo oops >&2; exit 3")
            .unwrap();
        assert_eq!(out.lines, vec!["exit: 1", "oops"]);
        assert_eq!(out.exit_code, Some(3));
    }

    #[test]
    fn given_invalid_utf8_when_run_then_bytes_replaced() {
        let out = ShellCommandRunner
            .run("printf 'info: //depot/caf\\351.txt\\n'")
            .unwrap();
        assert_eq!(out.lines, vec!["info: //depot/caf\u{FFFD}.txt"]);
    }

    #[test]
    fn given_valid_utf8_when_decode_then_borrowed() {
        assert!(matches!(decode(b"info: ok", "stdout", "x"), Cow::Borrowed("info: ok")));
        assert!(matches!(decode(b"caf\xe9", "stdout", "x"), Cow::Owned(_)));
    }
}
