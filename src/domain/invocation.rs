//! Composition of `p4 -s` command lines

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Channel, DomainError};

/// Name of the wrapped executable, resolved through `PATH`.
pub const P4_BINARY: &str = "p4";

/// Flag switching the tool into tagged script output.
pub const SCRIPT_FLAG: &str = "-s";

static CHANNEL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^_]+)_([A-Z]+)$").expect("valid channel suffix regex"));

/// Wrap an argument in single quotes for the shell.
///
/// Embedded single quotes close the quoted run, emit an escaped quote and
/// reopen it, so the shell hands the token to `p4` byte for byte.
pub fn quote_arg(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Split a `command_CHANNEL` name into command and channel.
///
/// Names that do not have that shape (`info`, `change_list`) select the
/// default channel. A well-formed suffix naming no channel is an error.
pub fn split_channel_suffix(name: &str) -> Result<(&str, Channel), DomainError> {
    match CHANNEL_SUFFIX.captures(name) {
        Some(caps) => {
            let command = caps.get(1).map_or("", |m| m.as_str());
            let channel = caps.get(2).map_or("", |m| m.as_str()).parse()?;
            Ok((command, channel))
        }
        None => Ok((name, Channel::default())),
    }
}

/// One request to the tool: subcommand plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(DomainError::EmptyCommand);
        }
        Ok(Self {
            command,
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// The full shell command line; doubles as the cache key.
    pub fn command_line(&self) -> String {
        let mut parts = vec![
            P4_BINARY.to_string(),
            SCRIPT_FLAG.to_string(),
            self.command.clone(),
        ];
        parts.extend(self.args.iter().map(|a| quote_arg(a)));
        parts.join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_args_with_spaces_when_compose_then_each_is_quoted() {
        let inv = Invocation::new("reopen", ["-c", "12", "//depot/my file.txt"]).unwrap();
        assert_eq!(
            inv.command_line(),
            "p4 -s reopen '-c' '12' '//depot/my file.txt'"
        );
    }

    #[test]
    fn given_no_args_when_compose_then_no_trailing_space() {
        let inv = Invocation::new("info", Vec::<String>::new()).unwrap();
        assert_eq!(inv.command_line(), "p4 -s info");
    }

    #[test]
    fn given_single_quote_when_quote_then_escapes_for_shell() {
        assert_eq!(quote_arg("it's"), r"'it'\''s'");
        assert_eq!(quote_arg("$HOME *"), "'$HOME *'");
    }

    #[test]
    fn given_blank_command_when_new_then_errors() {
        assert_eq!(
            Invocation::new("  ", ["x"]),
            Err(DomainError::EmptyCommand)
        );
    }

    #[test]
    fn given_suffixed_name_when_split_then_extracts_channel() {
        assert_eq!(split_channel_suffix("info_EXIT"), Ok(("info", Channel::Exit)));
        assert_eq!(
            split_channel_suffix("describe_INFO"),
            Ok(("describe", Channel::Info))
        );
        assert_eq!(split_channel_suffix("info"), Ok(("info", Channel::All)));
        assert_eq!(
            split_channel_suffix("change_list"),
            Ok(("change_list", Channel::All))
        );
        assert_eq!(
            split_channel_suffix("info_NOPE"),
            Err(DomainError::UnknownChannel("NOPE".into()))
        );
    }
}
