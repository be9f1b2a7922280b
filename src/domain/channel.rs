//! Output channels of the `p4 -s` tagged-line protocol
//!
//! In script mode every line the tool prints starts with a tag naming its
//! channel (`info: `, `error: `, ...). Classification is separate from
//! execution so one cached run can answer differently filtered requests.

use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

/// A class of output line, selected by its protocol prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    /// `info: ` and `info1: ` lines
    Info,
    /// `text: ` lines
    Text,
    /// `error: ` lines
    Error,
    /// `warning: ` lines
    Warning,
    /// `exit: ` lines carrying the tool's exit status
    Exit,
    /// Every line, prefix kept
    Raw,
    /// Info, Text, Error and Warning combined
    #[default]
    All,
}

/// Channels that own a concrete prefix, in matching order.
const TAGGED: [Channel; 5] = [
    Channel::Info,
    Channel::Text,
    Channel::Error,
    Channel::Warning,
    Channel::Exit,
];

impl Channel {
    /// Line prefixes belonging to this channel.
    ///
    /// `Raw` owns the empty prefix; `All` owns none itself and is resolved
    /// through its member channels.
    pub fn prefixes(self) -> &'static [&'static str] {
        match self {
            Channel::Info => &["info: ", "info1: "],
            Channel::Text => &["text: "],
            Channel::Error => &["error: "],
            Channel::Warning => &["warning: "],
            Channel::Exit => &["exit: "],
            Channel::Raw => &[""],
            Channel::All => &[],
        }
    }

    /// Canonical upper-case tag, as used in `command_TAG` names.
    pub fn tag(self) -> &'static str {
        match self {
            Channel::Info => "INFO",
            Channel::Text => "TEXT",
            Channel::Error => "ERROR",
            Channel::Warning => "WARNING",
            Channel::Exit => "EXIT",
            Channel::Raw => "RAW",
            Channel::All => "ALL",
        }
    }

    /// Determine which tagged channel a raw line belongs to.
    ///
    /// Returns the channel together with the line minus its prefix, or `None`
    /// for a line without a recognized tag.
    pub fn classify(line: &str) -> Option<(Channel, &str)> {
        TAGGED.iter().find_map(|&channel| {
            channel
                .prefixes()
                .iter()
                .find_map(|prefix| line.strip_prefix(prefix))
                .map(|rest| (channel, rest))
        })
    }

    /// Select a raw line for this channel.
    ///
    /// Returns the text to hand to the caller: the remainder after the prefix,
    /// or the unchanged line for `Raw`. `None` means the line is not on this
    /// channel.
    pub fn select(self, line: &str) -> Option<&str> {
        match self {
            Channel::Raw => Some(line),
            Channel::All => match Channel::classify(line) {
                Some((channel, rest)) if channel != Channel::Exit => Some(rest),
                _ => None,
            },
            wanted => match Channel::classify(line) {
                Some((channel, rest)) if channel == wanted => Some(rest),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    /// Parse a channel tag case-insensitively (`EXIT`, `exit`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" => Ok(Channel::Info),
            "TEXT" => Ok(Channel::Text),
            "ERROR" => Ok(Channel::Error),
            "WARNING" => Ok(Channel::Warning),
            "EXIT" => Ok(Channel::Exit),
            "RAW" => Ok(Channel::Raw),
            "ALL" => Ok(Channel::All),
            _ => Err(DomainError::UnknownChannel(s.to_string())),
        }
    }
}
