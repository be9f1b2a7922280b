//! Derived queries built from dispatcher calls
//!
//! Each query encodes a parsing rule over the text of one p4 command. They
//! share the client's cache, so asking for another channel of the same
//! command does not run it again.

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, P4Client};
use crate::domain::{
    change_number, default_change_filespecs, depot_path, group_change_blocks, ChangeBlock, Channel,
};

const NO_ARGS: [&str; 0] = [];

impl P4Client {
    /// True when `p4 info` reports exit status 0.
    ///
    /// A missing or non-zero status means the server is down or unreachable.
    #[instrument(level = "debug", skip(self))]
    pub fn is_alive(&mut self) -> ApplicationResult<bool> {
        let status = self.invoke("info", Channel::Exit, NO_ARGS)?;
        let alive = status.first().is_some_and(|code| code.trim() == "0");
        debug!("p4 info exit={:?}, alive={}", status.first(), alive);
        Ok(alive)
    }

    /// Strict liveness check: fails with the error output of `p4 info`.
    pub fn ping(&mut self) -> ApplicationResult<()> {
        if self.is_alive()? {
            return Ok(());
        }
        let errors = self.invoke("info", Channel::Error, NO_ARGS)?;
        let message = if errors.is_empty() {
            "no exit status reported".to_string()
        } else {
            errors.join("\n")
        };
        Err(ApplicationError::ToolUnavailable { message })
    }

    /// Filespecs opened in the default changelist (`path#rev - action`).
    #[instrument(level = "debug", skip(self))]
    pub fn default_changelist_filespecs(&mut self) -> ApplicationResult<Vec<String>> {
        let form = self.invoke("change", Channel::All, ["-o"])?;
        let specs = default_change_filespecs(&form);
        debug!("default changelist has {} files", specs.len());
        Ok(specs)
    }

    /// Depot paths opened in the default changelist.
    pub fn default_changelist_files(&mut self) -> ApplicationResult<Vec<String>> {
        Ok(self
            .default_changelist_filespecs()?
            .iter()
            .map(|spec| depot_path(spec).to_string())
            .collect())
    }

    /// Numbers of the current client's pending changelists, ascending.
    ///
    /// `p4 changes` lists newest first; the result is re-sorted numerically.
    #[instrument(level = "debug", skip(self))]
    pub fn pending_changelist_numbers(&mut self) -> ApplicationResult<Vec<u64>> {
        let client = self.require_client()?;
        let lines = self.invoke(
            "changes",
            Channel::All,
            ["-s", "pending", "-c", client.as_str()],
        )?;
        Ok(lines
            .iter()
            .filter_map(|line| {
                let number = change_number(line);
                if number.is_none() {
                    warn!("skipping unparsable changes line: {}", line);
                }
                number
            })
            .sorted()
            .collect())
    }

    /// Pending changelists of the current client with their descriptions,
    /// ordered by changelist number.
    #[instrument(level = "debug", skip(self))]
    pub fn pending_changelist_descriptions(&mut self) -> ApplicationResult<Vec<ChangeBlock>> {
        let client = self.require_client()?;
        let lines = self.invoke(
            "changes",
            Channel::All,
            ["-l", "-s", "pending", "-c", client.as_str()],
        )?;
        Ok(group_change_blocks(&lines)
            .into_iter()
            .sorted_by_key(ChangeBlock::number)
            .collect())
    }

    /// Files affected by a changelist (the info lines of `p4 describe`).
    pub fn describe_files(&mut self, change: u64) -> ApplicationResult<Vec<String>> {
        self.invoke("describe", Channel::Info, [change.to_string()])
    }

    /// Description text of a changelist (the text lines of `p4 describe`).
    pub fn describe_text(&mut self, change: u64) -> ApplicationResult<Vec<String>> {
        self.invoke("describe", Channel::Text, [change.to_string()])
    }

    fn require_client(&mut self) -> ApplicationResult<String> {
        self.client_name()?.ok_or_else(|| ApplicationError::Config {
            message: format!("{} is not set", crate::config::CLIENT_KEY),
        })
    }
}
