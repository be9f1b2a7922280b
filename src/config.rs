//! P4 configuration resolution
//!
//! Precedence (lowest to highest):
//! 1. Config file named by `P4CONFIG`, searched upward from the working
//!    directory when the name is relative
//! 2. Environment variables: `P4*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::application::{ApplicationError, ApplicationResult};

/// Prefix shared by every configuration key.
pub const KEY_PREFIX: &str = "P4";

/// Environment variable naming the config file.
pub const CONFIG_FILE_VAR: &str = "P4CONFIG";

/// Key holding the active client workspace.
pub const CLIENT_KEY: &str = "P4CLIENT";

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(P4\S*)\s*=\s*(.*)$").expect("valid assignment regex")
});

/// Resolved key/value configuration of the p4 tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct P4Config {
    values: BTreeMap<String, String>,
    source: Option<PathBuf>,
}

impl P4Config {
    /// Resolve against the real process environment and working directory.
    pub fn from_process_env() -> ApplicationResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| ApplicationError::Config {
            message: format!("current directory: {e}"),
        })?;
        Self::resolve_from(std::env::vars(), &cwd)
    }

    /// Resolve from explicit environment variables and working directory.
    pub fn resolve_from<I, K, V>(vars: I, cwd: &Path) -> ApplicationResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(KEY_PREFIX))
            .collect();

        let mut config = Self::default();

        let config_name = env
            .iter()
            .find(|(k, _)| k == CONFIG_FILE_VAR)
            .map(|(_, v)| v.as_str());
        if let Some(path) = config_name.and_then(|name| find_config_file(Path::new(name), cwd)) {
            config.load_file(&path)?;
            config.source = Some(path);
        }

        // environment always wins over the file
        for (k, v) in env {
            config.values.insert(k, v);
        }

        debug!(
            "resolved {} p4 settings, file={:?}",
            config.values.len(),
            config.source
        );
        Ok(config)
    }

    fn load_file(&mut self, path: &Path) -> ApplicationResult<()> {
        let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
        for (k, v) in parse_assignments(&content) {
            self.values.insert(k, v);
        }
        Ok(())
    }

    /// Value for `key`, if configured.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Active client workspace (`P4CLIENT`).
    pub fn client_name(&self) -> Option<&str> {
        self.get(CLIENT_KEY)
    }

    /// Config file that contributed values, if one was found.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse `P4KEY=value` lines; anything else is ignored.
pub fn parse_assignments(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let caps = ASSIGNMENT.captures(line)?;
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().trim_end_matches('\r').to_string();
            Some((key, value))
        })
        .collect()
}

/// Locate the config file.
///
/// Absolute names are used as is. Relative names are tried against `start`
/// and each of its ancestors up to the filesystem root; the first existing
/// file wins. `None` when nothing exists.
pub fn find_config_file(name: &Path, start: &Path) -> Option<PathBuf> {
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }
    start.ancestors().map(|dir| dir.join(name)).find(|candidate| {
        trace!("probing config file {}", candidate.display());
        candidate.is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_assignment_lines_when_parse_then_keeps_p4_keys_only() {
        let content = "P4PORT=ssl:perforce:1666\n  P4USER = bob\nEDITOR=vim\n# P4CLIENT=commented\nnonsense\r\nP4CLIENT=ws\r\n";
        let parsed = parse_assignments(content);
        assert_eq!(
            parsed,
            vec![
                ("P4PORT".to_string(), "ssl:perforce:1666".to_string()),
                ("P4USER".to_string(), "bob".to_string()),
                ("P4CLIENT".to_string(), "ws".to_string()),
            ]
        );
    }

    #[test]
    fn given_repeated_key_in_file_when_resolve_then_last_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".p4config"), "P4CLIENT=first\nP4CLIENT=second\n").unwrap();

        let config =
            P4Config::resolve_from([("P4CONFIG", ".p4config")], temp.path()).unwrap();

        assert_eq!(config.client_name(), Some("second"));
    }

    #[test]
    fn given_no_config_var_when_resolve_then_env_only() {
        let temp = TempDir::new().unwrap();
        let config = P4Config::resolve_from(
            [("P4PORT", "1666"), ("HOME", "/home/bob"), ("PATH", "/bin")],
            temp.path(),
        )
        .unwrap();

        assert_eq!(config.len(), 1);
        assert_eq!(config.get("P4PORT"), Some("1666"));
        assert_eq!(config.get("HOME"), None);
        assert!(config.source().is_none());
    }

    #[test]
    fn given_missing_absolute_file_when_find_then_none() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert_eq!(find_config_file(&missing, temp.path()), None);
    }
}
