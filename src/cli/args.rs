//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::Channel;

/// Drive p4 through its script protocol: run any subcommand, filter its tagged output
#[derive(Parser, Debug)]
#[command(name = "p4s")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Resolve P4CONFIG and run p4 from this directory (default: cwd)
    #[arg(short = 'C', long, global = true, env = "P4S_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a p4 subcommand and print one channel of its output
    Run {
        /// Subcommand, optionally suffixed with a channel (info_EXIT)
        command: String,
        /// Channel to print (overrides a suffix in COMMAND); place before COMMAND
        #[arg(long, value_parser = parse_channel)]
        channel: Option<Channel>,
        /// Arguments passed to p4, each quoted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Check that p4 responds
    Ping {
        /// Report p4's error output when it does not respond
        #[arg(short, long)]
        strict: bool,
    },

    /// Inspect resolved P4 settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List files opened in the default changelist
    Default {
        /// Print bare depot paths instead of filespecs
        #[arg(short, long)]
        files: bool,
    },

    /// List pending changelists of the current client
    Pending {
        /// Include changelist descriptions
        #[arg(short, long)]
        long: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Setting name, e.g. P4CLIENT
        key: String,
    },

    /// Print all settings and the config file they came from
    Show,
}

fn parse_channel(s: &str) -> Result<Channel, String> {
    s.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}
