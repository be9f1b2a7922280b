//! Client layer for the `p4 -s` script protocol.
//!
//! [`P4Client`](application::P4Client) runs any p4 subcommand, caches its raw
//! tagged output per command line and returns the lines of one
//! [`Channel`](domain::Channel). Configuration comes from the `P4CONFIG` file
//! and `P4*` environment variables ([`config::P4Config`]).
//!
//! ```no_run
//! use p4script::application::P4Client;
//! use p4script::domain::Channel;
//!
//! let mut p4 = P4Client::new();
//! let opened = p4.invoke("opened", Channel::Info, ["//depot/my project/..."])?;
//! let errors = p4.invoke("opened", Channel::Error, ["//depot/my project/..."])?; // cached
//! # Ok::<(), p4script::application::ApplicationError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
