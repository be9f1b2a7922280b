//! Domain layer: the script protocol and its text conventions
//!
//! This layer is independent of external concerns (no process spawning, no config loading).

pub mod changelist;
pub mod channel;
pub mod error;
pub mod invocation;

pub use changelist::{
    change_number, default_change_filespecs, depot_path, group_change_blocks, ChangeBlock,
};
pub use channel::Channel;
pub use error::DomainError;
pub use invocation::{quote_arg, split_channel_suffix, Invocation, P4_BINARY, SCRIPT_FLAG};
