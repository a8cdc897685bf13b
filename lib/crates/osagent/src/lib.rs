//! Host operations behind the orchestrator agent.
//!
//! Everything here shells out to system tools (`lvs`, `mount`, `umount`,
//! `du`, `grep` and the configured service-control commands) and turns their
//! text output into typed values. No state is kept between calls: every
//! query re-reads the live mount table and volume manager metadata.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod agent;
pub mod command;
pub mod config;
pub mod error;
pub mod output;
pub mod types;

pub use agent::OsAgent;
pub use command::{CommandOutcome, CommandRunner, ProcessRunner};
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use types::{LogicalVolume, Mount};
