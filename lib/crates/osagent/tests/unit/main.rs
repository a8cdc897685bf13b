//! Unit tests for osagent operations.
//!
//! Every test drives `OsAgent` through an in-memory `CommandRunner`, so no
//! process is ever spawned.

mod disk_usage;
mod service;
mod snapshot_hosts;
mod volumes;
