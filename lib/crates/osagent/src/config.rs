//! Command templates and snapshot settings consumed by [`OsAgent`].
//!
//! Built once at startup and read-only afterwards. Templates use `{volume}`,
//! `{mount_point}` and `{path}` placeholders. The service-control and
//! snapshot-discovery commands have no defaults: left unset they stay empty
//! and fail when invoked.
//!
//! [`OsAgent`]: crate::OsAgent

use serde::Deserialize;

/// Placeholder names understood by the templates.
pub mod placeholder {
    pub const VOLUME: &str = "volume";
    pub const MOUNT_POINT: &str = "mount_point";
    pub const PATH: &str = "path";
}

/// Agent configuration.
///
/// Aliases accept the keys of the original JSON configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Lists volumes; must print `lv_name vg_name lv_path snap_percent`.
    pub volumes_command: String,
    /// Looks up a mount point in the mount table; non-zero exit means absent.
    pub mount_lookup_command: String,
    pub mount_command: String,
    pub unmount_command: String,
    /// Prints `<bytes><tab><path>` for a directory tree.
    pub disk_usage_command: String,

    /// Exits zero while the database service is running.
    #[serde(alias = "MySQLServiceStatusCommand")]
    pub service_status_command: String,
    #[serde(alias = "MySQLServiceStartCommand")]
    pub service_start_command: String,
    #[serde(alias = "MySQLServiceStopCommand")]
    pub service_stop_command: String,

    /// Prints one donor host per line, restricted to the local datacenter.
    #[serde(alias = "AvailableLocalSnapshotHostsCommand")]
    pub available_local_snapshot_hosts_command: String,
    /// Prints one donor host per line.
    #[serde(alias = "AvailableSnapshotHostsCommand")]
    pub available_snapshot_hosts_command: String,

    /// Substring a volume name must contain to be listed as a snapshot.
    #[serde(alias = "SnapshotVolumesFilter")]
    pub snapshot_volumes_filter: String,
    /// Where snapshots get mounted.
    #[serde(alias = "SnapshotMountPoint")]
    pub snapshot_mount_point: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            volumes_command: "lvs --noheading -o lv_name,vg_name,lv_path,snap_percent {volume}"
                .to_string(),
            mount_lookup_command: "grep {mount_point} /etc/mtab".to_string(),
            mount_command: "mount {volume} {mount_point}".to_string(),
            unmount_command: "umount {mount_point}".to_string(),
            disk_usage_command: "du -sb {path}".to_string(),
            service_status_command: String::new(),
            service_start_command: String::new(),
            service_stop_command: String::new(),
            available_local_snapshot_hosts_command: String::new(),
            available_snapshot_hosts_command: String::new(),
            snapshot_volumes_filter: String::new(),
            snapshot_mount_point: String::new(),
        }
    }
}
