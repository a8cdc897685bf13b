//! Volume, mount and service operations.
//!
//! Each call renders a command template, runs it, and maps the tokenized
//! output onto a value. Whether a non-zero exit is a fault or an answer is
//! decided per operation:
//!
//! | operation            | non-zero exit means      |
//! |----------------------|--------------------------|
//! | `get_mount`          | not mounted              |
//! | `service_running`    | service not running      |
//! | everything else      | [`AgentError::Execution`] |
//!
//! A command that cannot be spawned at all is always an error.

use crate::command::{self, CommandOutcome, CommandRunner, ProcessRunner, render};
use crate::config::{AgentConfig, placeholder};
use crate::error::{AgentError, Result};
use crate::output::{FIELD_DELIMITER, to_lines, to_token_rows};
use crate::types::{LogicalVolume, Mount};

/// Host operations bound to one configuration and process runner.
#[derive(Debug)]
pub struct OsAgent<R = ProcessRunner> {
    config: AgentConfig,
    runner: R,
}

impl OsAgent<ProcessRunner> {
    /// Agent that spawns real processes.
    #[must_use]
    pub fn system(config: AgentConfig) -> Self {
        Self::new(config, ProcessRunner)
    }
}

impl<R: CommandRunner> OsAgent<R> {
    #[must_use]
    pub fn new(config: AgentConfig, runner: R) -> Self {
        Self { config, runner }
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    // ── Host ──────────────────────────────────────────────────────────────────

    pub fn hostname(&self) -> Result<String> {
        nix::unistd::gethostname()
            .map_err(|e| AgentError::execution("gethostname", e.to_string()))?
            .into_string()
            .map_err(|raw| {
                AgentError::execution("gethostname", format!("non UTF-8 hostname {raw:?}"))
            })
    }

    // ── Logical volumes ───────────────────────────────────────────────────────

    /// List volumes reported for `volume_name` (all volumes when empty) whose
    /// name contains `name_pattern`.
    ///
    /// No match is an empty list, not an error.
    pub async fn logical_volumes(
        &self,
        volume_name: &str,
        name_pattern: &str,
    ) -> Result<Vec<LogicalVolume>> {
        let line = render(
            &self.config.volumes_command,
            &[(placeholder::VOLUME, volume_name)],
        );
        let output = command::run_checked(&self.runner, &line).await?;

        Ok(to_token_rows(&output, &FIELD_DELIMITER)
            .iter()
            .filter_map(|row| LogicalVolume::from_fields(row))
            .filter(|lv| lv.name.contains(name_pattern))
            .collect())
    }

    /// Volumes whose name contains the configured snapshot filter.
    pub async fn snapshot_volumes(&self) -> Result<Vec<LogicalVolume>> {
        self.logical_volumes("", &self.config.snapshot_volumes_filter)
            .await
    }

    /// Device-mapper path of the volume `lvs` reports for `volume_name`.
    ///
    /// Any failure of the listing, as well as an empty listing, is reported
    /// as [`AgentError::NotFound`].
    pub async fn logical_volume_path(&self, volume_name: &str) -> Result<String> {
        self.logical_volumes(volume_name, "")
            .await
            .ok()
            .and_then(|volumes| volumes.into_iter().next())
            .map(|lv| lv.path)
            .ok_or_else(|| AgentError::NotFound {
                kind: "logical volume",
                name: volume_name.to_string(),
            })
    }

    // ── Mounts ────────────────────────────────────────────────────────────────

    /// Inspect the mount table for `mount_point`.
    ///
    /// A lookup that exits non-zero means the point is not mounted. When
    /// several rows match, the last one wins. The backing volume path and
    /// disk usage are filled in best-effort and default to empty/zero.
    pub async fn get_mount(&self, mount_point: &str) -> Result<Mount> {
        let mut mount = Mount::unmounted(mount_point);

        let line = render(
            &self.config.mount_lookup_command,
            &[(placeholder::MOUNT_POINT, mount_point)],
        );
        let output = match command::run_probe(&self.runner, &line).await? {
            CommandOutcome::Completed(output) => output,
            CommandOutcome::Declined { .. } => return Ok(mount),
        };

        for row in to_token_rows(&output, &FIELD_DELIMITER) {
            let [device, path, file_system, ..] = row.as_slice() else {
                continue;
            };
            mount.is_mounted = true;
            mount.device.clone_from(device);
            mount.path.clone_from(path);
            mount.file_system.clone_from(file_system);
        }
        if !mount.is_mounted {
            return Ok(mount);
        }

        mount.lv_path = self
            .logical_volume_path(&mount.device)
            .await
            .inspect_err(|e| tracing::debug!(device = %mount.device, error = %e, "no backing volume"))
            .unwrap_or_default();
        mount.disk_usage = self
            .disk_usage(mount_point)
            .await
            .inspect_err(|e| tracing::warn!(mount_point, error = %e, "disk usage unavailable"))
            .unwrap_or_default();

        Ok(mount)
    }

    /// Mount `volume_name` on `mount_point` and report the resulting state.
    pub async fn mount_logical_volume(&self, mount_point: &str, volume_name: &str) -> Result<Mount> {
        if volume_name.is_empty() {
            return Err(AgentError::InvalidArgument(
                "empty volume name in mount request".to_string(),
            ));
        }
        let line = render(
            &self.config.mount_command,
            &[
                (placeholder::VOLUME, volume_name),
                (placeholder::MOUNT_POINT, mount_point),
            ],
        );
        command::run_checked(&self.runner, &line).await?;
        tracing::info!(volume = volume_name, mount_point, "mounted logical volume");

        self.get_mount(mount_point).await
    }

    /// Unmount `mount_point` and report the resulting state.
    pub async fn unmount(&self, mount_point: &str) -> Result<Mount> {
        let line = render(
            &self.config.unmount_command,
            &[(placeholder::MOUNT_POINT, mount_point)],
        );
        command::run_checked(&self.runner, &line).await?;
        tracing::info!(mount_point, "unmounted");

        self.get_mount(mount_point).await
    }

    pub async fn snapshot_mount(&self) -> Result<Mount> {
        self.get_mount(&self.config.snapshot_mount_point).await
    }

    pub async fn mount_snapshot(&self, volume_name: &str) -> Result<Mount> {
        self.mount_logical_volume(&self.config.snapshot_mount_point, volume_name)
            .await
    }

    pub async fn unmount_snapshot(&self) -> Result<Mount> {
        self.unmount(&self.config.snapshot_mount_point).await
    }

    // ── Disk usage ────────────────────────────────────────────────────────────

    /// Recursive size of `path` in bytes, read from the first field of the
    /// first output row.
    pub async fn disk_usage(&self, path: &str) -> Result<u64> {
        let line = render(
            &self.config.disk_usage_command,
            &[(placeholder::PATH, path)],
        );
        let output = command::run_checked(&self.runner, &line).await?;
        let rows = to_token_rows(&output, &FIELD_DELIMITER);
        let first = rows
            .first()
            .and_then(|row| row.first())
            .map_or("", String::as_str);

        first.parse::<u64>().map_err(|e| AgentError::Parse {
            input: first.to_string(),
            reason: e.to_string(),
        })
    }

    // ── Snapshot hosts ────────────────────────────────────────────────────────

    /// Raw output lines of the donor discovery command; interpreting them is
    /// left to the caller.
    pub async fn available_snapshot_hosts(&self, local_only: bool) -> Result<Vec<String>> {
        let line = if local_only {
            &self.config.available_local_snapshot_hosts_command
        } else {
            &self.config.available_snapshot_hosts_command
        };
        let output = command::run_checked(&self.runner, line).await?;
        Ok(to_lines(&output))
    }

    // ── Database service ──────────────────────────────────────────────────────

    /// Whether the status command exits zero.
    pub async fn service_running(&self) -> Result<bool> {
        let outcome =
            command::run_probe(&self.runner, &self.config.service_status_command).await?;
        Ok(matches!(outcome, CommandOutcome::Completed(_)))
    }

    pub async fn service_stop(&self) -> Result<()> {
        command::run_checked(&self.runner, &self.config.service_stop_command).await?;
        tracing::info!("database service stopped");
        Ok(())
    }

    pub async fn service_start(&self) -> Result<()> {
        command::run_checked(&self.runner, &self.config.service_start_command).await?;
        tracing::info!("database service started");
        Ok(())
    }
}
