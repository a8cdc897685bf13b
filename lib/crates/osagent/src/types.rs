//! Values reported by agent operations.
//!
//! Field names on the wire follow the keys orchestrator already decodes
//! (`Name`, `LVPath`, `IsMounted`, ...).

use serde::{Deserialize, Serialize};

// ── Logical volumes ───────────────────────────────────────────────────────────

/// One row of `lvs` output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogicalVolume {
    /// Volume name, unique within its group.
    pub name: String,
    /// Owning volume group.
    pub group_name: String,
    /// Device-mapper path, e.g. `/dev/vg0/lv1`.
    pub path: String,
    /// Whether `lvs` reported a snapshot usage percentage.
    pub is_snapshot: bool,
    /// Copy-on-write usage; zero unless `is_snapshot`.
    pub snapshot_percent: f64,
}

impl LogicalVolume {
    /// Map the fields of an `lvs -o lv_name,vg_name,lv_path,snap_percent`
    /// row.
    ///
    /// Empty fields from column padding are skipped. Rows with fewer than
    /// three fields are rejected. A missing or unparsable fourth field marks
    /// the volume as a plain (non-snapshot) volume; it is never an error.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        let mut fields = fields.iter().map(AsRef::as_ref).filter(|f| !f.is_empty());
        let name = fields.next()?.to_string();
        let group_name = fields.next()?.to_string();
        let path = fields.next()?.to_string();
        let snapshot_percent = fields.next().and_then(|f| f.parse::<f64>().ok());

        Some(Self {
            name,
            group_name,
            path,
            is_snapshot: snapshot_percent.is_some(),
            snapshot_percent: snapshot_percent.unwrap_or_default(),
        })
    }

    /// A snapshot is usable until its copy-on-write space is exhausted.
    #[must_use]
    pub fn is_snapshot_valid(&self) -> bool {
        self.is_snapshot && self.snapshot_percent < 100.0
    }
}

// ── Mounts ────────────────────────────────────────────────────────────────────

/// State of a mount point at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mount {
    /// Target directory.
    pub path: String,
    /// Device node mounted there; empty when unmounted.
    pub device: String,
    /// Logical volume backing `device`, when it resolves to one.
    #[serde(rename = "LVPath")]
    pub lv_path: String,
    /// Filesystem type from the mount table.
    pub file_system: String,
    pub is_mounted: bool,
    /// Recursive size of `path` in bytes; zero when unmeasured.
    pub disk_usage: u64,
}

impl Mount {
    /// An unmounted record for `path`.
    #[must_use]
    pub fn unmounted(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }
}
