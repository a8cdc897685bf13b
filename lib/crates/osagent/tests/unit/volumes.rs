//! Logical volume listing and path resolution.

#![allow(clippy::expect_used)]

use osagent::AgentError;

use crate::mocks::{Reply, ScriptedRunner, agent};

const LVS: &str = "  data        vg0  /dev/vg0/data\n  data-snap-1 vg0  /dev/vg0/data-snap-1   42.10\n  data-snap-2 vg0  /dev/vg0/data-snap-2  100.00\n";

#[tokio::test]
async fn empty_pattern_lists_every_volume() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout(LVS)));

    let volumes = agent.logical_volumes("", "").await.expect("list");

    let names: Vec<_> = volumes.iter().map(|lv| lv.name.as_str()).collect();
    assert_eq!(names, ["data", "data-snap-1", "data-snap-2"]);
}

#[tokio::test]
async fn snapshot_columns_are_mapped() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout(LVS)));

    let volumes = agent.logical_volumes("", "").await.expect("list");

    assert!(!volumes[0].is_snapshot);
    assert!(volumes[1].is_snapshot);
    assert!(volumes[1].is_snapshot_valid());
    assert_eq!(volumes[1].path, "/dev/vg0/data-snap-1");
    assert!(volumes[2].is_snapshot);
    assert!(!volumes[2].is_snapshot_valid());
}

#[tokio::test]
async fn pattern_filters_by_name_substring() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout(LVS)));

    let volumes = agent.logical_volumes("", "snap-2").await.expect("list");

    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].name, "data-snap-2");
}

#[tokio::test]
async fn pattern_without_match_is_empty_not_error() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout(LVS)));

    let volumes = agent.logical_volumes("", "no-such").await.expect("list");

    assert!(volumes.is_empty());
}

#[tokio::test]
async fn empty_lvs_output_is_empty_list() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout("")));

    assert!(agent.logical_volumes("vg0/none", "").await.expect("list").is_empty());
}

#[tokio::test]
async fn volume_name_is_passed_to_lvs() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout("")));

    agent.logical_volumes("vg0/data", "").await.expect("list");

    assert_eq!(
        agent.runner().calls(),
        ["lvs --noheading -o lv_name,vg_name,lv_path,snap_percent vg0/data"]
    );
}

#[tokio::test]
async fn lvs_failure_propagates() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Exit(5)));

    let err = agent.logical_volumes("", "").await.expect_err("should fail");

    assert!(matches!(err, AgentError::Execution { .. }));
}

#[tokio::test]
async fn snapshot_volumes_use_configured_filter() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout(LVS)));

    let volumes = agent.snapshot_volumes().await.expect("list");

    let names: Vec<_> = volumes.iter().map(|lv| lv.name.as_str()).collect();
    assert_eq!(names, ["data-snap-1", "data-snap-2"]);
}

#[tokio::test]
async fn path_lookup_returns_first_volume() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout(LVS)));

    let path = agent.logical_volume_path("vg0").await.expect("path");

    assert_eq!(path, "/dev/vg0/data");
}

#[tokio::test]
async fn path_lookup_on_empty_listing_is_not_found() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Stdout("")));

    let err = agent.logical_volume_path("/dev/sda1").await.expect_err("missing");

    assert_eq!(
        err,
        AgentError::NotFound {
            kind: "logical volume",
            name: "/dev/sda1".into()
        }
    );
}

#[tokio::test]
async fn path_lookup_on_lvs_failure_is_not_found() {
    let agent = agent(ScriptedRunner::new().on("lvs", Reply::Exit(5)));

    let err = agent.logical_volume_path("/dev/sda1").await.expect_err("missing");

    assert!(matches!(err, AgentError::NotFound { .. }));
}
