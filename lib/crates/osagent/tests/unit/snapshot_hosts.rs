//! Donor host discovery.

#![allow(clippy::expect_used)]

use osagent::AgentError;

use crate::mocks::{Reply, ScriptedRunner, agent};

#[tokio::test]
async fn local_discovery_uses_local_command() {
    let agent = agent(
        ScriptedRunner::new()
            .on("snapshot-hosts --local", Reply::Stdout("db-3.dc1\ndb-7.dc1\n"))
            .on("snapshot-hosts", Reply::Stdout("db-3.dc1\ndb-9.dc2\n")),
    );

    let hosts = agent.available_snapshot_hosts(true).await.expect("hosts");

    assert_eq!(hosts, ["db-3.dc1", "db-7.dc1"]);
}

#[tokio::test]
async fn global_discovery_uses_global_command() {
    let agent = agent(
        ScriptedRunner::new()
            .on("snapshot-hosts --local", Reply::Stdout("db-3.dc1\n"))
            .on("snapshot-hosts", Reply::Stdout("db-3.dc1\ndb-9.dc2\n")),
    );

    let hosts = agent.available_snapshot_hosts(false).await.expect("hosts");

    assert_eq!(hosts, ["db-3.dc1", "db-9.dc2"]);
    assert_eq!(agent.runner().calls(), ["snapshot-hosts"]);
}

#[tokio::test]
async fn lines_are_returned_uninterpreted() {
    let agent = agent(ScriptedRunner::new().on("snapshot-hosts", Reply::Stdout("  db-3  42\n")));

    let hosts = agent.available_snapshot_hosts(false).await.expect("hosts");

    assert_eq!(hosts, ["  db-3  42"]);
}

#[tokio::test]
async fn discovery_failure_propagates() {
    let agent = agent(ScriptedRunner::new().on("snapshot-hosts", Reply::Exit(2)));

    let err = agent.available_snapshot_hosts(false).await.expect_err("fails");

    assert!(matches!(err, AgentError::Execution { .. }));
}
