//! Database service control.

#![allow(clippy::expect_used)]

use osagent::{AgentConfig, AgentError, OsAgent};

use crate::mocks::{Reply, ScriptedRunner, agent};

#[tokio::test]
async fn zero_exit_means_running() {
    let agent = agent(ScriptedRunner::new().on("systemctl is-active", Reply::Stdout("active\n")));

    assert!(agent.service_running().await.expect("status"));
}

#[tokio::test]
async fn nonzero_exit_means_stopped_not_error() {
    let agent = agent(ScriptedRunner::new().on("systemctl is-active", Reply::Exit(3)));

    assert!(!agent.service_running().await.expect("status"));
}

#[tokio::test]
async fn stop_and_start_run_configured_commands() {
    let agent = agent(
        ScriptedRunner::new()
            .on("systemctl stop", Reply::Stdout(""))
            .on("systemctl start", Reply::Stdout("")),
    );

    agent.service_stop().await.expect("stop");
    agent.service_start().await.expect("start");

    assert_eq!(
        agent.runner().calls(),
        ["systemctl stop mysql", "systemctl start mysql"]
    );
}

#[tokio::test]
async fn failed_start_propagates() {
    let agent = agent(ScriptedRunner::new().on("systemctl start", Reply::Exit(1)));

    let err = agent.service_start().await.expect_err("start fails");

    assert!(matches!(err, AgentError::Execution { .. }));
}

#[tokio::test]
async fn unconfigured_command_fails_at_execution() {
    let agent = OsAgent::new(AgentConfig::default(), ScriptedRunner::new());

    let err = agent.service_stop().await.expect_err("empty template");

    assert!(err.to_string().contains("empty command"));
    assert!(agent.runner().calls().is_empty());
}
