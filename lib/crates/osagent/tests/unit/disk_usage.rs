//! Disk usage parsing.

#![allow(clippy::expect_used)]

use osagent::AgentError;

use crate::mocks::{Reply, ScriptedRunner, agent};

#[tokio::test]
async fn first_field_is_byte_count() {
    let agent = agent(ScriptedRunner::new().on("du -sb /some/path", Reply::Stdout("12345\t/some/path")));

    assert_eq!(agent.disk_usage("/some/path").await.expect("du"), 12_345);
}

#[tokio::test]
async fn non_numeric_field_is_parse_error() {
    let agent = agent(ScriptedRunner::new().on("du", Reply::Stdout("abc\t/some/path\n")));

    let err = agent.disk_usage("/some/path").await.expect_err("parse");

    assert!(matches!(err, AgentError::Parse { ref input, .. } if input == "abc"));
}

#[tokio::test]
async fn empty_output_is_parse_error() {
    let agent = agent(ScriptedRunner::new().on("du", Reply::Stdout("")));

    let err = agent.disk_usage("/some/path").await.expect_err("parse");

    assert!(matches!(err, AgentError::Parse { .. }));
}

#[tokio::test]
async fn du_failure_propagates() {
    let agent = agent(ScriptedRunner::new().on("du", Reply::Exit(1)));

    let err = agent.disk_usage("/missing").await.expect_err("du fails");

    assert!(matches!(err, AgentError::Execution { .. }));
}
