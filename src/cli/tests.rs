//! Tests for the CLI

use super::*;
use crate::auth::AuthConfig;
use crate::client::Client;
use crate::test_support::ScriptedTransport;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write as _;
use test_case::test_case;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("resource-manager").chain(args.iter().copied())).unwrap()
}

async fn run_lines(args: &[&str], transport: &std::sync::Arc<ScriptedTransport>) -> Vec<Value> {
    let client = Client::from_connection(transport.connection());
    let mut out = Vec::new();
    Runner::new(parse(args))
        .run_with(&client, &mut out)
        .await
        .unwrap();

    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// Argument Parsing Tests
// ============================================================================

#[test_case("labels.env=prod", Some(("labels.env", "prod")) ; "simple pair")]
#[test_case("name=My Project", Some(("name", "My Project")) ; "value with space")]
#[test_case("labels.color=", Some(("labels.color", "")) ; "empty value")]
#[test_case("a=b=c", Some(("a", "b=c")) ; "splits on first equals")]
#[test_case("novalue", None ; "missing equals")]
#[test_case("=value", None ; "empty key")]
fn test_parse_key_value(input: &str, expected: Option<(&str, &str)>) {
    let parsed = parse_key_value(input).ok();
    let expected = expected.map(|(k, v)| (k.to_string(), v.to_string()));
    assert_eq!(parsed, expected);
}

#[test]
fn test_parse_list_command() {
    let cli = parse(&[
        "list",
        "--filter",
        "labels.env=prod",
        "-f",
        "name=web",
        "--page-size",
        "50",
        "--max-results",
        "5",
    ]);

    match cli.command {
        Commands::List {
            filters,
            page_size,
            max_results,
        } => {
            assert_eq!(filters.len(), 2);
            assert_eq!(page_size, Some(50));
            assert_eq!(max_results, Some(5));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["get", "alpha", "--token", "secret", "--verbose"]);
    assert_eq!(cli.token.as_deref(), Some("secret"));
    assert!(cli.verbose);
}

#[test]
fn test_invalid_label_is_rejected() {
    let result = Cli::try_parse_from(["resource-manager", "create", "p", "--label", "broken"]);
    assert!(result.is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_client_config_defaults() {
    let runner = Runner::new(parse(&["list"]));
    let config = runner.client_config().unwrap();
    assert_eq!(config.base_url, crate::config::DEFAULT_BASE_URL);
    assert!(config.auth.is_none());
}

#[test]
fn test_client_config_flags_override_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "base_url: https://file.example.com\nauth:\n  type: api_key\n  value: from-file"
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let config = Runner::new(parse(&["--config", path, "list"]))
        .client_config()
        .unwrap();
    assert_eq!(config.base_url, "https://file.example.com");
    assert!(matches!(config.auth, AuthConfig::ApiKey { .. }));

    let config = Runner::new(parse(&[
        "--config",
        path,
        "--token",
        "tok",
        "--base-url",
        "http://localhost:9000",
        "list",
    ]))
    .client_config()
    .unwrap();
    assert_eq!(config.base_url, "http://localhost:9000");
    assert!(matches!(config.auth, AuthConfig::Bearer { ref token } if token == "tok"));
}

// ============================================================================
// Command Execution Tests
// ============================================================================

#[tokio::test]
async fn test_list_prints_one_line_per_project() {
    let transport = ScriptedTransport::new();
    transport
        .push_ok(json!({
            "projects": [{"projectId": "a"}, {"projectId": "b"}],
            "nextPageToken": "t2"
        }))
        .push_ok(json!({"projects": [{"projectId": "c"}]}));

    let lines = run_lines(&["list", "--filter", "labels.env=prod"], &transport).await;

    let ids: Vec<&str> = lines
        .iter()
        .map(|line| line["projectId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(
        transport.requests()[0].query.get("filter"),
        Some(&"labels.env:prod".to_string())
    );
}

#[tokio::test]
async fn test_list_honors_max_results() {
    let transport = ScriptedTransport::new();
    transport.push_ok(json!({
        "projects": [{"projectId": "a"}, {"projectId": "b"}],
        "nextPageToken": "t2"
    }));

    let lines = run_lines(&["list", "--max-results", "1"], &transport).await;

    assert_eq!(lines.len(), 1);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_get_prints_project() {
    let transport = ScriptedTransport::new();
    transport.push_ok(json!({
        "projectId": "alpha",
        "name": "Alpha",
        "lifecycleState": "ACTIVE"
    }));

    let lines = run_lines(&["get", "alpha"], &transport).await;

    assert_eq!(
        lines,
        vec![json!({"projectId": "alpha", "name": "Alpha", "lifecycleState": "ACTIVE"})]
    );
}

#[tokio::test]
async fn test_get_missing_project_fails() {
    let transport = ScriptedTransport::new();
    transport.push_status(404, json!({}));

    let client = Client::from_connection(transport.connection());
    let mut out = Vec::new();
    let err = Runner::new(parse(&["get", "missing"]))
        .run_with(&client, &mut out)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_create_sends_labels() {
    let transport = ScriptedTransport::new();
    transport.push_ok(json!({"projectId": "fresh", "lifecycleState": "ACTIVE"}));

    let lines = run_lines(
        &["create", "fresh", "--name", "Fresh", "--label", "team=infra"],
        &transport,
    )
    .await;

    assert_eq!(lines[0]["lifecycleState"], "ACTIVE");
    assert_eq!(
        transport.requests()[0].body,
        Some(json!({"projectId": "fresh", "name": "Fresh", "labels": {"team": "infra"}}))
    );
}

#[tokio::test]
async fn test_delete_and_undelete_reload_state() {
    let transport = ScriptedTransport::new();
    transport
        .push_ok(json!({}))
        .push_ok(json!({"projectId": "p", "lifecycleState": "DELETE_REQUESTED"}));
    let lines = run_lines(&["delete", "p"], &transport).await;
    assert_eq!(lines[0]["lifecycleState"], "DELETE_REQUESTED");

    let transport = ScriptedTransport::new();
    transport
        .push_ok(json!({}))
        .push_ok(json!({"projectId": "p", "lifecycleState": "ACTIVE"}));
    let lines = run_lines(&["undelete", "p"], &transport).await;
    assert_eq!(lines[0]["lifecycleState"], "ACTIVE");
    assert_eq!(transport.requests()[0].path, "/projects/p:undelete");
}
