use super::*;
use crate::database::testing::ScriptedClient;
use std::sync::{Arc, Mutex};

fn create_test_engine(candidates: &[&str]) -> (CompletionEngine<ScriptedClient>, Arc<Mutex<ScriptedClient>>) {
    let client = Arc::new(Mutex::new(
        ScriptedClient::new().with_candidates(candidates),
    ));
    let engine = CompletionEngine::new(CompletionOracle::new(Arc::clone(&client)));
    (engine, client)
}

#[test]
fn test_meta_command_context() {
    assert_eq!(analyze_context("."), InputContext::MetaCommand);
    assert_eq!(analyze_context(".ta"), InputContext::MetaCommand);
    assert_eq!(analyze_context(".schema"), InputContext::MetaCommand);
}

#[test]
fn test_schema_argument_is_identifier_context() {
    assert_eq!(
        analyze_context(".schema us"),
        InputContext::Identifier { head: 8 }
    );
    assert_eq!(analyze_context(".schema "), InputContext::NoCompletion);
}

#[test]
fn test_identifier_boundary() {
    assert_eq!(identifier_boundary("SELECT * FROM use"), Some(14));
    assert_eq!(identifier_boundary("SELECT a.b_c"), Some(9));
    assert_eq!(identifier_boundary("users"), None);
    assert_eq!(identifier_boundary("SELECT * FROM "), None);
    assert_eq!(identifier_boundary(""), None);
}

#[test]
fn test_meta_completion_ranks_all_commands() {
    let (engine, client) = create_test_engine(&[]);
    let completions = engine.complete(".s").unwrap();
    assert_eq!(completions.len(), META_COMMANDS.len());
    assert_eq!(completions[0], ".schema");
    // no server round trip for dot-commands
    assert!(client.lock().unwrap().executed.is_empty());
}

#[test]
fn test_identifier_completion_splices_candidates() {
    let (engine, _) = create_test_engine(&["user_roles", "users"]);
    let completions = engine.complete("SELECT * FROM use").unwrap();
    assert_eq!(
        completions,
        vec!["SELECT * FROM user_roles", "SELECT * FROM users"]
    );
}

#[test]
fn test_schema_argument_completion() {
    let (engine, client) = create_test_engine(&["users"]);
    let completions = engine.complete(".schema us").unwrap();
    assert_eq!(completions, vec![".schema users"]);

    let client = client.lock().unwrap();
    assert_eq!(client.executed[0].params()[0].1, "us");
    assert_eq!(client.executed[0].params()[1].1, ".schema us");
}

#[test]
fn test_whole_line_identifier_has_no_completion() {
    let (engine, client) = create_test_engine(&["users"]);
    assert!(engine.complete("users").unwrap().is_empty());
    assert!(engine.complete("SELECT * FROM ").unwrap().is_empty());
    assert!(client.lock().unwrap().executed.is_empty());
}

#[test]
fn test_oversized_candidates_are_dropped() {
    let long = "x".repeat(LINE_BUFFER_LEN);
    let (engine, _) = create_test_engine(&["short", long.as_str()]);
    let completions = engine.complete("SELECT s").unwrap();
    assert_eq!(completions, vec!["SELECT short"]);
}

#[test]
fn test_query_error_yields_no_completions() {
    let client = ScriptedClient::new().on(
        "completion(",
        Err(ClientError::Query("no such table: completion".to_string())),
    );
    let engine = CompletionEngine::new(CompletionOracle::new(Arc::new(Mutex::new(client))));
    assert!(engine.complete("SELECT * FROM use").unwrap().is_empty());
}

#[test]
fn test_connection_error_is_propagated() {
    let client = ScriptedClient::new().on(
        "completion(",
        Err(ClientError::Connection("connection reset".to_string())),
    );
    let engine = CompletionEngine::new(CompletionOracle::new(Arc::new(Mutex::new(client))));
    assert!(engine.complete("SELECT * FROM use").unwrap_err().is_connection());
}

#[test]
fn test_long_line_skips_completion() {
    let (engine, client) = create_test_engine(&["users"]);

    let line = format!("SELECT {} FROM use", "x".repeat(MAX_COMPLETION_LINE));
    assert!(engine.complete(&line).unwrap().is_empty());
    assert!(engine.complete(&format!(".{}", "s".repeat(MAX_COMPLETION_LINE))).unwrap().is_empty());
    assert!(client.lock().unwrap().executed.is_empty());

    let line = format!("SELECT {} FROM use", "x".repeat(100));
    assert_eq!(engine.complete(&line).unwrap().len(), 1);
}
