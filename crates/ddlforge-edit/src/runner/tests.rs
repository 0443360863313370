use super::*;
use crate::context::EditOptions;
use crate::{CacheEffect, PersistAction};
use ddlforge_core::{
    CancelToken, EditError, ExecutionEngine, Result, StatementResult, Transaction,
};
use ddlforge_model::{ObjectCache, ObjectKind, ObjectRef};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every engine interaction in order; statements containing the
/// configured marker fail.
struct MockEngine {
    log: Arc<Mutex<Vec<String>>>,
    fail_marker: Option<&'static str>,
    connected: bool,
}

impl MockEngine {
    fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fail_marker: None,
            connected: true,
        }
    }

    fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
            ..Self::new()
        }
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

fn check_fail(fail_marker: Option<&'static str>, sql: &str) -> Result<StatementResult> {
    match fail_marker {
        Some(marker) if sql.contains(marker) => {
            Err(EditError::Execution(format!("statement rejected: {sql}")))
        }
        _ => Ok(StatementResult::default()),
    }
}

#[async_trait]
impl ExecutionEngine for MockEngine {
    async fn execute(&self, sql: &str) -> Result<StatementResult> {
        let result = check_fail(self.fail_marker, sql);
        self.log.lock().push(format!("exec: {sql}"));
        result
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>> {
        self.log.lock().push("begin".into());
        Ok(Box::new(MockTransaction {
            log: self.log.clone(),
            fail_marker: self.fail_marker,
        }))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

struct MockTransaction {
    log: Arc<Mutex<Vec<String>>>,
    fail_marker: Option<&'static str>,
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn execute(&mut self, sql: &str) -> Result<StatementResult> {
        let result = check_fail(self.fail_marker, sql);
        self.log.lock().push(format!("txn: {sql}"));
        result
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.log.lock().push("commit".into());
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.log.lock().push("rollback".into());
        Ok(())
    }
}

fn runner() -> ScriptRunner {
    ScriptRunner::new(EditOptions::default())
}

#[tokio::test]
async fn test_refuses_disconnected_session() {
    let mut engine = MockEngine::new();
    engine.connected = false;
    let result = runner()
        .run(&engine, &[], &ObjectCache::new(), &CancelToken::new())
        .await;
    assert!(matches!(result, Err(EditError::NotConnected(_))));
}

#[tokio::test]
async fn test_transactional_actions_share_one_transaction() {
    let engine = MockEngine::new();
    let actions = vec![
        PersistAction::new("Create table", "CREATE TABLE a ()"),
        PersistAction::new("Create table", "CREATE TABLE b ()"),
    ];

    let report = runner()
        .run(&engine, &actions, &ObjectCache::new(), &CancelToken::new())
        .await
        .unwrap();

    assert!(report.committed);
    assert_eq!(
        engine.log(),
        [
            "begin",
            "txn: CREATE TABLE a ()",
            "txn: CREATE TABLE b ()",
            "commit"
        ]
        .map(String::from)
    );
}

#[tokio::test]
async fn test_autonomous_action_runs_outside_transaction() {
    let engine = MockEngine::new();
    let actions = vec![
        PersistAction::autonomous("Create database", "CREATE DATABASE d"),
        PersistAction::new("Create table", "CREATE TABLE a ()"),
    ];

    let report = runner()
        .run(&engine, &actions, &ObjectCache::new(), &CancelToken::new())
        .await
        .unwrap();

    assert!(report.committed);
    assert_eq!(
        engine.log(),
        [
            "exec: CREATE DATABASE d",
            "begin",
            "txn: CREATE TABLE a ()",
            "commit"
        ]
        .map(String::from)
    );
}

#[tokio::test]
async fn test_avoid_transactions_runs_auto_commit() {
    let engine = MockEngine::new();
    let actions = vec![PersistAction::new("Create table", "CREATE TABLE a ()")];
    let runner = ScriptRunner::new(EditOptions {
        avoid_transactions: true,
        ..EditOptions::default()
    });

    let report = runner
        .run(&engine, &actions, &ObjectCache::new(), &CancelToken::new())
        .await
        .unwrap();

    assert!(report.committed);
    assert_eq!(engine.log(), ["exec: CREATE TABLE a ()".to_string()]);
}

#[tokio::test]
async fn test_fatal_failure_rolls_back_and_skips_rest() {
    let engine = MockEngine::failing_on("boom");
    let actions = vec![
        PersistAction::new("Create table", "CREATE TABLE a ()"),
        PersistAction::new("Break", "boom"),
        PersistAction::new("Create table", "CREATE TABLE b ()"),
    ];

    let report = runner()
        .run(&engine, &actions, &ObjectCache::new(), &CancelToken::new())
        .await
        .unwrap();

    assert!(!report.committed);
    assert_eq!(report.entries.len(), 3);
    assert!(report.entries[0].executed);
    assert!(!report.entries[1].executed);
    assert!(report.entries[1].error.is_some());
    assert!(!report.entries[2].executed);
    assert_eq!(report.entries[2].error, None);
    assert_eq!(
        engine.log(),
        ["begin", "txn: CREATE TABLE a ()", "txn: boom", "rollback"].map(String::from)
    );
}

#[tokio::test]
async fn test_finalizer_runs_after_fatal_failure() {
    let engine = MockEngine::failing_on("boom");
    let actions = vec![
        PersistAction::new("Break", "boom"),
        PersistAction::finalizer("Cleanup", "DROP TABLE scratch"),
    ];

    let report = runner()
        .run(&engine, &actions, &ObjectCache::new(), &CancelToken::new())
        .await
        .unwrap();

    assert!(!report.committed);
    assert!(report.entries[1].executed);
    assert_eq!(
        engine.log(),
        ["begin", "txn: boom", "rollback", "exec: DROP TABLE scratch"].map(String::from)
    );
}

#[tokio::test]
async fn test_optional_failure_continues() {
    let engine = MockEngine::failing_on("boom");
    let actions = vec![
        PersistAction::optional("Comment", "boom"),
        PersistAction::new("Create table", "CREATE TABLE a ()"),
    ];

    let report = runner()
        .run(&engine, &actions, &ObjectCache::new(), &CancelToken::new())
        .await
        .unwrap();

    assert!(report.committed);
    assert!(!report.entries[0].executed);
    assert!(report.entries[1].executed);
    assert!(report.first_error().is_some());
}

#[tokio::test]
async fn test_cache_effects_apply_only_on_success() {
    let engine = MockEngine::failing_on("boom");
    let cache = ObjectCache::new();
    let schema = ObjectRef::top_level("public", ObjectKind::Schema);
    cache.populate(&schema, Vec::<String>::new());

    let actions = vec![
        PersistAction::new("Create table", "CREATE TABLE a ()").with_effect(
            CacheEffect::InsertName {
                container: schema.clone(),
                name: "a".into(),
            },
        ),
        PersistAction::optional("Break", "boom").with_effect(CacheEffect::InsertName {
            container: schema.clone(),
            name: "b".into(),
        }),
    ];

    runner()
        .run(&engine, &actions, &cache, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(cache.contains(&schema, "a"), Some(true));
    assert_eq!(cache.contains(&schema, "b"), Some(false));
}

#[tokio::test]
async fn test_cancellation_rolls_back() {
    let engine = MockEngine::new();
    let cancel = CancelToken::new();
    let actions = vec![PersistAction::new("Create table", "CREATE TABLE a ()")];
    cancel.cancel();

    let result = runner()
        .run(&engine, &actions, &ObjectCache::new(), &cancel)
        .await;

    assert!(matches!(result, Err(EditError::Cancelled)));
    assert!(engine.log().is_empty());
}

#[tokio::test]
async fn test_preview_script_is_refused() {
    let engine = MockEngine::new();
    let runner = ScriptRunner::new(EditOptions {
        ddl_only_preview: true,
        ..EditOptions::default()
    });

    let result = runner
        .run(&engine, &[], &ObjectCache::new(), &CancelToken::new())
        .await;
    assert!(matches!(result, Err(EditError::Other(_))));
}
