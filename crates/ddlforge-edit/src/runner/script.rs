use crate::context::EditOptions;
use crate::{ActionKind, ActionScope, CacheEffect, PersistAction};
use ddlforge_core::{CancelToken, EditError, ExecutionEngine, Result, Transaction};
use ddlforge_model::ObjectCache;

/// Outcome of one attempted action.
#[derive(Debug, Clone)]
pub struct RunEntry {
    pub title: String,
    /// Whether the statement executed successfully.
    pub executed: bool,
    pub error: Option<String>,
}

/// Outcome of one script run. A fatal action failure does not surface as
/// an `Err`; it is recorded in `entries` and `committed` stays false so
/// callers keep the partial execution record.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub entries: Vec<RunEntry>,
    pub committed: bool,
}

impl RunReport {
    /// First recorded action error, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|e| e.error.as_deref())
    }
}

/// Plays compiled actions against a live session.
pub struct ScriptRunner {
    options: EditOptions,
}

impl ScriptRunner {
    pub fn new(options: EditOptions) -> Self {
        Self { options }
    }

    /// Run the script. Transactional actions share one lazily-opened
    /// transaction; autonomous actions run auto-commit outside it and are
    /// never rolled back by a later failure. A Normal action failure rolls
    /// the transaction back and skips everything but finalizers.
    pub async fn run(
        &self,
        engine: &dyn ExecutionEngine,
        actions: &[PersistAction],
        cache: &ObjectCache,
        cancel: &CancelToken,
    ) -> Result<RunReport> {
        if self.options.ddl_only_preview {
            return Err(EditError::Other(
                "script was compiled for preview only".into(),
            ));
        }
        if !engine.is_connected() {
            return Err(EditError::NotConnected(
                "session is not connected".into(),
            ));
        }

        let mut report = RunReport::default();
        let mut txn: Option<Box<dyn Transaction>> = None;
        let mut failed = false;

        for action in actions {
            if cancel.is_cancelled() {
                Self::rollback(txn.take()).await;
                return Err(EditError::Cancelled);
            }
            if failed && action.kind != ActionKind::Finalizer {
                report.entries.push(RunEntry {
                    title: action.title.clone(),
                    executed: false,
                    error: None,
                });
                continue;
            }

            tracing::debug!(title = %action.title, sql = %action.sql, "executing action");
            let result = match action.scope {
                ActionScope::Autonomous => engine.execute(&action.sql).await,
                ActionScope::Transactional if self.options.avoid_transactions || failed => {
                    // Finalizers after a rollback run auto-commit.
                    engine.execute(&action.sql).await
                }
                ActionScope::Transactional => {
                    if txn.is_none() {
                        txn = Some(engine.begin_transaction().await?);
                    }
                    match txn.as_mut() {
                        Some(tx) => tx.execute(&action.sql).await,
                        None => unreachable!("transaction was just opened"),
                    }
                }
            };

            match result {
                Ok(_) => {
                    report.entries.push(RunEntry {
                        title: action.title.clone(),
                        executed: true,
                        error: None,
                    });
                    Self::apply_effects(cache, &action.on_success);
                }
                Err(e) => {
                    report.entries.push(RunEntry {
                        title: action.title.clone(),
                        executed: false,
                        error: Some(e.to_string()),
                    });
                    match action.kind {
                        ActionKind::Optional | ActionKind::Finalizer => {
                            tracing::warn!(title = %action.title, error = %e, "optional action failed, continuing");
                        }
                        ActionKind::Normal => {
                            tracing::warn!(title = %action.title, error = %e, "action failed, aborting script");
                            Self::rollback(txn.take()).await;
                            failed = true;
                        }
                    }
                }
            }
        }

        if failed {
            return Ok(report);
        }
        match txn {
            Some(txn) => match txn.commit().await {
                Ok(()) => report.committed = true,
                Err(e) => {
                    tracing::warn!(error = %e, "commit failed");
                }
            },
            None => report.committed = true,
        }
        Ok(report)
    }

    async fn rollback(txn: Option<Box<dyn Transaction>>) {
        if let Some(txn) = txn {
            if let Err(e) = txn.rollback().await {
                tracing::warn!(error = %e, "rollback failed");
            }
        }
    }

    fn apply_effects(cache: &ObjectCache, effects: &[CacheEffect]) {
        for effect in effects {
            match effect {
                CacheEffect::Invalidate(container) => cache.invalidate(container),
                CacheEffect::InsertName { container, name } => {
                    cache.insert_name(container, name)
                }
                CacheEffect::RemoveName { container, name } => {
                    cache.remove_name(container, name)
                }
                CacheEffect::Rename {
                    container,
                    old,
                    new,
                } => cache.rename(container, old, new),
            }
        }
    }
}
