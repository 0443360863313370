//! Execution engine seam
//!
//! The schema-change engine never talks to a database directly. Compiled
//! scripts are played against these traits; the application wires in a
//! driver-backed implementation per connection.

use crate::Result;
use async_trait::async_trait;

/// Result of executing one DDL statement
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementResult {
    /// Rows affected, when the driver reports it (0 for most DDL)
    pub rows_affected: u64,
}

/// A live database session that can execute DDL statements.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Execute a single statement in auto-commit mode.
    async fn execute(&self, sql: &str) -> Result<StatementResult>;

    /// Begin an explicit transaction.
    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>>;

    /// Whether the underlying session is still connected.
    fn is_connected(&self) -> bool;
}

/// An open transaction on an execution engine.
///
/// Dropping a transaction without calling [`Transaction::commit`] or
/// [`Transaction::rollback`] leaves the disposition to the driver,
/// which typically rolls back.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Execute a statement inside this transaction.
    async fn execute(&mut self, sql: &str) -> Result<StatementResult>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
