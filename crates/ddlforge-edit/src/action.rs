//! Persist actions
//!
//! One `PersistAction` is one renderable, executable unit of generated
//! DDL. Actions are created fresh on every compile and never persisted
//! across sessions.

use ddlforge_model::ObjectRef;
use serde::{Deserialize, Serialize};

/// Transaction scope of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionScope {
    /// Runs inside the enclosing script transaction.
    #[default]
    Transactional,
    /// Runs in its own implicit transaction boundary, outside the
    /// enclosing batch (e.g. CREATE DATABASE). Never rolled back by a
    /// later action's failure.
    Autonomous,
}

/// Failure policy of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionKind {
    /// Failure aborts the remaining script.
    #[default]
    Normal,
    /// Failure is logged and the script continues.
    Optional,
    /// Executes even after an earlier action failed.
    Finalizer,
}

/// Cache bookkeeping applied after an action executes successfully.
///
/// Declarative rather than closure-based so compiled scripts stay
/// inspectable and the runner stays testable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheEffect {
    /// Evict a container; next access reloads it.
    Invalidate(ObjectRef),
    /// Record a newly created child name.
    InsertName { container: ObjectRef, name: String },
    /// Forget a dropped child name.
    RemoveName { container: ObjectRef, name: String },
    /// Apply a rename to the cached name set.
    Rename {
        container: ObjectRef,
        old: String,
        new: String,
    },
}

/// One renderable unit of DDL plus its execution policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistAction {
    /// Human-readable title for progress display; carries no semantic
    /// weight for compilation.
    pub title: String,
    /// The DDL statement text.
    pub sql: String,
    pub scope: ActionScope,
    pub kind: ActionKind,
    /// Applied by the runner only after this action succeeds.
    pub on_success: Vec<CacheEffect>,
}

impl PersistAction {
    pub fn new(title: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sql: sql.into(),
            scope: ActionScope::Transactional,
            kind: ActionKind::Normal,
            on_success: Vec::new(),
        }
    }

    /// An action that must run outside the enclosing transaction.
    pub fn autonomous(title: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            scope: ActionScope::Autonomous,
            ..Self::new(title, sql)
        }
    }

    /// An action whose failure does not abort the script.
    pub fn optional(title: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Optional,
            ..Self::new(title, sql)
        }
    }

    /// An action that runs even after an earlier failure.
    pub fn finalizer(title: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Finalizer,
            ..Self::new(title, sql)
        }
    }

    pub fn with_effect(mut self, effect: CacheEffect) -> Self {
        self.on_success.push(effect);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlforge_model::ObjectKind;

    #[test]
    fn test_constructors_set_policy() {
        let a = PersistAction::new("Create table", "CREATE TABLE t ()");
        assert_eq!(a.scope, ActionScope::Transactional);
        assert_eq!(a.kind, ActionKind::Normal);

        let b = PersistAction::autonomous("Create database", "CREATE DATABASE d");
        assert_eq!(b.scope, ActionScope::Autonomous);

        let c = PersistAction::optional("Comment", "COMMENT ON TABLE t IS 'x'");
        assert_eq!(c.kind, ActionKind::Optional);
    }

    #[test]
    fn test_with_effect_accumulates() {
        let schema = ObjectRef::top_level("public", ObjectKind::Schema);
        let action = PersistAction::new("Create table", "CREATE TABLE t ()")
            .with_effect(CacheEffect::InsertName {
                container: schema.clone(),
                name: "t".into(),
            })
            .with_effect(CacheEffect::Invalidate(schema));
        assert_eq!(action.on_success.len(), 2);
    }
}
