//! Command context
//!
//! Session-scoped queue of pending structural edits. Commands accumulate
//! through [`CommandContext::submit`], fold at submit time where the edit
//! is trivially redundant, and compile into an ordered DDL script on
//! save. The context also keeps the undo/redo stacks for unsaved edits.

use crate::compiler::compile_script;
use crate::editor::{cache_container, editor_for, EditorContext};
use crate::merge;
use crate::{Command, CommandKind, PersistAction};
use ddlforge_core::{CancelToken, DialectInfo, EditError, Result};
use ddlforge_model::{ObjectCache, ObjectRef};
use std::sync::Arc;
use uuid::Uuid;

/// Cross-cutting switches for one editing session.
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    /// Emit COMMENT ON statements for objects carrying a "comment"
    /// property.
    pub emit_comments: bool,
    /// Compile for preview only; the runner refuses scripts compiled in
    /// this mode.
    pub ddl_only_preview: bool,
    /// Run every action auto-commit instead of one enclosing transaction.
    pub avoid_transactions: bool,
    /// Treat every delete as cascading when the dialect supports it.
    pub cascade_on_delete: bool,
}

/// Session-scoped queue of pending edits.
pub struct CommandContext {
    session_id: Uuid,
    dialect: DialectInfo,
    cache: Arc<ObjectCache>,
    pending: Vec<Command>,
    undone: Vec<Command>,
    options: EditOptions,
    compiling: bool,
}

impl CommandContext {
    pub fn new(dialect: DialectInfo, cache: Arc<ObjectCache>, options: EditOptions) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            dialect,
            cache,
            pending: Vec::new(),
            undone: Vec::new(),
            options,
            compiling: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn dialect(&self) -> &DialectInfo {
        &self.dialect
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    pub fn cache(&self) -> &ObjectCache {
        &self.cache
    }

    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queue one edit. Trivially redundant edits fold in place: a second
    /// Create/Modify for the same target merges its property deltas into
    /// the earlier command, and a repeated Rename keeps the original old
    /// name and moves only the new one. Any submission discards the redo
    /// stack.
    pub fn submit(&mut self, command: Command) -> Result<()> {
        if self.compiling {
            return Err(EditError::Other(
                "cannot submit commands while a compile is in progress".into(),
            ));
        }
        self.undone.clear();
        if let Some(existing) = self
            .pending
            .iter_mut()
            .rev()
            .find(|c| c.is_same_target(&command) && c.kind.discriminant() == command.kind.discriminant())
        {
            match (&mut existing.kind, &command.kind) {
                (CommandKind::Create { .. }, CommandKind::Create { .. })
                | (CommandKind::Modify, CommandKind::Modify) => {
                    existing.properties.merge_from(&command.properties);
                    tracing::debug!(
                        session = %self.session_id,
                        target = %existing.target,
                        "folded repeated edit into pending command"
                    );
                    return Ok(());
                }
                (
                    CommandKind::Rename { new_name, .. },
                    CommandKind::Rename {
                        new_name: latest, ..
                    },
                ) => {
                    *new_name = latest.clone();
                    tracing::debug!(
                        session = %self.session_id,
                        target = %existing.target,
                        new_name = %latest,
                        "collapsed repeated rename"
                    );
                    return Ok(());
                }
                _ => {}
            }
        }
        tracing::debug!(
            session = %self.session_id,
            target = %command.target,
            title = %command.title,
            "queued command"
        );
        self.pending.push(command);
        Ok(())
    }

    /// Move the most recent pending command to the redo stack.
    pub fn undo_last(&mut self) -> Option<&Command> {
        let command = self.pending.pop()?;
        tracing::debug!(session = %self.session_id, title = %command.title, "undo");
        self.undone.push(command);
        self.undone.last()
    }

    /// Reapply the most recently undone command.
    pub fn redo(&mut self) -> Option<&Command> {
        let command = self.undone.pop()?;
        tracing::debug!(session = %self.session_id, title = %command.title, "redo");
        self.pending.push(command);
        self.pending.last()
    }

    /// Rename an object through the full validation pipeline: the new name
    /// must be non-empty, differ from the old one, and not collide with a
    /// cached sibling. Objects whose definition text embeds their own name
    /// also get an invalidation queued so the stale text is refetched
    /// after the script runs.
    pub fn rename_object(&mut self, target: &ObjectRef, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(EditError::validation(
                target.qualified_name(),
                "empty new name",
            ));
        }
        if new_name == target.name {
            return Err(EditError::validation(
                target.qualified_name(),
                "new name equals the old name",
            ));
        }
        if let Some(container) = cache_container(target) {
            if self.cache.contains(&container, new_name) == Some(true) {
                return Err(EditError::validation(
                    target.qualified_name(),
                    format!("{} {new_name} already exists", target.kind.display_name()),
                ));
            }
        }
        self.submit(Command::rename(target.clone(), new_name))?;
        if target.kind.has_body_definition() {
            self.submit(Command::invalidate(target.clone()))?;
        }
        Ok(())
    }

    /// Compile the pending queue into an executable script: merge, then
    /// validate every surviving command, then render in dependency order.
    /// The queue is left untouched; callers reset it after a successful
    /// run.
    pub fn compile(&mut self, cancel: &CancelToken) -> Result<Vec<PersistAction>> {
        self.compiling = true;
        let result = self.compile_inner(cancel);
        self.compiling = false;
        result
    }

    fn compile_inner(&self, cancel: &CancelToken) -> Result<Vec<PersistAction>> {
        cancel.check()?;
        let commands = merge::resolve(self.pending.clone());
        tracing::debug!(
            session = %self.session_id,
            submitted = self.pending.len(),
            merged = commands.len(),
            "merged pending commands"
        );
        let ctx = EditorContext {
            dialect: &self.dialect,
            options: &self.options,
            cache: &self.cache,
            cancel,
        };
        for command in &commands {
            cancel.check()?;
            editor_for(command.target.kind).validate(command, &ctx)?;
        }
        compile_script(&commands, &ctx, cancel)
    }

    /// Discard every pending and undone command.
    pub fn reset(&mut self) {
        tracing::debug!(
            session = %self.session_id,
            discarded = self.pending.len(),
            "reset command context"
        );
        self.pending.clear();
        self.undone.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlforge_model::ObjectKind;
    use serde_json::json;

    fn context() -> CommandContext {
        CommandContext::new(
            DialectInfo::postgres(),
            Arc::new(ObjectCache::new()),
            EditOptions::default(),
        )
    }

    fn table(name: &str) -> ObjectRef {
        ObjectRef::new(["public"], name, ObjectKind::Table)
    }

    #[test]
    fn test_submit_folds_repeated_modify() {
        let mut ctx = context();
        let users = table("users");
        ctx.submit(Command::modify(users.clone()).with_new_property("comment", json!("a")))
            .unwrap();
        ctx.submit(Command::modify(users).with_new_property("comment", json!("b")))
            .unwrap();
        assert_eq!(ctx.pending().len(), 1);
        assert_eq!(ctx.pending()[0].properties.new_str("comment"), Some("b"));
    }

    #[test]
    fn test_submit_collapses_repeated_rename() {
        let mut ctx = context();
        let users = table("users");
        ctx.submit(Command::rename(users.clone(), "people")).unwrap();
        ctx.submit(Command::rename(users, "accounts")).unwrap();
        assert_eq!(ctx.pending().len(), 1);
        match &ctx.pending()[0].kind {
            CommandKind::Rename { old_name, new_name } => {
                assert_eq!(old_name, "users");
                assert_eq!(new_name, "accounts");
            }
            other => panic!("expected rename, got {other:?}"),
        }
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut ctx = context();
        ctx.submit(Command::create(table("users"))).unwrap();
        ctx.submit(Command::create(table("orders"))).unwrap();

        assert_eq!(ctx.undo_last().unwrap().target.name, "orders");
        assert_eq!(ctx.pending().len(), 1);

        assert_eq!(ctx.redo().unwrap().target.name, "orders");
        assert_eq!(ctx.pending().len(), 2);
        assert!(ctx.redo().is_none());
    }

    #[test]
    fn test_submit_clears_redo_stack() {
        let mut ctx = context();
        ctx.submit(Command::create(table("users"))).unwrap();
        ctx.undo_last();
        ctx.submit(Command::create(table("orders"))).unwrap();
        assert!(ctx.redo().is_none());
        assert_eq!(ctx.pending().len(), 1);
    }

    #[test]
    fn test_rename_object_rejects_cached_duplicate() {
        let cache = Arc::new(ObjectCache::new());
        let schema = ObjectRef::top_level("public", ObjectKind::Schema);
        cache.populate(&schema, ["users", "orders"]);
        let mut ctx = CommandContext::new(
            DialectInfo::postgres(),
            cache,
            EditOptions::default(),
        );

        let err = ctx.rename_object(&table("users"), "orders").unwrap_err();
        assert!(matches!(err, EditError::Validation { .. }));
        assert!(!ctx.is_dirty());
    }

    #[test]
    fn test_rename_object_queues_invalidate_for_body_objects() {
        let mut ctx = context();
        let proc = ObjectRef::new(["public"], "audit", ObjectKind::Procedure);
        ctx.rename_object(&proc, "audit_v2").unwrap();
        assert_eq!(ctx.pending().len(), 2);
        assert!(matches!(ctx.pending()[1].kind, CommandKind::Invalidate));
    }

    #[test]
    fn test_compile_renders_pending_queue() {
        let mut ctx = context();
        ctx.submit(Command::create(table("users"))).unwrap();
        let actions = ctx.compile(&CancelToken::new()).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].sql, "CREATE TABLE \"public\".\"users\" ()");
        // The queue survives until the caller resets after a run.
        assert!(ctx.is_dirty());
    }

    #[test]
    fn test_compile_validation_aborts_whole_batch() {
        let mut ctx = context();
        ctx.submit(Command::create(table("users"))).unwrap();
        // A column with no data type fails validation, so nothing renders.
        ctx.submit(Command::create(
            table("users").child(ObjectKind::Column, "email"),
        ))
        .unwrap();

        let err = ctx.compile(&CancelToken::new()).unwrap_err();
        assert!(matches!(err, EditError::Validation { .. }));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut ctx = context();
        ctx.submit(Command::create(table("users"))).unwrap();
        ctx.undo_last();
        ctx.submit(Command::create(table("orders"))).unwrap();
        ctx.reset();
        assert!(!ctx.is_dirty());
        assert!(ctx.redo().is_none());
    }
}
