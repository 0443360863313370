//! Editors for container-level objects: databases, schemas, tablespaces,
//! extensions and foreign servers
//!
//! These share one statement shape (`CREATE <KEYWORD> <name>` /
//! `DROP <KEYWORD> <name>` / `ALTER <KEYWORD> <name> RENAME TO <new>`);
//! database DDL additionally runs outside the script transaction on
//! dialects that require it.

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::{ActionScope, CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{DialectFeature, Result};

/// One CREATE/DROP/RENAME statement family keyed by keyword.
struct SimpleDdl {
    keyword: &'static str,
    /// Whether this object's DDL must escape the enclosing transaction.
    autonomous: bool,
}

impl SimpleDdl {
    fn scope(&self, ctx: &EditorContext) -> ActionScope {
        if self.autonomous && ctx.dialect.supports(DialectFeature::AtomicDatabaseDdl) {
            ActionScope::Autonomous
        } else {
            ActionScope::Transactional
        }
    }

    fn action(&self, title: &str, sql: String, ctx: &EditorContext) -> PersistAction {
        let mut action = PersistAction::new(title, sql);
        action.scope = self.scope(ctx);
        action
    }

    fn create(&self, command: &Command, ctx: &EditorContext) -> Vec<PersistAction> {
        let mut action = self.action(
            &command.title,
            format!(
                "CREATE {} {}",
                self.keyword,
                ctx.dialect.quote_identifier(&command.target.name)
            ),
            ctx,
        );
        if let Some(container) = cache_container(&command.target) {
            action = action.with_effect(CacheEffect::InsertName {
                container,
                name: command.target.name.clone(),
            });
        }
        vec![action]
    }

    fn delete(&self, command: &Command, cascade: bool, ctx: &EditorContext) -> Vec<PersistAction> {
        let cascade_kw = if cascade && ctx.dialect.supports(DialectFeature::DropCascade) {
            " CASCADE"
        } else {
            ""
        };
        let mut action = self.action(
            &command.title,
            format!(
                "DROP {} {}{}",
                self.keyword,
                ctx.dialect.quote_identifier(&command.target.name),
                cascade_kw
            ),
            ctx,
        );
        if let Some(container) = cache_container(&command.target) {
            action = action.with_effect(CacheEffect::RemoveName {
                container,
                name: command.target.name.clone(),
            });
        }
        vec![action]
    }

    fn rename(&self, command: &Command, ctx: &EditorContext) -> Vec<PersistAction> {
        let (old_name, new_name) = match &command.kind {
            CommandKind::Rename { old_name, new_name } => (old_name.clone(), new_name.clone()),
            _ => unreachable!("rename called for non-rename command"),
        };
        let mut action = self.action(
            &command.title,
            format!(
                "ALTER {} {} RENAME TO {}",
                self.keyword,
                ctx.dialect.quote_identifier(&old_name),
                ctx.dialect.quote_identifier(&new_name)
            ),
            ctx,
        );
        if let Some(container) = cache_container(&command.target) {
            action = action.with_effect(CacheEffect::Rename {
                container,
                old: old_name,
                new: new_name,
            });
        }
        vec![action]
    }
}

macro_rules! simple_editor {
    ($name:ident, $keyword:literal, $autonomous:literal) => {
        pub struct $name;

        impl ObjectEditor for $name {
            fn create_actions(
                &self,
                command: &Command,
                _nested: &[String],
                ctx: &EditorContext,
            ) -> Result<Vec<PersistAction>> {
                Ok(SimpleDdl {
                    keyword: $keyword,
                    autonomous: $autonomous,
                }
                .create(command, ctx))
            }

            fn modify_actions(
                &self,
                command: &Command,
                _ctx: &EditorContext,
            ) -> Result<Vec<PersistAction>> {
                tracing::warn!(
                    target = %command.target.qualified_name(),
                    "no ALTER form for changed properties, skipping"
                );
                Ok(Vec::new())
            }

            fn delete_actions(
                &self,
                command: &Command,
                cascade: bool,
                ctx: &EditorContext,
            ) -> Result<Vec<PersistAction>> {
                Ok(SimpleDdl {
                    keyword: $keyword,
                    autonomous: $autonomous,
                }
                .delete(command, cascade, ctx))
            }

            fn rename_actions(
                &self,
                command: &Command,
                ctx: &EditorContext,
            ) -> Result<Vec<PersistAction>> {
                Ok(SimpleDdl {
                    keyword: $keyword,
                    autonomous: $autonomous,
                }
                .rename(command, ctx))
            }
        }
    };
}

simple_editor!(DatabaseEditor, "DATABASE", true);
simple_editor!(SchemaEditor, "SCHEMA", false);
simple_editor!(TablespaceEditor, "TABLESPACE", true);
simple_editor!(ExtensionEditor, "EXTENSION", false);
simple_editor!(ForeignServerEditor, "SERVER", false);
