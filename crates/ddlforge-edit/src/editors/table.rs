//! Table editor

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::{quote_literal, quote_qualified};
use crate::{CacheEffect, Command, PersistAction};
use ddlforge_core::{DialectFeature, Result};

pub struct TableEditor;

impl TableEditor {
    /// Best-effort verbatim DDL: when the edit carries a full definition
    /// (e.g. copied from an existing table), use it as-is if it looks
    /// like table DDL, otherwise fall back to synthesis.
    fn verbatim_definition(command: &Command) -> Option<String> {
        let definition = command.properties.new_str("definition")?;
        if definition.to_uppercase().contains("CREATE TABLE") {
            return Some(definition.trim().to_string());
        }
        tracing::warn!(
            table = %command.target.qualified_name(),
            "stored definition is not table DDL, synthesizing CREATE TABLE"
        );
        None
    }

    fn insert_effect(command: &Command) -> Option<CacheEffect> {
        cache_container(&command.target).map(|container| CacheEffect::InsertName {
            container,
            name: command.target.name.clone(),
        })
    }
}

impl ObjectEditor for TableEditor {
    fn create_actions(
        &self,
        command: &Command,
        nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let quoted = quote_qualified(ctx.dialect, &command.target);

        let sql = match Self::verbatim_definition(command) {
            Some(definition) => definition,
            None if nested.is_empty() => format!("CREATE TABLE {} ()", quoted),
            None => format!("CREATE TABLE {} (\n  {}\n)", quoted, nested.join(",\n  ")),
        };

        let mut action = PersistAction::new(&command.title, sql);
        if let Some(effect) = Self::insert_effect(command) {
            action = action.with_effect(effect);
        }
        let mut actions = vec![action];

        if let Some(tablespace) = command.properties.new_str("tablespace") {
            actions.push(PersistAction::new(
                "Set tablespace",
                format!(
                    "ALTER TABLE {} SET TABLESPACE {}",
                    quoted,
                    ctx.dialect.quote_identifier(tablespace)
                ),
            ));
        }
        Ok(actions)
    }

    fn modify_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let quoted = quote_qualified(ctx.dialect, &command.target);
        let mut actions = Vec::new();
        for (id, delta) in command.properties.iter() {
            match id.as_str() {
                "tablespace" => {
                    if let Some(tablespace) = delta.new.as_ref().and_then(|v| v.as_str()) {
                        actions.push(PersistAction::new(
                            "Set tablespace",
                            format!(
                                "ALTER TABLE {} SET TABLESPACE {}",
                                quoted,
                                ctx.dialect.quote_identifier(tablespace)
                            ),
                        ));
                    }
                }
                // Comments are emitted by extra_actions.
                "comment" => {}
                other => {
                    tracing::warn!(
                        table = %command.target.qualified_name(),
                        property = other,
                        "no ALTER TABLE form for property, skipping"
                    );
                }
            }
        }
        Ok(actions)
    }

    fn delete_actions(
        &self,
        command: &Command,
        cascade: bool,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let quoted = quote_qualified(ctx.dialect, &command.target);
        let cascade_kw = if cascade && ctx.dialect.supports(DialectFeature::DropCascade) {
            " CASCADE"
        } else {
            ""
        };
        let mut action =
            PersistAction::new(&command.title, format!("DROP TABLE {}{}", quoted, cascade_kw));
        if let Some(container) = cache_container(&command.target) {
            action = action.with_effect(CacheEffect::RemoveName {
                container,
                name: command.target.name.clone(),
            });
        }
        Ok(vec![action])
    }

    fn rename_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let (old_name, new_name) = match &command.kind {
            crate::CommandKind::Rename { old_name, new_name } => (old_name, new_name),
            _ => unreachable!("rename_actions called for non-rename command"),
        };
        let quoted = quote_qualified(ctx.dialect, &command.target);
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "ALTER TABLE {} RENAME TO {}",
                quoted,
                ctx.dialect.quote_identifier(new_name)
            ),
        );
        if let Some(container) = cache_container(&command.target) {
            action = action.with_effect(CacheEffect::Rename {
                container,
                old: old_name.clone(),
                new: new_name.clone(),
            });
        }
        Ok(vec![action])
    }

    fn extra_actions(&self, command: &Command, ctx: &EditorContext) -> Result<Vec<PersistAction>> {
        if !ctx.options.emit_comments || !ctx.dialect.supports(DialectFeature::CommentOn) {
            return Ok(Vec::new());
        }
        let Some(comment) = command.properties.new_str("comment") else {
            return Ok(Vec::new());
        };
        let quoted = quote_qualified(ctx.dialect, &command.target);
        Ok(vec![PersistAction::optional(
            "Comment on table",
            format!("COMMENT ON TABLE {} IS {}", quoted, quote_literal(comment)),
        )])
    }
}
