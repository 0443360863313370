//! Composite/enum type editor

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::{quote_literal, quote_qualified};
use crate::{CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{DialectFeature, EditError, Result};

pub struct DataTypeEditor;

impl DataTypeEditor {
    fn create_statement(command: &Command, ctx: &EditorContext) -> Result<String> {
        if let Some(definition) = command.properties.new_str("definition") {
            return Ok(definition.to_string());
        }
        let quoted = quote_qualified(ctx.dialect, &command.target);
        if let Some(values) = command.properties.new_value("values").and_then(|v| v.as_array()) {
            let labels: Vec<String> = values
                .iter()
                .filter_map(|v| v.as_str())
                .map(quote_literal)
                .collect();
            return Ok(format!("CREATE TYPE {} AS ENUM ({})", quoted, labels.join(", ")));
        }
        Err(EditError::validation(
            command.target.qualified_name(),
            "type requires a definition or enum values",
        ))
    }
}

impl ObjectEditor for DataTypeEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if matches!(command.kind, CommandKind::Create { .. }) {
            Self::create_statement(command, ctx)?;
        }
        Ok(())
    }

    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let mut action =
            PersistAction::new(&command.title, Self::create_statement(command, ctx)?);
        if let Some(container) = cache_container(&command.target) {
            action = action.with_effect(CacheEffect::InsertName {
                container,
                name: command.target.name.clone(),
            });
        }
        Ok(vec![action])
    }

    fn modify_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        // ALTER TYPE only covers label additions; anything else is a
        // drop-and-recreate performed by the caller as two commands.
        let mut actions = Vec::new();
        if let Some(values) = command.properties.new_value("add_values").and_then(|v| v.as_array())
        {
            let quoted = quote_qualified(ctx.dialect, &command.target);
            for label in values.iter().filter_map(|v| v.as_str()) {
                actions.push(PersistAction::new(
                    &command.title,
                    format!("ALTER TYPE {} ADD VALUE {}", quoted, quote_literal(label)),
                ));
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
        let cascade_kw = if cascade && ctx.dialect.supports(DialectFeature::DropCascade) {
            " CASCADE"
        } else {
            ""
        };
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "DROP TYPE {}{}",
                quote_qualified(ctx.dialect, &command.target),
                cascade_kw
            ),
        );
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
            CommandKind::Rename { old_name, new_name } => (old_name, new_name),
            _ => unreachable!("rename_actions called for non-rename command"),
        };
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "ALTER TYPE {} RENAME TO {}",
                quote_qualified(ctx.dialect, &command.target),
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
}
