//! Trigger and event-trigger editor

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::quoted_owner_table;
use crate::{CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{EditError, Result};
use ddlforge_model::ObjectKind;

/// Handles both table triggers and database-level event triggers. The
/// two share validation and rename handling; statement shapes differ.
pub struct TriggerEditor;

impl TriggerEditor {
    fn is_event_trigger(command: &Command) -> bool {
        command.target.kind == ObjectKind::EventTrigger
    }

    /// Full CREATE statement for a table trigger. A verbatim "definition"
    /// property wins; otherwise the statement is assembled from the
    /// timing/event/function properties.
    fn create_statement(command: &Command, ctx: &EditorContext) -> Result<String> {
        if let Some(definition) = command.properties.new_str("definition") {
            return Ok(definition.to_string());
        }
        let timing = command
            .properties
            .new_str("timing")
            .unwrap_or("AFTER");
        let event = command.properties.new_str("event").ok_or_else(|| {
            EditError::validation(command.target.qualified_name(), "trigger requires an event")
        })?;
        let function = command.properties.new_str("function").ok_or_else(|| {
            EditError::validation(command.target.qualified_name(), "trigger requires a function")
        })?;
        let table = quoted_owner_table(ctx.dialect, command)?;
        let for_each = command
            .properties
            .new_str("for_each")
            .unwrap_or("ROW");
        Ok(format!(
            "CREATE TRIGGER {} {} {} ON {} FOR EACH {} EXECUTE FUNCTION {}()",
            ctx.dialect.quote_identifier(&command.target.name),
            timing,
            event,
            table,
            for_each,
            function
        ))
    }

    fn create_event_statement(command: &Command, ctx: &EditorContext) -> Result<String> {
        if let Some(definition) = command.properties.new_str("definition") {
            return Ok(definition.to_string());
        }
        let event = command.properties.new_str("event").ok_or_else(|| {
            EditError::validation(command.target.qualified_name(), "event trigger requires an event")
        })?;
        let function = command.properties.new_str("function").ok_or_else(|| {
            EditError::validation(command.target.qualified_name(), "event trigger requires a function")
        })?;
        Ok(format!(
            "CREATE EVENT TRIGGER {} ON {} EXECUTE FUNCTION {}()",
            ctx.dialect.quote_identifier(&command.target.name),
            event,
            function
        ))
    }
}

impl ObjectEditor for TriggerEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if matches!(command.kind, CommandKind::Create { .. })
            && command.properties.new_str("definition").is_none()
        {
            if Self::is_event_trigger(command) {
                Self::create_event_statement(command, ctx)?;
            } else {
                Self::create_statement(command, ctx)?;
            }
        }
        Ok(())
    }

    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let sql = if Self::is_event_trigger(command) {
            Self::create_event_statement(command, ctx)?
        } else {
            Self::create_statement(command, ctx)?
        };
        let mut action = PersistAction::new(&command.title, sql);
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
        // No ALTER TRIGGER form covers body changes; drop and recreate.
        let mut actions = self.delete_actions(command, false, ctx)?;
        actions.extend(self.create_actions(command, &[], ctx)?);
        Ok(actions)
    }

    fn delete_actions(
        &self,
        command: &Command,
        _cascade: bool,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let sql = if Self::is_event_trigger(command) {
            format!(
                "DROP EVENT TRIGGER {}",
                ctx.dialect.quote_identifier(&command.target.name)
            )
        } else {
            format!(
                "DROP TRIGGER {} ON {}",
                ctx.dialect.quote_identifier(&command.target.name),
                quoted_owner_table(ctx.dialect, command)?
            )
        };
        let mut action = PersistAction::new(&command.title, sql);
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
        let sql = if Self::is_event_trigger(command) {
            format!(
                "ALTER EVENT TRIGGER {} RENAME TO {}",
                ctx.dialect.quote_identifier(old_name),
                ctx.dialect.quote_identifier(new_name)
            )
        } else {
            format!(
                "ALTER TRIGGER {} ON {} RENAME TO {}",
                ctx.dialect.quote_identifier(old_name),
                quoted_owner_table(ctx.dialect, command)?,
                ctx.dialect.quote_identifier(new_name)
            )
        };
        let mut action = PersistAction::new(&command.title, sql);
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
