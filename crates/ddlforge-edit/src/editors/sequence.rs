//! Sequence editor

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::quote_qualified;
use crate::{CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{DialectFeature, Result};

pub struct SequenceEditor;

impl SequenceEditor {
    /// INCREMENT BY / START WITH / MINVALUE / MAXVALUE clauses for the
    /// properties present on the command.
    fn option_clauses(command: &Command) -> String {
        let mut clauses = String::new();
        if let Some(increment) = command.properties.new_value("increment_by") {
            clauses.push_str(&format!(" INCREMENT BY {}", increment));
        }
        if let Some(start) = command.properties.new_value("start_with") {
            clauses.push_str(&format!(" START WITH {}", start));
        }
        if let Some(min) = command.properties.new_value("min_value") {
            clauses.push_str(&format!(" MINVALUE {}", min));
        }
        if let Some(max) = command.properties.new_value("max_value") {
            clauses.push_str(&format!(" MAXVALUE {}", max));
        }
        clauses
    }
}

impl ObjectEditor for SequenceEditor {
    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let quoted = quote_qualified(ctx.dialect, &command.target);
        let mut action = PersistAction::new(
            &command.title,
            format!("CREATE SEQUENCE {}{}", quoted, Self::option_clauses(command)),
        );
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
        let clauses = Self::option_clauses(command);
        if clauses.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "ALTER SEQUENCE {}{}",
                quote_qualified(ctx.dialect, &command.target),
                clauses
            ),
        )])
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
                "DROP SEQUENCE {}{}",
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
                "ALTER SEQUENCE {} RENAME TO {}",
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
