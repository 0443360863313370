//! Procedure and function editor

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::quote_qualified;
use crate::{CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{DialectFeature, EditError, Result};

/// Procedures carry their whole body as a verbatim "definition" property;
/// the editor only decides between CREATE and CREATE OR REPLACE and
/// renders the drop/rename forms.
pub struct ProcedureEditor;

impl ProcedureEditor {
    fn definition<'a>(command: &'a Command) -> Result<&'a str> {
        command.properties.new_str("definition").ok_or_else(|| {
            EditError::validation(command.target.qualified_name(), "procedure requires a definition")
        })
    }
}

impl ObjectEditor for ProcedureEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if matches!(command.kind, CommandKind::Create { .. } | CommandKind::Modify) {
            Self::definition(command)?;
        }
        Ok(())
    }

    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let definition = Self::definition(command)?;
        let sql = if ctx.dialect.supports(DialectFeature::CreateOrReplace)
            && !definition.to_uppercase().contains("CREATE OR REPLACE")
        {
            definition.replacen("CREATE ", "CREATE OR REPLACE ", 1)
        } else {
            definition.to_string()
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
        if ctx.dialect.supports(DialectFeature::CreateOrReplace) {
            // CREATE OR REPLACE covers body edits in place.
            let mut actions = self.create_actions(command, &[], ctx)?;
            for action in &mut actions {
                action.on_success.clear();
            }
            Ok(actions)
        } else {
            let mut actions = self.delete_actions(command, false, ctx)?;
            for action in &mut actions {
                action.on_success.clear();
            }
            actions.extend(self.create_actions(command, &[], ctx)?);
            Ok(actions)
        }
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
                "DROP PROCEDURE {}{}",
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
                "ALTER PROCEDURE {} RENAME TO {}",
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
