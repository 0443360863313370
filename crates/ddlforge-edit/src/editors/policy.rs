//! Row-level security policy editor

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::quoted_owner_table;
use crate::{CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{EditError, Result};

pub struct PolicyEditor;

impl ObjectEditor for PolicyEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if matches!(command.kind, CommandKind::Create { .. })
            && command.properties.new_str("using").is_none()
            && command.properties.new_str("with_check").is_none()
        {
            return Err(EditError::validation(
                command.target.qualified_name(),
                "policy requires a USING or WITH CHECK expression",
            ));
        }
        Ok(())
    }

    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let table = quoted_owner_table(ctx.dialect, command)?;
        let mut sql = format!(
            "CREATE POLICY {} ON {}",
            ctx.dialect.quote_identifier(&command.target.name),
            table
        );
        if let Some(operation) = command.properties.new_str("operation") {
            sql.push_str(&format!(" FOR {}", operation));
        }
        if let Some(roles) = command.properties.new_str("roles") {
            sql.push_str(&format!(" TO {}", roles));
        }
        if let Some(using) = command.properties.new_str("using") {
            sql.push_str(&format!(" USING ({})", using));
        }
        if let Some(check) = command.properties.new_str("with_check") {
            sql.push_str(&format!(" WITH CHECK ({})", check));
        }
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
        let table = quoted_owner_table(ctx.dialect, command)?;
        let mut sql = format!(
            "ALTER POLICY {} ON {}",
            ctx.dialect.quote_identifier(&command.target.name),
            table
        );
        let mut changed = false;
        if let Some(roles) = command.properties.new_str("roles") {
            sql.push_str(&format!(" TO {}", roles));
            changed = true;
        }
        if let Some(using) = command.properties.new_str("using") {
            sql.push_str(&format!(" USING ({})", using));
            changed = true;
        }
        if let Some(check) = command.properties.new_str("with_check") {
            sql.push_str(&format!(" WITH CHECK ({})", check));
            changed = true;
        }
        if !changed {
            return Ok(Vec::new());
        }
        Ok(vec![PersistAction::new(&command.title, sql)])
    }

    fn delete_actions(
        &self,
        command: &Command,
        _cascade: bool,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "DROP POLICY {} ON {}",
                ctx.dialect.quote_identifier(&command.target.name),
                quoted_owner_table(ctx.dialect, command)?
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
                "ALTER POLICY {} ON {} RENAME TO {}",
                ctx.dialect.quote_identifier(old_name),
                quoted_owner_table(ctx.dialect, command)?,
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
