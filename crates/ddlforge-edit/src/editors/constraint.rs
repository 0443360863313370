//! Constraint and foreign key editor

use crate::editor::{EditorContext, ObjectEditor};
use crate::editors::quoted_owner_table;
use crate::{Command, CommandKind, PersistAction};
use ddlforge_core::{DialectFeature, EditError, Result};
use ddlforge_model::ObjectKind;

pub struct ConstraintEditor;

impl ConstraintEditor {
    /// `CONSTRAINT "name" <body>`. The body comes from an explicit
    /// definition property, or is assembled for foreign keys from the
    /// column/reference properties.
    fn declaration(command: &Command, ctx: &EditorContext) -> Result<String> {
        let name = ctx.dialect.quote_identifier(&command.target.name);
        if let Some(definition) = command.properties.new_str("definition") {
            return Ok(format!("CONSTRAINT {} {}", name, definition));
        }
        if command.target.kind == ObjectKind::ForeignKey {
            let columns = command.properties.new_str("columns").ok_or_else(|| {
                EditError::Generation(format!(
                    "foreign key {} has no source columns",
                    command.target.qualified_name()
                ))
            })?;
            let ref_table = command.properties.new_str("ref_table").ok_or_else(|| {
                EditError::Generation(format!(
                    "foreign key {} has no referenced table",
                    command.target.qualified_name()
                ))
            })?;
            let ref_columns = command.properties.new_str("ref_columns").unwrap_or(columns);
            let mut body = format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                name, columns, ref_table, ref_columns
            );
            if let Some(on_delete) = command.properties.new_str("on_delete") {
                body.push_str(&format!(" ON DELETE {}", on_delete));
            }
            if let Some(on_update) = command.properties.new_str("on_update") {
                body.push_str(&format!(" ON UPDATE {}", on_update));
            }
            return Ok(body);
        }
        Err(EditError::Generation(format!(
            "constraint {} has no definition",
            command.target.qualified_name()
        )))
    }
}

impl ObjectEditor for ConstraintEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if command.is_create() {
            // Surface generation problems as validation so the batch
            // aborts before any statement runs.
            Self::declaration(command, ctx).map_err(|e| {
                EditError::validation(command.target.qualified_name(), e.to_string())
            })?;
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
        let declaration = Self::declaration(command, ctx)?;
        Ok(vec![PersistAction::new(
            &command.title,
            format!("ALTER TABLE {} ADD {}", table, declaration),
        )])
    }

    fn modify_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        // No ALTER CONSTRAINT in the supported dialects: drop and re-add.
        let mut actions = self.delete_actions(command, false, ctx)?;
        actions.extend(self.create_actions(command, &[], ctx)?);
        Ok(actions)
    }

    fn delete_actions(
        &self,
        command: &Command,
        cascade: bool,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let table = quoted_owner_table(ctx.dialect, command)?;
        let cascade_kw = if cascade && ctx.dialect.supports(DialectFeature::DropCascade) {
            " CASCADE"
        } else {
            ""
        };
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "ALTER TABLE {} DROP CONSTRAINT {}{}",
                table,
                ctx.dialect.quote_identifier(&command.target.name),
                cascade_kw
            ),
        )])
    }

    fn rename_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        if !ctx.dialect.supports(DialectFeature::RenameConstraint) {
            return Err(EditError::NotSupported(format!(
                "{} does not support renaming constraints",
                ctx.dialect.display_name
            )));
        }
        let (old_name, new_name) = match &command.kind {
            CommandKind::Rename { old_name, new_name } => (old_name, new_name),
            _ => unreachable!("rename_actions called for non-rename command"),
        };
        let table = quoted_owner_table(ctx.dialect, command)?;
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "ALTER TABLE {} RENAME CONSTRAINT {} TO {}",
                table,
                ctx.dialect.quote_identifier(old_name),
                ctx.dialect.quote_identifier(new_name)
            ),
        )])
    }

    fn nested_declaration(&self, command: &Command, ctx: &EditorContext) -> Option<String> {
        Self::declaration(command, ctx).ok()
    }
}
