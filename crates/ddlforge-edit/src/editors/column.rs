//! Column editor
//!
//! The same column edit renders two ways: as an inline fragment of a
//! newly created table's CREATE statement, or as standalone ALTER TABLE
//! statements when the table already exists. The compiler chooses the
//! path; this editor only provides both renderings.

use crate::editor::{EditorContext, ObjectEditor};
use crate::editors::{quote_literal, quote_qualified, quoted_owner_table};
use crate::{Command, CommandKind, PersistAction};
use ddlforge_core::{DialectFeature, EditError, Result};

pub struct ColumnEditor;

impl ColumnEditor {
    /// `"name" TYPE [NOT NULL] [DEFAULT expr]`
    fn declaration(command: &Command, ctx: &EditorContext) -> Result<String> {
        let data_type = command.properties.new_str("data_type").ok_or_else(|| {
            EditError::Generation(format!(
                "column {} has no data type",
                command.target.qualified_name()
            ))
        })?;
        let mut decl = format!(
            "{} {}",
            ctx.dialect.quote_identifier(&command.target.name),
            data_type
        );
        if command.properties.new_bool("nullable") == Some(false) {
            decl.push_str(" NOT NULL");
        }
        if let Some(default) = command.properties.new_str("default") {
            decl.push_str(&format!(" DEFAULT {}", default));
        }
        Ok(decl)
    }
}

impl ObjectEditor for ColumnEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if command.is_create() && !command.properties.contains("data_type") {
            return Err(EditError::validation(
                command.target.qualified_name(),
                "column has no data type",
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
        let declaration = Self::declaration(command, ctx)?;
        Ok(vec![PersistAction::new(
            &command.title,
            format!("ALTER TABLE {} ADD COLUMN {}", table, declaration),
        )])
    }

    fn modify_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let table = quoted_owner_table(ctx.dialect, command)?;
        let column = ctx.dialect.quote_identifier(&command.target.name);
        let mut actions = Vec::new();

        // The dialects here have no single combined ALTER COLUMN form:
        // type, nullability and default each need their own clause.
        for (id, delta) in command.properties.iter() {
            match id.as_str() {
                "data_type" => {
                    if !ctx.dialect.supports(DialectFeature::AlterColumnType) {
                        return Err(EditError::NotSupported(format!(
                            "{} does not support changing column types",
                            ctx.dialect.display_name
                        )));
                    }
                    let new_type = delta
                        .new
                        .as_ref()
                        .and_then(|v| v.as_str())
                        .ok_or_else(|| {
                            EditError::Generation("column type change without a new type".into())
                        })?;
                    actions.push(PersistAction::new(
                        "Alter column type",
                        format!(
                            "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                            table, column, new_type
                        ),
                    ));
                }
                "nullable" => {
                    let clause = if delta.new.as_ref().and_then(|v| v.as_bool()) == Some(false) {
                        "SET NOT NULL"
                    } else {
                        "DROP NOT NULL"
                    };
                    actions.push(PersistAction::new(
                        "Alter column nullability",
                        format!("ALTER TABLE {} ALTER COLUMN {} {}", table, column, clause),
                    ));
                }
                "default" => {
                    let sql = match delta.new.as_ref().and_then(|v| v.as_str()) {
                        Some(default) => format!(
                            "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
                            table, column, default
                        ),
                        None => format!(
                            "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
                            table, column
                        ),
                    };
                    actions.push(PersistAction::new("Alter column default", sql));
                }
                "comment" => {}
                other => {
                    tracing::warn!(
                        column = %command.target.qualified_name(),
                        property = other,
                        "no ALTER COLUMN form for property, skipping"
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
        let table = quoted_owner_table(ctx.dialect, command)?;
        let cascade_kw = if cascade && ctx.dialect.supports(DialectFeature::DropCascade) {
            " CASCADE"
        } else {
            ""
        };
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "ALTER TABLE {} DROP COLUMN {}{}",
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
        if !ctx.dialect.supports(DialectFeature::RenameColumn) {
            return Err(EditError::NotSupported(format!(
                "{} does not support renaming columns",
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
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                table,
                ctx.dialect.quote_identifier(old_name),
                ctx.dialect.quote_identifier(new_name)
            ),
        )])
    }

    fn nested_declaration(&self, command: &Command, ctx: &EditorContext) -> Option<String> {
        Self::declaration(command, ctx).ok()
    }

    fn extra_actions(&self, command: &Command, ctx: &EditorContext) -> Result<Vec<PersistAction>> {
        if !ctx.options.emit_comments || !ctx.dialect.supports(DialectFeature::CommentOn) {
            return Ok(Vec::new());
        }
        let Some(comment) = command.properties.new_str("comment") else {
            return Ok(Vec::new());
        };
        Ok(vec![PersistAction::optional(
            "Comment on column",
            format!(
                "COMMENT ON COLUMN {} IS {}",
                quote_qualified(ctx.dialect, &command.target),
                quote_literal(comment)
            ),
        )])
    }
}
