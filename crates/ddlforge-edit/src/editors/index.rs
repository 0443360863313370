//! Index editor
//!
//! Indexes are never inlined into CREATE TABLE in the supported
//! dialects; an index created under a new table becomes a standalone
//! CREATE INDEX ordered after the parent statement.

use crate::editor::{EditorContext, ObjectEditor};
use crate::editors::quoted_owner_table;
use crate::{Command, CommandKind, PersistAction};
use ddlforge_core::{DialectInfo, EditError, Result};
use ddlforge_model::ObjectRef;

pub struct IndexEditor;

/// Indexes nest under their table but are addressed by schema-qualified
/// name in DROP/ALTER INDEX statements.
fn quoted_index_name(dialect: &DialectInfo, target: &ObjectRef) -> String {
    let schema = &target.container[..target.container.len().saturating_sub(1)];
    schema
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(target.name.as_str()))
        .map(|part| dialect.quote_identifier(part))
        .collect::<Vec<_>>()
        .join(".")
}

impl ObjectEditor for IndexEditor {
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        crate::editor::validate_common(command, ctx)?;
        if command.is_create() && !command.properties.contains("columns") {
            return Err(EditError::validation(
                command.target.qualified_name(),
                "index has no columns",
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
        let columns = command.properties.new_str("columns").ok_or_else(|| {
            EditError::Generation(format!(
                "index {} has no columns",
                command.target.qualified_name()
            ))
        })?;
        let unique = if command.properties.new_bool("unique") == Some(true) {
            "UNIQUE "
        } else {
            ""
        };
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "CREATE {}INDEX {} ON {} ({})",
                unique,
                ctx.dialect.quote_identifier(&command.target.name),
                table,
                columns
            ),
        )])
    }

    fn modify_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        // Index definitions cannot be altered in place.
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
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "DROP INDEX {}",
                quoted_index_name(ctx.dialect, &command.target)
            ),
        )])
    }

    fn rename_actions(
        &self,
        command: &Command,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let new_name = match &command.kind {
            CommandKind::Rename { new_name, .. } => new_name,
            _ => unreachable!("rename_actions called for non-rename command"),
        };
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "ALTER INDEX {} RENAME TO {}",
                quoted_index_name(ctx.dialect, &command.target),
                ctx.dialect.quote_identifier(new_name)
            ),
        )])
    }
}
