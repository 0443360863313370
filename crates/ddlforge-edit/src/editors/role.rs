//! Role editor and permission rendering

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::{quote_qualified, quoted_owner_table};
use crate::{CacheEffect, Command, CommandKind, PersistAction, Polarity};
use ddlforge_core::{EditError, Result};
use ddlforge_model::ObjectKind;

pub struct RoleEditor;

impl ObjectEditor for RoleEditor {
    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let mut sql = format!(
            "CREATE ROLE {}",
            ctx.dialect.quote_identifier(&command.target.name)
        );
        if command.properties.new_bool("login") == Some(true) {
            sql.push_str(" LOGIN");
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
        let role = ctx.dialect.quote_identifier(&command.target.name);
        let mut actions = Vec::new();
        if let Some(login) = command.properties.new_bool("login") {
            actions.push(PersistAction::new(
                "Alter role login",
                format!(
                    "ALTER ROLE {} {}",
                    role,
                    if login { "LOGIN" } else { "NOLOGIN" }
                ),
            ));
        }
        Ok(actions)
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
                "DROP ROLE {}",
                ctx.dialect.quote_identifier(&command.target.name)
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
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "ALTER ROLE {} RENAME TO {}",
                ctx.dialect.quote_identifier(old_name),
                ctx.dialect.quote_identifier(new_name)
            ),
        )])
    }
}

/// Render one folded permission command as GRANT/REVOKE.
///
/// When the net set covers every privilege kind supported for the
/// target's kind, a single `ALL` keyword replaces the enumeration.
pub fn permission_actions(command: &Command, ctx: &EditorContext) -> Result<Vec<PersistAction>> {
    let (grantee, polarity, privileges) = match &command.kind {
        CommandKind::Permission {
            grantee,
            polarity,
            privileges,
        } => (grantee, *polarity, privileges),
        _ => {
            return Err(EditError::Generation(
                "permission_actions called for a non-permission command".into(),
            ))
        }
    };
    if privileges.is_empty() {
        return Ok(Vec::new());
    }

    // Column privileges attach to the owning table with a per-privilege
    // column list (`GRANT SELECT ("email") ON TABLE ..`).
    if command.target.kind == ObjectKind::Column {
        let table = quoted_owner_table(ctx.dialect, command)?;
        let column = ctx.dialect.quote_identifier(&command.target.name);
        let rendered = if privileges.covers_all_for(ObjectKind::Column) {
            format!("ALL ({})", column)
        } else {
            privileges
                .iter()
                .map(|p| format!("{} ({})", p.keyword(), column))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let grantee_quoted = ctx.dialect.quote_identifier(grantee);
        let sql = match polarity {
            Polarity::Grant => format!("GRANT {} ON TABLE {} TO {}", rendered, table, grantee_quoted),
            Polarity::Revoke => {
                format!("REVOKE {} ON TABLE {} FROM {}", rendered, table, grantee_quoted)
            }
        };
        return Ok(vec![PersistAction::new(&command.title, sql)]);
    }

    let rendered = privileges.render(command.target.kind);
    let on_clause = match command.target.kind {
        ObjectKind::Table => format!("TABLE {}", quote_qualified(ctx.dialect, &command.target)),
        ObjectKind::Schema => format!(
            "SCHEMA {}",
            ctx.dialect.quote_identifier(&command.target.name)
        ),
        ObjectKind::Database => format!(
            "DATABASE {}",
            ctx.dialect.quote_identifier(&command.target.name)
        ),
        ObjectKind::Sequence => format!(
            "SEQUENCE {}",
            quote_qualified(ctx.dialect, &command.target)
        ),
        ObjectKind::Procedure => format!(
            "PROCEDURE {}",
            quote_qualified(ctx.dialect, &command.target)
        ),
        _ => quote_qualified(ctx.dialect, &command.target),
    };
    let grantee_quoted = ctx.dialect.quote_identifier(grantee);

    let sql = match polarity {
        Polarity::Grant => format!("GRANT {} ON {} TO {}", rendered, on_clause, grantee_quoted),
        Polarity::Revoke => format!(
            "REVOKE {} ON {} FROM {}",
            rendered, on_clause, grantee_quoted
        ),
    };
    Ok(vec![PersistAction::new(&command.title, sql)])
}
