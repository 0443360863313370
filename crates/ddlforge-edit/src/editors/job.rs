//! Scheduled job editor
//!
//! pgagent exposes no DDL for jobs; everything goes through its catalog
//! tables. The editor renders INSERT/UPDATE/DELETE statements against
//! `pgagent.pga_job`, `pgagent.pga_jobstep` and `pgagent.pga_schedule`,
//! keyed by name the way the scheduler UI addresses them.

use crate::editor::{cache_container, EditorContext, ObjectEditor};
use crate::editors::quote_literal;
use crate::{CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{EditError, Result};
use ddlforge_model::ObjectKind;

pub struct JobEditor;

struct JobTable {
    table: &'static str,
    name_column: &'static str,
    parent_column: Option<&'static str>,
}

impl JobEditor {
    fn catalog(kind: ObjectKind) -> JobTable {
        match kind {
            ObjectKind::JobStep => JobTable {
                table: "pgagent.pga_jobstep",
                name_column: "jstname",
                parent_column: Some("jstjobid"),
            },
            ObjectKind::JobSchedule => JobTable {
                table: "pgagent.pga_schedule",
                name_column: "jscname",
                parent_column: Some("jscjobid"),
            },
            _ => JobTable {
                table: "pgagent.pga_job",
                name_column: "jobname",
                parent_column: None,
            },
        }
    }

    /// Subquery resolving the owning job's id from its name.
    fn job_id_subquery(command: &Command) -> Result<String> {
        let owner = command.owner_ref().ok_or_else(|| {
            EditError::Generation(format!(
                "{} has no owning job",
                command.target.qualified_name()
            ))
        })?;
        Ok(format!(
            "(SELECT jobid FROM pgagent.pga_job WHERE jobname = {})",
            quote_literal(&owner.name)
        ))
    }

    fn row_filter(command: &Command, catalog: &JobTable) -> Result<String> {
        let mut filter = format!(
            "{} = {}",
            catalog.name_column,
            quote_literal(&command.target.name)
        );
        if let Some(parent_column) = catalog.parent_column {
            filter.push_str(&format!(
                " AND {} = {}",
                parent_column,
                Self::job_id_subquery(command)?
            ));
        }
        Ok(filter)
    }
}

impl ObjectEditor for JobEditor {
    fn create_actions(
        &self,
        command: &Command,
        _nested: &[String],
        _ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let catalog = Self::catalog(command.target.kind);
        let mut columns = vec![catalog.name_column.to_string()];
        let mut values = vec![quote_literal(&command.target.name)];
        if let Some(parent_column) = catalog.parent_column {
            columns.push(parent_column.to_string());
            values.push(Self::job_id_subquery(command)?);
        }
        if command.target.kind == ObjectKind::JobStep {
            let code = command.properties.new_str("code").ok_or_else(|| {
                EditError::validation(command.target.qualified_name(), "job step requires code")
            })?;
            columns.push("jstcode".to_string());
            values.push(quote_literal(code));
            columns.push("jstkind".to_string());
            values.push(quote_literal(
                command.properties.new_str("step_kind").unwrap_or("s"),
            ));
        }
        if command.target.kind == ObjectKind::JobSchedule {
            columns.push("jscenabled".to_string());
            values.push(
                command
                    .properties
                    .new_bool("enabled")
                    .unwrap_or(true)
                    .to_string(),
            );
        }
        if let Some(description) = command.properties.new_str("description") {
            let column = match command.target.kind {
                ObjectKind::JobStep => "jstdesc",
                ObjectKind::JobSchedule => "jscdesc",
                _ => "jobdesc",
            };
            columns.push(column.to_string());
            values.push(quote_literal(description));
        }
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                catalog.table,
                columns.join(", "),
                values.join(", ")
            ),
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
        _ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let catalog = Self::catalog(command.target.kind);
        let mut assignments = Vec::new();
        for (id, delta) in command.properties.iter() {
            let column = match (command.target.kind, id.as_str()) {
                (ObjectKind::JobStep, "code") => "jstcode",
                (ObjectKind::JobStep, "description") => "jstdesc",
                (ObjectKind::JobSchedule, "enabled") => "jscenabled",
                (ObjectKind::JobSchedule, "description") => "jscdesc",
                (_, "description") => "jobdesc",
                (_, "enabled") => "jobenabled",
                (_, other) => {
                    tracing::warn!(property = other, "unknown job property, skipping");
                    continue;
                }
            };
            let value = match &delta.new {
                Some(serde_json::Value::String(s)) => quote_literal(s),
                Some(serde_json::Value::Bool(b)) => b.to_string(),
                Some(other) => other.to_string(),
                None => "NULL".to_string(),
            };
            assignments.push(format!("{} = {}", column, value));
        }
        if assignments.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![PersistAction::new(
            &command.title,
            format!(
                "UPDATE {} SET {} WHERE {}",
                catalog.table,
                assignments.join(", "),
                Self::row_filter(command, &catalog)?
            ),
        )])
    }

    fn delete_actions(
        &self,
        command: &Command,
        _cascade: bool,
        _ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let catalog = Self::catalog(command.target.kind);
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "DELETE FROM {} WHERE {}",
                catalog.table,
                Self::row_filter(command, &catalog)?
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
        _ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>> {
        let (old_name, new_name) = match &command.kind {
            CommandKind::Rename { old_name, new_name } => (old_name, new_name),
            _ => unreachable!("rename_actions called for non-rename command"),
        };
        let catalog = Self::catalog(command.target.kind);
        let mut filter = format!("{} = {}", catalog.name_column, quote_literal(old_name));
        if let Some(parent_column) = catalog.parent_column {
            filter.push_str(&format!(
                " AND {} = {}",
                parent_column,
                Self::job_id_subquery(command)?
            ));
        }
        let mut action = PersistAction::new(
            &command.title,
            format!(
                "UPDATE {} SET {} = {} WHERE {}",
                catalog.table,
                catalog.name_column,
                quote_literal(new_name),
                filter
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
