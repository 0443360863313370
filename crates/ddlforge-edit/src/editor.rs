//! Object editor contract
//!
//! One editor per object kind turns commands into persist actions. All
//! cross-cutting switches travel in [`EditorContext`], passed by
//! reference through the whole compile pass.

use crate::{Command, CommandKind, EditOptions, PersistAction};
use ddlforge_core::{CancelToken, DialectInfo, EditError, Result};
use ddlforge_model::{supported_privileges, ObjectCache, ObjectKind, ObjectRef, PropertyMap};

/// Everything an editor needs to render DDL for one compile pass.
#[derive(Clone, Copy)]
pub struct EditorContext<'a> {
    pub dialect: &'a DialectInfo,
    pub options: &'a EditOptions,
    pub cache: &'a ObjectCache,
    pub cancel: &'a CancelToken,
}

/// Per-object-kind strategy turning commands into persist actions.
///
/// `create_actions` receives the nested declarations of child commands
/// inlined by the compiler; the compiler decides inline vs. standalone
/// rendering and the editor never inspects object state to find out.
pub trait ObjectEditor: Send + Sync {
    /// Instantiate a new in-memory object (not yet persisted), optionally
    /// cloning properties from another object's property map.
    fn create_object(
        &self,
        container: &ObjectRef,
        kind: ObjectKind,
        name: &str,
        copy_from: Option<&PropertyMap>,
    ) -> (ObjectRef, PropertyMap) {
        let target = container.child(kind, name);
        let properties = copy_from.cloned().unwrap_or_default();
        (target, properties)
    }

    /// Validate one command before any DDL is rendered.
    fn validate(&self, command: &Command, ctx: &EditorContext) -> Result<()> {
        validate_common(command, ctx)
    }

    fn create_actions(
        &self,
        command: &Command,
        nested: &[String],
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>>;

    /// Emit only the statements needed for the properties that changed.
    fn modify_actions(&self, command: &Command, ctx: &EditorContext)
        -> Result<Vec<PersistAction>>;

    fn delete_actions(
        &self,
        command: &Command,
        cascade: bool,
        ctx: &EditorContext,
    ) -> Result<Vec<PersistAction>>;

    fn rename_actions(&self, command: &Command, ctx: &EditorContext)
        -> Result<Vec<PersistAction>>;

    /// Render this object as an inline fragment of a newly created
    /// owner's single CREATE statement. `None` means objects of this kind
    /// are always standalone statements.
    fn nested_declaration(&self, _command: &Command, _ctx: &EditorContext) -> Option<String> {
        None
    }

    /// Additional statements emitted after create/modify regardless of
    /// rendering path (e.g. COMMENT ON). Runs for inlined nested
    /// commands too.
    fn extra_actions(&self, _command: &Command, _ctx: &EditorContext) -> Result<Vec<PersistAction>> {
        Ok(Vec::new())
    }
}

/// Shared validation applied by every editor.
pub fn validate_common(command: &Command, ctx: &EditorContext) -> Result<()> {
    let target = &command.target;
    match &command.kind {
        CommandKind::Create { .. } => {
            if target.name.trim().is_empty() {
                return Err(EditError::validation(
                    target.kind.display_name(),
                    format!("empty {} name", target.kind.display_name()),
                ));
            }
            if let Some(container) = cache_container(target) {
                if ctx.cache.contains(&container, &target.name) == Some(true) {
                    return Err(EditError::validation(
                        target.qualified_name(),
                        format!("{} already exists", target.kind.display_name()),
                    ));
                }
            }
        }
        CommandKind::Rename { new_name, old_name } => {
            if new_name.trim().is_empty() {
                return Err(EditError::validation(
                    target.qualified_name(),
                    "empty new name",
                ));
            }
            if new_name == old_name {
                return Err(EditError::validation(
                    target.qualified_name(),
                    "new name equals the old name",
                ));
            }
        }
        CommandKind::Permission { .. } => {
            if supported_privileges(target.kind).is_empty() {
                return Err(EditError::validation(
                    target.qualified_name(),
                    format!("{} is not grantable", target.kind.display_name()),
                ));
            }
        }
        _ => {}
    }
    Ok(())
}

/// The container whose cached name set tracks this object.
pub(crate) fn cache_container(target: &ObjectRef) -> Option<ObjectRef> {
    let kind = target.kind.owner_kind().unwrap_or(ObjectKind::Schema);
    target.parent_ref(kind)
}

/// Resolve the editor for an object kind.
///
/// Dispatch is a closed match over `ObjectKind`, resolved once per
/// command by the compiler.
pub fn editor_for(kind: ObjectKind) -> &'static dyn ObjectEditor {
    use crate::editors::*;
    match kind {
        ObjectKind::Table => &TableEditor,
        ObjectKind::Column => &ColumnEditor,
        ObjectKind::Constraint | ObjectKind::ForeignKey => &ConstraintEditor,
        ObjectKind::Index => &IndexEditor,
        ObjectKind::Database => &DatabaseEditor,
        ObjectKind::Schema => &SchemaEditor,
        ObjectKind::Tablespace => &TablespaceEditor,
        ObjectKind::Extension => &ExtensionEditor,
        ObjectKind::ForeignServer => &ForeignServerEditor,
        ObjectKind::Role => &RoleEditor,
        ObjectKind::Sequence => &SequenceEditor,
        ObjectKind::Trigger | ObjectKind::EventTrigger => &TriggerEditor,
        ObjectKind::Policy => &PolicyEditor,
        ObjectKind::ScheduledJob | ObjectKind::JobStep | ObjectKind::JobSchedule => &JobEditor,
        ObjectKind::DataType => &DataTypeEditor,
        ObjectKind::Procedure => &ProcedureEditor,
    }
}
