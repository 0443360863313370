//! Pending edit commands
//!
//! A `Command` is the typed record of one structural edit the user made
//! but has not yet saved. Commands accumulate in a `CommandContext` and
//! are consumed when the context compiles (save) or is reset (cancel).

use ddlforge_model::{ObjectRef, PrivilegeSet, PropertyMap};
use serde::{Deserialize, Serialize};

/// Direction of a set-valued permission edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Grant,
    Revoke,
}

/// What kind of structural edit a command records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    /// Create a new object, optionally cloning properties from another.
    Create { copy_from: Option<ObjectRef> },
    /// Change properties of an existing object.
    Modify,
    /// Drop an object. `cascade` suppresses explicit child drops and
    /// appends the CASCADE keyword instead.
    Delete { cascade: bool },
    /// Rename an object. `old_name` is fixed at first submission;
    /// repeated renames only move `new_name`.
    Rename { old_name: String, new_name: String },
    /// Set-valued grant/revoke edit on the (target, grantee) relationship.
    Permission {
        grantee: String,
        polarity: Polarity,
        privileges: PrivilegeSet,
    },
    /// Emits no DDL; forces the target's cached definition text to be
    /// refetched after the batch runs (scheduled alongside renames of
    /// derived-definition objects).
    Invalidate,
}

impl CommandKind {
    /// Stable discriminant used for "same kind" checks during submit-time
    /// folding.
    pub(crate) fn discriminant(&self) -> u8 {
        match self {
            CommandKind::Create { .. } => 0,
            CommandKind::Modify => 1,
            CommandKind::Delete { .. } => 2,
            CommandKind::Rename { .. } => 3,
            CommandKind::Permission { .. } => 4,
            CommandKind::Invalidate => 5,
        }
    }
}

/// One pending structural edit.
///
/// A command with `owner: Some(_)` is a nested command: its target is
/// logically owned by another object's pending edit (e.g. a column added
/// to a table that is itself being created), and its rendering path
/// depends on whether that owner is created in the same batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub target: ObjectRef,
    /// Back-reference to the owning object's ref for nested commands.
    pub owner: Option<ObjectRef>,
    /// Property deltas recorded by the edit.
    pub properties: PropertyMap,
    pub title: String,
}

impl Command {
    fn titled(kind: CommandKind, target: ObjectRef, verb: &str) -> Self {
        let title = format!("{} {}", verb, target.kind.display_name());
        Self {
            kind,
            target,
            owner: None,
            properties: PropertyMap::new(),
            title,
        }
    }

    pub fn create(target: ObjectRef) -> Self {
        Self::titled(CommandKind::Create { copy_from: None }, target, "Create")
    }

    pub fn create_from(target: ObjectRef, copy_from: ObjectRef) -> Self {
        Self::titled(
            CommandKind::Create {
                copy_from: Some(copy_from),
            },
            target,
            "Create",
        )
    }

    pub fn modify(target: ObjectRef) -> Self {
        Self::titled(CommandKind::Modify, target, "Alter")
    }

    pub fn delete(target: ObjectRef) -> Self {
        Self::titled(CommandKind::Delete { cascade: false }, target, "Drop")
    }

    pub fn delete_cascade(target: ObjectRef) -> Self {
        Self::titled(CommandKind::Delete { cascade: true }, target, "Drop")
    }

    pub fn rename(target: ObjectRef, new_name: impl Into<String>) -> Self {
        let old_name = target.name.clone();
        Self::titled(
            CommandKind::Rename {
                old_name,
                new_name: new_name.into(),
            },
            target,
            "Rename",
        )
    }

    pub fn grant(target: ObjectRef, grantee: impl Into<String>, privileges: PrivilegeSet) -> Self {
        let mut cmd = Self::titled(
            CommandKind::Permission {
                grantee: grantee.into(),
                polarity: Polarity::Grant,
                privileges,
            },
            target,
            "Grant on",
        );
        cmd.title = format!("Grant privileges on {}", cmd.target.kind.display_name());
        cmd
    }

    pub fn revoke(target: ObjectRef, grantee: impl Into<String>, privileges: PrivilegeSet) -> Self {
        let mut cmd = Self::titled(
            CommandKind::Permission {
                grantee: grantee.into(),
                polarity: Polarity::Revoke,
                privileges,
            },
            target,
            "Revoke on",
        );
        cmd.title = format!("Revoke privileges on {}", cmd.target.kind.display_name());
        cmd
    }

    pub fn invalidate(target: ObjectRef) -> Self {
        Self::titled(CommandKind::Invalidate, target, "Refresh")
    }

    /// Mark this command as nested under an owning object's edit.
    pub fn with_owner(mut self, owner: ObjectRef) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Record one property delta on this command.
    pub fn with_property(
        mut self,
        id: &str,
        old: Option<serde_json::Value>,
        new: Option<serde_json::Value>,
    ) -> Self {
        self.properties.set(id, old, new);
        self
    }

    /// Shorthand for a property that only has a new value.
    pub fn with_new_property(mut self, id: &str, new: serde_json::Value) -> Self {
        self.properties.set_new(id, new);
        self
    }

    pub fn is_same_target(&self, other: &Command) -> bool {
        self.target == other.target
    }

    /// The owner ref this command nests under, explicit or derived from
    /// the target's kind and container path.
    pub fn owner_ref(&self) -> Option<ObjectRef> {
        if self.owner.is_some() {
            return self.owner.clone();
        }
        let owner_kind = self.target.kind.owner_kind()?;
        self.target.parent_ref(owner_kind)
    }

    /// The grantee for permission commands.
    pub fn grantee(&self) -> Option<&str> {
        match &self.kind {
            CommandKind::Permission { grantee, .. } => Some(grantee),
            _ => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self.kind, CommandKind::Delete { .. })
    }

    pub fn is_create(&self) -> bool {
        matches!(self.kind, CommandKind::Create { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlforge_model::{ObjectKind, Privilege};

    #[test]
    fn test_titles() {
        let table = ObjectRef::new(["public"], "users", ObjectKind::Table);
        assert_eq!(Command::create(table.clone()).title, "Create table");
        assert_eq!(Command::delete(table.clone()).title, "Drop table");
        assert_eq!(Command::rename(table.clone(), "t2").title, "Rename table");
        assert_eq!(
            Command::grant(
                table,
                "analyst",
                PrivilegeSet::from_iter([Privilege::Select])
            )
            .title,
            "Grant privileges on table"
        );
    }

    #[test]
    fn test_rename_captures_old_name() {
        let table = ObjectRef::new(["public"], "users", ObjectKind::Table);
        let cmd = Command::rename(table, "accounts");
        match cmd.kind {
            CommandKind::Rename { old_name, new_name } => {
                assert_eq!(old_name, "users");
                assert_eq!(new_name, "accounts");
            }
            _ => panic!("expected rename"),
        }
    }

    #[test]
    fn test_owner_ref_derived_from_kind() {
        let table = ObjectRef::new(["public"], "users", ObjectKind::Table);
        let column = table.child(ObjectKind::Column, "email");
        let cmd = Command::create(column);
        assert_eq!(cmd.owner_ref(), Some(table));
    }

    #[test]
    fn test_explicit_owner_wins() {
        let job = ObjectRef::top_level("nightly", ObjectKind::ScheduledJob);
        let step = job.child(ObjectKind::JobStep, "vacuum");
        let cmd = Command::create(step).with_owner(job.clone());
        assert_eq!(cmd.owner_ref(), Some(job));
    }
}
