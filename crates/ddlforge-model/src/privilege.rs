//! Privilege model for grant/revoke edits
//!
//! Permission commands carry set-valued edits ("this role may exercise
//! these privilege kinds on this object"). The supported set for a target
//! is a pure function of its `ObjectKind`; container or folder context
//! never influences it.

use crate::ObjectKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One grantable privilege kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Privilege {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    References,
    Trigger,
    Usage,
    Create,
    Connect,
    Temporary,
    Execute,
}

impl Privilege {
    /// SQL keyword for this privilege.
    pub fn keyword(self) -> &'static str {
        match self {
            Privilege::Select => "SELECT",
            Privilege::Insert => "INSERT",
            Privilege::Update => "UPDATE",
            Privilege::Delete => "DELETE",
            Privilege::Truncate => "TRUNCATE",
            Privilege::References => "REFERENCES",
            Privilege::Trigger => "TRIGGER",
            Privilege::Usage => "USAGE",
            Privilege::Create => "CREATE",
            Privilege::Connect => "CONNECT",
            Privilege::Temporary => "TEMPORARY",
            Privilege::Execute => "EXECUTE",
        }
    }
}

/// Privilege kinds supported for objects of the given kind.
///
/// An empty slice means objects of that kind are not grantable.
pub fn supported_privileges(kind: ObjectKind) -> &'static [Privilege] {
    use Privilege::*;
    match kind {
        ObjectKind::Table => &[
            Select, Insert, Update, Delete, Truncate, References, Trigger,
        ],
        ObjectKind::Column => &[Select, Insert, Update, References],
        ObjectKind::Schema => &[Create, Usage],
        ObjectKind::Database => &[Create, Connect, Temporary],
        ObjectKind::Sequence => &[Select, Update, Usage],
        ObjectKind::Procedure => &[Execute],
        ObjectKind::ForeignServer => &[Usage],
        ObjectKind::Tablespace => &[Create],
        ObjectKind::DataType => &[Usage],
        _ => &[],
    }
}

/// Ordered set of privileges carried by one permission command.
///
/// # Examples
///
/// ```
/// use ddlforge_model::{ObjectKind, Privilege, PrivilegeSet};
///
/// let set = PrivilegeSet::from_iter([Privilege::Execute]);
/// assert!(set.covers_all_for(ObjectKind::Procedure));
/// assert!(!set.covers_all_for(ObjectKind::Table));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeSet {
    privileges: BTreeSet<Privilege>,
}

impl PrivilegeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, privilege: Privilege) -> bool {
        self.privileges.insert(privilege)
    }

    pub fn remove(&mut self, privilege: Privilege) -> bool {
        self.privileges.remove(&privilege)
    }

    /// Union another set into this one.
    pub fn extend_from(&mut self, other: &PrivilegeSet) {
        self.privileges.extend(other.privileges.iter().copied());
    }

    /// Remove every privilege of `other` from this set.
    pub fn subtract(&mut self, other: &PrivilegeSet) {
        for p in &other.privileges {
            self.privileges.remove(p);
        }
    }

    pub fn contains(&self, privilege: Privilege) -> bool {
        self.privileges.contains(&privilege)
    }

    pub fn is_empty(&self) -> bool {
        self.privileges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.privileges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Privilege> + '_ {
        self.privileges.iter().copied()
    }

    /// Whether this set covers every privilege supported for objects of
    /// the given kind. Always false for non-grantable kinds.
    pub fn covers_all_for(&self, kind: ObjectKind) -> bool {
        let supported = supported_privileges(kind);
        !supported.is_empty() && supported.iter().all(|p| self.privileges.contains(p))
    }

    /// Render as a comma-separated keyword list, or `ALL` when the set
    /// covers everything supported for the target kind.
    pub fn render(&self, kind: ObjectKind) -> String {
        if self.covers_all_for(kind) {
            "ALL".to_string()
        } else {
            self.iter()
                .map(Privilege::keyword)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

impl FromIterator<Privilege> for PrivilegeSet {
    fn from_iter<T: IntoIterator<Item = Privilege>>(iter: T) -> Self {
        Self {
            privileges: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_all_for_table() {
        let all: PrivilegeSet = supported_privileges(ObjectKind::Table)
            .iter()
            .copied()
            .collect();
        assert!(all.covers_all_for(ObjectKind::Table));
        assert_eq!(all.render(ObjectKind::Table), "ALL");
    }

    #[test]
    fn test_partial_set_enumerates() {
        let set = PrivilegeSet::from_iter([Privilege::Insert, Privilege::Select]);
        assert!(!set.covers_all_for(ObjectKind::Table));
        // BTreeSet iteration order is declaration order of the enum
        assert_eq!(set.render(ObjectKind::Table), "SELECT, INSERT");
    }

    #[test]
    fn test_non_grantable_kind_never_all() {
        let set = PrivilegeSet::from_iter([Privilege::Select]);
        assert!(!set.covers_all_for(ObjectKind::Trigger));
        assert!(supported_privileges(ObjectKind::Index).is_empty());
    }

    #[test]
    fn test_subtract_and_extend() {
        let mut set = PrivilegeSet::from_iter([Privilege::Select, Privilege::Insert]);
        set.subtract(&PrivilegeSet::from_iter([Privilege::Select]));
        assert!(!set.contains(Privilege::Select));
        set.extend_from(&PrivilegeSet::from_iter([Privilege::Update]));
        assert_eq!(set.len(), 2);
    }
}
