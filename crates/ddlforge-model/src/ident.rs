//! Object identity
//!
//! Every metadata object the engine can edit is identified by an
//! `ObjectRef`: the container path that owns it plus its local name and
//! kind. Two pending commands target the same logical object iff their
//! `ObjectRef`s are equal; all merge bookkeeping is keyed by this type.

use serde::{Deserialize, Serialize};

/// The closed set of object kinds the engine can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Database,
    Schema,
    Table,
    Column,
    Constraint,
    ForeignKey,
    Index,
    Sequence,
    Role,
    Trigger,
    EventTrigger,
    Policy,
    Extension,
    ForeignServer,
    Tablespace,
    ScheduledJob,
    JobStep,
    JobSchedule,
    DataType,
    Procedure,
}

impl ObjectKind {
    /// Kind of the object that logically owns objects of this kind, if
    /// this kind only exists nested inside another object.
    pub fn owner_kind(self) -> Option<ObjectKind> {
        match self {
            ObjectKind::Column
            | ObjectKind::Constraint
            | ObjectKind::ForeignKey
            | ObjectKind::Index
            | ObjectKind::Trigger
            | ObjectKind::Policy => Some(ObjectKind::Table),
            ObjectKind::JobStep | ObjectKind::JobSchedule => Some(ObjectKind::ScheduledJob),
            _ => None,
        }
    }

    /// Whether objects of this kind carry a cached SQL body definition
    /// that can go stale when a referenced object is renamed.
    pub fn has_body_definition(self) -> bool {
        matches!(self, ObjectKind::Procedure | ObjectKind::DataType)
    }

    /// Human-readable singular name, used in titles and error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ObjectKind::Database => "database",
            ObjectKind::Schema => "schema",
            ObjectKind::Table => "table",
            ObjectKind::Column => "column",
            ObjectKind::Constraint => "constraint",
            ObjectKind::ForeignKey => "foreign key",
            ObjectKind::Index => "index",
            ObjectKind::Sequence => "sequence",
            ObjectKind::Role => "role",
            ObjectKind::Trigger => "trigger",
            ObjectKind::EventTrigger => "event trigger",
            ObjectKind::Policy => "policy",
            ObjectKind::Extension => "extension",
            ObjectKind::ForeignServer => "foreign server",
            ObjectKind::Tablespace => "tablespace",
            ObjectKind::ScheduledJob => "scheduled job",
            ObjectKind::JobStep => "job step",
            ObjectKind::JobSchedule => "job schedule",
            ObjectKind::DataType => "data type",
            ObjectKind::Procedure => "procedure",
        }
    }
}

/// Identity of one metadata object: container path + local name + kind.
///
/// # Examples
///
/// ```
/// use ddlforge_model::{ObjectKind, ObjectRef};
///
/// let table = ObjectRef::new(["public"], "users", ObjectKind::Table);
/// let column = table.child(ObjectKind::Column, "email");
/// assert_eq!(column.qualified_name(), "public.users.email");
/// assert_eq!(column.parent_ref(ObjectKind::Table).unwrap(), table);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Names of the containers owning this object, outermost first
    pub container: Vec<String>,
    /// Local object name
    pub name: String,
    /// Object kind
    pub kind: ObjectKind,
}

impl ObjectRef {
    pub fn new<C, S>(container: C, name: impl Into<String>, kind: ObjectKind) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            container: container.into_iter().map(Into::into).collect(),
            name: name.into(),
            kind,
        }
    }

    /// A top-level object with an empty container path.
    pub fn top_level(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self::new(Vec::<String>::new(), name, kind)
    }

    /// Reference to a child object owned by this one.
    pub fn child(&self, kind: ObjectKind, name: impl Into<String>) -> Self {
        let mut container = self.container.clone();
        container.push(self.name.clone());
        Self {
            container,
            name: name.into(),
            kind,
        }
    }

    /// Reference to the owning object, assuming the given kind.
    /// Returns `None` for objects with an empty container path.
    pub fn parent_ref(&self, kind: ObjectKind) -> Option<Self> {
        let (name, container) = self.container.split_last()?;
        Some(Self {
            container: container.to_vec(),
            name: name.clone(),
            kind,
        })
    }

    /// Container path rendered as a dotted prefix, or `None` when empty.
    pub fn container_path(&self) -> Option<String> {
        if self.container.is_empty() {
            None
        } else {
            Some(self.container.join("."))
        }
    }

    /// Fully qualified dotted name.
    pub fn qualified_name(&self) -> String {
        match self.container_path() {
            Some(path) => format!("{}.{}", path, self.name),
            None => self.name.clone(),
        }
    }

    /// Whether `other` sits somewhere under this object's path.
    pub fn contains(&self, other: &ObjectRef) -> bool {
        if other.container.len() <= self.container.len() {
            return false;
        }
        other.container[..self.container.len()] == self.container[..]
            && other.container[self.container.len()] == self.name
    }

    /// Nesting depth (number of containers).
    pub fn depth(&self) -> usize {
        self.container.len()
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.display_name(), self.qualified_name())
    }
}
