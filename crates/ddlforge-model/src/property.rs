//! Property deltas carried by pending commands
//!
//! A command records which typed properties of an object changed and what
//! they changed to. The map is insertion-ordered so generated DDL is
//! deterministic, and merging follows the command-queue rule: the first
//! recorded old value survives, the latest new value wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of one typed object property (e.g. "data_type", "default").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Old and new value of one changed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDelta {
    pub old: Option<Value>,
    pub new: Option<Value>,
}

/// Insertion-ordered map of property deltas.
///
/// # Examples
///
/// ```
/// use ddlforge_model::PropertyMap;
/// use serde_json::json;
///
/// let mut props = PropertyMap::new();
/// props.set("data_type", Some(json!("int")), Some(json!("bigint")));
/// props.set("data_type", Some(json!("bigint")), Some(json!("text")));
///
/// // First old survives, latest new wins.
/// let delta = props.get(&"data_type".into()).unwrap();
/// assert_eq!(delta.old, Some(json!("int")));
/// assert_eq!(delta.new, Some(json!("text")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMap {
    entries: Vec<(PropertyId, PropertyDelta)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a property change. Repeated sets for the same property keep
    /// the first old value and replace the new value (last write wins).
    pub fn set(&mut self, id: impl Into<PropertyId>, old: Option<Value>, new: Option<Value>) {
        let id = id.into();
        if let Some((_, delta)) = self.entries.iter_mut().find(|(k, _)| *k == id) {
            delta.new = new;
        } else {
            self.entries.push((id, PropertyDelta { old, new }));
        }
    }

    /// Convenience for recording a new value with no prior one.
    pub fn set_new(&mut self, id: impl Into<PropertyId>, new: Value) {
        self.set(id, None, Some(new));
    }

    /// Fold another map into this one with the same first-old/last-new rule.
    pub fn merge_from(&mut self, other: &PropertyMap) {
        for (id, delta) in &other.entries {
            self.set(id.clone(), delta.old.clone(), delta.new.clone());
        }
    }

    pub fn get(&self, id: &PropertyId) -> Option<&PropertyDelta> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, d)| d)
    }

    /// Latest new value for a property, flattened.
    pub fn new_value(&self, id: &str) -> Option<&Value> {
        self.get(&PropertyId::from(id)).and_then(|d| d.new.as_ref())
    }

    /// Latest new value as a string, when it is one.
    pub fn new_str(&self, id: &str) -> Option<&str> {
        self.new_value(id).and_then(Value::as_str)
    }

    pub fn new_bool(&self, id: &str) -> Option<bool> {
        self.new_value(id).and_then(Value::as_bool)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(&PropertyId::from(id)).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate deltas in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyId, &PropertyDelta)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &PropertyId> {
        self.entries.iter().map(|(k, _)| k)
    }
}
