//! Per-kind object editors
//!
//! Each editor renders dialect-aware DDL for one family of object kinds.
//! Statement shapes follow the engine's supported dialects; anything a
//! dialect cannot express surfaces as `EditError::NotSupported` at
//! compile time rather than as broken SQL at run time.

mod column;
mod constraint;
mod datatype;
mod index;
mod job;
mod policy;
mod procedure;
mod role;
mod schema_objects;
mod sequence;
mod table;
mod trigger;


pub use column::*;
pub use constraint::*;
pub use datatype::*;
pub use index::*;
pub use job::*;
pub use policy::*;
pub use procedure::*;
pub use role::*;
pub use schema_objects::*;
pub use sequence::*;
pub use table::*;
pub use trigger::*;

use ddlforge_core::{DialectInfo, EditError, Result};
use ddlforge_model::ObjectRef;

/// Quote every path component of a reference and join with dots.
pub(crate) fn quote_qualified(dialect: &DialectInfo, target: &ObjectRef) -> String {
    target
        .container
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(target.name.as_str()))
        .map(|part| dialect.quote_identifier(part))
        .collect::<Vec<_>>()
        .join(".")
}

/// Quoted qualified name of the table owning a nested object.
pub(crate) fn quoted_owner_table(
    dialect: &DialectInfo,
    command: &crate::Command,
) -> Result<String> {
    let owner = command.owner_ref().ok_or_else(|| {
        EditError::Generation(format!(
            "{} has no owning table",
            command.target.qualified_name()
        ))
    })?;
    Ok(quote_qualified(dialect, &owner))
}

/// Escape a string for use inside a single-quoted SQL literal.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
