//! Metadata object model for ddlforge
//!
//! Defines the identity of database metadata objects (`ObjectRef`,
//! `ObjectKind`), the property-delta model carried by pending edits,
//! the privilege model used by grant/revoke folding, and the shared
//! per-container object cache.

mod cache;
mod ident;
mod privilege;
mod property;

pub use cache::*;
pub use ident::*;
pub use privilege::*;
pub use property::*;
