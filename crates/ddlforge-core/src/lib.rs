//! ddlforge Core - shared abstractions for the schema-change engine
//!
//! This crate provides the types every other ddlforge crate depends on:
//!
//! - `EditError` - the engine-wide error type
//! - `DialectInfo` - SQL dialect metadata (quoting, feature support)
//! - `CancelToken` - cooperative cancellation for long compile passes
//! - `ExecutionEngine` / `Transaction` - the seam to a live database session

mod cancel;
mod dialect;
mod error;
mod exec;

pub use cancel::*;
pub use dialect::*;
pub use error::*;
pub use exec::*;
