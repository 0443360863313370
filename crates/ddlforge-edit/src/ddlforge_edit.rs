//! Schema-change command engine for ddlforge
//!
//! Records structural edits against database metadata objects as
//! [`Command`]s in a [`CommandContext`], folds redundant edits into a
//! minimal net change, and compiles the surviving commands into an
//! ordered list of [`PersistAction`]s: the DDL script shown to the user
//! and played against a live session by the [`ScriptRunner`].

mod action;
mod command;
mod compiler;
mod context;
mod editor;
mod editors;
mod merge;
mod runner;

pub use action::*;
pub use command::*;
pub use compiler::*;
pub use context::*;
pub use editor::*;
pub use editors::*;
pub use merge::*;
pub use runner::*;
