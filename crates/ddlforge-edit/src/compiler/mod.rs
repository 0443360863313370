//! Script compiler
//!
//! Turns a merged command list into an ordered, executable list of
//! persist actions. Ordering and nested-vs-standalone rendering are
//! decided here, never by individual editors: deletes run first,
//! children before their parents; creates follow, parents before their
//! children; a child created together with its parent renders as an
//! inline fragment of the parent's single CREATE statement.

mod engine;


pub use engine::*;
