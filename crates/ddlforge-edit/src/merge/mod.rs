//! Merge resolution
//!
//! Collapses semantically-equivalent repeated edits into a minimal net
//! change before any DDL is rendered.

mod resolver;

#[cfg(test)]
mod tests;

pub use resolver::*;
