//! Script runner
//!
//! Plays a compiled action list against a live session and keeps the
//! shared object cache in step with what actually executed.

mod script;

#[cfg(test)]
mod tests;

pub use script::*;
