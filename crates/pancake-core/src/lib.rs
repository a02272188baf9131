//! Pancake Core
//!
//! Shared plumbing for the Pancake crates: hash collections, logging setup and
//! profiling hooks.

pub mod alloc;
pub mod logging;
pub mod profiling;
