//! Integration test common infrastructure.
//!
//! Provides a scratch directory holding logs and a config, and runs the
//! `syncable` binary against it.

pub mod workspace;

#[allow(unused_imports)]
pub use workspace::{Outcome, Workspace};
