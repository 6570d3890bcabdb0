//! Library interface for the treewatch CLI
//!
//! This module exposes the callbacks for integration testing while keeping
//! the main binary logic in main.rs.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod callbacks;

pub use callbacks::{ExecCallback, PrintCallback, PATH_ENV_VAR};
