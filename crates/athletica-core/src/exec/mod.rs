//! # Dump Execution Engine
//!
//! Loads previously materialized dump files into a live PostgreSQL database:
//! statement splitting, connection retry, the per-file transaction boundary
//! and directory-level ordering all live here.

pub mod runner;
pub mod splitter;

pub use runner::{ConnectParams, LoadReport, RunDirOptions};
pub use splitter::{LineSplitter, StatementSplitter};
