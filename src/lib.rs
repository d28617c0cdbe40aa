//! taskpad - a local task list library
//!
//! This library provides the core functionality for the taskpad CLI:
//! a task list and an active filter, persisted as JSON in a data
//! directory and reloaded on every run.
//!
//! # Core Concepts
//!
//! - **Tasks**: titled to-do items with a completion flag and priority
//! - **Filter**: `all`, `completed` or `pending`, remembered between runs
//! - **Views**: counts, visible tasks and completion rate derived from both
//!
//! # Module Organization
//!
//! - `board`: the owned state container; every mutation persists
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output envelopes
//! - `storage`: Key-value stores and the forgiving JSON adapter
//! - `task`: Task model, id generation and pure list transforms
//! - `view`: Counts, filtering and completion rate

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;
pub mod view;

pub use error::{Error, Result};
