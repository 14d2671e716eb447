//! quadro - Task Board Library
//!
//! This library provides the core of the quadro task board: an in-memory
//! task store with an observer-based change contract, a drag-and-drop
//! gesture machine, and snapshot persistence.
//!
//! # Core Concepts
//!
//! - **Tasks**: a description, two classification axes (urgency and
//!   priority), and a workflow column (todo, progress, done)
//! - **Board**: owner of the ordered task sequence and of the
//!   mutation/notification contract
//! - **Gestures**: drag-and-drop modelled as an explicit state machine,
//!   independent of any rendering surface
//! - **Snapshots**: the whole collection serialized after every change,
//!   addressed by a fixed storage key
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `quadro.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task entity, enums, and import validation
//! - `board`: Task store with observers and persistence
//! - `gesture`: Drag-and-drop coordinator
//! - `storage`: Snapshot stores (file-backed and in-memory)
//! - `lock`: File locking and atomic writes for snapshot files
//! - `output`: Shared CLI output formatting

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod gesture;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
