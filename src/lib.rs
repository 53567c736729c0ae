//! todo - Single-user To-do Tracker Library
//!
//! This library provides the core of the `todo` CLI: items with a status,
//! a priority and an optional due date, a pure query engine, completion
//! statistics, and pluggable persistence.
//!
//! # Core Concepts
//!
//! - **Items**: the completion date is set exactly when the status is completed
//! - **Queries**: search text, status and priority filters, and a stable sort
//! - **Statistics**: counts, completion rate and a per-day completion trend
//! - **Stores**: an injected `ItemStore` that receives deltas on every change
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.todo.toml`
//! - `error`: Error types and result aliases
//! - `item`: Item entity, status and priority
//! - `query`: Search, filter and sort
//! - `stats`: Statistics aggregation
//! - `seed`: Sample items for a fresh store
//! - `store`: `ItemStore` trait, in-memory and JSON file stores
//! - `tracker`: Service tying the collection to its store
//! - `storage`: Atomic JSON file writes
//! - `lock`: File locking for concurrent writers

pub mod cli;
pub mod config;
pub mod error;
pub mod item;
pub mod lock;
pub mod output;
pub mod query;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
pub use item::{Item, ItemEdit, ItemId, NewItem, Priority, Status};
pub use query::{ItemQuery, SortOption};
pub use stats::Stats;
pub use store::{ChangeSet, FileStore, ItemStore, MemoryStore};
pub use tracker::Tracker;
