//! # Qara
//!
//! Personal task tracking with a gamified profile. Tasks carry a title,
//! description, due date and location, and move between In Progress,
//! Completed and Cancelled.
//!
//! The core is split into:
//! *   [`storage`]: whole-collection load/save against a key-value store.
//! *   [`lifecycle`]: pure add/edit/status/remove/sort/filter operations.
//! *   [`stats`]: XP, levels and weekly activity derived from a snapshot.
//! *   [`calendar`]: tasks grouped by calendar day.
//!
//! [`commands`] wires these together for the `qara` binary.

pub mod calendar;
pub mod commands;
pub mod error;
pub mod geocode;
pub mod lifecycle;
pub mod models;
pub mod stats;
pub mod storage;

pub use error::TaskError;
pub use models::{Task, TaskId, TaskStatus};
