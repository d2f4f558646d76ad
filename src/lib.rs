//! Work-time reconciliation engine.
//!
//! This crate turns raw clock-in/clock-out punches into worked time,
//! compares it against each employee's expected schedule (weekly cycles,
//! override rules, holidays, absences, closures) and maintains a running
//! overtime/undertime balance. It also closes work sessions left open
//! at the daily cutoff.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use engine::WorkTimeEngine;
pub use error::{EngineError, EngineResult};
