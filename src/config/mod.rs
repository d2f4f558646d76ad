//! Configuration loading and management for the work-time engine.
//!
//! This module loads schedule defaults, auto-close settings and regional
//! holiday rules from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use worktime_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Holiday rules: {}", config.holidays().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AutoCloseSettings, EngineConfig, EngineSettings, HolidayDate, HolidayRule, HolidaysConfig,
    ScheduleSettings,
};
