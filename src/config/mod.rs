//! Configuration loading and management for the HR engine.
//!
//! This module provides functionality to load the leave policy and server
//! settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hr_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Listening on {}", config.server().bind_addr);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, LeaveAllowances, LeavePolicy, ServerConfig};
