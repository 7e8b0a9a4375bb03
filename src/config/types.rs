//! Configuration types for the HR engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::LeaveType;

/// Yearly leave allowance, in days, per leave type.
///
/// Unpaid leave has no allowance and therefore no entry here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveAllowances {
    /// Annual leave days per year.
    pub annual: u32,
    /// Sick leave days per year.
    pub sick: u32,
    /// Personal leave days per year.
    pub personal: u32,
    /// Maternity leave days per year.
    pub maternity: u32,
    /// Paternity leave days per year.
    pub paternity: u32,
}

impl LeaveAllowances {
    /// Returns the allowance for a leave type, or `None` for unpaid leave.
    pub fn for_type(&self, leave_type: LeaveType) -> Option<u32> {
        match leave_type {
            LeaveType::Annual => Some(self.annual),
            LeaveType::Sick => Some(self.sick),
            LeaveType::Personal => Some(self.personal),
            LeaveType::Maternity => Some(self.maternity),
            LeaveType::Paternity => Some(self.paternity),
            LeaveType::Unpaid => None,
        }
    }
}

impl Default for LeaveAllowances {
    fn default() -> Self {
        Self {
            annual: 21,
            sick: 10,
            personal: 7,
            maternity: 90,
            paternity: 15,
        }
    }
}

/// Leave policy configuration from leave_policy.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeavePolicy {
    /// Allowances per leave type.
    pub allowances: LeaveAllowances,
}

/// HTTP server configuration from server.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_filter: default_log_filter(),
        }
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    leave_policy: LeavePolicy,
    server: ServerConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(leave_policy: LeavePolicy, server: ServerConfig) -> Self {
        Self {
            leave_policy,
            server,
        }
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        &self.leave_policy
    }

    /// Returns the server configuration.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }
}
