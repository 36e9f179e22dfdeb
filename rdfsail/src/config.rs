// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::coordinator::{SailError, SailResult};

/// Properties key enabling truth maintenance
pub const TRUTH_MAINTENANCE_KEY: &str = "truthMaintenance";

/// Properties key for the assert buffer capacity
pub const BUFFER_CAPACITY_KEY: &str = "bufferCapacity";

/// Properties key selecting the residual constraint policy
pub const RESIDUAL_POLICY_KEY: &str = "residualPolicy";

/// What the optimizer does with constraints whose variables never become
/// bound in their scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualPolicy {
    /// Fail planning with `PlanError::UnresolvedConstraints`
    #[default]
    Reject,
    /// Append them to the end of the plan and log a warning
    AppendWithWarning,
}

impl ResidualPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(ResidualPolicy::Reject),
            "append" | "append_with_warning" => Some(ResidualPolicy::AppendWithWarning),
            _ => None,
        }
    }
}

/// Configuration for a [`crate::TransactionCoordinator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SailConfig {
    /// Keep the closure of the store up to date as statements are added and
    /// removed. Requires a closure engine.
    pub truth_maintenance: bool,

    /// Number of pending assertions held before the assert buffer is flushed
    /// early
    pub buffer_capacity: usize,

    /// Handling of constraints the optimizer could not schedule
    pub residual_policy: ResidualPolicy,
}

impl Default for SailConfig {
    fn default() -> Self {
        Self {
            truth_maintenance: false,
            buffer_capacity: 10_000,
            residual_policy: ResidualPolicy::Reject,
        }
    }
}

impl SailConfig {
    /// Configuration with truth maintenance turned on
    pub fn with_truth_maintenance() -> Self {
        Self {
            truth_maintenance: true,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> SailResult<Self> {
        let config: SailConfig = serde_json::from_str(json)
            .map_err(|e| SailError::Config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SailResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SailError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Build a configuration from flat `key=value` properties. Unknown keys
    /// are ignored; missing keys keep their defaults.
    pub fn from_properties(properties: &HashMap<String, String>) -> SailResult<Self> {
        let mut config = Self::default();

        if let Some(value) = properties.get(TRUTH_MAINTENANCE_KEY) {
            config.truth_maintenance = value.trim().parse::<bool>().map_err(|_| {
                SailError::Config(format!(
                    "{} must be true or false, got '{}'",
                    TRUTH_MAINTENANCE_KEY, value
                ))
            })?;
        }

        if let Some(value) = properties.get(BUFFER_CAPACITY_KEY) {
            config.buffer_capacity = value.trim().parse::<usize>().map_err(|_| {
                SailError::Config(format!(
                    "{} must be a non-negative integer, got '{}'",
                    BUFFER_CAPACITY_KEY, value
                ))
            })?;
        }

        if let Some(value) = properties.get(RESIDUAL_POLICY_KEY) {
            config.residual_policy = ResidualPolicy::parse(value).ok_or_else(|| {
                SailError::Config(format!(
                    "{} must be 'reject' or 'append', got '{}'",
                    RESIDUAL_POLICY_KEY, value
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SailResult<()> {
        if self.buffer_capacity == 0 {
            return Err(SailError::Config(
                "buffer_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
