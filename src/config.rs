//! Configuration loading from TOML with CLI overrides.
//!
//! Every field has a sensible default, an optional `config.toml` may
//! override any of them, and command-line flags override the file. All
//! constraints are enforced by [`SimulationConfig::validate`] before a run
//! starts — nothing fails mid-run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::system::{SystemKind, ROTATION_A, ROTATION_B};
use crate::types::CroupierError;
use crate::wheel::DEFAULT_HOLES;

/// Top-level simulation configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    /// Staking system name (see [`SystemKind`]).
    pub system: String,
    /// Number of spins per run.
    pub spins: u64,
    /// Starting bankroll. May be zero — the run tracks the trajectory, not
    /// solvency.
    pub bankroll: f64,
    /// Opening stake.
    pub stake: f64,
    /// RNG seed; omitted means a fresh entropy seed per run.
    pub seed: Option<u64>,
    pub wheel: WheelConfig,
    pub rotation: RotationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WheelConfig {
    pub holes: u32,
}

/// Rotation tables are presets, not constants — either slot may be swapped
/// for an alternative table (e.g. `[1, 3, 2, 6]` for slot B).
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RotationConfig {
    pub table_a: Vec<f64>,
    pub table_b: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            system: "martingale".to_string(),
            spins: 10_000,
            bankroll: 0.0,
            stake: 1.0,
            seed: None,
            wheel: WheelConfig::default(),
            rotation: RotationConfig::default(),
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            holes: DEFAULT_HOLES,
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            table_a: ROTATION_A.to_vec(),
            table_b: ROTATION_B.to_vec(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: SimulationConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// The selected staking system, rejecting unknown names.
    pub fn kind(&self) -> Result<SystemKind, CroupierError> {
        self.system.parse()
    }

    /// The configured rotation table for a rotation system, if any.
    pub fn table_for(&self, kind: SystemKind) -> Option<&[f64]> {
        match kind {
            SystemKind::RotationA => Some(&self.rotation.table_a),
            SystemKind::RotationB => Some(&self.rotation.table_b),
            _ => None,
        }
    }

    /// Enforce every construction-time constraint before a run starts.
    pub fn validate(&self) -> Result<(), CroupierError> {
        self.kind()?;
        if self.spins == 0 {
            return Err(CroupierError::InvalidConfig(
                "spins must be at least 1".to_string(),
            ));
        }
        if !(self.stake > 0.0) || !self.stake.is_finite() {
            return Err(CroupierError::InvalidConfig(format!(
                "stake must be positive, got {}",
                self.stake
            )));
        }
        if self.wheel.holes == 0 {
            return Err(CroupierError::InvalidConfig(
                "wheel needs at least one hole".to_string(),
            ));
        }
        for (name, table) in [
            ("table_a", &self.rotation.table_a),
            ("table_b", &self.rotation.table_b),
        ] {
            if table.is_empty() {
                return Err(CroupierError::InvalidConfig(format!(
                    "rotation {name} must not be empty"
                )));
            }
            if table.iter().any(|stake| !(*stake > 0.0)) {
                return Err(CroupierError::InvalidConfig(format!(
                    "rotation {name} entries must be positive"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
