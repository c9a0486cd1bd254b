//! Configuration loading for DhruvaPatrol

use crate::error::{PatrolError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Start node used when none is configured.
pub const DEFAULT_START_NODE: usize = 5;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatrolConfig {
    #[serde(default)]
    pub patrol: PatrolSettings,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Patrol decision settings
#[derive(Clone, Debug, Deserialize)]
pub struct PatrolSettings {
    /// Row-major index of the starting cell (default: 5)
    #[serde(default = "default_start_node")]
    pub start_node: usize,

    /// Tie-break RNG seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Step cap for the run loop. `None` lets the binary cap the run at
    /// 100 steps per free cell.
    #[serde(default)]
    pub max_steps: Option<usize>,

    /// Two deltaP values closer than this are treated as a tie (default: 0.0)
    #[serde(default = "default_tie_tolerance")]
    pub tie_tolerance: f64,

    /// Consecutive revisits before the agent heads for the nearest unvisited
    /// cell. `None` (default) keeps the pure deltaP rule, which can cycle
    /// forever on some connected grids.
    #[serde(default)]
    pub stall_limit: Option<usize>,
}

impl Default for PatrolSettings {
    fn default() -> Self {
        Self {
            start_node: default_start_node(),
            seed: None,
            max_steps: None,
            tie_tolerance: default_tie_tolerance(),
            stall_limit: None,
        }
    }
}

/// Output configuration
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to save the visited path, if anywhere
    #[serde(default)]
    pub path_file: Option<PathBuf>,

    /// Log the per-cell visit counts at the end of the run
    #[serde(default)]
    pub print_visit_map: bool,
}

fn default_start_node() -> usize {
    DEFAULT_START_NODE
}
fn default_tie_tolerance() -> f64 {
    0.0
}

impl PatrolConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PatrolError::Config(format!("Failed to read config file: {}", e)))?;
        let config: PatrolConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the selector cannot work with.
    pub fn validate(&self) -> Result<()> {
        let tolerance = self.patrol.tie_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PatrolError::Config(format!(
                "tie_tolerance must be finite and non-negative, got {}",
                tolerance
            )));
        }
        if self.patrol.max_steps == Some(0) {
            return Err(PatrolError::Config(
                "max_steps must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}
