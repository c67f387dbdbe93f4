//! Configuration for the wireless calculators.
//!
//! Every field has a default matching common engineering convention, so an
//! empty TOML file (or no file at all) yields `CalcConfig::default()`.
//!
//! ```
//! use wirelesscalc::config::{CalcConfig, ErlangMethod};
//!
//! let config = CalcConfig::from_toml_str(
//!     r#"
//!     [cellular]
//!     default_blocking_probability = 0.01
//!     erlang_method = "recursive"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.cellular.erlang_method, ErlangMethod::Recursive);
//! assert_eq!(config.cellular.max_channels, 1000);
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_BLOCKING_PROBABILITY, DEFAULT_MAX_CHANNELS, DEFAULT_PATH_LOSS_EXPONENT,
    REFERENCE_TEMPERATURE_K,
};
use crate::error::{CalcError, Result};

/// Erlang-B evaluation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ErlangMethod {
    /// Closed form `(a^c/c!) / sum(a^i/i!)`; overflowing terms degrade to full blocking
    #[default]
    Direct,
    /// Overflow-free recurrence `B(c) = a*B(c-1) / (c + a*B(c-1))`
    Recursive,
}

/// System-wide calculator configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// Link budget defaults
    pub link_budget: LinkBudgetConfig,
    /// Cellular design defaults and search bounds
    pub cellular: CellularConfig,
    /// Explanation service settings
    pub explain: ExplainConfig,
}

/// Link budget configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkBudgetConfig {
    /// System noise temperature used when a request omits `systemTempK`
    pub default_system_temp_k: f64,
}

/// Cellular design configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CellularConfig {
    /// Grade of service used when a request omits `blockingProb` (0-1 range)
    pub default_blocking_probability: f64,
    /// Path-loss exponent used when a request omits `pathLossExp`
    pub default_path_loss_exponent: f64,
    /// Largest channel count tried before the search gives up
    pub max_channels: u32,
    /// Erlang-B evaluation method
    pub erlang_method: ErlangMethod,
}

/// Explanation service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    /// Time allowed for one explanation before falling back
    pub timeout_ms: u64,
    /// External explanation program and its arguments; the prompt is written
    /// to its stdin. Empty selects the built-in summary.
    pub command: Vec<String>,
}

impl ExplainConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LinkBudgetConfig {
    fn default() -> Self {
        Self {
            default_system_temp_k: REFERENCE_TEMPERATURE_K,
        }
    }
}

impl Default for CellularConfig {
    fn default() -> Self {
        Self {
            default_blocking_probability: DEFAULT_BLOCKING_PROBABILITY,
            default_path_loss_exponent: DEFAULT_PATH_LOSS_EXPONENT,
            max_channels: DEFAULT_MAX_CHANNELS,
            erlang_method: ErlangMethod::Direct,
        }
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            command: Vec::new(),
        }
    }
}

impl CalcConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| CalcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CalcError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let p = self.cellular.default_blocking_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(CalcError::Config(format!(
                "default_blocking_probability must be within [0, 1], got {}",
                p
            )));
        }
        if !self.cellular.default_path_loss_exponent.is_finite() {
            return Err(CalcError::Config(
                "default_path_loss_exponent must be finite".to_string(),
            ));
        }
        if self.cellular.max_channels == 0 {
            return Err(CalcError::Config("max_channels must be positive".to_string()));
        }
        if !self.link_budget.default_system_temp_k.is_finite() {
            return Err(CalcError::Config(
                "default_system_temp_k must be finite".to_string(),
            ));
        }
        if self.explain.timeout_ms == 0 {
            return Err(CalcError::Config("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }
}
