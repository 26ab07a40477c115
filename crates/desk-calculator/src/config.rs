//! Calculator configuration
//!
//! Loaded from JSON or YAML, then overridden by command-line flags.

use crate::core::{ArithmeticRules, DisplayLocale, ModuloByZero};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Log verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Warnings (error displays) and errors
    #[default]
    Normal,
    /// Auto-clear activity as well
    Verbose,
    /// Every dispatched action
    Debug,
}

impl Verbosity {
    /// Default `EnvFilter` directive for this level
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }

    /// Level for a `-v` count
    #[must_use]
    pub const fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }
}

/// What new input does to a pending auto-clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoClearPolicy {
    /// Pending clears still fire after new input
    #[default]
    Preserve,
    /// Any new input drops pending clears
    CancelOnInput,
}

impl FromStr for AutoClearPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preserve" => Ok(Self::Preserve),
            "cancel_on_input" | "cancel-on-input" => Ok(Self::CancelOnInput),
            other => Err(format!(
                "unknown auto-clear policy `{other}` (expected preserve or cancel-on-input)"
            )),
        }
    }
}

/// Calculator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Delay before the error display clears itself, in milliseconds
    pub auto_clear_ms: u64,
    /// Whether new input cancels a pending auto-clear
    pub auto_clear_policy: AutoClearPolicy,
    /// Modulo-by-zero behaviour
    pub modulo_by_zero: ModuloByZero,
    /// Number formatting
    pub locale: DisplayLocale,
    /// Log verbosity
    pub verbosity: Verbosity,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            auto_clear_ms: 2000,
            auto_clear_policy: AutoClearPolicy::Preserve,
            modulo_by_zero: ModuloByZero::Error,
            locale: DisplayLocale::english(),
            verbosity: Verbosity::Normal,
        }
    }
}

impl CalculatorConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration file; the format follows the extension
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&text)?),
            Some("yaml" | "yml") => Ok(serde_yaml_ng::from_str(&text)?),
            other => Err(AppError::config(format!(
                "unsupported configuration format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Renders the configuration as YAML
    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set auto-clear delay in milliseconds
    #[must_use]
    pub const fn with_auto_clear_ms(mut self, ms: u64) -> Self {
        self.auto_clear_ms = ms;
        self
    }

    /// Set auto-clear policy
    #[must_use]
    pub const fn with_auto_clear_policy(mut self, policy: AutoClearPolicy) -> Self {
        self.auto_clear_policy = policy;
        self
    }

    /// Set modulo-by-zero behaviour
    #[must_use]
    pub const fn with_modulo_by_zero(mut self, rule: ModuloByZero) -> Self {
        self.modulo_by_zero = rule;
        self
    }

    /// Set number formatting
    #[must_use]
    pub fn with_locale(mut self, locale: DisplayLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Auto-clear delay
    #[must_use]
    pub const fn auto_clear_delay(&self) -> Duration {
        Duration::from_millis(self.auto_clear_ms)
    }

    /// Arithmetic rules for the state machine
    #[must_use]
    pub const fn rules(&self) -> ArithmeticRules {
        ArithmeticRules {
            modulo_by_zero: self.modulo_by_zero,
        }
    }
}
