//! Command-line interface for `desk-calc`
//!
//! ## Usage
//!
//! ```bash
//! desk-calc                              # Interactive terminal calculator
//! desk-calc keys 12 + 30 Enter           # Scripted key presses
//! desk-calc keys --trace 1 / 0 = wait:2000
//! desk-calc --policy cancel-on-input config
//! ```

use crate::calculator::Calculator;
use crate::clock::ManualClock;
use crate::config::{AutoClearPolicy, CalculatorConfig, Verbosity};
use crate::core::{DisplaySnapshot, ModuloByZero};
use crate::display::NullSink;
use crate::error::{AppError, AppResult};
use crate::keypad::{key_to_action, KeypadAction};
use crate::logging::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// desk-calc: keypad calculator for the terminal
#[derive(Parser, Debug)]
#[command(name = "desk-calc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Delay before an error display clears itself
    #[arg(long, value_name = "MS", global = true)]
    pub auto_clear_ms: Option<u64>,

    /// Whether new input cancels a pending auto-clear
    #[arg(long, value_name = "POLICY", global = true)]
    pub policy: Option<PolicyArg>,

    /// What modulo by zero does
    #[arg(long, value_name = "RULE", global = true)]
    pub modulo_by_zero: Option<ModuloArg>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write diagnostic logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive terminal calculator
    Run,

    /// Press keys from the command line and print the display
    Keys(KeysArgs),

    /// Show the effective configuration
    Config,
}

/// Arguments for the keys command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct KeysArgs {
    /// Print the display after every step
    #[arg(long)]
    pub trace: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Keys: named keys (Enter, Escape, Backspace, Delete), button actions
    /// (square-root, negate, ...), `wait:<ms>`, or characters typed one by one
    #[arg(required = true, allow_hyphen_values = true, value_name = "TOKENS")]
    pub tokens: Vec<String>,
}

/// Auto-clear policy argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyArg {
    /// Pending clears still fire after new input
    Preserve,
    /// New input cancels pending clears
    CancelOnInput,
}

impl From<PolicyArg> for AutoClearPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Preserve => Self::Preserve,
            PolicyArg::CancelOnInput => Self::CancelOnInput,
        }
    }
}

/// Modulo-by-zero argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuloArg {
    /// Show "Cannot divide by zero"
    Error,
    /// Floating-point remainder (displays 0)
    Native,
}

impl From<ModuloArg> for ModuloByZero {
    fn from(arg: ModuloArg) -> Self {
        match arg {
            ModuloArg::Error => Self::Error,
            ModuloArg::Native => Self::Native,
        }
    }
}

impl Cli {
    /// Log line format from `--log-json`
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }

    /// Verbosity from `-v`/`-q`, if either was given
    #[must_use]
    pub fn verbosity_override(&self) -> Option<Verbosity> {
        if self.quiet {
            Some(Verbosity::Quiet)
        } else if self.verbose > 0 {
            Some(Verbosity::from_occurrences(self.verbose))
        } else {
            None
        }
    }

    /// Loads the configuration file, then applies flag overrides
    pub fn resolve_config(&self) -> AppResult<CalculatorConfig> {
        let mut config = match &self.config {
            Some(path) => CalculatorConfig::from_file(path)?,
            None => CalculatorConfig::default(),
        };

        if let Some(ms) = self.auto_clear_ms {
            config = config.with_auto_clear_ms(ms);
        }
        if let Some(policy) = self.policy {
            config = config.with_auto_clear_policy(policy.into());
        }
        if let Some(rule) = self.modulo_by_zero {
            config = config.with_modulo_by_zero(rule.into());
        }
        if let Some(verbosity) = self.verbosity_override() {
            config = config.with_verbosity(verbosity);
        }
        Ok(config)
    }
}

// ===== Scripted key presses =====

/// One step of a `keys` script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    /// Press a button
    Press(KeypadAction),
    /// Let time pass
    Wait(Duration),
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Press(action) => f.write_str(&action.label()),
            Self::Wait(duration) => write!(f, "wait:{}", duration.as_millis()),
        }
    }
}

/// Parses one command-line token into steps
pub fn parse_token(token: &str) -> AppResult<Vec<ScriptStep>> {
    if let Some(ms) = token.strip_prefix("wait:") {
        let ms: u64 = ms
            .parse()
            .map_err(|_| AppError::invalid_argument(format!("bad wait duration `{token}`")))?;
        return Ok(vec![ScriptStep::Wait(Duration::from_millis(ms))]);
    }

    if let Some(action) = key_to_action(token).or_else(|| KeypadAction::from_data_action(token)) {
        return Ok(vec![ScriptStep::Press(action)]);
    }

    let mut buf = [0u8; 4];
    token
        .chars()
        .map(|c| {
            key_to_action(c.encode_utf8(&mut buf))
                .map(ScriptStep::Press)
                .ok_or_else(|| {
                    AppError::invalid_argument(format!("unknown key `{c}` in `{token}`"))
                })
        })
        .collect()
}

/// Parses every token, failing on the first unknown one
pub fn parse_script<S: AsRef<str>>(tokens: &[S]) -> AppResult<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for token in tokens {
        steps.extend(parse_token(token.as_ref())?);
    }
    Ok(steps)
}

/// Display after one script step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// The step, as typed
    pub step: String,
    /// Display afterwards
    pub display: DisplaySnapshot,
}

/// Result of running a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    /// Display after each step
    pub steps: Vec<TraceEntry>,
    /// Final display
    pub display: DisplaySnapshot,
}

impl ScriptReport {
    /// Plain-text rendering
    #[must_use]
    pub fn to_text(&self, trace: bool) -> String {
        if trace {
            return self
                .steps
                .iter()
                .map(|entry| {
                    format!(
                        "{:>8}  {:>24} | {}",
                        entry.step, entry.display.secondary, entry.display.primary
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
        }

        if self.display.secondary.is_empty() {
            self.display.primary.clone()
        } else {
            format!("{}\n{}", self.display.secondary, self.display.primary)
        }
    }

    /// JSON rendering; the whole report with `trace`, else the final display
    pub fn to_json(&self, trace: bool) -> AppResult<String> {
        let json = if trace {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(&self.display)?
        };
        Ok(json)
    }
}

/// Runs a script against a headless calculator on a manual clock
#[must_use]
pub fn run_script(config: CalculatorConfig, steps: &[ScriptStep]) -> ScriptReport {
    let clock = ManualClock::new();
    let mut calculator = Calculator::with_config(config, clock.clone(), NullSink, NullSink);

    let mut trace = Vec::with_capacity(steps.len());
    for step in steps {
        match step {
            ScriptStep::Press(action) => {
                calculator.dispatch(*action);
            }
            ScriptStep::Wait(duration) => {
                clock.advance(*duration);
                calculator.poll_auto_clear();
            }
        }
        trace.push(TraceEntry {
            step: step.to_string(),
            display: calculator.display(),
        });
    }

    ScriptReport {
        steps: trace,
        display: calculator.display(),
    }
}
