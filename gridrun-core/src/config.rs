//! Configuration system for Gridrun.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment.
//! Configuration is loaded from `~/.config/gridrun/config.toml` and/or
//! `.gridrun/config.toml` in the workspace directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration for a sweep invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridrunConfig {
    pub launcher: LauncherConfig,
    pub sweep: SweepConfig,
    pub output: OutputConfig,
    pub console: ConsoleConfig,
    pub runner: RunnerConfig,
}

/// Configuration for launching the external training job.
///
/// The defaults reproduce a containerized launch: `docker run --rm mnist
/// python -u main.py --epochs N --batch-size N --lr N`. Parameters are
/// always appended as discrete argv entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Program to invoke.
    pub program: String,
    /// Base arguments placed before the image name.
    #[serde(default)]
    pub args: Vec<String>,
    /// Optional container image inserted after the base arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Arguments selecting the training entrypoint inside the job.
    #[serde(default)]
    pub entrypoint: Vec<String>,
    /// Flag passing the epoch count.
    pub epochs_flag: String,
    /// Flag passing the batch size.
    pub batch_size_flag: String,
    /// Flag passing the learning rate.
    pub learning_rate_flag: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            args: vec!["run".to_string(), "--rm".to_string()],
            image: Some("mnist".to_string()),
            entrypoint: vec![
                "python".to_string(),
                "-u".to_string(),
                "main.py".to_string(),
            ],
            epochs_flag: "--epochs".to_string(),
            batch_size_flag: "--batch-size".to_string(),
            learning_rate_flag: "--lr".to_string(),
        }
    }
}

/// Parameter values tried by each sweep, plus the values held fixed
/// while another parameter varies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Epoch counts tried by the epoch sweep.
    pub epochs: Vec<u32>,
    /// Batch sizes tried by the batch sweep.
    pub batch_sizes: Vec<u32>,
    /// Learning rates tried by the learning-rate sweep.
    pub learning_rates: Vec<f64>,
    /// Epoch count used while another parameter varies.
    pub default_epochs: u32,
    /// Batch size used while another parameter varies.
    pub default_batch_size: u32,
    /// Learning rate used while another parameter varies.
    pub default_learning_rate: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            epochs: vec![1, 3, 5, 10, 15],
            batch_sizes: vec![32, 64, 128, 256],
            learning_rates: vec![0.001, 0.005, 0.01, 0.05],
            default_epochs: 5,
            default_batch_size: 64,
            default_learning_rate: 0.01,
        }
    }
}

/// Output artifact locations. File names are resolved against `dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving all artifacts (results table, sweep log, charts).
    pub dir: PathBuf,
    /// File name of the results table.
    pub results_file: String,
    /// File name of the sweep log.
    pub log_file: String,
    /// Title written at the top of the sweep log.
    pub log_title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            results_file: "mnist_results.csv".to_string(),
            log_file: "mnist_experiments.log".to_string(),
            log_title: "MNIST Docker Experiment Logs".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn results_path(&self) -> PathBuf {
        self.dir.join(&self.results_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.log_file)
    }
}

/// Console echo behavior while a run streams output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Substrings that make a raw output line worth echoing to the console.
    /// Every line reaches the sweep log regardless.
    pub echo_keywords: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            echo_keywords: vec!["Epoch".to_string(), "Accuracy".to_string()],
        }
    }
}

/// Runner supervision settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Kill a run after this many seconds. Unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl GridrunConfig {
    /// Reject configurations that cannot produce a meaningful sweep.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.launcher.program.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "launcher.program must not be empty".to_string(),
            });
        }
        if self.sweep.epochs.contains(&0) || self.sweep.default_epochs == 0 {
            return Err(ConfigError::Invalid {
                message: "sweep epoch counts must be positive".to_string(),
            });
        }
        if self.sweep.batch_sizes.contains(&0) || self.sweep.default_batch_size == 0 {
            return Err(ConfigError::Invalid {
                message: "sweep batch sizes must be positive".to_string(),
            });
        }
        let lr_ok = |lr: f64| lr.is_finite() && lr > 0.0;
        if !self.sweep.learning_rates.iter().copied().all(lr_ok)
            || !lr_ok(self.sweep.default_learning_rate)
        {
            return Err(ConfigError::Invalid {
                message: "sweep learning rates must be positive and finite".to_string(),
            });
        }
        if let Some(0) = self.runner.timeout_secs {
            return Err(ConfigError::Invalid {
                message: "runner.timeout_secs must be positive when set".to_string(),
            });
        }
        Ok(())
    }
}

/// Load configuration with the standard layering:
/// 1. Built-in defaults
/// 2. User config file (`~/.config/gridrun/config.toml`)
/// 3. Workspace config file (`<workspace>/.gridrun/config.toml`)
/// 4. Environment variables (`GRIDRUN_` prefix, `__` separator)
/// 5. Explicit overrides
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&GridrunConfig>,
) -> Result<GridrunConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(GridrunConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "gridrun", "gridrun") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".gridrun").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (GRIDRUN_SWEEP__DEFAULT_EPOCHS, GRIDRUN_RUNNER__TIMEOUT_SECS, etc.)
    figment = figment.merge(Env::prefixed("GRIDRUN_").split("__"));

    // Explicit overrides
    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: GridrunConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Check whether any Gridrun configuration file exists (user-level or
/// workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "gridrun", "gridrun") {
        if config_dir.config_dir().join("config.toml").exists() {
            return true;
        }
    }

    if let Some(ws) = workspace {
        if ws.join(".gridrun").join("config.toml").exists() {
            return true;
        }
    }

    false
}
