use crate::domains::orchestration::{EnvironmentParams, FailureClassifier, RetryPolicy};
use crate::domains::rendering::RenderOptions;
use crate::domains::trajectory::CoordinateOrder;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub environment: EnvironmentParams,
    pub solver: SolverConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub program: String,
    /// Arguments placed before the amount.
    pub args: Vec<String>,
    pub amount: Option<u32>,
    /// Side file the generator reads its parameters from.
    pub params_file: PathBuf,
    pub params_backup: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub retry: RetryPolicy,
    pub classifier: FailureClassifier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub program: String,
    /// Extra arguments placed before the program files (e.g. `"0"` for all models).
    pub args: Vec<String>,
    pub files: Vec<PathBuf>,
    pub timeout_secs: Option<u64>,
    /// The solver reports satisfiability through its exit code.
    pub success_exit_codes: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    pub background: Option<PathBuf>,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub border_width: Option<u32>,
    pub coordinate_order: CoordinateOrder,
    /// Where per-answer trajectory tables are written, if anywhere.
    pub export_dir: Option<PathBuf>,
    pub options: RenderOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: String,
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["build.py".to_string()],
            amount: None,
            params_file: PathBuf::from("envs/params.py"),
            params_backup: Some(PathBuf::from("Backups/envs/params.py")),
            timeout_secs: Some(600),
            retry: RetryPolicy::default(),
            classifier: FailureClassifier::default(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            program: "clingo".to_string(),
            args: Vec::new(),
            files: Vec::new(),
            timeout_secs: Some(300),
            success_exit_codes: vec![0, 10, 20, 30],
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Plots"),
            background: None,
            rows: None,
            cols: None,
            border_width: None,
            coordinate_order: CoordinateOrder::RowCol,
            export_dir: None,
            options: RenderOptions::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Optional TOML file overlaid with `TRAJVIZ__SECTION__KEY` environment
    /// variables (e.g. `TRAJVIZ__SOLVER__PROGRAM=/opt/clingo`).
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path.as_ref()).required(true));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("TRAJVIZ")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("loading configuration")?;
        settings
            .try_deserialize()
            .context("deserializing configuration")
    }
}
