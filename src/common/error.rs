use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// External collaborator a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generator,
    Solver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generator => write!(f, "generator"),
            Stage::Solver => write!(f, "solver"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("Unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Integer out of range: {text}")]
    IntegerOverflow { text: String },

    #[error("Trailing input after term at offset {offset}")]
    TrailingInput { offset: usize },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("Border crop of {border}px leaves no image (image is {width}x{height})")]
    CropTooLarge { border: u32, width: u32, height: u32 },

    #[error("Failed to load background image {path}: {source}")]
    Background {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact already exists: {path}")]
    ArtifactExists { path: PathBuf },

    #[error("Failed to encode artifact {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to persist artifact {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("{stage}: missing required argument `{argument}`")]
    MissingArgument { stage: Stage, argument: &'static str },

    #[error("{stage}: failed to spawn `{program}`: {source}")]
    Spawn {
        stage: Stage,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage}: timed out after {after:?}")]
    Timeout { stage: Stage, after: Duration },

    #[error("{stage}: exited unsuccessfully (code {code:?}): {stderr}")]
    Failed {
        stage: Stage,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{stage}: transient failure persisted after {retries} retries: {last_stderr}")]
    RetriesExhausted {
        stage: Stage,
        retries: u32,
        last_stderr: String,
    },
}

impl OrchestrationError {
    pub fn stage(&self) -> Stage {
        match self {
            OrchestrationError::MissingArgument { stage, .. }
            | OrchestrationError::Spawn { stage, .. }
            | OrchestrationError::Timeout { stage, .. }
            | OrchestrationError::Failed { stage, .. }
            | OrchestrationError::RetriesExhausted { stage, .. } => *stage,
        }
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to open trajectory table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed position in row {row}: {text:?}")]
    Position { row: usize, text: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write trajectory table {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Failed to read parameter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write parameter file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Parameter file error: {0}")]
    Params(#[from] ParamsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
pub type ImportResult<T> = Result<T, ImportError>;
pub type ExportResult<T> = Result<T, ExportError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
