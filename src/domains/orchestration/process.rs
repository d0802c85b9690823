use crate::common::Stage;
use std::time::Duration;

/// A subprocess invocation, fully described before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub stage: Stage,
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(stage: Stage, program: impl Into<String>) -> Self {
        Self {
            stage,
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
