use super::process::{CommandSpec, ProcessOutput};
use crate::common::OrchestrationResult;
use async_trait::async_trait;
use std::path::PathBuf;

/// Port for running a subprocess to completion.
/// Implementations must surface spawn failures and timeouts as errors and
/// report every finished run, successful or not, as [`ProcessOutput`].
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> OrchestrationResult<ProcessOutput>;
}

/// Outcome of a successful generator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorReport {
    pub amount: u32,
    /// Transient failures that were retried before the successful run.
    pub retries: u32,
}

/// Port for the environment/map generator.
#[async_trait]
pub trait GeneratorPort: Send + Sync {
    async fn build(&self, amount: Option<u32>) -> OrchestrationResult<GeneratorReport>;
}

/// One model reported by the solver: its atoms joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    /// 1-based, in the order the solver reported it.
    pub index: usize,
    pub atoms: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable(Vec<AnswerSet>),
    Unsatisfiable,
    /// The solver stopped without deciding (for example a solver-side limit).
    Unknown,
}

impl SolveOutcome {
    pub fn answers(&self) -> &[AnswerSet] {
        match self {
            SolveOutcome::Satisfiable(answers) => answers,
            _ => &[],
        }
    }
}

/// Port for the constraint solver. The external-process adapter is the only
/// implementation; an embedded solver would plug in here.
#[async_trait]
pub trait SolverPort: Send + Sync {
    async fn solve(&self, files: &[PathBuf]) -> OrchestrationResult<SolveOutcome>;
}
