use crate::adapters::inbound::parse_solver_output;
use crate::common::{OrchestrationError, OrchestrationResult, Stage};
use crate::config::SolverConfig;
use crate::domains::orchestration::{CommandSpec, ProcessRunner, SolveOutcome, SolverPort};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runs the solver as `<program> <args..> <files..>` and reads answer sets
/// from its stdout. Failures are never retried.
pub struct ExternalSolver {
    runner: Arc<dyn ProcessRunner>,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    success_exit_codes: Vec<i32>,
}

impl ExternalSolver {
    pub fn from_config(runner: Arc<dyn ProcessRunner>, config: &SolverConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout(),
            success_exit_codes: config.success_exit_codes.clone(),
        }
    }
}

#[async_trait]
impl SolverPort for ExternalSolver {
    async fn solve(&self, files: &[PathBuf]) -> OrchestrationResult<SolveOutcome> {
        if files.is_empty() {
            return Err(OrchestrationError::MissingArgument {
                stage: Stage::Solver,
                argument: "files",
            });
        }

        let spec = CommandSpec::new(Stage::Solver, self.program.clone())
            .args(self.args.iter().cloned())
            .args(files.iter().map(|f| f.to_string_lossy().into_owned()))
            .timeout(self.timeout);

        let output = self.runner.run(&spec).await?;
        let succeeded = output
            .code
            .map(|code| self.success_exit_codes.contains(&code))
            .unwrap_or(false);
        if !succeeded {
            return Err(OrchestrationError::Failed {
                stage: Stage::Solver,
                code: output.code,
                stderr: output.stderr,
            });
        }

        let outcome = parse_solver_output(&output.stdout);
        info!(answers = outcome.answers().len(), "solver finished");
        Ok(outcome)
    }
}
