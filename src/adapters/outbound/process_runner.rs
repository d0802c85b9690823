use crate::common::{OrchestrationError, OrchestrationResult};
use crate::domains::orchestration::{CommandSpec, ProcessOutput, ProcessRunner};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs subprocesses with `tokio::process`, capturing stdout and stderr.
/// A timed-out child is killed when its handle is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> OrchestrationResult<ProcessOutput> {
        debug!(stage = %spec.stage, program = %spec.program, args = ?spec.args, "spawning");

        let spawn_error = |source: std::io::Error| OrchestrationError::Spawn {
            stage: spec.stage,
            program: spec.program.clone(),
            source,
        };

        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let waiting = child.wait_with_output();
        let output = match spec.timeout {
            Some(limit) => tokio::time::timeout(limit, waiting)
                .await
                .map_err(|_| OrchestrationError::Timeout {
                    stage: spec.stage,
                    after: limit,
                })?,
            None => waiting.await,
        }
        .map_err(spawn_error)?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
