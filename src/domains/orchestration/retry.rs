use super::classify::FailureClassifier;
use super::ports::ProcessRunner;
use super::process::{CommandSpec, ProcessOutput};
use crate::common::{OrchestrationError, OrchestrationResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Bounded retry for the one known transient generator failure.
///
/// Only failures the classifier marks transient are retried; any other
/// non-zero exit is returned at once. `max_retries` caps the total number of
/// transient failures: the one that reaches it ends the run with
/// [`OrchestrationError::RetriesExhausted`], so at most `max_retries`
/// attempts are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub output: ProcessOutput,
    pub retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub async fn run(
        &self,
        runner: &dyn ProcessRunner,
        spec: &CommandSpec,
        classifier: &FailureClassifier,
    ) -> OrchestrationResult<RetryOutcome> {
        let mut retries = 0u32;
        loop {
            let output = runner.run(spec).await?;
            if output.success() {
                return Ok(RetryOutcome { output, retries });
            }

            let failure = classifier.classify(&output);
            if !failure.is_transient() {
                return Err(OrchestrationError::Failed {
                    stage: spec.stage,
                    code: output.code,
                    stderr: output.stderr,
                });
            }

            retries += 1;
            if retries >= self.max_retries {
                return Err(OrchestrationError::RetriesExhausted {
                    stage: spec.stage,
                    retries,
                    last_stderr: output.stderr,
                });
            }

            warn!(
                stage = %spec.stage,
                retry = retries,
                max_retries = self.max_retries,
                "transient {:?} failure, retrying",
                failure
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Stage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with the overflow signature `failures` times, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ProcessRunner for Flaky {
        async fn run(&self, _spec: &CommandSpec) -> OrchestrationResult<ProcessOutput> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Ok(ProcessOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "OverflowError: Python integer 65536 out of bounds for uint16".to_string(),
                })
            } else {
                Ok(ProcessOutput {
                    code: Some(0),
                    ..ProcessOutput::default()
                })
            }
        }
    }

    fn spec() -> CommandSpec {
        CommandSpec::new(Stage::Generator, "python").arg("build.py")
    }

    #[tokio::test]
    async fn ninth_retry_may_still_succeed() {
        let runner = Flaky { failures: 9, calls: AtomicU32::new(0) };
        let outcome = RetryPolicy::default()
            .run(&runner, &spec(), &FailureClassifier::default())
            .await
            .unwrap();
        assert_eq!(outcome.retries, 9);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn tenth_transient_failure_exhausts() {
        let runner = Flaky { failures: 10, calls: AtomicU32::new(0) };
        let err = RetryPolicy::default()
            .run(&runner, &spec(), &FailureClassifier::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::RetriesExhausted { retries: 10, .. }));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 10);
    }
}
