use crate::common::{OrchestrationError, OrchestrationResult, Stage};
use crate::config::GeneratorConfig;
use crate::domains::orchestration::{
    CommandSpec, FailureClassifier, GeneratorPort, GeneratorReport, ProcessRunner, RetryPolicy,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runs the external environment generator as `<program> <args..> <amount>`,
/// retrying only the transient seed-overflow failure.
pub struct ExternalGenerator {
    runner: Arc<dyn ProcessRunner>,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    policy: RetryPolicy,
    classifier: FailureClassifier,
}

impl ExternalGenerator {
    pub fn new(runner: Arc<dyn ProcessRunner>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            args,
            timeout: None,
            policy: RetryPolicy::default(),
            classifier: FailureClassifier::default(),
        }
    }

    pub fn from_config(runner: Arc<dyn ProcessRunner>, config: &GeneratorConfig) -> Self {
        Self::new(runner, config.program.clone(), config.args.clone())
            .with_timeout(config.timeout())
            .with_policy(config.retry)
            .with_classifier(config.classifier.clone())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
        self.classifier = classifier;
        self
    }
}

#[async_trait]
impl GeneratorPort for ExternalGenerator {
    async fn build(&self, amount: Option<u32>) -> OrchestrationResult<GeneratorReport> {
        let amount = amount.ok_or(OrchestrationError::MissingArgument {
            stage: Stage::Generator,
            argument: "amount",
        })?;

        let spec = CommandSpec::new(Stage::Generator, self.program.clone())
            .args(self.args.iter().cloned())
            .arg(amount.to_string())
            .timeout(self.timeout);

        let outcome = self
            .policy
            .run(self.runner.as_ref(), &spec, &self.classifier)
            .await?;

        info!(amount, retries = outcome.retries, "generator finished");
        Ok(GeneratorReport {
            amount,
            retries: outcome.retries,
        })
    }
}
