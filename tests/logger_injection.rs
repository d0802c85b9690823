use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use trajviz::adapters::outbound::{init_noop_logger, MultiLogger};
use trajviz::application::PipelineService;
use trajviz::common::{OrchestrationError, OrchestrationResult, Stage};
use trajviz::domains::logger::DomainLogger;
use trajviz::domains::orchestration::{
    AnswerSet, GeneratorPort, GeneratorReport, SolveOutcome, SolverPort,
};

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

struct FailingGenerator;

#[async_trait]
impl GeneratorPort for FailingGenerator {
    async fn build(&self, _amount: Option<u32>) -> OrchestrationResult<GeneratorReport> {
        Err(OrchestrationError::Failed {
            stage: Stage::Generator,
            code: Some(1),
            stderr: "ValueError: bad width".to_string(),
        })
    }
}

struct OneAnswerSolver;

#[async_trait]
impl SolverPort for OneAnswerSolver {
    async fn solve(&self, _files: &[PathBuf]) -> OrchestrationResult<SolveOutcome> {
        Ok(SolveOutcome::Satisfiable(vec![AnswerSet {
            index: 1,
            atoms: "position(0,(1,2),n,0)".to_string(),
        }]))
    }
}

#[tokio::test]
async fn test_pipeline_reports_through_injected_logger() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = capture.clone() as Arc<dyn DomainLogger>;
    let service = PipelineService::new(Arc::new(FailingGenerator), Arc::new(OneAnswerSolver), logger);

    let err = service.build_environments(Some(1)).await.unwrap_err();
    assert!(err.to_string().contains("ValueError: bad width"));

    service.solve(&[PathBuf::from("asp/trans.lp")]).await.unwrap();
    service.trajectories_from_text("position(0,(x,2),n,0)");

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("ERR:generator stage failed")));
    assert!(msgs.iter().any(|m| m.contains("INFO:solver reported 1 answer set(s)")));
    assert!(msgs.iter().any(|m| m.contains("WARN:dropped 1 malformed fact atom(s)")));
}

#[tokio::test]
async fn test_multi_and_noop_logger() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(
        first.clone() as Arc<dyn DomainLogger>,
        Some(second.clone() as Arc<dyn DomainLogger>),
    );

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&first, &second] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(msgs.as_slice(), ["INFO:one", "WARN:two", "ERR:three"]);
    }

    // No-op logger should accept calls and not panic
    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}
