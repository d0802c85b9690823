// Pipeline Service - build environments, solve, turn answers into rendered trajectories
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::inbound::TrajectoryCsvImporter;
use crate::adapters::outbound::{export_trajectories, ParamsFile};
use crate::common::{ApplicationError, ApplicationResult};
use crate::domains::logger::DynLogger;
use crate::domains::orchestration::{
    AnswerSet, EnvironmentParams, GeneratorPort, GeneratorReport, SolveOutcome, SolverPort,
};
use crate::domains::rendering::{
    ArtifactName, GridDescriptor, GridRenderer, RenderSession, RenderedArtifact,
};
use crate::domains::trajectory::{build_trajectories, FactParser, TrajectorySet};

pub struct PipelineService {
    generator: Arc<dyn GeneratorPort>,
    solver: Arc<dyn SolverPort>,
    logger: DynLogger,
    parser: FactParser,
    renderer: GridRenderer,
}

impl PipelineService {
    pub fn new(
        generator: Arc<dyn GeneratorPort>,
        solver: Arc<dyn SolverPort>,
        logger: DynLogger,
    ) -> Self {
        Self {
            generator,
            solver,
            logger,
            parser: FactParser::default(),
            renderer: GridRenderer::default(),
        }
    }

    pub fn with_parser(mut self, parser: FactParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_renderer(mut self, renderer: GridRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn renderer(&self) -> &GridRenderer {
        &self.renderer
    }

    /// Write the explicit environment parameters into the generator's side file.
    pub fn prepare_environment(
        &self,
        params_file: &ParamsFile,
        params: &EnvironmentParams,
    ) -> ApplicationResult<usize> {
        let overrides = params.to_overrides();
        let rewritten = params_file.apply(&overrides)?;
        if rewritten < overrides.len() {
            self.logger.warn(&format!(
                "{} of {} parameters not found in {}",
                overrides.len() - rewritten,
                overrides.len(),
                params_file.path().display()
            ));
        }
        Ok(rewritten)
    }

    pub async fn build_environments(&self, amount: Option<u32>) -> ApplicationResult<GeneratorReport> {
        match self.generator.build(amount).await {
            Ok(report) => {
                self.logger.info(&format!(
                    "built {} environment(s) after {} retries",
                    report.amount, report.retries
                ));
                Ok(report)
            }
            Err(e) => {
                self.logger.error(&format!("{} stage failed: {}", e.stage(), e));
                Err(e.into())
            }
        }
    }

    pub async fn solve(&self, files: &[PathBuf]) -> ApplicationResult<SolveOutcome> {
        match self.solver.solve(files).await {
            Ok(outcome) => {
                match &outcome {
                    SolveOutcome::Satisfiable(answers) => {
                        self.logger.info(&format!("solver reported {} answer set(s)", answers.len()))
                    }
                    SolveOutcome::Unsatisfiable => self.logger.warn("solver reported UNSATISFIABLE"),
                    SolveOutcome::Unknown => self.logger.warn("solver finished without a decision"),
                }
                Ok(outcome)
            }
            Err(e) => {
                self.logger.error(&format!("{} stage failed: {}", e.stage(), e));
                Err(e.into())
            }
        }
    }

    /// Parse one answer-set string into trajectories. Malformed atoms are
    /// dropped, never fatal.
    pub fn trajectories_from_text(&self, answer: &str) -> TrajectorySet {
        let facts = self.parser.parse(answer);
        if facts.dropped > 0 {
            self.logger
                .warn(&format!("dropped {} malformed fact atom(s)", facts.dropped));
        }
        build_trajectories(facts)
    }

    pub fn trajectories_for(&self, answer: &AnswerSet) -> TrajectorySet {
        self.trajectories_from_text(&answer.atoms)
    }

    /// One artifact per answer, named by answer index inside the session folder.
    pub fn render_answers(
        &self,
        answers: &[AnswerSet],
        grid: &GridDescriptor,
        session: &mut RenderSession,
    ) -> ApplicationResult<Vec<RenderedArtifact>> {
        let mut artifacts = Vec::with_capacity(answers.len());
        for answer in answers {
            let trajectories = self.trajectories_for(answer);
            let artifact = session
                .render(&self.renderer, &trajectories, grid, ArtifactName::Answer(answer.index))
                .map_err(|e| self.report(e.into()))?;
            self.logger.info(&format!(
                "answer {} rendered to {}",
                answer.index,
                artifact.path().display()
            ));
            artifacts.push(artifact);
        }
        Ok(artifacts)
    }

    /// Persist each answer's trajectories as `answer_<index>.csv` under `dir`.
    pub fn export_answers(&self, answers: &[AnswerSet], dir: &Path) -> ApplicationResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(answers.len());
        for answer in answers {
            let path = dir.join(format!("answer_{}.csv", answer.index));
            export_trajectories(&self.trajectories_for(answer), &path)
                .map_err(|e| self.report(e.into()))?;
            written.push(path);
        }
        if !written.is_empty() {
            self.logger
                .info(&format!("exported {} trajectory table(s) to {}", written.len(), dir.display()));
        }
        Ok(written)
    }

    /// Render a previously exported trajectory table with a sequential name.
    pub fn render_csv(
        &self,
        csv: &Path,
        importer: &TrajectoryCsvImporter,
        grid: &GridDescriptor,
        session: &mut RenderSession,
    ) -> ApplicationResult<RenderedArtifact> {
        let trajectories = importer
            .import_path(csv)
            .map_err(|e| self.report(e.into()))?;
        let artifact = session
            .render(&self.renderer, &trajectories, grid, ArtifactName::Sequential)
            .map_err(|e| self.report(e.into()))?;
        self.logger.info(&format!(
            "{} rendered to {}",
            csv.display(),
            artifact.path().display()
        ));
        Ok(artifact)
    }

    fn report(&self, error: ApplicationError) -> ApplicationError {
        self.logger.error(&error.to_string());
        error
    }
}
