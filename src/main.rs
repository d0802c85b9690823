use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trajviz::adapters::inbound::TrajectoryCsvImporter;
use trajviz::adapters::outbound::{
    init_combined_logger, ExternalGenerator, ExternalSolver, ParamsFile, TokioProcessRunner,
};
use trajviz::application::PipelineService;
use trajviz::config::RenderConfig;
use trajviz::domains::orchestration::ProcessRunner;
use trajviz::domains::rendering::{GridDescriptor, GridRenderer, RenderSession};
use trajviz::domains::trajectory::FactParser;
use trajviz::Config;

#[derive(Parser)]
#[command(name = "trajviz", version, about = "Build environments, solve them and render agent trajectories")]
struct Cli {
    /// TOML configuration file; `TRAJVIZ__SECTION__KEY` variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write environment parameters and run the generator
    Build {
        #[arg(long)]
        amount: Option<u32>,
    },
    /// Run the solver and optionally render or export every answer set
    Solve(SolveArgs),
    /// Render a previously exported trajectory table
    RenderCsv {
        #[arg(long)]
        csv: PathBuf,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Print the trajectories contained in an answer-set file as JSON
    Inspect {
        #[arg(long)]
        answer_file: PathBuf,
    },
    /// Parameters, build, solve and render as configured
    Run,
    /// Restore the generator's parameter file from its backup
    ResetParams,
}

#[derive(Args)]
struct SolveArgs {
    #[arg(long, num_args = 1..)]
    files: Vec<PathBuf>,
    #[arg(long)]
    render: bool,
    /// Directory for per-answer trajectory tables
    #[arg(long)]
    export: Option<PathBuf>,
    #[command(flatten)]
    grid: GridArgs,
}

#[derive(Args)]
struct GridArgs {
    #[arg(long)]
    background: Option<PathBuf>,
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    cols: Option<u32>,
    /// Width in pixels of the border strip to crop from the background
    #[arg(long)]
    border: Option<u32>,
}

impl GridArgs {
    fn none() -> Self {
        Self {
            background: None,
            rows: None,
            cols: None,
            border: None,
        }
    }

    /// Flags win over the `[render]` section.
    fn resolve(&self, render: &RenderConfig) -> Result<GridDescriptor> {
        let background = self
            .background
            .clone()
            .or_else(|| render.background.clone())
            .context("no background image: pass --background or set render.background")?;
        let rows = self
            .rows
            .or(render.rows)
            .context("no row count: pass --rows or set render.rows")?;
        let cols = self
            .cols
            .or(render.cols)
            .context("no column count: pass --cols or set render.cols")?;
        let grid = GridDescriptor::from_path(rows, cols, &background)?
            .with_border_crop(self.border.or(render.border_width));
        Ok(grid)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref())?;
    info!("configuration loaded");

    let logger = init_combined_logger(config.logging.file.as_deref(), &config.logging.level);
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner);
    let service = PipelineService::new(
        Arc::new(ExternalGenerator::from_config(runner.clone(), &config.generator)),
        Arc::new(ExternalSolver::from_config(runner, &config.solver)),
        logger,
    )
    .with_parser(FactParser::new(config.render.coordinate_order))
    .with_renderer(GridRenderer::new(config.render.options.clone()));

    match cli.command {
        Command::Build { amount } => {
            build(&service, &config, amount.or(config.generator.amount)).await?;
        }
        Command::Solve(args) => {
            let files = if args.files.is_empty() {
                config.solver.files.clone()
            } else {
                args.files.clone()
            };
            let export = args.export.clone().or_else(|| config.render.export_dir.clone());
            let grid = if args.render {
                Some(&args.grid)
            } else {
                None
            };
            solve(&service, &config, &files, grid, export).await?;
        }
        Command::RenderCsv { csv, grid } => {
            let grid = grid.resolve(&config.render)?;
            let importer = TrajectoryCsvImporter::new(b';', config.render.coordinate_order);
            let mut session = RenderSession::new(&config.render.output_dir);
            let artifact = service.render_csv(&csv, &importer, &grid, &mut session)?;
            println!("{}", artifact.path().display());
        }
        Command::Inspect { answer_file } => {
            let answer = tokio::fs::read_to_string(&answer_file)
                .await
                .with_context(|| format!("reading {}", answer_file.display()))?;
            let trajectories = service.trajectories_from_text(&answer);
            println!("{}", serde_json::to_string_pretty(&trajectories)?);
        }
        Command::Run => {
            build(&service, &config, config.generator.amount).await?;
            let files = config.solver.files.clone();
            let grid = GridArgs::none();
            solve(&service, &config, &files, Some(&grid), config.render.export_dir.clone()).await?;
        }
        Command::ResetParams => {
            let backup = config
                .generator
                .params_backup
                .as_ref()
                .context("no backup configured: set generator.params_backup")?;
            ParamsFile::new(&config.generator.params_file).restore(backup)?;
        }
    }

    Ok(())
}

async fn build(service: &PipelineService, config: &Config, amount: Option<u32>) -> Result<()> {
    let params_file = ParamsFile::new(&config.generator.params_file);
    if !config.environment.to_overrides().is_empty() {
        service.prepare_environment(&params_file, &config.environment)?;
    }
    service.build_environments(amount).await?;
    Ok(())
}

async fn solve(
    service: &PipelineService,
    config: &Config,
    files: &[PathBuf],
    render: Option<&GridArgs>,
    export: Option<PathBuf>,
) -> Result<()> {
    let outcome = service.solve(files).await?;
    let answers = outcome.answers();

    if let Some(dir) = export {
        service.export_answers(answers, &dir)?;
    }
    if let Some(grid_args) = render {
        let grid = grid_args.resolve(&config.render)?;
        let mut session = RenderSession::new(&config.render.output_dir);
        for artifact in service.render_answers(answers, &grid, &mut session)? {
            println!("{}", artifact.path().display());
        }
    }
    Ok(())
}
