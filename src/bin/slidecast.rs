use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a narrated video from a job document (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// List the available animation styles.
    Styles(StylesArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job JSON: content sections plus narration audio.
    #[arg(long)]
    job: PathBuf,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Pipeline config JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Animation style preset.
    #[arg(long)]
    style: Option<String>,

    /// Override the style's complexity tier.
    #[arg(long, value_enum)]
    complexity: Option<ComplexityChoice>,

    /// Override the style's transition (`fade` or `slide`).
    #[arg(long)]
    transition: Option<String>,

    #[arg(long)]
    fps: Option<u32>,

    /// Output resolution, e.g. `1280x720`.
    #[arg(long)]
    resolution: Option<String>,

    /// Render section frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Keep the work directory with all rendered frames.
    #[arg(long)]
    keep_temp: bool,
}

#[derive(Parser, Debug)]
struct StylesArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ComplexityChoice {
    Low,
    Medium,
    High,
}

impl From<ComplexityChoice> for slidecast::Complexity {
    fn from(c: ComplexityChoice) -> Self {
        match c {
            ComplexityChoice::Low => Self::Low,
            ComplexityChoice::Medium => Self::Medium,
            ComplexityChoice::High => Self::High,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Styles(args) => cmd_styles(args),
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => slidecast::PipelineConfig::from_json_file(path)?,
        None => slidecast::PipelineConfig::default(),
    };
    if let Some(style) = args.style {
        config.style = style;
    }
    if let Some(c) = args.complexity {
        config.complexity = Some(c.into());
    }
    if let Some(t) = args.transition {
        config.transition = Some(t);
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if let Some(res) = args.resolution.as_deref() {
        config.resolution = slidecast::Resolution::parse(res)?;
    }
    if args.parallel {
        config.parallel_frames = true;
    }

    let job = slidecast::JobSpec::from_json_file(&args.job)
        .with_context(|| format!("load job '{}'", args.job.display()))?;

    let report = slidecast::Pipeline::new(config)?
        .keep_temp(args.keep_temp)
        .run(&job, &args.out)?;

    println!(
        "wrote {} ({} sections, {} transitions, {:.2}s, {} frames)",
        report.output_path.display(),
        report.segment_count,
        report.transition_count,
        report.total_duration,
        report.total_frame_count
    );
    println!("manifest: {}", report.manifest_path.display());
    if let Some(work) = &report.work_dir {
        println!("work dir kept: {}", work.display());
    }
    Ok(())
}

fn cmd_styles(args: StylesArgs) -> anyhow::Result<()> {
    let styles = slidecast::list_styles();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&styles)?);
        return Ok(());
    }
    for s in styles {
        println!("{:<14}{:<8}{}", s.name, s.complexity.as_str(), s.description);
    }
    Ok(())
}
