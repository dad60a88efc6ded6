use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use spinwheel::{
    Artifact, CpuRenderer, DriveClock, DriveOpts, EngineParts, GifCapture, ManualScheduler,
    ResultPresenter, SpinEngine, WheelConfig, WheelRenderer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spinwheel", version, about = "Spin a wheel of names and pick a winner")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a full spin headlessly, print the winner and optionally write the recording.
    Spin(SpinArgs),
    /// Render a single still frame of the wheel as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct NamesSource {
    /// Names separated by commas or newlines.
    #[arg(long)]
    names: Option<String>,

    /// File with names separated by commas or newlines.
    #[arg(long)]
    names_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SpinArgs {
    #[command(flatten)]
    source: NamesSource,

    /// Wheel config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible spin.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the GIF recording.
    #[arg(long, default_value = spinwheel::capture::DEFAULT_ARTIFACT_NAME)]
    gif: PathBuf,

    /// Skip recording.
    #[arg(long)]
    no_gif: bool,

    /// Pace frames in real time instead of simulating the clock.
    #[arg(long)]
    realtime: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: NamesSource,

    /// Wheel config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wheel rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotation: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Spin(args) => cmd_spin(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WheelConfig> {
    match path {
        Some(p) => Ok(WheelConfig::from_path(p)?),
        None => Ok(WheelConfig::default()),
    }
}

fn read_names(source: &NamesSource) -> anyhow::Result<Vec<String>> {
    let text = match (&source.names, &source.names_file) {
        (Some(s), _) => s.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read names file '{}'", path.display()))?,
        (None, None) => anyhow::bail!("either --names or --names-file is required"),
    };
    Ok(spinwheel::parse_names(&text))
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// Prints the winner on stdout and saves the recording to disk.
struct CliPresenter {
    gif_out: PathBuf,
}

impl ResultPresenter for CliPresenter {
    fn show_winner(&mut self, winner: &str) {
        println!("{winner}");
    }

    fn show_artifact(&mut self, artifact: &Artifact) {
        let res = ensure_parent_dir(&self.gif_out).and_then(|()| {
            std::fs::write(&self.gif_out, &artifact.bytes)
                .with_context(|| format!("write gif '{}'", self.gif_out.display()))
        });
        match res {
            Ok(()) => eprintln!(
                "wrote {} ({} frames)",
                self.gif_out.display(),
                artifact.frame_count
            ),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "could not save recording"),
        }
    }
}

fn cmd_spin(args: SpinArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    let names = read_names(&args.source)?;

    let renderer = CpuRenderer::from_config(&cfg)?;
    let capture = if args.no_gif {
        None
    } else {
        Some(Box::new(GifCapture::from_config(&cfg)?) as Box<dyn spinwheel::CaptureAdapter>)
    };
    let scheduler = ManualScheduler::new();
    let opts = DriveOpts {
        clock: if args.realtime {
            DriveClock::Realtime
        } else {
            DriveClock::Simulated
        },
        frame_interval_ms: cfg.frame_interval_ms(),
        ..DriveOpts::default()
    };

    let mut engine = SpinEngine::new(
        cfg,
        EngineParts {
            renderer: Box::new(renderer),
            capture,
            presenter: Box::new(CliPresenter { gif_out: args.gif }),
            scheduler: Box::new(scheduler.clone()),
        },
    )?;
    engine.set_names(&names)?;

    if names.len() == 1 {
        engine.resolve_single()?;
        return Ok(());
    }

    let report = spinwheel::run_spin(&mut engine, &scheduler, opts)?;
    tracing::debug!(
        frames = report.frames,
        captured = report.result.captured_frames,
        rotation = report.result.final_rotation_degrees,
        "spin done"
    );
    if !args.no_gif && report.artifact.is_none() {
        eprintln!("no recording was produced");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let names = read_names(&args.source)?;
    let segments = spinwheel::build_segments(&names, &cfg)?;

    let mut renderer = CpuRenderer::from_config(&cfg)?;
    renderer.render(&segments, args.rotation)?;
    let frame = renderer.snapshot();
    let data = frame.flattened_over(cfg.background_rgba)?;

    ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
