use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use cinescene::{
    EngineOpts, ExportOpts, FrameIndex, PngDirOpts, PngDirPackager, PreviewOpts,
    PreviewRenderer, Renderer, Scene, SceneEngine, StaticScreenRegistry, ValidationLimits,
    start_recording,
};

#[derive(Parser, Debug)]
#[command(name = "cinescene", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a scene and print warnings.
    Validate(SceneArgs),
    /// Print the render state at one instant as JSON.
    Inspect(InspectArgs),
    /// Preview-render a single frame as a PNG.
    Frame(FrameArgs),
    /// Export every frame as a PNG sequence.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Screen manifest JSON. Without it no screen id resolves.
    #[arg(long)]
    screens: Option<PathBuf>,

    /// Particle cap per transition.
    #[arg(long, default_value_t = EngineOpts::default().max_particles_per_transition)]
    max_particles: u32,

    /// Fail instead of clamping particle counts above the cap.
    #[arg(long)]
    strict_limits: bool,
}

impl SceneArgs {
    fn load(&self) -> anyhow::Result<(Scene, StaticScreenRegistry)> {
        let scene = Scene::from_path(&self.in_path)
            .with_context(|| format!("load scene '{}'", self.in_path.display()))?;
        let screens = match &self.screens {
            Some(p) => StaticScreenRegistry::from_path(p)
                .with_context(|| format!("load screens '{}'", p.display()))?,
            None => StaticScreenRegistry::new(),
        };
        Ok((scene, screens))
    }

    fn engine_opts(&self) -> EngineOpts {
        EngineOpts {
            max_particles_per_transition: self.max_particles,
            strict_limits: self.strict_limits,
            ..EngineOpts::default()
        }
    }

    fn engine(&self) -> anyhow::Result<SceneEngine> {
        let (scene, screens) = self.load()?;
        Ok(SceneEngine::new(&scene, &screens, self.engine_opts())?)
    }
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Scene time in seconds.
    #[arg(long, conflicts_with = "frame", required_unless_present = "frame")]
    time: Option<f64>,

    /// Frame index (0-based).
    #[arg(long)]
    frame: Option<u64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Multiplier on particle size.
    #[arg(long, default_value_t = 1.0)]
    particle_scale: f64,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out_dir: PathBuf,

    /// Fail if the output directory already exists.
    #[arg(long)]
    no_overwrite: bool,

    /// Multiplier on particle size.
    #[arg(long, default_value_t = 1.0)]
    particle_scale: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_validate(args: SceneArgs) -> anyhow::Result<()> {
    let (scene, screens) = args.load()?;
    let limits = ValidationLimits {
        max_particles_per_transition: args.max_particles,
    };
    let diagnostics = scene.validate(&screens, limits)?;
    for d in &diagnostics {
        eprintln!("warning: {d}");
    }
    println!(
        "ok: {} shot(s), {:.3}s, {} warning(s)",
        scene.def().shots.len(),
        scene.total_duration(),
        diagnostics.len()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let mut engine = args.scene.engine()?;
    let state = match (args.time, args.frame) {
        (Some(t), _) => engine.evaluate(t)?,
        (None, Some(f)) => engine.evaluate_frame(FrameIndex(f))?,
        (None, None) => anyhow::bail!("one of --time or --frame is required"),
    };
    let json = serde_json::to_string_pretty(&state).context("serialize render state")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut engine = args.scene.engine()?;
    let frame_count = engine.frame_count();
    if args.frame >= frame_count {
        anyhow::bail!(
            "frame {} is out of range (scene has {frame_count} frames)",
            args.frame
        );
    }
    let state = engine.evaluate_frame(FrameIndex(args.frame))?;

    let mut renderer = PreviewRenderer::new(PreviewOpts {
        particle_scale: args.particle_scale,
        ..PreviewOpts::default()
    });
    let handle = renderer.draw(&state)?;
    renderer.await_draw(handle)?;
    let frame = renderer.capture_frame(handle)?;

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let (scene, screens) = args.scene.load()?;
    ensure_parent(&args.out_dir)?;

    let mut renderer = PreviewRenderer::new(PreviewOpts {
        particle_scale: args.particle_scale,
        ..PreviewOpts::default()
    });
    let mut packager = PngDirPackager::new(PngDirOpts {
        overwrite: !args.no_overwrite,
        ..PngDirOpts::new(&args.out_dir)
    });
    let opts = ExportOpts {
        engine: args.scene.engine_opts(),
        cancel: None,
    };
    let (archive, stats) = start_recording(&scene, &screens, &mut renderer, &mut packager, opts)?;

    println!(
        "wrote {} frame(s) to {} (digest {})",
        archive.len(),
        args.out_dir.display(),
        stats.digest
    );
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
