use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dashtrail", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the trace as numbered PNG frames (and optionally an MP4).
    Render(RenderArgs),
    /// Print path measurements and the expected frame count.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct PathSource {
    /// SVG document; its largest path is traced.
    #[arg(long, conflicts_with = "path_data", required_unless_present = "path_data")]
    path: Option<PathBuf>,

    /// Inline SVG path data (`d` attribute syntax).
    #[arg(long)]
    path_data: Option<String>,
}

#[derive(Args, Debug)]
struct Overrides {
    /// JSON trace configuration; individual flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Arc length drawn per frame.
    #[arg(long)]
    speed: Option<f64>,

    /// Arc length of each dash and gap.
    #[arg(long = "dash")]
    dash_len: Option<f64>,

    /// Stroke width in pixels.
    #[arg(long)]
    stroke_width: Option<f64>,

    /// Stroke color as #rrggbb or #rrggbbaa.
    #[arg(long)]
    stroke_color: Option<String>,

    /// Horizontal offset added to every path point.
    #[arg(long, allow_hyphen_values = true)]
    margin_x: Option<f64>,

    /// Vertical offset added to every path point.
    #[arg(long, allow_hyphen_values = true)]
    margin_y: Option<f64>,

    /// Frames per second for MP4 output.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: PathSource,

    #[command(flatten)]
    overrides: Overrides,

    /// Background image drawn under the trace.
    #[arg(long)]
    background: PathBuf,

    /// Directory receiving `000001.png`, `000002.png`, ...
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Also encode the frames to this MP4 (requires `ffmpeg` on PATH).
    #[arg(long)]
    mp4: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    source: PathSource,

    #[command(flatten)]
    overrides: Overrides,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<dashtrail::TraceConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: dashtrail::TraceConfig =
        serde_json::from_reader(r).with_context(|| "parse config JSON")?;
    Ok(cfg)
}

fn build_config(o: &Overrides) -> anyhow::Result<dashtrail::TraceConfig> {
    let mut cfg = match &o.config {
        Some(path) => read_config_json(path)?,
        None => dashtrail::TraceConfig::default(),
    };
    if let Some(v) = o.width {
        cfg.width = v;
    }
    if let Some(v) = o.height {
        cfg.height = v;
    }
    if let Some(v) = o.speed {
        cfg.speed = v;
    }
    if let Some(v) = o.dash_len {
        cfg.dash_len = v;
    }
    if let Some(v) = o.stroke_width {
        cfg.stroke.width = v;
    }
    if let Some(v) = &o.stroke_color {
        cfg.stroke.color = dashtrail::StrokeStyle::parse_hex_color(v)?;
    }
    if let Some(v) = o.margin_x {
        cfg.margin.x = v;
    }
    if let Some(v) = o.margin_y {
        cfg.margin.y = v;
    }
    if let Some(v) = o.fps {
        cfg.fps = v;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_path(
    src: &PathSource,
    cfg: &dashtrail::TraceConfig,
) -> anyhow::Result<dashtrail::PathModel> {
    let points = match (&src.path, &src.path_data) {
        (Some(svg), _) => {
            let bytes = std::fs::read(svg).map_err(|e| {
                dashtrail::TraceError::input_unavailable(format!(
                    "read path svg '{}': {e}",
                    svg.display()
                ))
            })?;
            dashtrail::points_from_svg(&bytes, cfg.margin)
                .with_context(|| format!("extract path from '{}'", svg.display()))?
        }
        (None, Some(d)) => dashtrail::points_from_path_data(d, cfg.margin)?,
        (None, None) => anyhow::bail!("either --path or --path-data is required"),
    };
    if points.is_empty() {
        return Err(dashtrail::TraceError::input_malformed("path has no points").into());
    }
    Ok(dashtrail::PathModel::new(points))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.overrides)?;
    let path = load_path(&args.source, &cfg)?;
    let background = dashtrail::load_background(&args.background)?;

    let mut sinks: Vec<Box<dyn dashtrail::FrameSink>> =
        vec![Box::new(dashtrail::PngSequenceSink::new(&args.out_dir))];
    if let Some(mp4) = &args.mp4 {
        let mut opts = dashtrail::FfmpegSinkOpts::new(mp4);
        opts.bg_rgba = [0, 0, 0, 255];
        sinks.push(Box::new(dashtrail::FfmpegSink::new(opts)));
    }
    let mut sink = dashtrail::FanOutSink::new(sinks);

    let mut session = dashtrail::TraceSession::new(cfg, path, Some(background))?;
    let stats = session.run(&mut sink)?;

    eprintln!(
        "wrote {} frame(s) to {}",
        stats.frames,
        args.out_dir.display()
    );
    if let Some(mp4) = &args.mp4 {
        eprintln!("wrote {}", mp4.display());
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.overrides)?;
    let path = load_path(&args.source, &cfg)?;
    let (max_x, max_y) = path.bounds();

    // Frames produced before the walker is within its stop tolerance of the end.
    let frames = if path.length() <= dashtrail::walk::DONE_TOLERANCE {
        0
    } else {
        ((path.length() - dashtrail::walk::DONE_TOLERANCE) / cfg.speed).ceil() as u64
    };

    println!("points:   {}", path.points().len());
    println!("segments: {}", path.segment_count());
    println!("length:   {:.3}", path.length());
    println!("bounds:   {max_x:.3} x {max_y:.3}");
    println!("frames:   {frames}");
    Ok(())
}
