use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use inkreveal::{
    AlphaRamp, BuildOpts, Canvas, Dataset, Ease, FrameRGBA, GlyphBox, GlyphImage, InkResult,
    PenLiftGaps, PipelineOpts, PlaybackOpts, PlaybackParams, PlaybackState, ProgressLog, RawPoint,
    RevealFrame, RevealLayout, RevealSink, RevealView, SinkConfig, build_variant,
};

/// Preview runs longer than this many frames are refused.
const MAX_PREVIEW_FRAMES: u64 = 10_000_000;

#[derive(Parser, Debug)]
#[command(name = "inkreveal", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a variant from raw canvas-pixel strokes.
    Build(BuildArgs),
    /// Simulate frame-accurate playback of a stored variant.
    Preview(PreviewArgs),
    /// List characters and variants in a dataset.
    Inspect(DatasetArgs),
    /// Check a dataset file against schema version 1.
    Validate(DatasetArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Input JSON: an array of strokes, each an array of `{x, y, t, p}` points.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Character the strokes trace.
    #[arg(long = "char")]
    character: char,

    /// Glyph box on the capture canvas as `x,y,w,h`.
    #[arg(long = "box", value_parser = parse_box)]
    glyph_box: [f64; 4],

    /// Resample spacing in canvas pixels (overrides `INKREVEAL_RESAMPLE_STEP_PX`).
    #[arg(long)]
    step: Option<f64>,

    /// Em size in font units (overrides `INKREVEAL_EM_SIZE`).
    #[arg(long)]
    em_size: Option<f64>,

    /// Mark the variant as preferred.
    #[arg(long, default_value_t = false)]
    starred: bool,

    /// Append the variant to this dataset file (created if missing).
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Write the variant JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PenLiftArg {
    Compress,
    Preserve,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Dataset JSON.
    #[arg(long)]
    dataset: PathBuf,

    /// Character to play.
    #[arg(long = "char")]
    character: char,

    /// Variant id; defaults to the first starred variant, else the first one.
    #[arg(long)]
    variant: Option<String>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Glyph box as `x,y,w,h`; defaults to the centred square of the shorter side.
    #[arg(long = "box", value_parser = parse_box)]
    glyph_box: Option<[f64; 4]>,

    /// Em size the variant was captured with (overrides `INKREVEAL_EM_SIZE`).
    #[arg(long)]
    em_size: Option<f64>,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Playback speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Pressure contribution to stroke width, in percent.
    #[arg(long, default_value_t = 50.0)]
    width_gain: f64,

    /// Treatment of pauses between strokes.
    #[arg(long, value_enum, default_value_t = PenLiftArg::Compress)]
    pen_lift: PenLiftArg,

    /// Glyph alpha ramp length in ms; 0 disables it.
    #[arg(long, default_value_t = 90.0)]
    alpha_ease_ms: f64,

    /// Glyph alpha ramp curve.
    #[arg(long, default_value = "out_cubic")]
    alpha_ease: String,

    /// Pre-rendered glyph PNG (canvas-sized); defaults to solid black.
    #[arg(long)]
    glyph: Option<PathBuf>,

    /// Write the last rendered frame as a PNG.
    #[arg(long)]
    png_out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DatasetArgs {
    /// Dataset JSON.
    #[arg(long)]
    dataset: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn parse_box(s: &str) -> Result<[f64; 4], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, w, h] => Ok([x, y, w, h]),
        _ => Err(format!("expected x,y,w,h, got {} values", parts.len())),
    }
}

fn pipeline_opts(step: Option<f64>, em_size: Option<f64>) -> PipelineOpts {
    let mut opts = PipelineOpts::from_env();
    if let Some(v) = step {
        opts.resample_step_px = v;
    }
    if let Some(v) = em_size {
        opts.em_size = v;
    }
    opts
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read strokes '{}'", args.in_path.display()))?;
    let strokes: Vec<Vec<RawPoint>> = serde_json::from_str(&text)
        .with_context(|| format!("parse strokes '{}'", args.in_path.display()))?;

    let [x, y, w, h] = args.glyph_box;
    let glyph_box = GlyphBox::new(x, y, w, h)?;
    let pipeline = pipeline_opts(args.step, args.em_size);
    pipeline.validate()?;
    let opts = BuildOpts {
        pipeline,
        starred: args.starred,
        ..BuildOpts::default()
    };
    let variant = build_variant(&strokes, &glyph_box, &opts)?;

    if let Some(path) = &args.dataset {
        let mut ds = if path.exists() {
            Dataset::from_path(path)?
        } else {
            Dataset::new()
        };
        ds.insert_variant(args.character, variant.clone())?;
        ds.write_to_path(path)?;
        eprintln!("added {} to '{}' in {}", variant.id, args.character, path.display());
    }

    let json = serde_json::to_string_pretty(&variant).context("encode variant")?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Logs progress to stdout and keeps the last frame for `--png-out`.
struct PreviewSink {
    log: ProgressLog<std::io::Stdout>,
    last: Option<FrameRGBA>,
}

impl RevealSink for PreviewSink {
    fn begin(&mut self, cfg: SinkConfig) -> InkResult<()> {
        self.last = None;
        self.log.begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, reveal: &RevealFrame, frame: &FrameRGBA) -> InkResult<()> {
        self.log.push_frame(idx, reveal, frame)?;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> InkResult<()> {
        self.log.end()
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be finite and > 0"
    );
    let ds = Dataset::from_path(&args.dataset)?;
    let entry = ds
        .entry(args.character)
        .with_context(|| format!("no entry for '{}'", args.character))?;
    let variant = match &args.variant {
        Some(id) => entry
            .variants
            .iter()
            .find(|v| v.id.as_str() == id)
            .with_context(|| format!("no variant '{id}' for '{}'", args.character))?,
        None => entry
            .preferred()
            .with_context(|| format!("'{}' has no variants", args.character))?,
    };

    let canvas = Canvas::new(args.width, args.height)?;
    let glyph_box = match args.glyph_box {
        Some([x, y, w, h]) => GlyphBox::new(x, y, w, h)?,
        None => {
            let side = canvas.min_side();
            GlyphBox::new(
                (f64::from(canvas.width) - side) / 2.0,
                (f64::from(canvas.height) - side) / 2.0,
                side,
                side,
            )?
        }
    };
    let pipeline = pipeline_opts(None, args.em_size);
    pipeline.validate()?;
    let layout = RevealLayout {
        canvas,
        glyph_box,
        em_size: pipeline.em_size,
    };
    let curve = Ease::parse(&args.alpha_ease)
        .with_context(|| format!("unknown easing '{}'", args.alpha_ease))?;
    let opts = PlaybackOpts {
        alpha: AlphaRamp {
            duration_ms: args.alpha_ease_ms,
            curve,
        },
        pen_lift: match args.pen_lift {
            PenLiftArg::Compress => PenLiftGaps::Compress,
            PenLiftArg::Preserve => PenLiftGaps::Preserve,
        },
        ..PlaybackOpts::default()
    };
    let glyph = match &args.glyph {
        Some(path) => GlyphImage::open(path)?,
        None => GlyphImage::solid(canvas, [0, 0, 0, 255]),
    };
    let params = PlaybackParams {
        speed: args.speed,
        width_gain: args.width_gain,
    };

    let sink = PreviewSink {
        log: ProgressLog::new(std::io::stdout()),
        last: None,
    };
    let mut view = RevealView::new(layout, opts, glyph, sink)?;
    view.start(variant, params, 0.0)?;

    let frame_ms = 1000.0 / args.fps;
    let total_ms = view.player().timeline().map_or(0.0, |t| t.total_ms());
    let max_frames = frame_budget(total_ms + opts.settle_ms, args.speed, frame_ms)?;

    let mut state = PlaybackState::Playing;
    for n in 0..=max_frames {
        state = view.on_display_frame(n as f64 * frame_ms)?;
        if state != PlaybackState::Playing {
            break;
        }
    }
    anyhow::ensure!(
        state == PlaybackState::Completed,
        "playback did not complete within {max_frames} frames"
    );

    let sink = view.into_sink();
    if let (Some(out), Some(frame)) = (&args.png_out, &sink.last) {
        write_png(out, frame)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

/// Upper bound on wall-clock frames needed to play `anim_ms` at `speed`.
fn frame_budget(anim_ms: f64, speed: f64, frame_ms: f64) -> anyhow::Result<u64> {
    let frames = ((anim_ms / speed + frame_ms) / frame_ms).ceil();
    anyhow::ensure!(
        frames.is_finite() && frames <= MAX_PREVIEW_FRAMES as f64,
        "preview would need more than {MAX_PREVIEW_FRAMES} frames; raise --speed or --fps"
    );
    Ok((frames as u64).saturating_add(1))
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    Dataset::from_path(path).with_context(|| format!("load dataset '{}'", path.display()))
}

fn cmd_inspect(args: DatasetArgs) -> anyhow::Result<()> {
    let ds = load_dataset(&args.dataset)?;
    println!(
        "version {} characters {} variants {}",
        ds.version,
        ds.characters.len(),
        ds.variant_count()
    );
    for (ch, entry) in &ds.characters {
        println!(
            "'{ch}' advance={} bounds={:?} baseline={}",
            entry.metrics.advance, entry.metrics.bounds, entry.metrics.baseline
        );
        for v in &entry.variants {
            println!(
                "  {}{} weight={} strokes={} points={} duration={:.1}ms arc={:.1}",
                v.id,
                if v.starred { " *" } else { "" },
                v.weight,
                v.strokes.len(),
                v.resampled_len(),
                v.stats.duration_ms,
                v.stats.arc_len
            );
        }
    }
    Ok(())
}

fn cmd_validate(args: DatasetArgs) -> anyhow::Result<()> {
    let ds = load_dataset(&args.dataset)?;
    println!(
        "ok: {} characters, {} variants",
        ds.characters.len(),
        ds.variant_count()
    );
    Ok(())
}
