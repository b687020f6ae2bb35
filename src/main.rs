mod animation;
mod config;
mod error;
mod palette;
mod render;
mod settings;
mod shape;
mod terminal;

use animation::{draw_frame, AnimationLoop, Canvas};
use clap::Parser;
use config::{
    tick_interval, ColorScheme, GlyphSet, Rgb, TreeConfig, DEFAULT_BACKGROUND, DEFAULT_FPS,
    DEFAULT_HEIGHT, DEFAULT_INDENT, DEFAULT_SEGMENTS, DEFAULT_TITLE,
};
use error::TreeError;
use palette::ColorMapper;
use rand::prelude::*;
use render::{GlyphStep, Renderer};
use settings::Settings;
use shape::ShapeParams;
use std::path::PathBuf;
use std::process::ExitCode;
use terminal::{KeyInput, Terminal};

#[derive(Parser)]
#[command(name = "xmastree")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Christmas tree with blinking lights for the terminal", long_about = None)]
struct Cli {
    /// Number of body rows
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u16).range(1..))]
    height: Option<u16>,

    /// Number of indentation bands the body is split into
    #[arg(short = 'S', long, value_parser = clap::value_parser!(u16).range(1..))]
    segments: Option<u16>,

    /// Columns trimmed from each side per band
    #[arg(short = 'I', long)]
    indent: Option<u16>,

    /// Redraws per second (lights blink once per redraw)
    #[arg(short, long)]
    fps: Option<f32>,

    /// Background color as #rrggbb
    #[arg(short, long)]
    background: Option<Rgb>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print one frame to stdout (no interactive display)
    #[arg(short, long)]
    print: bool,

    /// Terminal window title
    #[arg(short, long)]
    title: Option<String>,

    /// Config file (default: <config dir>/xmastree/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<log::LevelFilter>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match resolve_config(&cli).and_then(|config| run(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", env!("CARGO_PKG_NAME"), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<log::LevelFilter>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

/// Defaults, then the config file, then command-line flags
fn resolve_config(cli: &Cli) -> Result<TreeConfig, TreeError> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };

    let shape = ShapeParams::new(
        cli.height.map(usize::from).or(settings.tree.height).unwrap_or(DEFAULT_HEIGHT),
        cli.segments.map(usize::from).or(settings.tree.segments).unwrap_or(DEFAULT_SEGMENTS),
        cli.indent.map(usize::from).or(settings.tree.indent).unwrap_or(DEFAULT_INDENT),
    )?;

    let default_glyphs = GlyphSet::default();
    let glyphs = GlyphSet::new(
        settings.glyphs.star.unwrap_or(default_glyphs.star()),
        settings.glyphs.body.unwrap_or_else(|| default_glyphs.body().to_string()),
        settings.glyphs.lights.unwrap_or_else(|| default_glyphs.lights().to_string()),
        settings.glyphs.stump.unwrap_or(default_glyphs.stump()),
    )?;

    let default_colors = ColorScheme::default();
    let colors = ColorScheme {
        star: settings.colors.star.unwrap_or(default_colors.star),
        body: settings.colors.body.unwrap_or(default_colors.body),
        stump: settings.colors.stump.unwrap_or(default_colors.stump),
        unknown: settings.colors.unknown.unwrap_or(default_colors.unknown),
        lights: settings.colors.lights.unwrap_or(default_colors.lights),
    };
    colors.validate()?;

    let fps = cli.fps.or(settings.animation.fps).unwrap_or(DEFAULT_FPS);
    tick_interval(fps)?;

    let config = TreeConfig {
        shape,
        glyphs,
        colors,
        fps,
        background: cli.background.or(settings.animation.background).unwrap_or(DEFAULT_BACKGROUND),
        title: cli
            .title
            .clone()
            .or(settings.animation.title)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        seed: cli.seed,
        print: cli.print,
    };
    log::debug!("resolved config: {config:?}");
    Ok(config)
}

fn run(config: &TreeConfig) -> Result<(), TreeError> {
    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    });
    log::info!("seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    // The shape is fixed for the whole run; only light colors change per frame
    let matrix = shape::generate(&config.shape, &config.glyphs, &mut rng);
    let mapper = ColorMapper::new(config.glyphs.clone(), config.colors.clone())?;

    if config.print {
        run_print_mode(config, matrix, mapper, &mut rng)
    } else {
        run_interactive(config, matrix, mapper, &mut rng)
    }
}

fn run_print_mode(
    config: &TreeConfig,
    matrix: shape::TreeMatrix,
    mapper: ColorMapper,
    rng: &mut StdRng,
) -> Result<(), TreeError> {
    let mut term = Terminal::offscreen(0, 0);
    let step = GlyphStep::measure(&term, &config.glyphs);
    let renderer = Renderer::new(matrix, mapper, step);

    let (width, height) = renderer.bounds();
    term.resize(to_cells(width), to_cells(height));
    term.fit(width, height)?;

    draw_frame(&renderer, &mut term, config.background, rng);
    term.print_to_stdout()?;
    Ok(())
}

fn run_interactive(
    config: &TreeConfig,
    matrix: shape::TreeMatrix,
    mapper: ColorMapper,
    rng: &mut StdRng,
) -> Result<(), TreeError> {
    let interval = config.tick_interval()?;

    let mut term = Terminal::new(true)?;
    term.set_title(&config.title)?;
    term.clear_screen()?;

    let step = GlyphStep::measure(&term, &config.glyphs);
    let renderer = Renderer::new(matrix, mapper, step);
    let mut animation = AnimationLoop::new(renderer, config.background, interval);
    animation.run(&mut term, &mut KeyInput, rng)?;
    Ok(())
}

fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
