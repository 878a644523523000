//! Sketchboard command-line shell.
//!
//! Opens a drawing from file storage, replays a script of input events
//! against the canvas, saves the result and optionally exports it as SVG.

mod script;
mod shortcuts;

pub use script::{Command, ReplayStats, Replayer, STEP_INTERVAL, Script, Step};
pub use shortcuts::help_text;

use clap::Parser;
use sketchboard_core::storage::{FileStorage, Storage, StorageError};
use sketchboard_core::{Canvas, CanvasConfig, ConfigError, StyleError};
use sketchboard_render::{Frame, ParleyMeasurer, RenderPipeline, RendererError, SvgSurface};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error("Invalid style in script: {0}")]
    Style(#[from] StyleError),
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketchboard")]
#[command(about = "Replay input on a sketchboard drawing and export it")]
#[command(version)]
pub struct Cli {
    /// JSON script of input events and canvas commands
    pub script: Option<PathBuf>,

    /// Canvas configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding saved drawings
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,

    /// Drawing to open and save
    #[arg(long, default_value = "default")]
    pub drawing: String,

    /// Write the final frame to this SVG file
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Leave the stored drawing untouched
    #[arg(long)]
    pub no_save: bool,

    /// Viewport width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    pub height: Option<f64>,

    /// Print keyboard shortcuts and exit
    #[arg(long)]
    pub shortcuts: bool,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub shapes: usize,
    pub replay: ReplayStats,
    pub saved: bool,
    pub svg: Option<PathBuf>,
}

impl Cli {
    /// Canvas configuration from the config file and size overrides.
    pub fn canvas_config(&self) -> Result<CanvasConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => CanvasConfig::from_file(path)?,
            None => CanvasConfig::default(),
        };
        if let Some(width) = self.width {
            config.viewport_width = width;
        }
        if let Some(height) = self.height {
            config.viewport_height = height;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn storage(&self) -> Result<FileStorage, AppError> {
        let storage = match &self.storage_dir {
            Some(dir) => FileStorage::new(dir)?,
            None => FileStorage::default_location()?,
        };
        Ok(storage)
    }
}

/// Run one session as described by `cli`.
pub fn run(cli: &Cli) -> Result<RunSummary, AppError> {
    let config = cli.canvas_config()?;
    let storage = cli.storage()?;
    log::info!("Using storage at {}", storage.base_path().display());

    let mut canvas = Canvas::with_measurer(config, Box::new(ParleyMeasurer::new()));
    if pollster::block_on(storage.exists(&cli.drawing))? {
        pollster::block_on(canvas.load_from(&storage, &cli.drawing))?;
        log::info!("Opened {} with {} shape(s)", cli.drawing, canvas.store().len());
    } else {
        log::info!("Starting new drawing {}", cli.drawing);
    }

    let script = match &cli.script {
        Some(path) => Script::from_file(path)?,
        None => Script::default(),
    };
    let mut replayer = Replayer::new(Instant::now());
    let replay = replayer.run(&mut canvas, &script)?;
    log::info!(
        "Replayed {} event(s) and {} command(s)",
        replay.events,
        replay.commands
    );

    let saved = !cli.no_save;
    if saved {
        pollster::block_on(canvas.save_to(&storage, &cli.drawing))?;
    }

    if let Some(path) = &cli.svg {
        export_svg(&canvas, replayer.now(), path)?;
    }

    Ok(RunSummary {
        shapes: canvas.store().visible().count(),
        replay,
        saved,
        svg: cli.svg.clone(),
    })
}

/// Render the current frame and write it as an SVG document.
pub fn export_svg(canvas: &Canvas, now: Instant, path: &std::path::Path) -> Result<(), AppError> {
    let mut pipeline = RenderPipeline::new(SvgSurface::new(canvas.viewport().size));
    pipeline.redraw(&Frame::from_canvas(canvas, now));
    pipeline.surface()?.save(path)?;
    Ok(())
}
