//! Sketchboard Render Library
//!
//! Draws a canvas onto a [`Surface`]. The surface decides how strokes look;
//! [`RecordingSurface`] captures calls and [`SvgSurface`] exports a document.
//! [`ParleyMeasurer`] measures text with the fonts those documents name.

mod measure;
pub mod outline;
mod pipeline;
mod surface;
mod svg;

pub use measure::ParleyMeasurer;
pub use outline::{OutlineOptions, stroke_outline};
pub use pipeline::{Frame, RenderPipeline, draw_shape, rectangle_path};
pub use surface::{DrawCommand, DrawOptions, HACHURE_ANGLE, RecordingSurface, Surface};
pub use svg::SvgSurface;

use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("No surface attached")]
    Detached,
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;
