//! Storage abstraction for persisting drawings.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Drawing not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Persisted snapshot of a shape sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Shapes in paint order.
    pub shapes: Vec<Shape>,
}

impl Drawing {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// An empty drawing, persisted when the canvas is cleared.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Trait for drawing storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a drawing.
    fn save(&self, id: &str, drawing: &Drawing) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a drawing.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Drawing>>;

    /// Delete a drawing.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all drawing IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a drawing exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for drawing storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save a drawing.
    fn save(&self, id: &str, drawing: &Drawing) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a drawing.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Drawing>>;

    /// Delete a drawing.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all drawing IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a drawing exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Pencil, Rectangle, Text};
    use kurbo::Point;

    #[test]
    fn test_drawing_json_roundtrip() {
        let drawing = Drawing::new(vec![
            Shape::Rectangle(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0)),
            Shape::Pencil(Pencil::from_points(vec![Point::ZERO, Point::new(1.0, 1.0)])),
            Shape::Text(Text::new(Point::new(5.0, 5.0), "hi")),
        ]);
        let json = drawing.to_json().unwrap();
        assert_eq!(Drawing::from_json(&json).unwrap(), drawing);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"shapes":[{"kind":"line","id":"67e55044-10b1-426f-9247-bb680e5fe0c8",
            "start_x":0.0,"start_y":0.0,"end_x":1.0,"end_y":1.0,
            "style":{"stroke_color":{"r":0,"g":0,"b":0,"a":255},"stroke_width":2.0,"fill_color":null}}]}"#;
        let drawing = Drawing::from_json(json).unwrap();
        assert_eq!(drawing.shapes.len(), 1);
        assert!(!drawing.shapes[0].is_deleted());
    }
}
