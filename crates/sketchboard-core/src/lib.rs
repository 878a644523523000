//! Sketchboard Core Library
//!
//! Platform-agnostic state for the Sketchboard canvas: shapes, the viewport
//! transform, hit-testing and the draw and text-edit sessions.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod palette;
pub mod presence;
pub mod shapes;
pub mod shortcuts;
pub mod storage;
pub mod store;
pub mod text;
pub mod tools;
pub mod viewport;

pub use canvas::{Canvas, FocusOwner};
pub use config::{CanvasConfig, ConfigError};
pub use geometry::{Handle, HandleKind};
pub use gesture::{GestureFusion, WheelGesture};
pub use input::{InputEvent, Key, Modifiers};
pub use palette::{StyleChange, StylePalette};
pub use presence::{ConnectionState, PresenceEvent, PresenceRoster};
pub use shapes::{Shape, ShapeId, StyleError};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use storage::{Drawing, Storage, StorageError};
pub use store::ShapeStore;
pub use text::{EditOverlay, TextEditSession, TextMeasurer};
pub use tools::{Cursor, DrawSession, ToolKind};
pub use viewport::Viewport;
