//! Canvas state: owns the shapes, the viewport and the interaction sessions,
//! and routes input events between them.

use crate::config::CanvasConfig;
use crate::geometry::{self, HandleKind};
use crate::gesture::{GestureFusion, WheelGesture};
use crate::input::{InputEvent, Key, Modifiers, MouseButton};
use crate::palette::{StyleChange, StylePalette};
use crate::shapes::{Shape, ShapeId, StyleError};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::storage::{Drawing, Storage, StorageResult};
use crate::store::ShapeStore;
use crate::text::{ApproximateMeasurer, EditOverlay, TextEditSession, TextMeasurer};
use crate::tools::{Cursor, DrawSession, ToolKind};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use std::fmt;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Padding in screen pixels around the content when fitting the view.
const FIT_PADDING: f64 = 50.0;

/// Who receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOwner {
    /// Global shortcuts.
    Canvas,
    /// Every key goes to the text session.
    TextEdit,
}

/// Pointer interaction in progress that is not a draw.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum PointerDrag {
    #[default]
    None,
    /// Viewport drag with the pan tool, tracked in screen space.
    Pan { last: Point },
    /// Handle drag on the selected shape, tracked in world space.
    Resize { handle: HandleKind, last: Point },
    /// Selection drag inside the edited text.
    TextSelect,
}

/// The drawing canvas.
pub struct Canvas {
    config: CanvasConfig,
    store: ShapeStore,
    viewport: Viewport,
    gestures: GestureFusion,
    palette: StylePalette,
    tool: ToolKind,
    draw: DrawSession,
    text: TextEditSession,
    measurer: Box<dyn TextMeasurer>,
    selected: Option<ShapeId>,
    drag: PointerDrag,
    /// Handle under the idle pointer, for the cursor hint.
    hover: Option<HandleKind>,
    dirty: bool,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("shapes", &self.store.len())
            .field("viewport", &self.viewport)
            .field("tool", &self.tool)
            .field("selected", &self.selected)
            .field("text", &self.text.state())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    /// Create an empty canvas measuring text with [`ApproximateMeasurer`].
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_measurer(config, Box::new(ApproximateMeasurer))
    }

    pub fn with_measurer(config: CanvasConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            viewport: Viewport::new(&config),
            gestures: GestureFusion::new(&config),
            text: TextEditSession::new(config.caret_blink()),
            config,
            store: ShapeStore::new(),
            palette: StylePalette::default(),
            tool: ToolKind::default(),
            draw: DrawSession::new(),
            measurer,
            selected: None,
            drag: PointerDrag::None,
            hover: None,
            dirty: true,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn palette(&self) -> &StylePalette {
        &self.palette
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        &*self.measurer
    }

    pub fn text_session(&self) -> &TextEditSession {
        &self.text
    }

    /// The selected shape, if it still exists and is not deleted.
    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
            .filter(|id| self.store.get(*id).is_some_and(|s| !s.is_deleted()))
    }

    /// The shape being dragged out, not yet in the store.
    pub fn provisional(&self) -> Option<&Shape> {
        self.draw.provisional()
    }

    pub fn focus(&self) -> FocusOwner {
        if self.text.is_editing() {
            FocusOwner::TextEdit
        } else {
            FocusOwner::Canvas
        }
    }

    /// Caret and selection highlight of the active text session.
    pub fn edit_overlay(&self, now: Instant) -> Option<EditOverlay> {
        self.text.overlay(&self.store, &*self.measurer, now)
    }

    /// When the caret blink next needs a redraw.
    pub fn next_redraw(&self, now: Instant) -> Option<Instant> {
        self.text.next_blink(now)
    }

    /// Cursor hint for the platform layer.
    pub fn cursor(&self) -> Cursor {
        match self.drag {
            PointerDrag::Pan { .. } => Cursor::Grabbing,
            PointerDrag::Resize { handle, .. } => handle.cursor(),
            PointerDrag::TextSelect => Cursor::Text,
            PointerDrag::None => match self.hover {
                Some(handle) if self.tool == ToolKind::Select => handle.cursor(),
                _ => self.tool.cursor(),
            },
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return and reset the dirty flag. The owner redraws when it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.set_size(kurbo::Size::new(width, height));
        self.dirty = true;
    }

    /// Switch tools. Leaves text editing and drops any unfinished drag.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tool {
            return;
        }
        log::info!("Tool: {:?} -> {:?}", self.tool, tool);
        self.text.exit();
        self.draw.cancel();
        self.drag = PointerDrag::None;
        self.hover = None;
        if tool != ToolKind::Select {
            self.selected = None;
        }
        self.tool = tool;
        self.dirty = true;
    }

    /// Select a shape directly. Unknown ids clear the selection.
    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected = id.filter(|id| self.store.contains(*id));
        self.dirty = true;
    }

    /// Update the palette and restyle the selected shape, or the text being
    /// edited. Invalid values are rejected before anything changes.
    pub fn set_style(&mut self, change: StyleChange) -> Result<(), StyleError> {
        change.validate()?;
        change.apply_to_palette(&mut self.palette);

        let target = self.text.editing_id().or(self.selected);
        if let Some(shape) = target.and_then(|id| self.store.get_mut(id)) {
            if change.apply_to_shape(shape) {
                if let Some(text) = shape.as_text_mut() {
                    text.relayout(&*self.measurer);
                }
            }
            log::debug!("Restyled {} {}", shape.kind_name(), shape.id());
        }
        self.dirty = true;
        Ok(())
    }

    /// Parse and apply a stroke color code such as `#1e1e1e`.
    pub fn set_stroke_color(&mut self, code: &str) -> Result<(), StyleError> {
        self.set_style(StyleChange::stroke_color_hex(code)?)
    }

    /// Parse and apply a fill color code. An empty code removes the fill.
    pub fn set_fill_color(&mut self, code: &str) -> Result<(), StyleError> {
        self.set_style(StyleChange::fill_color_hex(code)?)
    }

    /// Remove every shape and end all sessions.
    pub fn clear_all(&mut self) {
        log::info!("Clearing {} shape(s)", self.store.len());
        self.store.clear();
        self.text.exit();
        self.draw.cancel();
        self.selected = None;
        self.drag = PointerDrag::None;
        self.hover = None;
        self.dirty = true;
    }

    /// Replace the content with a persisted drawing. Text boxes are
    /// re-measured with this canvas's measurer.
    pub fn load(&mut self, drawing: Drawing) {
        self.clear_all();
        self.store = ShapeStore::from_shapes(drawing.shapes);
        let texts: Vec<ShapeId> = self
            .store
            .shapes()
            .iter()
            .filter(|s| s.as_text().is_some())
            .map(Shape::id)
            .collect();
        for id in texts {
            if let Some(text) = self.store.get_mut(id).and_then(Shape::as_text_mut) {
                text.relayout(&*self.measurer);
            }
        }
        log::info!("Loaded {} shape(s)", self.store.len());
    }

    pub fn snapshot(&self) -> Drawing {
        Drawing::new(self.store.to_vec())
    }

    /// Persist the current shapes under `id`.
    pub async fn save_to(&self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        storage.save(id, &self.snapshot()).await?;
        log::info!("Saved {} shape(s) as {id}", self.store.len());
        Ok(())
    }

    /// Restore the shapes stored under `id`.
    pub async fn load_from(&mut self, storage: &dyn Storage, id: &str) -> StorageResult<()> {
        let drawing = storage.load(id).await?;
        self.load(drawing);
        Ok(())
    }

    /// Zoom and pan so every visible shape fits on screen.
    pub fn fit_to_content(&mut self) {
        let bounds = self
            .store
            .visible()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b));
        match bounds {
            Some(bounds) => self.viewport.fit_to_bounds(bounds, FIT_PADDING),
            None => self.viewport.reset(),
        }
        self.dirty = true;
    }

    /// Process one input event. Returns true if anything visible changed.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> bool {
        let changed = match event {
            InputEvent::PointerDown {
                position, button, ..
            } => button == MouseButton::Left && self.pointer_down(position, now),
            InputEvent::PointerMove { position } => self.pointer_move(position),
            InputEvent::PointerUp { position, button } => {
                button == MouseButton::Left && self.pointer_up(position)
            }
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Wheel(wheel) => {
                self.gestures.handle_wheel(&mut self.viewport, &wheel) != WheelGesture::Ignored
            }
            InputEvent::Touch(touch) => self.gestures.handle_touch(&mut self.viewport, &touch),
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, modifiers, now),
        };
        self.dirty |= changed;
        changed
    }

    fn pointer_down(&mut self, screen: Point, now: Instant) -> bool {
        let world = self.viewport.screen_to_world(screen);
        match self.tool {
            ToolKind::Text => {
                self.text
                    .pointer_down(&mut self.store, &self.palette, &*self.measurer, world, now);
                self.drag = PointerDrag::TextSelect;
                true
            }
            ToolKind::Select => {
                let handle = self.hit_selected_handle(world);
                if let Some(handle) = handle {
                    self.drag = PointerDrag::Resize {
                        handle,
                        last: world,
                    };
                    return false;
                }
                let hit = self
                    .store
                    .topmost(|s| geometry::is_point_in_shape(world, s))
                    .map(Shape::id);
                let changed = hit != self.selected;
                self.selected = hit;
                changed
            }
            ToolKind::Pan => {
                self.drag = PointerDrag::Pan { last: screen };
                false
            }
            ToolKind::Eraser => false,
            tool => self.draw.begin(tool, world, &self.palette),
        }
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        let world = self.viewport.screen_to_world(screen);
        match self.drag {
            PointerDrag::Pan { last } => {
                let delta: Vec2 = screen - last;
                self.viewport.pan_by(delta.x, delta.y);
                self.drag = PointerDrag::Pan { last: screen };
                true
            }
            PointerDrag::Resize { handle, last } => {
                let delta = world - last;
                self.drag = PointerDrag::Resize {
                    handle,
                    last: world,
                };
                match self.selected.and_then(|id| self.store.get_mut(id)) {
                    Some(shape) => geometry::resize(shape, handle, delta.x, delta.y),
                    None => false,
                }
            }
            PointerDrag::TextSelect => {
                self.text
                    .pointer_move(&self.store, &*self.measurer, world)
            }
            PointerDrag::None if self.draw.is_active() => self.draw.update(world),
            PointerDrag::None => {
                self.hover = self.hit_selected_handle(world);
                false
            }
        }
    }

    fn pointer_up(&mut self, screen: Point) -> bool {
        let world = self.viewport.screen_to_world(screen);
        let drag = std::mem::take(&mut self.drag);
        match drag {
            PointerDrag::TextSelect => {
                self.text.pointer_up();
                true
            }
            PointerDrag::Pan { .. } | PointerDrag::Resize { .. } => true,
            PointerDrag::None => self.draw.finish(world, &mut self.store).is_some(),
        }
    }

    fn pointer_leave(&mut self) -> bool {
        self.hover = None;
        if self.drag == PointerDrag::TextSelect {
            self.text.pointer_up();
        }
        self.drag = PointerDrag::None;
        self.draw.cancel().is_some()
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, now: Instant) -> bool {
        if self.focus() == FocusOwner::TextEdit {
            return self
                .text
                .handle_key(&mut self.store, &*self.measurer, key, modifiers, now);
        }

        let Some(action) = ShortcutRegistry::lookup(key, modifiers) else {
            return false;
        };
        log::debug!("Shortcut {action:?}");
        match action {
            ShortcutAction::Tool(tool) => self.set_tool(tool),
            ShortcutAction::Cancel => {
                self.draw.cancel();
                self.drag = PointerDrag::None;
                self.selected = None;
            }
            ShortcutAction::ResetView => self.viewport.reset(),
            ShortcutAction::FitToContent => self.fit_to_content(),
        }
        true
    }

    fn selected_bounds(&self) -> Option<Rect> {
        self.selected
            .and_then(|id| self.store.get(id))
            .filter(|s| !s.is_deleted())
            .map(Shape::bounds)
    }

    /// Handle under `world`. Handles keep a fixed size on screen, so the
    /// world-space box shrinks as the view zooms in.
    fn hit_selected_handle(&self, world: Point) -> Option<HandleKind> {
        let size = self.config.handle_size / self.viewport.scale;
        self.selected_bounds()
            .and_then(|bounds| geometry::hit_handle(bounds, world, size))
    }
}
