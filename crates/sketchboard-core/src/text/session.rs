//! Cursor and selection state machine for editing a text shape in place.

use super::metrics::{
    TextMeasurer, coordinate_to_index, index_to_coordinate, index_to_line_col,
    line_col_to_index,
};
use crate::input::{Key, Modifiers};
use crate::palette::StylePalette;
use crate::shapes::{Shape, ShapeId, ShapeTrait, Text};
use crate::store::ShapeStore;
use kurbo::{Point, Rect};
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Selection between an anchor (where it started) and a head (where the cursor is).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSelection {
    pub anchor: usize,
    pub head: usize,
}

impl TextSelection {
    /// Ordered `(start, end)` character range.
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.head), self.anchor.max(self.head))
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// Editor state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEditState {
    #[default]
    Idle,
    Editing {
        shape_id: ShapeId,
        cursor: usize,
        selection: Option<TextSelection>,
    },
}

/// Cosmetic caret blink.
#[derive(Debug, Clone, Copy)]
pub struct CursorBlink {
    interval: Duration,
    reset_at: Option<Instant>,
}

impl CursorBlink {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            reset_at: None,
        }
    }

    /// Make the caret visible and restart the blink phase.
    pub fn reset(&mut self, now: Instant) {
        self.reset_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.reset_at = None;
    }

    /// Whether the caret should be drawn at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        let Some(start) = self.reset_at else {
            return false;
        };
        let interval = self.interval.as_millis().max(1);
        let elapsed = now.saturating_duration_since(start).as_millis();
        (elapsed / interval) % 2 == 0
    }

    /// When the visible flag next flips, so the event loop can schedule a redraw.
    pub fn next_toggle(&self, now: Instant) -> Option<Instant> {
        let start = self.reset_at?;
        let interval = self.interval.as_nanos().max(1);
        let elapsed = now.saturating_duration_since(start).as_nanos();
        let next = (elapsed / interval + 1) * interval;
        Some(start + Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX)))
    }
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// What the renderer draws on top of the text being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOverlay {
    pub shape_id: ShapeId,
    /// Caret segment (top, bottom), absent during the off phase of the blink.
    pub caret: Option<(Point, Point)>,
    /// One rectangle per selected line fragment.
    pub selection: Vec<Rect>,
    pub frame: Rect,
}

/// The text editing session.
#[derive(Debug, Clone, Default)]
pub struct TextEditSession {
    state: TextEditState,
    /// Index under the pointer when the current drag started.
    drag_anchor: Option<usize>,
    blink: CursorBlink,
}

fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(b, _)| b)
}

/// Replace the characters in `start..end` with `insert`.
fn splice(s: &str, start: usize, end: usize, insert: &str) -> String {
    let (a, b) = (byte_offset(s, start), byte_offset(s, end));
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..a]);
    out.push_str(insert);
    out.push_str(&s[b..]);
    out
}

impl TextEditSession {
    pub fn new(blink_interval: Duration) -> Self {
        Self {
            blink: CursorBlink::new(blink_interval),
            ..Default::default()
        }
    }

    pub fn state(&self) -> TextEditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, TextEditState::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<ShapeId> {
        match self.state {
            TextEditState::Editing { shape_id, .. } => Some(shape_id),
            TextEditState::Idle => None,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            TextEditState::Editing { cursor, .. } => Some(cursor),
            TextEditState::Idle => None,
        }
    }

    pub fn selection(&self) -> Option<TextSelection> {
        match self.state {
            TextEditState::Editing { selection, .. } => selection,
            TextEditState::Idle => None,
        }
    }

    pub fn caret_visible(&self, now: Instant) -> bool {
        self.is_editing() && self.blink.is_visible(now)
    }

    pub fn next_blink(&self, now: Instant) -> Option<Instant> {
        if self.is_editing() {
            self.blink.next_toggle(now)
        } else {
            None
        }
    }

    /// Start editing `shape_id` with the caret at `cursor`.
    pub fn enter(&mut self, shape_id: ShapeId, cursor: usize, now: Instant) {
        log::debug!("Editing text {shape_id} at {cursor}");
        self.state = TextEditState::Editing {
            shape_id,
            cursor,
            selection: None,
        };
        self.blink.reset(now);
    }

    /// Leave editing. The shape stays in the store even if it is empty.
    pub fn exit(&mut self) {
        if let Some(id) = self.editing_id() {
            log::debug!("Stopped editing text {id}");
        }
        self.state = TextEditState::Idle;
        self.drag_anchor = None;
        self.blink.stop();
    }

    /// Pointer pressed with the text tool active.
    ///
    /// Edits the topmost text under `world`, or creates an empty one there.
    pub fn pointer_down(
        &mut self,
        store: &mut ShapeStore,
        palette: &StylePalette,
        measurer: &dyn TextMeasurer,
        world: Point,
        now: Instant,
    ) -> ShapeId {
        let hit = store
            .topmost(|s| {
                s.as_text()
                    .is_some_and(|t| contains_inclusive(t.bounds(), world))
            })
            .and_then(Shape::as_text)
            .map(|t| {
                let index = coordinate_to_index(measurer, &t.text, t.font(), t.position(), world);
                (t.id(), index)
            });

        let (shape_id, cursor) = match hit {
            Some(found) => found,
            None => {
                let mut shape = Shape::Text(Text::new(world, ""));
                palette.style_new_shape(&mut shape);
                if let Some(text) = shape.as_text_mut() {
                    text.relayout(measurer);
                }
                let id = store.push(shape);
                log::info!("Created text {id} at ({:.1}, {:.1})", world.x, world.y);
                (id, 0)
            }
        };

        self.enter(shape_id, cursor, now);
        self.drag_anchor = Some(cursor);
        shape_id
    }

    /// Pointer dragged while editing: select from the drag origin to the pointer.
    pub fn pointer_move(
        &mut self,
        store: &ShapeStore,
        measurer: &dyn TextMeasurer,
        world: Point,
    ) -> bool {
        let (Some(anchor), TextEditState::Editing { shape_id, .. }) = (self.drag_anchor, self.state)
        else {
            return false;
        };
        let Some(text) = store.get(shape_id).and_then(Shape::as_text) else {
            return false;
        };
        let head = coordinate_to_index(measurer, &text.text, text.font(), text.position(), world);
        self.state = TextEditState::Editing {
            shape_id,
            cursor: head,
            selection: Some(TextSelection { anchor, head }),
        };
        true
    }

    /// Pointer released. A zero-length selection collapses to a caret.
    pub fn pointer_up(&mut self) {
        self.drag_anchor = None;
        if let TextEditState::Editing { selection, .. } = &mut self.state {
            if selection.is_some_and(|s| s.is_empty()) {
                *selection = None;
            }
        }
    }

    /// Handle a key press. Returns true if the key was consumed, which is
    /// always the case while editing.
    pub fn handle_key(
        &mut self,
        store: &mut ShapeStore,
        measurer: &dyn TextMeasurer,
        key: Key,
        modifiers: Modifiers,
        now: Instant,
    ) -> bool {
        let TextEditState::Editing {
            shape_id,
            cursor,
            selection,
        } = self.state
        else {
            return false;
        };
        let Some(content) = store
            .get(shape_id)
            .and_then(Shape::as_text)
            .map(|t| t.text.clone())
        else {
            log::warn!("Edited text {shape_id} is gone, leaving edit mode");
            self.exit();
            return false;
        };

        self.blink.reset(now);
        let mut edit = Caret {
            cursor,
            selection: selection.filter(|s| !s.is_empty()),
        };
        let len = content.chars().count();
        let extend = modifiers.shift;

        let replacement = match key {
            Key::Escape => {
                self.exit();
                return true;
            }
            Key::ArrowLeft => {
                match edit.selection {
                    Some(sel) if !extend => edit.collapse_to(sel.range().0),
                    _ => edit.move_to(edit.cursor.saturating_sub(1), extend),
                }
                None
            }
            Key::ArrowRight => {
                match edit.selection {
                    Some(sel) if !extend => edit.collapse_to(sel.range().1),
                    _ => edit.move_to((edit.cursor + 1).min(len), extend),
                }
                None
            }
            Key::ArrowUp | Key::ArrowDown => {
                let (line, col) = index_to_line_col(&content, edit.cursor);
                let last_line = content.split('\n').count() - 1;
                let target_line = match key {
                    Key::ArrowUp if line > 0 => Some(line - 1),
                    Key::ArrowDown if line < last_line => Some(line + 1),
                    _ => None,
                };
                if let Some(target_line) = target_line {
                    edit.move_to(line_col_to_index(&content, target_line, col), extend);
                }
                None
            }
            Key::Home | Key::End => {
                let (line, _) = index_to_line_col(&content, edit.cursor);
                let col = if key == Key::Home { 0 } else { usize::MAX };
                edit.move_to(line_col_to_index(&content, line, col), extend);
                None
            }
            Key::Backspace => match edit.selection {
                Some(sel) => Some((sel.range(), String::new())),
                None if edit.cursor > 0 => Some(((edit.cursor - 1, edit.cursor), String::new())),
                None => None,
            },
            Key::Delete => match edit.selection {
                Some(sel) => Some((sel.range(), String::new())),
                None if edit.cursor < len => Some(((edit.cursor, edit.cursor + 1), String::new())),
                None => None,
            },
            Key::Enter => Some((edit.insertion_range(), "\n".to_string())),
            Key::Character(c) if !modifiers.command() && !c.is_control() => {
                Some((edit.insertion_range(), c.to_string()))
            }
            Key::Character(_) | Key::Tab => None,
        };

        if let Some(((start, end), insert)) = replacement {
            let updated = splice(&content, start, end, &insert);
            if let Some(Shape::Text(text)) = store.get_mut(shape_id) {
                text.text = updated;
                text.relayout(measurer);
            }
            edit.cursor = start + insert.chars().count();
            edit.selection = None;
        }

        self.state = TextEditState::Editing {
            shape_id,
            cursor: edit.cursor,
            selection: edit.selection,
        };
        true
    }

    /// Caret and selection geometry of the active session in world coordinates.
    pub fn overlay(
        &self,
        store: &ShapeStore,
        measurer: &dyn TextMeasurer,
        now: Instant,
    ) -> Option<EditOverlay> {
        let TextEditState::Editing {
            shape_id,
            cursor,
            selection,
        } = self.state
        else {
            return None;
        };
        let text = store.get(shape_id).and_then(Shape::as_text)?;
        let font = text.font();
        let origin = text.position();
        let line_height = font.line_height_px();
        let at = |index: usize| index_to_coordinate(measurer, &text.text, font, origin, index);

        let caret = self.blink.is_visible(now).then(|| {
            let top = at(cursor);
            (top, Point::new(top.x, top.y + line_height))
        });

        let mut rects = Vec::new();
        if let Some(sel) = selection.filter(|s| !s.is_empty()) {
            let (start, end) = sel.range();
            let (first_line, first_col) = index_to_line_col(&text.text, start);
            let (last_line, last_col) = index_to_line_col(&text.text, end);
            for line in first_line..=last_line {
                let from = if line == first_line { first_col } else { 0 };
                let to = if line == last_line { last_col } else { usize::MAX };
                let left = at(line_col_to_index(&text.text, line, from));
                let right = at(line_col_to_index(&text.text, line, to));
                rects.push(Rect::new(left.x, left.y, right.x, left.y + line_height));
            }
        }

        Some(EditOverlay {
            shape_id,
            caret,
            selection: rects,
            frame: text.bounds(),
        })
    }
}

/// Cursor plus selection while a key is processed.
struct Caret {
    cursor: usize,
    selection: Option<TextSelection>,
}

impl Caret {
    fn move_to(&mut self, target: usize, extend: bool) {
        self.selection = if extend {
            let anchor = self.selection.map_or(self.cursor, |s| s.anchor);
            Some(TextSelection {
                anchor,
                head: target,
            })
            .filter(|s| !s.is_empty())
        } else {
            None
        };
        self.cursor = target;
    }

    fn collapse_to(&mut self, index: usize) {
        self.selection = None;
        self.cursor = index;
    }

    /// Range replaced by typed input: the selection, or an empty range at the cursor.
    fn insertion_range(&self) -> (usize, usize) {
        self.selection
            .map_or((self.cursor, self.cursor), |s| s.range())
    }
}
