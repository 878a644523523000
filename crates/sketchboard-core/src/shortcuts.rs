//! Keyboard shortcut registry.
//!
//! Shortcuts only fire while the canvas owns keyboard focus. A text edit
//! session captures every key before they get here.

use crate::input::{Key, Modifiers};
use crate::tools::ToolKind;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Tool(ToolKind),
    /// Drop the selection and any in-progress drag.
    Cancel,
    ResetView,
    FitToContent,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: Key,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    const fn tool(c: char, tool: ToolKind, description: &'static str) -> Self {
        Self::new(Key::Character(c), false, false, ShortcutAction::Tool(tool), description)
    }

    /// Format the shortcut for display (e.g., "Ctrl+0").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Key::Character(c) => c.to_ascii_uppercase().to_string(),
            other => format!("{other:?}"),
        });
        parts.join("+")
    }

    fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        let key_matches = match (self.key, key) {
            (Key::Character(a), Key::Character(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        key_matches && self.ctrl == modifiers.command() && self.shift == modifiers.shift
    }
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::tool('v', ToolKind::Select, "Select tool"),
    Shortcut::tool('h', ToolKind::Pan, "Pan tool"),
    Shortcut::tool('r', ToolKind::Rectangle, "Rectangle tool"),
    Shortcut::tool('o', ToolKind::Ellipse, "Ellipse tool"),
    Shortcut::tool('d', ToolKind::Diamond, "Diamond tool"),
    Shortcut::tool('l', ToolKind::Line, "Line tool"),
    Shortcut::tool('a', ToolKind::Arrow, "Arrow tool"),
    Shortcut::tool('p', ToolKind::Pencil, "Pencil tool"),
    Shortcut::tool('t', ToolKind::Text, "Text tool"),
    Shortcut::tool('e', ToolKind::Eraser, "Eraser tool"),
    Shortcut::new(Key::Escape, false, false, ShortcutAction::Cancel, "Cancel current action"),
    Shortcut::new(Key::Character('0'), true, false, ShortcutAction::ResetView, "Reset zoom"),
    Shortcut::new(Key::Character('1'), false, true, ShortcutAction::FitToContent, "Zoom to fit"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        SHORTCUTS
    }

    /// Action bound to a key press, if any.
    pub fn lookup(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
        SHORTCUTS
            .iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.action)
    }
}
