//! Printable help for keyboard shortcuts and pointer gestures.

use sketchboard_core::ShortcutRegistry;

/// Gestures that are not bound to a single key.
const GESTURES: &[(&str, &str)] = &[
    ("Mouse wheel", "Zoom at cursor"),
    ("Trackpad scroll", "Pan"),
    ("Trackpad pinch", "Zoom at cursor"),
    ("Two-finger touch", "Pan and pinch zoom"),
    ("Drag handle", "Resize selected shape"),
];

/// Shortcut table, one entry per line.
pub fn help_text() -> String {
    let mut out = String::from("=== Keyboard Shortcuts ===\n");
    for shortcut in ShortcutRegistry::all() {
        out.push_str(&format!("  {:20} {}\n", shortcut.format(), shortcut.description));
    }
    out.push_str("\n=== Pointer Gestures ===\n");
    for (gesture, description) in GESTURES {
        out.push_str(&format!("  {gesture:20} {description}\n"));
    }
    out
}
