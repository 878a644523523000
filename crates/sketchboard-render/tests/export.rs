//! Canvas state exported through the SVG surface.

use sketchboard_core::{Canvas, InputEvent, Key, ToolKind};
use sketchboard_render::{Frame, RenderPipeline, SvgSurface};
use std::time::Instant;

fn export(canvas: &Canvas, now: Instant) -> String {
    let mut pipeline = RenderPipeline::new(SvgSurface::new(canvas.viewport().size));
    pipeline.redraw(&Frame::from_canvas(canvas, now));
    pipeline.surface().unwrap().finish()
}

#[test]
fn every_kind_reaches_the_document() {
    let now = Instant::now();
    let mut canvas = Canvas::default();
    let drag = |canvas: &mut Canvas, tool, from: (f64, f64), to: (f64, f64)| {
        canvas.set_tool(tool);
        canvas.handle_event(InputEvent::pointer_down(from.0, from.1), now);
        canvas.handle_event(InputEvent::pointer_move((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0), now);
        canvas.handle_event(InputEvent::pointer_up(to.0, to.1), now);
    };
    drag(&mut canvas, ToolKind::Rectangle, (10.0, 10.0), (60.0, 40.0));
    drag(&mut canvas, ToolKind::Ellipse, (100.0, 10.0), (160.0, 50.0));
    drag(&mut canvas, ToolKind::Line, (10.0, 100.0), (80.0, 120.0));
    drag(&mut canvas, ToolKind::Pencil, (200.0, 200.0), (260.0, 230.0));

    let doc = export(&canvas, now);
    assert!(doc.contains("<path"));
    assert!(doc.contains("<ellipse"));
    assert!(doc.contains("<line"));
    assert!(doc.contains("<polygon"));
}

#[test]
fn text_is_exported_with_caret_while_editing() {
    let now = Instant::now();
    let mut canvas = Canvas::default();
    canvas.set_tool(ToolKind::Text);
    canvas.handle_event(InputEvent::pointer_down(40.0, 40.0), now);
    canvas.handle_event(InputEvent::pointer_up(40.0, 40.0), now);
    for c in "Hi <3".chars() {
        canvas.handle_event(InputEvent::key(Key::Character(c)), now);
    }

    let doc = export(&canvas, now);
    assert!(doc.contains(">Hi &lt;3</text>"));

    canvas.handle_event(InputEvent::key(Key::Escape), now);
    let doc = export(&canvas, now);
    assert!(doc.contains(">Hi &lt;3</text>"));
}
