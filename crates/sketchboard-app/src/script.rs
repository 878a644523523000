//! Replay scripts: a JSON array of input events and canvas commands.
//!
//! ```json
//! [
//!   {"command": "tool", "tool": "rectangle"},
//!   {"type": "pointer_down", "position": {"x": 10, "y": 10}},
//!   {"type": "pointer_up", "position": {"x": 120, "y": 80}},
//!   {"command": "stroke_color", "code": "#e03131"}
//! ]
//! ```

use serde::Deserialize;
use sketchboard_core::{Canvas, InputEvent, StyleChange, StyleError, ToolKind};
use std::path::Path;
use std::time::{Duration, Instant};

/// Time that passes between two replayed steps.
pub const STEP_INTERVAL: Duration = Duration::from_millis(16);

/// A direct canvas operation that has no input-event equivalent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Tool { tool: ToolKind },
    Style { change: StyleChange },
    StrokeColor { code: String },
    FillColor { code: String },
    Resize { width: f64, height: f64 },
    FitToContent,
    Clear,
}

/// One entry of a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Command(Command),
    Event(InputEvent),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let steps: Vec<Step> = serde_json::from_str(json)?;
        Ok(Self { steps })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::AppError> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub commands: usize,
    /// Events after which the canvas asked for a redraw.
    pub redraws: usize,
}

/// Feeds script steps to a canvas on a simulated clock.
pub struct Replayer {
    now: Instant,
    stats: ReplayStats,
}

impl Replayer {
    pub fn new(start: Instant) -> Self {
        Self {
            now: start,
            stats: ReplayStats::default(),
        }
    }

    /// Simulated time of the last step.
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    pub fn run(&mut self, canvas: &mut Canvas, script: &Script) -> Result<ReplayStats, StyleError> {
        for step in &script.steps {
            self.step(canvas, step)?;
        }
        Ok(self.stats)
    }

    pub fn step(&mut self, canvas: &mut Canvas, step: &Step) -> Result<(), StyleError> {
        self.now += STEP_INTERVAL;
        match step {
            Step::Event(event) => {
                self.stats.events += 1;
                if canvas.handle_event(event.clone(), self.now) {
                    self.stats.redraws += 1;
                }
            }
            Step::Command(command) => {
                self.stats.commands += 1;
                apply(canvas, command)?;
            }
        }
        Ok(())
    }
}

fn apply(canvas: &mut Canvas, command: &Command) -> Result<(), StyleError> {
    log::debug!("Command {command:?}");
    match command {
        Command::Tool { tool } => canvas.set_tool(*tool),
        Command::Style { change } => canvas.set_style(*change)?,
        Command::StrokeColor { code } => canvas.set_stroke_color(code)?,
        Command::FillColor { code } => canvas.set_fill_color(code)?,
        Command::Resize { width, height } => canvas.set_viewport_size(*width, *height),
        Command::FitToContent => canvas.fit_to_content(),
        Command::Clear => canvas.clear_all(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sketchboard_core::shapes::{SerializableColor, Shape};

    #[test]
    fn test_parse_mixed_steps() {
        let script = Script::from_json(
            r#"[
                {"command": "tool", "tool": "ellipse"},
                {"type": "pointer_down", "position": {"x": 1, "y": 2}},
                {"type": "key_down", "key": {"key": "escape"}},
                {"command": "style", "change": {"property": "stroke_width", "value": 4}},
                {"command": "clear"}
            ]"#,
        )
        .unwrap();
        assert_eq!(script.len(), 5);
        assert_eq!(
            script.steps[0],
            Step::Command(Command::Tool {
                tool: ToolKind::Ellipse
            })
        );
        assert!(matches!(
            script.steps[1],
            Step::Event(InputEvent::PointerDown { position, .. }) if position == Point::new(1.0, 2.0)
        ));
        assert_eq!(
            script.steps[3],
            Step::Command(Command::Style {
                change: StyleChange::StrokeWidth(4.0)
            })
        );
        assert_eq!(script.steps[4], Step::Command(Command::Clear));
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        assert!(Script::from_json(r#"[{"type": "teleport"}]"#).is_err());
        assert!(Script::from_json(r#"[{"command": "undo"}]"#).is_err());
    }

    #[test]
    fn test_replay_draws_and_styles() {
        let mut canvas = Canvas::default();
        let script = Script {
            steps: vec![
                Step::Command(Command::StrokeColor {
                    code: "#e03131".to_string(),
                }),
                Step::Command(Command::Tool {
                    tool: ToolKind::Diamond,
                }),
                Step::Event(InputEvent::pointer_down(0.0, 0.0)),
                Step::Event(InputEvent::pointer_move(20.0, 20.0)),
                Step::Event(InputEvent::pointer_up(40.0, 30.0)),
            ],
        };
        let start = Instant::now();
        let mut replayer = Replayer::new(start);
        let stats = replayer.run(&mut canvas, &script).unwrap();

        assert_eq!(stats.events, 3);
        assert_eq!(stats.commands, 2);
        assert_eq!(replayer.now(), start + STEP_INTERVAL * 5);
        match canvas.store().shapes() {
            [Shape::Diamond(d)] => assert_eq!(
                d.style.stroke_color,
                SerializableColor::new(0xe0, 0x31, 0x31, 255)
            ),
            other => panic!("expected one diamond, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_color_stops_replay() {
        let mut canvas = Canvas::default();
        let script = Script {
            steps: vec![
                Step::Command(Command::StrokeColor {
                    code: "not-a-color".to_string(),
                }),
                Step::Command(Command::Clear),
            ],
        };
        let mut replayer = Replayer::new(Instant::now());
        assert!(replayer.run(&mut canvas, &script).is_err());
        assert_eq!(replayer.stats().commands, 1);
    }
}
