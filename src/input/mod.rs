//! # Input Module
//!
//! Decodes UI events and applies them to a [`JoyController`].
//!
//! Events arrive as JSON lines, one object per line, tagged by `type`:
//!
//! | Type | Fields | Effect |
//! |------|--------|--------|
//! | `press` | `x`, `y`, `button` (optional, default `left`) | Arms a drag (left button only) |
//! | `move` | `x`, `y` | Drags the stick |
//! | `release` | `x`, `y` | Returns the stick to rest |
//! | `button` | `index`, `down` | Sets a joy button |
//! | `shape` | `shape` | Selects `circle` or `square` |
//! | `range` | `value` | Sets stick travel |
//! | `rate` | `hz` | Sets publish rate |
//! | `topic` | `name` | Moves publication |
//! | `publish` | `enabled` | Starts or stops publication |
//!
//! ## Usage
//!
//! ```
//! use virtual_joy::config::Config;
//! use virtual_joy::controller::JoyController;
//! use virtual_joy::input::EventDispatcher;
//!
//! let (mut dispatcher, bank) = EventDispatcher::new(2);
//! let mut controller = JoyController::new(&Config::default(), bank)?;
//!
//! for line in [
//!     r#"{"type": "press", "x": 0, "y": 0}"#,
//!     r#"{"type": "move", "x": 0, "y": -100}"#,
//! ] {
//!     if let Some(event) = EventDispatcher::parse_line(line)? {
//!         dispatcher.apply(&mut controller, event)?;
//!     }
//! }
//!
//! assert_eq!(controller.model().current_value(), (0.0, 1.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::cell::Cell;
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::controller::JoyController;
use crate::error::Result;
use crate::joystick::Vec2;
use crate::publisher::buttons::ButtonBank;

/// Largest pointer travel (Manhattan distance) still treated as a click.
pub const CLICK_THRESHOLD: f64 = 3.0;

/// Pointer button that produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// One UI event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Release {
        x: f64,
        y: f64,
    },
    Button {
        index: usize,
        down: bool,
    },
    /// Shape by name; unknown names select a square.
    Shape {
        shape: String,
    },
    Range {
        value: f64,
    },
    Rate {
        hz: f64,
    },
    Topic {
        name: String,
    },
    Publish {
        enabled: bool,
    },
}

/// How a pointer release should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// Pointer barely moved between press and release.
    Click,
    /// Pointer travelled further than [`CLICK_THRESHOLD`].
    Drag,
    /// Release without a matching left-button press.
    Stray,
}

/// Classifies a release by pointer travel since the press.
///
/// # Examples
///
/// ```
/// use virtual_joy::input::{classify_release, ReleaseKind};
/// use virtual_joy::joystick::Vec2;
///
/// assert_eq!(classify_release(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)), ReleaseKind::Click);
/// assert_eq!(classify_release(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)), ReleaseKind::Drag);
/// ```
#[must_use]
pub fn classify_release(press: Vec2, release: Vec2) -> ReleaseKind {
    if (release - press).manhattan_length() > CLICK_THRESHOLD {
        ReleaseKind::Drag
    } else {
        ReleaseKind::Click
    }
}

/// Applies UI events to a controller and owns the button widgets' state.
#[derive(Debug)]
pub struct EventDispatcher {
    buttons: Vec<Rc<Cell<bool>>>,
    press: Option<Vec2>,
}

impl EventDispatcher {
    /// Creates a dispatcher with `button_count` buttons.
    ///
    /// The returned bank reads the same button states and is handed to the
    /// controller.
    #[must_use]
    pub fn new(button_count: usize) -> (Self, ButtonBank) {
        let (bank, buttons) = ButtonBank::with_cells(button_count);
        (Self { buttons, press: None }, bank)
    }

    /// Decodes one line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualJoyError::Event`](crate::error::VirtualJoyError::Event)
    /// for malformed JSON or unknown event types.
    pub fn parse_line(line: &str) -> Result<Option<UiEvent>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(line)?))
    }

    /// Applies one event.
    ///
    /// Returns the release classification for `release` events.
    ///
    /// # Errors
    ///
    /// Returns an error if a range or topic change is rejected; the
    /// controller keeps its previous setting.
    pub fn apply(
        &mut self,
        controller: &mut JoyController,
        event: UiEvent,
    ) -> Result<Option<ReleaseKind>> {
        match event {
            UiEvent::Press { x, y, button } => {
                if button == PointerButton::Left {
                    let at = Vec2::new(x, y);
                    self.press = Some(at);
                    controller.model_mut().begin_drag(at);
                } else {
                    debug!("Ignoring {:?} button press", button);
                }
            }
            UiEvent::Move { x, y } => {
                controller.model_mut().update_drag(Vec2::new(x, y));
            }
            UiEvent::Release { x, y } => {
                controller.model_mut().end_drag();

                let kind = match self.press.take() {
                    Some(press) => classify_release(press, Vec2::new(x, y)),
                    None => ReleaseKind::Stray,
                };
                debug!("Pointer released ({:?})", kind);
                return Ok(Some(kind));
            }
            UiEvent::Button { index, down } => match self.buttons.get(index) {
                Some(button) => button.set(down),
                None => warn!(
                    "Button index {} out of range ({} buttons)",
                    index,
                    self.buttons.len()
                ),
            },
            UiEvent::Shape { shape } => controller.set_shape_name(&shape),
            UiEvent::Range { value } => controller.set_range(value)?,
            UiEvent::Rate { hz } => controller.set_rate(hz),
            UiEvent::Topic { name } => controller.set_topic(&name)?,
            UiEvent::Publish { enabled } => controller.set_publish_enabled(enabled),
        }

        Ok(None)
    }
}
