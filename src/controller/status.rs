//! Textual readout of the stick value.
//!
//! Shows the value the way it is published, `(forward,left)`, with two
//! decimals.

use std::cell::RefCell;
use std::rc::Rc;

use crate::joystick::{Axis, JoystickModel};
use crate::publisher::message::JoyAxes;

/// Formats a stick value for display.
///
/// # Examples
///
/// ```
/// use virtual_joy::controller::status::format_readout;
/// use virtual_joy::publisher::message::JoyAxes;
///
/// let axes = JoyAxes::from_model((-1.0, 0.5));
/// assert_eq!(format_readout(axes), "(0.50,-1.00)");
/// ```
#[must_use]
pub fn format_readout(axes: JoyAxes) -> String {
    format!("({:.2},{:.2})", axes.forward, axes.left)
}

#[derive(Debug)]
struct ReadoutState {
    value: (f64, f64),
    text: String,
    updates: u64,
}

impl ReadoutState {
    fn refresh(&mut self) {
        self.text = format_readout(JoyAxes::from_model(self.value));
        self.updates += 1;
    }
}

/// Readout kept current by the model's change notifications.
#[derive(Debug, Clone)]
pub struct StatusReadout {
    state: Rc<RefCell<ReadoutState>>,
}

impl Default for StatusReadout {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReadout {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ReadoutState {
                value: (0.0, 0.0),
                text: format_readout(JoyAxes::from_model((0.0, 0.0))),
                updates: 0,
            })),
        }
    }

    /// Subscribes to both axes of `model`.
    pub fn attach(&self, model: &mut JoystickModel) {
        self.state.borrow_mut().value = model.current_value();

        let state = Rc::clone(&self.state);
        model.on_change(Axis::X, move |x| {
            let mut state = state.borrow_mut();
            state.value.0 = x;
            state.refresh();
        });

        let state = Rc::clone(&self.state);
        model.on_change(Axis::Y, move |y| {
            let mut state = state.borrow_mut();
            state.value.1 = y;
            state.refresh();
        });
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    /// Number of refreshes since creation.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.state.borrow().updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::{Shape, Vec2};

    #[test]
    fn test_format_readout_rounds() {
        let axes = JoyAxes { forward: 0.126, left: -0.004 };
        assert_eq!(format_readout(axes), "(0.13,-0.00)");
    }

    #[test]
    fn test_initial_text() {
        let readout = StatusReadout::new();
        assert_eq!(readout.text(), "(0.00,0.00)");
        assert_eq!(readout.updates(), 0);
    }

    #[test]
    fn test_follows_model() {
        let mut model = JoystickModel::default();
        model.set_shape(Shape::Square);
        let readout = StatusReadout::new();
        readout.attach(&mut model);

        model.begin_drag(Vec2::ZERO);
        model.update_drag(Vec2::new(-40.0, -80.0));

        // x = 0.5 (pulled left), y = 1.0 (pulled up); shown as (forward,left)
        assert_eq!(readout.text(), "(1.00,0.50)");
        assert_eq!(readout.updates(), 2);

        model.end_drag();
        assert_eq!(readout.text(), "(0.00,0.00)");
    }
}
