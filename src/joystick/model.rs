//! # Joystick Input Model
//!
//! Turns pointer drags into a clamped, normalized stick value.
//!
//! ## Sign Convention
//!
//! The stored offset is `origin - stick`. The stick follows the pointer, so
//! dragging toward `+x` yields a **negative** normalized x and dragging
//! toward smaller screen y (up) yields a **positive** normalized y.
//!
//! | Drag direction | Normalized value |
//! |----------------|------------------|
//! | Left | `x > 0` |
//! | Right | `x < 0` |
//! | Up | `y > 0` |
//! | Down | `y < 0` |
//!
//! ## Usage
//!
//! ```
//! use virtual_joy::joystick::{JoystickModel, Shape, Vec2};
//!
//! let mut joy = JoystickModel::new(Vec2::ZERO);
//! joy.set_shape(Shape::Disk);
//!
//! joy.begin_drag(Vec2::new(0.0, 0.0));
//! joy.update_drag(Vec2::new(100.0, 0.0));
//! assert_eq!(joy.current_value(), (-1.0, 0.0));
//!
//! joy.end_drag();
//! assert_eq!(joy.current_value(), (0.0, 0.0));
//! ```

use std::fmt;

use tracing::debug;

use super::geometry::{clamp, Shape, Vec2};
use crate::error::{Result, VirtualJoyError};

/// Default stick travel in pointer units.
pub const DEFAULT_RANGE: f64 = 80.0;

/// Stick axis reported to change observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

type Observer = Box<dyn FnMut(f64)>;

/// Virtual joystick state.
///
/// Observers registered with [`JoystickModel::on_change`] run synchronously
/// inside the call that moved the stick. They receive the new normalized
/// value of their axis.
///
/// # Thread Safety
///
/// `JoystickModel` is not thread-safe. Use from the UI event context only.
pub struct JoystickModel {
    origin: Vec2,
    offset: Vec2,
    range: f64,
    shape: Shape,
    /// Last pointer position seen while a drag is armed.
    drag_pointer: Option<Vec2>,
    x_observers: Vec<Observer>,
    y_observers: Vec<Observer>,
}

impl fmt::Debug for JoystickModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoystickModel")
            .field("origin", &self.origin)
            .field("offset", &self.offset)
            .field("range", &self.range)
            .field("shape", &self.shape)
            .field("dragging", &self.is_dragging())
            .finish_non_exhaustive()
    }
}

impl Default for JoystickModel {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl JoystickModel {
    /// Creates a model at rest on `origin` with the default range and a
    /// disk clamp.
    #[must_use]
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            offset: Vec2::ZERO,
            range: DEFAULT_RANGE,
            shape: Shape::Disk,
            drag_pointer: None,
            x_observers: Vec::new(),
            y_observers: Vec::new(),
        }
    }

    /// Creates a model with an explicit range and shape.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualJoyError::InvalidRange`] if `range` is not a
    /// positive, finite number.
    pub fn with_config(origin: Vec2, range: f64, shape: Shape) -> Result<Self> {
        let mut model = Self::new(origin);
        model.set_range(range)?;
        model.set_shape(shape);
        Ok(model)
    }

    /// Rest position of the stick.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Current displacement (`origin - stick`).
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Absolute stick position, for drawing.
    #[must_use]
    pub fn stick_position(&self) -> Vec2 {
        self.origin - self.offset
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.range
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Whether a drag is armed.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_pointer.is_some()
    }

    /// Registers an observer for one axis.
    ///
    /// Observers must not move the stick from inside the callback.
    pub fn on_change<F>(&mut self, axis: Axis, observer: F)
    where
        F: FnMut(f64) + 'static,
    {
        match axis {
            Axis::X => self.x_observers.push(Box::new(observer)),
            Axis::Y => self.y_observers.push(Box::new(observer)),
        }
    }

    /// Arms drag tracking at `start`. The offset is left untouched.
    pub fn begin_drag(&mut self, start: Vec2) {
        self.drag_pointer = Some(start);
    }

    /// Moves the stick by the pointer delta since the last drag event.
    ///
    /// The delta is applied to the current (already clamped) offset, so
    /// once the stick hits the boundary, moving the pointer back pulls the
    /// stick back immediately. Ignored when no drag is armed or the pointer
    /// is not a finite position.
    pub fn update_drag(&mut self, pointer: Vec2) {
        let Some(last) = self.drag_pointer else {
            return;
        };
        if !pointer.is_finite() {
            debug!("Ignoring non-finite pointer {:?}", pointer);
            return;
        }

        // Stick moves with the pointer, so the offset moves against it.
        let candidate = self.offset - (pointer - last);
        let limited = clamp(candidate, self.range, self.shape);

        self.drag_pointer = Some(pointer);
        if limited.is_finite() {
            self.move_to(limited);
        }
    }

    /// Releases the stick back to the origin. Safe to call at any time.
    pub fn end_drag(&mut self) {
        self.drag_pointer = None;
        self.move_to(Vec2::ZERO);
    }

    /// Selects the clamp shape.
    ///
    /// The current offset is re-clamped so it stays inside the new region.
    pub fn set_shape(&mut self, shape: Shape) {
        if shape != self.shape {
            debug!("Joystick shape changed: {} -> {}", self.shape, shape);
        }
        self.shape = shape;
        self.move_to(clamp(self.offset, self.range, self.shape));
    }

    /// Sets the stick travel.
    ///
    /// The current offset is re-clamped to the new bound. Observers fire if
    /// the normalized value changed as a result.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualJoyError::InvalidRange`] for zero, negative or
    /// non-finite values; the model is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_joy::joystick::JoystickModel;
    ///
    /// let mut joy = JoystickModel::default();
    /// assert!(joy.set_range(120.0).is_ok());
    /// assert!(joy.set_range(0.0).is_err());
    /// assert_eq!(joy.range(), 120.0);
    /// ```
    pub fn set_range(&mut self, range: f64) -> Result<()> {
        if !(range.is_finite() && range > 0.0) {
            return Err(VirtualJoyError::InvalidRange(range));
        }

        let before = self.current_value();
        self.range = range;
        self.offset = clamp(self.offset, self.range, self.shape);
        self.notify(before);
        Ok(())
    }

    /// Normalized stick value, each component in `[-1, 1]`.
    #[must_use]
    pub fn current_value(&self) -> (f64, f64) {
        // Disk scaling can overshoot the boundary by an ulp.
        (
            (self.offset.x / self.range).clamp(-1.0, 1.0),
            (self.offset.y / self.range).clamp(-1.0, 1.0),
        )
    }

    fn move_to(&mut self, offset: Vec2) {
        let before = self.current_value();
        self.offset = offset;
        self.notify(before);
    }

    fn notify(&mut self, before: (f64, f64)) {
        let (x, y) = self.current_value();

        if x != before.0 {
            for observer in &mut self.x_observers {
                observer(x);
            }
        }
        if y != before.1 {
            for observer in &mut self.y_observers {
                observer(y);
            }
        }
    }
}
