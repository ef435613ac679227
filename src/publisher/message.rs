//! # Joy Message
//!
//! Outbound control message: a header, two float axes and one integer per
//! button (`1` pressed, `0` released).
//!
//! ## Axis Order
//!
//! The stick's normalized `(x, y)` is reordered into robot convention before
//! publishing:
//!
//! | Index | Meaning | Source |
//! |-------|---------|--------|
//! | `axes[0]` | Forward (stick pushed up) | model `y` |
//! | `axes[1]` | Left (stick pushed left) | model `x` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock timestamp split into seconds and nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub secs: i64,
    pub nsecs: u32,
}

impl Stamp {
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self {
            secs: time.timestamp(),
            nsecs: time.timestamp_subsec_nanos(),
        }
    }
}

/// Message header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub seq: u32,
    pub stamp: Stamp,
    pub frame_id: String,
}

/// Stick value in publishing order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoyAxes {
    /// Positive when the stick is pushed up.
    pub forward: f64,
    /// Positive when the stick is pushed left.
    pub left: f64,
}

impl JoyAxes {
    /// Reorders a normalized model value `(x, y)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_joy::publisher::message::JoyAxes;
    ///
    /// let axes = JoyAxes::from_model((0.25, -1.0));
    /// assert_eq!(axes.forward, -1.0);
    /// assert_eq!(axes.left, 0.25);
    /// ```
    #[must_use]
    pub fn from_model(value: (f64, f64)) -> Self {
        let (x, y) = value;
        Self { forward: y, left: x }
    }

    #[must_use]
    pub fn to_array(self) -> [f32; 2] {
        [self.forward as f32, self.left as f32]
    }
}

/// Joystick control message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoyMessage {
    pub header: Header,
    pub axes: Vec<f32>,
    pub buttons: Vec<i32>,
}

impl JoyMessage {
    /// Builds a message from the stick value and button states.
    #[must_use]
    pub fn new(header: Header, axes: JoyAxes, buttons: &[bool]) -> Self {
        Self {
            header,
            axes: axes.to_array().to_vec(),
            buttons: buttons.iter().map(|&down| i32::from(down)).collect(),
        }
    }
}
