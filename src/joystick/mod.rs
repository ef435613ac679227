//! # Joystick Module
//!
//! The on-screen stick's input model.
//!
//! This module handles:
//! - Tracking pointer drags relative to a fixed rest position
//! - Clamping stick travel to a disk or a square
//! - Normalizing the offset to `[-1, 1]` per axis
//! - Notifying observers when an axis value changes

pub mod geometry;
pub mod model;

pub use geometry::{clamp, Shape, Vec2};
pub use model::{Axis, JoystickModel, DEFAULT_RANGE};
