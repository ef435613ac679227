//! # Stick Geometry
//!
//! Plane vectors and the two clamp shapes that bound stick travel.
//!
//! ## Clamp Shapes
//!
//! | Shape | Bound | Behavior outside the bound |
//! |-------|-------|----------------------------|
//! | Disk | `norm(d) <= range` | Scaled back onto the circle, direction kept |
//! | Square | `abs(d.x) <= range` and `abs(d.y) <= range` | Each axis clamped on its own |
//!
//! ## Usage
//!
//! ```
//! use virtual_joy::joystick::geometry::{clamp, Shape, Vec2};
//!
//! let pulled = clamp(Vec2::new(100.0, 0.0), 80.0, Shape::Disk);
//! assert_eq!(pulled, Vec2::new(80.0, 0.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A point or displacement in the pointer's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// The zero vector (stick at rest).
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Sum of absolute components, used for click detection.
    #[must_use]
    pub fn manhattan_length(&self) -> f64 {
        self.x.abs() + self.y.abs()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Region the stick is allowed to travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Shape {
    /// Circle of radius `range`.
    #[default]
    Disk,
    /// Axis-aligned square of half-width `range`.
    Square,
}

impl Shape {
    /// Parses a shape name.
    ///
    /// `"circle"` and `"disk"` (any case) select [`Shape::Disk`]; every other
    /// name falls back to [`Shape::Square`].
    ///
    /// # Examples
    ///
    /// ```
    /// use virtual_joy::joystick::geometry::Shape;
    ///
    /// assert_eq!(Shape::from_name("circle"), Shape::Disk);
    /// assert_eq!(Shape::from_name("square"), Shape::Square);
    /// assert_eq!(Shape::from_name("hexagon"), Shape::Square);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "circle" | "disk" => Shape::Disk,
            _ => Shape::Square,
        }
    }

    /// Returns the name used in configuration files and on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Disk => "circle",
            Shape::Square => "square",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Shape {
    fn from(name: String) -> Self {
        Shape::from_name(&name)
    }
}

impl From<Shape> for String {
    fn from(shape: Shape) -> Self {
        shape.name().to_string()
    }
}

/// Bounds a candidate displacement to the given shape.
///
/// # Arguments
///
/// * `d` - Candidate displacement from the origin
/// * `range` - Disk radius or square half-width (must be positive)
/// * `shape` - Clamp region
///
/// # Examples
///
/// ```
/// use virtual_joy::joystick::geometry::{clamp, Shape, Vec2};
///
/// // Square clamps each axis on its own, so the corner is reachable
/// let corner = clamp(Vec2::new(100.0, -100.0), 80.0, Shape::Square);
/// assert_eq!(corner, Vec2::new(80.0, -80.0));
///
/// // Disk keeps direction and caps the length
/// let diag = clamp(Vec2::new(100.0, 100.0), 80.0, Shape::Disk);
/// assert!((diag.norm() - 80.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn clamp(d: Vec2, range: f64, shape: Shape) -> Vec2 {
    match shape {
        Shape::Disk => {
            // An overflowed component would scale to inf * 0
            let d = if d.norm().is_finite() {
                d
            } else {
                Vec2::new(clamp_axis(d.x, range), clamp_axis(d.y, range))
            };
            let norm = d.norm();
            let ratio = if norm > range { range / norm } else { 1.0 };
            d * ratio
        }
        Shape::Square => Vec2::new(clamp_axis(d.x, range), clamp_axis(d.y, range)),
    }
}

#[inline]
fn clamp_axis(value: f64, range: f64) -> f64 {
    if value.abs() > range {
        value.signum() * range
    } else {
        value
    }
}
