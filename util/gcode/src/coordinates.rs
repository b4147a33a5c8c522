use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::output::Fixed;

#[derive(Clone, Copy, Debug, Default, PartialEq, derive_more::Add, derive_more::Sub, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}
impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };
    pub const UNIT_X: Point2 = Point2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
    pub fn distance(a: Self, b: Self) -> f64 {
        (b - a).length()
    }
    /// Counterclockwise rotation about the origin.
    pub fn rotate(self, angle_rad: f64) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
    /// Unsigned angle in [0, pi] between two vectors. NaN if either has zero length.
    pub fn angle_between(u: Self, v: Self) -> f64 {
        let cos = u.dot(v) / (u.length() * v.length());
        // Rounding can push parallel vectors just outside of acos' domain.
        cos.clamp(-1.0, 1.0).acos()
    }
    pub fn abs_near(self, other: Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}
impl Display for Point2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Fixed(3, self))
    }
}
