use std::fmt::{self, Display, Formatter};

use crate::{coordinates::Point2, output::Fixed};

/// Absolute tolerance, in drawing units, for anchor distances and rotated directions.
pub const TOLERANCE: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("distance {from_start}-{from_end} ({}) differs from distance {to_start}-{to_end} ({})", Fixed(3, .from_distance), Fixed(3, .to_distance))]
    DistanceMismatch {
        from_start: Point2,
        from_end: Point2,
        from_distance: f64,
        to_start: Point2,
        to_end: Point2,
        to_distance: f64,
    },
    #[error("rotating {from} by +/-{angle_rad} rad does not reproduce {to}")]
    RotationUnresolvable {
        from: Point2,
        to: Point2,
        angle_rad: f64,
    },
}

/// A rotation followed by a translation, defined by two source anchors and the two
/// destination anchors they map to.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidTransform {
    from_start: Point2,
    from_end: Point2,
    to_start: Point2,
    to_end: Point2,
    rotation_rad: f64,
    rotation_deg: f64,
}

impl RigidTransform {
    pub const IDENTITY: RigidTransform = RigidTransform {
        from_start: Point2::ZERO,
        from_end: Point2::UNIT_X,
        to_start: Point2::ZERO,
        to_end: Point2::UNIT_X,
        rotation_rad: 0.0,
        rotation_deg: 0.0,
    };

    pub fn new(from_start: Point2, from_end: Point2, to_start: Point2, to_end: Point2) -> Result<Self, TransformError> {
        let from_distance = Point2::distance(from_start, from_end);
        let to_distance = Point2::distance(to_start, to_end);
        if (from_distance - to_distance).abs() > TOLERANCE {
            return Err(TransformError::DistanceMismatch {
                from_start,
                from_end,
                from_distance,
                to_start,
                to_end,
                to_distance,
            });
        }
        let rotation_rad = resolve_rotation(from_end - from_start, to_end - to_start)?;
        Ok(Self {
            from_start,
            from_end,
            to_start,
            to_end,
            rotation_rad,
            rotation_deg: normalize_degrees(rotation_rad.to_degrees()),
        })
    }

    pub fn from_start(&self) -> Point2 {
        self.from_start
    }
    pub fn from_end(&self) -> Point2 {
        self.from_end
    }
    pub fn to_start(&self) -> Point2 {
        self.to_start
    }
    pub fn to_end(&self) -> Point2 {
        self.to_end
    }
    /// Signed rotation; positive is counterclockwise.
    pub fn rotation_rad(&self) -> f64 {
        self.rotation_rad
    }
    /// Rotation in degrees, normalized into [0, 360).
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    pub fn transform_point(&self, point: Point2) -> Point2 {
        (point - self.from_start).rotate(self.rotation_rad) + self.to_start
    }

    /// Re-expresses the destination frame of `other` through this transform, so that
    /// the result behaves like applying `other` and then `self`.
    pub fn transform_transform(&self, other: &RigidTransform) -> Result<RigidTransform, TransformError> {
        RigidTransform::new(
            other.from_start,
            other.from_end,
            self.transform_point(other.to_start),
            self.transform_point(other.to_end),
        )
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Display for RigidTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Fixed(3, self))
    }
}

// acos yields the same angle for clockwise and counterclockwise rotations, so both
// directions have to be tried.
fn resolve_rotation(from: Point2, to: Point2) -> Result<f64, TransformError> {
    let angle_rad = Point2::angle_between(from, to);
    if from.rotate(angle_rad).abs_near(to, TOLERANCE) {
        Ok(angle_rad)
    } else if from.rotate(-angle_rad).abs_near(to, TOLERANCE) {
        Ok(-angle_rad)
    } else {
        Err(TransformError::RotationUnresolvable { from, to, angle_rad })
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if 360.0 - normalized < 1e-9 {
        0.0
    } else {
        normalized
    }
}
