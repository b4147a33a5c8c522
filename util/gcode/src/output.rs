use std::fmt::{self, Display, Formatter};

use crate::{coordinates::Point2, transform::RigidTransform};

/// Formats the wrapped value with a fixed number of decimal places.
pub struct Fixed<'a, T>(pub u8, pub &'a T);

impl<'a> Display for Fixed<'a, f64> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.0 as usize, self.1)
    }
}
impl<'a> Display for Fixed<'a, Point2> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", Fixed(self.0, &self.1.x), Fixed(self.0, &self.1.y))
    }
}
impl<'a> Display for Fixed<'a, RigidTransform> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let transform = self.1;
        write!(
            f,
            "[ {}=>{} / {}=>{} ]",
            Fixed(self.0, &transform.from_start()),
            Fixed(self.0, &transform.to_start()),
            Fixed(self.0, &transform.from_end()),
            Fixed(self.0, &transform.to_end()),
        )
    }
}
