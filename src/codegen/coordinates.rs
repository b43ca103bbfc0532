// World coordinates known at generation time
//
// Every axis carries its own relative flag. A relative axis is an offset from
// the position the enclosing command executes at and renders with a tilde.

use std::fmt;
use std::ops::{Add, Sub};

/// One axis of a coordinate triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Axis {
    pub value: i32,
    pub relative: bool,
}

impl Axis {
    pub const fn absolute(value: i32) -> Self {
        Axis {
            value,
            relative: false,
        }
    }

    pub const fn relative(value: i32) -> Self {
        Axis {
            value,
            relative: true,
        }
    }

    /// Coordinate for teleporting to the corner of a block rather than its middle
    pub fn exact(&self) -> String {
        if self.relative {
            self.to_string()
        } else {
            format!("{}.0", self.value)
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.relative, self.value) {
            (true, 0) => write!(f, "~"),
            (true, v) => write!(f, "~{}", v),
            (false, v) => write!(f, "{}", v),
        }
    }
}

impl Add for Axis {
    type Output = Axis;

    fn add(self, other: Axis) -> Axis {
        Axis {
            value: self.value + other.value,
            relative: self.relative || other.relative,
        }
    }
}

impl Sub for Axis {
    type Output = Axis;

    fn sub(self, other: Axis) -> Axis {
        Axis {
            value: self.value - other.value,
            relative: self.relative || other.relative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinates {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

// unit vectors
pub const EAST: Coordinates = Coordinates::new(1, 0, 0);
pub const WEST: Coordinates = Coordinates::new(-1, 0, 0);
pub const UP: Coordinates = Coordinates::new(0, 1, 0);
pub const DOWN: Coordinates = Coordinates::new(0, -1, 0);
pub const SOUTH: Coordinates = Coordinates::new(0, 0, 1);
pub const NORTH: Coordinates = Coordinates::new(0, 0, -1);

/// The position at which the enclosing command is being executed
pub const CURRENT: Coordinates = Coordinates::relative(0, 0, 0);

impl Coordinates {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Coordinates {
            x: Axis::absolute(x),
            y: Axis::absolute(y),
            z: Axis::absolute(z),
        }
    }

    pub const fn relative(x: i32, y: i32, z: i32) -> Self {
        Coordinates {
            x: Axis::relative(x),
            y: Axis::relative(y),
            z: Axis::relative(z),
        }
    }

    pub fn is_absolute(&self) -> bool {
        !(self.x.relative || self.y.relative || self.z.relative)
    }

    pub fn exact(&self) -> String {
        format!("{} {} {}", self.x.exact(), self.y.exact(), self.z.exact())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl Add for Coordinates {
    type Output = Coordinates;

    fn add(self, other: Coordinates) -> Coordinates {
        Coordinates {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;

    fn sub(self, other: Coordinates) -> Coordinates {
        Coordinates {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_rendering() {
        let c = Coordinates::new(0, -32, 7);
        assert_eq!(c.to_string(), "0 -32 7");
        assert_eq!(c.exact(), "0.0 -32.0 7.0");
        assert!(c.is_absolute());
    }

    #[test]
    fn test_relative_rendering() {
        assert_eq!(CURRENT.to_string(), "~ ~ ~");
        assert_eq!(Coordinates::relative(1, 0, -4).to_string(), "~1 ~ ~-4");
        assert!(!CURRENT.is_absolute());
    }

    #[test]
    fn test_relative_flag_survives_arithmetic() {
        let moved = CURRENT + Coordinates::new(3, 0, 0);
        assert_eq!(moved.to_string(), "~3 ~ ~");
        let back = moved - EAST;
        assert_eq!(back.to_string(), "~2 ~ ~");
        assert_eq!((EAST + UP + SOUTH).to_string(), "1 1 1");
    }

    #[test]
    fn test_mixed_axes_keep_their_own_flags() {
        let c = Coordinates {
            x: Axis::relative(2),
            y: Axis::absolute(64),
            z: Axis::relative(0),
        };
        assert_eq!(c.to_string(), "~2 64 ~");
        assert_eq!(c.exact(), "~2 64.0 ~");
    }
}
