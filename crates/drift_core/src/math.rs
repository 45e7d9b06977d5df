//! 2D vector math for the motion simulation.
//!
//! All simulation math is `f32`, matching the authoritative physics this
//! crate mirrors (which is defined in terms of `cos`/`sin`/`atan2` on 32-bit
//! floats). Replay consistency only requires that identical inputs produce
//! identical outputs, which holds for a fixed sequence of `f32` operations
//! on a given target.

use serde::{Deserialize, Serialize};

/// 2D vector in simulation space.
///
/// Used for both positions (simulation units) and velocities
/// (simulation units per millisecond).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along the given angle (radians).
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Squared length (avoids sqrt for comparisons).
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Vector length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Angle of this vector in radians (`atan2(y, x)`).
    #[must_use]
    pub fn direction(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < f32::EPSILON);
        assert!((v.length_squared() - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dot() {
        let a = Vec2::new(2.0, 3.0);
        let b = Vec2::new(4.0, -1.0);
        assert!((a.dot(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_angle_is_unit_length() {
        for i in 0..8 {
            let angle = std::f32::consts::FRAC_PI_4 * i as f32;
            let v = Vec2::from_angle(angle);
            assert!((v.length() - 1.0).abs() < 1e-6, "angle {angle}");
        }
    }

    #[test]
    fn test_direction_roundtrip() {
        let v = Vec2::new(1.0, 1.0);
        assert!((v.direction() - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_operators() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));

        let mut c = a;
        c += b;
        assert_eq!(c, Vec2::new(4.0, 1.0));
    }
}
