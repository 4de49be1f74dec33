/// 2D vector utilities in screen space (pixels, y pointing down).
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `degrees`, measured clockwise from +x in screen space.
    pub fn from_angle_deg(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (self - other).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Round to 2 decimal places for compact wire output.
    pub fn round2(self) -> [f64; 2] {
        [
            (self.x * 100.0).round() / 100.0,
            (self.y * 100.0).round() / 100.0,
        ]
    }
}

/// Shorthand constructor
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
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
    fn mul(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_zero_points_right() {
        let v = Vec2::from_angle_deg(0.0);
        assert!((v.x - 1.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
    }

    #[test]
    fn angle_ninety_points_down() {
        let v = Vec2::from_angle_deg(90.0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn from_angle_is_unit() {
        for deg in [-170.0, -45.0, 13.0, 200.0, 359.0] {
            assert!((Vec2::from_angle_deg(deg).length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn arithmetic() {
        let a = vec2(1.0, 2.0);
        let b = vec2(3.0, -1.0);
        assert_eq!(a + b, vec2(4.0, 1.0));
        assert_eq!(a - b, vec2(-2.0, 3.0));
        assert_eq!(a * 2.0, vec2(2.0, 4.0));
        assert!((vec2(0.0, 0.0).distance(vec2(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
