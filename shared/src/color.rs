use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error parsing a comma-separated color or point string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseTupleError {
    #[error("expected {expected} comma-separated values, got {got} in {input:?}")]
    Arity {
        expected: usize,
        got: usize,
        input: String,
    },
    #[error("invalid component {value:?} in {input:?}")]
    Component { value: String, input: String },
}

fn split_components<T: FromStr>(input: &str, expected: usize) -> Result<Vec<T>, ParseTupleError> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(ParseTupleError::Arity {
            expected,
            got: parts.len(),
            input: input.to_string(),
        });
    }
    parts
        .into_iter()
        .map(|p| {
            p.parse::<T>().map_err(|_| ParseTupleError::Component {
                value: p.to_string(),
                input: input.to_string(),
            })
        })
        .collect()
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from floating point channels. Out-of-range values saturate to
    /// 0..=255, fractions truncate, NaN becomes 0.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(r as u8, g as u8, b as u8)
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Channels scaled to [0, 1].
    pub fn normalized(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseTupleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = split_components::<u8>(s, 3)?;
        Ok(Self::new(c[0], c[1], c[2]))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseTupleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ParseTupleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = split_components::<u8>(s, 4)?;
        Ok(Self::new(c[0], c[1], c[2], c[3]))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseTupleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

/// Screen position written as `"x,y"` in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PointStr(pub crate::vec2::Vec2);

impl FromStr for PointStr {
    type Err = ParseTupleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let c = split_components::<f64>(s, 2)?;
        Ok(Self(crate::vec2::Vec2::new(c[0], c[1])))
    }
}

impl TryFrom<String> for PointStr {
    type Error = ParseTupleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PointStr> for String {
    fn from(value: PointStr) -> Self {
        format!("{},{}", value.0.x, value.0.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_string() {
        assert_eq!("10, 200,30".parse::<Rgb>().unwrap(), Rgb::new(10, 200, 30));
    }

    #[test]
    fn rgb_wrong_arity_is_error() {
        assert!(matches!(
            "10,200".parse::<Rgb>(),
            Err(ParseTupleError::Arity { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn rgb_out_of_byte_range_is_error() {
        assert!(matches!(
            "10,300,0".parse::<Rgb>(),
            Err(ParseTupleError::Component { .. })
        ));
    }

    #[test]
    fn parses_rgba_string() {
        assert_eq!(
            "215,185,140,255".parse::<Rgba>().unwrap(),
            Rgba::new(215, 185, 140, 255)
        );
    }

    #[test]
    fn from_channels_saturates() {
        assert_eq!(
            Rgb::from_channels(-20.0, 300.0, 12.9),
            Rgb::new(0, 255, 12)
        );
        assert_eq!(Rgb::from_channels(f64::NAN, 0.0, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn distance_is_euclidean() {
        let d = Rgb::new(0, 0, 0).distance(Rgb::new(3, 4, 0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_divides_by_255() {
        let [r, g, b] = Rgb::new(255, 0, 51).normalized();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rgb_serde_uses_string_form() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"1,2,3\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(1, 2, 3));
    }

    #[test]
    fn point_parses() {
        let p: PointStr = "300, 500.5".parse().unwrap();
        assert_eq!(p.0, crate::vec2::Vec2::new(300.0, 500.5));
    }
}
