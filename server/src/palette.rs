use crane_shared::color::Rgb;

use crate::config::ColorEntry;

/// A registered crane color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceColor {
    pub color: Rgb,
    /// Color used on screen and on the outbound link
    pub display: Rgb,
    /// Observed colors must be strictly closer than this to match
    pub threshold: f64,
}

impl From<&ColorEntry> for ReferenceColor {
    fn from(entry: &ColorEntry) -> Self {
        Self {
            color: entry.rgb,
            display: entry.representation,
            threshold: entry.threshold,
        }
    }
}

/// Immutable set of reference colors, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<ReferenceColor>,
}

impl Palette {
    pub fn new(colors: Vec<ReferenceColor>) -> Self {
        Self { colors }
    }

    pub fn from_entries(entries: &[ColorEntry]) -> Self {
        Self::new(entries.iter().map(ReferenceColor::from).collect())
    }

    /// Index of the nearest reference color whose own threshold admits
    /// `observed`. Equal distances resolve to the lowest index.
    pub fn match_color(&self, observed: Rgb) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, reference) in self.colors.iter().enumerate() {
            let d = observed.distance(reference.color);
            if d >= reference.threshold {
                continue;
            }
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((idx, d));
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub fn get(&self, idx: usize) -> Option<&ReferenceColor> {
        self.colors.get(idx)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
