//! Color maps and value normalization for heatmaps.

use crate::common::*;

/// Linear color maps, following the segment data of matplotlib's maps of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    Gray,
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl ColorMap {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Maps a value in [0, 1] to a color. Values out of range are clamped and NaN maps to 0.
    pub fn color(&self, value: f32) -> Rgb<u8> {
        let t = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };

        let [r, g, b] = match self {
            Self::Gray => [t, t, t],
            Self::Spring => [1.0, t, 1.0 - t],
            Self::Summer => [t, 0.5 + t / 2.0, 0.4],
            Self::Autumn => [1.0, t, 0.0],
            Self::Winter => [0.0, t, 1.0 - t / 2.0],
        };
        Rgb([to_u8(r), to_u8(g), to_u8(b)])
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Linear mapping from `[vmin, vmax]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f32,
    pub vmax: f32,
}

impl Normalize {
    pub fn new(vmin: f32, vmax: f32) -> Self {
        Self { vmin, vmax }
    }

    /// Spans the finite values of the data, or `[0, 1]` if there is none.
    pub fn from_data<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a f32>,
    {
        values
            .into_iter()
            .cloned()
            .filter(|value| value.is_finite())
            .minmax()
            .into_option()
            .map(|(vmin, vmax)| Self { vmin, vmax })
            .unwrap_or_else(|| Self::new(0.0, 1.0))
    }

    /// Maps a value onto `[0, 1]`. A degenerate range maps everything to 0.
    pub fn apply(&self, value: f32) -> f32 {
        let range = self.vmax - self.vmin;
        if range > 0.0 {
            ((value - self.vmin) / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
