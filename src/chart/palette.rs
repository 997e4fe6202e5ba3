/// Series color generation.
///
/// Colors live on the HSL hue circle at a fixed saturation and lightness, so
/// every series has the same visual weight and only the hue varies.
///
/// Two strategies:
///
/// | Kind     | Hue source                        | Stable across renders |
/// |----------|-----------------------------------|-----------------------|
/// | `random` | uniform draw from `[0, 360)`      | no                    |
/// | `hashed` | FNV-1a hash of the column name    | yes                   |
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::config::schema::ChartConfigSection;

/// Which hue strategy the configurator uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    /// Fresh hue for every series on every render.
    #[default]
    Random,
    /// Hue derived from the column name.
    Hashed,
}

impl PaletteKind {
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "random" => Some(Self::Random),
            "hashed" | "hash" | "stable" => Some(Self::Hashed),
            _ => None,
        }
    }
}

impl fmt::Display for PaletteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Hashed => write!(f, "hashed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Hsl
// ---------------------------------------------------------------------------

/// A CSS-style HSL color. Saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    /// Convert to 8-bit RGB.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = f64::from(self.saturation.min(100)) / 100.0;
        let l = f64::from(self.lightness.min(100)) / 100.0;

        if s == 0.0 {
            let v = to_byte(l);
            return (v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        (
            to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_byte(hue_to_rgb(p, q, h)),
            to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }

    /// `#rrggbb` form of the color.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.1}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

impl Serialize for Hsl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Color source for one configuration pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub kind: PaletteKind,
    pub saturation: u8,
    pub lightness: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ChartConfigSection::default())
    }
}

impl Palette {
    pub fn from_config(config: &ChartConfigSection) -> Self {
        Self {
            kind: config.palette,
            saturation: config.saturation,
            lightness: config.lightness,
        }
    }

    pub fn with_kind(self, kind: PaletteKind) -> Self {
        Self { kind, ..self }
    }

    /// Pick the color for a series.
    pub fn color_for(&self, column: &str) -> Hsl {
        let hue = match self.kind {
            PaletteKind::Random => rand::random_range(0.0..360.0),
            PaletteKind::Hashed => hashed_hue(column),
        };
        Hsl {
            hue,
            saturation: self.saturation,
            lightness: self.lightness,
        }
    }
}

/// Map a name onto the hue circle with 32-bit FNV-1a.
fn hashed_hue(name: &str) -> f64 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let hash = name
        .bytes()
        .fold(FNV_OFFSET, |acc, b| (acc ^ u32::from(b)).wrapping_mul(FNV_PRIME));
    f64::from(hash % 3600) / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_display_matches_css() {
        let c = Hsl {
            hue: 120.0,
            saturation: 70,
            lightness: 50,
        };
        assert_eq!(c.to_string(), "hsl(120.0, 70%, 50%)");
    }

    #[test]
    fn hsl_to_rgb_primaries() {
        let red = Hsl { hue: 0.0, saturation: 100, lightness: 50 };
        let green = Hsl { hue: 120.0, saturation: 100, lightness: 50 };
        let blue = Hsl { hue: 240.0, saturation: 100, lightness: 50 };
        assert_eq!(red.to_rgb(), (255, 0, 0));
        assert_eq!(green.to_rgb(), (0, 255, 0));
        assert_eq!(blue.to_rgb(), (0, 0, 255));
        assert_eq!(red.to_hex(), "#ff0000");
    }

    #[test]
    fn hsl_to_rgb_grey_when_unsaturated() {
        let grey = Hsl { hue: 200.0, saturation: 0, lightness: 50 };
        assert_eq!(grey.to_rgb(), (128, 128, 128));
    }

    #[test]
    fn random_palette_uses_fixed_saturation_and_lightness() {
        let palette = Palette::default();
        for _ in 0..50 {
            let c = palette.color_for("height");
            assert!((0.0..360.0).contains(&c.hue));
            assert_eq!(c.saturation, 70);
            assert_eq!(c.lightness, 50);
        }
    }

    #[test]
    fn hashed_palette_is_deterministic() {
        let palette = Palette::default().with_kind(PaletteKind::Hashed);
        assert_eq!(palette.color_for("height"), palette.color_for("height"));
        assert_ne!(palette.color_for("height"), palette.color_for("mass"));
        assert!((0.0..360.0).contains(&palette.color_for("x").hue));
    }

    #[test]
    fn palette_kind_parse() {
        assert_eq!(PaletteKind::parse("random"), Some(PaletteKind::Random));
        assert_eq!(PaletteKind::parse("Hashed"), Some(PaletteKind::Hashed));
        assert_eq!(PaletteKind::parse("stable"), Some(PaletteKind::Hashed));
        assert_eq!(PaletteKind::parse("rainbow"), None);
    }

    #[test]
    fn hsl_serializes_as_css_string() {
        let c = Hsl { hue: 10.0, saturation: 70, lightness: 50 };
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"hsl(10.0, 70%, 50%)\"");
    }
}
