use std::fmt;

/// Stable per-collection color derived from the identifier alone, so the
/// same collection keeps its color across all four charts and across runs
/// without any lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

impl Hsl {
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = f64::from(self.hue) % 360.0;
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        (
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        )
    }
}

/// 32-bit wrapping fold over UTF-16 code units: `code + (acc << 5) - acc`.
fn hash_identifier(identifier: &str) -> i32 {
    identifier.encode_utf16().fold(0i32, |acc, code| {
        i32::from(code).wrapping_add(acc.wrapping_shl(5).wrapping_sub(acc))
    })
}

/// Hue spread over the full wheel, fixed saturation, lightness nudged by the
/// hash so collections with close hues still separate slightly.
pub fn distinct_color(identifier: &str) -> Hsl {
    let hash = hash_identifier(identifier);
    Hsl {
        hue: (hash.unsigned_abs() % 360) as u16,
        saturation: 80,
        lightness: (50 + hash.unsigned_abs() % 20) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_is_deterministic() {
        let first = distinct_color("TCGA-BRCA");
        let second = distinct_color("TCGA-BRCA");
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn different_identifiers_get_different_hues() {
        let brca = distinct_color("TCGA-BRCA");
        let luad = distinct_color("TCGA-LUAD");
        assert_ne!(brca.hue, luad.hue);
    }

    #[test]
    fn color_components_stay_in_range() {
        for identifier in ["TCGA-BRCA", "TCGA-OV", "x", ""] {
            let color = distinct_color(identifier);
            assert!(color.hue < 360);
            assert_eq!(color.saturation, 80);
            assert!((50..70).contains(&color.lightness));
        }
    }

    #[test]
    fn hsl_to_rgb_primaries() {
        let red = Hsl {
            hue: 0,
            saturation: 100,
            lightness: 50,
        };
        assert_eq!(red.to_rgb(), (255, 0, 0));

        let green = Hsl {
            hue: 120,
            saturation: 100,
            lightness: 50,
        };
        assert_eq!(green.to_rgb(), (0, 255, 0));

        let gray = Hsl {
            hue: 200,
            saturation: 0,
            lightness: 50,
        };
        assert_eq!(gray.to_rgb(), (128, 128, 128));
    }
}
