//! Minimal RGB color handling for palette hex strings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }

    /// Parse, logging and falling back to black on bad palette entries
    pub fn from_hex_or_black(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|| {
            log::warn!("Bad palette color {:?}", hex);
            Self::BLACK
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Raise HSL saturation by `amount_pct` percentage points
    pub fn saturate(&self, amount_pct: f32) -> Rgb {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, (s + amount_pct / 100.0).clamp(0.0, 1.0), l)
    }

    /// Hue, saturation and lightness, all in [0, 1]
    fn to_hsl(&self) -> (f32, f32, f32) {
        let (r, g, b) = (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    fn from_hsl(h: f32, s: f32, l: f32) -> Rgb {
        let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        if s == 0.0 {
            let v = channel(l);
            return Rgb::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hue = |t: f32| {
            let t = t.rem_euclid(1.0);
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };
        Rgb::new(
            channel(hue(h + 1.0 / 3.0)),
            channel(hue(h)),
            channel(hue(h - 1.0 / 3.0)),
        )
    }

    /// Blend toward `overlay`; `opacity` 1.0 gives `overlay`
    pub fn overlay(&self, overlay: Rgb, opacity: f32) -> Rgb {
        let opacity = opacity.clamp(0.0, 1.0);
        let mix = |base: u8, top: u8| {
            (opacity * top as f32 + (1.0 - opacity) * base as f32).floor() as u8
        };
        Rgb::new(
            mix(self.r, overlay.r),
            mix(self.g, overlay.g),
            mix(self.b, overlay.b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FFC000"), Some(Rgb::new(0xFF, 0xC0, 0x00)));
        assert_eq!(Rgb::from_hex("4472c4"), Some(Rgb::new(0x44, 0x72, 0xC4)));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#GG0000"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#ÿÿÿ"), None);
        assert_eq!(Rgb::from_hex("+FF000"), None);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgb::new(0xBF, 0x90, 0x00).to_hex(), "#BF9000");
    }

    #[test]
    fn test_overlay() {
        let base = Rgb::new(0, 0, 0);
        let top = Rgb::new(200, 100, 40);
        assert_eq!(base.overlay(top, 0.75), Rgb::new(150, 75, 30));
        assert_eq!(base.overlay(top, 1.0), top);
        assert_eq!(base.overlay(top, 0.0), base);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(Rgb::new(0x44, 0x72, 0xC4).saturate(50.0), Rgb::new(9, 97, 255));
        // Already fully saturated
        assert_eq!(Rgb::new(0xBF, 0x90, 0x00).saturate(50.0), Rgb::new(0xBF, 0x90, 0x00));
        // Grays have no hue to push
        assert_eq!(Rgb::new(0x80, 0x80, 0x80).saturate(0.0), Rgb::new(0x80, 0x80, 0x80));
    }
}
