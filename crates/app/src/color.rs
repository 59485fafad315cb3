//! Hex color helpers used for hover and pulse effects

use std::fmt;
use std::str::FromStr;

use egui::Color32;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color {0:?} does not start with '#'")]
    MissingHash(String),
    #[error("color {0:?} is not six hex digits")]
    BadLength(String),
    #[error("color {0:?} contains a non-hex digit")]
    BadDigit(String),
}

/// 8-bit RGB triplet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color32 {
    fn from(rgb: Rgb) -> Self {
        Color32::from_rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// Add `amount` to every channel, saturating at 0 and 255.
///
/// Input that is not `#RRGGBB` is returned unchanged.
pub fn lighten(color: &str, amount: i32) -> String {
    let Ok(rgb) = color.parse::<Rgb>() else {
        return color.to_string();
    };
    let shift = |c: u8| (i32::from(c) + amount).clamp(0, 255) as u8;
    Rgb {
        r: shift(rgb.r),
        g: shift(rgb.g),
        b: shift(rgb.b),
    }
    .to_string()
}

/// Mix `color1` over `color2`: `alpha = 1` yields `color1`, `alpha = 0` yields `color2`.
///
/// Alpha is clamped to [0, 1] and channels are truncated toward zero. If
/// either input is malformed `color1` is returned unchanged.
pub fn blend(color1: &str, color2: &str, alpha: f64) -> String {
    let (Ok(a), Ok(b)) = (color1.parse::<Rgb>(), color2.parse::<Rgb>()) else {
        return color1.to_string();
    };
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |c1: u8, c2: u8| (f64::from(c1) * alpha + f64::from(c2) * (1.0 - alpha)) as u8;
    Rgb {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
    .to_string()
}

pub fn to_color32(color: &str) -> Option<Color32> {
    color.parse::<Rgb>().ok().map(Color32::from)
}
