use std::fmt;

/// RGBA color representation.
///
/// Channels are 0-255. `explicit_alpha` records whether an alpha value was
/// set by a color modifier; it decides between 6- and 8-digit hex output.
///
/// # Examples
///
/// ```rust
/// use pptx_cascade::common::Rgba;
///
/// let red = Rgba::rgb(255, 0, 0);
/// assert_eq!(red.to_hex(), "FF0000");
///
/// let blue = Rgba::from_hex("#0000FF").unwrap();
/// assert_eq!(blue.b, 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255, 255 is opaque)
    pub a: u8,
    /// Whether the alpha channel was set explicitly
    pub explicit_alpha: bool,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Create an opaque color without an explicit alpha channel.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: 255,
            explicit_alpha: false,
        }
    }

    /// Create a color with an explicit alpha channel.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
            explicit_alpha: true,
        }
    }

    /// Parse a `RRGGBB` or `RRGGBBAA` hex string, with or without a `#` prefix.
    ///
    /// Returns `None` for anything else; malformed values are treated as
    /// absent by every caller.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Convert to hex string (without `#` prefix).
    ///
    /// Eight digits are produced only when the alpha channel is explicit.
    pub fn to_hex(&self) -> String {
        if self.explicit_alpha {
            format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        } else {
            format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        }
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[inline]
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Convert to floating-point HSLA.
    #[allow(clippy::many_single_char_names)]
    pub fn to_hsla(&self) -> Hsla {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let a = self.alpha();

        let d = max - min;
        if d.abs() < f64::EPSILON {
            return Hsla { h: 0.0, s: 0.0, l, a };
        }

        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsla {
            h: (h * 60.0).rem_euclid(360.0),
            s,
            l,
            a,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Floating-point HSLA color.
///
/// `h` is in degrees `[0, 360)`; `s`, `l` and `a` are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    /// Convert back to 8-bit RGBA.
    ///
    /// Saturation, lightness and alpha are clamped into `[0, 1]` first.
    pub fn to_rgba(&self, explicit_alpha: bool) -> Rgba {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let (r, g, b) = if s <= 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        Rgba {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
            a: to_byte(self.a.clamp(0.0, 1.0)),
            explicit_alpha,
        }
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
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
}

#[inline]
fn to_byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
