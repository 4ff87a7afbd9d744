//! Packed RGBA colours and the colour specification parser.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use lazy_static::lazy_static;
use rgb::{RGB8, RGBA8};
use crate::error::{Error, Result};

/// A colour with 8 bits per channel (red, green, blue, alpha).
///
/// The packed `u32` form stores red in the low byte, so `0xff000000`
/// is opaque black.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colour(RGBA8);

impl Colour {
    pub const BLACK: Colour = Colour::new(0, 0, 0, 255);
    pub const WHITE: Colour = Colour::new(255, 255, 255, 255);
    /// Fully transparent black, returned when there is nothing to evaluate.
    pub const TRANSPARENT: Colour = Colour::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Colour(RGBA8 { r, g, b, a })
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Colour::new(r, g, b, 255) }

    #[inline]
    pub fn r(&self) -> u8 { self.0.r }
    #[inline]
    pub fn g(&self) -> u8 { self.0.g }
    #[inline]
    pub fn b(&self) -> u8 { self.0.b }
    #[inline]
    pub fn a(&self) -> u8 { self.0.a }

    /// The channels in the order red, green, blue, alpha.
    #[inline]
    pub fn channels(&self) -> [u8; 4] { [self.0.r, self.0.g, self.0.b, self.0.a] }

    #[inline]
    pub fn from_channels(c: [u8; 4]) -> Self { Colour::new(c[0], c[1], c[2], c[3]) }

    /// Create a colour from components in \[0, 1\].  Components are
    /// scaled by 255 and truncated.
    pub fn from_components(c: [f32; 4]) -> Self {
        let byte = |x: f32| (255. * x).clamp(0., 255.) as u8;
        Colour::new(byte(c[0]), byte(c[1]), byte(c[2]), byte(c[3]))
    }

    #[inline]
    pub const fn from_packed(v: u32) -> Self {
        let b = v.to_le_bytes();
        Colour::new(b[0], b[1], b[2], b[3])
    }

    #[inline]
    pub const fn to_packed(&self) -> u32 {
        u32::from_le_bytes([self.0.r, self.0.g, self.0.b, self.0.a])
    }

    /// Invert the red, green and blue channels, keeping alpha.
    #[inline]
    pub fn invert(&mut self) {
        self.0.r = 255 - self.0.r;
        self.0.g = 255 - self.0.g;
        self.0.b = 255 - self.0.b;
    }

    #[inline]
    pub fn inverted(mut self) -> Self { self.invert(); self }

    #[inline]
    pub fn is_opaque(&self) -> bool { self.0.a == 255 }
}

impl From<RGBA8> for Colour {
    #[inline]
    fn from(c: RGBA8) -> Self { Colour(c) }
}

impl From<RGB8> for Colour {
    #[inline]
    fn from(c: RGB8) -> Self { Colour::rgb(c.r, c.g, c.b) }
}

impl From<Colour> for RGBA8 {
    #[inline]
    fn from(c: Colour) -> Self { c.0 }
}

impl From<u32> for Colour {
    #[inline]
    fn from(v: u32) -> Self { Colour::from_packed(v) }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let RGBA8 { r, g, b, a } = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

lazy_static! {
    static ref NAMED: HashMap<&'static str, Colour> = {
        let named = [
            ("black", Colour::rgb(0, 0, 0)),
            ("white", Colour::rgb(255, 255, 255)),
            ("red", Colour::rgb(255, 0, 0)),
            ("green", Colour::rgb(0, 128, 0)),
            ("lime", Colour::rgb(0, 255, 0)),
            ("blue", Colour::rgb(0, 0, 255)),
            ("yellow", Colour::rgb(255, 255, 0)),
            ("cyan", Colour::rgb(0, 255, 255)),
            ("aqua", Colour::rgb(0, 255, 255)),
            ("magenta", Colour::rgb(255, 0, 255)),
            ("fuchsia", Colour::rgb(255, 0, 255)),
            ("grey", Colour::rgb(128, 128, 128)),
            ("gray", Colour::rgb(128, 128, 128)),
            ("lightgrey", Colour::rgb(211, 211, 211)),
            ("lightgray", Colour::rgb(211, 211, 211)),
            ("darkgrey", Colour::rgb(169, 169, 169)),
            ("darkgray", Colour::rgb(169, 169, 169)),
            ("silver", Colour::rgb(192, 192, 192)),
            ("orange", Colour::rgb(255, 165, 0)),
            ("purple", Colour::rgb(128, 0, 128)),
            ("brown", Colour::rgb(165, 42, 42)),
            ("pink", Colour::rgb(255, 192, 203)),
            ("navy", Colour::rgb(0, 0, 128)),
            ("teal", Colour::rgb(0, 128, 128)),
            ("olive", Colour::rgb(128, 128, 0)),
            ("maroon", Colour::rgb(128, 0, 0)),
            ("darkred", Colour::rgb(139, 0, 0)),
            ("darkgreen", Colour::rgb(0, 100, 0)),
            ("darkblue", Colour::rgb(0, 0, 139)),
            ("lightblue", Colour::rgb(173, 216, 230)),
            ("skyblue", Colour::rgb(135, 206, 235)),
            ("gold", Colour::rgb(255, 215, 0)),
            ("violet", Colour::rgb(238, 130, 238)),
            ("indigo", Colour::rgb(75, 0, 130)),
            ("transparent", Colour::TRANSPARENT),
        ];
        named.into_iter().collect()
    };
}

fn hex_byte(s: &str) -> Option<u8> { u8::from_str_radix(s, 16).ok() }

fn parse_hex(hex: &str) -> Option<Colour> {
    if !hex.is_ascii() { return None }
    match hex.len() {
        3 => {
            let mut c = [255; 4];
            for (i, ch) in hex.chars().enumerate() {
                let x = ch.to_digit(16)? as u8;
                c[i] = x * 17;
            }
            Some(Colour::from_channels(c))
        }
        6 | 8 => {
            let mut c = [255; 4];
            for i in 0 .. hex.len() / 2 {
                c[i] = hex_byte(&hex[2 * i .. 2 * i + 2])?;
            }
            Some(Colour::from_channels(c))
        }
        _ => None,
    }
}

/// A tuple component: unit fraction if written with a decimal point
/// and at most 1, byte value otherwise.
fn parse_component(s: &str) -> Option<u8> {
    let s = s.trim();
    let x: f64 = s.parse().ok()?;
    if !x.is_finite() { return None }
    if s.contains('.') && x <= 1. {
        Some((255. * x.max(0.)) as u8)
    } else {
        Some(x.clamp(0., 255.) as u8)
    }
}

fn parse_tuple(s: &str) -> Option<Colour> {
    let s = s.strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .map(|s| s.strip_suffix(')'))
        .unwrap_or(Some(s))?;
    let parts: Vec<_> = s.split(',').collect();
    if parts.len() != 3 && parts.len() != 4 { return None }
    let mut c = [255; 4];
    for (i, p) in parts.iter().enumerate() {
        c[i] = parse_component(p)?;
    }
    Some(Colour::from_channels(c))
}

impl FromStr for Colour {
    type Err = Error;

    /// Accepts named colours, `#RGB`, `#RRGGBB`, `#RRGGBBAA` and
    /// `r,g,b[,a]` tuples (optionally written `rgb(…)` or `rgba(…)`).
    ///
    /// # Example
    ///
    /// ```
    /// use colour_scale::Colour;
    /// let c: Colour = "#ff000080".parse().unwrap();
    /// assert_eq!(c, Colour::new(255, 0, 0, 128));
    /// assert_eq!("0,0,255".parse::<Colour>().unwrap(), Colour::rgb(0, 0, 255));
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim();
        let lower = spec.to_ascii_lowercase();
        let c = if let Some(hex) = lower.strip_prefix('#') {
            parse_hex(hex)
        } else if lower.contains(',') {
            parse_tuple(&lower)
        } else {
            NAMED.get(lower.as_str()).copied()
        };
        c.ok_or_else(|| Error::ParseColour(spec.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layout() {
        assert_eq!(Colour::from_packed(0xff000000), Colour::BLACK);
        assert_eq!(Colour::new(1, 2, 3, 4).to_packed(), 0x04030201);
    }

    #[test]
    fn invert_keeps_alpha() {
        let c = Colour::new(0x66, 0x66, 0x66, 0xff).inverted();
        assert_eq!(c, Colour::new(0x99, 0x99, 0x99, 0xff));
    }

    #[test]
    fn parse_specs() {
        let cases = [("red", Colour::rgb(255, 0, 0)),
                     ("  White ", Colour::WHITE),
                     ("#00ff00", Colour::rgb(0, 255, 0)),
                     ("#0F0", Colour::rgb(0, 255, 0)),
                     ("#11223344", Colour::new(0x11, 0x22, 0x33, 0x44)),
                     ("10,20,30", Colour::rgb(10, 20, 30)),
                     ("rgba(255,0,0,0.5)", Colour::new(255, 0, 0, 127)),
                     ("1.0,0.0,0.0", Colour::rgb(255, 0, 0)),
                     ("300,0,0,0", Colour::new(255, 0, 0, 0))];
        for (s, c) in cases {
            let p: Colour = s.parse().unwrap();
            assert_eq!(p, c, "parsing “{}”", s);
        }
    }

    #[test]
    fn parse_rejects() {
        for s in ["", "nocolour", "#12", "#zzzzzz", "1,2", "1,2,3,4,5", "rgb(1,2,3"] {
            assert!(s.parse::<Colour>().is_err(), "“{}” accepted", s);
        }
    }

    #[test]
    fn display_hex() {
        assert_eq!(Colour::new(255, 0, 16, 255).to_string(), "#ff0010ff");
    }
}
