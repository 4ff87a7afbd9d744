//! Colour evaluation: the exact bracketing search and the sampled
//! lookup table used on hot paths.

use crate::{Calibration, Colour, ControlPoint, Scale};
use crate::error::{Error, Result};

/// Number of lookup table entries used unless configured otherwise.
pub const DEFAULT_SAMPLES: usize = 4096;

/// Colour at the scaled position `t` of the resolved control `points`.
///
/// `t ≥ 1` gives the last colour; a position within `f64::EPSILON` of
/// a stop gives that stop's colour.  Otherwise the two bracketing
/// stops are blended per channel (alpha included) or, if `discrete`,
/// the nearer one is chosen (ties go to the upper stop).  Negative or
/// NaN positions and an empty list give [`Colour::TRANSPARENT`].
///
/// An error means `points` do not bracket `t`, i.e. their positions
/// do not start at 0.
pub fn exact_evaluate(points: &[ControlPoint], t: f64, discrete: bool)
                      -> Result<Colour> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(Colour::TRANSPARENT) };
    if t >= 1. { return Ok(last.colour) }
    if !(t >= 0.) { return Ok(Colour::TRANSPARENT) }

    let mut i = 0;
    while i < points.len() {
        let p = &points[i];
        if (p.position - t).abs() <= f64::EPSILON { return Ok(p.colour) }
        if p.position > t { break }
        i += 1;
    }
    if i == 0 || i == points.len() {
        return Err(Error::PositionOutOfRange {
            position: t, first: first.position, last: last.position })
    }

    let (c0, c1) = (&points[i - 1], &points[i]);
    let f = (t - c0.position) / (c1.position - c0.position);
    if discrete {
        Ok(if f < 0.5 { c0.colour } else { c1.colour })
    } else {
        Ok(lerp(c0.colour, c1.colour, f))
    }
}

/// Per-channel linear interpolation, truncated to bytes.
#[inline]
fn lerp(c0: Colour, c1: Colour, f: f64) -> Colour {
    let (a, b) = (c0.channels(), c1.channels());
    let mut c = [0; 4];
    for k in 0 .. 4 {
        let (x0, x1) = (a[k] as f64, b[k] as f64);
        c[k] = (x0 + (x1 - x0) * f) as u8;
    }
    Colour::from_channels(c)
}

/// Colours sampled on a uniform grid of the calibrated range (uniform
/// in log space for log scales).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupTable {
    colours: Box<[Colour]>, // Invariant: length ≥ 2
}

impl LookupTable {
    /// A table of `samples` transparent entries.
    pub fn new(samples: usize) -> Result<Self> {
        if samples < 2 { return Err(Error::TooFewSamples(samples)) }
        Ok(LookupTable { colours: vec![Colour::TRANSPARENT; samples].into() })
    }

    #[inline]
    pub fn len(&self) -> usize { self.colours.len() }

    /// Always `false`: a table holds at least two samples.
    #[inline]
    pub fn is_empty(&self) -> bool { false }

    #[inline]
    pub fn as_slice(&self) -> &[Colour] { &self.colours }

    #[inline]
    pub fn get(&self, i: usize) -> Option<Colour> { self.colours.get(i).copied() }

    /// Refill from `colour`, called with the data value of every sample
    /// of `cal`.  The new table replaces the old one in a single move.
    pub fn rebuild(&mut self, cal: &Calibration, colour: impl Fn(f64) -> Colour) {
        let n = self.colours.len();
        let fresh: Box<[Colour]> = (0 .. n)
            .map(|i| colour(cal.sample_value(i, n)))
            .collect();
        self.colours = fresh;
    }

    /// Table index for `value`, truncated and clamped to the table.
    ///
    /// On a proper linear range the index is that of the last sample of
    /// `cal` at or below `value`, so the data value of sample `i` reads
    /// entry `i` back.  Log scales use the product alone.
    #[inline]
    pub fn index(&self, cal: &Calibration, value: f64) -> usize {
        let n = self.colours.len();
        let last = n - 1;
        let offset = cal.scale.apply(value) - cal.scale.apply(cal.minimum);
        // Float to int casts saturate and send NaN to 0.
        let c = (last as f64 * cal.inverse_range * offset) as isize;
        let mut c = c.clamp(0, last as isize) as usize;
        // The product may round to either side of a sample.
        if cal.scale == Scale::Linear && cal.range > 0. {
            if value >= cal.maximum {
                c = last
            } else if c < last && cal.sample_value(c + 1, n) <= value {
                c += 1
            } else if c > 0 && cal.sample_value(c, n) > value {
                c -= 1
            }
        }
        c
    }

    #[inline]
    pub fn lookup(&self, cal: &Calibration, value: f64) -> Colour {
        self.colours[self.index(cal, value)]
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        LookupTable { colours: vec![Colour::TRANSPARENT; DEFAULT_SAMPLES].into() }
    }
}

impl AsRef<[Colour]> for LookupTable {
    fn as_ref(&self) -> &[Colour] { &self.colours }
}
