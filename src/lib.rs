//! Calibrated colour maps for scalar fields.
//!
//! A [`ColourMap`] is an ordered list of [`ControlPoint`]s, each
//! anchored either by a data value or by an explicit position in
//! \[0, 1\].  [`ColourMap::calibrate`] resolves the positions against a
//! data range (linear or logarithmic, see [`Scale`]) and fills a
//! [`LookupTable`].  Colours are then obtained with
//!
//! - [`ColourMap::evaluate`], the exact path;
//! - [`ColourMap::fast_evaluate`], a table lookup for per-vertex loops.
//!
//! Maps are usually built from property text:
//!
//! ```
//! use colour_scale::{Colour, ColourMap};
//! let mut map = ColourMap::from_properties(
//!     "temperature", "colours=blue (0)white red\ndiscrete=false").unwrap();
//! map.calibrate(-10., 30.).unwrap();
//! assert_eq!(map.evaluate(-10.), Colour::rgb(0, 0, 255));
//! assert_eq!(map.evaluate(0.), Colour::WHITE);
//! assert_eq!(map.fast_evaluate(100.), Colour::rgb(255, 0, 0));
//! ```

mod calibrate;
mod colour;
mod colourmap;
mod control;
mod error;
mod evaluate;
mod properties;
mod scale;

pub use calibrate::{resolve_positions, Calibration};
pub use colour::Colour;
pub use colourmap::{ColourMap, DataRange};
pub use control::ControlPoint;
pub use error::{Error, Result};
pub use evaluate::{exact_evaluate, LookupTable, DEFAULT_SAMPLES};
pub use properties::Properties;
pub use scale::{safe_log10, Scale, SAFE_LOG_FLOOR};

/// A “continuous” range of colours parametrized by reals in \[0, 1\].
pub trait ColourRange {
    /// Returns the colour corresponding to `t` ∈ \[0., 1.\].
    fn colour(&self, t: f64) -> Colour;

    /// Return an iterator yielding the colours of `n` evenly spaced
    /// parameters, from `t = 0` to `t = 1` (both included).
    fn samples(self, n: usize) -> Samples<Self>
    where Self: Sized {
        if n == 0 {
            Samples { range: self, flast: 0., last: 0, i: 1, j: 0 } // Empty iterator
        } else {
            Samples { range: self, flast: (n - 1) as f64, last: n - 1, i: 0, j: n - 1 }
        }
    }
}

impl<R: ColourRange + ?Sized> ColourRange for &R {
    #[inline]
    fn colour(&self, t: f64) -> Colour { (**self).colour(t) }
}

/// An iterator yielding evenly spaced colours of a range.
///
/// Created by [`ColourRange::samples`].
pub struct Samples<R> {
    range: R,
    flast: f64, // `last` as a floating-point number
    last: usize,
    i: usize, // first position to be consumed (i ≤ j)
    j: usize, // last position to be consumed
}

impl<R: ColourRange> Samples<R> {
    /// Colour of the position `k` (assuming it is in `0 ..= self.last`).
    fn colour_at(&self, k: usize) -> Colour {
        if k == 0 {
            self.range.colour(0.)
        } else if k == self.last {
            self.range.colour(1.)
        } else {
            self.range.colour(k as f64 / self.flast)
        }
    }

    fn remaining(&self) -> usize {
        if self.i > self.j { 0 } else { self.j - self.i + 1 }
    }
}

impl<R: ColourRange> Iterator for Samples<R> {
    type Item = Colour;

    fn next(&mut self) -> Option<Colour> {
        if self.i <= self.j {
            let c = self.colour_at(self.i);
            self.i += 1;
            Some(c)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining();
        (len, Some(len))
    }
}

impl<R: ColourRange> ExactSizeIterator for Samples<R> {
    fn len(&self) -> usize { self.remaining() }
}

impl<R: ColourRange> DoubleEndedIterator for Samples<R> {
    fn next_back(&mut self) -> Option<Colour> {
        if self.i <= self.j {
            let c = self.colour_at(self.j);
            if self.j == 0 {
                self.i = 1
            } else {
                self.j -= 1;
            }
            Some(c)
        } else {
            None
        }
    }
}
