//! Resolution of control-point positions against a data range.

use crate::{ControlPoint, Scale};
use crate::error::{Error, Result};

/// The data range a colour map was last calibrated to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub minimum: f64,
    pub maximum: f64,
    pub scale: Scale,
    /// `scale.apply(maximum) - scale.apply(minimum)`.
    pub range: f64,
    /// `1 / range`, infinite for a degenerate range.
    pub inverse_range: f64,
}

impl Default for Calibration {
    fn default() -> Self { Calibration::new(0., 1., Scale::Linear) }
}

impl Calibration {
    /// Calibration over `[min, max]`.  An infinite bound (`HUGE_VAL`)
    /// is replaced by the other one, giving a single-value range.
    pub fn new(mut min: f64, mut max: f64, scale: Scale) -> Self {
        if min == f64::INFINITY { min = max }
        if max == f64::INFINITY { max = min }
        let range = scale.apply(max) - scale.apply(min);
        Calibration { minimum: min, maximum: max, scale, range,
                      inverse_range: 1. / range }
    }

    #[inline]
    pub fn position(&self, value: f64) -> f64 {
        self.scale.to_position01(value, self.minimum, self.maximum)
    }

    /// Data value of sample `i` out of `n` evenly spaced in scale
    /// space, from `minimum` (`i = 0`) to `maximum` (`i = n - 1`).
    #[inline]
    pub fn sample_value(&self, i: usize, n: usize) -> f64 {
        let last = (n - 1) as f64;
        match self.scale {
            Scale::Linear => self.minimum + self.range * i as f64 / last,
            Scale::Log => self.scale.unapply(
                self.scale.apply(self.minimum) + self.range * i as f64 / last),
        }
    }
}

/// Assign the position of every control point for `cal`.
///
/// In value mode the end points are pinned to the range (value `min` at
/// position 0, `max` at 1), stops with a value are scaled and runs of
/// stops without one are spread evenly between their neighbours.
/// Values are expected in increasing order; they are not sorted.
///
/// With explicit positions nothing moves, but positions that do not
/// span \[0, 1\] are reported since they cannot bracket every colour.
pub fn resolve_positions(points: &mut [ControlPoint], cal: &Calibration,
                         explicit_positions: bool) -> Result<()> {
    let n = points.len();
    if n == 0 { return Ok(()) }
    if explicit_positions {
        let first = points[0].position;
        let last = points[n - 1].position;
        if first > 0. || last < 1. {
            let position = if first > 0. { 0. } else { 1. };
            return Err(Error::PositionOutOfRange { position, first, last })
        }
        return Ok(())
    }

    points[0].value = Some(cal.minimum);
    points[0].position = 0.;
    points[n - 1].value = Some(cal.maximum);
    points[n - 1].position = 1.;

    let mut i = 1;
    while i + 1 < n {
        match points[i].value {
            Some(v) => {
                points[i].position = cal.position(v);
                i += 1;
            }
            None => {
                // The last point always has a value, so `j < n`.
                let j = (i + 1 .. n).find(|&j| points[j].value.is_some())
                    .unwrap_or(n - 1);
                if j < n - 1 {
                    if let Some(v) = points[j].value {
                        points[j].position = cal.position(v);
                    }
                }
                let inc = (points[j].position - points[i - 1].position)
                    / (j - i + 1) as f64;
                for k in i .. j {
                    points[k].position = points[k - 1].position + inc;
                }
                i = j + 1;
            }
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Colour;

    fn points(values: &[Option<f64>]) -> Vec<ControlPoint> {
        values.iter().map(|&v| ControlPoint { colour: Colour::BLACK,
                                              value: v, position: 0. })
            .collect()
    }

    fn positions(p: &[ControlPoint]) -> Vec<f64> {
        p.iter().map(|c| c.position).collect()
    }

    #[test]
    fn huge_val_uses_other_bound() {
        let c = Calibration::new(f64::INFINITY, 3., Scale::Linear);
        assert_eq!((c.minimum, c.maximum), (3., 3.));
        let c = Calibration::new(2., f64::INFINITY, Scale::Linear);
        assert_eq!((c.minimum, c.maximum), (2., 2.));
        assert_eq!(c.range, 0.);
        assert!(c.inverse_range.is_infinite());
    }

    #[test]
    fn ends_pinned() {
        let mut p = points(&[Some(4.), Some(5.), Some(99.)]);
        let cal = Calibration::new(0., 10., Scale::Linear);
        resolve_positions(&mut p, &cal, false).unwrap();
        assert_eq!(positions(&p), vec![0., 0.5, 1.]);
        assert_eq!(p[0].value, Some(0.));
        assert_eq!(p[2].value, Some(10.));
    }

    #[test]
    fn values_at_bounds_clamp() {
        let mut p = points(&[None, Some(0.), None, Some(10.), None]);
        let cal = Calibration::new(0., 10., Scale::Linear);
        resolve_positions(&mut p, &cal, false).unwrap();
        assert_eq!(positions(&p), vec![0., 0., 0.5, 1., 1.]);
        for w in p.windows(2) {
            assert!(w[0].position <= w[1].position, "{:?}", positions(&p));
        }
    }

    #[test]
    fn gap_between_values() {
        let mut p = points(&[None, Some(2.), None, None, None, Some(6.), None]);
        let cal = Calibration::new(0., 10., Scale::Linear);
        resolve_positions(&mut p, &cal, false).unwrap();
        let expected = [0., 0.2, 0.3, 0.4, 0.5, 0.6, 1.];
        for (x, e) in positions(&p).iter().zip(expected) {
            assert!((x - e).abs() < 1e-12, "{:?} ≉ {:?}", positions(&p), expected);
        }
    }

    #[test]
    fn gap_run_to_end() {
        let mut p = points(&[None, None, None, None, None]);
        let cal = Calibration::new(-1., 1., Scale::Linear);
        resolve_positions(&mut p, &cal, false).unwrap();
        let expected = [0., 0.25, 0.5, 0.75, 1.];
        for (x, e) in positions(&p).iter().zip(expected) {
            assert!((x - e).abs() < 1e-12, "{:?}", positions(&p));
        }
    }

    #[test]
    fn log_positions() {
        let mut p = points(&[None, Some(10.), Some(100.), None]);
        let cal = Calibration::new(1., 1000., Scale::Log);
        resolve_positions(&mut p, &cal, false).unwrap();
        let expected = [0., 1. / 3., 2. / 3., 1.];
        for (x, e) in positions(&p).iter().zip(expected) {
            assert!((x - e).abs() < 1e-12, "{:?}", positions(&p));
        }
    }

    #[test]
    fn explicit_untouched() {
        let mut p = vec![ControlPoint::at(Colour::BLACK, 0.),
                         ControlPoint::at(Colour::WHITE, 0.3),
                         ControlPoint::at(Colour::BLACK, 1.)];
        let cal = Calibration::new(-50., 50., Scale::Linear);
        resolve_positions(&mut p, &cal, true).unwrap();
        assert_eq!(positions(&p), vec![0., 0.3, 1.]);
    }

    #[test]
    fn explicit_not_spanning() {
        let mut p = vec![ControlPoint::at(Colour::BLACK, 0.2),
                         ControlPoint::at(Colour::WHITE, 1.)];
        let cal = Calibration::default();
        match resolve_positions(&mut p, &cal, true) {
            Err(Error::PositionOutOfRange { first, last, .. }) => {
                assert_eq!((first, last), (0.2, 1.));
            }
            r => panic!("unexpected {:?}", r),
        }
    }

    #[test]
    fn sample_grid() {
        let c = Calibration::new(1., 100., Scale::Log);
        assert!((c.sample_value(2, 5) - 10.).abs() < 1e-9);
        assert!((c.sample_value(4, 5) - 100.).abs() < 1e-9);
        let c = Calibration::new(2., 4., Scale::Linear);
        assert_eq!(c.sample_value(0, 3), 2.);
        assert_eq!(c.sample_value(1, 3), 3.);
    }
}
