//! Conversion between data values and positions in \[0, 1\].

/// Inputs at or below this floor are substituted by it before taking
/// the logarithm, so the log scale never produces `-∞` or NaN.
pub const SAFE_LOG_FLOOR: f64 = f64::MIN_POSITIVE;

/// Base 10 logarithm of `x`, with `x` raised to [`SAFE_LOG_FLOOR`]
/// when smaller (NaN included).
#[inline]
pub fn safe_log10(x: f64) -> f64 {
    if x > SAFE_LOG_FLOOR { x.log10() } else { SAFE_LOG_FLOOR.log10() }
}

/// How data values are laid out along a colour scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scale {
    #[default]
    Linear,
    /// Logarithmic (base 10) scale.  Non-positive values are clamped
    /// by [`safe_log10`].
    Log,
}

impl Scale {
    pub fn new(log: bool) -> Self { if log { Scale::Log } else { Scale::Linear } }

    pub fn is_log(self) -> bool { matches!(self, Scale::Log) }

    /// Map `x` to the coordinate in which the scale is linear.
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Scale::Linear => x,
            Scale::Log => safe_log10(x),
        }
    }

    /// Inverse of [`Scale::apply`].
    #[inline]
    pub fn unapply(self, y: f64) -> f64 {
        match self {
            Scale::Linear => y,
            Scale::Log => 10f64.powf(y),
        }
    }

    /// Position of `value` in \[0, 1\] relative to `[min, max]`.
    ///
    /// Values outside the range are clamped.  A degenerate range
    /// (`min == max`) maps every value to the centre `0.5`.
    ///
    /// # Example
    ///
    /// ```
    /// use colour_scale::Scale;
    /// assert_eq!(Scale::Linear.to_position01(2.5, 0., 10.), 0.25);
    /// assert_eq!(Scale::Log.to_position01(10., 1., 100.), 0.5);
    /// assert_eq!(Scale::Linear.to_position01(7., 5., 5.), 0.5);
    /// ```
    pub fn to_position01(self, value: f64, min: f64, max: f64) -> f64 {
        if max == min { return 0.5 }
        if value <= min { return 0. }
        if value >= max { return 1. }
        let (v, min, max) = (self.apply(value), self.apply(min), self.apply(max));
        (v - min) / (max - min)
    }
}
