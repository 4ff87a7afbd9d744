use std::fmt;
use crate::Colour;

/// One stop of a colour scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub colour: Colour,
    /// Data value anchoring this stop.  `None` for stops placed by
    /// position, or spread evenly between their valued neighbours.
    pub value: Option<f64>,
    /// Location on the normalized scale, authoritative after calibration.
    pub position: f64,
}

impl ControlPoint {
    /// A stop without a value, positioned by calibration.
    pub fn new(colour: Colour) -> Self {
        ControlPoint { colour, value: None, position: 0. }
    }

    pub fn with_value(colour: Colour, value: f64) -> Self {
        ControlPoint { colour, value: Some(value), position: 0. }
    }

    pub fn at(colour: Colour, position: f64) -> Self {
        ControlPoint { colour, value: None, position }
    }
}

impl fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{v}")?,
            None => f.write_str("-")?,
        }
        write!(f, " --> {}={}", self.position, self.colour)
    }
}
