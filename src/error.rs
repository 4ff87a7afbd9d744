use thiserror::Error;

/// Errors raised while configuring or calibrating a colour map.
#[derive(Debug, Error)]
pub enum Error {
    /// The colour specification could not be understood.
    #[error("not a colour: “{0}”")]
    ParseColour(String),

    /// A scaled position is not bracketed by the control points.  This
    /// means the positions do not span \[0, 1\].
    #[error("colour position {position} not in range [{first}, {last}]")]
    PositionOutOfRange { position: f64, first: f64, last: f64 },

    /// A lookup table needs at least two samples.
    #[error("lookup table needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("invalid colour map properties: {0}")]
    Properties(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
