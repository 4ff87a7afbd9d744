//! Colour map configuration read from `key=value` property text.

use serde::Deserialize;
use serde_json::{Map, Value};
use crate::error::Result;

/// The properties a colour map reads.  Flags are consulted at
/// calibration (`logscale`, `locked`) or evaluation (`discrete`) time.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Properties {
    /// Control points, in either of the formats accepted by
    /// [`ColourMap::load_palette`](crate::ColourMap::load_palette).
    pub colours: Option<String>,
    pub logscale: bool,
    /// A locked map ignores calibration requests.
    pub locked: bool,
    /// Stepped colours instead of blended gradients.
    pub discrete: bool,
    /// Fixed calibration range overriding the data range.
    pub range: Option<[f64; 2]>,
    /// Colour shown behind a partially transparent map.
    pub background: Option<String>,
}

impl Properties {
    /// Parse one `key=value` property per line.
    ///
    /// Keys are case-insensitive.  `true`/`false` (any case) are
    /// booleans, other values are read as JSON and, failing that, as
    /// strings.  Lines without a value and unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use colour_scale::Properties;
    /// let p = Properties::parse("logScale=True\nrange=[1, 1000]\n\
    ///                            colours=red white blue").unwrap();
    /// assert!(p.logscale);
    /// assert_eq!(p.fixed_range(), Some((1., 1000.)));
    /// assert_eq!(p.colours.as_deref(), Some("red white blue"));
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut data = Map::new();
        for line in text.lines() {
            let (key, value) = match line.split_once('=') {
                Some((k, v)) if !v.is_empty() => (k.trim(), v),
                _ => continue };
            let v = match value.trim().to_ascii_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => serde_json::from_str(value)
                    .unwrap_or_else(|_| Value::String(value.to_string())),
            };
            data.insert(key.to_ascii_lowercase(), v);
        }
        Ok(serde_json::from_value(Value::Object(data))?)
    }

    /// The fixed calibration range, if set and valid (`low < high`).
    pub fn fixed_range(&self) -> Option<(f64, f64)> {
        match self.range {
            Some([low, high]) if low < high => Some((low, high)),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = Properties::parse("").unwrap();
        assert_eq!(p, Properties::default());
        assert!(!p.locked && !p.discrete && !p.logscale);
    }

    #[test]
    fn flags_and_unknown_keys() {
        let p = Properties::parse("LOCKED=true\ndiscrete=FALSE\nopacity=0.5\nnovalue=").unwrap();
        assert!(p.locked);
        assert!(!p.discrete);
    }

    #[test]
    fn palette_value_keeps_equals() {
        let p = Properties::parse("colours=0=red;1=blue").unwrap();
        assert_eq!(p.colours.as_deref(), Some("0=red;1=blue"));
    }

    #[test]
    fn invalid_range_ignored() {
        let p = Properties::parse("range=[5, 1]").unwrap();
        assert_eq!(p.range, Some([5., 1.]));
        assert_eq!(p.fixed_range(), None);
    }

    #[test]
    fn type_mismatch() {
        assert!(Properties::parse("logscale=[1, 2]").is_err());
    }
}
