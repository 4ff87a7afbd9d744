use std::fmt;
use log::{debug, trace, warn};
use crate::{exact_evaluate, resolve_positions, Calibration, Colour, ColourRange,
            ControlPoint, LookupTable, Properties, Scale};
use crate::error::Result;

/// Anything that knows the extent of the data to be coloured.
pub trait DataRange {
    fn minimum(&self) -> f64;
    fn maximum(&self) -> f64;
}

impl DataRange for (f64, f64) {
    fn minimum(&self) -> f64 { self.0 }
    fn maximum(&self) -> f64 { self.1 }
}

impl DataRange for std::ops::RangeInclusive<f64> {
    fn minimum(&self) -> f64 { *self.start() }
    fn maximum(&self) -> f64 { *self.end() }
}

/// A colour scale: control points, the calibration they were resolved
/// against and the lookup table sampled from them.
///
/// Control points are kept in insertion order, which is their
/// left-to-right order on the scale.  In value mode their values must
/// increase along the list; they are never reordered.  The first call
/// to [`ColourMap::add_position`] switches the whole map to explicit
/// positions, which calibration leaves untouched.
#[derive(Clone, Debug)]
pub struct ColourMap {
    name: String,
    points: Vec<ControlPoint>,
    explicit_positions: bool,
    properties: Properties,
    calibration: Calibration,
    calibrated: bool,
    opaque: bool,
    background: Colour,
    table: LookupTable,
}

impl ColourMap {
    /// An empty map with a lookup table of [`DEFAULT_SAMPLES`](crate::DEFAULT_SAMPLES).
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_table(name.into(), LookupTable::default())
    }

    /// An empty map whose lookup table has `samples` entries (at least 2).
    pub fn with_samples(name: impl Into<String>, samples: usize) -> Result<Self> {
        Ok(Self::with_table(name.into(), LookupTable::new(samples)?))
    }

    fn with_table(name: String, table: LookupTable) -> Self {
        ColourMap { name, points: vec![], explicit_positions: false,
                    properties: Properties::default(),
                    calibration: Calibration::default(), calibrated: false,
                    opaque: true, background: Colour::BLACK, table }
    }

    /// A map configured by `key=value` property lines (see
    /// [`Properties::parse`]).  The `colours` property, if any, is
    /// loaded with [`ColourMap::load_palette`].
    pub fn from_properties(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut map = ColourMap::new(name);
        map.properties = Properties::parse(text)?;
        if let Some(spec) = map.properties.background.clone() {
            match spec.parse() {
                Ok(c) => map.background = c,
                Err(e) => warn!("colour map {}: background ignored, {e}", map.name),
            }
        }
        if let Some(colours) = map.properties.colours.clone() {
            map.load_palette(&colours);
        }
        Ok(map)
    }

    pub fn name(&self) -> &str { &self.name }

    /// The control points, with positions resolved by the last calibration.
    pub fn control_points(&self) -> &[ControlPoint] { &self.points }

    pub fn len(&self) -> usize { self.points.len() }

    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Whether the control points carry explicit positions.
    pub fn uses_explicit_positions(&self) -> bool { self.explicit_positions }

    pub fn properties(&self) -> &Properties { &self.properties }

    /// Mutable access to the properties.  The next calibration runs in full.
    pub fn properties_mut(&mut self) -> &mut Properties {
        self.calibrated = false;
        &mut self.properties
    }

    /// Replace the properties.  The next calibration runs in full.
    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = properties;
        self.calibrated = false;
    }

    pub fn set_log_scale(&mut self, log: bool) {
        self.properties.logscale = log;
        self.calibrated = false;
    }

    pub fn set_discrete(&mut self, discrete: bool) {
        self.properties.discrete = discrete;
        self.calibrated = false;
    }

    /// A locked map keeps its calibration whatever range is requested.
    pub fn set_locked(&mut self, locked: bool) { self.properties.locked = locked }

    pub fn is_discrete(&self) -> bool { self.properties.discrete }

    pub fn is_locked(&self) -> bool { self.properties.locked }

    pub fn minimum(&self) -> f64 { self.calibration.minimum }

    pub fn maximum(&self) -> f64 { self.calibration.maximum }

    /// The scale in force since the last calibration.
    pub fn scale(&self) -> Scale { self.calibration.scale }

    pub fn calibration(&self) -> &Calibration { &self.calibration }

    pub fn is_calibrated(&self) -> bool { self.calibrated }

    /// Whether every control point was fully opaque at the last calibration.
    pub fn is_opaque(&self) -> bool { self.opaque }

    pub fn background(&self) -> Colour { self.background }

    pub fn set_background(&mut self, colour: Colour) { self.background = colour }

    pub fn lookup_table(&self) -> &LookupTable { &self.table }

    // Control points

    fn push(&mut self, point: ControlPoint) {
        self.points.push(point);
        self.calibrated = false;
    }

    /// Append a stop anchored at the data `value`.
    pub fn add_value(&mut self, colour: Colour, value: f64) {
        if self.explicit_positions {
            warn!("colour map {}: value {value} ignored, map uses explicit positions",
                  self.name);
        }
        self.push(ControlPoint::with_value(colour, value));
    }

    /// Append a stop at `position` ∈ \[0, 1\].  From now on the map
    /// uses explicit positions.
    pub fn add_position(&mut self, colour: Colour, position: f64) {
        self.push(ControlPoint::at(colour, position));
        self.explicit_positions = true;
    }

    /// Append a stop spread evenly between its valued neighbours.
    pub fn add_plain(&mut self, colour: Colour) {
        self.push(ControlPoint::new(colour));
    }

    /// [`ColourMap::add_plain`] for a packed `0xAABBGGRR` colour.
    pub fn add_packed(&mut self, colour: u32) {
        self.add_plain(Colour::from_packed(colour))
    }

    pub fn add_packed_value(&mut self, colour: u32, value: f64) {
        self.add_value(Colour::from_packed(colour), value)
    }

    pub fn extend_packed(&mut self, colours: &[u32]) {
        for &c in colours { self.add_packed(c) }
    }

    /// [`ColourMap::add_value`] for components in \[0, 1\].
    pub fn add_components(&mut self, components: [f32; 4], value: f64) {
        self.add_value(Colour::from_components(components), value)
    }

    fn reset(&mut self, explicit_positions: bool) {
        self.points.clear();
        self.explicit_positions = explicit_positions;
        self.calibrated = false;
    }

    /// Ensure at least two control points, adding opaque black.
    fn pad(&mut self) {
        if self.explicit_positions {
            if self.points.is_empty() { self.add_position(Colour::BLACK, 0.) }
            while self.points.len() < 2 { self.add_position(Colour::BLACK, 1.) }
        } else {
            while self.points.len() < 2 { self.add_plain(Colour::BLACK) }
        }
    }

    /// Replace the control points by those of `text`: colours
    /// separated by whitespace or `;`, each optionally preceded by a
    /// value in parentheses, e.g. `"blue (0)white (10)yellow red"`.
    ///
    /// A `(value)colour` token whose value or colour cannot be read is
    /// retried as a plain colour and skipped if that fails too, so a
    /// bare `(3)` or a misspelt name removes a stop and changes the
    /// spacing of the unvalued stops around it.  The map ends up with
    /// at least two control points.
    pub fn parse(&mut self, text: &str) {
        self.reset(false);
        let tokens = text.split(|c: char| c.is_whitespace() || c == ';')
            .filter(|t| !t.is_empty());
        for token in tokens {
            if let Some((value, colour)) = parse_valued(token) {
                self.add_value(colour, value);
                continue
            }
            match token.parse() {
                Ok(colour) => self.add_plain(colour),
                Err(e) => warn!("colour map {}: skipping {e}", self.name),
            }
        }
        self.pad();
    }

    /// Replace the control points by the palette `text`.
    ///
    /// A palette is a list of `position=colour` lines (`;` also
    /// separates lines) with positions in \[0, 1\], plus optionally a
    /// `Background=colour` line.  Text without any `=` is handed to
    /// [`ColourMap::parse`].
    ///
    /// Padding only appends black at position 1 (and at 0 for an empty
    /// palette), so a palette whose first position is above 0, such as
    /// `"0.5=red"`, does not span \[0, 1\] and fails to calibrate.
    ///
    /// # Example
    ///
    /// ```
    /// use colour_scale::{Colour, ColourMap};
    /// let mut map = ColourMap::new("palette");
    /// map.load_palette("0=black; 0.8=#ff0000; 1=white; Background=white");
    /// assert!(map.uses_explicit_positions());
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.background(), Colour::WHITE);
    /// ```
    pub fn load_palette(&mut self, text: &str) {
        if !text.contains('=') { return self.parse(text) }
        self.reset(true);
        for line in text.split(|c: char| c == '\n' || c == ';') {
            let (key, spec) = match line.split_once('=') {
                Some((k, s)) => (k.trim(), s.trim()),
                None => continue };
            match key.parse::<f64>() {
                Ok(pos) if (0. ..= 1.).contains(&pos) => match spec.parse() {
                    Ok(colour) => self.add_position(colour, pos),
                    Err(e) => warn!("colour map {}: skipping {e}", self.name),
                },
                _ if key.eq_ignore_ascii_case("background") => {
                    if let Ok(c) = spec.parse() { self.background = c }
                }
                _ => (),
            }
        }
        self.pad();
    }

    /// Keep only the channel `component` (0 red, 1 green, 2 blue) of
    /// every control point; alpha is untouched.
    pub fn set_component(&mut self, component: usize) {
        for p in &mut self.points {
            let mut c = p.colour.channels();
            for (k, x) in c.iter_mut().take(3).enumerate() {
                if k != component { *x = 0 }
            }
            p.colour = Colour::from_channels(c);
        }
        self.calibrated = false;
    }

    // Calibration

    /// Resolve the control points against the data range `[min, max]`
    /// and rebuild the lookup table.
    ///
    /// Nothing happens when the map is locked, when it has no control
    /// points, or when a value-mode map is already calibrated to the
    /// same range.  An infinite bound is replaced by the other one.
    ///
    /// An error (explicit positions not spanning \[0, 1\]) leaves the
    /// map uncalibrated.
    pub fn calibrate(&mut self, min: f64, max: f64) -> Result<()> {
        if self.properties.locked {
            trace!("colour map {}: locked, calibration skipped", self.name);
            return Ok(())
        }
        if !self.explicit_positions && self.calibrated
            && min == self.calibration.minimum && max == self.calibration.maximum {
            trace!("colour map {}: range unchanged", self.name);
            return Ok(())
        }
        if self.points.is_empty() { return Ok(()) }

        let cal = Calibration::new(min, max, Scale::new(self.properties.logscale));
        if let Err(e) = resolve_positions(&mut self.points, &cal,
                                          self.explicit_positions) {
            self.calibrated = false;
            return Err(e)
        }
        self.calibration = cal;
        self.opaque = self.points.iter().all(|p| p.colour.is_opaque());

        let (name, points, discrete) = (&self.name, &self.points, self.properties.discrete);
        self.table.rebuild(&cal, |v| colour_at(name, points, discrete, cal.position(v)));

        debug!("colour map {} calibrated min {}, max {}, range {} ==> {} colours",
               self.name, cal.minimum, cal.maximum, cal.range, self.points.len());
        self.calibrated = true;
        Ok(())
    }

    /// Calibrate to the fixed `range` property when it is valid,
    /// otherwise to `data`, otherwise to the current range.
    pub fn calibrate_from(&mut self, data: Option<&dyn DataRange>) -> Result<()> {
        let (min, max) = match (self.properties.fixed_range(), data) {
            (Some(range), _) => range,
            (None, Some(data)) => (data.minimum(), data.maximum()),
            (None, None) => (self.calibration.minimum, self.calibration.maximum),
        };
        self.calibrate(min, max)
    }

    // Evaluation

    /// Colour at the scaled position `t` ∈ \[0, 1\].
    pub fn try_evaluate_scaled(&self, t: f64) -> Result<Colour> {
        exact_evaluate(&self.points, t, self.properties.discrete)
    }

    /// Colour at the scaled position `t` ∈ \[0, 1\].
    ///
    /// # Panics
    ///
    /// If the control points do not bracket `t`, which only happens
    /// when they were never calibrated.
    pub fn evaluate_scaled(&self, t: f64) -> Colour {
        colour_at(&self.name, &self.points, self.properties.discrete, t)
    }

    pub fn try_evaluate(&self, value: f64) -> Result<Colour> {
        self.try_evaluate_scaled(self.calibration.position(value))
    }

    /// Exact colour of the data `value`.  Values outside the calibrated
    /// range take the colour of the nearest end.
    ///
    /// # Panics
    ///
    /// As [`ColourMap::evaluate_scaled`].
    pub fn evaluate(&self, value: f64) -> Colour {
        self.evaluate_scaled(self.calibration.position(value))
    }

    /// Colour of `value` read from the lookup table.
    ///
    /// On a linear scale the result is the exact colour of the nearest
    /// sample at or below `value`.  On a log scale the index goes
    /// through the logarithm of `value` and of the minimum (each
    /// clamped at [`SAFE_LOG_FLOOR`](crate::SAFE_LOG_FLOOR)), so it is
    /// only an approximation there: use [`ColourMap::evaluate`] where
    /// log-scale accuracy matters.
    #[inline]
    pub fn fast_evaluate(&self, value: f64) -> Colour {
        self.table.lookup(&self.calibration, value)
    }

    /// RGBA bytes of as many colours as the lookup table holds, evenly
    /// spaced over the scaled positions \[0, 1\], e.g. for a 1D texture.
    pub fn palette_bytes(&self) -> Vec<u8> {
        ColourRange::samples(self, self.table.len())
            .flat_map(|c| c.channels())
            .collect()
    }
}

/// `(value)colour` token.
fn parse_valued(token: &str) -> Option<(f64, Colour)> {
    let (value, spec) = token.strip_prefix('(')?.split_once(')')?;
    Some((value.trim().parse().ok()?, spec.parse().ok()?))
}

fn colour_at(name: &str, points: &[ControlPoint], discrete: bool, t: f64) -> Colour {
    match exact_evaluate(points, t, discrete) {
        Ok(c) => c,
        Err(e) => panic!("colour map {name}: {e}"),
    }
}

impl ColourRange for ColourMap {
    /// Same as [`ColourMap::evaluate_scaled`].
    fn colour(&self, t: f64) -> Colour { self.evaluate_scaled(t) }
}

impl fmt::Display for ColourMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            writeln!(f, "{i} : {p}")?;
        }
        Ok(())
    }
}
