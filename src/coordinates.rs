//! Degrees / decimal-minutes coordinate notation (`DD°MM.MMM′H`)
//!
//! Saved locations are shown to anglers in the notation used by chart plotters
//! and handheld GPS units. This module converts between that notation and the
//! decimal degrees used everywhere else, and validates user input before it is
//! committed to a location.

use crate::error::CoordinateParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hemisphere letter of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    N,
    S,
    E,
    W,
}

impl Hemisphere {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Hemisphere::N),
            'S' => Some(Hemisphere::S),
            'E' => Some(Hemisphere::E),
            'W' => Some(Hemisphere::W),
            _ => None,
        }
    }

    /// Southern and western hemispheres have negative decimal values
    #[must_use]
    pub fn is_negative(self) -> bool {
        matches!(self, Hemisphere::S | Hemisphere::W)
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Hemisphere::N => 'N',
            Hemisphere::S => 'S',
            Hemisphere::E => 'E',
            Hemisphere::W => 'W',
        }
    }
}

/// A coordinate split into whole degrees, decimal minutes and hemisphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmsCoordinate {
    pub degrees: u64,
    /// Minutes in `[0, 60)`
    pub minutes: f64,
    pub hemisphere: Hemisphere,
}

impl DmsCoordinate {
    /// Split a decimal-degree value. Minutes are rounded to 3 decimals; a value
    /// that rounds up to a full 60 minutes carries into the degrees.
    #[must_use]
    pub fn from_decimal(decimal: f64, is_longitude: bool) -> Self {
        let hemisphere = match (is_longitude, decimal >= 0.0) {
            (true, true) => Hemisphere::E,
            (true, false) => Hemisphere::W,
            (false, true) => Hemisphere::N,
            (false, false) => Hemisphere::S,
        };

        let absolute = decimal.abs();
        let mut degrees = absolute.floor() as u64;
        let mut thousandths = ((absolute - absolute.floor()) * 60_000.0).round() as u64;
        if thousandths >= 60_000 {
            degrees += 1;
            thousandths = 0;
        }

        Self {
            degrees,
            minutes: thousandths as f64 / 1000.0,
            hemisphere,
        }
    }

    #[must_use]
    pub fn to_decimal(&self) -> f64 {
        let value = self.degrees as f64 + self.minutes / 60.0;
        if self.hemisphere.is_negative() {
            -value
        } else {
            value
        }
    }
}

impl fmt::Display for DmsCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°{:.3}′{}",
            self.degrees,
            self.minutes,
            self.hemisphere.as_char()
        )
    }
}

impl FromStr for DmsCoordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s.trim());
        if cursor.is_at_end() {
            return Err(CoordinateParseError::Empty);
        }

        let degrees_text = cursor.take_digits();
        if degrees_text.is_empty() {
            return Err(CoordinateParseError::MissingDegrees);
        }
        // Digit runs too long for u64 are still valid degrees at this layer
        let degrees = degrees_text.parse::<u64>().unwrap_or(u64::MAX);

        // Degree mark or at least one space between degrees and minutes
        if !cursor.skip_separators(&['°', 'º']) {
            return Err(CoordinateParseError::MissingMinutes);
        }

        let minutes_text = cursor.take_decimal();
        if minutes_text.is_empty() {
            return Err(CoordinateParseError::MissingMinutes);
        }
        let minutes = minutes_text
            .parse::<f64>()
            .map_err(|_| CoordinateParseError::MissingMinutes)?;
        if minutes >= 60.0 {
            return Err(CoordinateParseError::MinutesOutOfRange);
        }

        cursor.skip_separators(&['′', '\'']);

        let hemisphere = match cursor.bump() {
            None => return Err(CoordinateParseError::MissingHemisphere),
            Some(c) => {
                Hemisphere::from_char(c).ok_or(CoordinateParseError::InvalidHemisphere(c))?
            }
        };

        let rest = cursor.rest().trim();
        if !rest.is_empty() {
            return Err(CoordinateParseError::TrailingInput(rest.to_string()));
        }

        Ok(Self {
            degrees,
            minutes,
            hemisphere,
        })
    }
}

/// Minimal char cursor over the input
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.text[start..self.pos]
    }

    fn take_digits(&mut self) -> &'a str {
        self.take_while(|c| c.is_ascii_digit())
    }

    /// `digits [ '.' digits* ]`
    fn take_decimal(&mut self) -> &'a str {
        let start = self.pos;
        if self.take_digits().is_empty() {
            return "";
        }
        if self.peek() == Some('.') {
            self.pos += 1;
            self.take_digits();
        }
        &self.text[start..self.pos]
    }

    /// Skips whitespace and the given marks, returns whether anything was skipped
    fn skip_separators(&mut self, marks: &[char]) -> bool {
        !self
            .take_while(|c| c.is_whitespace() || marks.contains(&c))
            .is_empty()
    }
}

/// Latitude/longitude pair in display notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCoordinates {
    pub latitude: String,
    pub longitude: String,
}

/// Format a decimal-degree value as `DD°MM.MMM′H`
#[must_use]
pub fn to_display(decimal: f64, is_longitude: bool) -> String {
    DmsCoordinate::from_decimal(decimal, is_longitude).to_string()
}

/// Parse a `DD°MM.MMM′H` string into decimal degrees
pub fn from_display(text: &str) -> Result<f64, CoordinateParseError> {
    text.parse::<DmsCoordinate>().map(|dms| dms.to_decimal())
}

/// Whether `text` would be accepted by [`from_display`]
#[must_use]
pub fn is_valid_display(text: &str) -> bool {
    from_display(text).is_ok()
}

#[must_use]
pub fn format_coordinates(latitude: f64, longitude: f64) -> FormattedCoordinates {
    FormattedCoordinates {
        latitude: to_display(latitude, false),
        longitude: to_display(longitude, true),
    }
}
