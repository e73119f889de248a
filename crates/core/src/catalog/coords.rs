//! Sexagesimal coordinate parsing.
//!
//! Right ascension is read as an hour angle (`hh mm ss.s`), declination as
//! degrees (`±dd mm ss`). Fields may be separated by whitespace or colons, and
//! trailing fields may be omitted. A single plain number is taken in the same
//! unit (hours for RA, degrees for Dec).

use thiserror::Error;

/// Errors produced while parsing a coordinate string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("empty coordinate")]
    Empty,

    #[error("'{value}' has too many fields")]
    TooManyFields { value: String },

    #[error("'{value}' contains a non-numeric field")]
    NotNumeric { value: String },

    #[error("'{value}' is out of range: {reason}")]
    OutOfRange { value: String, reason: &'static str },
}

/// Parses a right ascension in hours and returns decimal degrees in `[0, 360)`.
pub fn parse_ra_hours(value: &str) -> Result<f64, CoordinateError> {
    let (negative, hours) = parse_sexagesimal(value)?;
    if negative {
        return Err(CoordinateError::OutOfRange {
            value: value.to_string(),
            reason: "right ascension cannot be negative",
        });
    }
    if hours >= 24.0 {
        return Err(CoordinateError::OutOfRange {
            value: value.to_string(),
            reason: "right ascension must be below 24h",
        });
    }
    Ok(hours * 15.0)
}

/// Parses a declination in degrees and returns decimal degrees in `[-90, 90]`.
pub fn parse_dec_degrees(value: &str) -> Result<f64, CoordinateError> {
    let (negative, degrees) = parse_sexagesimal(value)?;
    if degrees > 90.0 {
        return Err(CoordinateError::OutOfRange {
            value: value.to_string(),
            reason: "declination magnitude exceeds 90 degrees",
        });
    }
    Ok(if negative { -degrees } else { degrees })
}

/// Splits `[sign]a[ b[ c]]` into a sign and the unsigned value `a + b/60 + c/3600`.
///
/// The sign is taken from the text, so `-00 30 00` stays negative.
fn parse_sexagesimal(value: &str) -> Result<(bool, f64), CoordinateError> {
    let trimmed = value.trim();
    let (negative, body) = match trimmed.as_bytes().first() {
        None => return Err(CoordinateError::Empty),
        Some(b'-') => (true, trimmed[1..].trim_start()),
        Some(b'+') => (false, trimmed[1..].trim_start()),
        Some(_) => (false, trimmed),
    };

    let fields: Vec<&str> = body
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|f| !f.is_empty())
        .collect();

    if fields.is_empty() {
        return Err(CoordinateError::Empty);
    }
    if fields.len() > 3 {
        return Err(CoordinateError::TooManyFields {
            value: value.to_string(),
        });
    }

    let mut parts = [0.0f64; 3];
    for (slot, field) in parts.iter_mut().zip(&fields) {
        *slot = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| CoordinateError::NotNumeric {
                value: value.to_string(),
            })?;
    }

    let [whole, minutes, seconds] = parts;
    if fields.len() > 1 && minutes >= 60.0 {
        return Err(CoordinateError::OutOfRange {
            value: value.to_string(),
            reason: "minutes must be below 60",
        });
    }
    if fields.len() > 2 && seconds >= 60.0 {
        return Err(CoordinateError::OutOfRange {
            value: value.to_string(),
            reason: "seconds must be below 60",
        });
    }

    Ok((negative, whole + minutes / 60.0 + seconds / 3600.0))
}
