//! Line parser for the sensor's text protocol.
//!
//! Each reading arrives as one newline-terminated line of the form
//! `A<angle>,D<distance>`, e.g. `A45,D30`. Both fields are base-10 integers with an
//! optional sign. No range checks are applied: `A370,D-5` parses fine and is handed
//! to the caller as-is.
//!
//! Parsing is all-or-nothing. A line either yields both fields or nothing.

use std::fmt;
use std::num::ParseIntError;
use tracing::{debug, warn};

const ANGLE_PREFIX: char = 'A';
const DISTANCE_SEPARATOR: &str = ",D";

/// Why a line was rejected. Only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseFailure {
    Empty,
    MissingPrefix,
    MissingSeparator,
    RepeatedSeparator,
    InvalidAngle(ParseIntError),
    InvalidDistance(ParseIntError),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::Empty => write!(f, "empty line"),
            ParseFailure::MissingPrefix => write!(f, "line does not start with '{ANGLE_PREFIX}'"),
            ParseFailure::MissingSeparator => {
                write!(f, "missing '{DISTANCE_SEPARATOR}' separator")
            }
            ParseFailure::RepeatedSeparator => {
                write!(f, "'{DISTANCE_SEPARATOR}' separator appears more than once")
            }
            ParseFailure::InvalidAngle(e) => write!(f, "invalid angle: {e}"),
            ParseFailure::InvalidDistance(e) => write!(f, "invalid distance: {e}"),
        }
    }
}

/// Parse one raw line into `(angle, distance)`.
///
/// Returns `None` for anything that is not exactly `A<int>,D<int>` after trimming.
/// Rejections are logged: malformed numbers at `warn`, lines of the wrong shape at
/// `debug`, and empty lines (read timeouts) not at all.
pub fn parse_line(line: &str) -> Option<(i64, i64)> {
    match try_parse_line(line) {
        Ok(pair) => Some(pair),
        Err(ParseFailure::Empty) => None,
        Err(
            reason @ (ParseFailure::InvalidAngle(_)
            | ParseFailure::InvalidDistance(_)
            | ParseFailure::RepeatedSeparator),
        ) => {
            warn!(line = line.trim(), %reason, "Parse error");
            None
        }
        Err(reason) => {
            debug!(line = line.trim(), %reason, "Ignoring line");
            None
        }
    }
}

pub(crate) fn try_parse_line(line: &str) -> Result<(i64, i64), ParseFailure> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseFailure::Empty);
    }

    let body = line
        .strip_prefix(ANGLE_PREFIX)
        .ok_or(ParseFailure::MissingPrefix)?;

    let (angle_str, distance_str) = body
        .split_once(DISTANCE_SEPARATOR)
        .ok_or(ParseFailure::MissingSeparator)?;
    if distance_str.contains(DISTANCE_SEPARATOR) {
        return Err(ParseFailure::RepeatedSeparator);
    }

    let angle = angle_str
        .trim()
        .parse::<i64>()
        .map_err(ParseFailure::InvalidAngle)?;
    let distance = distance_str
        .trim()
        .parse::<i64>()
        .map_err(ParseFailure::InvalidDistance)?;

    Ok((angle, distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn parses_plain_reading() {
        assert_eq!(parse_line("A10,D20"), Some((10, 20)));
    }

    #[test]
    fn parses_signed_fields() {
        assert_eq!(parse_line("A-15,D+7"), Some((-15, 7)));
        assert_eq!(parse_line("A+0,D-0"), Some((0, 0)));
    }

    #[test]
    fn trims_surrounding_whitespace_and_line_endings() {
        assert_eq!(parse_line("  A45,D30\r\n"), Some((45, 30)));
        assert_eq!(parse_line("\tA1,D2 "), Some((1, 2)));
    }

    #[test]
    fn passes_out_of_range_values_through() {
        assert_eq!(parse_line("A370,D5000"), Some((370, 5000)));
        assert_eq!(parse_line("A-720,D-1"), Some((-720, -1)));
    }

    #[test]
    fn classifies_failures() {
        assert_eq!(try_parse_line(""), Err(ParseFailure::Empty));
        assert_eq!(try_parse_line("   \n"), Err(ParseFailure::Empty));
        assert_eq!(try_parse_line("B10,D20"), Err(ParseFailure::MissingPrefix));
        assert_eq!(try_parse_line("A10;D20"), Err(ParseFailure::MissingSeparator));
        assert_eq!(
            try_parse_line("A10,D20,D30"),
            Err(ParseFailure::RepeatedSeparator)
        );
        assert!(matches!(
            try_parse_line("Agarbage"),
            Err(ParseFailure::MissingSeparator)
        ));
        assert!(matches!(
            try_parse_line("Ax,D20"),
            Err(ParseFailure::InvalidAngle(_))
        ));
        assert!(matches!(
            try_parse_line("A10,D2.5"),
            Err(ParseFailure::InvalidDistance(_))
        ));
        assert!(matches!(
            try_parse_line("A,D"),
            Err(ParseFailure::InvalidAngle(_))
        ));
    }

    #[test]
    fn never_returns_partial_result() {
        // Valid angle, broken distance
        assert_eq!(parse_line("A10,Dabc"), None);
        // Broken angle, valid distance
        assert_eq!(parse_line("Aabc,D10"), None);
    }

    #[traced_test]
    #[test]
    fn logs_malformed_numbers() {
        assert_eq!(parse_line("A1x,D2"), None);
        assert!(logs_contain("Parse error"));
    }

    #[traced_test]
    #[test]
    fn empty_lines_are_silent() {
        assert_eq!(parse_line(""), None);
        assert!(!logs_contain("Parse error"));
        assert!(!logs_contain("Ignoring line"));
    }
}
