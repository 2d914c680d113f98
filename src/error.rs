//! Tagged error values with row/line/byte coordinates (C8).
//!
//! Configuration errors (`InvalidOptions`, `InvalidLayout`) are raised at
//! construction time and never during parsing. Parse and I/O errors abort
//! the current row and are surfaced to the caller; no error is recovered
//! internally (§7).

use std::fmt;

/// Source-location coordinates attached to an error, as far as they were
/// known at the point of failure. Fields are independently optional because
/// e.g. a tokenizer call made directly on a slice (no stream driver) has no
/// row/line number to report, only a byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coordinate {
    pub row_number: Option<u64>,
    pub line_number: Option<u64>,
    pub byte_offset: Option<u64>,
}

impl Coordinate {
    pub const fn none() -> Self {
        Coordinate {
            row_number: None,
            line_number: None,
            byte_offset: None,
        }
    }

    pub const fn at_offset(byte_offset: u64) -> Self {
        Coordinate {
            row_number: None,
            line_number: None,
            byte_offset: Some(byte_offset),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        if let Some(r) = self.row_number {
            write!(f, "row {r}")?;
            wrote = true;
        }
        if let Some(l) = self.line_number {
            write!(f, "{}line {l}", if wrote { ", " } else { "" })?;
            wrote = true;
        }
        if let Some(b) = self.byte_offset {
            write!(f, "{}byte offset {b}", if wrote { ", " } else { "" })?;
            wrote = true;
        }
        if !wrote {
            write!(f, "<unknown location>")?;
        }
        Ok(())
    }
}

/// The full error taxonomy (§7): Configuration, Parse, and I/O kinds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raised at `ParserOptions` construction; never during parsing.
    #[error("invalid parser options: {0}")]
    InvalidOptions(String),

    /// Raised at fixed-width `FieldLayout` construction.
    #[error("invalid fixed-width layout: {0}")]
    InvalidLayout(String),

    #[error("too many columns (limit is {max_columns}) at {coord}")]
    TooManyColumns { max_columns: usize, coord: Coordinate },

    #[error("field exceeds max_field_length ({max_field_length}) at {coord}")]
    FieldTooLong {
        max_field_length: usize,
        coord: Coordinate,
    },

    #[error("newline inside quoted field at {coord}")]
    NewlineInQuote { coord: Coordinate },

    #[error("unterminated quoted field opened at byte offset {opening_quote_offset} ({coord})")]
    UnterminatedQuote {
        opening_quote_offset: u64,
        coord: Coordinate,
    },

    #[error("row exceeds the configured maximum buffer size at {coord}")]
    RowTooLarge { coord: Coordinate },

    #[error("fixed-width field out of bounds at {coord}")]
    FieldOutOfBounds { coord: Coordinate },

    #[error("I/O failure: {source}")]
    IoFailed {
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {message} at {coord}")]
    ParseError { message: String, coord: Coordinate },
}

impl Error {
    /// The coordinate attached to this error, if it carries one.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Error::InvalidOptions(_) | Error::InvalidLayout(_) | Error::IoFailed { .. } => None,
            Error::TooManyColumns { coord, .. }
            | Error::FieldTooLong { coord, .. }
            | Error::NewlineInQuote { coord }
            | Error::UnterminatedQuote { coord, .. }
            | Error::RowTooLarge { coord }
            | Error::FieldOutOfBounds { coord }
            | Error::ParseError { coord, .. } => Some(*coord),
        }
    }

    /// Attach or replace the coordinate on errors that carry one. Used by the
    /// stream driver to fill in row/line numbers the bare tokenizer could not
    /// know about.
    pub fn with_coordinate(mut self, coord: Coordinate) -> Self {
        match &mut self {
            Error::TooManyColumns { coord: c, .. }
            | Error::FieldTooLong { coord: c, .. }
            | Error::NewlineInQuote { coord: c }
            | Error::UnterminatedQuote { coord: c, .. }
            | Error::RowTooLarge { coord: c }
            | Error::FieldOutOfBounds { coord: c }
            | Error::ParseError { coord: c, .. } => *c = coord,
            Error::InvalidOptions(_) | Error::InvalidLayout(_) | Error::IoFailed { .. } => {}
        }
        self
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::IoFailed { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_display_partial() {
        let c = Coordinate {
            row_number: Some(3),
            line_number: None,
            byte_offset: Some(40),
        };
        assert_eq!(format!("{c}"), "row 3, byte offset 40");
    }

    #[test]
    fn with_coordinate_overwrites() {
        let err = Error::RowTooLarge {
            coord: Coordinate::none(),
        }
        .with_coordinate(Coordinate::at_offset(7));
        assert_eq!(err.coordinate().unwrap().byte_offset, Some(7));
    }

    #[test]
    fn config_errors_carry_no_coordinate() {
        let err = Error::InvalidOptions("delimiter == quote".into());
        assert!(err.coordinate().is_none());
    }
}
