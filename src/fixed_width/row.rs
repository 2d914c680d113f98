//! The borrowed fixed-width row view (C5, §4.4).
//!
//! Grounded on the teacher's `core/field.rs` slicing idiom (borrowed
//! sub-slice + trim), generalized from quote-stripping to pad-char
//! trimming since positional records have no quoting concept at all.

use crate::element::Element;
use crate::error::{Coordinate, Error};
use crate::fixed_width::layout::{Alignment, RecordLayout};

/// A borrowed view over one fixed-width record (§3). `line_number` is only
/// populated when the stream driver is tracking source lines.
pub struct FixedWidthRowView<'a, E: Element = u8> {
    record: &'a [E],
    layout: &'a RecordLayout<E>,
    record_number: u64,
    line_number: Option<u64>,
}

impl<'a, E: Element> FixedWidthRowView<'a, E> {
    pub fn new(
        record: &'a [E],
        layout: &'a RecordLayout<E>,
        record_number: u64,
        line_number: Option<u64>,
    ) -> Self {
        FixedWidthRowView {
            record,
            layout,
            record_number,
            line_number,
        }
    }

    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    pub fn line_number(&self) -> Option<u64> {
        self.line_number
    }

    /// Raw `[start, start+length)` slice, never trimmed. Bounds policy
    /// (§4.4): if the span runs past the record and short rows are
    /// forbidden, fails with `FieldOutOfBounds`; otherwise returns the
    /// (possibly empty) prefix that exists.
    pub fn get_raw_field(&self, start: usize, length: usize) -> Result<&'a [E], Error> {
        let record_len = self.record.len();
        let truncated = start.saturating_add(length) > record_len;
        if truncated && !self.layout.allow_short_rows() {
            return Err(Error::FieldOutOfBounds {
                coord: Coordinate::none(),
            });
        }
        let start = start.min(record_len);
        let end = start.saturating_add(length).min(record_len);
        Ok(&self.record[start..end])
    }

    /// Field using the layout's default pad char and alignment.
    pub fn get_field(&self, start: usize, length: usize) -> Result<&'a [E], Error> {
        self.get_field_with(start, length, self.layout.default_pad_char(), self.layout.default_alignment())
    }

    /// Field with an explicit pad char and alignment override.
    pub fn get_field_with(
        &self,
        start: usize,
        length: usize,
        pad_char: E,
        alignment: Alignment,
    ) -> Result<&'a [E], Error> {
        let raw = self.get_raw_field(start, length)?;
        Ok(trim_pad(raw, pad_char, alignment))
    }

    /// Field by its declared name in the layout.
    pub fn field(&self, name: &str) -> Result<&'a [E], Error> {
        let layout_field = self.layout.field_by_name(name).ok_or_else(|| Error::ParseError {
            message: format!("no field named '{name}' in layout"),
            coord: Coordinate::none(),
        })?;
        self.get_field_with(layout_field.start, layout_field.length, layout_field.pad_char, layout_field.alignment)
    }
}

fn trim_pad<E: Element>(data: &[E], pad_char: E, alignment: Alignment) -> &[E] {
    match alignment {
        Alignment::None => data,
        Alignment::Left => {
            let end = data.iter().rposition(|&c| c != pad_char).map_or(0, |i| i + 1);
            &data[..end]
        }
        Alignment::Right => {
            let start = data.iter().position(|&c| c != pad_char).unwrap_or(data.len());
            &data[start..]
        }
        Alignment::Center => {
            let start = data.iter().position(|&c| c != pad_char).unwrap_or(data.len());
            let end = data.iter().rposition(|&c| c != pad_char).map_or(start, |i| i + 1);
            &data[start..end]
        }
    }
}
