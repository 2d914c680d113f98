//! Fixed-width field layout and validation (C1/C5, §3/§4.4).
//!
//! No teacher counterpart exists for positional records (`RustyCSV` is a
//! DSV-only NIF); built fresh in the teacher's style — a validated,
//! immutable builder-produced value type, same as `ParserOptions`.

use crate::element::Element;
use crate::error::Error;

/// Trim behavior applied by `FixedWidthRowView::get_field` (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Trim trailing `pad_char`.
    Left,
    /// Trim leading `pad_char`.
    Right,
    /// Trim both leading and trailing `pad_char`.
    Center,
    /// Return the raw slice untouched.
    None,
}

/// One positional field in a fixed-width record.
#[derive(Debug, Clone)]
pub struct FieldLayout<E: Element = u8> {
    pub name: String,
    pub start: usize,
    pub length: usize,
    pub pad_char: E,
    pub alignment: Alignment,
}

/// A validated, immutable ordered list of non-overlapping fields (§3).
#[derive(Debug, Clone)]
pub struct RecordLayout<E: Element = u8> {
    fields: Vec<FieldLayout<E>>,
    record_length: usize,
    default_pad_char: E,
    default_alignment: Alignment,
    allow_short_rows: bool,
}

impl<E: Element> RecordLayout<E> {
    pub fn builder() -> RecordLayoutBuilder<E> {
        RecordLayoutBuilder::default()
    }

    pub fn fields(&self) -> &[FieldLayout<E>] {
        &self.fields
    }

    pub fn record_length(&self) -> usize {
        self.record_length
    }

    pub fn default_pad_char(&self) -> E {
        self.default_pad_char
    }

    pub fn default_alignment(&self) -> Alignment {
        self.default_alignment
    }

    pub fn allow_short_rows(&self) -> bool {
        self.allow_short_rows
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldLayout<E>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct RecordLayoutBuilder<E: Element = u8> {
    fields: Vec<FieldLayout<E>>,
    default_pad_char: E,
    default_alignment: Alignment,
    allow_short_rows: bool,
}

impl<E: Element> Default for RecordLayoutBuilder<E> {
    fn default() -> Self {
        RecordLayoutBuilder {
            fields: Vec::new(),
            default_pad_char: E::SPACE,
            default_alignment: Alignment::Left,
            allow_short_rows: false,
        }
    }
}

impl<E: Element> RecordLayoutBuilder<E> {
    pub fn field(mut self, name: impl Into<String>, start: usize, length: usize) -> Self {
        self.fields.push(FieldLayout {
            name: name.into(),
            start,
            length,
            pad_char: self.default_pad_char,
            alignment: self.default_alignment,
        });
        self
    }

    pub fn field_with(
        mut self,
        name: impl Into<String>,
        start: usize,
        length: usize,
        pad_char: E,
        alignment: Alignment,
    ) -> Self {
        self.fields.push(FieldLayout {
            name: name.into(),
            start,
            length,
            pad_char,
            alignment,
        });
        self
    }

    pub fn default_pad_char(mut self, pad_char: E) -> Self {
        self.default_pad_char = pad_char;
        self
    }

    pub fn default_alignment(mut self, alignment: Alignment) -> Self {
        self.default_alignment = alignment;
        self
    }

    pub fn allow_short_rows(mut self, allow: bool) -> Self {
        self.allow_short_rows = allow;
        self
    }

    /// Validates: `length > 0`, `start + length` does not overflow, and no
    /// two fields overlap once sorted by `start` (§3).
    pub fn build(self) -> Result<RecordLayout<E>, Error> {
        if self.fields.is_empty() {
            return Err(Error::InvalidLayout("layout has no fields".into()));
        }
        let mut sorted: Vec<&FieldLayout<E>> = self.fields.iter().collect();
        sorted.sort_by_key(|f| f.start);

        let mut record_length = 0usize;
        let mut prev_end: Option<usize> = None;
        for field in &sorted {
            if field.length == 0 {
                return Err(Error::InvalidLayout(format!(
                    "field '{}' has zero length",
                    field.name
                )));
            }
            let end = field
                .start
                .checked_add(field.length)
                .ok_or_else(|| Error::InvalidLayout(format!("field '{}' overflows", field.name)))?;
            if let Some(prev_end) = prev_end {
                if field.start < prev_end {
                    return Err(Error::InvalidLayout(format!(
                        "field '{}' overlaps the preceding field",
                        field.name
                    )));
                }
            }
            prev_end = Some(end);
            record_length = record_length.max(end);
        }

        Ok(RecordLayout {
            fields: self.fields,
            record_length,
            default_pad_char: self.default_pad_char,
            default_alignment: self.default_alignment,
            allow_short_rows: self.allow_short_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_non_overlapping_layout() {
        let layout = RecordLayout::<u8>::builder()
            .field("id", 0, 5)
            .field("name", 5, 10)
            .build()
            .unwrap();
        assert_eq!(layout.record_length(), 15);
        assert_eq!(layout.fields().len(), 2);
    }

    #[test]
    fn rejects_overlap() {
        let err = RecordLayout::<u8>::builder()
            .field("a", 0, 5)
            .field("b", 3, 5)
            .build();
        assert!(matches!(err, Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn rejects_zero_length_field() {
        let err = RecordLayout::<u8>::builder().field("a", 0, 0).build();
        assert!(matches!(err, Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn rejects_empty_layout() {
        let err = RecordLayout::<u8>::builder().build();
        assert!(matches!(err, Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn out_of_order_fields_are_still_validated_by_position() {
        let layout = RecordLayout::<u8>::builder()
            .field("b", 5, 5)
            .field("a", 0, 5)
            .build()
            .unwrap();
        assert_eq!(layout.record_length(), 10);
    }
}
