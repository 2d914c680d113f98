//! Immutable parser/writer configuration, validated on construction (C1).
//!
//! Grounded on the teacher's `decode_separators`/`decode_escape`/
//! `decode_newlines` validation functions in `lib.rs`: options are decoded
//! (there: from an Elixir term; here: from plain constructor arguments) and
//! rejected eagerly if they are self-contradictory.

use crate::element::Element;
use crate::error::Error;

/// Row terminator to use when writing (§4.6). Reading always accepts all
/// three forms; only writing has to choose one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTerminator {
    Lf,
    CrLf,
    Cr,
}

impl RowTerminator {
    pub(crate) fn bytes(self) -> &'static [u8] {
        match self {
            RowTerminator::Lf => b"\n",
            RowTerminator::CrLf => b"\r\n",
            RowTerminator::Cr => b"\r",
        }
    }
}

/// Immutable DSV parser configuration (§3).
#[derive(Debug, Clone)]
pub struct ParserOptions<E: Element = u8> {
    pub(crate) delimiter: E,
    pub(crate) quote: E,
    pub(crate) escape: Option<E>,
    pub(crate) comment: Option<E>,
    pub(crate) quoting_enabled: bool,
    pub(crate) newlines_in_quotes_allowed: bool,
    pub(crate) use_simd: bool,
    pub(crate) max_columns: usize,
    pub(crate) max_field_length: Option<usize>,
    pub(crate) track_line_numbers: bool,
    pub(crate) trim_fields: bool,
}

impl<E: Element> ParserOptions<E> {
    /// Start from the defaults in §3 and refine with `with_*` setters, then
    /// call `build()` to validate.
    pub fn builder() -> ParserOptionsBuilder<E> {
        ParserOptionsBuilder::default()
    }

    pub fn delimiter(&self) -> E {
        self.delimiter
    }
    pub fn quote(&self) -> E {
        self.quote
    }
    pub fn escape(&self) -> Option<E> {
        self.escape
    }
    pub fn comment(&self) -> Option<E> {
        self.comment
    }
    pub fn quoting_enabled(&self) -> bool {
        self.quoting_enabled
    }
    pub fn newlines_in_quotes_allowed(&self) -> bool {
        self.newlines_in_quotes_allowed
    }
    pub fn use_simd(&self) -> bool {
        self.use_simd && E::HAS_SIMD
    }
    pub fn max_columns(&self) -> usize {
        self.max_columns
    }
    pub fn max_field_length(&self) -> Option<usize> {
        self.max_field_length
    }
    pub fn track_line_numbers(&self) -> bool {
        self.track_line_numbers
    }
    pub fn trim_fields(&self) -> bool {
        self.trim_fields
    }
}

impl<E: Element> Default for ParserOptions<E> {
    fn default() -> Self {
        // Defaults per §3; `builder().build()` would reject nothing here,
        // so this is infallible.
        #[allow(clippy::expect_used)]
        ParserOptionsBuilder::default().build().expect("defaults are valid")
    }
}

/// Builder for `ParserOptions`. Construction fails (`Error::InvalidOptions`)
/// per the invariants in §3: delimiter == quote, delimiter/quote in
/// {\n, \r}, or max_columns == 0.
#[derive(Debug, Clone)]
pub struct ParserOptionsBuilder<E: Element = u8> {
    delimiter: E,
    quote: E,
    escape: Option<E>,
    comment: Option<E>,
    quoting_enabled: bool,
    newlines_in_quotes_allowed: bool,
    use_simd: bool,
    max_columns: usize,
    max_field_length: Option<usize>,
    track_line_numbers: bool,
    trim_fields: bool,
}

impl<E: Element> Default for ParserOptionsBuilder<E> {
    fn default() -> Self {
        ParserOptionsBuilder {
            delimiter: E::COMMA,
            quote: E::QUOTE,
            escape: None,
            comment: None,
            quoting_enabled: true,
            newlines_in_quotes_allowed: false,
            use_simd: true,
            max_columns: 4096,
            max_field_length: None,
            track_line_numbers: false,
            trim_fields: false,
        }
    }
}

impl<E: Element> ParserOptionsBuilder<E> {
    pub fn delimiter(mut self, delimiter: E) -> Self {
        self.delimiter = delimiter;
        self
    }
    pub fn quote(mut self, quote: E) -> Self {
        self.quote = quote;
        self
    }
    pub fn escape(mut self, escape: Option<E>) -> Self {
        self.escape = escape;
        self
    }
    pub fn comment(mut self, comment: Option<E>) -> Self {
        self.comment = comment;
        self
    }
    pub fn quoting_enabled(mut self, enabled: bool) -> Self {
        self.quoting_enabled = enabled;
        self
    }
    pub fn newlines_in_quotes_allowed(mut self, allowed: bool) -> Self {
        self.newlines_in_quotes_allowed = allowed;
        self
    }
    pub fn use_simd(mut self, use_simd: bool) -> Self {
        self.use_simd = use_simd;
        self
    }
    pub fn max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }
    pub fn max_field_length(mut self, max_field_length: Option<usize>) -> Self {
        self.max_field_length = max_field_length;
        self
    }
    pub fn track_line_numbers(mut self, track: bool) -> Self {
        self.track_line_numbers = track;
        self
    }
    pub fn trim_fields(mut self, trim: bool) -> Self {
        self.trim_fields = trim;
        self
    }

    pub fn build(self) -> Result<ParserOptions<E>, Error> {
        if self.delimiter == self.quote {
            return Err(Error::InvalidOptions(
                "delimiter must differ from quote".into(),
            ));
        }
        if self.delimiter == E::LF || self.delimiter == E::CR {
            return Err(Error::InvalidOptions(
                "delimiter must not be a newline character".into(),
            ));
        }
        if self.quote == E::LF || self.quote == E::CR {
            return Err(Error::InvalidOptions("quote must not be a newline character".into()));
        }
        if self.max_columns == 0 {
            return Err(Error::InvalidOptions("max_columns must be positive".into()));
        }
        Ok(ParserOptions {
            delimiter: self.delimiter,
            quote: self.quote,
            escape: self.escape,
            comment: self.comment,
            quoting_enabled: self.quoting_enabled,
            newlines_in_quotes_allowed: self.newlines_in_quotes_allowed,
            use_simd: self.use_simd,
            max_columns: self.max_columns,
            max_field_length: self.max_field_length,
            track_line_numbers: self.track_line_numbers,
            trim_fields: self.trim_fields,
        })
    }
}

/// Immutable writer configuration (§4.6).
#[derive(Debug, Clone)]
pub struct WriterOptions<E: Element = u8> {
    pub delimiter: E,
    pub quote: E,
    pub quoting_enabled: bool,
    pub terminator: RowTerminator,
}

impl<E: Element> Default for WriterOptions<E> {
    fn default() -> Self {
        WriterOptions {
            delimiter: E::COMMA,
            quote: E::QUOTE,
            quoting_enabled: true,
            terminator: RowTerminator::Lf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let opts: ParserOptions = ParserOptions::default();
        assert_eq!(opts.delimiter(), b',');
        assert_eq!(opts.quote(), b'"');
        assert_eq!(opts.max_columns(), 4096);
        assert!(opts.quoting_enabled());
        assert!(!opts.newlines_in_quotes_allowed());
    }

    #[test]
    fn rejects_delimiter_equal_to_quote() {
        let err = ParserOptions::<u8>::builder().delimiter(b'"').build();
        assert!(matches!(err, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn rejects_delimiter_as_newline() {
        let err = ParserOptions::<u8>::builder().delimiter(b'\n').build();
        assert!(matches!(err, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn rejects_zero_max_columns() {
        let err = ParserOptions::<u8>::builder().max_columns(0).build();
        assert!(matches!(err, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn accepts_custom_delimiter_and_escape() {
        let opts = ParserOptions::<u8>::builder()
            .delimiter(b';')
            .escape(Some(b'\\'))
            .build()
            .unwrap();
        assert_eq!(opts.delimiter(), b';');
        assert_eq!(opts.escape(), Some(b'\\'));
    }
}
