//! The borrowed DSV row view (C4).
//!
//! `column()` returns the raw `data[ends[i]+1..ends[i+1]]` slice exactly as
//! §4.3 defines it — still wearing its surrounding quotes if it was quoted,
//! mirroring the lazy-decode `Cell { buf: &[u8] }` design in the pack's
//! `contentstech-com-crates` (`lazycsv`). `decoded()` supplements that with
//! the eager unescape the teacher's `core/field.rs` performs
//! (`extract_field_cow`/`extract_field_cow_with_escape`), since a typed
//! parser can't run straight through a wrapping `"`.

use crate::element::Element;
use crate::options::ParserOptions;
use std::borrow::Cow;

/// A borrowed view over one tokenized row (§4.3). Holds the row's payload
/// slice, the column-ends array produced by the tokenizer, and a reference
/// to the options that produced them. Lifetime `'a` ties the view to the
/// underlying reader buffer; it must not (and, by the borrow checker,
/// cannot) outlive the next `move_next` on the owning stream driver.
pub struct DsvRowView<'a, E: Element = u8> {
    data: &'a [E],
    ends: &'a [i64],
    column_count: usize,
    options: &'a ParserOptions<E>,
}

impl<'a, E: Element> DsvRowView<'a, E> {
    /// `ends[0] == -1` and `ends[1..=column_count]` hold the exclusive end
    /// offset of each column, in ascending order (§4.2/§4.3).
    pub fn new(data: &'a [E], ends: &'a [i64], column_count: usize, options: &'a ParserOptions<E>) -> Self {
        DsvRowView {
            data,
            ends,
            column_count,
            options,
        }
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Column `i`, trimmed per `options.trim_fields()` if set. Panics if `i`
    /// is out of range (§4.3).
    pub fn column(&self, i: usize) -> &'a [E] {
        self.try_column(i)
            .unwrap_or_else(|| panic!("column index {i} out of range (row has {} columns)", self.column_count))
    }

    /// Non-failing variant of `column`.
    pub fn try_column(&self, i: usize) -> Option<&'a [E]> {
        if i >= self.column_count {
            return None;
        }
        let start = (self.ends[i] + 1) as usize;
        let end = self.ends[i + 1] as usize;
        let raw = &self.data[start..end];
        Some(if self.options.trim_fields() {
            trim_ascii_whitespace(raw)
        } else {
            raw
        })
    }

    /// Column by header name, looked up through the reader-owned
    /// name-to-index map (§4.5).
    pub fn column_by_name(&self, name: &[E], header: &HeaderIndex<E>) -> Option<&'a [E]> {
        header.index_of(name).and_then(|i| self.try_column(i))
    }

    /// Column `i` with its surrounding quotes stripped and escapes resolved.
    /// Borrows when no decoding work is needed, allocates only when it is.
    pub fn decoded(&self, i: usize) -> Option<Cow<'a, [E]>> {
        Some(decode_field(self.try_column(i)?, self.options))
    }
}

fn decode_field<'a, E: Element>(raw: &'a [E], options: &ParserOptions<E>) -> Cow<'a, [E]> {
    if options.quoting_enabled() {
        let quote = options.quote();
        if raw.len() >= 2 && raw[0] == quote && raw[raw.len() - 1] == quote {
            let inner = &raw[1..raw.len() - 1];
            return if let Some(esc) = options.escape() {
                unescape(inner, esc)
            } else {
                undouble_quotes(inner, quote)
            };
        }
    }
    match options.escape() {
        Some(esc) => unescape(raw, esc),
        None => Cow::Borrowed(raw),
    }
}

fn undouble_quotes<E: Element>(data: &[E], quote: E) -> Cow<'_, [E]> {
    if !data.windows(2).any(|w| w[0] == quote && w[1] == quote) {
        return Cow::Borrowed(data);
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == quote && i + 1 < data.len() && data[i + 1] == quote {
            out.push(quote);
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    Cow::Owned(out)
}

fn unescape<E: Element>(data: &[E], esc: E) -> Cow<'_, [E]> {
    if !data.contains(&esc) {
        return Cow::Borrowed(data);
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == esc && i + 1 < data.len() {
            out.push(data[i + 1]);
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    Cow::Owned(out)
}

fn trim_ascii_whitespace<E: Element>(data: &[E]) -> &[E] {
    let is_ws = |c: &E| *c == E::SPACE || *c == E::TAB;
    let start = data.iter().position(|c| !is_ws(c)).unwrap_or(data.len());
    let end = data.iter().rposition(|c| !is_ws(c)).map_or(start, |i| i + 1);
    &data[start..end]
}

/// Name-to-column-index map populated from the header row (§4.5). Owned by
/// the stream driver, not the row view, since it must outlive any single
/// row.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex<E: Element = u8> {
    names: Vec<Vec<E>>,
}

impl<E: Element> HeaderIndex<E> {
    pub fn from_columns(columns: impl IntoIterator<Item = Vec<E>>) -> Self {
        HeaderIndex {
            names: columns.into_iter().collect(),
        }
    }

    pub fn index_of(&self, name: &[E]) -> Option<usize> {
        self.names.iter().position(|n| n.as_slice() == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Hook so a record-binding layer can materialize owned copies of a row's
/// columns only when it actually needs to outlive the reader's buffer (§6).
/// Mirrors the teacher's `parse_row_owned` path in `strategy/streaming.rs`,
/// which exists for exactly this reason.
pub trait RowAllocator<E: Element = u8> {
    type Owned;

    fn allocate(&mut self, row: &DsvRowView<'_, E>) -> Self::Owned;
}

/// Default `std`-backed allocator: copies each column into its own
/// `Box<[E]>`.
#[derive(Debug, Default)]
pub struct OwnedRowAllocator;

impl<E: Element> RowAllocator<E> for OwnedRowAllocator {
    type Owned = Vec<Box<[E]>>;

    fn allocate(&mut self, row: &DsvRowView<'_, E>) -> Self::Owned {
        (0..row.column_count())
            .map(|i| row.column(i).to_vec().into_boxed_slice())
            .collect()
    }
}

/// Convenience: mint an empty `DsvRowView` (a row with zero columns), used
/// by the stream driver for comment rows it chooses not to surface.
pub fn empty_view<'a, E: Element>(options: &'a ParserOptions<E>, ends: &'a [i64]) -> DsvRowView<'a, E> {
    DsvRowView::new(&[], ends, 0, options)
}
