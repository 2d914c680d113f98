//! The stream driver (C6, §4.5): a refillable buffer plus a cursor over
//! tokenized rows, growing to accommodate an oversized row and tracking
//! header/row/line state across `move_next` calls.
//!
//! Grounded on the teacher's `strategy/streaming.rs::StreamingParser`
//! (buffer/compact/refill shape), reworked from its push-based `feed()`
//! model into the pull-based cursor §4.5 describes, with the teacher's own
//! `DEFAULT_MAX_BUFFER` (256 MiB) kept as the default growth ceiling.

use crate::dsv::row::{DsvRowView, HeaderIndex};
use crate::dsv::tokenizer::Tokenize;
use crate::element::Element;
use crate::error::{Coordinate, Error};
use crate::options::ParserOptions;

/// External byte/code-unit source (§6): `read(into) -> bytes_written`, with
/// `0` meaning EOF, mirroring `std::io::Read`.
pub trait Source<E> {
    fn read(&mut self, into: &mut [E]) -> Result<usize, Error>;
}

impl<R: std::io::Read> Source<u8> for R {
    fn read(&mut self, into: &mut [u8]) -> Result<usize, Error> {
        std::io::Read::read(self, into).map_err(Error::from)
    }
}

/// Below this much unread data in the buffer, `move_next` opportunistically
/// compacts and refills before tokenizing (§4.5 step 1a).
const MIN_SCAN_WINDOW: usize = 4096;

const DEFAULT_INITIAL_CAPACITY: usize = 64 * 1024;

/// Matches the teacher's `strategy/streaming.rs::DEFAULT_MAX_BUFFER`.
const DEFAULT_MAX_CAPACITY: usize = 256 * 1024 * 1024;

/// Cursor over tokenized rows pulled from a `Source` (§4.5).
pub struct DsvReader<E: Element + Tokenize + Default, S> {
    options: ParserOptions<E>,
    source: S,
    buffer: Vec<E>,
    read: usize,
    write: usize,
    max_capacity: usize,
    eof: bool,
    has_header: bool,
    header_consumed: bool,
    header: Option<HeaderIndex<E>>,
    row_number: u64,
    line_number: u64,
    ends: Vec<i64>,
    current: Option<(usize, usize, usize)>,
}

impl<E: Element + Tokenize + Default, S: Source<E>> DsvReader<E, S> {
    pub fn new(source: S, options: ParserOptions<E>, has_header: bool) -> Self {
        let ends_len = options.max_columns() + 1;
        DsvReader {
            options,
            source,
            buffer: vec![E::default(); DEFAULT_INITIAL_CAPACITY],
            read: 0,
            write: 0,
            max_capacity: DEFAULT_MAX_CAPACITY,
            eof: false,
            has_header,
            header_consumed: false,
            header: None,
            row_number: 0,
            // 1-based (§3): before any row is read, the cursor sits on line 1.
            line_number: 1,
            ends: vec![0i64; ends_len],
            current: None,
        }
    }

    /// Overrides the growth ceiling beyond which an oversized row fails
    /// with `RowTooLarge`. Must be called before the first `move_next`.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn options(&self) -> &ParserOptions<E> {
        &self.options
    }

    pub fn header(&self) -> Option<&HeaderIndex<E>> {
        self.header.as_ref()
    }

    pub fn current_row_number(&self) -> u64 {
        self.row_number
    }

    pub fn current_line_number(&self) -> u64 {
        self.line_number
    }

    /// Borrowed view over the row located by the last successful
    /// `move_next`. Invalidated (by construction, since it borrows `self`)
    /// by the next call to `move_next`.
    pub fn current(&self) -> Option<DsvRowView<'_, E>> {
        self.current
            .map(|(start, end, column_count)| DsvRowView::new(&self.buffer[start..end], &self.ends, column_count, &self.options))
    }

    /// Advances to the next row; `false` at EOF (§4.5).
    pub fn move_next(&mut self) -> Result<bool, Error> {
        loop {
            if self.read >= self.write && self.eof {
                self.current = None;
                return Ok(false);
            }
            if self.write - self.read < MIN_SCAN_WINDOW && !self.eof {
                self.compact();
                self.fill()?;
            }
            if self.read >= self.write {
                self.current = None;
                return Ok(false);
            }

            let window_start = self.read;
            let (result, terminator_found) = {
                let data = &self.buffer[self.read..self.write];
                let result = E::tokenize(data, &self.options, &mut self.ends).map_err(|e| {
                    e.with_coordinate(Coordinate {
                        row_number: Some(self.row_number + 1),
                        line_number: Some(self.line_number),
                        byte_offset: Some(self.read as u64),
                    })
                })?;
                // A lone `\r` landing exactly on the last element of the
                // window is ambiguous: it might be a bare CR terminator, or
                // the first half of a CRLF whose `\n` just hasn't been read
                // yet. Only trust it once EOF rules out the latter (mirrors
                // the teacher's `strategy/streaming.rs` buffer-boundary CR
                // handling).
                let ambiguous_trailing_cr = !self.eof
                    && result.chars_consumed == result.row_length + 1
                    && result.row_length + 1 == data.len()
                    && data[result.row_length] == E::CR;
                let terminator_found = result.row_length < data.len() && !ambiguous_trailing_cr;
                (result, terminator_found)
            };

            if !terminator_found && !self.eof {
                self.grow_or_refill()?;
                continue;
            }

            let row_start = window_start;
            let row_end = window_start + result.row_length;
            self.read += result.chars_consumed;
            self.line_number += result.newlines_consumed;

            if self.has_header && !self.header_consumed {
                self.header_consumed = true;
                let view = DsvRowView::new(&self.buffer[row_start..row_end], &self.ends, result.column_count, &self.options);
                let names: Vec<Vec<E>> = (0..result.column_count).map(|i| view.column(i).to_vec()).collect();
                self.header = Some(HeaderIndex::from_columns(names));
                self.row_number += 1;
                continue;
            }
            self.header_consumed = true;

            if result.column_count == 0 {
                // Comment row: consumed, but not yielded (§4.5).
                continue;
            }

            self.row_number += 1;
            self.current = Some((row_start, row_end, result.column_count));
            return Ok(true);
        }
    }

    fn compact(&mut self) {
        if self.read > 0 {
            self.buffer.copy_within(self.read..self.write, 0);
            self.write -= self.read;
            self.read = 0;
        }
    }

    fn fill(&mut self) -> Result<(), Error> {
        if self.eof {
            return Ok(());
        }
        while self.write < self.buffer.len() {
            let n = self.source.read(&mut self.buffer[self.write..])?;
            if n == 0 {
                self.eof = true;
                break;
            }
            self.write += n;
        }
        Ok(())
    }

    fn grow_or_refill(&mut self) -> Result<(), Error> {
        if self.write == self.buffer.len() {
            let new_capacity = (self.buffer.len() * 2).min(self.max_capacity);
            if new_capacity <= self.buffer.len() {
                return Err(Error::RowTooLarge {
                    coord: Coordinate {
                        row_number: Some(self.row_number + 1),
                        line_number: Some(self.line_number),
                        byte_offset: Some(self.read as u64),
                    },
                });
            }
            log::warn!(
                "row exceeded buffer capacity ({} elements); growing to {}",
                self.buffer.len(),
                new_capacity
            );
            self.buffer.resize(new_capacity, E::default());
        }
        self.compact();
        self.fill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SliceSource<'a> {
        data: &'a [u8],
        pos: usize,
        chunk: usize,
    }

    impl<'a> SliceSource<'a> {
        fn new(data: &'a [u8], chunk: usize) -> Self {
            SliceSource { data, pos: 0, chunk }
        }
    }

    impl<'a> Source<u8> for SliceSource<'a> {
        fn read(&mut self, into: &mut [u8]) -> Result<usize, Error> {
            let n = (self.data.len() - self.pos).min(into.len()).min(self.chunk);
            into[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn collect_rows(input: &[u8], chunk: usize, has_header: bool) -> Vec<Vec<Vec<u8>>> {
        let source = SliceSource::new(input, chunk);
        let options = ParserOptions::default();
        let mut reader = DsvReader::new(source, options, has_header);
        let mut rows = Vec::new();
        while reader.move_next().unwrap() {
            let view = reader.current().unwrap();
            rows.push((0..view.column_count()).map(|i| view.column(i).to_vec()).collect());
        }
        rows
    }

    #[test]
    fn reads_simple_rows_across_small_chunks() {
        let input = b"a,b,c\nd,e,f\n";
        let rows = collect_rows(input, 3, false);
        assert_eq!(rows, vec![vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()], vec![b"d".to_vec(), b"e".to_vec(), b"f".to_vec()]]);
    }

    #[test]
    fn header_row_is_consumed_not_yielded() {
        let input = b"id,name\n1,alice\n2,bob\n";
        let source = SliceSource::new(input, 5);
        let options = ParserOptions::default();
        let mut reader = DsvReader::new(source, options, true);
        assert!(reader.move_next().unwrap());
        // The header occupies row_number 1 internally (§4.5) but is never
        // yielded, so the first visible row is row_number 2.
        assert_eq!(reader.current_row_number(), 2);
        let header = reader.header().unwrap();
        assert_eq!(header.index_of(b"name"), Some(1));
        let view = reader.current().unwrap();
        assert_eq!(view.column(0), b"1");
    }

    #[test]
    fn comment_rows_are_skipped_but_count_toward_line_number() {
        let input = b"# a comment\na,b\n";
        let source = SliceSource::new(input, 4);
        let options = ParserOptions::builder().comment(Some(b'#')).build().unwrap();
        let mut reader = DsvReader::new(source, options, false);
        assert!(reader.move_next().unwrap());
        assert_eq!(reader.current_row_number(), 1);
        // 1-based (§3): starts at line 1, the comment row's newline and the
        // data row's newline each advance it by one → line 3.
        assert_eq!(reader.current_line_number(), 3);
    }

    #[test]
    fn row_spanning_many_refills_still_parses() {
        let long_field = "x".repeat(10_000);
        let input = format!("{long_field},short\n");
        let rows = collect_rows(input.as_bytes(), 7, false);
        assert_eq!(rows[0][0].len(), 10_000);
        assert_eq!(rows[0][1], b"short");
    }

    #[test]
    fn no_trailing_newline_on_last_row_is_still_returned_at_eof() {
        let input = b"a,b\nc,d";
        let rows = collect_rows(input, 2, false);
        assert_eq!(rows, vec![vec![b"a".to_vec(), b"b".to_vec()], vec![b"c".to_vec(), b"d".to_vec()]]);
    }

    #[test]
    fn crlf_split_across_buffer_boundary_is_not_misparsed() {
        // A lone `\r` landing exactly on the last element of the initial
        // buffer window must not be accepted as a bare-CR terminator until
        // the following byte (possibly the CRLF's `\n`) has actually been
        // read — otherwise the reader emits a spurious empty row for the
        // leading `\n` of the next fill.
        let prefix_len = DEFAULT_INITIAL_CAPACITY - 1;
        let mut input = vec![b'x'; prefix_len];
        input.push(b'\r');
        input.extend_from_slice(b"\nrest\n");
        let rows = collect_rows(&input, 4096, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0][0].len(), prefix_len);
        assert_eq!(rows[1], vec![b"rest".to_vec()]);
    }

    #[test]
    fn oversized_row_fails_with_row_too_large() {
        // Exercises the `log::warn!` in `grow_or_refill`; run with
        // `RUST_LOG=dsvscan=warn` to see it.
        let _ = env_logger::try_init();
        let long_field = "x".repeat(1_000_000);
        let input = format!("{long_field}\n");
        let source = SliceSource::new(input.as_bytes(), 64 * 1024);
        let options = ParserOptions::default();
        let mut reader = DsvReader::new(source, options, false).with_max_capacity(128 * 1024);
        let err = reader.move_next().unwrap_err();
        assert!(matches!(err, Error::RowTooLarge { .. }));
    }
}
