//! The writer core (C7, §4.6): the round-trip partner of the tokenizer.
//!
//! Grounded on the teacher's `strategy/encode.rs` (`field_needs_quoting_simd`,
//! `write_quoted_field`): a SIMD "does this field need quoting" scan
//! followed by a scalar emit-with-doubled-quotes pass. The teacher's
//! AVX2/16-byte tiering collapses here to the single 32-byte lane used
//! throughout this crate (`scan::LANE_WIDTH`), reusing the same primitives
//! C2 gives the tokenizer.

use crate::element::Element;
use crate::error::Error;
use crate::options::WriterOptions;
use crate::scan::{compare_eq_lane, mask_to_bits, LANE_WIDTH};
use std::simd::prelude::*;

/// External sink (§6): `write(from) -> bytes_written`, mirroring
/// `std::io::Write`.
pub trait Sink<E> {
    fn write(&mut self, from: &[E]) -> Result<usize, Error>;
    fn flush(&mut self) -> Result<(), Error>;
}

impl<W: std::io::Write> Sink<u8> for W {
    fn write(&mut self, from: &[u8]) -> Result<usize, Error> {
        std::io::Write::write(self, from).map_err(Error::from)
    }
    fn flush(&mut self) -> Result<(), Error> {
        std::io::Write::flush(self).map_err(Error::from)
    }
}

/// Buffered row writer. Emits rows such that, for any `ParserOptions` `O`
/// with `quoting_enabled`, the tokenizer under `O` reconstructs the columns
/// exactly (round-trip law, §8).
pub struct DsvWriter<E: Element, S> {
    options: WriterOptions<E>,
    sink: S,
    buffer: Vec<E>,
    flush_threshold: usize,
}

impl<E: Element + QuoteScan, S: Sink<E>> DsvWriter<E, S> {
    pub fn new(sink: S, options: WriterOptions<E>) -> Self {
        DsvWriter {
            options,
            sink,
            buffer: Vec::with_capacity(64 * 1024),
            flush_threshold: 64 * 1024,
        }
    }

    /// Write one row. `columns` are written verbatim except where quoting
    /// is required (§4.6).
    pub fn write_row<'a>(&mut self, columns: impl IntoIterator<Item = &'a [E]>) -> Result<(), Error>
    where
        E: 'a,
    {
        let mut first = true;
        for column in columns {
            if !first {
                self.buffer.push(self.options.delimiter);
            }
            first = false;
            self.write_column(column);
        }
        self.buffer.extend_from_slice(terminator_elements::<E>(self.options.terminator).as_slice());
        self.maybe_flush()
    }

    fn write_column(&mut self, field: &[E]) {
        if self.options.quoting_enabled && field_needs_quoting(field, &self.options) {
            self.buffer.push(self.options.quote);
            for &c in field {
                self.buffer.push(c);
                if c == self.options.quote {
                    self.buffer.push(self.options.quote);
                }
            }
            self.buffer.push(self.options.quote);
        } else {
            self.buffer.extend_from_slice(field);
        }
    }

    fn maybe_flush(&mut self) -> Result<(), Error> {
        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Flush the internal buffer to the sink. The writer never flushes
    /// implicitly beyond the threshold in `write_row`; callers must call
    /// this explicitly to guarantee all data has reached the sink (§4.6).
    pub fn flush(&mut self) -> Result<(), Error> {
        let mut written = 0;
        while written < self.buffer.len() {
            let n = self.sink.write(&self.buffer[written..])?;
            if n == 0 {
                return Err(Error::IoFailed {
                    source: std::io::Error::new(std::io::ErrorKind::WriteZero, "sink accepted zero bytes"),
                });
            }
            written += n;
        }
        self.buffer.clear();
        self.sink.flush()
    }
}

fn terminator_elements<E: Element>(terminator: crate::options::RowTerminator) -> Vec<E> {
    terminator
        .bytes()
        .iter()
        .map(|&b| if b == b'\r' { E::CR } else { E::LF })
        .collect()
}

/// Lets `field_needs_quoting` reach for the SIMD scan without downcasting:
/// only `u8` overrides it, same pattern as `dsv::tokenizer::ElementScan`.
trait QuoteScan: Element {
    fn needs_quoting_fast(field: &[Self], delimiter: Self, quote: Self) -> Option<bool>;
}

impl QuoteScan for u8 {
    fn needs_quoting_fast(field: &[u8], delimiter: u8, quote: u8) -> Option<bool> {
        Some(field_needs_quoting_simd(field, delimiter, quote))
    }
}

impl QuoteScan for u16 {
    fn needs_quoting_fast(_field: &[u16], _delimiter: u16, _quote: u16) -> Option<bool> {
        None
    }
}

fn field_needs_quoting<E: QuoteScan>(field: &[E], options: &WriterOptions<E>) -> bool {
    E::needs_quoting_fast(field, options.delimiter, options.quote)
        .unwrap_or_else(|| field_needs_quoting_scalar(field, options))
}

fn field_needs_quoting_simd(field: &[u8], delimiter: u8, quote: u8) -> bool {
    let mut pos = 0;
    let len = field.len();
    while pos + LANE_WIDTH <= len {
        let chunk = Simd::<u8, LANE_WIDTH>::from_slice(&field[pos..pos + LANE_WIDTH]);
        let hits = compare_eq_lane(chunk, delimiter)
            | compare_eq_lane(chunk, quote)
            | compare_eq_lane(chunk, b'\n')
            | compare_eq_lane(chunk, b'\r');
        if mask_to_bits(hits) != 0 {
            return true;
        }
        pos += LANE_WIDTH;
    }
    field[pos..].iter().any(|&b| b == delimiter || b == quote || b == b'\n' || b == b'\r')
}

fn field_needs_quoting_scalar<E: Element>(field: &[E], options: &WriterOptions<E>) -> bool {
    field
        .iter()
        .any(|&c| c == options.delimiter || c == options.quote || c == E::LF || c == E::CR)
}
