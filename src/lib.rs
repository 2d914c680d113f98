#![feature(portable_simd)]
// Fallible paths use Result + `?`; panics are reserved for caller contract
// violations (e.g. out-of-range `column()` access), never malformed input.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Zero-copy, SIMD-accelerated parsing and writing for two tabular text
//! formats: RFC-4180-style delimiter-separated values and positional
//! fixed-width records.
//!
//! The crate does not own input memory, does not materialize a parsed
//! table, and does not perform character-set conversion — callers choose
//! byte mode (`u8`) or UTF-16 code-unit mode (`u16`) and pass buffers they
//! own. Rows are exposed as borrowed views over the caller's buffer; the
//! only allocations on the read path are the reader's own growable scratch
//! buffer and whatever a `RowAllocator` is asked to materialize.
//!
//! ```text
//! bytes -> stream::DsvReader buffers a window
//!       -> dsv::tokenizer finds column/row boundaries
//!       -> dsv::DsvRowView borrows the slice + offsets
//!       -> caller extracts/parses fields
//!       -> reader advances and refills as needed
//! ```
//!
//! Fixed-width records (`fixed_width`) and the writer (`writer`) are the
//! positional and round-trip counterparts of the same data model.

pub mod dsv;
pub mod element;
pub mod error;
pub mod fixed_width;
pub mod options;
pub mod scan;
pub mod stream;
pub mod writer;

pub use dsv::{DsvRowView, HeaderIndex, OwnedRowAllocator, RowAllocator, RowParseResult};
pub use element::Element;
pub use error::{Coordinate, Error, Result};
pub use fixed_width::{Alignment, FieldLayout, FixedWidthRowView, RecordLayout};
pub use options::{ParserOptions, ParserOptionsBuilder, RowTerminator, WriterOptions};
pub use stream::{DsvReader, Source};
pub use writer::{DsvWriter, Sink};
