//! DSV row tokenization and views (C3, C4): turn a buffer containing one
//! logical row into column boundaries (`tokenizer`), then a typed,
//! zero-copy view over those columns (`row`, `typed`).

pub mod row;
pub mod tokenizer;
pub mod typed;

pub use row::{DsvRowView, HeaderIndex, OwnedRowAllocator, RowAllocator};
pub use tokenizer::{
    tokenize_bytes, tokenize_row, tokenize_units, LineTracking, NoLineTracking, QuotePolicy,
    QuotesOff, QuotesOn, RowParseResult, Tokenize, TrackLines,
};
