//! Fixed-width positional records (C5): a validated field layout and a
//! borrowed row view over one record, with alignment-aware pad trimming.

pub mod layout;
pub mod row;

pub use layout::{Alignment, FieldLayout, RecordLayout, RecordLayoutBuilder};
pub use row::FixedWidthRowView;
