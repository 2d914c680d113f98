//! The stream driver (C6): a pull-based cursor over rows read from a
//! `Source`, with buffer refill, row-boundary alignment and growable
//! oversized-row handling.

pub mod reader;

pub use reader::{DsvReader, Source};
