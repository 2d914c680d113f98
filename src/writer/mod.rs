//! The writer core (C7): the round-trip partner of the DSV tokenizer.

pub mod csv_writer;

pub use csv_writer::{DsvWriter, Sink};
