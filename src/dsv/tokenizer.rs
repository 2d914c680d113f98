//! The DSV row tokenizer (C3): a single-row state machine that locates
//! column and row boundaries while honoring quoting, escaping, comments and
//! configurable limits (§4.2).
//!
//! Grounded on the teacher's scalar state machine in
//! `strategy/direct.rs::parse_row_cow_with_config` for the
//! FieldStart/InField/InQuote/AfterClosingQuote transitions, and on
//! `core/simd_scanner.rs` for the vectorized delimiter/line-end scan and its
//! carry-propagating quote handling.
//!
//! Three axes are specialized at compile time via marker types (§4.2,
//! §9 "Compile-time specialization via marker types"): element type
//! (`u8`/`u16`, see `crate::element`), quote policy (`QuotesOn`/`QuotesOff`)
//! and line-number tracking (`TrackLines`/`NoLineTracking`). Together with
//! the element axis that yields the eight specialized tokenizers the design
//! calls for; `tokenize_bytes`/`tokenize_units` pick the right
//! monomorphization at runtime from `ParserOptions`.

use crate::element::Element;
use crate::error::{Coordinate, Error};
use crate::options::ParserOptions;

/// Output of tokenizing one logical row (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowParseResult {
    pub column_count: usize,
    pub row_length: usize,
    pub chars_consumed: usize,
    pub newlines_consumed: u64,
}

impl RowParseResult {
    const fn empty() -> Self {
        RowParseResult {
            column_count: 0,
            row_length: 0,
            chars_consumed: 0,
            newlines_consumed: 0,
        }
    }
}

/// Compile-time quote-policy axis.
pub trait QuotePolicy {
    const ENABLED: bool;
}
pub struct QuotesOn;
pub struct QuotesOff;
impl QuotePolicy for QuotesOn {
    const ENABLED: bool = true;
}
impl QuotePolicy for QuotesOff {
    const ENABLED: bool = false;
}

/// Compile-time line-tracking axis.
pub trait LineTracking {
    const TRACK: bool;
}
pub struct TrackLines;
pub struct NoLineTracking;
impl LineTracking for TrackLines {
    const TRACK: bool = true;
}
impl LineTracking for NoLineTracking {
    const TRACK: bool = false;
}

/// Internal extension of `Element` that knows whether — and how — to try a
/// SIMD fast path. Only `u8` overrides it; `u16` always takes the scalar
/// state machine (see `DESIGN.md`).
trait ElementScan: Element {
    fn try_simd_tokenize<L: LineTracking>(
        data: &[Self],
        options: &ParserOptions<Self>,
        ends: &mut [i64],
    ) -> Option<Result<RowParseResult, Error>>;
}

impl ElementScan for u8 {
    fn try_simd_tokenize<L: LineTracking>(
        data: &[u8],
        options: &ParserOptions<u8>,
        ends: &mut [i64],
    ) -> Option<Result<RowParseResult, Error>> {
        if options.escape().is_some() || !options.use_simd() {
            return None;
        }
        if options.quoting_enabled() && data.contains(&options.quote()) {
            // A quote byte is present: the SIMD path assumes well-formed
            // RFC-4180 quoting (quotes only open at field starts). The
            // scalar state machine is the only implementation of the
            // non-strict "quote mid-field is literal" rule (§9 open
            // question), so fall back whenever a quote is anywhere in the
            // row. This keeps law R4 true by construction rather than by
            // parity between two independent quote-aware implementations.
            return None;
        }
        Some(crate::scan::simd::tokenize_plain_row::<L>(data, options, ends))
    }
}

impl ElementScan for u16 {
    fn try_simd_tokenize<L: LineTracking>(
        _data: &[u16],
        _options: &ParserOptions<u16>,
        _ends: &mut [i64],
    ) -> Option<Result<RowParseResult, Error>> {
        None
    }
}

/// Runtime dispatcher for byte-mode input: picks the right
/// quote-policy/line-tracking monomorphization from `options`.
pub fn tokenize_bytes(
    data: &[u8],
    options: &ParserOptions<u8>,
    ends: &mut [i64],
) -> Result<RowParseResult, Error> {
    match (options.quoting_enabled(), options.track_line_numbers()) {
        (true, true) => tokenize_row::<u8, QuotesOn, TrackLines>(data, options, ends),
        (true, false) => tokenize_row::<u8, QuotesOn, NoLineTracking>(data, options, ends),
        (false, true) => tokenize_row::<u8, QuotesOff, TrackLines>(data, options, ends),
        (false, false) => tokenize_row::<u8, QuotesOff, NoLineTracking>(data, options, ends),
    }
}

/// Lets generic callers (the stream driver) dispatch to `tokenize_bytes`/
/// `tokenize_units` without knowing at the call site which `Element` they
/// hold.
pub trait Tokenize: Element {
    fn tokenize(data: &[Self], options: &ParserOptions<Self>, ends: &mut [i64]) -> Result<RowParseResult, Error>;
}

impl Tokenize for u8 {
    fn tokenize(data: &[u8], options: &ParserOptions<u8>, ends: &mut [i64]) -> Result<RowParseResult, Error> {
        tokenize_bytes(data, options, ends)
    }
}

impl Tokenize for u16 {
    fn tokenize(data: &[u16], options: &ParserOptions<u16>, ends: &mut [i64]) -> Result<RowParseResult, Error> {
        tokenize_units(data, options, ends)
    }
}

/// Runtime dispatcher for UTF-16 code-unit-mode input.
pub fn tokenize_units(
    data: &[u16],
    options: &ParserOptions<u16>,
    ends: &mut [i64],
) -> Result<RowParseResult, Error> {
    match (options.quoting_enabled(), options.track_line_numbers()) {
        (true, true) => tokenize_row::<u16, QuotesOn, TrackLines>(data, options, ends),
        (true, false) => tokenize_row::<u16, QuotesOn, NoLineTracking>(data, options, ends),
        (false, true) => tokenize_row::<u16, QuotesOff, TrackLines>(data, options, ends),
        (false, false) => tokenize_row::<u16, QuotesOff, NoLineTracking>(data, options, ends),
    }
}

/// Generic entry point: dead-code-eliminates quote/line-tracking branches
/// per the `Q`/`L` markers, tries the SIMD fast path, and falls back to the
/// scalar state machine.
pub fn tokenize_row<E: ElementScan, Q: QuotePolicy, L: LineTracking>(
    data: &[E],
    options: &ParserOptions<E>,
    ends: &mut [i64],
) -> Result<RowParseResult, Error> {
    debug_assert_eq!(Q::ENABLED, options.quoting_enabled());
    debug_assert_eq!(L::TRACK, options.track_line_numbers());

    if data.is_empty() {
        return Ok(RowParseResult::empty());
    }

    if let Some(comment) = options.comment() {
        if let Some(result) = comment_row::<E>(data, comment) {
            return Ok(result);
        }
    }

    match E::try_simd_tokenize::<L>(data, options, ends) {
        Some(result) => result,
        None => scalar_tokenize_row::<E, Q, L>(data, options, ends),
    }
}

/// Comment-row check (§4.2): only evaluated when a comment marker is set.
/// Returns `None` (not a comment row) or `Some(result)` with
/// `column_count == 0`.
fn comment_row<E: Element>(data: &[E], comment: E) -> Option<RowParseResult> {
    let n = data.len();
    let mut i = 0;
    while i < n && (data[i] == E::SPACE || data[i] == E::TAB) {
        i += 1;
    }
    if i >= n || data[i] != comment {
        return None;
    }
    let (row_length, terminator_len, has_lf) = find_terminator(data, 0);
    let chars_consumed = row_length + terminator_len;
    Some(RowParseResult {
        column_count: 0,
        row_length,
        chars_consumed,
        newlines_consumed: has_lf as u64,
    })
}

/// Find the first row terminator at or after `from`. Returns
/// `(row_length, terminator_len, terminator_includes_lf)`. `row_length`
/// equals `data.len()` and `terminator_len == 0` when no terminator is
/// found before EOF.
fn find_terminator<E: Element>(data: &[E], from: usize) -> (usize, usize, bool) {
    let n = data.len();
    let mut i = from;
    while i < n {
        if data[i] == E::LF {
            return (i, 1, true);
        }
        if data[i] == E::CR {
            if i + 1 < n && data[i + 1] == E::LF {
                return (i, 2, true);
            }
            return (i, 1, false);
        }
        i += 1;
    }
    (n, 0, false)
}

#[inline]
fn count_lf<E: Element>(data: &[E]) -> u64 {
    data.iter().filter(|&&c| c == E::LF).count() as u64
}

enum State {
    FieldStart,
    InField,
    InQuote,
    AfterClosingQuote,
}

/// The scalar state machine (§4.2), generic over element type, quote
/// policy, and line-number tracking.
fn scalar_tokenize_row<E: Element, Q: QuotePolicy, L: LineTracking>(
    data: &[E],
    options: &ParserOptions<E>,
    ends: &mut [i64],
) -> Result<RowParseResult, Error> {
    let n = data.len();
    ends[0] = -1;
    let mut column_count: usize = 0;
    let mut field_start: usize = 0;
    let mut quote_open_pos: Option<usize> = None;
    let mut state = State::FieldStart;
    let mut newline_count: u64 = 0;
    let mut i: usize = 0;

    let delimiter = options.delimiter();
    let quote = options.quote();
    let escape = options.escape();

    macro_rules! push_end {
        ($pos:expr) => {{
            let pos = $pos;
            if column_count + 1 > options.max_columns() {
                return Err(Error::TooManyColumns {
                    max_columns: options.max_columns(),
                    coord: Coordinate::at_offset(pos as u64),
                });
            }
            if let Some(max_len) = options.max_field_length() {
                if pos - field_start > max_len {
                    return Err(Error::FieldTooLong {
                        max_field_length: max_len,
                        coord: Coordinate::at_offset(field_start as u64),
                    });
                }
            }
            if column_count + 1 >= ends.len() {
                return Err(Error::TooManyColumns {
                    max_columns: options.max_columns(),
                    coord: Coordinate::at_offset(pos as u64),
                });
            }
            ends[column_count + 1] = pos as i64;
            column_count += 1;
        }};
    }

    let (row_length, terminator_len) = loop {
        if i >= n {
            break (n, 0);
        }
        let c = data[i];
        match state {
            State::FieldStart => {
                if Q::ENABLED && c == quote {
                    quote_open_pos = Some(i);
                    state = State::InQuote;
                    i += 1;
                } else if c == delimiter {
                    push_end!(i);
                    i += 1;
                    field_start = i;
                } else if c == E::LF {
                    break (i, 1);
                } else if c == E::CR {
                    if i + 1 < n && data[i + 1] == E::LF {
                        break (i, 2);
                    }
                    break (i, 1);
                } else if let Some(e) = escape {
                    if c == e {
                        i = if i + 1 < n { i + 2 } else { i + 1 };
                    } else {
                        i += 1;
                    }
                    state = State::InField;
                } else {
                    i += 1;
                    state = State::InField;
                }
            }
            State::InField => {
                if c == delimiter {
                    push_end!(i);
                    i += 1;
                    field_start = i;
                    state = State::FieldStart;
                } else if c == E::LF {
                    break (i, 1);
                } else if c == E::CR {
                    if i + 1 < n && data[i + 1] == E::LF {
                        break (i, 2);
                    }
                    break (i, 1);
                } else if let Some(e) = escape {
                    if c == e {
                        i = if i + 1 < n { i + 2 } else { i + 1 };
                    } else {
                        i += 1;
                    }
                } else {
                    // Non-strict reading (§9): a quote appearing mid-field
                    // (not at FieldStart) is a literal character, never a
                    // toggle into quoted mode.
                    i += 1;
                }
            }
            State::InQuote => {
                if Q::ENABLED && c == quote {
                    if i + 1 < n && data[i + 1] == quote {
                        i += 2; // doubled quote: literal quote character
                    } else {
                        state = State::AfterClosingQuote;
                        i += 1;
                    }
                } else if c == E::LF || c == E::CR {
                    if !options.newlines_in_quotes_allowed() {
                        return Err(Error::NewlineInQuote {
                            coord: Coordinate::at_offset(i as u64),
                        });
                    }
                    if c == E::CR && i + 1 < n && data[i + 1] == E::LF {
                        if L::TRACK {
                            newline_count += 1;
                        }
                        i += 2;
                    } else {
                        if c == E::LF && L::TRACK {
                            newline_count += 1;
                        }
                        i += 1;
                    }
                } else {
                    i += 1;
                }
            }
            State::AfterClosingQuote => {
                if c == delimiter {
                    push_end!(i);
                    i += 1;
                    field_start = i;
                    state = State::FieldStart;
                } else if c == E::LF {
                    break (i, 1);
                } else if c == E::CR {
                    if i + 1 < n && data[i + 1] == E::LF {
                        break (i, 2);
                    }
                    break (i, 1);
                } else {
                    // Lenient (§9): any other code unit after a closing
                    // quote is accepted and the field simply continues.
                    i += 1;
                    state = State::InField;
                }
            }
        }
    };

    if matches!(state, State::InQuote) {
        return Err(Error::UnterminatedQuote {
            opening_quote_offset: quote_open_pos.unwrap_or(0) as u64,
            coord: Coordinate::at_offset(quote_open_pos.unwrap_or(0) as u64),
        });
    }

    // The last column is always appended, even if empty (§4.2).
    push_end!(row_length);

    let chars_consumed = row_length + terminator_len;
    let newlines_consumed = if L::TRACK {
        newline_count
            + match terminator_len {
                2 => 1,
                1 if row_length < n && data[row_length] == E::LF => 1,
                _ => 0,
            }
    } else {
        count_lf(&data[..chars_consumed])
    };

    Ok(RowParseResult {
        column_count,
        row_length,
        chars_consumed,
        newlines_consumed,
    })
}
