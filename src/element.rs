//! The code-unit axis: parsers are generic over `u8` (byte mode) and `u16`
//! (UTF-16 code-unit mode). This is one of the three compile-time
//! specialization axes called for by the tokenizer design (the others are
//! quote-policy and line-tracking, see `dsv::tokenizer`).

/// A single code unit the tokenizer operates on.
///
/// Implemented for `u8` (byte-mode, UTF-8 input passed through verbatim) and
/// `u16` (UTF-16 code-unit mode). The associated constants give each
/// implementation the ASCII control characters the state machine tests
/// against; for `u16` these are just the code points, not an encoding
/// concern of this crate (§1: "does not perform character-set conversion").
pub trait Element: Copy + Eq + PartialEq + 'static {
    const COMMA: Self;
    const QUOTE: Self;
    const LF: Self;
    const CR: Self;
    const SPACE: Self;
    const TAB: Self;

    /// Whether this element type has a SIMD scanning fast path in this crate.
    /// Only `u8` does; see `DESIGN.md` for why `u16` always takes the scalar
    /// tail.
    const HAS_SIMD: bool;

    /// The element's numeric code point, used by the typed column parsers
    /// (`dsv::typed`) to recognize ASCII digits/signs without ever decoding
    /// the slice into a `str`.
    fn to_u32(self) -> u32;
}

impl Element for u8 {
    const COMMA: Self = b',';
    const QUOTE: Self = b'"';
    const LF: Self = b'\n';
    const CR: Self = b'\r';
    const SPACE: Self = b' ';
    const TAB: Self = b'\t';
    const HAS_SIMD: bool = true;

    fn to_u32(self) -> u32 {
        self as u32
    }
}

impl Element for u16 {
    const COMMA: Self = b',' as u16;
    const QUOTE: Self = b'"' as u16;
    const LF: Self = b'\n' as u16;
    const CR: Self = b'\r' as u16;
    const SPACE: Self = b' ' as u16;
    const TAB: Self = b'\t' as u16;
    const HAS_SIMD: bool = false;

    fn to_u32(self) -> u32 {
        self as u32
    }
}
