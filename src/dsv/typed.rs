//! Typed column parsers (§4.3): integer, float and boolean parsing operate
//! directly on the borrowed column slice via `Element::to_u32`, with no
//! interim string allocation. `try_datetime`/`try_timezone` need `chrono`,
//! which is `str`-based, so they are only available in byte mode (`u8`);
//! see `DESIGN.md` for that tradeoff.

use crate::dsv::row::DsvRowView;
use crate::element::Element;
use crate::error::{Coordinate, Error};

fn parse_err(message: impl Into<String>) -> Error {
    Error::ParseError {
        message: message.into(),
        coord: Coordinate::none(),
    }
}

const PLUS: u32 = b'+' as u32;
const MINUS: u32 = b'-' as u32;
const DOT: u32 = b'.' as u32;
const ZERO: u32 = b'0' as u32;
const NINE: u32 = b'9' as u32;

fn digit<E: Element>(c: E) -> Option<u32> {
    let v = c.to_u32();
    if (ZERO..=NINE).contains(&v) {
        Some(v - ZERO)
    } else {
        None
    }
}

fn parse_signed<E: Element>(slice: &[E]) -> Result<i64, Error> {
    if slice.is_empty() {
        return Err(parse_err("empty field"));
    }
    let mut i = 0;
    let negative = match slice[0].to_u32() {
        MINUS => {
            i = 1;
            true
        }
        PLUS => {
            i = 1;
            false
        }
        _ => false,
    };
    if i == slice.len() {
        return Err(parse_err("no digits"));
    }
    let mut value: i64 = 0;
    for &c in &slice[i..] {
        let d = digit(c).ok_or_else(|| parse_err("non-digit character"))?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(d as i64))
            .ok_or_else(|| parse_err("integer overflow"))?;
    }
    Ok(if negative { -value } else { value })
}

fn parse_unsigned<E: Element>(slice: &[E]) -> Result<u64, Error> {
    if slice.is_empty() {
        return Err(parse_err("empty field"));
    }
    let mut value: u64 = 0;
    for &c in slice {
        let d = digit(c).ok_or_else(|| parse_err("non-digit character"))?;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(d as u64))
            .ok_or_else(|| parse_err("integer overflow"))?;
    }
    Ok(value)
}

fn parse_double<E: Element>(slice: &[E]) -> Result<f64, Error> {
    if slice.is_empty() {
        return Err(parse_err("empty field"));
    }
    let mut i = 0;
    let n = slice.len();
    let negative = match slice[0].to_u32() {
        MINUS => {
            i = 1;
            true
        }
        PLUS => {
            i = 1;
            false
        }
        _ => false,
    };
    let mut int_part: f64 = 0.0;
    let mut saw_digit = false;
    while i < n {
        match digit(slice[i]) {
            Some(d) => {
                int_part = int_part * 10.0 + d as f64;
                saw_digit = true;
                i += 1;
            }
            None => break,
        }
    }
    let mut frac_part: f64 = 0.0;
    if i < n && slice[i].to_u32() == DOT {
        i += 1;
        let mut scale = 0.1;
        while i < n {
            match digit(slice[i]) {
                Some(d) => {
                    frac_part += d as f64 * scale;
                    scale *= 0.1;
                    saw_digit = true;
                    i += 1;
                }
                None => break,
            }
        }
    }
    if !saw_digit {
        return Err(parse_err("no digits"));
    }
    let mut mantissa = int_part + frac_part;
    if negative {
        mantissa = -mantissa;
    }
    if i == n {
        return Ok(mantissa);
    }
    let exp_marker = slice[i].to_u32();
    if exp_marker != b'e' as u32 && exp_marker != b'E' as u32 {
        return Err(parse_err("trailing characters after numeric field"));
    }
    i += 1;
    if i >= n {
        return Err(parse_err("missing exponent digits"));
    }
    let exp_negative = match slice[i].to_u32() {
        MINUS => {
            i += 1;
            true
        }
        PLUS => {
            i += 1;
            false
        }
        _ => false,
    };
    if i >= n {
        return Err(parse_err("missing exponent digits"));
    }
    let mut exponent: i32 = 0;
    let mut saw_exp_digit = false;
    while i < n {
        let d = digit(slice[i]).ok_or_else(|| parse_err("non-digit exponent"))?;
        exponent = exponent * 10 + d as i32;
        saw_exp_digit = true;
        i += 1;
    }
    if !saw_exp_digit {
        return Err(parse_err("missing exponent digits"));
    }
    if exp_negative {
        exponent = -exponent;
    }
    Ok(mantissa * 10f64.powi(exponent))
}

fn parse_bool<E: Element>(slice: &[E]) -> Result<bool, Error> {
    fn eq_ascii_ci<E: Element>(slice: &[E], word: &str) -> bool {
        if slice.len() != word.len() {
            return false;
        }
        slice
            .iter()
            .zip(word.bytes())
            .all(|(&c, b)| (c.to_u32() | 0x20) == (b as u32 | 0x20))
    }
    if slice.len() == 1 && digit(slice[0]) == Some(1) {
        return Ok(true);
    }
    if slice.len() == 1 && digit(slice[0]) == Some(0) {
        return Ok(false);
    }
    if eq_ascii_ci(slice, "true") {
        return Ok(true);
    }
    if eq_ascii_ci(slice, "false") {
        return Ok(false);
    }
    Err(parse_err("not a recognized boolean literal"))
}

impl<'a, E: Element> DsvRowView<'a, E> {
    pub fn try_int32(&self, i: usize) -> Result<i32, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        let v = parse_signed(&slice)?;
        i32::try_from(v).map_err(|_| parse_err("integer overflow"))
    }

    pub fn try_uint32(&self, i: usize) -> Result<u32, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        let v = parse_unsigned(&slice)?;
        u32::try_from(v).map_err(|_| parse_err("integer overflow"))
    }

    pub fn try_int64(&self, i: usize) -> Result<i64, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        parse_signed(&slice)
    }

    pub fn try_uint64(&self, i: usize) -> Result<u64, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        parse_unsigned(&slice)
    }

    pub fn try_double(&self, i: usize) -> Result<f64, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        parse_double(&slice)
    }

    pub fn try_bool(&self, i: usize) -> Result<bool, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        parse_bool(&slice)
    }
}

impl<'a> DsvRowView<'a, u8> {
    /// Parse column `i` as a `NaiveDateTime`. `format` follows `chrono`'s
    /// `strftime`-style syntax; defaults to RFC 3339 when omitted. `locale`
    /// is accepted for interface parity with §4.3 but currently unused —
    /// `chrono` has no locale-aware parsing (see `DESIGN.md`).
    pub fn try_datetime(
        &self,
        i: usize,
        format: Option<&str>,
        _locale: Option<&str>,
    ) -> Result<chrono::NaiveDateTime, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        let text = std::str::from_utf8(&slice).map_err(|_| parse_err("column is not valid UTF-8"))?;
        match format {
            Some(fmt) => chrono::NaiveDateTime::parse_from_str(text, fmt)
                .map_err(|e| parse_err(format!("datetime parse failure: {e}"))),
            None => text
                .parse::<chrono::DateTime<chrono::FixedOffset>>()
                .map(|dt| dt.naive_utc())
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
                .map_err(|e| parse_err(format!("datetime parse failure: {e}"))),
        }
    }

    /// Parse column `i` as a fixed UTC offset (e.g. `+05:30`, `Z`).
    pub fn try_timezone(&self, i: usize) -> Result<chrono::FixedOffset, Error> {
        let slice = self.decoded(i).ok_or_else(|| parse_err("column out of range"))?;
        let text = std::str::from_utf8(&slice).map_err(|_| parse_err("column is not valid UTF-8"))?;
        if text == "Z" || text == "z" {
            #[allow(clippy::expect_used)]
            return Ok(chrono::FixedOffset::east_opt(0).expect("zero offset is always valid"));
        }
        let dummy = format!("2000-01-01T00:00:00{text}");
        chrono::DateTime::parse_from_str(&dummy, "%Y-%m-%dT%H:%M:%S%z")
            .map(|dt| *dt.offset())
            .map_err(|e| parse_err(format!("timezone parse failure: {e}")))
    }
}
