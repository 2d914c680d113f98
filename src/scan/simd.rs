//! The "no quotes present" SIMD fast path (§4.2): a pure delimiter/line-end
//! scan with no quote-masking at all. Only reachable when the caller
//! (`dsv::tokenizer::ElementScan::try_simd_tokenize`) has already
//! established that either quoting is disabled or no quote byte occurs in
//! the row, so its output is byte-identical to the scalar state machine by
//! construction rather than by parity of two implementations.
//!
//! Grounded on the teacher's `core/simd_scanner.rs::scan_structural`
//! chunk-at-a-time bitmask extraction, simplified to drop quote handling
//! entirely since this path never needs it.

use crate::dsv::tokenizer::{LineTracking, RowParseResult};
use crate::error::{Coordinate, Error};
use crate::options::ParserOptions;
use crate::scan::{clear_lowest_bit, compare_eq_lane, mask_to_bits, trailing_zero, LANE_WIDTH};
use std::simd::prelude::*;

pub fn tokenize_plain_row<L: LineTracking>(
    data: &[u8],
    options: &ParserOptions<u8>,
    ends: &mut [i64],
) -> Result<RowParseResult, Error> {
    let delimiter = options.delimiter();
    let n = data.len();
    let mut column_count = 0usize;
    let mut pos = 0usize;
    ends[0] = -1;

    macro_rules! push_end {
        ($p:expr) => {{
            let p = $p;
            if column_count + 1 > options.max_columns() || column_count + 1 >= ends.len() {
                return Err(Error::TooManyColumns {
                    max_columns: options.max_columns(),
                    coord: Coordinate::at_offset(p as u64),
                });
            }
            if let Some(max_len) = options.max_field_length() {
                let field_start = if column_count == 0 {
                    0
                } else {
                    (ends[column_count] + 1) as usize
                };
                if p - field_start > max_len {
                    return Err(Error::FieldTooLong {
                        max_field_length: max_len,
                        coord: Coordinate::at_offset(field_start as u64),
                    });
                }
            }
            ends[column_count + 1] = p as i64;
            column_count += 1;
        }};
    }

    let (row_length, terminator_len) = 'outer: loop {
        if pos + LANE_WIDTH <= n {
            let chunk = Simd::<u8, LANE_WIDTH>::from_slice(&data[pos..pos + LANE_WIDTH]);
            let delim_bits = mask_to_bits(compare_eq_lane(chunk, delimiter));
            let lf_bits = mask_to_bits(compare_eq_lane(chunk, b'\n'));
            let cr_bits = mask_to_bits(compare_eq_lane(chunk, b'\r'));
            let mut structural = delim_bits | lf_bits | cr_bits;
            if structural == 0 {
                pos += LANE_WIDTH;
                continue;
            }
            while structural != 0 {
                let bit = trailing_zero(structural);
                let idx = pos + bit as usize;
                let bit_mask = 1u32 << bit;
                if lf_bits & bit_mask != 0 {
                    break 'outer (idx, 1);
                }
                if cr_bits & bit_mask != 0 {
                    if idx + 1 < n && data[idx + 1] == b'\n' {
                        break 'outer (idx, 2);
                    }
                    break 'outer (idx, 1);
                }
                push_end!(idx);
                structural = clear_lowest_bit(structural);
            }
            pos += LANE_WIDTH;
        } else {
            while pos < n {
                let c = data[pos];
                if c == delimiter {
                    push_end!(pos);
                } else if c == b'\n' {
                    break 'outer (pos, 1);
                } else if c == b'\r' {
                    if pos + 1 < n && data[pos + 1] == b'\n' {
                        break 'outer (pos, 2);
                    }
                    break 'outer (pos, 1);
                }
                pos += 1;
            }
            break 'outer (n, 0);
        }
    };

    push_end!(row_length);
    let chars_consumed = row_length + terminator_len;
    let newlines_consumed = if L::TRACK {
        match terminator_len {
            2 => 1,
            1 if data.get(row_length) == Some(&b'\n') => 1,
            _ => 0,
        }
    } else {
        data[..chars_consumed].iter().filter(|&&b| b == b'\n').count() as u64
    };

    Ok(RowParseResult {
        column_count,
        row_length,
        chars_consumed,
        newlines_consumed,
    })
}
