// End-to-end scenarios for the tokenizer, row view, stream driver, writer
// and fixed-width layout, working directly off example inputs rather than
// comparing strategies against each other.

use dsvscan::dsv::tokenize_bytes;
use dsvscan::fixed_width::{Alignment, FixedWidthRowView, RecordLayout};
use dsvscan::{DsvRowView, DsvReader, DsvWriter, Error, ParserOptions, Source};

fn columns(input: &[u8], options: &ParserOptions<u8>) -> Vec<Vec<String>> {
    let mut ends = vec![0i64; options.max_columns() + 1];
    let mut rows = Vec::new();
    let mut offset = 0;
    while offset < input.len() {
        let result = tokenize_bytes(&input[offset..], options, &mut ends).unwrap();
        if result.column_count > 0 {
            let view = DsvRowView::new(&input[offset..offset + result.row_length], &ends, result.column_count, options);
            rows.push((0..result.column_count).map(|i| String::from_utf8(view.decoded(i).unwrap().into_owned()).unwrap()).collect());
        }
        offset += result.chars_consumed;
    }
    rows
}

#[test]
fn s1_unquoted_three_column_rows() {
    let options = ParserOptions::default();
    let rows = columns(b"a,b,c\nd,e,f\n", &options);
    assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
}

#[test]
fn s2_crlf_and_trailing_empty_column() {
    let options = ParserOptions::default();
    let input: &[u8] = b"x,y,\r\nz,,\r\n";
    let rows = columns(input, &options);
    assert_eq!(rows, vec![vec!["x", "y", ""], vec!["z", "", ""]]);

    let mut ends = vec![0i64; options.max_columns() + 1];
    let first = tokenize_bytes(input, &options, &mut ends).unwrap();
    assert_eq!(first.chars_consumed, 6);
    let second = tokenize_bytes(&input[6..], &options, &mut ends).unwrap();
    assert_eq!(second.chars_consumed, 5);
}

#[test]
fn s3_quoted_field_with_comma_and_doubled_quote() {
    let options = ParserOptions::default();
    let rows = columns(b"1,\"a,\"\"b\"\",c\",3\n", &options);
    assert_eq!(rows, vec![vec!["1", "a,\"b\",c", "3"]]);
}

#[test]
fn s4_comment_row() {
    let options = ParserOptions::builder().comment(Some(b'#')).build().unwrap();
    struct Bytes<'a>(&'a [u8], usize);
    impl<'a> Source<u8> for Bytes<'a> {
        fn read(&mut self, into: &mut [u8]) -> Result<usize, Error> {
            let n = (self.0.len() - self.1).min(into.len());
            into[..n].copy_from_slice(&self.0[self.1..self.1 + n]);
            self.1 += n;
            Ok(n)
        }
    }
    let source = Bytes(b"a,b\n# ignore me\nc,d\n", 0);
    let mut reader = DsvReader::new(source, options, false);
    let mut rows = Vec::new();
    while reader.move_next().unwrap() {
        let view = reader.current().unwrap();
        rows.push((0..view.column_count()).map(|i| view.column(i).to_vec()).collect::<Vec<_>>());
    }
    assert_eq!(rows, vec![vec![b"a".to_vec(), b"b".to_vec()], vec![b"c".to_vec(), b"d".to_vec()]]);
    assert_eq!(reader.current_line_number(), 4);
    assert_eq!(reader.current_row_number(), 2);
}

#[test]
fn s5_escape_character() {
    let options = ParserOptions::builder().escape(Some(b'\\')).quoting_enabled(true).build().unwrap();
    let rows = columns(b"a\\,b,c\n", &options);
    assert_eq!(rows, vec![vec!["a,b", "c"]]);
}

#[test]
fn s6_fixed_width_alignment() {
    let layout: RecordLayout<u8> = RecordLayout::builder()
        .field_with("id", 0, 10, b'0', Alignment::Right)
        .field_with("name", 10, 20, b' ', Alignment::Left)
        .build()
        .unwrap();
    let record = b"0000000123Alice               \n";
    let view = FixedWidthRowView::new(record, &layout, 1, Some(1));
    assert_eq!(view.field("id").unwrap(), b"123");
    assert_eq!(view.field("name").unwrap(), b"Alice");
}

#[test]
fn empty_input_yields_zero_rows() {
    let options = ParserOptions::default();
    assert_eq!(columns(b"", &options), Vec::<Vec<String>>::new());
}

#[test]
fn bare_newline_is_one_row_one_empty_column() {
    let options = ParserOptions::default();
    assert_eq!(columns(b"\n", &options), vec![vec![""]]);
}

#[test]
fn unterminated_row_without_trailing_newline_still_parses() {
    let options = ParserOptions::default();
    let mut ends = vec![0i64; options.max_columns() + 1];
    let result = tokenize_bytes(b"a", &options, &mut ends).unwrap();
    assert_eq!(result.chars_consumed, result.row_length);
    assert_eq!(result.row_length, 1);
}

#[test]
fn newlines_in_quotes_allowed_counts_embedded_newlines() {
    let options = ParserOptions::builder().newlines_in_quotes_allowed(true).build().unwrap();
    let mut ends = vec![0i64; options.max_columns() + 1];
    let result = tokenize_bytes(b"\"a\n b\",c\n", &options, &mut ends).unwrap();
    assert_eq!(result.newlines_consumed, 2);
}

#[test]
fn unterminated_quote_reports_opening_offset() {
    let options = ParserOptions::default();
    let mut ends = vec![0i64; options.max_columns() + 1];
    let err = tokenize_bytes(b"\"unterminated\n", &options, &mut ends).unwrap_err();
    match err {
        Error::UnterminatedQuote { opening_quote_offset, .. } => assert_eq!(opening_quote_offset, 0),
        other => panic!("expected UnterminatedQuote, got {other:?}"),
    }
}

#[test]
fn too_many_columns_is_rejected() {
    let options = ParserOptions::builder().max_columns(2).build().unwrap();
    let mut ends = vec![0i64; options.max_columns() + 1];
    let ok = tokenize_bytes(b"a,b\n", &options, &mut ends).unwrap();
    assert_eq!(ok.column_count, 2);
    let err = tokenize_bytes(b"a,b,c\n", &options, &mut ends).unwrap_err();
    assert!(matches!(err, Error::TooManyColumns { max_columns: 2, .. }));
}

#[test]
fn fixed_width_short_row_without_allowance_is_out_of_bounds() {
    let layout: RecordLayout<u8> = RecordLayout::builder().field("id", 0, 10).build().unwrap();
    let view = FixedWidthRowView::new(b"123", &layout, 1, None);
    assert!(matches!(view.field("id"), Err(Error::FieldOutOfBounds { .. })));
}

#[test]
fn fixed_width_short_row_with_allowance_returns_truncated_suffix() {
    let layout: RecordLayout<u8> = RecordLayout::builder().field("id", 0, 10).allow_short_rows(true).build().unwrap();
    let view = FixedWidthRowView::new(b"123", &layout, 1, None);
    assert_eq!(view.field("id").unwrap(), b"123");
}

#[test]
fn write_then_reparse_round_trips() {
    let mut out = Vec::new();
    {
        let mut writer = DsvWriter::new(&mut out, Default::default());
        writer.write_row([b"a,b".as_slice(), b"say \"hi\"", b"plain"]).unwrap();
        writer.flush().unwrap();
    }
    let options = ParserOptions::default();
    let rows = columns(&out, &options);
    assert_eq!(rows, vec![vec!["a,b", "say \"hi\"", "plain"]]);
}
