//! CSV Parser - topic import format
//!
//! Parses the three-column topic import format (subject, category, topic)
//! into structured rows. Parsing is error-accumulating: a malformed line
//! produces a `CsvLineError` and parsing continues with the next record,
//! so one import attempt reports every problem at once.
//!
//! Line numbers are 1-based physical line numbers over the raw text. The
//! first line is the header and is never emitted as a row; a quoted field
//! may span multiple physical lines, in which case the record is numbered
//! by the line it starts on and subsequent records keep their true
//! physical position.

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

/// One successfully parsed data row.
///
/// All three fields are whitespace-trimmed and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub subject: String,
    pub category: String,
    pub topic: String,
}

/// A per-line parse or validation failure.
///
/// `line` is the 1-based physical line the record started on. Line 0 is
/// reserved for input-level failures that have no line to point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvLineError {
    pub line: u64,
    pub message: String,
}

/// Outcome of one parse: rows that survived, errors for lines that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    pub rows: Vec<CsvRow>,
    pub errors: Vec<CsvLineError>,
}

/// Parse topic-import CSV text.
///
/// Quote-aware (embedded commas, escaped `""` quotes, and newlines inside
/// quoted fields are all honored). The header line is skipped without
/// validation of its content. Records with fewer than three fields, or
/// with any of the first three fields empty after trimming, are rejected
/// with a line-numbered error; extra trailing fields are ignored.
pub fn parse_topic_csv(text: &str) -> ParsedCsv {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut parsed = ParsedCsv::default();

    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);

                if record.len() < 3 {
                    parsed.errors.push(CsvLineError {
                        line,
                        message: format!("expected 3 fields, found {}", record.len()),
                    });
                    continue;
                }

                let subject = record.get(0).unwrap_or("");
                let category = record.get(1).unwrap_or("");
                let topic = record.get(2).unwrap_or("");

                if subject.is_empty() || category.is_empty() || topic.is_empty() {
                    parsed.errors.push(CsvLineError {
                        line,
                        message: "subject, category and topic must not be empty".to_string(),
                    });
                    continue;
                }

                parsed.rows.push(CsvRow {
                    subject: subject.to_string(),
                    category: category.to_string(),
                    topic: topic.to_string(),
                });
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                parsed.errors.push(CsvLineError {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_rows_and_skips_header() {
        let parsed = parse_topic_csv("科目,カテゴリ,論点\nA,B,C\nA,B,D\n");

        assert!(parsed.errors.is_empty());
        assert_eq!(
            parsed.rows,
            vec![
                CsvRow {
                    subject: "A".to_string(),
                    category: "B".to_string(),
                    topic: "C".to_string(),
                },
                CsvRow {
                    subject: "A".to_string(),
                    category: "B".to_string(),
                    topic: "D".to_string(),
                },
            ]
        );
    }

    #[test]
    fn honors_quoted_commas_newlines_and_escaped_quotes() {
        let text = "subject,category,topic\n\
                    Math,\"Algebra, Linear\",\"Line one\nLine two\"\n\
                    Math,Geometry,\"The \"\"unit\"\" circle\"\n";
        let parsed = parse_topic_csv(text);

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].category, "Algebra, Linear");
        assert_eq!(parsed.rows[0].topic, "Line one\nLine two");
        assert_eq!(parsed.rows[1].topic, "The \"unit\" circle");
    }

    #[test]
    fn rejects_short_and_empty_rows_with_line_numbers() {
        let text = "subject,category,topic\nA,B,C\nA,B\nA,,C\nA,B,D\n";
        let parsed = parse_topic_csv(text);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].topic, "D");

        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].line, 3);
        assert_eq!(parsed.errors[0].message, "expected 3 fields, found 2");
        assert_eq!(parsed.errors[1].line, 4);
        assert_eq!(
            parsed.errors[1].message,
            "subject, category and topic must not be empty"
        );
    }

    #[test]
    fn trims_whitespace_around_fields() {
        let parsed = parse_topic_csv("s,c,t\n  A ,\tB , C  \n");

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].subject, "A");
        assert_eq!(parsed.rows[0].category, "B");
        assert_eq!(parsed.rows[0].topic, "C");
    }

    #[test]
    fn whitespace_only_field_counts_as_empty() {
        let parsed = parse_topic_csv("s,c,t\nA,   ,C\n");

        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let parsed = parse_topic_csv("s,c,t\r\nA,B,C\r\nA,B\r\nA,B,D\r\n");

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 3);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let parsed = parse_topic_csv("s,c,t\nA,B,C,extra,columns\n");

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].topic, "C");
    }

    #[test]
    fn multiline_record_keeps_physical_numbering_for_later_errors() {
        // The quoted topic spans lines 2-3, so the bad record sits on
        // physical line 4.
        let text = "s,c,t\nA,B,\"first\nsecond\"\nA,B\n";
        let parsed = parse_topic_csv(text);

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 4);
    }

    #[test]
    fn empty_and_header_only_inputs_produce_nothing() {
        assert_eq!(parse_topic_csv(""), ParsedCsv::default());
        assert_eq!(parse_topic_csv("科目,カテゴリ,論点\n"), ParsedCsv::default());
    }
}
