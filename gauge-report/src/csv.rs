//! CSV Output
//!
//! Numeric fields are exact integers in picoseconds and bytes. Text fields
//! are quoted only when they contain a comma, a double quote or a line
//! terminator, with inner quotes doubled.

use crate::ReportError;
use gauge_stats::Estimate;
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

/// Escape a single text field.
///
/// ```
/// use gauge_report::escape_csv_field;
///
/// assert_eq!(escape_csv_field("plain"), "plain");
/// assert_eq!(escape_csv_field(r#"a,"b""#), r#""a,""b""""#);
/// ```
pub fn escape_csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Column names, with allocation columns only when accounting is available
pub fn csv_columns(accounting: bool) -> &'static [&'static str] {
    if accounting {
        &["Name", "Mean (ps)", "Stdev (ps)", "Allocated", "Copied"]
    } else {
        &["Name", "Mean (ps)", "Stdev (ps)"]
    }
}

/// Header row without line terminator
pub fn csv_header(accounting: bool) -> String {
    csv_columns(accounting).join(",")
}

/// Numeric part of a row (everything after the name), without line terminator
pub fn csv_fields(estimate: &Estimate, accounting: bool) -> String {
    if accounting {
        format!(
            "{},{},{},{}",
            estimate.mean.time, estimate.sigma, estimate.mean.allocated, estimate.mean.copied
        )
    } else {
        format!("{},{}", estimate.mean.time, estimate.sigma)
    }
}

/// Full row for a named benchmark, without line terminator
pub fn csv_row(name: &str, estimate: &Estimate, accounting: bool) -> String {
    format!("{},{}", escape_csv_field(name), csv_fields(estimate, accounting))
}

/// Line-buffered CSV results file.
///
/// The file is truncated on creation and the header written immediately.
/// Every row is flushed as soon as it is written; the file is closed when the
/// sink is dropped, including on error paths.
pub struct CsvSink {
    writer: csv::Writer<File>,
    accounting: bool,
}

impl CsvSink {
    /// Create (or truncate) the file at `path` and write the header
    pub fn create(path: impl AsRef<Path>, accounting: bool) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ReportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        let mut sink = Self { writer, accounting };
        sink.writer.write_record(csv_columns(accounting))?;
        sink.writer.flush()?;
        Ok(sink)
    }

    /// Whether allocation columns are present
    pub fn accounting(&self) -> bool {
        self.accounting
    }

    /// Append one benchmark row and flush it
    pub fn write_row(&mut self, name: &str, estimate: &Estimate) -> Result<(), ReportError> {
        let mean = estimate.mean.time.to_string();
        let sigma = estimate.sigma.to_string();
        if self.accounting {
            let allocated = estimate.mean.allocated.to_string();
            let copied = estimate.mean.copied.to_string();
            self.writer
                .write_record([name, &mean, &sigma, &allocated, &copied])?;
        } else {
            self.writer.write_record([name, &mean, &sigma])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_stats::Measurement;

    /// Reverse the quote-doubling rule
    fn decode_field(encoded: &str) -> String {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(encoded.as_bytes());
        let record = reader
            .records()
            .next()
            .expect("one record")
            .expect("valid csv");
        record.get(0).expect("one field").to_string()
    }

    fn sample_estimate() -> Estimate {
        Estimate::new(Measurement::new(123_456, 2_048, 16), 789)
    }

    #[test]
    fn test_escape_plain() {
        assert!(matches!(escape_csv_field("sort.1000"), Cow::Borrowed(_)));
        assert_eq!(escape_csv_field(""), "");
    }

    #[test]
    fn test_escape_quotes_and_commas() {
        assert_eq!(escape_csv_field("a,\"b\""), "\"a,\"\"b\"\"\"");
    }

    #[test]
    fn test_escape_line_breaks() {
        assert_eq!(escape_csv_field("a\nb"), "\"a\nb\"");
        assert_eq!(escape_csv_field("a\r\nb"), "\"a\r\nb\"");
    }

    #[test]
    fn test_header() {
        assert_eq!(csv_header(false), "Name,Mean (ps),Stdev (ps)");
        assert_eq!(csv_header(true), "Name,Mean (ps),Stdev (ps),Allocated,Copied");
    }

    #[test]
    fn test_row() {
        let est = sample_estimate();
        assert_eq!(csv_row("fib.10", &est, false), "fib.10,123456,789");
        assert_eq!(csv_row("fib,10", &est, true), "\"fib,10\",123456,789,2048,16");
    }

    #[test]
    fn test_sink_matches_row_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let est = sample_estimate();
        let names = ["plain", "with,comma", "with \"quotes\"", "multi\nline"];

        {
            let mut sink = CsvSink::create(&path, true).unwrap();
            for name in names {
                sink.write_row(name, &est).unwrap();
            }
        }

        let written = std::fs::read_to_string(&path).unwrap();
        let mut expected = csv_header(true);
        expected.push('\n');
        for name in names {
            expected.push_str(&csv_row(name, &est, true));
            expected.push('\n');
        }
        assert_eq!(written, expected);
    }

    #[test]
    fn test_sink_rows_visible_before_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.csv");
        let mut sink = CsvSink::create(&path, false).unwrap();
        sink.write_row("first", &sample_estimate()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Name,Mean (ps),Stdev (ps)\nfirst,123456,789\n");
        assert!(!sink.accounting());
    }

    #[test]
    fn test_sink_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.csv");
        std::fs::write(&path, "stale contents that are much longer than the header\n").unwrap();

        drop(CsvSink::create(&path, false).unwrap());

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Name,Mean (ps),Stdev (ps)\n");
    }

    #[test]
    fn test_sink_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.csv");
        let err = CsvSink::create(&path, false).err().expect("open must fail");
        assert!(matches!(err, ReportError::Open { .. }));
        assert!(err.to_string().contains("results.csv"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(300))]

            #[test]
            fn prop_escape_round_trips(name in "[a-z,\"\r\n .]{0,24}") {
                let encoded = escape_csv_field(&name);
                // An empty record decodes to nothing, so only non-empty names round-trip
                prop_assume!(!name.is_empty());
                prop_assert_eq!(decode_field(&encoded), name);
            }

            #[test]
            fn prop_unescaped_fields_are_verbatim(name in "[a-z0-9 ._-]{1,24}") {
                prop_assert_eq!(escape_csv_field(&name), name.as_str());
            }
        }
    }
}
