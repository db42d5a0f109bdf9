// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Local};

use sqldesk_core::Value;

use crate::export::types::{CsvExport, ExportError};

/// Prepended so spreadsheet applications detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const FILENAME_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

pub struct CsvExporter;

impl CsvExporter {
    /// Encodes a result set and names it after the current local time.
    pub fn export(columns: &[String], rows: &[Vec<Value>]) -> Result<CsvExport, ExportError> {
        Ok(CsvExport {
            filename: Self::filename_at(Local::now()),
            bytes: Self::encode(columns, rows)?,
        })
    }

    pub fn filename_at(at: DateTime<Local>) -> String {
        format!("query_result_{}.csv", at.format(FILENAME_TIME_FORMAT))
    }

    /// Header row, then one record per row. Fields that contain the
    /// delimiter, a quote or a line break are quoted; records end in CRLF.
    pub fn encode(columns: &[String], rows: &[Vec<Value>]) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::with_capacity(UTF8_BOM.len() + 64 * (rows.len() + 1));
        buffer.extend_from_slice(UTF8_BOM);

        let mut writer = ::csv::WriterBuilder::new()
            .terminator(::csv::Terminator::CRLF)
            .flexible(true)
            .from_writer(buffer);

        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(row.iter().map(Self::format_value))?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Buffer(e.error().to_string()))
    }

    fn format_value(value: &Value) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn strip_bom(bytes: &[u8]) -> &str {
        assert!(bytes.starts_with(UTF8_BOM), "missing BOM");
        std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap()
    }

    #[test]
    fn quotes_delimiters_and_blanks_nulls() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let rows = vec![
            vec![Value::Int(1), Value::Null],
            vec![Value::Text("x,y".into()), Value::Text("z".into())],
        ];

        let bytes = CsvExporter::encode(&columns, &rows).unwrap();
        assert_eq!(strip_bom(&bytes), "a,b\r\n1,\r\n\"x,y\",z\r\n");
    }

    #[test]
    fn doubles_embedded_quotes_and_quotes_newlines() {
        let columns = vec!["note".to_string()];
        let rows = vec![
            vec![Value::Text("say \"hi\"".into())],
            vec![Value::Text("line1\nline2".into())],
        ];

        let bytes = CsvExporter::encode(&columns, &rows).unwrap();
        assert_eq!(
            strip_bom(&bytes),
            "note\r\n\"say \"\"hi\"\"\"\r\n\"line1\nline2\"\r\n"
        );
    }

    #[test]
    fn reals_keep_their_fraction() {
        let columns = vec!["amount".to_string()];
        let rows = vec![vec![Value::Float(7999.0)], vec![Value::Float(12.5)]];

        let bytes = CsvExporter::encode(&columns, &rows).unwrap();
        assert_eq!(strip_bom(&bytes), "amount\r\n7999.0\r\n12.5\r\n");
    }

    #[test]
    fn ragged_rows_are_written_as_given() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec![Value::Int(1)], vec![Value::Int(1), Value::Int(2), Value::Int(3)]];

        let bytes = CsvExporter::encode(&columns, &rows).unwrap();
        assert_eq!(strip_bom(&bytes), "a,b\r\n1\r\n1,2,3\r\n");
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let columns = vec!["id".to_string(), "name".to_string(), "city".to_string()];
        let rows = vec![
            vec![Value::Int(1), Value::Text("张三".into()), Value::Text("北京".into())],
            vec![Value::Int(2), Value::Text("a \"b\", c".into()), Value::Null],
            vec![Value::Float(3.25), Value::Text("multi\r\nline".into()), Value::Text("".into())],
        ];

        let bytes = CsvExporter::encode(&columns, &rows).unwrap();
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(&bytes[UTF8_BOM.len()..]);

        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, columns);

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn filename_uses_export_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(CsvExporter::filename_at(at), "query_result_20240309_070501.csv");
    }

    #[test]
    fn export_names_and_encodes() {
        let export = CsvExporter::export(&["a".to_string()], &[vec![Value::Int(1)]]).unwrap();
        assert!(export.filename.starts_with("query_result_"));
        assert!(export.filename.ends_with(".csv"));
        assert_eq!(strip_bom(&export.bytes), "a\r\n1\r\n");
    }
}
