//! CSV rendering for the product export.
//!
//! The export is built in memory from a full table read; callers are expected
//! to stream the resulting bytes as a file attachment.

use crate::types::Timestamp;

/// Suggested file name for the download.
pub const PRODUCT_CSV_FILENAME: &str = "products.csv";

/// Fixed header row of the product export.
pub const PRODUCT_CSV_HEADER: [&str; 8] = [
    "ID",
    "Category",
    "Title",
    "Description",
    "Price",
    "Status",
    "Created At",
    "Updated At",
];

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

pub fn format_status(status: bool) -> &'static str {
    if status {
        "True"
    } else {
        "False"
    }
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339()
}

/// Build a CSV document from a header and already-stringified rows.
///
/// Every field is escaped here, so callers pass raw values. Lines end with
/// `\r\n` and the document always ends with a line terminator.
pub fn build_csv<I, R>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut out = String::new();
    push_line(&mut out, header.iter().map(|h| csv_escape(h)));
    for row in rows {
        push_line(&mut out, row.as_ref().iter().map(|v| csv_escape(v)));
    }
    out
}

fn push_line(out: &mut String, fields: impl Iterator<Item = String>) {
    let line: Vec<String> = fields.collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn plain_values_are_not_quoted() {
        assert_eq!(csv_escape("Category 1"), "Category 1");
    }

    #[test]
    fn values_with_separators_are_quoted() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn header_only_when_no_rows() {
        let csv = build_csv(&PRODUCT_CSV_HEADER, Vec::<Vec<String>>::new());
        assert_eq!(
            csv,
            "ID,Category,Title,Description,Price,Status,Created At,Updated At\r\n"
        );
    }

    #[test]
    fn rows_follow_header_in_order() {
        let rows = vec![
            vec!["1".to_string(), "Shoes, running".to_string()],
            vec!["2".to_string(), "Hats".to_string()],
        ];
        let csv = build_csv(&["ID", "Category"], rows);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines, vec!["ID,Category", "1,\"Shoes, running\"", "2,Hats", ""]);
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(format_price(12.5), "12.50");
        assert_eq!(format_price(99.999), "100.00");
        assert_eq!(format_status(true), "True");
        assert_eq!(format_status(false), "False");

        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01T12:30:00+00:00");
    }
}
