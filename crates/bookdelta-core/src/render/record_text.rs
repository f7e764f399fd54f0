//! Book listing → plain-text document.
//!
//! Each record becomes one labelled, line-oriented document that the
//! downstream retrieval service indexes under the record's id. Columns the
//! snapshot lacks, and missing values, render as `N/A`.

use crate::model::{FieldValue, Record, Snapshot};

const NOT_AVAILABLE: &str = "N/A";

/// How a column's value is turned into display text.
#[derive(Debug, Clone, Copy)]
enum Format {
    Plain,
    /// Integer part followed by a currency suffix
    Price,
    /// Integer part followed by `%`
    Percent,
    /// Value followed by the star-rating unit
    Rating,
    /// Integer part only
    Count,
    /// Comma separated list, entries trimmed
    List,
}

/// Label, source column and format of every line, in output order.
const LINES: &[(&str, &str, Format)] = &[
    ("Book Name", "name", Format::Plain),
    ("Link", "link", Format::Plain),
    ("Current Price", "current_price", Format::Price),
    ("Original Price", "original_price", Format::Price),
    ("Discount", "discount_rate", Format::Percent),
    ("Rating", "rating_average", Format::Rating),
    ("Sold Quantity", "quantity_sold", Format::Count),
    ("Authors", "authors", Format::List),
    ("Seller Name", "seller_name", Format::Plain),
    ("Manufacturer", "manufacturer", Format::Plain),
    ("Category", "category", Format::Plain),
    ("Description", "short_description", Format::Plain),
];

fn integer_part(value: &FieldValue) -> Option<i64> {
    value.as_f64().map(|f| f.trunc() as i64)
}

fn format_value(value: &FieldValue, format: Format) -> Option<String> {
    if value.is_missing() {
        return None;
    }
    match format {
        Format::Plain => Some(value.to_cell()),
        Format::Price => integer_part(value).map(|i| format!("{} VND", i)),
        Format::Percent => integer_part(value).map(|i| format!("{}%", i)),
        Format::Rating => Some(format!("{} sao", value.to_cell())),
        Format::Count => integer_part(value).map(|i| i.to_string()),
        Format::List => Some(
            value
                .to_cell()
                .split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

/// Render one record of `snapshot` as a document.
pub fn render_record_text(snapshot: &Snapshot, record: &Record) -> String {
    LINES
        .iter()
        .map(|(label, column, format)| {
            let text = snapshot
                .value(record, column)
                .and_then(|v| format_value(v, *format))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            format!("{}: {}", label, text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render every record, returning `(texts, ids)` in snapshot order.
pub fn render_record_texts(snapshot: &Snapshot) -> (Vec<String>, Vec<String>) {
    snapshot
        .records()
        .map(|r| (render_record_text(snapshot, r), r.id.to_string()))
        .unzip()
}
