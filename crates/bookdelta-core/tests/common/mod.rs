use bookdelta_core::{FieldValue, Snapshot};

/// Build an `id,name,price` snapshot from `(id, name, price)` triples
#[allow(dead_code)]
pub fn books(rows: &[(i64, &str, i64)]) -> Snapshot {
    Snapshot::from_rows(
        &["id", "name", "price"],
        "id",
        rows.iter().map(|(id, name, price)| {
            vec![
                FieldValue::Int(*id),
                FieldValue::Text(name.to_string()),
                FieldValue::Int(*price),
            ]
        }),
    )
    .expect("valid test snapshot")
}

/// Build a snapshot of the full book listing layout with one record
#[allow(dead_code)]
pub fn full_listing(cells: &[(&str, FieldValue)]) -> Snapshot {
    let columns: Vec<&str> = cells.iter().map(|(c, _)| *c).collect();
    let values: Vec<FieldValue> = cells.iter().map(|(_, v)| v.clone()).collect();
    Snapshot::from_rows(&columns, "id", vec![values]).expect("valid test snapshot")
}

#[allow(dead_code)]
pub fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}
