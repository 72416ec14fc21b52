use report_compare::{Row, Table};
use serde_json::Value;

/// Builds tables from compact JSON objects: `{"label": {"metric": 1, ...}, ...}`.
pub struct TableJson;

impl TableJson {
    /// Rows come out sorted by label unless serde_json's `preserve_order`
    /// feature is on; use [`TableJson::rows_from_array`] when order matters.
    pub fn table_from_object(json: &Value) -> Table {
        let mut table = Table::new();
        if let Some(rows) = json.as_object() {
            for (label, metrics) in rows {
                table.add_row(Self::row(label, metrics));
            }
        }
        table
    }

    /// `[["label", {"metric": 1}], ...]` in row order.
    pub fn rows_from_array(json: &Value) -> Table {
        let mut table = Table::new();
        for entry in json.as_array().into_iter().flatten() {
            let label = entry.get(0).and_then(Value::as_str);
            let metrics = entry.get(1);
            if let (Some(label), Some(metrics)) = (label, metrics) {
                table.add_row(Self::row(label, metrics));
            }
        }
        table
    }

    fn row(label: &str, metrics: &Value) -> Row {
        let mut row = Row::new(label);
        if let Some(metrics) = metrics.as_object() {
            for (name, value) in metrics {
                // Non-numeric metrics are not comparable.
                if let Some(number) = value.as_f64() {
                    row.columns.insert(name.clone(), number);
                }
            }
        }
        row
    }
}
