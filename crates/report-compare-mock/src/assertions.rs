use report_compare::{Row, Table};

/// Assertions over compared tables.
pub struct TableAssertions<'a> {
    table: &'a Table,
}

impl<'a> TableAssertions<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    pub fn assert_labels(&self, expected: &[&str]) -> &Self {
        assert_eq!(self.table.labels(), expected, "row labels differ");
        self
    }

    /// The row `label` has a subtable whose labels are `expected`, and no
    /// metrics of its own.
    pub fn assert_compared(&self, label: &str, expected: &[&str]) -> &Self {
        let row = self.row(label);
        assert!(
            row.columns.is_empty(),
            "compared row '{}' still has metrics: {:?}",
            label,
            row.columns
        );
        let subtable = row
            .subtable()
            .unwrap_or_else(|| panic!("row '{}' has no comparison subtable", label));
        assert_eq!(subtable.labels(), expected, "comparison rows of '{}' differ", label);
        self
    }

    /// Metric value of the synthesized row `path[..]` below `label`.
    pub fn assert_metric(&self, label: &str, path: &[&str], metric: &str, expected: f64) -> &Self {
        let mut row = self.row(label);
        for step in path {
            row = row
                .subtable()
                .and_then(|sub| sub.row_from_label(step))
                .unwrap_or_else(|| panic!("no comparison row '{}' below '{}'", step, row.label));
        }
        assert_eq!(row.metric(metric), Some(expected), "{} of {:?}", metric, path);
        self
    }

    fn row(&self, label: &str) -> &'a Row {
        self.table
            .row_from_label(label)
            .unwrap_or_else(|| panic!("no row labeled '{}'", label))
    }
}
