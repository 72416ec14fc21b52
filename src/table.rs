//! Report tables.
//!
//! A [`Table`] is an ordered sequence of [`Row`]s plus a little metadata
//! (the [`Period`] it was computed for and the segment it was filtered by).
//! Rows live in an arena: [`RowId`] handles stay valid while rows are
//! deleted during a merge pass and become meaningless after
//! [`Table::compact`].

use crate::period::Period;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Metric name to value.
pub type Metrics = BTreeMap<String, f64>;

/// Transient handle to a row inside one [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One entity of a report: a label, its metrics and an optional child table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    #[serde(default)]
    pub columns: Metrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtable: Option<Box<Table>>,
}

impl Row {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            columns: Metrics::new(),
            subtable: None,
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.columns.insert(name.into(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.columns.get(name).copied()
    }

    pub fn subtable(&self) -> Option<&Table> {
        self.subtable.as_deref()
    }

    pub fn subtable_mut(&mut self) -> Option<&mut Table> {
        self.subtable.as_deref_mut()
    }

    pub fn set_subtable(&mut self, table: Table) {
        self.subtable = Some(Box::new(table));
    }

    /// Drop every metric, keeping only the label. Used once a row's values
    /// have moved into its comparison subtable.
    pub fn collapse_to_label(&mut self) {
        self.columns.clear();
    }

    /// Copy of this row's metrics under a different label, without subtable.
    pub fn relabeled(&self, label: impl Into<String>) -> Row {
        Row {
            label: label.into(),
            columns: self.columns.clone(),
            subtable: None,
        }
    }
}

/// The two metadata values a table carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    /// Segment expression the table was computed for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct TableRepr {
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<String>,
    #[serde(flatten)]
    metadata: TableMetadata,
}

/// Ordered collection of rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "TableRepr", into = "TableRepr")]
pub struct Table {
    slots: Vec<Option<Row>>,
    filters: Vec<String>,
    metadata: TableMetadata,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            slots: rows.into_iter().map(Some).collect(),
            ..Self::default()
        }
    }

    pub fn add_row(&mut self, row: Row) -> RowId {
        self.slots.push(Some(row));
        RowId(self.slots.len() - 1)
    }

    pub fn row_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Live rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.slots.iter().flatten()
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.slots.iter_mut().flatten()
    }

    /// Snapshot of the live row handles, safe to iterate while deleting.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| RowId(index))
            .collect()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Remove a row. Handles of the other rows stay valid until [`Table::compact`].
    pub fn delete_row(&mut self, id: RowId) -> Option<Row> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// First row whose label equals `label` exactly.
    pub fn row_from_label(&self, label: &str) -> Option<&Row> {
        self.rows().find(|row| row.label == label)
    }

    /// Label lookup table; the first row wins when labels repeat.
    pub fn label_index(&self) -> HashMap<&str, &Row> {
        let mut index = HashMap::with_capacity(self.slots.len());
        for row in self.rows() {
            index.entry(row.label.as_str()).or_insert(row);
        }
        index
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows().map(|row| row.label.as_str()).collect()
    }

    /// Drop deleted slots. Invalidates every outstanding [`RowId`].
    pub fn compact(&mut self) {
        self.slots.retain(Option::is_some);
    }

    /// A table with the same metadata and no rows. Applied filters are
    /// carried over when `keep_filters` is set.
    pub fn empty_clone(&self, keep_filters: bool) -> Table {
        Table {
            slots: Vec::new(),
            filters: if keep_filters {
                self.filters.clone()
            } else {
                Vec::new()
            },
            metadata: self.metadata.clone(),
        }
    }

    /// Names of the filters applied to this table.
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn add_filter(&mut self, name: impl Into<String>) {
        self.filters.push(name.into());
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn period(&self) -> Option<&Period> {
        self.metadata.period.as_ref()
    }

    pub fn set_period(&mut self, period: Period) {
        self.metadata.period = Some(period);
    }

    pub fn segment(&self) -> Option<&str> {
        self.metadata.segment.as_deref()
    }

    pub fn set_segment(&mut self, segment: impl Into<String>) {
        self.metadata.segment = Some(segment.into());
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.filters == other.filters
            && self.metadata == other.metadata
            && self.rows().eq(other.rows())
    }
}

impl From<TableRepr> for Table {
    fn from(repr: TableRepr) -> Self {
        Table {
            slots: repr.rows.into_iter().map(Some).collect(),
            filters: repr.filters,
            metadata: repr.metadata,
        }
    }
}

impl From<Table> for TableRepr {
    fn from(table: Table) -> Self {
        TableRepr {
            rows: table.slots.into_iter().flatten().collect(),
            filters: table.filters,
            metadata: table.metadata,
        }
    }
}

/// Tables keyed by sub-period, as returned for multi-period requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableCollection {
    tables: BTreeMap<String, Table>,
}

impl TableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, table: Table) {
        self.tables.insert(key.into(), table);
    }

    pub fn get(&self, key: &str) -> Option<&Table> {
        self.tables.get(key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(key, table)| (key.as_str(), table))
    }

    /// Apply `f` to every child table, keeping keys.
    pub fn map_tables(self, mut f: impl FnMut(&str, Table) -> Table) -> Self {
        Self {
            tables: self
                .tables
                .into_iter()
                .map(|(key, table)| {
                    let table = f(&key, table);
                    (key, table)
                })
                .collect(),
        }
    }

    /// Fold every child into one table.
    ///
    /// Rows sharing a label have their metrics summed; the first occurrence
    /// fixes the row's position and keeps its subtable. Filters are
    /// concatenated without duplicates. The merged table covers the whole
    /// span of the children's periods.
    pub fn merge_children(self) -> Table {
        let mut merged = Table::new();
        let mut positions: HashMap<String, RowId> = HashMap::new();
        let mut span: Option<(chrono::NaiveDate, chrono::NaiveDate)> = None;

        for table in self.tables.into_values() {
            for filter in table.filters() {
                if !merged.filters.contains(filter) {
                    merged.filters.push(filter.clone());
                }
            }
            if merged.metadata.segment.is_none() {
                merged.metadata.segment = table.metadata.segment.clone();
            }
            if let Some(period) = table.period() {
                span = Some(match span {
                    Some((start, end)) => {
                        (start.min(period.date_start()), end.max(period.date_end()))
                    }
                    None => (period.date_start(), period.date_end()),
                });
            }

            for row in table.slots.into_iter().flatten() {
                match positions.get(&row.label) {
                    Some(&id) => {
                        if let Some(existing) = merged.row_mut(id) {
                            for (name, value) in row.columns {
                                *existing.columns.entry(name).or_insert(0.0) += value;
                            }
                        }
                    }
                    None => {
                        let label = row.label.clone();
                        let id = merged.add_row(row);
                        positions.insert(label, id);
                    }
                }
            }
        }

        if let Some((start, end)) = span {
            if let Ok(period) = Period::range(start, end) {
                merged.set_period(period);
            }
        }
        merged
    }
}

impl FromIterator<(String, Table)> for TableCollection {
    fn from_iter<I: IntoIterator<Item = (String, Table)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
