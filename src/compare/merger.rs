//! Row alignment.
//!
//! Rows of the host table are matched by exact label against the fetched
//! comparison tables. Matched rows get a subtable holding one synthesized
//! row per compared report and lose their own metrics; unmatched rows are
//! deleted. Relative order of the surviving rows never changes.

use crate::table::{Row, Table};
use std::collections::HashMap;

/// Outcome of one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub kept: usize,
    pub dropped: usize,
}

// ─── Segment rows ────────────────────────────────────────────────────

/// Aligns rows against a fixed set of alternate-segment tables.
struct SegmentAligner<'t> {
    base_segment: String,
    segments: Vec<(&'t str, HashMap<&'t str, &'t Row>)>,
}

impl<'t> SegmentAligner<'t> {
    fn new(base_segment: impl Into<String>, tables: &'t [Table]) -> Self {
        Self {
            base_segment: base_segment.into(),
            segments: tables
                .iter()
                .map(|table| (table.segment().unwrap_or_default(), table.label_index()))
                .collect(),
        }
    }

    /// Whether `label` exists in every segment table.
    fn covers(&self, label: &str) -> bool {
        self.segments.iter().all(|(_, rows)| rows.contains_key(label))
    }

    /// Nest the segment rows matching `label` under `row`. `template`
    /// provides the subtable's filters and metadata.
    fn attach(&self, row: &mut Row, label: &str, template: &Table) {
        let mut subtable = template.empty_clone(true);
        subtable.add_row(row.relabeled(self.base_segment.as_str()));
        for (segment, rows) in &self.segments {
            if let Some(matching) = rows.get(label) {
                subtable.add_row(matching.relabeled(*segment));
            }
        }
        row.set_subtable(subtable);
        row.collapse_to_label();
    }
}

/// Nest alternate-segment rows under every row of `table`.
///
/// Rows missing from any of `segments` are deleted. Tables in `segments`
/// must carry their segment expression; the base row is labeled with the
/// segment of `table` itself.
pub fn merge_segment_comparison(table: &mut Table, segments: &[Table]) -> MergeSummary {
    if segments.is_empty() {
        return MergeSummary {
            kept: table.row_count(),
            dropped: 0,
        };
    }

    let aligner = SegmentAligner::new(table.segment().unwrap_or_default(), segments);
    let template = table.empty_clone(true);
    let mut summary = MergeSummary::default();

    for id in table.row_ids() {
        let covered = match table.row(id) {
            Some(row) => aligner.covers(&row.label),
            None => continue,
        };
        if !covered {
            table.delete_row(id);
            summary.dropped += 1;
            continue;
        }
        if let Some(row) = table.row_mut(id) {
            let label = row.label.clone();
            aligner.attach(row, &label, &template);
            summary.kept += 1;
        }
    }

    table.compact();
    summary
}

// ─── Date rows ───────────────────────────────────────────────────────

/// Alternate-segment tables fetched over the base period and over the
/// compared period.
#[derive(Debug, Clone, Copy)]
pub struct SegmentSets<'t> {
    pub base: &'t [Table],
    pub compared: &'t [Table],
}

/// Nest a two-row date comparison under every row of `table`.
///
/// Each surviving row gets one row labeled `base_label` (its own metrics)
/// and one labeled `compared_label` (the metrics of the row with the same
/// label in `compared`). With `segments`, both synthesized rows further
/// nest their segment comparison; a row missing from any segment table of
/// either set is deleted before anything is built for it.
pub fn merge_date_comparison(
    table: &mut Table,
    compared: &Table,
    base_label: &str,
    compared_label: &str,
    segments: Option<SegmentSets<'_>>,
) -> MergeSummary {
    let compared_rows = compared.label_index();
    let template = table.empty_clone(true);
    let base_segment = table.segment().unwrap_or_default().to_string();
    let aligners = segments.map(|sets| {
        (
            SegmentAligner::new(base_segment.as_str(), sets.base),
            SegmentAligner::new(base_segment.as_str(), sets.compared),
        )
    });
    let mut summary = MergeSummary::default();

    for id in table.row_ids() {
        let label = match table.row(id) {
            Some(row) => row.label.clone(),
            None => continue,
        };

        let counterpart = compared_rows.get(label.as_str()).copied();
        let segments_cover = aligners
            .as_ref()
            .map_or(true, |(base, other)| base.covers(&label) && other.covers(&label));

        let (Some(counterpart), true) = (counterpart, segments_cover) else {
            table.delete_row(id);
            summary.dropped += 1;
            continue;
        };

        let Some(row) = table.row_mut(id) else {
            continue;
        };
        let mut base_row = row.relabeled(base_label);
        let mut compared_row = counterpart.relabeled(compared_label);
        if let Some((base, other)) = &aligners {
            base.attach(&mut base_row, &label, &template);
            other.attach(&mut compared_row, &label, &template);
        }

        let mut subtable = template.empty_clone(true);
        subtable.add_row(base_row);
        subtable.add_row(compared_row);
        row.set_subtable(subtable);
        row.collapse_to_label();
        summary.kept += 1;
    }

    table.compact();
    summary
}
