//! Decides which comparison reports to fetch and with which parameters.
//!
//! The planner is a pure function of the report identity, the request and
//! the report metadata. Segment fetches depend on the period of the table
//! being compared, so they are planned per table: once for the base table
//! and once more for the date-comparison table when both comparisons apply.

use crate::fetcher::{FetchPurpose, FetchRequest};
use crate::period::{Period, PeriodKind};
use crate::report::{ReportId, ReportMetadataProvider};
use crate::request::RequestParams;
use serde::Serialize;
use std::fmt;

/// Alternate segments are read from `segment1` to `segment4`.
pub const MAX_SEGMENT_COMPARISONS: usize = 4;

/// Why a request gets no comparison at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownReport,
    NoDimension,
    Disabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::UnknownReport => "report module or action is unknown",
            SkipReason::NoDimension => "report has no dimension",
            SkipReason::Disabled => "comparison disabled by request",
        };
        f.write_str(text)
    }
}

/// Everything the planner would fetch for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPlan {
    pub report: ReportId,
    /// Report actually queried; differs from `report` for subtable reports.
    pub target: ReportId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_comparison: Option<FetchRequest>,
    pub base_segments: Vec<FetchRequest>,
    pub compared_segments: Vec<FetchRequest>,
}

pub struct ComparisonPlanner<'a, M: ?Sized> {
    report: ReportId,
    request: &'a RequestParams,
    metadata: &'a M,
}

impl<'a, M: ReportMetadataProvider + ?Sized> ComparisonPlanner<'a, M> {
    pub fn new(report: ReportId, request: &'a RequestParams, metadata: &'a M) -> Self {
        Self {
            report,
            request,
            metadata,
        }
    }

    pub fn report(&self) -> &ReportId {
        &self.report
    }

    pub fn request(&self) -> &RequestParams {
        self.request
    }

    /// `None` when comparison applies to this request.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.report.is_unknown() {
            return Some(SkipReason::UnknownReport);
        }
        if let Some(metadata) = self.metadata.find_report(&self.report) {
            if !metadata.has_dimension {
                return Some(SkipReason::NoDimension);
            }
        }
        if !self.request.flag("compare", true) {
            return Some(SkipReason::Disabled);
        }
        None
    }

    /// The report to query for comparison tables. Subtable-loading actions
    /// are answered from their first-level report so rows align on the top
    /// level table.
    pub fn fetch_target(&self) -> ReportId {
        self.metadata
            .find_first_level_report(&self.report)
            .map(|parent| parent.id())
            .unwrap_or_else(|| self.report.clone())
    }

    /// Base segment expression; segment comparison needs one.
    pub fn base_segment(&self) -> Option<&str> {
        self.request.non_empty("segment")
    }

    /// Alternate segments in `segment1..segment4` order, blanks skipped.
    pub fn alternate_segments(&self) -> Vec<&str> {
        (1..=MAX_SEGMENT_COMPARISONS)
            .filter_map(|i| self.request.non_empty(&format!("segment{}", i)))
            .collect()
    }

    /// The fetch for the same report over `date1`/`period1`.
    pub fn date_comparison(&self) -> Option<FetchRequest> {
        let date1 = self.request.non_empty("date1")?;
        let period1 = self.request.non_empty("period1")?;

        let mut params = self.comparison_params();
        params.remove("date1");
        params.remove("period1");

        // A multi-period base request would come back as a collection.
        let period = if self.base_is_multiple_period() {
            PeriodKind::Range.label()
        } else {
            period1
        };
        params.set("date", date1).set("period", period);

        Some(FetchRequest {
            report: self.fetch_target(),
            params,
            purpose: FetchPurpose::DateComparison,
        })
    }

    /// One fetch per alternate segment, evaluated over `period` when the
    /// compared table has one. Empty without a base segment.
    pub fn segment_comparisons(&self, period: Option<&Period>) -> Vec<FetchRequest> {
        if self.base_segment().is_none() {
            return Vec::new();
        }

        let target = self.fetch_target();
        let dates = period.map(|period| self.dates_for(period));

        self.alternate_segments()
            .into_iter()
            .map(|segment| {
                let mut params = self.comparison_params();
                params.set("segment", segment);
                if let Some((date, period)) = &dates {
                    params.set("date", date.as_str()).set("period", period.as_str());
                }
                FetchRequest {
                    report: target.clone(),
                    params,
                    purpose: FetchPurpose::SegmentComparison {
                        segment: segment.to_string(),
                    },
                }
            })
            .collect()
    }

    /// Full plan, given the periods of the base and date-comparison tables.
    pub fn plan(&self, base_period: Option<&Period>, compared_period: Option<&Period>) -> ComparisonPlan {
        let skipped = self.skip_reason();
        if skipped.is_some() {
            return ComparisonPlan {
                report: self.report.clone(),
                target: self.fetch_target(),
                skipped,
                date_comparison: None,
                base_segments: Vec::new(),
                compared_segments: Vec::new(),
            };
        }

        let date_comparison = self.date_comparison();
        let compared_segments = if date_comparison.is_some() {
            self.segment_comparisons(compared_period)
        } else {
            Vec::new()
        };

        ComparisonPlan {
            report: self.report.clone(),
            target: self.fetch_target(),
            skipped,
            date_comparison,
            base_segments: self.segment_comparisons(base_period),
            compared_segments,
        }
    }

    fn base_is_multiple_period(&self) -> bool {
        Period::is_multiple_period(
            self.request.get("date").unwrap_or_default(),
            self.request.get("period").unwrap_or_default(),
        )
    }

    /// `date`/`period` values that select exactly `period`.
    fn dates_for(&self, period: &Period) -> (String, String) {
        if self.base_is_multiple_period() || period.kind() == PeriodKind::Range {
            (period.range_string(), PeriodKind::Range.label().to_string())
        } else {
            (
                period.date_start().format("%Y-%m-%d").to_string(),
                period.label().to_string(),
            )
        }
    }

    /// Request shared by every comparison fetch: complete, flat, top level,
    /// and never compared again.
    fn comparison_params(&self) -> RequestParams {
        let mut params = normalize_first_level_request(self.request, self.request.clone());
        params.set("compare", "0").set("flat", "1");
        params.remove("idSubtable");
        params
    }
}

/// Make `outgoing` return every row of the first-level table: no paging,
/// no totals or expansion, no explicit sort. `flat` is dropped, and so is
/// `idSubtable` unless the `original` request carried it.
pub fn normalize_first_level_request(
    original: &RequestParams,
    mut outgoing: RequestParams,
) -> RequestParams {
    outgoing
        .set("totals", "0")
        .set("expanded", "0")
        .set("filter_limit", "-1")
        .set("filter_offset", "0")
        .set("filter_sort_column", "");

    outgoing.remove("flat");
    if !original.contains("idSubtable") {
        outgoing.remove("idSubtable");
    }
    outgoing
}
