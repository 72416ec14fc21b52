//! Report identities and the metadata the comparison needs about them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A report is addressed by its API module and action, e.g.
/// `Referrers.getWebsites`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId {
    pub module: String,
    pub action: String,
}

impl ReportId {
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
        }
    }

    /// True when module or action is missing.
    pub fn is_unknown(&self) -> bool {
        self.module.trim().is_empty() || self.action.trim().is_empty()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.action)
    }
}

fn default_true() -> bool {
    true
}

/// Static description of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub module: String,
    pub action: String,
    /// Reports without a grouping dimension (plain totals) cannot be compared.
    #[serde(default = "default_true")]
    pub has_dimension: bool,
    /// Action that loads this report's drill-down subtables, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_to_load_subtables: Option<String>,
}

impl ReportMetadata {
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
            has_dimension: true,
            action_to_load_subtables: None,
        }
    }

    pub fn without_dimension(mut self) -> Self {
        self.has_dimension = false;
        self
    }

    pub fn with_subtable_action(mut self, action: impl Into<String>) -> Self {
        self.action_to_load_subtables = Some(action.into());
        self
    }

    pub fn id(&self) -> ReportId {
        ReportId::new(self.module.clone(), self.action.clone())
    }

    fn is(&self, id: &ReportId) -> bool {
        self.module == id.module && self.action == id.action
    }
}

/// Source of report metadata.
pub trait ReportMetadataProvider {
    fn all_reports(&self) -> &[ReportMetadata];

    fn find_report(&self, id: &ReportId) -> Option<&ReportMetadata> {
        self.all_reports().iter().find(|report| report.is(id))
    }

    /// When `id` is the action that loads another report's subtables, return
    /// that parent (first-level) report.
    fn find_first_level_report(&self, id: &ReportId) -> Option<&ReportMetadata> {
        self.all_reports().iter().find(|report| {
            report.module == id.module
                && report.action_to_load_subtables.as_deref() == Some(id.action.as_str())
        })
    }
}

/// In-memory list of known reports.
#[derive(Debug, Clone, Default)]
pub struct ReportRegistry {
    reports: Vec<ReportMetadata>,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, report: ReportMetadata) -> Self {
        self.register(report);
        self
    }

    /// Add a report, replacing an earlier entry for the same module/action.
    pub fn register(&mut self, report: ReportMetadata) {
        match self.reports.iter_mut().find(|r| r.is(&report.id())) {
            Some(existing) => *existing = report,
            None => self.reports.push(report),
        }
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl ReportMetadataProvider for ReportRegistry {
    fn all_reports(&self) -> &[ReportMetadata] {
        &self.reports
    }
}

impl FromIterator<ReportMetadata> for ReportRegistry {
    fn from_iter<I: IntoIterator<Item = ReportMetadata>>(iter: I) -> Self {
        let mut registry = Self::new();
        for report in iter {
            registry.register(report);
        }
        registry
    }
}
