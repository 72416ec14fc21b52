use crate::compare::ComparisonPlan;
use crate::fetcher::{FetchPurpose, FetchRequest};
use crate::output::OutputConfig;
use crate::table::{Row, Table};
use crossterm::style::Stylize;
use itertools::Itertools;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pretty printing utilities for comparison output
pub struct Formatter;

impl Formatter {
    /// Format a metric value, dropping the fraction for whole numbers.
    pub fn format_metric(value: f64) -> String {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{:.0}", value)
        } else {
            format!("{}", value)
        }
    }

    /// Format a row's metrics as `name=value` pairs.
    pub fn format_columns(row: &Row) -> String {
        row.columns
            .iter()
            .map(|(name, value)| format!("{}={}", name, Self::format_metric(*value)))
            .join(", ")
    }

    /// Render a table and its nested subtables as an indented tree.
    pub fn format_table(table: &Table) -> String {
        if table.is_empty() {
            return "(no comparable rows)".to_string();
        }

        let mut lines = Vec::new();
        for row in table.rows() {
            lines.push(Self::format_row_line(row));
            if let Some(subtable) = row.subtable() {
                Self::format_subtable(subtable, "", &mut lines);
            }
        }
        OutputConfig::to_ascii(&lines.join("\n"))
    }

    fn format_subtable(table: &Table, prefix: &str, lines: &mut Vec<String>) {
        let count = table.row_count();
        for (i, row) in table.rows().enumerate() {
            let last = i + 1 == count;
            let branch = if last { "└─ " } else { "├─ " };
            lines.push(format!("{}{}{}", prefix, branch, Self::format_row_line(row)));

            if let Some(subtable) = row.subtable() {
                let child_prefix = format!("{}{}", prefix, if last { "   " } else { "│  " });
                Self::format_subtable(subtable, &child_prefix, lines);
            }
        }
    }

    fn format_row_line(row: &Row) -> String {
        if row.columns.is_empty() {
            row.label.clone()
        } else {
            format!("{}  {}", row.label, Self::format_columns(row))
        }
    }

    /// Format a single planned fetch.
    pub fn format_fetch_request(request: &FetchRequest) -> String {
        let purpose = match &request.purpose {
            FetchPurpose::DateComparison => "date".to_string(),
            FetchPurpose::SegmentComparison { segment } => format!("segment {}", segment),
        };
        format!("[{}] {} ?{}", purpose, request.report, request.params)
    }

    /// Render the fetch plan the planner derived for a request.
    pub fn format_plan(plan: &ComparisonPlan) -> String {
        let mut lines = vec![
            format!("Comparison plan for {}", plan.report),
            OutputConfig::double_rule_line(40),
        ];

        if let Some(reason) = &plan.skipped {
            lines.push(format!("  skipped: {}", reason));
            return lines.join("\n");
        }
        if plan.target != plan.report {
            lines.push(format!("  fetching first-level report {}", plan.target));
        }

        let requests = plan
            .date_comparison
            .iter()
            .chain(&plan.base_segments)
            .chain(&plan.compared_segments)
            .collect::<Vec<_>>();
        if requests.is_empty() {
            lines.push("  (nothing to compare)".to_string());
        }
        for request in requests {
            lines.push(format!("  {}", Self::format_fetch_request(request)));
        }
        OutputConfig::to_ascii(&lines.join("\n"))
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Info)
    }

    /// Format a success message in green.
    pub fn success(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Success)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Warning)
    }

    /// Format an error message in red.
    pub fn error(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Error)
    }

    /// Configure whether ANSI colors are enabled.
    pub fn configure_colors(enable: bool) {
        COLOR_ENABLED.store(enable, Ordering::Relaxed);
    }

    /// Auto-configure color output based on environment.
    pub fn configure_colors_from_env() {
        Self::configure_colors(OutputConfig::colors_enabled());
    }

    fn apply_color(message: &str, kind: ColorKind) -> String {
        if !COLOR_ENABLED.load(Ordering::Relaxed) {
            return message.to_string();
        }

        match kind {
            ColorKind::Info => format!("{}", message.blue()),
            ColorKind::Success => format!("{}", message.green()),
            ColorKind::Warning => format!("{}", message.yellow()),
            ColorKind::Error => format!("{}", message.red()),
        }
    }
}

#[derive(Copy, Clone)]
enum ColorKind {
    Info,
    Success,
    Warning,
    Error,
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
