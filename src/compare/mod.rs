pub mod engine;
pub mod merger;
pub mod planner;

pub use engine::ComparisonEngine;
pub use merger::MergeSummary;
pub use planner::{ComparisonPlan, ComparisonPlanner, SkipReason};
