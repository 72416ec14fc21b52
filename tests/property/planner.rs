use proptest::prelude::*;
use report_compare::compare::ComparisonPlanner;
use report_compare::{ReportId, ReportMetadata, ReportRegistry, RequestParams};

use crate::utils::request_pairs;

proptest! {
    #[test]
    fn test_planning_is_idempotent(pairs in request_pairs()) {
        let request: RequestParams = pairs.into_iter().collect();
        let registry = ReportRegistry::new().with_report(
            ReportMetadata::new("Referrers", "getWebsites").with_subtable_action("getUrlsFromWebsiteId"),
        );
        let planner = ComparisonPlanner::new(
            ReportId::new("Referrers", "getUrlsFromWebsiteId"),
            &request,
            &registry,
        );

        prop_assert_eq!(planner.plan(None, None), planner.plan(None, None));
    }

    #[test]
    fn test_comparison_fetches_never_recurse(pairs in request_pairs()) {
        let request: RequestParams = pairs.into_iter().collect();
        let registry = ReportRegistry::new();
        let planner = ComparisonPlanner::new(ReportId::new("Referrers", "getWebsites"), &request, &registry);

        let fetches = planner
            .date_comparison()
            .into_iter()
            .chain(planner.segment_comparisons(None));
        for fetch in fetches {
            prop_assert_eq!(fetch.params.get("compare"), Some("0"));
            prop_assert_eq!(fetch.params.get("flat"), Some("1"));
            prop_assert!(!fetch.params.contains("idSubtable"));
        }
    }
}
