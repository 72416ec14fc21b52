use proptest::prelude::*;
use report_compare::compare::merger::{merge_date_comparison, merge_segment_comparison};
use report_compare::Table;
use std::collections::HashSet;

use crate::utils::{any_table, unique_table};

fn labels(table: &Table) -> Vec<String> {
    table.rows().map(|row| row.label.clone()).collect()
}

proptest! {
    #[test]
    fn test_date_merge_keeps_exactly_matched_labels_in_order(
        base in unique_table(),
        compared in any_table(),
    ) {
        let compared_labels: HashSet<_> = compared.rows().map(|row| row.label.clone()).collect();
        let expected: Vec<_> = labels(&base)
            .into_iter()
            .filter(|label| compared_labels.contains(label))
            .collect();

        let mut merged = base.clone();
        let summary = merge_date_comparison(&mut merged, &compared, "now", "then", None);

        prop_assert_eq!(labels(&merged), expected.clone());
        prop_assert_eq!(summary.kept, expected.len());
        prop_assert_eq!(summary.kept + summary.dropped, base.row_count());
        for row in merged.rows() {
            prop_assert!(row.columns.is_empty());
            let sub = row.subtable().expect("compared row has a subtable");
            prop_assert_eq!(sub.labels(), vec!["now", "then"]);
        }
    }

    #[test]
    fn test_segment_merge_requires_presence_everywhere(
        base in unique_table(),
        first in any_table(),
        second in any_table(),
    ) {
        let mut first = first;
        first.set_segment("s1");
        let mut second = second;
        second.set_segment("s2");
        let in_first: HashSet<_> = first.rows().map(|row| row.label.clone()).collect();
        let in_second: HashSet<_> = second.rows().map(|row| row.label.clone()).collect();
        let expected: Vec<_> = labels(&base)
            .into_iter()
            .filter(|label| in_first.contains(label) && in_second.contains(label))
            .collect();

        let mut merged = base.clone();
        merged.set_segment("base");
        merge_segment_comparison(&mut merged, &[first, second]);

        prop_assert_eq!(labels(&merged), expected);
        for row in merged.rows() {
            let sub = row.subtable().expect("compared row has a subtable");
            prop_assert_eq!(sub.labels(), vec!["base", "s1", "s2"]);
        }
    }
}
