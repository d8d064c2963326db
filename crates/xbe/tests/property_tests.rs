//! Property-based tests for rendering and summary reshaping.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p xbe --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p xbe --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::Value;

use xbe::render::sparse::parse_fields;
use xbe::render::{TRUNCATION_MARKER, Table, truncate};
use xbe::resources::write::parse_organization;
use xbe::summary::{
    ColumnSelection, SHIFT_SUMMARY, SummaryTable, format_value, split_comma_list, unique_strings,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Printable text including multi-byte characters.
fn cell_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _\\-éü漢]{0,60}"
}

fn header_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("driver_id".to_string()),
        Just("driver_name".to_string()),
        Just("shift_count".to_string()),
        Just("hours_sum".to_string()),
        Just("tons_sum".to_string()),
        "[a-z]{1,8}_(sum|count|pct|avg)",
    ]
}

fn cell_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6..1.0e6f64).prop_map(|n| serde_json::json!(n)),
        any::<i32>().prop_map(Value::from),
        "[A-Za-z ]{0,40}".prop_map(Value::String),
    ]
}

/// A summary table with unique headers and rows of varying length.
fn summary_table() -> impl Strategy<Value = SummaryTable> {
    prop::collection::vec(header_name(), 0..7)
        .prop_map(unique_strings)
        .prop_flat_map(|headers| {
            let width = headers.len();
            let rows = prop::collection::vec(
                prop::collection::vec(cell_value(), 0..=width + 1),
                0..5,
            );
            (Just(headers), rows)
        })
        .prop_map(|(headers, values)| SummaryTable::new(headers, values))
}

fn metric_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(header_name(), 0..4)
}

// =============================================================================
// Truncation Properties
// =============================================================================

mod truncate_tests {
    use super::*;

    proptest! {
        /// Truncated text never exceeds the budget.
        #[test]
        fn never_exceeds_budget(input in cell_text(), max in 0usize..50) {
            prop_assert!(truncate(&input, max).chars().count() <= max);
        }

        /// Text within budget is unchanged.
        #[test]
        fn short_text_unchanged(input in cell_text()) {
            let max = input.chars().count();
            prop_assert_eq!(truncate(&input, max), input.clone());
            prop_assert_eq!(truncate(&input, max + 5), input);
        }

        /// Cut text ends with the marker when there is room for it.
        #[test]
        fn cut_text_has_marker(input in "[a-z]{10,40}", max in 4usize..10) {
            let cut = truncate(&input, max);
            prop_assert!(cut.ends_with(TRUNCATION_MARKER));
            prop_assert_eq!(cut.chars().count(), max);
        }

        /// Every rendered table line starts with the first cell of its row.
        #[test]
        fn table_lines_follow_rows(rows in prop::collection::vec(("[a-z0-9]{1,10}", cell_text()), 0..6)) {
            let mut table = Table::new().column("ID").truncated("NAME", 12);
            for (id, name) in &rows {
                table.add_row([id.as_str(), name.as_str()]);
            }
            let text = table.to_text();
            let lines: Vec<&str> = text.lines().collect();
            prop_assert_eq!(lines.len(), rows.len() + 1);
            for (line, (id, _)) in lines.iter().skip(1).zip(&rows) {
                prop_assert!(line.starts_with(id.as_str()));
            }
        }
    }
}

// =============================================================================
// Summary Selection Properties
// =============================================================================

mod select_tests {
    use super::*;

    proptest! {
        /// Selecting twice gives the same result as selecting once.
        #[test]
        fn select_is_idempotent(
            table in summary_table(),
            metrics in metric_names(),
            all_metrics in any::<bool>(),
        ) {
            let group_by = vec!["driver".to_string()];
            let selection = ColumnSelection {
                group_by: &group_by,
                metrics: &metrics,
                all_metrics,
            };
            let once = table.select(&SHIFT_SUMMARY, selection);
            let twice = once.select(&SHIFT_SUMMARY, selection);
            prop_assert_eq!(once, twice);
        }

        /// Selected rows are rectangular and keep the row count.
        #[test]
        fn select_keeps_rows(table in summary_table(), metrics in metric_names()) {
            let group_by = vec!["driver".to_string()];
            let selected = table.select(
                &SHIFT_SUMMARY,
                ColumnSelection { group_by: &group_by, metrics: &metrics, all_metrics: false },
            );
            prop_assert_eq!(selected.values.len(), table.values.len());
            if selected.headers != table.headers {
                for row in &selected.values {
                    prop_assert_eq!(row.len(), selected.headers.len());
                }
            }
            prop_assert_eq!(selected.rows().len(), selected.values.len());
        }

        /// Formatting never panics on any cell.
        #[test]
        fn format_value_never_panics(header in header_name(), value in cell_value()) {
            let _ = format_value(&header, &value);
        }
    }
}

// =============================================================================
// Flag Parsing Properties
// =============================================================================

mod parsing_tests {
    use super::*;

    proptest! {
        /// Comma lists never yield blank or padded items.
        #[test]
        fn comma_lists_are_trimmed(raw in "[a-z, ]{0,40}") {
            for item in split_comma_list(&raw) {
                prop_assert!(!item.is_empty());
                prop_assert_eq!(item.trim(), item.as_str());
            }
        }

        /// Parsed field lists contain no duplicates.
        #[test]
        fn parsed_fields_are_unique(raw in "[a-c, ]{0,30}") {
            let fields = parse_fields(&raw);
            let mut deduped = fields.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), fields.len());
        }

        /// `Type|ID` values always resolve to a plural type.
        #[test]
        fn organizations_are_plural(kind in "[A-Za-z]{1,12}", id in "[0-9]{1,6}") {
            let identifier = parse_organization(&format!("{}|{}", kind, id)).unwrap();
            prop_assert!(identifier.kind.ends_with('s'));
            prop_assert_eq!(identifier.id, id);
        }

        /// Values without a separator are rejected.
        #[test]
        fn organizations_need_separator(raw in "[A-Za-z0-9]{0,20}") {
            prop_assert!(parse_organization(&raw).is_err());
        }
    }
}
