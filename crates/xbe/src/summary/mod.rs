//! Aggregation summaries.
//!
//! A summary command posts a [`SummaryRequest`] and gets back a single
//! resource whose attributes hold a `headers`/`values` table. The table is
//! narrowed with [`SummaryTable::select`] and rendered with
//! [`format_value`] (table output) or [`raw_value`] (CSV).

mod definition;
mod format;
mod request;
mod select;

pub use definition::{
    DRIVER_DAY_SUMMARY, FeatureFlag, GroupByColumns, LANE_SUMMARY, MATERIAL_TRANSACTION_SUMMARY,
    SHIFT_SUMMARY, SUMMARIES, SummaryDefinition, find_summary,
};
pub use format::{NAME_MAX, format_number, format_string, format_value, raw_value};
pub use request::{
    SummaryOptions, SummaryRequest, parse_filters, split_comma_list, unique_strings,
};
pub use select::{ColumnSelection, SummaryOutput, SummaryTable};
