//! Output rendering: aligned tables, detail views, JSON and sparse fieldsets.

mod details;
mod json;
pub mod sparse;
mod table;

pub use details::Details;
pub use json::{strip_nulls, write_json};
pub use table::{TRUNCATION_MARKER, Table, truncate};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    pub json: bool,
    pub omit_null: bool,
}

impl OutputMode {
    pub fn table() -> Self {
        Self::default()
    }

    pub fn json() -> Self {
        Self {
            json: true,
            omit_null: false,
        }
    }
}
