//! Column selection over a `{headers, values}` summary result.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::jsonapi::attrs::string_list_attr;

use super::definition::SummaryDefinition;

/// Tabular summary result as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub headers: Vec<String>,
    pub values: Vec<Vec<Value>>,
}

/// Which columns to show.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSelection<'a> {
    pub group_by: &'a [String],
    pub metrics: &'a [String],
    pub all_metrics: bool,
}

impl SummaryTable {
    pub fn new(headers: Vec<String>, values: Vec<Vec<Value>>) -> Self {
        Self { headers, values }
    }

    /// Read `headers` and `values` from a summary resource's attributes.
    pub fn from_attributes(attrs: &Map<String, Value>) -> Self {
        let headers = string_list_attr(attrs, "headers");
        let values = match attrs.get("values") {
            Some(Value::Array(rows)) => rows
                .iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.clone(),
                    _ => Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { headers, values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reduce to the display subset.
    ///
    /// Group-by display columns come first, then metric columns in server
    /// header order. Columns are added first-seen only. An empty selection
    /// keeps every header. Short rows are padded with `null`.
    pub fn select(&self, definition: &SummaryDefinition, selection: ColumnSelection<'_>) -> Self {
        if self.headers.is_empty() {
            return self.clone();
        }

        let index: HashMap<&str, usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        let mut group_columns: HashSet<&str> = HashSet::new();
        let mut display_columns: Vec<&str> = Vec::new();
        for key in selection.group_by.iter().map(String::as_str) {
            match definition.group_by_columns(key) {
                Some(columns) => {
                    group_columns.extend(columns.all.iter().copied());
                    display_columns.extend(columns.display.iter().copied());
                }
                None if !key.is_empty() => {
                    group_columns.insert(key);
                    display_columns.push(key);
                }
                None => {}
            }
        }

        let metric_set: HashSet<&str> = selection.metrics.iter().map(String::as_str).collect();
        let metric_columns = self.headers.iter().map(String::as_str).filter(|h| {
            !group_columns.contains(h) && (selection.all_metrics || metric_set.contains(h))
        });

        let mut picked: Vec<usize> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut missing: Vec<&str> = Vec::new();
        for header in display_columns.iter().copied().chain(metric_columns) {
            if header.is_empty() || !seen.insert(header) {
                continue;
            }
            match index.get(header) {
                Some(&i) => picked.push(i),
                None => missing.push(header),
            }
        }

        if !missing.is_empty() {
            warn!(columns = %missing.join(", "), "requested columns not found");
        }

        if picked.is_empty() {
            return self.clone();
        }

        let headers = picked.iter().map(|&i| self.headers[i].clone()).collect();
        let values = self
            .values
            .iter()
            .map(|row| {
                picked
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { headers, values }
    }

    /// One `header -> cell` object per row.
    pub fn rows(&self) -> Vec<IndexMap<String, Value>> {
        self.values
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or(Value::Null)))
                    .collect()
            })
            .collect()
    }
}

/// JSON output shape for summaries.
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub headers: Vec<String>,
    pub values: Vec<Vec<Value>>,
    pub rows: Vec<IndexMap<String, Value>>,
}

impl From<SummaryTable> for SummaryOutput {
    fn from(table: SummaryTable) -> Self {
        let rows = table.rows();
        Self {
            headers: table.headers,
            values: table.values,
            rows,
        }
    }
}
