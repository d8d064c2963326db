//! Summary request building from CLI options.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value, json};

use crate::api::Query;
use crate::error::{Result, XbeError};

use super::definition::SummaryDefinition;

static SORT_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(:(asc|desc))?$").expect("sort term pattern is valid")
});

/// Raw summary flags as given on the command line.
///
/// `None` means the flag was not passed; `Some("")` means it was passed empty.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    pub start_on: Option<String>,
    pub end_on: Option<String>,
    pub group_by: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub metrics: Option<String>,
    pub metric: Vec<String>,
    pub all_metrics: bool,
    pub filters_json: Option<String>,
    pub filter: Vec<String>,
    pub min_transactions: Option<u32>,
    pub optional_features: Vec<String>,
}

/// A validated summary request.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub group_by: Vec<String>,
    pub sort: Vec<String>,
    /// Columns to keep when displaying the result.
    pub metrics: Vec<String>,
    pub all_metrics: bool,
    pub body: Value,
    pub query: Query,
}

/// Split a comma list, trimming and dropping empty items.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim, drop empties and keep the first occurrence of each value.
pub fn unique_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref().trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Merge `--filters` JSON with repeated `--filter key=value` pairs.
///
/// Pairs win over JSON keys of the same name.
pub fn parse_filters(filters_json: Option<&str>, pairs: &[String]) -> Result<Map<String, Value>> {
    let mut filters = Map::new();

    if let Some(raw) = filters_json.map(str::trim).filter(|s| !s.is_empty()) {
        filters = serde_json::from_str(raw)
            .map_err(|e| XbeError::validation(format!("invalid --filters JSON: {}", e)))?;
    }

    for pair in pairs.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(XbeError::validation(format!(
                "invalid --filter {:?} (expected key=value)",
                pair
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(XbeError::validation(format!(
                "invalid --filter {:?} (missing key)",
                pair
            )));
        }
        filters.insert(key.to_string(), Value::String(value.trim().to_string()));
    }

    Ok(filters)
}

fn required_date(flag: &str, value: Option<&str>) -> Result<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(XbeError::validation(format!("--{} is required", flag)));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        XbeError::validation(format!(
            "invalid --{} {:?} (expected YYYY-MM-DD)",
            flag, value
        ))
    })?;
    Ok(value.to_string())
}

fn validate_sort(sort: &[String]) -> Result<()> {
    match sort.iter().find(|term| !SORT_TERM.is_match(term)) {
        Some(term) => Err(XbeError::validation(format!(
            "invalid --sort term {:?} (expected column or column:asc|desc)",
            term
        ))),
        None => Ok(()),
    }
}

fn to_json_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

impl SummaryRequest {
    /// Validate flags and build the POST body for `definition`.
    pub fn build(definition: &SummaryDefinition, options: &SummaryOptions) -> Result<Self> {
        let mut attributes = Map::new();

        if definition.date_range {
            let start_on = required_date("start-on", options.start_on.as_deref())?;
            let end_on = required_date("end-on", options.end_on.as_deref())?;
            attributes.insert("start-on".to_string(), Value::String(start_on));
            attributes.insert("end-on".to_string(), Value::String(end_on));
        }

        let mut filters = parse_filters(options.filters_json.as_deref(), &options.filter)?;
        if definition.min_transactions {
            if let Some(min) = options.min_transactions.filter(|m| *m > 0) {
                filters.insert("material_transaction_count__min".to_string(), json!(min));
            }
        }
        attributes.insert("filters".to_string(), Value::Object(filters));

        let group_by = match &options.group_by {
            Some(raw) => split_comma_list(raw),
            None => definition.default_group_by.iter().map(|s| s.to_string()).collect(),
        };
        if options.group_by.is_some() || !group_by.is_empty() {
            attributes.insert("group-by".to_string(), to_json_list(&group_by));
        }

        let sort = match &options.sort {
            Some(raw) => split_comma_list(raw),
            None => definition.default_sort.iter().map(|s| s.to_string()).collect(),
        };
        validate_sort(&sort)?;
        if options.sort.is_some() || !sort.is_empty() {
            attributes.insert("sort".to_string(), to_json_list(&sort));
        }

        if let Some(limit) = options.limit.filter(|l| *l > 0) {
            attributes.insert("limit".to_string(), json!(limit));
        }

        let metrics = Self::resolve_metrics(definition, options);
        if definition.sends_metrics {
            let requested: Vec<String> = if options.all_metrics {
                definition
                    .all_metrics_request
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            } else {
                metrics.clone()
            };
            if !requested.is_empty() {
                attributes.insert("included-metrics".to_string(), to_json_list(&requested));
            }
        }

        let mut query = Query::new();
        let features = unique_strings(&options.optional_features);
        if !features.is_empty() {
            query.set("meta[optional-features]", features.join(","));
        }

        let body = json!({
            "data": {
                "type": definition.kind,
                "attributes": attributes,
            }
        });

        Ok(Self {
            group_by,
            sort,
            metrics,
            all_metrics: options.all_metrics,
            body,
            query,
        })
    }

    fn resolve_metrics(definition: &SummaryDefinition, options: &SummaryOptions) -> Vec<String> {
        if options.all_metrics {
            return Vec::new();
        }
        if options.metrics.is_none() && options.metric.is_empty() {
            return definition
                .default_metrics
                .iter()
                .map(|s| s.to_string())
                .collect();
        }
        let listed = options
            .metrics
            .as_deref()
            .map(split_comma_list)
            .unwrap_or_default();
        unique_strings(listed.iter().chain(options.metric.iter()))
    }
}
