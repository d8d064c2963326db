//! Display formatting for summary cells.
//!
//! Formatting is driven by the column name; values are never recomputed.

use serde_json::Value;

use crate::render::truncate;

/// Budget for `*_name` columns.
pub const NAME_MAX: usize = 35;

/// Format one cell for table output.
pub fn format_value(header: &str, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => format_string(header, s),
        Value::Number(n) => match n.as_f64() {
            Some(number) => format_number(header, number),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Trimmed text; `*_name` columns are truncated.
pub fn format_string(header: &str, value: &str) -> String {
    let value = value.trim();
    if header.to_lowercase().ends_with("_name") {
        return truncate(value, NAME_MAX);
    }
    value.to_string()
}

/// Number formatted by column-name heuristics, first match wins.
pub fn format_number(header: &str, value: f64) -> String {
    let header = header.to_lowercase();

    if header.ends_with("_pct") {
        let percent = if value <= 1.5 { value * 100.0 } else { value };
        return format!("{:.1}%", percent);
    }
    if header.ends_with("_count") || (header.ends_with("_sum") && header.contains("trip")) {
        return format!("{}", (value + 0.5).trunc() as i64);
    }
    if header.contains("revenue") || header.contains("cost") || header.contains("margin") {
        return format!("${:.2}", value);
    }
    if header.contains("tons") {
        return format!("{:.2}", value);
    }
    if header.contains("hours") || header.contains("miles") || header.contains("minutes") {
        return format!("{:.1}", value);
    }
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return format!("{}", value as i64);
    }
    format!("{:.2}", value)
}

/// Unformatted cell text for CSV output.
pub fn raw_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percent_scales_fractions_only() {
        assert_eq!(format_number("on_time_pct", 0.42), "42.0%");
        assert_eq!(format_number("on_time_pct", 87.3), "87.3%");
        assert_eq!(format_number("on_time_pct", 1.5), "150.0%");
        assert_eq!(format_number("margin_pct", 0.1), "10.0%");
    }

    #[test]
    fn test_counts_round_to_integers() {
        assert_eq!(format_number("shift_count", 4.6), "5");
        assert_eq!(format_number("shift_count", 4.4), "4");
        assert_eq!(format_number("trip_sum", 12.5), "13");
    }

    #[test]
    fn test_name_based_decimals() {
        assert_eq!(format_number("revenue_sum", 1234.5), "$1234.50");
        assert_eq!(format_number("cost_avg", 3.0), "$3.00");
        assert_eq!(format_number("tons_sum", 22.0), "22.00");
        assert_eq!(format_number("hours_sum", 7.26), "7.3");
        assert_eq!(format_number("travel_miles", 3.0), "3.0");
        assert_eq!(format_number("cycle_minutes_median", 41.06), "41.1");
    }

    #[test]
    fn test_fallback_integers_and_floats() {
        assert_eq!(format_number("year", 2025.0), "2025");
        assert_eq!(format_number("ratio", 0.333), "0.33");
    }

    #[test]
    fn test_format_value_by_type() {
        assert_eq!(format_value("x", &Value::Null), "");
        assert_eq!(format_value("managed", &json!(true)), "true");
        assert_eq!(format_value("shift_count", &json!(3)), "3");
        assert_eq!(format_value("date", &json!(" 2025-01-02 ")), "2025-01-02");
        assert_eq!(
            format_value("driver_name", &json!("Alexandria Catherine Montgomery-Smythe")),
            "Alexandria Catherine Montgomery-..."
        );
    }

    #[test]
    fn test_raw_value() {
        assert_eq!(raw_value(&json!(0.42)), "0.42");
        assert_eq!(raw_value(&json!("x")), "x");
        assert_eq!(raw_value(&Value::Null), "");
    }
}
