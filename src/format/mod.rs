//! Presentation formatting: pure display mappings
//!
//! Stateless functions from domain values to display strings and style
//! tokens. Same input, same output; no network, no side effects. Unknown
//! status codes fail soft with an "Unknown"/default style instead of
//! panicking.

use chrono::{DateTime, Utc};

/// Display label and color token for a status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: &'static str,
}

/// Map a status code to its display style
pub fn status_style(status: &str) -> StatusStyle {
    match status {
        "pending" => StatusStyle {
            label: "Pending",
            color: "amber",
        },
        "confirmed" => StatusStyle {
            label: "Confirmed",
            color: "sky",
        },
        "in_progress" => StatusStyle {
            label: "In progress",
            color: "blue",
        },
        "completed" => StatusStyle {
            label: "Completed",
            color: "green",
        },
        "approved" => StatusStyle {
            label: "Approved",
            color: "green",
        },
        "cancelled" => StatusStyle {
            label: "Cancelled",
            color: "red",
        },
        "rejected" => StatusStyle {
            label: "Rejected",
            color: "red",
        },
        "refunded" => StatusStyle {
            label: "Refunded",
            color: "purple",
        },
        _ => StatusStyle {
            label: "Unknown",
            color: "gray",
        },
    }
}

pub fn status_label(status: &str) -> &'static str {
    status_style(status).label
}

pub fn status_color(status: &str) -> &'static str {
    status_style(status).color
}

/// Format a date for display, e.g. "05 Mar 2026"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y").to_string()
}

/// Format a date with time for display, e.g. "05 Mar 2026 14:30"
pub fn format_datetime(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y %H:%M").to_string()
}

/// Format a monetary amount with thousands separators, e.g. "$1,234.50"
///
/// NaN and infinities fall back to "0.00"; finite amounts beyond `u64`
/// cents saturate at the largest representable value.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{symbol}0.00");
    }
    let negative = amount < 0.0;
    // The float-to-int cast saturates rather than wrapping.
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{fraction:02}")
}

/// Turn an enum-like code into a human label, e.g. "in_progress" → "In progress"
///
/// Empty input falls back to "Unknown".
pub fn humanize(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return "Unknown".to_string();
    }
    let spaced = trimmed.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_known_status_styles() {
        assert_eq!(status_label("pending"), "Pending");
        assert_eq!(status_color("pending"), "amber");
        assert_eq!(status_label("cancelled"), "Cancelled");
        assert_eq!(status_color("completed"), "green");
    }

    #[test]
    fn test_unknown_status_fails_soft() {
        let style = status_style("definitely_not_a_status");
        assert_eq!(style.label, "Unknown");
        assert_eq!(style.color, "gray");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(&date), "05 Mar 2026");
        assert_eq!(format_datetime(&date), "05 Mar 2026 14:30");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(7.5, "$"), "$7.50");
        assert_eq!(format_currency(1234.5, "$"), "$1,234.50");
        assert_eq!(format_currency(1_234_567.89, "R$ "), "R$ 1,234,567.89");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-42.0, "$"), "-$42.00");
    }

    #[test]
    fn test_format_currency_rounds_to_cents() {
        assert_eq!(format_currency(9.999, "$"), "$10.00");
    }

    #[test]
    fn test_format_currency_non_finite_falls_back_to_zero() {
        assert_eq!(format_currency(f64::NAN, "$"), "$0.00");
        assert_eq!(format_currency(f64::INFINITY, "$"), "$0.00");
        assert_eq!(format_currency(f64::NEG_INFINITY, "$"), "$0.00");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("in_progress"), "In progress");
        assert_eq!(humanize("approved"), "Approved");
        assert_eq!(humanize(""), "Unknown");
        assert_eq!(humanize("   "), "Unknown");
    }
}
