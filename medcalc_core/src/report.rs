//! Human-readable rendering of calculation results.

use crate::dispatch::CalculationResult;
use chrono::NaiveDate;
use std::fmt::Write;

impl CalculationResult {
    /// One-line summary, dates rendered with `date_format`
    pub fn headline(&self, date_format: &str) -> String {
        match self {
            CalculationResult::Calories(r) => format!(
                "Your daily calorie needs: {} kcal",
                format_thousands(u64::from(r.tdee))
            ),
            CalculationResult::Ovulation(r) => format!(
                "Your estimated ovulation date is {}",
                format_date(r.ovulation_date, date_format)
            ),
            CalculationResult::Pregnancy(r) => format!(
                "Your expected due date is {}",
                format_date(r.due_date, date_format)
            ),
        }
    }
}

/// Render a date with a strftime pattern, falling back to ISO if the pattern is unusable
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Group digits in threes: 12345 -> "12,345"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
