//! Smart date parsing with financial-year inference
//!
//! Voucher dates are typed as full forms ("05-04-2025", "2025-04-05") or
//! short day-month forms ("5-4"). Short forms borrow their year from the
//! financial year in effect, which in turn is read from a reference name
//! (company databases are conventionally named after the FY start year).
//! The financial year begins in April: months April-December fall in the
//! start year, January-March in the following calendar year.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SHORT_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-/.](\d{1,2})$").expect("short date pattern is valid"));

static YEAR_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"20\d{2}").expect("year token pattern is valid"));

const FULL_DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// A financial year identified by its April start year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancialYear {
    /// Calendar year the financial year starts in (April 1)
    pub start_year: i32,
}

impl FinancialYear {
    /// Create a financial year from its start year.
    pub const fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Infer the financial year from a reference name.
    ///
    /// The last `20xx` token in the reference wins, so "TRADERS_2024_2025"
    /// resolves to a 2025 start. Falls back to the injected year when no
    /// token is present; callers supply "today's year" explicitly rather
    /// than reading ambient state.
    pub fn from_reference(reference: &str, fallback_year: i32) -> Self {
        let start_year = YEAR_TOKEN_PATTERN
            .find_iter(reference)
            .last()
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(fallback_year);
        Self { start_year }
    }

    /// Resolve the calendar year for a month of this financial year.
    ///
    /// April-December belong to the start year, January-March to the next;
    /// months outside 1-12 have no year.
    pub fn resolve_year(&self, month: u32) -> Option<i32> {
        match month {
            4..=12 => Some(self.start_year),
            1..=3 => Some(self.start_year + 1),
            _ => None,
        }
    }
}

/// A successfully parsed voucher date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartDate {
    /// The resolved calendar date
    pub date: NaiveDate,
}

impl SmartDate {
    /// ISO form, "YYYY-MM-DD"
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Display form, "DD-MM-YYYY"
    pub fn display(&self) -> String {
        self.date.format("%d-%m-%Y").to_string()
    }
}

/// Parse a full or partial date string.
///
/// Full forms are tried in order DD-MM-YYYY, DD/MM/YYYY, YYYY-MM-DD; the
/// first match wins. A short day-month form infers its year from the given
/// financial year. Unrecognized input and invalid calendar dates (Feb 30)
/// yield `None` so callers can fall back to a default.
pub fn parse_smart_date(input: &str, financial_year: &FinancialYear) -> Option<SmartDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in FULL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(SmartDate { date });
        }
    }

    let captures = SHORT_DATE_PATTERN.captures(trimmed)?;
    let day: u32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;

    let year = financial_year.resolve_year(month)?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| SmartDate { date })
}
