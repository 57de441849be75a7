//! GST computation: rate extraction and multi-rate distribution

pub mod distributor;

pub use distributor::*;

use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;

static RATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(\.\d+)?").expect("rate pattern is valid"));

/// Extract a tax rate from a tax-category label.
///
/// The first numeric run wins, surrounding text notwithstanding:
/// `"GST 18%"`, `"18%"` and `"18"` all yield 18. Labels without a numeric
/// run yield zero.
pub fn rate_from_label(label: &str) -> BigDecimal {
    RATE_PATTERN
        .find(label)
        .and_then(|m| m.as_str().parse::<BigDecimal>().ok())
        .unwrap_or_else(|| BigDecimal::from(0))
}
