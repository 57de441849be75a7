//! Discount expression parsing and price resolution
//!
//! Discounts arrive as a `+`-delimited expression interpreted positionally:
//! `"5+2+20"` applies 5% then 2% to the unit price, then subtracts a flat 20
//! from the line total before dividing back per unit. The expression is
//! resolved once into a tagged grammar and applied from there, so a
//! malformed token has exactly one meaning: no effect.

use bigdecimal::BigDecimal;

use crate::types::{round_money, FieldValue};

/// How a discount expression is structured for the field it was typed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountMode {
    /// Single percentage, or `0+X` for a flat per-unit amount
    Simple,
    /// Up to two sequential percentages plus a flat amount off the line total
    Compound,
}

/// A discount expression resolved into its grammar
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountExpression {
    /// Empty or undefined expression; price passes through unchanged
    Empty,
    /// Single percentage off the price
    Percent(BigDecimal),
    /// Two percentages applied sequentially
    PercentPercent(BigDecimal, BigDecimal),
    /// Two sequential percentages, then a flat amount off the line total
    PercentPercentFlat(BigDecimal, BigDecimal, BigDecimal),
    /// Flat amount off the per-unit price (Simple mode `0+X`)
    FlatPerUnit(BigDecimal),
}

impl DiscountExpression {
    /// Resolve an expression string under the given mode.
    ///
    /// Empty or unparseable sub-tokens coerce to zero; a form the mode does
    /// not define resolves to [`DiscountExpression::Empty`]. Parsing never
    /// fails.
    pub fn parse(text: &str, mode: DiscountMode) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return DiscountExpression::Empty;
        }

        let parts: Vec<&str> = trimmed.split('+').map(str::trim).collect();

        match mode {
            DiscountMode::Compound => match parts.len() {
                1 => match parse_percent_token(parts[0]) {
                    Some(percent) => DiscountExpression::Percent(percent),
                    None => DiscountExpression::Empty,
                },
                2 => DiscountExpression::PercentPercent(
                    parse_sub_token(parts[0]),
                    parse_sub_token(parts[1]),
                ),
                // Extra tokens beyond the third carry no meaning
                _ => DiscountExpression::PercentPercentFlat(
                    parse_sub_token(parts[0]),
                    parse_sub_token(parts[1]),
                    parse_sub_token(parts[2]),
                ),
            },
            DiscountMode::Simple => {
                if parts.len() == 2 && parts[0] == "0" {
                    DiscountExpression::FlatPerUnit(parse_sub_token(parts[1]))
                } else if parts.len() == 1 {
                    match parse_percent_token(parts[0]) {
                        Some(percent) => DiscountExpression::Percent(percent),
                        None => DiscountExpression::Empty,
                    }
                } else {
                    DiscountExpression::Empty
                }
            }
        }
    }

    /// Apply the resolved discount to a list price.
    ///
    /// The flat token of the compound form works on the line total
    /// (`price × quantity`); a non-positive quantity guards that division
    /// and yields zero. The result is always rounded to 2 decimals.
    pub fn apply(&self, list_price: &BigDecimal, quantity: &BigDecimal) -> BigDecimal {
        let mut price = list_price.clone();

        match self {
            DiscountExpression::Empty => {}
            DiscountExpression::Percent(percent) => {
                price = apply_percent(&price, percent);
            }
            DiscountExpression::PercentPercent(first, second) => {
                price = apply_percent(&price, first);
                price = apply_percent(&price, second);
            }
            DiscountExpression::PercentPercentFlat(first, second, flat) => {
                price = apply_percent(&price, first);
                price = apply_percent(&price, second);
                if *flat != BigDecimal::from(0) {
                    price = if *quantity > BigDecimal::from(0) {
                        (&price * quantity - flat) / quantity
                    } else {
                        BigDecimal::from(0)
                    };
                }
            }
            DiscountExpression::FlatPerUnit(flat) => {
                price -= flat;
            }
        }

        round_money(&price)
    }
}

/// Resolve a final per-unit price from a list price and discount expression.
///
/// List price and quantity accept raw field text; a blank list price coerces
/// to zero, a blank quantity defaults to 1 so flat-amount discounts behave
/// on a single-unit line while the quantity field is still untouched.
pub fn resolve_price(
    list_price: impl Into<FieldValue>,
    expression: &str,
    quantity: impl Into<FieldValue>,
    mode: DiscountMode,
) -> BigDecimal {
    let price = list_price.into().to_decimal();
    let qty = quantity.into().to_decimal_or(BigDecimal::from(1));
    DiscountExpression::parse(expression, mode).apply(&price, &qty)
}

fn apply_percent(price: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
    price - (price * percent) / BigDecimal::from(100)
}

/// Parse a sub-token of a multi-token expression; empty or unparseable
/// tokens coerce to zero.
fn parse_sub_token(token: &str) -> BigDecimal {
    if token.is_empty() {
        return BigDecimal::from(0);
    }
    token.parse::<BigDecimal>().unwrap_or_else(|_| BigDecimal::from(0))
}

/// Parse a single percentage token with an optional trailing `%`.
fn parse_percent_token(token: &str) -> Option<BigDecimal> {
    let stripped = token.strip_suffix('%').unwrap_or(token).trim();
    stripped.parse::<BigDecimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_empty_expression_returns_list_price() {
        assert_eq!(
            resolve_price(100, "", 1, DiscountMode::Compound),
            BigDecimal::from(100)
        );
        assert_eq!(
            resolve_price(100, "   ", 5, DiscountMode::Simple),
            BigDecimal::from(100)
        );
    }

    #[test]
    fn test_compound_single_percentage() {
        assert_eq!(resolve_price(100, "10", 1, DiscountMode::Compound), dec("90"));
        assert_eq!(resolve_price(100, "10%", 1, DiscountMode::Compound), dec("90"));
    }

    #[test]
    fn test_compound_sequential_percentages() {
        // 10% then 10% compounds to 81, not an additive 80
        assert_eq!(resolve_price(100, "10+10", 1, DiscountMode::Compound), dec("81"));
        assert_eq!(resolve_price(100, "5+2", 1, DiscountMode::Compound), dec("93.1"));
    }

    #[test]
    fn test_compound_flat_amount_on_line_total() {
        // 100 -> 90 -> 81 per unit; total 162; minus 20 = 142; back per unit = 71
        assert_eq!(
            resolve_price(100, "10+10+20", 2, DiscountMode::Compound),
            dec("71")
        );
    }

    #[test]
    fn test_compound_flat_amount_zero_quantity() {
        assert_eq!(
            resolve_price(100, "0+0+20", 0, DiscountMode::Compound),
            BigDecimal::from(0)
        );
    }

    #[test]
    fn test_compound_empty_sub_tokens_default_to_zero() {
        assert_eq!(resolve_price(100, "+10", 1, DiscountMode::Compound), dec("90"));
        assert_eq!(resolve_price(100, "10++", 1, DiscountMode::Compound), dec("90"));
        assert_eq!(resolve_price(100, "0+0+20", 1, DiscountMode::Compound), dec("80"));
    }

    #[test]
    fn test_compound_unparseable_tokens_are_ignored() {
        assert_eq!(resolve_price(100, "abc", 1, DiscountMode::Compound), dec("100"));
        assert_eq!(
            resolve_price(100, "abc+10", 1, DiscountMode::Compound),
            dec("90")
        );
        assert_eq!(
            resolve_price(100, "10+abc+xyz", 1, DiscountMode::Compound),
            dec("90")
        );
    }

    #[test]
    fn test_simple_percentage() {
        assert_eq!(resolve_price(100, "20", 1, DiscountMode::Simple), dec("80"));
        assert_eq!(resolve_price(100, "20%", 1, DiscountMode::Simple), dec("80"));
    }

    #[test]
    fn test_simple_flat_per_unit() {
        // "0+X" subtracts X from the per-unit price, quantity notwithstanding
        assert_eq!(resolve_price(100, "0+20", 1, DiscountMode::Simple), dec("80"));
        assert_eq!(resolve_price(100, "0+20", 5, DiscountMode::Simple), dec("80"));
    }

    #[test]
    fn test_simple_undefined_forms_pass_through() {
        assert_eq!(resolve_price(100, "5+2", 1, DiscountMode::Simple), dec("100"));
        assert_eq!(resolve_price(100, "5+2+20", 1, DiscountMode::Simple), dec("100"));
    }

    #[test]
    fn test_blank_inputs_coerce() {
        assert_eq!(
            resolve_price("", "10", 1, DiscountMode::Compound),
            BigDecimal::from(0)
        );
        // Blank quantity defaults to 1 for the flat-amount step
        assert_eq!(
            resolve_price(100, "0+0+20", "", DiscountMode::Compound),
            dec("80")
        );
    }

    #[test]
    fn test_parse_grammar() {
        assert_eq!(
            DiscountExpression::parse("5+2+20", DiscountMode::Compound),
            DiscountExpression::PercentPercentFlat(dec("5"), dec("2"), dec("20"))
        );
        assert_eq!(
            DiscountExpression::parse("5+2", DiscountMode::Compound),
            DiscountExpression::PercentPercent(dec("5"), dec("2"))
        );
        assert_eq!(
            DiscountExpression::parse("10%", DiscountMode::Compound),
            DiscountExpression::Percent(dec("10"))
        );
        assert_eq!(
            DiscountExpression::parse("0+15", DiscountMode::Simple),
            DiscountExpression::FlatPerUnit(dec("15"))
        );
        assert_eq!(
            DiscountExpression::parse("", DiscountMode::Compound),
            DiscountExpression::Empty
        );
    }

    #[test]
    fn test_result_rounded_to_two_decimals() {
        // 100 - 33.333% = 66.667 -> 66.67
        assert_eq!(
            resolve_price(100, "33.333", 1, DiscountMode::Compound),
            dec("66.67")
        );
    }
}
