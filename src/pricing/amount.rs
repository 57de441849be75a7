//! Line amount and total calculation

use bigdecimal::BigDecimal;

use crate::tax::rate_from_label;
use crate::types::{round_money, FieldValue, PurchaseType, TaxTreatment};

/// Calculate a line amount from quantity and unit price.
///
/// For ItemWise purchase types the tax rate is extracted from the
/// tax-category label and added on top of the base; every other treatment
/// leaves the base untouched (tax is embedded in the price for
/// TaxInclusive, absent for Exempt, and deferred to the distributor for
/// MultiRate). Blank or unparseable inputs coerce to zero.
pub fn line_amount(
    quantity: impl Into<FieldValue>,
    unit_price: impl Into<FieldValue>,
    tax_label: &str,
    purchase_type: &PurchaseType,
) -> BigDecimal {
    let base = quantity.into().to_decimal() * unit_price.into().to_decimal();

    let total = if purchase_type.treatment == TaxTreatment::ItemWise {
        let rate = rate_from_label(tax_label);
        &base + (&base * rate) / BigDecimal::from(100)
    } else {
        base
    };

    round_money(&total)
}

/// Sum a collection of loosely-typed amounts.
///
/// Unparseable entries are skipped, not fatal. Pure sum; idempotent and
/// order-independent.
pub fn total_amount<I>(amounts: I) -> BigDecimal
where
    I: IntoIterator,
    I::Item: Into<FieldValue>,
{
    let total: BigDecimal = amounts
        .into_iter()
        .map(|amount| amount.into().to_decimal())
        .sum();
    round_money(&total)
}

/// Derive a bill sundry amount from a percentage of the item total.
pub fn percentage_amount(
    base_total: impl Into<FieldValue>,
    percentage: impl Into<FieldValue>,
) -> BigDecimal {
    let amount =
        (base_total.into().to_decimal() * percentage.into().to_decimal()) / BigDecimal::from(100);
    round_money(&amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Jurisdiction;
    use std::str::FromStr;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_line_amount_itemwise_adds_tax() {
        let pt = PurchaseType::new(Jurisdiction::Central, TaxTreatment::ItemWise);
        // 2 x 50 = 100, + 18% = 118
        assert_eq!(line_amount(2, 50, "GST 18%", &pt), dec("118"));
    }

    #[test]
    fn test_line_amount_multirate_defers_tax() {
        let pt = PurchaseType::new(Jurisdiction::Central, TaxTreatment::MultiRate);
        assert_eq!(line_amount(2, 50, "18", &pt), dec("100"));
    }

    #[test]
    fn test_line_amount_exempt_and_inclusive() {
        let exempt = PurchaseType::new(Jurisdiction::Local, TaxTreatment::Exempt);
        assert_eq!(line_amount(3, 10, "12", &exempt), dec("30"));

        let inclusive = PurchaseType::new(Jurisdiction::Local, TaxTreatment::TaxInclusive);
        assert_eq!(line_amount(3, 10, "12", &inclusive), dec("30"));
    }

    #[test]
    fn test_line_amount_missing_rate_defaults_to_zero() {
        let pt = PurchaseType::new(Jurisdiction::Central, TaxTreatment::ItemWise);
        assert_eq!(line_amount(2, 50, "Exempted", &pt), dec("100"));
        assert_eq!(line_amount(2, 50, "", &pt), dec("100"));
    }

    #[test]
    fn test_line_amount_blank_inputs() {
        let pt = PurchaseType::new(Jurisdiction::Central, TaxTreatment::ItemWise);
        assert_eq!(line_amount("", 50, "18", &pt), BigDecimal::from(0));
        assert_eq!(line_amount(2, "oops", "18", &pt), BigDecimal::from(0));
    }

    #[test]
    fn test_total_amount_skips_unparseable() {
        let total = total_amount(vec![
            FieldValue::from("10.5"),
            FieldValue::from("bad"),
            FieldValue::from(5),
        ]);
        assert_eq!(total, dec("15.5"));
    }

    #[test]
    fn test_total_amount_empty() {
        let total = total_amount(Vec::<FieldValue>::new());
        assert_eq!(total, BigDecimal::from(0));
    }

    #[test]
    fn test_percentage_amount() {
        assert_eq!(percentage_amount(1000, 2), dec("20"));
        assert_eq!(percentage_amount(333, "1.5"), dec("5"));
    }
}
