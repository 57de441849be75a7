//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> VoucherResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(VoucherError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a party name is valid
pub fn validate_party_name(name: &str) -> VoucherResult<()> {
    if name.trim().is_empty() {
        return Err(VoucherError::Validation(
            "Party name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(VoucherError::Validation(
            "Party name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an item name is valid
pub fn validate_item_name(name: &str) -> VoucherResult<()> {
    if name.trim().is_empty() {
        return Err(VoucherError::Validation(
            "Item name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(VoucherError::Validation(
            "Item name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a voucher number is valid
pub fn validate_voucher_no(voucher_no: &str) -> VoucherResult<()> {
    if voucher_no.trim().is_empty() {
        return Err(VoucherError::Validation(
            "Voucher number cannot be empty".to_string(),
        ));
    }

    if voucher_no.len() > 50 {
        return Err(VoucherError::Validation(
            "Voucher number cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

/// Enhanced voucher validator with field-level checks
pub struct EnhancedVoucherValidator;

impl VoucherValidator for EnhancedVoucherValidator {
    fn validate_voucher(&self, voucher: &Voucher) -> VoucherResult<()> {
        // Basic validation
        validate_party_name(&voucher.party)?;
        validate_voucher_no(&voucher.voucher_no)?;

        if voucher.items.is_empty() {
            return Err(VoucherError::Validation(
                "Voucher must have at least one item".to_string(),
            ));
        }

        for item in &voucher.items {
            validate_item_name(&item.item_name)?;
            validate_non_negative_amount(&item.quantity)?;
            validate_non_negative_amount(&item.list_price)?;
        }

        for sundry in &voucher.sundries {
            if sundry.name.trim().is_empty() {
                return Err(VoucherError::Validation(
                    "Bill sundry name cannot be empty".to_string(),
                ));
            }
            validate_non_negative_amount(&sundry.amount)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[test]
    fn test_field_validators() {
        assert!(validate_party_name("Acme Traders").is_ok());
        assert!(validate_party_name("").is_err());
        assert!(validate_party_name(&"x".repeat(101)).is_err());

        assert!(validate_voucher_no("PV-1").is_ok());
        assert!(validate_voucher_no("  ").is_err());

        assert!(validate_non_negative_amount(&BigDecimal::from(0)).is_ok());
        assert!(validate_non_negative_amount(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn test_enhanced_validator() {
        let pt = PurchaseType::from_str("Central-MultiRate").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let mut voucher = Voucher::new(date, "Main", "PV-1", "Acme Traders", pt);

        // No items yet
        assert!(EnhancedVoucherValidator.validate_voucher(&voucher).is_err());

        voucher.add_item(LineItem::new("Widget", 1, 100, "", "18", &pt));
        assert!(EnhancedVoucherValidator.validate_voucher(&voucher).is_ok());

        voucher.add_sundry(BillSundry::new("", 10, SundryNature::Additive));
        assert!(EnhancedVoucherValidator.validate_voucher(&voucher).is_err());
    }
}
