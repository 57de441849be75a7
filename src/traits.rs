//! Traits for storage and master-data abstraction
//!
//! The computation core has no persistence or network of its own; the
//! surrounding application plugs its database, ERP bridge, and master-data
//! lookups in through these seams.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Unit and tax data resolved from the item master for line autofill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAutofill {
    /// Unit of measure name, empty when the item has none configured
    pub unit_name: String,
    /// Tax rate percentage effective on the lookup date
    pub tax_rate: BigDecimal,
}

/// Item master lookup
///
/// Tax rates are effective-dated: an undated default rate wins, otherwise
/// the latest dated rate on or before the effective date applies.
#[async_trait]
pub trait ItemMasterLookup: Send + Sync {
    /// Resolve unit name and effective tax rate for an item, or `None` when
    /// the item is not in the master.
    async fn autofill(
        &self,
        item_name: &str,
        effective_date: NaiveDate,
    ) -> VoucherResult<Option<ItemAutofill>>;

    /// Prefix search over item names for autocomplete.
    async fn search(&self, prefix: &str, limit: usize) -> VoucherResult<Vec<String>>;
}

/// Bill sundry master lookup
#[async_trait]
pub trait SundryMasterLookup: Send + Sync {
    /// Resolve the configured nature of a sundry, or `None` when unknown.
    async fn nature(&self, name: &str) -> VoucherResult<Option<SundryNature>>;

    /// Prefix search over sundry names for autocomplete.
    async fn search(&self, prefix: &str, limit: usize) -> VoucherResult<Vec<String>>;
}

/// Storage abstraction for vouchers
///
/// Allows the core to work with any backend (SQL Server, SQLite, in-memory)
/// by implementing these methods.
#[async_trait]
pub trait VoucherStore: Send + Sync {
    /// Save a voucher, inserting or replacing by id.
    async fn save_voucher(&mut self, voucher: &Voucher) -> VoucherResult<()>;

    /// Get a voucher by id.
    async fn get_voucher(&self, voucher_id: &str) -> VoucherResult<Option<Voucher>>;

    /// List vouchers within an optional date range.
    async fn list_vouchers(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> VoucherResult<Vec<Voucher>>;

    /// Delete a voucher by id.
    async fn delete_voucher(&mut self, voucher_id: &str) -> VoucherResult<()>;
}

/// Trait for implementing custom voucher validation rules
pub trait VoucherValidator: Send + Sync {
    /// Validate a voucher before saving
    fn validate_voucher(&self, voucher: &Voucher) -> VoucherResult<()>;
}

/// Default voucher validator with basic rules
pub struct DefaultVoucherValidator;

impl VoucherValidator for DefaultVoucherValidator {
    fn validate_voucher(&self, voucher: &Voucher) -> VoucherResult<()> {
        if voucher.party.trim().is_empty() {
            return Err(VoucherError::Validation(
                "Party name cannot be empty".to_string(),
            ));
        }

        if voucher.voucher_no.trim().is_empty() {
            return Err(VoucherError::Validation(
                "Voucher number cannot be empty".to_string(),
            ));
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
    fn test_default_validator() {
        let pt = PurchaseType::from_str("Central-MultiRate").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        let voucher = Voucher::new(date, "Main", "PV-1", "Acme Traders", pt);
        assert!(DefaultVoucherValidator.validate_voucher(&voucher).is_ok());

        let unnamed = Voucher::new(date, "Main", "PV-1", "  ", pt);
        assert!(DefaultVoucherValidator.validate_voucher(&unnamed).is_err());

        let unnumbered = Voucher::new(date, "Main", "", "Acme Traders", pt);
        assert!(DefaultVoucherValidator.validate_voucher(&unnumbered).is_err());
    }
}
