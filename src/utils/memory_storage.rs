//! In-memory storage and master-data implementations for testing

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory voucher store for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    vouchers: Arc<RwLock<HashMap<String, Voucher>>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.vouchers.write().unwrap().clear();
    }
}

#[async_trait]
impl VoucherStore for MemoryStore {
    async fn save_voucher(&mut self, voucher: &Voucher) -> VoucherResult<()> {
        self.vouchers
            .write()
            .unwrap()
            .insert(voucher.id.clone(), voucher.clone());
        Ok(())
    }

    async fn get_voucher(&self, voucher_id: &str) -> VoucherResult<Option<Voucher>> {
        Ok(self.vouchers.read().unwrap().get(voucher_id).cloned())
    }

    async fn list_vouchers(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> VoucherResult<Vec<Voucher>> {
        let vouchers = self.vouchers.read().unwrap();
        let filtered: Vec<Voucher> = vouchers
            .values()
            .filter(|voucher| {
                if let Some(start) = start_date {
                    if voucher.date < start {
                        return false;
                    }
                }
                if let Some(end) = end_date {
                    if voucher.date > end {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn delete_voucher(&mut self, voucher_id: &str) -> VoucherResult<()> {
        if self.vouchers.write().unwrap().remove(voucher_id).is_some() {
            Ok(())
        } else {
            Err(VoucherError::VoucherNotFound(voucher_id.to_string()))
        }
    }
}

/// An item master record: unit plus effective-dated tax rates
#[derive(Debug, Clone)]
struct ItemRecord {
    unit_name: String,
    /// (effective-from date, rate); `None` marks the undated default rate
    rates: Vec<(Option<NaiveDate>, BigDecimal)>,
}

/// In-memory item and sundry masters for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryMasters {
    items: Arc<RwLock<HashMap<String, ItemRecord>>>,
    sundries: Arc<RwLock<HashMap<String, SundryNature>>>,
}

impl MemoryMasters {
    /// Create a new memory masters instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item with its unit and a single undated tax rate.
    pub fn add_item(
        &self,
        name: impl Into<String>,
        unit_name: impl Into<String>,
        tax_rate: BigDecimal,
    ) {
        self.items.write().unwrap().insert(
            name.into(),
            ItemRecord {
                unit_name: unit_name.into(),
                rates: vec![(None, tax_rate)],
            },
        );
    }

    /// Register an item with explicit effective-dated rates.
    pub fn add_item_with_rates(
        &self,
        name: impl Into<String>,
        unit_name: impl Into<String>,
        rates: Vec<(Option<NaiveDate>, BigDecimal)>,
    ) {
        self.items.write().unwrap().insert(
            name.into(),
            ItemRecord {
                unit_name: unit_name.into(),
                rates,
            },
        );
    }

    /// Register a bill sundry with its nature.
    pub fn add_sundry(&self, name: impl Into<String>, nature: SundryNature) {
        self.sundries.write().unwrap().insert(name.into(), nature);
    }
}

fn prefix_search(names: impl Iterator<Item = String>, prefix: &str, limit: usize) -> Vec<String> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<String> = names
        .filter(|name| name.to_lowercase().starts_with(&needle))
        .collect();
    matches.sort();
    matches.truncate(limit);
    matches
}

#[async_trait]
impl ItemMasterLookup for MemoryMasters {
    async fn autofill(
        &self,
        item_name: &str,
        effective_date: NaiveDate,
    ) -> VoucherResult<Option<ItemAutofill>> {
        let items = self.items.read().unwrap();
        let Some(record) = items.get(item_name) else {
            return Ok(None);
        };

        // The undated default rate wins; otherwise the latest dated rate on
        // or before the effective date applies
        let rate = record
            .rates
            .iter()
            .find(|(date, _)| date.is_none())
            .map(|(_, rate)| rate.clone())
            .or_else(|| {
                record
                    .rates
                    .iter()
                    .filter_map(|(date, rate)| date.map(|d| (d, rate)))
                    .filter(|(date, _)| *date <= effective_date)
                    .max_by_key(|(date, _)| *date)
                    .map(|(_, rate)| rate.clone())
            })
            .unwrap_or_else(|| BigDecimal::from(0));

        Ok(Some(ItemAutofill {
            unit_name: record.unit_name.clone(),
            tax_rate: rate,
        }))
    }

    async fn search(&self, prefix: &str, limit: usize) -> VoucherResult<Vec<String>> {
        let items = self.items.read().unwrap();
        Ok(prefix_search(items.keys().cloned(), prefix, limit))
    }
}

#[async_trait]
impl SundryMasterLookup for MemoryMasters {
    async fn nature(&self, name: &str) -> VoucherResult<Option<SundryNature>> {
        Ok(self.sundries.read().unwrap().get(name).copied())
    }

    async fn search(&self, prefix: &str, limit: usize) -> VoucherResult<Vec<String>> {
        let sundries = self.sundries.read().unwrap();
        Ok(prefix_search(sundries.keys().cloned(), prefix, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_undated_default_rate_wins() {
        let masters = MemoryMasters::new();
        masters.add_item_with_rates(
            "Widget",
            "Pcs",
            vec![
                (Some(date(2025, 1, 1)), BigDecimal::from(12)),
                (None, BigDecimal::from(18)),
            ],
        );

        let autofill = masters
            .autofill("Widget", date(2025, 6, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(autofill.tax_rate, BigDecimal::from(18));
        assert_eq!(autofill.unit_name, "Pcs");
    }

    #[tokio::test]
    async fn test_latest_dated_rate_on_or_before() {
        let masters = MemoryMasters::new();
        masters.add_item_with_rates(
            "Widget",
            "Pcs",
            vec![
                (Some(date(2024, 4, 1)), BigDecimal::from(12)),
                (Some(date(2025, 4, 1)), BigDecimal::from(18)),
                (Some(date(2026, 4, 1)), BigDecimal::from(28)),
            ],
        );

        let autofill = masters
            .autofill("Widget", date(2025, 6, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(autofill.tax_rate, BigDecimal::from(18));
    }

    #[tokio::test]
    async fn test_no_applicable_rate_defaults_to_zero() {
        let masters = MemoryMasters::new();
        masters.add_item_with_rates(
            "Widget",
            "Pcs",
            vec![(Some(date(2026, 4, 1)), BigDecimal::from(28))],
        );

        let autofill = masters
            .autofill("Widget", date(2025, 6, 1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(autofill.tax_rate, BigDecimal::from(0));
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let masters = MemoryMasters::new();
        assert!(masters
            .autofill("Nothing", date(2025, 6, 1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_prefix_search() {
        let masters = MemoryMasters::new();
        masters.add_item("Steel Rod", "Kg", BigDecimal::from(18));
        masters.add_item("Steel Sheet", "Kg", BigDecimal::from(18));
        masters.add_item("Copper Wire", "Mtr", BigDecimal::from(12));

        let found = ItemMasterLookup::search(&masters, "steel", 10).await.unwrap();
        assert_eq!(found, vec!["Steel Rod".to_string(), "Steel Sheet".to_string()]);

        let limited = ItemMasterLookup::search(&masters, "steel", 1).await.unwrap();
        assert_eq!(limited.len(), 1);

        let none = ItemMasterLookup::search(&masters, "", 10).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_sundry_nature() {
        let masters = MemoryMasters::new();
        masters.add_sundry("Freight", SundryNature::Additive);
        masters.add_sundry("Cash Discount", SundryNature::Subtractive);

        assert_eq!(
            masters.nature("Freight").await.unwrap(),
            Some(SundryNature::Additive)
        );
        assert_eq!(
            masters.nature("Cash Discount").await.unwrap(),
            Some(SundryNature::Subtractive)
        );
        assert_eq!(masters.nature("Unknown").await.unwrap(), None);
    }
}
