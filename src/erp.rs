//! ERP-facing voucher document snapshot
//!
//! Flattens a post-computation voucher into the exact field set the ERP
//! upload layer serializes into its document format. Transport and markup
//! belong to that layer; this module's job is fully-rounded numeric fields
//! and the treatment-dependent tax fields, including the intra-state rule
//! that splits item-level tax in half across the CGST/SGST pair.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::tax::rate_from_label;
use crate::types::{round_money, BillSundry, LineItem, TaxTreatment, Voucher};

/// Item-level tax fields, shaped by the purchase type's tax treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemTax {
    /// Exempt purchases carry no item tax fields
    Exempt,
    /// MultiRate purchases carry the tax-category label verbatim; the ERP
    /// maps it to its own tax-category master
    Category(String),
    /// A single full-rate tax field pair (inter-state)
    Single {
        percent: BigDecimal,
        amount: BigDecimal,
    },
    /// Tax halved into a paired CGST/SGST field set (intra-state)
    Split {
        percent_each: BigDecimal,
        amount_each: BigDecimal,
    },
}

/// One numbered item row of the upload document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub sr_no: usize,
    pub item_name: String,
    pub unit_name: String,
    pub quantity: BigDecimal,
    pub list_price: BigDecimal,
    pub discount: String,
    pub price: BigDecimal,
    pub amount: BigDecimal,
    pub tax: ItemTax,
}

/// One numbered sundry row of the upload document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SundryEntry {
    pub sr_no: usize,
    pub name: String,
    /// Percentage field, zero when the sundry was amount-entered
    pub percentage: BigDecimal,
    pub amount: BigDecimal,
}

/// A voucher flattened for ERP upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherDocument {
    pub series: String,
    /// Voucher date in the ERP's DD-MM-YYYY form
    pub date: String,
    pub voucher_no: String,
    /// Combined purchase type tag, e.g. "Local-MultiRate"
    pub purchase_type: String,
    pub party_name: String,
    pub narration: Option<String>,
    pub items: Vec<ItemEntry>,
    pub sundries: Vec<SundryEntry>,
}

impl VoucherDocument {
    /// Flatten a voucher into its upload document.
    pub fn from_voucher(voucher: &Voucher) -> Self {
        let items = voucher
            .items
            .iter()
            .enumerate()
            .map(|(index, line)| item_entry(index + 1, line, voucher))
            .collect();

        let sundries = voucher
            .sundries
            .iter()
            .enumerate()
            .map(|(index, sundry)| sundry_entry(index + 1, sundry))
            .collect();

        Self {
            series: voucher.series.clone(),
            date: voucher.date.format("%d-%m-%Y").to_string(),
            voucher_no: voucher.voucher_no.clone(),
            purchase_type: voucher.purchase_type.to_string(),
            party_name: voucher.party.clone(),
            narration: voucher.narration.clone(),
            items,
            sundries,
        }
    }
}

fn item_entry(sr_no: usize, line: &LineItem, voucher: &Voucher) -> ItemEntry {
    ItemEntry {
        sr_no,
        item_name: line.item_name.clone(),
        unit_name: line.unit.clone(),
        quantity: line.quantity.clone(),
        list_price: line.list_price.clone(),
        discount: line.discount.clone(),
        price: line.unit_price.clone(),
        amount: line.amount.clone(),
        tax: item_tax(line, voucher),
    }
}

fn item_tax(line: &LineItem, voucher: &Voucher) -> ItemTax {
    let purchase_type = &voucher.purchase_type;
    let hundred = BigDecimal::from(100);

    match purchase_type.treatment {
        TaxTreatment::Exempt => ItemTax::Exempt,
        TaxTreatment::MultiRate => ItemTax::Category(line.tax_category.clone()),
        TaxTreatment::ItemWise => {
            // Line amounts include the tax for item-wise purchases, so the
            // tax computes off the pre-tax base
            let rate = rate_from_label(&line.tax_category);
            let base = round_money(&(&line.quantity * &line.unit_price));
            let tax = round_money(&((&base * &rate) / &hundred));
            split_or_single(purchase_type.is_local(), rate, tax)
        }
        TaxTreatment::TaxInclusive => {
            // Back the tax out of the inclusive amount:
            // tax = amount x rate / (100 + rate)
            let rate = rate_from_label(&line.tax_category);
            let divisor = &hundred + &rate;
            let tax = round_money(&((&line.amount * &rate) / divisor));
            split_or_single(purchase_type.is_local(), rate, tax)
        }
    }
}

fn split_or_single(is_local: bool, rate: BigDecimal, tax: BigDecimal) -> ItemTax {
    if is_local {
        ItemTax::Split {
            percent_each: rate / BigDecimal::from(2),
            amount_each: round_money(&(tax / BigDecimal::from(2))),
        }
    } else {
        ItemTax::Single {
            percent: rate,
            amount: tax,
        }
    }
}

fn sundry_entry(sr_no: usize, sundry: &BillSundry) -> SundryEntry {
    SundryEntry {
        sr_no,
        name: sundry.name.clone(),
        percentage: sundry
            .percentage
            .clone()
            .unwrap_or_else(|| BigDecimal::from(0)),
        amount: round_money(&sundry.amount),
    }
}
