//! Multi-rate tax distribution across voucher lines
//!
//! Bill-level adjustments (freight, rebates) are allocated to items in
//! proportion to item value, items are grouped by tax rate, and each rate
//! bucket yields its tax entries: a single IGST entry for inter-state
//! purchases, or a CGST/SGST pair at half the rate each for intra-state.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{
    round_money, BillSundry, PurchaseType, SundryNature, SundryOrigin,
};

/// An item value paired with its tax rate, the distributor's input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedAmount {
    /// Line amount
    pub amount: BigDecimal,
    /// Tax rate percentage for the line
    pub tax_rate: BigDecimal,
}

/// GST component of a generated tax entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxComponent {
    /// Integrated GST, inter-state
    Igst,
    /// Central GST, intra-state half
    Cgst,
    /// State GST, intra-state half
    Sgst,
}

impl fmt::Display for TaxComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxComponent::Igst => "IGST",
            TaxComponent::Cgst => "CGST",
            TaxComponent::Sgst => "SGST",
        };
        write!(f, "{}", name)
    }
}

/// A computed tax entry for one rate bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    /// GST component this entry represents
    pub component: TaxComponent,
    /// Rate percentage applied (already halved for CGST/SGST)
    pub rate: BigDecimal,
    /// Tax amount, rounded to 2 decimals
    pub amount: BigDecimal,
}

impl TaxLine {
    /// Convert into an engine-originated bill sundry, always Additive.
    pub fn into_sundry(self) -> BillSundry {
        BillSundry {
            name: self.component.to_string(),
            percentage: Some(self.rate),
            amount: self.amount,
            nature: SundryNature::Additive,
            origin: SundryOrigin::TaxEngine,
        }
    }
}

/// Distribute net bill-level adjustments across items and compute the GST
/// breakup per tax rate.
///
/// The supplied sundries must be the non-tax ones; recomputation is
/// replace-all, so callers strip previously generated tax entries (by
/// provenance) before invoking. A zero total item value is a defined edge
/// case and yields an empty result. Rate buckets appear in
/// first-encountered order; rates of zero or less emit nothing. Each
/// entry's amount is rounded as it is emitted.
pub fn distribute_tax(
    items: &[RatedAmount],
    sundries: &[BillSundry],
    purchase_type: &PurchaseType,
) -> Vec<TaxLine> {
    let zero = BigDecimal::from(0);

    let total_item_value: BigDecimal = items.iter().map(|item| &item.amount).sum();
    if total_item_value == zero {
        return Vec::new();
    }

    let net_adjustment: BigDecimal = sundries.iter().map(|s| s.signed_amount()).sum();

    // Group taxable values by rate, preserving first-encountered order
    let mut groups: Vec<(BigDecimal, BigDecimal)> = Vec::new();
    for item in items {
        let share = (&item.amount / &total_item_value) * &net_adjustment;
        let taxable_value = &item.amount + share;

        match groups.iter_mut().find(|(rate, _)| *rate == item.tax_rate) {
            Some((_, taxable)) => *taxable += taxable_value,
            None => groups.push((item.tax_rate.clone(), taxable_value)),
        }
    }

    let mut generated = Vec::new();
    let hundred = BigDecimal::from(100);

    for (rate, taxable) in groups {
        if rate <= zero {
            continue;
        }

        if purchase_type.is_local() {
            let half_rate = &rate / BigDecimal::from(2);
            let half_tax = round_money(&((&taxable * &half_rate) / &hundred));

            generated.push(TaxLine {
                component: TaxComponent::Cgst,
                rate: half_rate.clone(),
                amount: half_tax.clone(),
            });
            generated.push(TaxLine {
                component: TaxComponent::Sgst,
                rate: half_rate,
                amount: half_tax,
            });
        } else {
            let tax = round_money(&((&taxable * &rate) / &hundred));
            generated.push(TaxLine {
                component: TaxComponent::Igst,
                rate,
                amount: tax,
            });
        }
    }

    generated
}
