//! Voucher manager coordinating storage, validation, and recomputation
//!
//! Mirrors the interactive edit loop of the voucher entry screen as library
//! operations: header date parsing, line autofill from the item master,
//! percentage-derived sundries, and on-demand tax recomputation. The
//! calculators themselves stay pure; orchestration and diagnostics live
//! here.

use chrono::NaiveDate;

use crate::dates::{parse_smart_date, FinancialYear, SmartDate};
use crate::pricing::percentage_amount;
use crate::tax::TaxLine;
use crate::traits::*;
use crate::types::*;

/// Voucher manager for handling voucher lifecycle operations
pub struct VoucherManager<S: VoucherStore> {
    storage: S,
    validator: Box<dyn VoucherValidator>,
    financial_year: FinancialYear,
}

impl<S: VoucherStore> VoucherManager<S> {
    /// Create a new voucher manager.
    ///
    /// The financial year is injected once at construction, typically
    /// inferred from the company database name via
    /// [`FinancialYear::from_reference`].
    pub fn new(storage: S, financial_year: FinancialYear) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultVoucherValidator),
            financial_year,
        }
    }

    /// Create a new voucher manager with a custom validator.
    pub fn with_validator(
        storage: S,
        financial_year: FinancialYear,
        validator: Box<dyn VoucherValidator>,
    ) -> Self {
        Self {
            storage,
            validator,
            financial_year,
        }
    }

    /// The financial year in effect for short date forms.
    pub fn financial_year(&self) -> FinancialYear {
        self.financial_year
    }

    /// Validate and save a voucher.
    pub async fn save_voucher(&mut self, voucher: &Voucher) -> VoucherResult<()> {
        self.validator.validate_voucher(voucher)?;

        tracing::debug!(
            voucher_id = %voucher.id,
            voucher_no = %voucher.voucher_no,
            grand_total = %voucher.grand_total(),
            "saving voucher"
        );
        self.storage.save_voucher(voucher).await
    }

    /// Get a voucher by id.
    pub async fn get_voucher(&self, voucher_id: &str) -> VoucherResult<Option<Voucher>> {
        self.storage.get_voucher(voucher_id).await
    }

    /// Get a voucher by id, returning an error if not found.
    pub async fn get_voucher_required(&self, voucher_id: &str) -> VoucherResult<Voucher> {
        self.storage
            .get_voucher(voucher_id)
            .await?
            .ok_or_else(|| VoucherError::VoucherNotFound(voucher_id.to_string()))
    }

    /// List vouchers within an optional date range.
    pub async fn list_vouchers(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> VoucherResult<Vec<Voucher>> {
        self.storage.list_vouchers(start_date, end_date).await
    }

    /// Delete a voucher by id.
    pub async fn delete_voucher(&mut self, voucher_id: &str) -> VoucherResult<()> {
        self.storage.delete_voucher(voucher_id).await
    }

    /// Set the voucher date from typed input, resolving short forms against
    /// the financial year.
    pub fn set_date(&self, voucher: &mut Voucher, input: &str) -> VoucherResult<SmartDate> {
        let parsed = parse_smart_date(input, &self.financial_year).ok_or_else(|| {
            VoucherError::Validation(format!("Unrecognized date: '{}'", input))
        })?;
        voucher.date = parsed.date;
        Ok(parsed)
    }

    /// Fill a line's unit and tax category from the item master.
    ///
    /// Returns whether the item was found. The tax category label is set to
    /// the effective rate so the rate extraction on recompute round-trips.
    pub async fn autofill_line(
        &self,
        line: &mut LineItem,
        masters: &dyn ItemMasterLookup,
        effective_date: NaiveDate,
    ) -> VoucherResult<bool> {
        let Some(autofill) = masters.autofill(&line.item_name, effective_date).await? else {
            return Ok(false);
        };

        if !autofill.unit_name.is_empty() {
            line.unit = autofill.unit_name;
        }
        line.tax_category = autofill.tax_rate.to_string();
        Ok(true)
    }

    /// Add a sundry whose amount derives from a percentage of the current
    /// item total, with its nature autofilled from the sundry master
    /// (Additive when unknown).
    pub async fn add_percentage_sundry(
        &self,
        voucher: &mut Voucher,
        name: &str,
        percentage: impl Into<FieldValue>,
        masters: &dyn SundryMasterLookup,
    ) -> VoucherResult<()> {
        let percentage = percentage.into().to_decimal();
        let amount = percentage_amount(voucher.item_total(), &percentage);
        let nature = masters
            .nature(name)
            .await?
            .unwrap_or(SundryNature::Additive);

        voucher.add_sundry(BillSundry::with_percentage(name, percentage, amount, nature));
        Ok(())
    }

    /// Recompute the GST breakup for a MultiRate voucher, replacing any
    /// previously generated tax entries.
    pub fn apply_tax(&self, voucher: &mut Voucher) -> VoucherResult<Vec<TaxLine>> {
        let taxes = voucher.apply_tax()?;
        tracing::debug!(
            voucher_id = %voucher.id,
            entries = taxes.len(),
            "recomputed tax breakup"
        );
        Ok(taxes)
    }
}
