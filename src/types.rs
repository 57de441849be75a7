//! Core types and data structures for the purchase voucher system

use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Round a monetary or rate value to 2 decimal places.
///
/// Every calculator rounds at its own boundary rather than deferring to the
/// end of the pipeline; re-rounding order changes results at the cent level.
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.round(2)
}

/// Loosely-typed numeric input as received from UI fields.
///
/// Voucher fields arrive as free text; the coercion rule is explicit and
/// uniform: empty or unparseable text coerces to zero, never to an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An already-typed numeric value
    Number(BigDecimal),
    /// Raw field text, coerced on demand
    Text(String),
}

impl FieldValue {
    /// Coerce to a decimal, treating empty or unparseable text as zero.
    pub fn to_decimal(&self) -> BigDecimal {
        self.to_decimal_or(BigDecimal::from(0))
    }

    /// Coerce to a decimal with a caller-chosen default for empty or
    /// unparseable text.
    pub fn to_decimal_or(&self, default: BigDecimal) -> BigDecimal {
        match self {
            FieldValue::Number(value) => value.clone(),
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return default;
                }
                trimmed.parse::<BigDecimal>().unwrap_or(default)
            }
        }
    }

    /// Whether the field carries no usable value (empty or unparseable text).
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed.parse::<BigDecimal>().is_err()
            }
        }
    }
}

impl From<BigDecimal> for FieldValue {
    fn from(value: BigDecimal) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&BigDecimal> for FieldValue {
    fn from(value: &BigDecimal) -> Self {
        FieldValue::Number(value.clone())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(BigDecimal::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(BigDecimal::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(BigDecimal::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(BigDecimal::from_f64(value).unwrap_or_default())
    }
}

/// Jurisdiction axis of a purchase type
///
/// Local (intra-state) purchases split GST into CGST + SGST halves;
/// Central (inter-state) purchases carry a single IGST component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    /// Inter-state purchase (IGST)
    Central,
    /// Intra-state purchase (CGST + SGST)
    Local,
}

/// Tax-treatment axis of a purchase type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxTreatment {
    /// Tax applied per line from the item's tax-category label
    ItemWise,
    /// Tax computed across all lines by rate bucket, after distribution of
    /// bill-level adjustments
    MultiRate,
    /// Tax embedded in the entered price
    TaxInclusive,
    /// No tax applies
    Exempt,
}

/// Purchase type classification driving which calculations apply
///
/// Rendered and parsed as the ERP's combined tag, e.g. "Central-ItemWise",
/// "Local-MultiRate", "Local-TaxIncl.".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurchaseType {
    pub jurisdiction: Jurisdiction,
    pub treatment: TaxTreatment,
}

impl PurchaseType {
    /// Create a purchase type from its two axes
    pub const fn new(jurisdiction: Jurisdiction, treatment: TaxTreatment) -> Self {
        Self {
            jurisdiction,
            treatment,
        }
    }

    /// Whether the jurisdiction is intra-state (CGST/SGST splitting)
    pub fn is_local(&self) -> bool {
        self.jurisdiction == Jurisdiction::Local
    }
}

impl fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let jurisdiction = match self.jurisdiction {
            Jurisdiction::Central => "Central",
            Jurisdiction::Local => "Local",
        };
        let treatment = match self.treatment {
            TaxTreatment::ItemWise => "ItemWise",
            TaxTreatment::MultiRate => "MultiRate",
            TaxTreatment::TaxInclusive => "TaxIncl.",
            TaxTreatment::Exempt => "Exempt",
        };
        write!(f, "{}-{}", jurisdiction, treatment)
    }
}

impl FromStr for PurchaseType {
    type Err = VoucherError;

    /// Parse a classification tag case-insensitively by substring, matching
    /// how the ERP tags are written ("Local-TaxIncl." vs "local-taxincl").
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let lower = tag.to_lowercase();

        let jurisdiction = if lower.contains("local") {
            Jurisdiction::Local
        } else {
            Jurisdiction::Central
        };

        let treatment = if lower.contains("multirate") {
            TaxTreatment::MultiRate
        } else if lower.contains("itemwise") {
            TaxTreatment::ItemWise
        } else if lower.contains("taxincl") {
            TaxTreatment::TaxInclusive
        } else if lower.contains("exempt") {
            TaxTreatment::Exempt
        } else {
            return Err(VoucherError::UnknownPurchaseType(tag.to_string()));
        };

        Ok(Self::new(jurisdiction, treatment))
    }
}

/// A single voucher line
///
/// `unit_price` and `amount` are derived caches, recomputed whenever
/// quantity, list price, discount, tax category, or the voucher's purchase
/// type change. They are never independent truths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item master name
    pub item_name: String,
    /// Tax category label, e.g. "GST 18%" (rate is extracted by pattern)
    pub tax_category: String,
    /// HSN code for GST reporting
    pub hsn: String,
    /// Quantity purchased
    pub quantity: BigDecimal,
    /// Unit of measure name
    pub unit: String,
    /// List price before discounts
    pub list_price: BigDecimal,
    /// Discount expression, e.g. "5+2+20" (see [`crate::pricing::discount`])
    pub discount: String,
    /// Derived per-unit price after discounts
    pub unit_price: BigDecimal,
    /// Derived line amount (includes item-wise tax where applicable)
    pub amount: BigDecimal,
}

impl LineItem {
    /// Create a line and compute its derived fields.
    ///
    /// Quantity and list price accept raw field text; empty or unparseable
    /// input coerces to zero.
    pub fn new(
        item_name: impl Into<String>,
        quantity: impl Into<FieldValue>,
        list_price: impl Into<FieldValue>,
        discount: impl Into<String>,
        tax_category: impl Into<String>,
        purchase_type: &PurchaseType,
    ) -> Self {
        let mut line = Self {
            item_name: item_name.into(),
            tax_category: tax_category.into(),
            hsn: String::new(),
            quantity: quantity.into().to_decimal(),
            unit: String::new(),
            list_price: list_price.into().to_decimal(),
            discount: discount.into(),
            unit_price: BigDecimal::from(0),
            amount: BigDecimal::from(0),
        };
        line.recompute(purchase_type);
        line
    }

    /// Recompute the derived `unit_price` and `amount` caches.
    pub fn recompute(&mut self, purchase_type: &PurchaseType) {
        self.unit_price = crate::pricing::resolve_price(
            &self.list_price,
            &self.discount,
            &self.quantity,
            crate::pricing::DiscountMode::Compound,
        );
        self.amount = crate::pricing::line_amount(
            &self.quantity,
            &self.unit_price,
            &self.tax_category,
            purchase_type,
        );
    }
}

/// Sign of a bill sundry in voucher aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SundryNature {
    /// Charge added to the voucher total (freight, packing, tax)
    Additive,
    /// Rebate subtracted from the voucher total (cash discount)
    Subtractive,
}

/// Provenance of a bill sundry
///
/// Engine-generated tax entries are tagged at creation time so that tax
/// recomputation can replace them wholesale without guessing from the
/// display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SundryOrigin {
    /// Entered by the user (freight, rebates, manual charges)
    UserEntered,
    /// Synthesized by the multi-rate tax distributor; disposable on recompute
    TaxEngine,
}

/// A non-item charge or rebate on the voucher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSundry {
    /// Sundry master name (or tax component name for generated entries)
    pub name: String,
    /// Optional percentage the amount was derived from
    pub percentage: Option<BigDecimal>,
    /// Sundry amount, always positive; sign comes from `nature`
    pub amount: BigDecimal,
    /// Whether the amount adds to or subtracts from the voucher total
    pub nature: SundryNature,
    /// Who created the entry
    pub origin: SundryOrigin,
}

impl BillSundry {
    /// Create a user-entered sundry with a fixed amount.
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<FieldValue>,
        nature: SundryNature,
    ) -> Self {
        Self {
            name: name.into(),
            percentage: None,
            amount: amount.into().to_decimal(),
            nature,
            origin: SundryOrigin::UserEntered,
        }
    }

    /// Create a user-entered sundry whose amount was derived from a
    /// percentage of the item total.
    pub fn with_percentage(
        name: impl Into<String>,
        percentage: BigDecimal,
        amount: BigDecimal,
        nature: SundryNature,
    ) -> Self {
        Self {
            name: name.into(),
            percentage: Some(percentage),
            amount,
            nature,
            origin: SundryOrigin::UserEntered,
        }
    }

    /// Amount with the sign implied by the sundry's nature.
    pub fn signed_amount(&self) -> BigDecimal {
        match self.nature {
            SundryNature::Additive => self.amount.clone(),
            SundryNature::Subtractive => -self.amount.clone(),
        }
    }

    /// Whether this entry was synthesized by the tax engine.
    pub fn is_generated_tax(&self) -> bool {
        self.origin == SundryOrigin::TaxEngine
    }
}

/// A purchase voucher: header fields plus ordered lines and sundries
///
/// Invariant: `grand_total = round2(Σ line.amount + Σ additive sundry
/// − Σ subtractive sundry)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    /// Unique identifier
    pub id: String,
    /// Voucher date
    pub date: NaiveDate,
    /// Voucher series name
    pub series: String,
    /// Voucher number within the series
    pub voucher_no: String,
    /// Supplier (party) name
    pub party: String,
    /// Purchase type classification
    pub purchase_type: PurchaseType,
    /// Optional narration text
    pub narration: Option<String>,
    /// Ordered voucher lines
    pub items: Vec<LineItem>,
    /// Ordered bill sundries, including any engine-generated tax entries
    pub sundries: Vec<BillSundry>,
    /// When the voucher was created
    pub created_at: NaiveDateTime,
    /// When the voucher was last updated
    pub updated_at: NaiveDateTime,
}

impl Voucher {
    /// Create an empty voucher.
    pub fn new(
        date: NaiveDate,
        series: impl Into<String>,
        voucher_no: impl Into<String>,
        party: impl Into<String>,
        purchase_type: PurchaseType,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            series: series.into(),
            voucher_no: voucher_no.into(),
            party: party.into(),
            purchase_type,
            narration: None,
            items: Vec::new(),
            sundries: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a line, recomputing its derived fields against this voucher's
    /// purchase type.
    pub fn add_item(&mut self, mut item: LineItem) {
        item.recompute(&self.purchase_type);
        self.items.push(item);
        self.touch();
    }

    /// Remove a line by position.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            self.touch();
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Append a bill sundry.
    pub fn add_sundry(&mut self, sundry: BillSundry) {
        self.sundries.push(sundry);
        self.touch();
    }

    /// Remove a bill sundry by position.
    pub fn remove_sundry(&mut self, index: usize) -> Option<BillSundry> {
        if index < self.sundries.len() {
            self.touch();
            Some(self.sundries.remove(index))
        } else {
            None
        }
    }

    /// Change the purchase type and recompute every line under the new
    /// classification.
    pub fn set_purchase_type(&mut self, purchase_type: PurchaseType) {
        self.purchase_type = purchase_type;
        self.recompute_items();
    }

    /// Recompute the derived fields of every line.
    pub fn recompute_items(&mut self) {
        for item in &mut self.items {
            item.recompute(&self.purchase_type);
        }
        self.touch();
    }

    /// Sum of all line amounts, rounded to 2 decimals.
    pub fn item_total(&self) -> BigDecimal {
        let total: BigDecimal = self.items.iter().map(|item| &item.amount).sum();
        round_money(&total)
    }

    /// Net of all bill sundries (additive minus subtractive), rounded.
    pub fn sundry_net(&self) -> BigDecimal {
        let net: BigDecimal = self.sundries.iter().map(|s| s.signed_amount()).sum();
        round_money(&net)
    }

    /// Grand total: item total plus net sundries.
    pub fn grand_total(&self) -> BigDecimal {
        round_money(&(self.item_total() + self.sundry_net()))
    }

    /// Recompute the GST breakup for a MultiRate voucher.
    ///
    /// Replaces all engine-generated tax sundries with freshly distributed
    /// entries; user-entered sundries are preserved and form the adjustment
    /// basis. Returns the computed tax lines, which may be empty when there
    /// is no item value to distribute against.
    pub fn apply_tax(&mut self) -> VoucherResult<Vec<crate::tax::TaxLine>> {
        if self.purchase_type.treatment != TaxTreatment::MultiRate {
            return Err(VoucherError::TaxNotApplicable(
                self.purchase_type.to_string(),
            ));
        }

        let zero = BigDecimal::from(0);
        let items: Vec<crate::tax::RatedAmount> = self
            .items
            .iter()
            .filter(|item| item.amount != zero)
            .map(|item| crate::tax::RatedAmount {
                amount: item.amount.clone(),
                tax_rate: crate::tax::rate_from_label(&item.tax_category),
            })
            .collect();

        let base: Vec<BillSundry> = self
            .sundries
            .iter()
            .filter(|s| !s.is_generated_tax())
            .cloned()
            .collect();

        let taxes = crate::tax::distribute_tax(&items, &base, &self.purchase_type);

        self.sundries.retain(|s| !s.is_generated_tax());
        self.sundries
            .extend(taxes.iter().cloned().map(crate::tax::TaxLine::into_sundry));
        self.touch();

        Ok(taxes)
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}

/// Errors that can occur in voucher operations
#[derive(Debug, thiserror::Error)]
pub enum VoucherError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Voucher not found: {0}")]
    VoucherNotFound(String),
    #[error("Unknown purchase type: {0}")]
    UnknownPurchaseType(String),
    #[error("Tax recomputation not applicable for purchase type: {0}")]
    TaxNotApplicable(String),
}

/// Result type for voucher operations
pub type VoucherResult<T> = Result<T, VoucherError>;
