//! # Voucher Core
//!
//! The computation core of a purchase-voucher accounting front-end:
//! pricing, discounts, and GST-style multi-rate tax distribution.
//!
//! ## Features
//!
//! - **Discount resolution**: `+`-delimited discount expressions resolved
//!   into an explicit grammar and applied per unit
//! - **Line amounts**: quantity x price with item-wise tax from the
//!   tax-category label where the purchase type calls for it
//! - **Multi-rate tax distribution**: bill-level adjustments allocated
//!   proportionally across items, grouped by rate, split into CGST/SGST or
//!   IGST by jurisdiction
//! - **Smart date parsing**: short day-month forms resolved against an
//!   April-start financial year
//! - **ERP document snapshot**: vouchers flattened into fully-rounded
//!   upload fields
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   stores and master lookups
//!
//! ## Quick Start
//!
//! ```rust
//! use voucher_core::{LineItem, PurchaseType, Voucher};
//! use chrono::NaiveDate;
//! use std::str::FromStr;
//!
//! let purchase_type = PurchaseType::from_str("Local-MultiRate").unwrap();
//! let mut voucher = Voucher::new(
//!     NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
//!     "Main",
//!     "PV-1",
//!     "Acme Traders",
//!     purchase_type,
//! );
//! voucher.add_item(LineItem::new("Widget", 2, 50, "10", "GST 18%", &purchase_type));
//! let taxes = voucher.apply_tax().unwrap();
//! assert_eq!(taxes.len(), 2); // CGST + SGST
//! ```

pub mod dates;
pub mod erp;
pub mod pricing;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;
pub mod voucher;

// Re-export commonly used types
pub use dates::*;
pub use pricing::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use voucher::*;
