//! Voucher module containing the interactive-edit orchestration layer

pub mod core;

pub use core::*;
