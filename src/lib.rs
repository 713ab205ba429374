//! # facturation-rs
//!
//! Quote (devis), invoice (facture) and purchase-order arithmetic for a
//! French small-business CRM/ERP back office.
//!
//! The heart of the crate is [`totals::compute_totals`], a pure function that
//! prices line items and aggregates them into a [`totals::DocumentTotals`]
//! summary with a per-rate VAT breakdown. Documents ([`quote::Quote`],
//! [`invoice::Invoice`]) rebuild their totals with it on every change, and
//! [`format::format_currency`] renders amounts for display.
//!
//! ```
//! use facturation_rs::{compute_totals, format_currency, line_item, vat::VatRate};
//! use rust_decimal::Decimal;
//!
//! let line = line_item::Builder::new(
//!     line_item::LineItemKind::Service,
//!     Decimal::from(2),
//!     Decimal::from(100),
//! )
//! .vat_rate(VatRate::STANDARD)
//! .build();
//!
//! let totals = compute_totals(&[line], None, None).totals;
//! assert_eq!(format_currency(totals.total_including_tax), "240,00\u{a0}€");
//! ```
//!
//! ## Sentry Integration
//!
//! Enable the `sentry` feature to turn [`Error`] values into Sentry
//! breadcrumbs:
//!
//! ```toml
//! [dependencies]
//! facturation-rs = { version = "0.1", features = ["sentry"] }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod entities;
pub mod error;
pub mod format;
pub mod totals;
pub mod utils;
pub mod validation;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use entities::*;
pub use error::{Error, Result};
pub use format::{CurrencyFormat, format_currency};
pub use totals::{Computation, DocumentTotals, PricedLineItem, VatBreakdownEntry, compute_totals};

// Re-export document types for convenience
pub use entities::invoice::Invoice;
pub use entities::line_item::{LineItem, LineItemKind};
pub use entities::purchase_order::{PurchaseOrder, ReceiptLine, Reconciliation};
pub use entities::quote::Quote;
pub use entities::stock::{StockItem, StockMovement, apply_movements};
pub use entities::vat::VatRate;
