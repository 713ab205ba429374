//! Sentry integration for facturation-rs errors.
//!
//! This module is only available when the `sentry` feature is enabled.
//!
//! ```ignore
//! if let Err(e) = invoice.record_payment(amount) {
//!     sentry::add_breadcrumb(sentry::Breadcrumb::from(&e));
//! }
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

/// Convert a facturation-rs Error into a Sentry breadcrumb.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let (category, data) = match error {
            Error::InvalidQuantity { line_id, quantity } => {
                let mut data = BTreeMap::new();
                data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                data.insert("quantity".to_string(), Value::from(quantity.to_string()));
                ("facturation.validation", data)
            }

            Error::DiscountOutOfRange { line_id, percent } => {
                let mut data = BTreeMap::new();
                if let Some(line_id) = line_id {
                    data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                }
                data.insert("percent".to_string(), Value::from(percent.to_string()));
                ("facturation.validation", data)
            }

            Error::UnsupportedVatRate { line_id, rate } => {
                let mut data = BTreeMap::new();
                data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                data.insert("rate".to_string(), Value::from(rate.to_string()));
                ("facturation.validation", data)
            }

            Error::NegativeDeposit { amount } => {
                let mut data = BTreeMap::new();
                data.insert("amount".to_string(), Value::from(amount.to_string()));
                ("facturation.validation", data)
            }

            Error::AmountOutOfRange { line_id, max } => {
                let mut data = BTreeMap::new();
                if let Some(line_id) = line_id {
                    data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                }
                data.insert("max".to_string(), Value::from(max.to_string()));
                ("facturation.validation", data)
            }

            Error::InvalidTransition {
                kind,
                action,
                status,
            } => {
                let mut data = BTreeMap::new();
                data.insert("document".to_string(), Value::from(kind.to_string()));
                data.insert("action".to_string(), Value::from(*action));
                data.insert("status".to_string(), Value::from(status.clone()));
                ("facturation.lifecycle", data)
            }

            Error::InvalidPayment { invoice_id, amount } => {
                let mut data = BTreeMap::new();
                data.insert("invoice_id".to_string(), Value::from(invoice_id.to_string()));
                data.insert("amount".to_string(), Value::from(amount.to_string()));
                ("facturation.payment", data)
            }

            Error::UnknownPurchaseOrderLine {
                purchase_order_id,
                line_id,
            } => {
                let mut data = BTreeMap::new();
                data.insert(
                    "purchase_order_id".to_string(),
                    Value::from(purchase_order_id.to_string()),
                );
                data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                ("facturation.receipt", data)
            }

            Error::OverReceipt {
                line_id,
                quantity,
                outstanding,
            } => {
                let mut data = BTreeMap::new();
                data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                data.insert("quantity".to_string(), Value::from(quantity.to_string()));
                data.insert("outstanding".to_string(), Value::from(outstanding.to_string()));
                ("facturation.receipt", data)
            }

            Error::InvalidReceiptQuantity { line_id, quantity } => {
                let mut data = BTreeMap::new();
                data.insert("line_id".to_string(), Value::from(line_id.to_string()));
                data.insert("quantity".to_string(), Value::from(quantity.to_string()));
                ("facturation.receipt", data)
            }

            Error::UnknownStockItem(id) => {
                let mut data = BTreeMap::new();
                data.insert("stock_item_id".to_string(), Value::from(id.to_string()));
                ("facturation.stock", data)
            }

            Error::DeserializationError(_) => ("facturation.storage", BTreeMap::new()),
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(error.to_string()),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}
