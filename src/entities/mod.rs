use rust_decimal::Decimal;
use serde::Deserialize;

use self::{invoice::Invoice, line_item::LineItem, purchase_order::PurchaseOrder, quote::Quote};
use crate::{
    error::{DocumentKind, Result},
    totals::{Computation, compute_totals},
    validation::validate_document_inputs,
};

pub mod invoice;
pub mod line_item;
pub mod purchase_order;
pub mod quote;
pub mod stock;
pub mod vat;

/// A batch of stored documents, tagged by collection name.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Data {
    Quotes(Vec<Quote>),
    Invoices(Vec<Invoice>),
    PurchaseOrders(Vec<PurchaseOrder>),
}

impl Data {
    /// Decodes a stored batch such as `{"quotes": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn get_quotes(self) -> Option<Vec<Quote>> {
        if let Self::Quotes(quotes) = self {
            Some(quotes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn get_invoices(self) -> Option<Vec<Invoice>> {
        if let Self::Invoices(invoices) = self {
            Some(invoices)
        } else {
            None
        }
    }

    #[must_use]
    pub fn get_purchase_orders(self) -> Option<Vec<PurchaseOrder>> {
        if let Self::PurchaseOrders(purchase_orders) = self {
            Some(purchase_orders)
        } else {
            None
        }
    }
}

/// A billable document whose totals derive from its line items.
pub trait Document {
    const KIND: DocumentKind;

    fn line_items(&self) -> &[LineItem];

    fn global_discount_percent(&self) -> Option<Decimal>;

    fn deposit_amount(&self) -> Option<Decimal>;

    /// Prices the document's lines from scratch.
    fn compute(&self) -> Computation {
        compute_totals(
            self.line_items(),
            self.global_discount_percent(),
            self.deposit_amount(),
        )
    }

    /// Runs the input-layer business rules over the document.
    fn validate(&self) -> Result<()> {
        validate_document_inputs(
            self.line_items(),
            self.global_discount_percent(),
            self.deposit_amount(),
        )
    }
}
