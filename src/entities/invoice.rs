use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{
    entities::Document,
    error::{DocumentKind, Error, Result},
    line_item::LineItem,
    quote::{self, Quote},
    totals::DocumentTotals,
    utils::{date_format::iso_date, serde_helpers::empty_string_as_none},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Draft,
    Sent,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        })
    }
}

/// An invoice (facture).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    /// The accepted quote this invoice was raised from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<Uuid>,
    #[serde(default)]
    pub status: Status,
    #[serde(with = "iso_date")]
    pub issue_date: Date,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub global_discount_percent: Option<Decimal>,
    /// Deposit (acompte) already collected on the quote.
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub deposit_amount: Option<Decimal>,
    #[serde(default)]
    pub amount_paid: Decimal,
    #[serde(default)]
    pub totals: DocumentTotals,
}

impl Document for Invoice {
    const KIND: DocumentKind = DocumentKind::Invoice;

    fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    fn global_discount_percent(&self) -> Option<Decimal> {
        self.global_discount_percent
    }

    fn deposit_amount(&self) -> Option<Decimal> {
        self.deposit_amount
    }
}

impl Invoice {
    /// Raises a draft invoice from an accepted quote. Lines, global discount
    /// and deposit are carried over; the quote itself is left unchanged and
    /// should be marked invoiced by the caller.
    #[instrument(skip(quote, number), fields(quote_id = %quote.id))]
    pub fn from_quote(
        quote: &Quote,
        number: impl Into<String>,
        issue_date: Date,
        due_date: Date,
    ) -> Result<Self> {
        if quote.status != quote::Status::Accepted {
            warn!(status = ?quote.status, "refused to invoice quote");
            return Err(Error::InvalidTransition {
                kind: DocumentKind::Quote,
                action: "invoice",
                status: quote.status.to_string(),
            });
        }

        let invoice = Self {
            id: Uuid::new_v4(),
            number: number.into(),
            client_id: quote.client_id,
            quote_id: Some(quote.id),
            status: Status::Draft,
            issue_date,
            due_date,
            line_items: quote.line_items.clone(),
            global_discount_percent: quote.global_discount_percent,
            deposit_amount: quote.deposit_amount,
            amount_paid: Decimal::ZERO,
            totals: DocumentTotals::default(),
        }
        .recompute();
        debug!(invoice_id = %invoice.id, "invoice raised from quote");
        Ok(invoice)
    }

    /// Returns the invoice with totals rebuilt from its line items.
    #[must_use]
    pub fn recompute(mut self) -> Self {
        self.totals = self.compute().totals;
        self
    }

    /// Amount still owed: the payable amount (global discount applied,
    /// deposit deducted) minus payments received. Priced from the line items,
    /// never from the stored `totals`.
    #[must_use]
    pub fn amount_due(&self) -> Decimal {
        self.compute().totals.payable_amount() - self.amount_paid
    }

    /// Replaces the line items of a draft invoice.
    pub fn with_line_items(mut self, line_items: Vec<LineItem>) -> Result<Self> {
        if self.status != Status::Draft {
            return Err(self.invalid_transition("edit the lines of"));
        }
        self.line_items = line_items;
        Ok(self.recompute())
    }

    pub fn send(mut self) -> Result<Self> {
        if self.status != Status::Draft {
            return Err(self.invalid_transition("send"));
        }
        self.status = Status::Sent;
        Ok(self)
    }

    /// Cancels an invoice that has not received any payment.
    pub fn cancel(mut self) -> Result<Self> {
        let cancellable = matches!(self.status, Status::Draft | Status::Sent | Status::Overdue);
        if !cancellable || !self.amount_paid.is_zero() {
            return Err(self.invalid_transition("cancel"));
        }
        self.status = Status::Cancelled;
        Ok(self)
    }

    /// Flags an unpaid invoice as overdue once `today` is past its due date.
    #[must_use]
    pub fn refresh_overdue(mut self, today: Date) -> Self {
        if matches!(self.status, Status::Sent | Status::PartiallyPaid) && today > self.due_date {
            self.status = Status::Overdue;
        }
        self
    }

    /// Records a payment. The amount must be positive and no larger than
    /// [`Invoice::amount_due`]; the invoice becomes paid once nothing is due.
    /// The returned invoice carries freshly computed totals.
    #[instrument(skip(self), fields(invoice_id = %self.id))]
    pub fn record_payment(self, amount: Decimal) -> Result<Self> {
        let mut invoice = self.recompute();
        let payable = matches!(
            invoice.status,
            Status::Sent | Status::PartiallyPaid | Status::Overdue
        );
        if !payable || amount <= Decimal::ZERO || amount > invoice.amount_due() {
            warn!(status = ?invoice.status, due = %invoice.amount_due(), "refused payment");
            return Err(Error::InvalidPayment {
                invoice_id: invoice.id,
                amount,
            });
        }

        invoice.amount_paid += amount;
        invoice.status = if invoice.amount_due() <= Decimal::ZERO {
            Status::Paid
        } else {
            Status::PartiallyPaid
        };
        debug!(status = ?invoice.status, amount_paid = %invoice.amount_paid, "payment recorded");
        Ok(invoice)
    }

    fn invalid_transition(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            kind: Self::KIND,
            action,
            status: self.status.to_string(),
        }
    }
}
