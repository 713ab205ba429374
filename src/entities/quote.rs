use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{
    entities::Document,
    error::{DocumentKind, Error, Result},
    line_item::LineItem,
    totals::DocumentTotals,
    utils::{
        date_format::{iso_date, iso_date_option},
        serde_helpers::empty_string_as_none,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
    Invoiced,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Invoiced => "invoiced",
        })
    }
}

/// A quote (devis).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    #[serde(default)]
    pub status: Status,
    #[serde(with = "iso_date")]
    pub issue_date: Date,
    #[serde(default, with = "iso_date_option", skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub global_discount_percent: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub deposit_amount: Option<Decimal>,
    /// Derived from `line_items`; refreshed by [`Quote::recompute`].
    #[serde(default)]
    pub totals: DocumentTotals,
}

impl Document for Quote {
    const KIND: DocumentKind = DocumentKind::Quote;

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

impl Quote {
    /// Returns the quote with totals rebuilt from its line items.
    #[must_use]
    pub fn recompute(mut self) -> Self {
        self.totals = self.compute().totals;
        self
    }

    /// Replaces the line items of a draft quote.
    pub fn with_line_items(self, line_items: Vec<LineItem>) -> Result<Self> {
        let mut quote = self.editable("edit the lines of")?;
        quote.line_items = line_items;
        Ok(quote.recompute())
    }

    pub fn with_global_discount_percent(self, percent: Option<Decimal>) -> Result<Self> {
        let mut quote = self.editable("change the discount of")?;
        quote.global_discount_percent = percent;
        Ok(quote.recompute())
    }

    pub fn with_deposit_amount(self, amount: Option<Decimal>) -> Result<Self> {
        let mut quote = self.editable("change the deposit of")?;
        quote.deposit_amount = amount;
        Ok(quote.recompute())
    }

    pub fn send(self) -> Result<Self> {
        self.transition("send", &[Status::Draft], Status::Sent)
    }

    pub fn accept(self) -> Result<Self> {
        self.transition("accept", &[Status::Sent], Status::Accepted)
    }

    pub fn reject(self) -> Result<Self> {
        self.transition("reject", &[Status::Sent], Status::Rejected)
    }

    pub fn expire(self) -> Result<Self> {
        self.transition("expire", &[Status::Sent], Status::Expired)
    }

    pub fn mark_invoiced(self) -> Result<Self> {
        self.transition("invoice", &[Status::Accepted], Status::Invoiced)
    }

    /// A sent quote is past its validity once `today` is after `valid_until`.
    #[must_use]
    pub fn is_expired_on(&self, today: Date) -> bool {
        self.status == Status::Sent && self.valid_until.is_some_and(|until| today > until)
    }

    fn editable(self, action: &'static str) -> Result<Self> {
        if self.status == Status::Draft {
            Ok(self)
        } else {
            Err(self.invalid_transition(action))
        }
    }

    #[instrument(skip(self), fields(quote_id = %self.id, status = ?self.status))]
    fn transition(mut self, action: &'static str, from: &[Status], to: Status) -> Result<Self> {
        if !from.contains(&self.status) {
            warn!("refused quote transition");
            return Err(self.invalid_transition(action));
        }
        debug!(to = ?to, "quote transition");
        self.status = to;
        Ok(self)
    }

    fn invalid_transition(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            kind: Self::KIND,
            action,
            status: self.status.to_string(),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct Builder {
    pub number: String,
    pub client_id: Uuid,
    pub issue_date: Option<Date>,
    pub valid_until: Option<Date>,
    pub notes: Option<String>,
    pub line_items: Vec<LineItem>,
    pub global_discount_percent: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
}

impl Builder {
    #[must_use]
    pub fn new(number: impl Into<String>, client_id: Uuid, line_items: Vec<LineItem>) -> Self {
        Self {
            number: number.into(),
            client_id,
            line_items,
            ..Self::default()
        }
    }

    /// Builds a draft quote with computed totals. The issue date defaults to
    /// today (UTC).
    #[must_use]
    pub fn build(self) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            number: self.number,
            client_id: self.client_id,
            status: Status::Draft,
            issue_date: self
                .issue_date
                .unwrap_or_else(|| time::OffsetDateTime::now_utc().date()),
            valid_until: self.valid_until,
            notes: self.notes,
            line_items: self.line_items,
            global_discount_percent: self.global_discount_percent,
            deposit_amount: self.deposit_amount,
            totals: DocumentTotals::default(),
        }
        .recompute()
    }
}
