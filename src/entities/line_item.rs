use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    utils::serde_helpers::empty_string_as_none,
    vat::VatRate,
};

/// What a line bills for. Affects which optional fields the UI shows, never
/// the arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    #[default]
    Service,
    Consumable,
    Material,
}

/// One billable row on a quote or invoice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    #[serde(default)]
    pub kind: LineItemKind,
    #[serde(default)]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price_excluding_tax: Decimal,
    #[serde(
        default,
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percent: Option<Decimal>,
    pub vat_rate_percent: VatRate,
}

impl LineItem {
    /// The line's own discount, 0 when unset.
    #[must_use]
    pub fn effective_discount_percent(&self) -> Decimal {
        self.discount_percent.unwrap_or(Decimal::ZERO)
    }

    /// Checks the business rules the totals engine deliberately ignores:
    /// non-negative quantity, discount within 0-100, a permitted VAT rate and
    /// a total that fits in a [`Decimal`].
    pub fn validate(&self) -> Result<()> {
        if self.quantity.is_sign_negative() && !self.quantity.is_zero() {
            return Err(Error::InvalidQuantity {
                line_id: self.id,
                quantity: self.quantity,
            });
        }
        if let Some(percent) = self.discount_percent
            && !is_percentage(percent)
        {
            return Err(Error::DiscountOutOfRange {
                line_id: Some(self.id),
                percent,
            });
        }
        if !self.vat_rate_percent.is_permitted() {
            return Err(Error::UnsupportedVatRate {
                line_id: self.id,
                rate: self.vat_rate_percent.percent(),
            });
        }
        if self.checked_total_including_tax().is_none() {
            return Err(Error::AmountOutOfRange {
                line_id: Some(self.id),
                max: Decimal::MAX,
            });
        }
        Ok(())
    }

    /// The line total including tax, or `None` when it does not fit in a
    /// [`Decimal`].
    pub(crate) fn checked_total_including_tax(&self) -> Option<Decimal> {
        let discount = Decimal::ONE
            .checked_sub(self.effective_discount_percent() / Decimal::ONE_HUNDRED)?;
        let vat = Decimal::ONE.checked_add(self.vat_rate_percent.percent() / Decimal::ONE_HUNDRED)?;
        self.quantity
            .checked_mul(self.unit_price_excluding_tax)?
            .checked_mul(discount)?
            .checked_mul(vat)
    }

    #[must_use]
    pub fn into_builder(self) -> Builder {
        let mut builder = Builder::new(self.kind, self.quantity, self.unit_price_excluding_tax);
        builder.id = Some(self.id);
        builder.description = Some(self.description);
        builder.discount_percent = self.discount_percent;
        builder.vat_rate_percent = Some(self.vat_rate_percent);
        builder
    }
}

pub(crate) fn is_percentage(percent: Decimal) -> bool {
    (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percent)
}

#[derive(Default, Debug, Clone)]
pub struct Builder {
    pub id: Option<Uuid>,
    pub kind: LineItemKind,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price_excluding_tax: Decimal,
    pub discount_percent: Option<Decimal>,
    pub vat_rate_percent: Option<VatRate>,
}

impl Builder {
    #[must_use]
    pub fn new(kind: LineItemKind, quantity: Decimal, unit_price_excluding_tax: Decimal) -> Self {
        Self {
            kind,
            quantity,
            unit_price_excluding_tax,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn discount_percent(mut self, percent: Decimal) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    #[must_use]
    pub fn vat_rate(mut self, rate: VatRate) -> Self {
        self.vat_rate_percent = Some(rate);
        self
    }

    /// Builds the line. A fresh id is generated when none was set and the
    /// VAT rate defaults to the standard 20 %.
    #[must_use]
    pub fn build(self) -> LineItem {
        LineItem {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            kind: self.kind,
            description: self.description.unwrap_or_default(),
            quantity: self.quantity,
            unit_price_excluding_tax: self.unit_price_excluding_tax,
            discount_percent: self.discount_percent,
            vat_rate_percent: self.vat_rate_percent.unwrap_or_default(),
        }
    }
}
