//! Document totals calculation.
//!
//! [`compute_totals`] turns a list of [`LineItem`]s, an optional global discount
//! and an optional deposit into priced lines and a [`DocumentTotals`] summary.
//! It is a pure function: it borrows its input, keeps no state between calls
//! and never fails. Business-rule validation lives in
//! [`crate::validation`] and is the caller's job.
//!
//! All arithmetic is done on [`Decimal`] without intermediate rounding.
//! Rounding to cents happens only when an amount is formatted for display
//! (see [`crate::format`]).
//!
//! Amounts are bounded by [`Decimal::MAX`] (about 7.9e28). Any product or sum
//! past that bound saturates to `Decimal::MAX` / `Decimal::MIN` instead of
//! panicking; [`LineItem::validate`] rejects lines that would get there.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{line_item::LineItem, vat::VatRate};

/// A line item together with its computed amounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLineItem {
    #[serde(flatten)]
    pub line: LineItem,
    pub line_total_excluding_tax: Decimal,
    pub line_vat_amount: Decimal,
    pub line_total_including_tax: Decimal,
}

impl PricedLineItem {
    /// Prices a single line: quantity times unit price, less the line's own
    /// discount, plus VAT at the line's rate.
    #[must_use]
    pub fn price(line: &LineItem) -> Self {
        let subtotal = line.quantity.saturating_mul(line.unit_price_excluding_tax);
        let line_total_excluding_tax = discounted(subtotal, line.effective_discount_percent());
        let line_vat_amount = line.vat_rate_percent.vat_on(line_total_excluding_tax);

        Self {
            line: line.clone(),
            line_total_excluding_tax,
            line_vat_amount,
            line_total_including_tax: line_total_excluding_tax.saturating_add(line_vat_amount),
        }
    }
}

/// Base and VAT summed over every line sharing one rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatBreakdownEntry {
    pub rate: VatRate,
    pub base_excluding_tax: Decimal,
    pub vat_amount: Decimal,
}

/// Aggregate amounts for a quote or invoice.
///
/// This is a derived view. It is rebuilt from the line items on every change
/// and stored next to the document only for display and querying.
///
/// `total_excluding_tax`, `total_vat` and `total_including_tax` are reported
/// *before* the global discount. The discount is surfaced through
/// `global_discount_percent` and `global_discount_amount`; callers that need
/// the discounted figure use [`DocumentTotals::discounted_total_including_tax`]
/// or [`DocumentTotals::payable_amount`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub total_excluding_tax: Decimal,
    #[serde(default)]
    pub vat_breakdown: Vec<VatBreakdownEntry>,
    pub total_vat: Decimal,
    pub total_including_tax: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_discount_percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_discount_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_balance: Option<Decimal>,
}

impl DocumentTotals {
    /// Total excluding tax once the global discount is applied.
    #[must_use]
    pub fn discounted_total_excluding_tax(&self) -> Decimal {
        self.apply_global_discount(self.total_excluding_tax)
    }

    /// Total including tax once the global discount is applied.
    ///
    /// The discount is a flat percentage on every line, so it scales each VAT
    /// base and therefore the VAT by the same factor.
    #[must_use]
    pub fn discounted_total_including_tax(&self) -> Decimal {
        self.apply_global_discount(self.total_including_tax)
    }

    /// What the client still has to pay: the discounted total including tax
    /// minus any deposit. Not clamped; a negative value means the deposit
    /// exceeds the total.
    #[must_use]
    pub fn payable_amount(&self) -> Decimal {
        self.discounted_total_including_tax()
            .saturating_sub(self.deposit_amount.unwrap_or(Decimal::ZERO))
    }

    fn apply_global_discount(&self, amount: Decimal) -> Decimal {
        self.global_discount_percent
            .map_or(amount, |percent| discounted(amount, percent))
    }
}

/// Result of [`compute_totals`]: fresh priced lines plus their aggregate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Computation {
    pub lines: Vec<PricedLineItem>,
    pub totals: DocumentTotals,
}

fn discounted(amount: Decimal, percent: Decimal) -> Decimal {
    amount.saturating_mul(Decimal::ONE.saturating_sub(percent / Decimal::ONE_HUNDRED))
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Computes line and document totals.
///
/// Never fails: negative quantities or prices, percentages outside 0-100 and
/// an empty line list are all computed as given. `lines` is not modified.
///
/// The VAT breakdown holds one entry per distinct rate among lines with a
/// non-zero total excluding tax, sorted by ascending rate. A deposit yields a
/// `remaining_balance` of `total_including_tax - deposit`, which may be
/// negative.
///
/// Amounts past the range of [`Decimal`] saturate rather than panic.
#[instrument(skip(lines), fields(lines = lines.len()))]
pub fn compute_totals(
    lines: &[LineItem],
    global_discount_percent: Option<Decimal>,
    deposit_amount: Option<Decimal>,
) -> Computation {
    let priced: Vec<PricedLineItem> = lines.iter().map(PricedLineItem::price).collect();

    let total_excluding_tax = saturating_sum(priced.iter().map(|l| l.line_total_excluding_tax));
    let total_vat = saturating_sum(priced.iter().map(|l| l.line_vat_amount));
    let total_including_tax = total_excluding_tax.saturating_add(total_vat);

    let mut by_rate: BTreeMap<VatRate, (Decimal, Decimal)> = BTreeMap::new();
    for line in priced.iter().filter(|l| !l.line_total_excluding_tax.is_zero()) {
        let (base, vat) = by_rate.entry(line.line.vat_rate_percent).or_default();
        *base = base.saturating_add(line.line_total_excluding_tax);
        *vat = vat.saturating_add(line.line_vat_amount);
    }
    let vat_breakdown = by_rate
        .into_iter()
        .map(|(rate, (base_excluding_tax, vat_amount))| VatBreakdownEntry {
            rate: rate.normalize(),
            base_excluding_tax,
            vat_amount,
        })
        .collect();

    let totals = DocumentTotals {
        total_excluding_tax,
        vat_breakdown,
        total_vat,
        total_including_tax,
        global_discount_percent,
        global_discount_amount: global_discount_percent
            .map(|percent| total_excluding_tax.saturating_mul(percent / Decimal::ONE_HUNDRED)),
        deposit_amount,
        remaining_balance: deposit_amount.map(|deposit| total_including_tax.saturating_sub(deposit)),
    };

    debug!(
        total_excluding_tax = %totals.total_excluding_tax,
        total_vat = %totals.total_vat,
        total_including_tax = %totals.total_including_tax,
        "computed document totals"
    );

    Computation {
        lines: priced,
        totals,
    }
}
