//! Currency presentation.
//!
//! This is the only place amounts are rounded. The totals engine stays
//! locale-free; documents and exports call [`format_currency`] (or a custom
//! [`CurrencyFormat`]) when rendering.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Where the currency symbol goes relative to the number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
    Before,
    #[default]
    After,
}

/// Locale convention used to render amounts.
///
/// The default is the fr-FR convention for euros: `1 234,56 €`, with a
/// narrow no-break space between thousands and a no-break space before the
/// symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyFormat {
    pub symbol: String,
    pub symbol_position: SymbolPosition,
    pub symbol_separator: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub decimal_places: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::fr_fr()
    }
}

impl CurrencyFormat {
    #[must_use]
    pub fn fr_fr() -> Self {
        Self {
            symbol: "€".to_string(),
            symbol_position: SymbolPosition::After,
            symbol_separator: "\u{a0}".to_string(),
            thousands_separator: "\u{202f}".to_string(),
            decimal_separator: ",".to_string(),
            decimal_places: 2,
        }
    }

    /// Renders `amount`, rounding half away from zero to `decimal_places`.
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let rounded =
            amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let mut magnitude = rounded.abs();
        magnitude.rescale(self.decimal_places);
        let digits = magnitude.to_string();
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut number = group_thousands(integer, &self.thousands_separator);
        if !fraction.is_empty() {
            number.push_str(&self.decimal_separator);
            number.push_str(fraction);
        }

        match self.symbol_position {
            SymbolPosition::Before => format!("{sign}{}{}{number}", self.symbol, self.symbol_separator),
            SymbolPosition::After => format!("{sign}{number}{}{}", self.symbol_separator, self.symbol),
        }
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(c);
    }
    grouped
}

/// Formats an amount with the default fr-FR euro convention.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::default().format(amount)
}
