use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A VAT (TVA) rate expressed as a percentage, e.g. `20` for 20 %.
///
/// Equality and ordering are numeric, so `20` and `20.0` are the same rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VatRate(Decimal);

impl VatRate {
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// Taux particulier (some medicines, press).
    pub const SUPER_REDUCED: Self = Self(Decimal::from_parts(21, 0, 0, false, 1));
    /// Taux réduit (energy renovation work, food).
    pub const REDUCED: Self = Self(Decimal::from_parts(55, 0, 0, false, 1));
    /// Taux intermédiaire (renovation work, catering).
    pub const INTERMEDIATE: Self = Self(Decimal::from_parts(10, 0, 0, false, 0));
    /// Taux normal.
    pub const STANDARD: Self = Self(Decimal::from_parts(20, 0, 0, false, 0));

    /// Rates a French business may put on a document.
    pub const PERMITTED: [Self; 5] = [
        Self::ZERO,
        Self::SUPER_REDUCED,
        Self::REDUCED,
        Self::INTERMEDIATE,
        Self::STANDARD,
    ];

    #[must_use]
    pub const fn new(percent: Decimal) -> Self {
        Self(percent)
    }

    #[must_use]
    pub const fn percent(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_permitted(self) -> bool {
        Self::PERMITTED.contains(&self)
    }

    /// VAT owed on `base` at this rate. No rounding is applied; a result
    /// past the range of [`Decimal`] saturates.
    #[must_use]
    pub fn vat_on(self, base: Decimal) -> Decimal {
        base.saturating_mul(self.0 / Decimal::ONE_HUNDRED)
    }

    /// Same rate with trailing zeros removed, so `20.00` reads `20`.
    #[must_use]
    pub fn normalize(self) -> Self {
        Self(self.0.normalize())
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl From<Decimal> for VatRate {
    fn from(percent: Decimal) -> Self {
        Self(percent)
    }
}

impl fmt::Display for VatRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
