//! Business-rule checks run by the input layer before a document is
//! persisted. [`crate::totals::compute_totals`] never calls these.

use rust_decimal::Decimal;

use crate::{
    error::{Error, Result},
    line_item::{LineItem, is_percentage},
};

/// Validates every line, the document total, and the document-level discount
/// and deposit. Stops at the first violation.
///
/// Documents that pass keep every amount [`crate::totals::compute_totals`]
/// produces within the range of [`Decimal`].
#[instrument(skip(lines), fields(lines = lines.len()))]
pub fn validate_document_inputs(
    lines: &[LineItem],
    global_discount_percent: Option<Decimal>,
    deposit_amount: Option<Decimal>,
) -> Result<()> {
    lines.iter().try_for_each(LineItem::validate).inspect_err(|e| {
        warn!("rejected line item: {e}");
    })?;

    let document_total = lines.iter().try_fold(Decimal::ZERO, |total, line| {
        line.checked_total_including_tax()
            .and_then(|line_total| total.checked_add(line_total))
    });
    if document_total.is_none() {
        warn!("rejected document total past the decimal range");
        return Err(Error::AmountOutOfRange {
            line_id: None,
            max: Decimal::MAX,
        });
    }

    if let Some(percent) = global_discount_percent
        && !is_percentage(percent)
    {
        warn!(%percent, "rejected global discount");
        return Err(Error::DiscountOutOfRange {
            line_id: None,
            percent,
        });
    }

    if let Some(amount) = deposit_amount
        && amount.is_sign_negative()
        && !amount.is_zero()
    {
        warn!(%amount, "rejected deposit");
        return Err(Error::NegativeDeposit { amount });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{Builder, LineItemKind};
    use rust_decimal_macros::dec;

    fn lines() -> Vec<LineItem> {
        vec![Builder::new(LineItemKind::Service, dec!(1), dec!(80)).build()]
    }

    #[test]
    fn accepts_valid_inputs() {
        assert!(validate_document_inputs(&lines(), Some(dec!(100)), Some(dec!(0))).is_ok());
        assert!(validate_document_inputs(&[], None, None).is_ok());
    }

    #[test]
    fn rejects_global_discount_out_of_range() {
        let err = validate_document_inputs(&lines(), Some(dec!(-1)), None).unwrap_err();
        assert!(matches!(
            err,
            Error::DiscountOutOfRange { line_id: None, .. }
        ));
    }

    #[test]
    fn rejects_negative_deposit() {
        let err = validate_document_inputs(&lines(), None, Some(dec!(-0.01))).unwrap_err();
        assert!(matches!(err, Error::NegativeDeposit { .. }));
    }

    #[test]
    fn rejects_totals_past_decimal_range() {
        let line = Builder::new(LineItemKind::Material, dec!(1), dec!(50000000000000000000000000000))
            .build();
        assert!(validate_document_inputs(&[line.clone()], None, None).is_ok());

        let err = validate_document_inputs(&[line.clone(), line], None, None).unwrap_err();
        assert!(matches!(err, Error::AmountOutOfRange { line_id: None, .. }));
    }

    #[test]
    fn reports_first_invalid_line() {
        let mut lines = lines();
        lines.push(Builder::new(LineItemKind::Material, dec!(-2), dec!(5)).build());
        let err = validate_document_inputs(&lines, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { quantity, .. } if quantity == dec!(-2)));
    }
}
