//! Property tests for the totals engine.

use facturation_rs::{LineItem, LineItemKind, VatRate, compute_totals, line_item};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn arb_rate() -> impl Strategy<Value = VatRate> {
    prop::sample::select(VatRate::PERMITTED.to_vec())
}

/// Quantities 0 to 100 with up to two decimals.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Prices from -100.00 to 9999.99.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (-10_000i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_discount() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((0i64..=100).prop_map(Decimal::from))
}

fn arb_line() -> impl Strategy<Value = LineItem> {
    (arb_quantity(), arb_price(), arb_discount(), arb_rate()).prop_map(
        |(quantity, price, discount, rate)| {
            let mut builder = line_item::Builder::new(LineItemKind::Material, quantity, price)
                .vat_rate(rate);
            builder.discount_percent = discount;
            builder.build()
        },
    )
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(arb_line(), 0..12)
}

proptest! {
    #[test]
    fn totals_are_sums_of_lines(lines in arb_lines()) {
        let computation = compute_totals(&lines, None, None);
        let totals = &computation.totals;

        let excluding: Decimal = computation.lines.iter().map(|l| l.line_total_excluding_tax).sum();
        let vat: Decimal = computation.lines.iter().map(|l| l.line_vat_amount).sum();
        let breakdown_vat: Decimal = totals.vat_breakdown.iter().map(|e| e.vat_amount).sum();

        prop_assert_eq!(computation.lines.len(), lines.len());
        prop_assert_eq!(totals.total_excluding_tax, excluding);
        prop_assert_eq!(totals.total_vat, vat);
        prop_assert_eq!(breakdown_vat, vat);
        prop_assert_eq!(totals.total_including_tax, totals.total_excluding_tax + totals.total_vat);
    }

    #[test]
    fn breakdown_has_one_sorted_entry_per_present_rate(lines in arb_lines()) {
        let computation = compute_totals(&lines, None, None);

        let mut expected: Vec<VatRate> = computation
            .lines
            .iter()
            .filter(|l| !l.line_total_excluding_tax.is_zero())
            .map(|l| l.line.vat_rate_percent)
            .collect();
        expected.sort();
        expected.dedup();

        let rates: Vec<VatRate> = computation.totals.vat_breakdown.iter().map(|e| e.rate).collect();
        prop_assert_eq!(rates, expected);
    }

    #[test]
    fn identical_inputs_give_identical_outputs(
        lines in arb_lines(),
        discount in arb_discount(),
        deposit in prop::option::of(arb_price()),
    ) {
        let first = compute_totals(&lines, discount, deposit);
        let second = compute_totals(&lines, discount, deposit);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn more_quantity_never_lowers_the_total(
        lines in prop::collection::vec(arb_line(), 1..8),
        index in any::<prop::sample::Index>(),
        extra in arb_quantity(),
    ) {
        let mut lines = lines;
        let target = index.index(lines.len());
        lines[target].unit_price_excluding_tax = lines[target].unit_price_excluding_tax.abs();
        let before = compute_totals(&lines, None, None).totals.total_excluding_tax;

        lines[target].quantity += extra;
        let after = compute_totals(&lines, None, None).totals.total_excluding_tax;
        prop_assert!(after >= before);
    }

    #[test]
    fn remaining_balance_is_total_minus_deposit(lines in arb_lines(), deposit in arb_price()) {
        let totals = compute_totals(&lines, None, Some(deposit)).totals;
        prop_assert_eq!(totals.remaining_balance, Some(totals.total_including_tax - deposit));
    }
}
