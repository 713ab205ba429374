use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A stocked article and its quantity on hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Receipt,
    Consumption,
    Adjustment,
}

/// One entry of the stock movement ledger. `quantity` is signed: receipts are
/// positive, consumptions negative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub stock_item_id: Uuid,
    pub quantity: Decimal,
    pub kind: MovementKind,
    /// The document that caused the movement, e.g. a purchase order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<Uuid>,
}

/// Applies movements to a stock snapshot and returns the new snapshot in the
/// same order. Fails without partial effect if a movement references an
/// unknown stock item.
#[instrument(skip_all, fields(items = stock.len(), movements = movements.len()))]
pub fn apply_movements(stock: &[StockItem], movements: &[StockMovement]) -> Result<Vec<StockItem>> {
    let mut deltas: HashMap<Uuid, Decimal> = HashMap::new();
    for movement in movements {
        if !stock.iter().any(|item| item.id == movement.stock_item_id) {
            warn!(stock_item_id = %movement.stock_item_id, "movement for unknown stock item");
            return Err(Error::UnknownStockItem(movement.stock_item_id));
        }
        *deltas.entry(movement.stock_item_id).or_default() += movement.quantity;
    }

    Ok(stock
        .iter()
        .map(|item| StockItem {
            quantity: item.quantity + deltas.get(&item.id).copied().unwrap_or_default(),
            ..item.clone()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(name: &str, quantity: Decimal) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn movements_accumulate_per_item() {
        let stock = vec![item("Gaine ICTA 20", dec!(10)), item("Disjoncteur 16A", dec!(3))];
        let movements = vec![
            StockMovement {
                stock_item_id: stock[0].id,
                quantity: dec!(5),
                kind: MovementKind::Receipt,
                reference: None,
            },
            StockMovement {
                stock_item_id: stock[0].id,
                quantity: dec!(-2.5),
                kind: MovementKind::Consumption,
                reference: None,
            },
        ];

        let updated = apply_movements(&stock, &movements).expect("movements should apply");
        assert_eq!(updated[0].quantity, dec!(12.5));
        assert_eq!(updated[1], stock[1]);
    }

    #[test]
    fn unknown_item_is_rejected() {
        let stock = vec![item("Tube PER", dec!(1))];
        let movement = StockMovement {
            stock_item_id: Uuid::nil(),
            quantity: dec!(1),
            kind: MovementKind::Adjustment,
            reference: None,
        };
        assert!(matches!(
            apply_movements(&stock, &[movement]),
            Err(Error::UnknownStockItem(id)) if id.is_nil()
        ));
    }
}
