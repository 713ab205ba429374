use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{DocumentKind, Error, Result},
    stock::{MovementKind, StockMovement},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Draft,
    Ordered,
    PartiallyReceived,
    Received,
    Cancelled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Ordered => "ordered",
            Self::PartiallyReceived => "partially_received",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub id: Uuid,
    pub stock_item_id: Uuid,
    #[serde(default)]
    pub description: String,
    pub quantity_ordered: Decimal,
    #[serde(default)]
    pub quantity_received: Decimal,
    pub unit_price_excluding_tax: Decimal,
}

impl PurchaseOrderLine {
    /// Quantity ordered but not yet received.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.quantity_ordered - self.quantity_received
    }

    #[must_use]
    pub fn is_fully_received(&self) -> bool {
        self.quantity_received >= self.quantity_ordered
    }
}

/// A supplier purchase order (bon de commande).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub number: String,
    pub supplier_id: Uuid,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub lines: Vec<PurchaseOrderLine>,
}

/// A quantity received against one purchase order line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub line_id: Uuid,
    pub quantity: Decimal,
}

/// Outcome of [`PurchaseOrder::receive`]: the updated order and the stock
/// movements to record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub order: PurchaseOrder,
    pub movements: Vec<StockMovement>,
}

impl PurchaseOrder {
    /// Total ordered amount excluding tax.
    #[must_use]
    pub fn total_excluding_tax(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.quantity_ordered * line.unit_price_excluding_tax)
            .sum()
    }

    /// Places a draft order with the supplier.
    pub fn place(mut self) -> Result<Self> {
        if self.status != Status::Draft {
            return Err(self.invalid_transition("place"));
        }
        self.status = Status::Ordered;
        Ok(self)
    }

    /// Cancels an order on which nothing has been received yet.
    pub fn cancel(mut self) -> Result<Self> {
        if !matches!(self.status, Status::Draft | Status::Ordered) {
            return Err(self.invalid_transition("cancel"));
        }
        self.status = Status::Cancelled;
        Ok(self)
    }

    /// Reconciles a (partial or full) delivery against the order.
    ///
    /// Every receipt line is checked before anything changes: it must name a
    /// line of this order and receive a positive quantity no larger than what
    /// is still outstanding, counting earlier receipt lines for the same order
    /// line. The returned order has its received quantities incremented and
    /// its status set to `Received` once every line is complete, else
    /// `PartiallyReceived`. One receipt movement is produced per receipt line.
    /// An empty receipt leaves the order as it is.
    #[instrument(skip(self, receipt), fields(purchase_order_id = %self.id, receipt_lines = receipt.len()))]
    pub fn receive(&self, receipt: &[ReceiptLine]) -> Result<Reconciliation> {
        if !matches!(self.status, Status::Ordered | Status::PartiallyReceived) {
            warn!(status = ?self.status, "purchase order is not receivable");
            return Err(self.invalid_transition("receive"));
        }
        if receipt.is_empty() {
            debug!("empty receipt, order unchanged");
            return Ok(Reconciliation {
                order: self.clone(),
                movements: Vec::new(),
            });
        }

        let mut order = self.clone();
        let mut movements = Vec::with_capacity(receipt.len());

        for received in receipt {
            let line = order
                .lines
                .iter_mut()
                .find(|line| line.id == received.line_id)
                .ok_or(Error::UnknownPurchaseOrderLine {
                    purchase_order_id: self.id,
                    line_id: received.line_id,
                })?;

            if received.quantity <= Decimal::ZERO {
                return Err(Error::InvalidReceiptQuantity {
                    line_id: line.id,
                    quantity: received.quantity,
                });
            }
            let outstanding = line.outstanding();
            if received.quantity > outstanding {
                warn!(line_id = %line.id, %outstanding, quantity = %received.quantity, "over-receipt");
                return Err(Error::OverReceipt {
                    line_id: line.id,
                    quantity: received.quantity,
                    outstanding,
                });
            }

            line.quantity_received += received.quantity;
            movements.push(StockMovement {
                stock_item_id: line.stock_item_id,
                quantity: received.quantity,
                kind: MovementKind::Receipt,
                reference: Some(self.id),
            });
        }

        order.status = if order.lines.iter().all(PurchaseOrderLine::is_fully_received) {
            Status::Received
        } else {
            Status::PartiallyReceived
        };
        debug!(status = ?order.status, movements = movements.len(), "receipt reconciled");

        Ok(Reconciliation { order, movements })
    }

    fn invalid_transition(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            kind: DocumentKind::PurchaseOrder,
            action,
            status: self.status.to_string(),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct Builder {
    pub number: String,
    pub supplier_id: Uuid,
    pub lines: Vec<PurchaseOrderLine>,
}

impl Builder {
    #[must_use]
    pub fn new(number: impl Into<String>, supplier_id: Uuid) -> Self {
        Self {
            number: number.into(),
            supplier_id,
            lines: Vec::new(),
        }
    }

    /// Adds a line for `quantity` units of a stock item.
    #[must_use]
    pub fn line(
        mut self,
        stock_item_id: Uuid,
        quantity: Decimal,
        unit_price_excluding_tax: Decimal,
    ) -> Self {
        self.lines.push(PurchaseOrderLine {
            id: Uuid::new_v4(),
            stock_item_id,
            description: String::new(),
            quantity_ordered: quantity,
            quantity_received: Decimal::ZERO,
            unit_price_excluding_tax,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> PurchaseOrder {
        PurchaseOrder {
            id: Uuid::new_v4(),
            number: self.number,
            supplier_id: self.supplier_id,
            status: Status::Draft,
            lines: self.lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ordered() -> PurchaseOrder {
        Builder::new("BC-2025-010", Uuid::nil())
            .line(Uuid::new_v4(), dec!(10), dec!(4.20))
            .line(Uuid::new_v4(), dec!(2), dec!(89))
            .build()
            .place()
            .expect("draft should be placed")
    }

    #[test]
    fn total_sums_ordered_lines() {
        assert_eq!(ordered().total_excluding_tax(), dec!(220));
    }

    #[test]
    fn drafts_cannot_receive() {
        let draft = Builder::new("BC-1", Uuid::nil()).build();
        assert!(matches!(
            draft.receive(&[]),
            Err(Error::InvalidTransition {
                kind: DocumentKind::PurchaseOrder,
                ..
            })
        ));
    }

    #[test]
    fn repeated_lines_in_one_receipt_count_together() {
        let order = ordered();
        let line_id = order.lines[1].id;
        let receipt = [
            ReceiptLine { line_id, quantity: dec!(1) },
            ReceiptLine { line_id, quantity: dec!(1.5) },
        ];
        assert!(matches!(
            order.receive(&receipt),
            Err(Error::OverReceipt { outstanding, .. }) if outstanding == dec!(1)
        ));
    }

    #[test]
    fn cancel_only_before_receipt() {
        assert!(ordered().cancel().is_ok());
        let order = ordered();
        let receipt = [ReceiptLine {
            line_id: order.lines[0].id,
            quantity: dec!(1),
        }];
        let partial = order.receive(&receipt).expect("receipt should reconcile").order;
        let err = partial.cancel().unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot cancel a purchase order in status partially_received"
        );
    }

    #[test]
    fn empty_receipt_changes_nothing() {
        let order = ordered();
        let reconciliation = order.receive(&[]).expect("empty receipt should reconcile");
        assert_eq!(reconciliation.order, order);
        assert!(reconciliation.movements.is_empty());
    }
}
