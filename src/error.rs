use miette::Diagnostic;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// The kind of document an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Quote,
    Invoice,
    PurchaseOrder,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote => write!(f, "quote"),
            Self::Invoice => write!(f, "invoice"),
            Self::PurchaseOrder => write!(f, "purchase order"),
        }
    }
}

/// Errors raised by the validation, document lifecycle and receipt
/// reconciliation layers.
///
/// The totals engine itself never fails; see [`crate::totals::compute_totals`].
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("invalid quantity {quantity} on line {line_id}")]
    #[diagnostic(
        code(facturation::invalid_quantity),
        help("Line quantities must be zero or positive")
    )]
    InvalidQuantity { line_id: Uuid, quantity: Decimal },

    #[error("discount of {percent}% is outside 0-100")]
    #[diagnostic(
        code(facturation::discount_out_of_range),
        help("Discounts are expressed as a percentage between 0 and 100")
    )]
    DiscountOutOfRange {
        line_id: Option<Uuid>,
        percent: Decimal,
    },

    #[error("VAT rate {rate}% is not a permitted rate")]
    #[diagnostic(
        code(facturation::unsupported_vat_rate),
        help("Permitted French VAT rates are 0, 2.1, 5.5, 10 and 20")
    )]
    UnsupportedVatRate { line_id: Uuid, rate: Decimal },

    #[error("deposit amount {amount} is negative")]
    #[diagnostic(
        code(facturation::negative_deposit),
        help("A deposit is an absolute amount and must be zero or positive")
    )]
    NegativeDeposit { amount: Decimal },

    #[error("amounts exceed the supported range of {max}")]
    #[diagnostic(
        code(facturation::amount_out_of_range),
        help("Quantities and prices must keep every line and document total within the supported range")
    )]
    AmountOutOfRange {
        line_id: Option<Uuid>,
        max: Decimal,
    },

    #[error("cannot {action} a {kind} in status {status}")]
    #[diagnostic(
        code(facturation::invalid_transition),
        help("Check the document status before changing it")
    )]
    InvalidTransition {
        kind: DocumentKind,
        action: &'static str,
        status: String,
    },

    #[error("invalid payment of {amount} on invoice {invoice_id}")]
    #[diagnostic(
        code(facturation::invalid_payment),
        help("Payments must be positive and recorded on a sent, overdue or partially paid invoice")
    )]
    InvalidPayment { invoice_id: Uuid, amount: Decimal },

    #[error("purchase order {purchase_order_id} has no line {line_id}")]
    #[diagnostic(
        code(facturation::unknown_purchase_order_line),
        help("Receipt lines must reference lines of the purchase order being received")
    )]
    UnknownPurchaseOrderLine {
        purchase_order_id: Uuid,
        line_id: Uuid,
    },

    #[error("receipt of {quantity} on line {line_id} exceeds the outstanding {outstanding}")]
    #[diagnostic(
        code(facturation::over_receipt),
        help("Receive at most the quantity still outstanding on the line")
    )]
    OverReceipt {
        line_id: Uuid,
        quantity: Decimal,
        outstanding: Decimal,
    },

    #[error("receipt quantity {quantity} on line {line_id} must be positive")]
    #[diagnostic(
        code(facturation::invalid_receipt_quantity),
        help("Each receipt line must receive a strictly positive quantity")
    )]
    InvalidReceiptQuantity { line_id: Uuid, quantity: Decimal },

    #[error("stock item {0} not found")]
    #[diagnostic(
        code(facturation::unknown_stock_item),
        help("Stock movements must reference an existing stock item")
    )]
    UnknownStockItem(Uuid),

    #[error("error decoding document: {0:?}")]
    #[diagnostic(
        code(facturation::deserialization_error),
        help("The stored document is not in the expected format")
    )]
    DeserializationError(#[source] serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::DeserializationError(e)
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
