use facturation_rs::error::{DocumentKind, Error};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn test_error_display_formatting() {
    let error = Error::OverReceipt {
        line_id: Uuid::nil(),
        quantity: dec!(5),
        outstanding: dec!(2),
    };
    let display_text = format!("{error}");
    assert!(display_text.contains("receipt of 5"));
    assert!(display_text.contains("outstanding 2"));

    let error = Error::InvalidTransition {
        kind: DocumentKind::PurchaseOrder,
        action: "receive",
        status: "draft".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "cannot receive a purchase order in status draft"
    );
}

#[test]
fn test_deserialization_error_keeps_source() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = Error::from(source);
    assert!(matches!(error, Error::DeserializationError(_)));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_discount_error_without_line() {
    let error = Error::DiscountOutOfRange {
        line_id: None,
        percent: dec!(101),
    };
    assert_eq!(error.to_string(), "discount of 101% is outside 0-100");
}
