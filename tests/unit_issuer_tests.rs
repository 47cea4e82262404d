mod common;

use std::collections::HashSet;
use std::time::Duration;

use common::test_config;
use rift_pay::capabilities::MemoryClipboard;
use rift_pay::error::{Field, RiftError};
use rift_pay::issuer::{CopiedIndicator, PaymentLinkIssuer};
use rift_pay::models::TransactionStatus;
use rift_pay::store::TransactionStore;
use rust_decimal_macros::dec;

fn issuer() -> PaymentLinkIssuer {
    PaymentLinkIssuer::new(&test_config()).unwrap()
}

#[test]
fn test_issue_link_creates_pending_transaction() {
    let mut store = TransactionStore::new();

    let tx = issuer().issue_link(&mut store, "iPhone Case", "45.5").unwrap();

    assert_eq!(tx.item_name(), "iPhone Case");
    assert_eq!(tx.amount().value(), dec!(45.50));
    assert_eq!(tx.amount().to_string(), "45.50");
    assert_eq!(tx.status(), TransactionStatus::Pending);

    assert_eq!(store.len(), 1);
    assert_eq!(store.recent().next(), Some(&tx));
}

#[test]
fn test_identical_requests_get_distinct_id_and_link() {
    let mut store = TransactionStore::new();
    let issuer = issuer();

    let first = issuer.issue_link(&mut store, "Promo", "100").unwrap();
    let second = issuer.issue_link(&mut store, "Promo", "100").unwrap();

    assert_ne!(first.id(), second.id());
    assert_ne!(first.link(), second.link());
    assert_eq!(store.len(), 2);
}

#[test]
fn test_link_format() {
    let mut store = TransactionStore::new();
    let tx = issuer().issue_link(&mut store, "Coffee", "3").unwrap();

    let url = tx.link().url();
    let token = tx.link().token().as_str();

    assert_eq!(url, format!("https://rift.pay/{}", token));
    assert_eq!(token.len(), 6);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_configured_token_length() {
    let config = test_config().with_link_token_len(8);
    let mut store = TransactionStore::new();

    let tx = PaymentLinkIssuer::new(&config)
        .unwrap()
        .issue_link(&mut store, "Coffee", "3")
        .unwrap();

    assert_eq!(tx.link().token().as_str().len(), 8);
}

#[test]
fn test_many_links_are_unique() {
    let mut store = TransactionStore::new();
    let issuer = issuer();

    let mut ids = HashSet::new();
    let mut links = HashSet::new();
    for _ in 0..500 {
        let tx = issuer.issue_link(&mut store, "Sticker", "1").unwrap();
        assert!(ids.insert(tx.id()));
        assert!(links.insert(tx.link().url()));
    }

    assert_eq!(store.len(), 500);
}

#[test]
fn test_timestamps_are_non_decreasing() {
    let mut store = TransactionStore::new();
    let issuer = issuer();

    for i in 0..50 {
        issuer
            .issue_link(&mut store, &format!("Item {}", i), "1")
            .unwrap();
    }

    // recent() is newest first, so timestamps never increase along it
    let stamps: Vec<_> = store.recent().map(|tx| tx.timestamp()).collect();
    assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn test_empty_item_name_rejected_without_mutation() {
    let mut store = TransactionStore::new();

    let err = issuer().issue_link(&mut store, "", "10").unwrap_err();

    assert_eq!(err.field, Field::ItemName);
    assert!(store.is_empty());
}

#[test]
fn test_whitespace_item_name_rejected() {
    let mut store = TransactionStore::new();

    let err = issuer().issue_link(&mut store, "   ", "10").unwrap_err();

    assert_eq!(err.field, Field::ItemName);
    assert!(store.is_empty());
}

#[test]
fn test_item_name_is_trimmed() {
    let mut store = TransactionStore::new();

    let tx = issuer().issue_link(&mut store, "  Hair Styling ", "30").unwrap();

    assert_eq!(tx.item_name(), "Hair Styling");
}

#[test]
fn test_zero_amount_rejected_without_mutation() {
    let mut store = TransactionStore::new();

    let err = issuer().issue_link(&mut store, "Item", "0").unwrap_err();

    assert_eq!(err.field, Field::Amount);
    assert!(store.is_empty());
}

#[test]
fn test_unparsable_amount_rejected_without_mutation() {
    let mut store = TransactionStore::new();

    assert!(issuer().issue_link(&mut store, "Item", "twelve").is_err());
    assert!(issuer().issue_link(&mut store, "Item", "-4").is_err());
    assert!(store.is_empty());
}

#[test]
fn test_issue_link_amount() {
    let mut store = TransactionStore::new();
    let issuer = issuer();

    let tx = issuer
        .issue_link_amount(&mut store, "iPhone Case", dec!(45.5))
        .unwrap();
    assert_eq!(tx.amount().to_string(), "45.50");

    let err = issuer
        .issue_link_amount(&mut store, "Item", dec!(0))
        .unwrap_err();
    assert_eq!(err.field, Field::Amount);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_can_issue_mirrors_validation() {
    assert!(PaymentLinkIssuer::can_issue("Coffee", "3.5"));
    assert!(!PaymentLinkIssuer::can_issue("", "3.5"));
    assert!(!PaymentLinkIssuer::can_issue("Coffee", ""));
    assert!(!PaymentLinkIssuer::can_issue("Coffee", "0"));
    assert!(!PaymentLinkIssuer::can_issue("Coffee", "abc"));
}

#[test]
fn test_share_link_writes_url_to_sink() {
    let mut store = TransactionStore::new();
    let issuer = issuer();
    let clipboard = MemoryClipboard::new();

    let tx = issuer.issue_link(&mut store, "Coffee", "3").unwrap();
    issuer.share_link(&tx, &clipboard);

    assert_eq!(clipboard.last(), Some(tx.link().url()));
    // Sharing does not change the transaction
    assert_eq!(store.get(tx.id()).unwrap().status(), TransactionStatus::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_copied_indicator_reverts_after_window() {
    let mut store = TransactionStore::new();
    let tx = issuer().issue_link(&mut store, "Coffee", "3").unwrap();

    let mut indicator = CopiedIndicator::new(Duration::from_secs(2));
    assert_eq!(indicator.current(), None);

    indicator.mark(tx.id());
    assert!(indicator.is_copied(tx.id()));

    tokio::time::advance(Duration::from_millis(1999)).await;
    assert!(indicator.is_copied(tx.id()));

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(!indicator.is_copied(tx.id()));
    assert_eq!(indicator.current(), None);
}

#[tokio::test(start_paused = true)]
async fn test_copied_indicator_moves_to_latest_copy() {
    let mut store = TransactionStore::new();
    let issuer = issuer();
    let first = issuer.issue_link(&mut store, "First", "1").unwrap();
    let second = issuer.issue_link(&mut store, "Second", "2").unwrap();

    let mut indicator = CopiedIndicator::new(Duration::from_secs(2));
    indicator.mark(first.id());
    indicator.mark(second.id());

    assert!(!indicator.is_copied(first.id()));
    assert!(indicator.is_copied(second.id()));
}

#[test]
fn test_token_length_outside_range_rejected_at_construction() {
    for len in [0, 1, 5, 9] {
        let config = test_config().with_link_token_len(len);
        let result = PaymentLinkIssuer::new(&config);
        assert!(
            matches!(result, Err(RiftError::Config(_))),
            "token length {} should be rejected",
            len
        );
    }

    for len in [6, 7, 8] {
        assert!(PaymentLinkIssuer::new(&test_config().with_link_token_len(len)).is_ok());
    }
}

#[test]
fn test_empty_host_rejected_at_construction() {
    let config = test_config().with_link_host("");
    assert!(matches!(
        PaymentLinkIssuer::new(&config),
        Err(RiftError::Config(_))
    ));
}

#[test]
fn test_struct_literal_config_is_checked() {
    // Bypasses the builders and env loading entirely
    let config = rift_pay::config::RiftConfig {
        link_token_len: 0,
        ..test_config()
    };

    assert!(PaymentLinkIssuer::new(&config).is_err());
}

#[test]
fn test_repeated_issuance_with_minimum_token_length() {
    let config = test_config().with_link_token_len(6);
    let issuer = PaymentLinkIssuer::new(&config).unwrap();
    let mut store = TransactionStore::new();

    for _ in 0..200 {
        let tx = issuer.issue_link(&mut store, "Sticker", "1").unwrap();
        assert_eq!(tx.link().token().as_str().len(), 6);
    }
    assert_eq!(store.len(), 200);
}
