use std::time::Duration;

use rift_pay::checkout::{CheckoutRequest, CheckoutSession};
use rift_pay::config::RiftConfig;
use rift_pay::issuer::PaymentLinkIssuer;
use rift_pay::models::{Amount, Transaction};
use rift_pay::store::TransactionStore;

/// Settlement delay used by checkout tests
pub const SETTLEMENT_DELAY: Duration = Duration::from_millis(2000);

/// Default configuration with the test settlement delay pinned
pub fn test_config() -> RiftConfig {
    RiftConfig::default().with_settlement_delay(SETTLEMENT_DELAY)
}

/// Helper to build an amount from form text
pub fn amount(text: &str) -> Amount {
    Amount::parse(text).unwrap()
}

/// Helper to issue a valid transaction into a store
pub fn issue(store: &mut TransactionStore, item: &str, amount: &str) -> Transaction {
    PaymentLinkIssuer::new(&test_config())
        .unwrap()
        .issue_link(store, item, amount)
        .unwrap()
}

/// Helper to open a checkout session for an item/amount pair
pub fn open_session(item: &str, amount_text: &str) -> CheckoutSession {
    CheckoutSession::new(CheckoutRequest::new(item, amount(amount_text)), SETTLEMENT_DELAY)
}

/// Create a batch request CSV from `(item, amount)` pairs
pub fn build_csv(rows: &[(&str, &str)]) -> String {
    let mut csv = String::from("item,amount\n");

    for (item, amount) in rows {
        csv.push_str(&format!("{},{}\n", item, amount));
    }

    csv
}

/// Run a batch CSV through the issuer and return the ledger output
pub fn process_csv_string(csv_input: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut output = Vec::new();
    rift_pay::process_link_requests(csv_input.as_bytes(), &mut output, &test_config())?;
    Ok(String::from_utf8(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_csv() {
        let csv = build_csv(&[("Coffee", "3.5"), ("Tea", "2")]);

        assert!(csv.starts_with("item,amount\n"));
        assert!(csv.contains("Coffee,3.5\n"));
        assert!(csv.contains("Tea,2\n"));
    }

    #[test]
    fn test_issue_helper() {
        let mut store = TransactionStore::new();
        let tx = issue(&mut store, "Coffee", "3.5");

        assert_eq!(tx.item_name(), "Coffee");
        assert_eq!(store.len(), 1);
    }
}
