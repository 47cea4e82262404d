pub mod app;
pub mod capabilities;
pub mod checkout;
pub mod config;
pub mod error;
pub mod issuer;
pub mod models;
pub mod store;

use std::io::{Read, Write};

use serde::Deserialize;

use config::RiftConfig;
use error::Result;
use issuer::PaymentLinkIssuer;
use store::TransactionStore;

/// One `item,amount` row of a batch request file
#[derive(Debug, Deserialize)]
struct LinkRequestRow {
    item: String,
    amount: String,
}

/// Issue one payment link per CSV row and write the resulting ledger
///
/// Rows that fail to parse or validate are logged and skipped. Returns the
/// store so callers can keep working with the issued transactions.
pub fn process_link_requests<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: &RiftConfig,
) -> Result<TransactionStore> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let issuer = PaymentLinkIssuer::new(config)?;
    let mut store = TransactionStore::new();

    for (line, result) in csv_reader.deserialize::<LinkRequestRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!("Skipping malformed request row {}: {}", line + 1, err);
                continue;
            }
        };

        if let Err(err) = issuer.issue_link(&mut store, &row.item, &row.amount) {
            tracing::warn!("Skipping request row {}: {}", line + 1, err);
        }
    }

    write_ledger(&store, writer)?;

    Ok(store)
}

/// Write the store as CSV, most recent first
pub fn write_ledger<W: Write>(store: &TransactionStore, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for tx in store.recent() {
        csv_writer.serialize(tx)?;
    }

    csv_writer.flush()?;
    Ok(())
}
