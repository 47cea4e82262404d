use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::amount::Amount;
use super::link::PaymentLink;
use crate::error::{Field, ValidationError};

/// Opaque transaction identifier, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Settlement status of a payment request. Only moves Pending -> Paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionStatus {
    Pending,
    Paid,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => f.write_str("Pending"),
            TransactionStatus::Paid => f.write_str("Paid"),
        }
    }
}

/// Trim an item name and reject it if nothing is left
pub fn validate_item_name(item_name: &str) -> Result<String, ValidationError> {
    let trimmed = item_name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::ItemName, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Vendor-issued payment request
///
/// Fields are private: `item_name` and `amount` are validated on the way in
/// and cannot change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    item_name: String,
    amount: Amount,
    status: TransactionStatus,
    timestamp: DateTime<Utc>,
    link: PaymentLink,
}

impl Transaction {
    pub(crate) fn new(
        id: TransactionId,
        item_name: String,
        amount: Amount,
        timestamp: DateTime<Utc>,
        link: PaymentLink,
    ) -> Self {
        Self {
            id,
            item_name,
            amount,
            status: TransactionStatus::Pending,
            timestamp,
            link,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn link(&self) -> &PaymentLink {
        &self.link
    }

    pub fn is_paid(&self) -> bool {
        self.status == TransactionStatus::Paid
    }

    /// Move to Paid. Returns false if the transaction was already paid.
    pub(crate) fn mark_paid(&mut self) -> bool {
        if self.is_paid() {
            return false;
        }
        self.status = TransactionStatus::Paid;
        true
    }

    /// Human readable age such as "2 hours ago"
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.timestamp);

        let (count, unit) = if elapsed.num_days() > 0 {
            (elapsed.num_days(), "day")
        } else if elapsed.num_hours() > 0 {
            (elapsed.num_hours(), "hour")
        } else if elapsed.num_minutes() > 0 {
            (elapsed.num_minutes(), "minute")
        } else {
            return "just now".to_string();
        };

        if count == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{count} {unit}s ago")
        }
    }
}

// Flat row shape for the CSV ledger
#[derive(Serialize)]
struct TransactionRow<'a> {
    id: TransactionId,
    item: &'a str,
    amount: Amount,
    status: TransactionStatus,
    timestamp: String,
    link: &'a PaymentLink,
}

impl Serialize for Transaction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let row = TransactionRow {
            id: self.id,
            item: &self.item_name,
            amount: self.amount,
            status: self.status,
            timestamp: self.timestamp.to_rfc3339(),
            link: &self.link,
        };
        row.serialize(serializer)
    }
}
