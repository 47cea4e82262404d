use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::config::RiftConfig;
use crate::models::{Amount, LinkToken, PaymentLink, Transaction, TransactionId};

/// Record of issued payment requests
///
/// Append-only apart from the one-way `mark_paid` path. Writes go through
/// `&mut self`, so readers always see a consistent view for as long as they
/// hold a shared borrow.
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Map of transaction ID to transaction
    transactions: HashMap<TransactionId, Transaction>,
    /// Insertion order, most recent first
    order: VecDeque<TransactionId>,
    /// Every link token ever handed out by this store
    links: HashMap<LinkToken, TransactionId>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the dashboard's sample activity
    pub fn with_sample_activity(config: &RiftConfig, now: DateTime<Utc>) -> Self {
        // (item, amount in cents, paid, age, token), oldest first
        let samples = [
            ("Hair Styling Session", 3000, true, Duration::days(2), "jkl012"),
            ("Design Service", 7525, false, Duration::days(1), "ghi789"),
            ("Instagram Promo Package", 10000, true, Duration::hours(5), "def456"),
            ("iPhone 15 Pro Case", 4550, true, Duration::hours(2), "abc123"),
        ];

        let mut store = Self::new();
        for (item, cents, paid, age, token) in samples {
            let Ok(amount) = Amount::new(Decimal::new(cents, 2)) else {
                continue;
            };
            let mut tx = Transaction::new(
                TransactionId::new(),
                item.to_string(),
                amount,
                now - age,
                PaymentLink::new(&config.link_host, LinkToken::from_static(token)),
            );
            if paid {
                tx.mark_paid();
            }
            store.append(tx);
        }
        store
    }

    /// Insert at the front of the ordered view
    ///
    /// Callers must have checked id and link uniqueness; a duplicate is
    /// dropped and `None` is returned.
    pub(crate) fn append(&mut self, tx: Transaction) -> Option<&Transaction> {
        let id = tx.id();
        if self.transactions.contains_key(&id) || self.contains_link(tx.link().token()) {
            tracing::warn!("Ignoring transaction {} with reused id or link", id);
            return None;
        }

        self.links.insert(tx.link().token().clone(), id);
        self.order.push_front(id);
        self.transactions.insert(id, tx);
        self.transactions.get(&id)
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    pub fn find_by_link(&self, token: &LinkToken) -> Option<&Transaction> {
        self.links.get(token).and_then(|id| self.transactions.get(id))
    }

    pub fn contains_link(&self, token: &LinkToken) -> bool {
        self.links.contains_key(token)
    }

    /// Transactions, most recent first
    pub fn recent(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.order.iter().filter_map(|id| self.transactions.get(id))
    }

    /// Timestamp of the newest entry, if any
    ///
    /// Timestamps never decrease along the insertion order, so the front
    /// entry holds the maximum.
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.order
            .front()
            .and_then(|id| self.transactions.get(id))
            .map(Transaction::timestamp)
    }

    /// One-way Pending -> Paid. Returns true only if the status changed.
    ///
    /// Nothing in the checkout flow calls this: a completed checkout leaves
    /// the vendor ledger entry Pending.
    pub fn mark_paid(&mut self, id: TransactionId) -> bool {
        match self.transactions.get_mut(&id) {
            Some(tx) => tx.mark_paid(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
