use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::time::Instant;

use crate::capabilities::ClipboardSink;
use crate::config::RiftConfig;
use crate::error::{Field, Result as RiftResult, ValidationError};
use crate::models::transaction::validate_item_name;
use crate::models::{Amount, LinkToken, PaymentLink, Transaction, TransactionId};
use crate::store::TransactionStore;

/// Draws per issuance before giving up on finding an unused link token
const MAX_TOKEN_DRAWS: usize = 64;

/// Validates vendor input and appends new payment requests to a store
#[derive(Debug, Clone)]
pub struct PaymentLinkIssuer {
    link_host: String,
    token_len: usize,
}

impl PaymentLinkIssuer {
    /// Build an issuer from a configuration
    ///
    /// Fails if the configuration would produce malformed links (empty host,
    /// token length outside 6..=8).
    pub fn new(config: &RiftConfig) -> RiftResult<Self> {
        config.validate()?;
        Ok(Self {
            link_host: config.link_host.trim_end_matches('/').to_string(),
            token_len: config.link_token_len,
        })
    }

    /// Check form input without issuing anything
    pub fn validate(item_name: &str, amount: &str) -> Result<(String, Amount), ValidationError> {
        Ok((validate_item_name(item_name)?, Amount::parse(amount)?))
    }

    /// Whether the "Generate" action should be enabled for this form input
    pub fn can_issue(item_name: &str, amount: &str) -> bool {
        Self::validate(item_name, amount).is_ok()
    }

    /// Issue a payment request from raw form text
    ///
    /// Fails closed: on a validation error the store is left untouched.
    pub fn issue_link(
        &self,
        store: &mut TransactionStore,
        item_name: &str,
        amount: &str,
    ) -> Result<Transaction, ValidationError> {
        let (item_name, amount) = Self::validate(item_name, amount)?;
        self.append(store, item_name, amount)
    }

    /// Issue a payment request from an already numeric amount
    pub fn issue_link_amount(
        &self,
        store: &mut TransactionStore,
        item_name: &str,
        amount: Decimal,
    ) -> Result<Transaction, ValidationError> {
        let item_name = validate_item_name(item_name)?;
        let amount = Amount::new(amount)?;
        self.append(store, item_name, amount)
    }

    fn append(
        &self,
        store: &mut TransactionStore,
        item_name: String,
        amount: Amount,
    ) -> Result<Transaction, ValidationError> {
        let mut rng = rand::thread_rng();

        // Tokens are drawn independently of the id; redraw on collision
        let token = (0..MAX_TOKEN_DRAWS)
            .map(|_| LinkToken::generate(&mut rng, self.token_len))
            .find(|candidate| !store.contains_link(candidate))
            .ok_or_else(|| {
                tracing::warn!("No unused link token after {} draws", MAX_TOKEN_DRAWS);
                ValidationError::new(Field::Link, "no unused link token available")
            })?;

        let mut id = TransactionId::new();
        while store.get(id).is_some() {
            id = TransactionId::new();
        }

        let now = Utc::now();
        let timestamp = store.latest_timestamp().map_or(now, |latest| latest.max(now));

        let tx = Transaction::new(
            id,
            item_name,
            amount,
            timestamp,
            PaymentLink::new(&self.link_host, token),
        );

        tracing::info!(
            "Issued payment link {} for '{}' ({})",
            tx.link(),
            tx.item_name(),
            tx.amount()
        );

        store.append(tx.clone());
        Ok(tx)
    }

    /// Hand the transaction's link to a clipboard-like sink
    pub fn share_link<S: ClipboardSink + ?Sized>(&self, tx: &Transaction, sink: &S) {
        sink.write(&tx.link().url());
    }
}

/// Tracks the "Copied" badge shown next to one transaction for a short window
#[derive(Debug, Clone)]
pub struct CopiedIndicator {
    window: Duration,
    copied: Option<(TransactionId, Instant)>,
}

impl CopiedIndicator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            copied: None,
        }
    }

    /// Record a copy; replaces any earlier badge
    pub fn mark(&mut self, id: TransactionId) {
        self.copied = Some((id, Instant::now()));
    }

    /// Transaction currently showing the badge, if the window is still open
    pub fn current(&self) -> Option<TransactionId> {
        match self.copied {
            Some((id, at)) if at.elapsed() < self.window => Some(id),
            _ => None,
        }
    }

    pub fn is_copied(&self, id: TransactionId) -> bool {
        self.current() == Some(id)
    }
}
