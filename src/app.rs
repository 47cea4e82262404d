use chrono::Utc;

use crate::capabilities::ClipboardSink;
use crate::checkout::{CheckoutRequest, CheckoutSession};
use crate::config::RiftConfig;
use crate::error::{Result as RiftResult, ValidationError};
use crate::issuer::{CopiedIndicator, PaymentLinkIssuer};
use crate::models::{Transaction, TransactionId};
use crate::store::TransactionStore;

/// Screen currently shown by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Vendor,
    Checkout,
}

/// Vendor/buyer shell
///
/// Owns the transaction store and at most one checkout session. Rendering
/// layers drive it through these methods and read state back for display.
pub struct RiftApp<C: ClipboardSink> {
    config: RiftConfig,
    store: TransactionStore,
    issuer: PaymentLinkIssuer,
    clipboard: C,
    copied: CopiedIndicator,
    checkout: Option<CheckoutSession>,
}

impl<C: ClipboardSink> RiftApp<C> {
    /// Empty ledger
    pub fn new(config: RiftConfig, clipboard: C) -> RiftResult<Self> {
        Self::with_store(config, clipboard, TransactionStore::new())
    }

    /// Ledger seeded with the dashboard's sample activity
    pub fn with_sample_activity(config: RiftConfig, clipboard: C) -> RiftResult<Self> {
        let store = TransactionStore::with_sample_activity(&config, Utc::now());
        Self::with_store(config, clipboard, store)
    }

    /// Fails if `config` does not pass [`RiftConfig::validate`]
    pub fn with_store(
        config: RiftConfig,
        clipboard: C,
        store: TransactionStore,
    ) -> RiftResult<Self> {
        Ok(Self {
            issuer: PaymentLinkIssuer::new(&config)?,
            copied: CopiedIndicator::new(config.copied_indicator()),
            config,
            store,
            clipboard,
            checkout: None,
        })
    }

    pub fn view(&self) -> View {
        if self.checkout.is_some() {
            View::Checkout
        } else {
            View::Vendor
        }
    }

    pub fn config(&self) -> &RiftConfig {
        &self.config
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn checkout(&self) -> Option<&CheckoutSession> {
        self.checkout.as_ref()
    }

    pub fn checkout_mut(&mut self) -> Option<&mut CheckoutSession> {
        self.checkout.as_mut()
    }

    /// Vendor "Generate Payment Link" button
    ///
    /// Validates before waiting, so invalid input never touches the store.
    /// On success the new transaction is recorded and the shell switches to
    /// checkout for it.
    pub async fn generate_link(
        &mut self,
        item_name: &str,
        amount: &str,
    ) -> Result<Transaction, ValidationError> {
        PaymentLinkIssuer::validate(item_name, amount)?;

        tokio::time::sleep(self.config.generation_delay()).await;

        let tx = self.issuer.issue_link(&mut self.store, item_name, amount)?;
        self.open_checkout(CheckoutRequest::from_transaction(&tx));
        Ok(tx)
    }

    /// Vendor -> buyer hand-off. Any previous session is discarded first.
    pub fn open_checkout(&mut self, request: CheckoutRequest) {
        if let Some(previous) = self.checkout.take() {
            previous.cancel();
        }
        self.checkout = Some(CheckoutSession::from_config(request, &self.config));
    }

    /// Back navigation from checkout; discards the session and its timer
    pub fn back(&mut self) {
        if let Some(session) = self.checkout.take() {
            session.cancel();
        }
    }

    /// Copy a transaction's link and light its "Copied" badge
    ///
    /// Returns false if the id is unknown.
    pub fn copy_link(&mut self, id: TransactionId) -> bool {
        let Some(tx) = self.store.get(id) else {
            return false;
        };
        self.issuer.share_link(tx, &self.clipboard);
        self.copied.mark(id);
        true
    }

    pub fn is_copied(&self, id: TransactionId) -> bool {
        self.copied.is_copied(id)
    }
}
