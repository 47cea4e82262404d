use std::sync::Arc;
use std::time::Duration;

use futures::future::{abortable, AbortHandle};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::config::RiftConfig;
use crate::models::{Amount, Transaction};

/// The `(item, amount)` pair a buyer checks out with
///
/// Copied out of the issued transaction; later changes to the store never
/// reach a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    item_name: String,
    amount: Amount,
}

impl CheckoutRequest {
    pub fn new(item_name: impl Into<String>, amount: Amount) -> Self {
        Self {
            item_name: item_name.into(),
            amount,
        }
    }

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self::new(tx.item_name(), tx.amount())
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Where a buyer is in the checkout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    WalletConnected,
    Processing,
    Complete,
}

/// Payment progress with the wallet flag folded out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Processing,
    Complete,
}

impl CheckoutState {
    pub fn wallet_connected(self) -> bool {
        self != CheckoutState::Idle
    }

    pub fn phase(self) -> Phase {
        match self {
            CheckoutState::Idle | CheckoutState::WalletConnected => Phase::Idle,
            CheckoutState::Processing => Phase::Processing,
            CheckoutState::Complete => Phase::Complete,
        }
    }

    pub fn is_complete(self) -> bool {
        self == CheckoutState::Complete
    }
}

/// Which checkout controls are live for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutActions {
    /// Action buttons are rendered at all (hidden once complete)
    pub show_actions: bool,
    pub pay_enabled: bool,
    pub pay_label: &'static str,
    /// Separate "Connect Wallet" button, only before a wallet is connected
    pub show_connect_wallet: bool,
}

#[derive(Debug, Clone, Copy)]
struct SessionCell {
    state: CheckoutState,
    discarded: bool,
}

impl SessionCell {
    /// Processing -> Complete, unless the session was discarded first
    fn settle(&mut self) -> bool {
        if self.discarded || self.state != CheckoutState::Processing {
            return false;
        }
        self.state = CheckoutState::Complete;
        true
    }
}

/// Read-only view of a session's state, usable after the session is gone
#[derive(Debug, Clone)]
pub struct CheckoutObserver {
    rx: watch::Receiver<SessionCell>,
}

impl CheckoutObserver {
    pub fn state(&self) -> CheckoutState {
        self.rx.borrow().state
    }

    /// True once the owning session was cancelled or dropped
    pub fn is_discarded(&self) -> bool {
        self.rx.borrow().discarded
    }

    /// Wait for the next change; `None` once no further change can happen
    pub async fn changed(&mut self) -> Option<CheckoutState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().state)
    }
}

/// Buyer-side checkout state machine for one payment request
///
/// `Idle -> WalletConnected -> Processing -> Complete`. The last step runs on
/// a Tokio task after the settlement delay; the session keeps that task's
/// abort handle and tears it down on `cancel()` or drop.
#[derive(Debug)]
pub struct CheckoutSession {
    request: CheckoutRequest,
    cell: Arc<watch::Sender<SessionCell>>,
    settlement: Option<AbortHandle>,
    settlement_delay: Duration,
}

impl CheckoutSession {
    pub fn new(request: CheckoutRequest, settlement_delay: Duration) -> Self {
        let (tx, _) = watch::channel(SessionCell {
            state: CheckoutState::Idle,
            discarded: false,
        });

        tracing::info!(
            "Checkout opened for '{}' ({})",
            request.item_name(),
            request.amount()
        );

        Self {
            request,
            cell: Arc::new(tx),
            settlement: None,
            settlement_delay,
        }
    }

    pub fn from_config(request: CheckoutRequest, config: &RiftConfig) -> Self {
        Self::new(request, config.settlement_delay())
    }

    pub fn request(&self) -> &CheckoutRequest {
        &self.request
    }

    pub fn state(&self) -> CheckoutState {
        self.cell.borrow().state
    }

    pub fn wallet_connected(&self) -> bool {
        self.state().wallet_connected()
    }

    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    pub fn subscribe(&self) -> CheckoutObserver {
        CheckoutObserver {
            rx: self.cell.subscribe(),
        }
    }

    /// Explicit connect. A no-op in every state but `Idle`.
    pub fn connect_wallet(&mut self) -> CheckoutState {
        if !self.advance(CheckoutState::Idle, CheckoutState::WalletConnected) {
            tracing::debug!("connect_wallet ignored in state {:?}", self.state());
        }
        self.state()
    }

    /// Primary checkout button
    ///
    /// The first press without a wallet only connects it. With a wallet it
    /// starts settlement. Ignored while processing or complete.
    ///
    /// Settlement runs on a Tokio task. Outside a runtime the press is
    /// refused and the session stays `WalletConnected`.
    pub fn pay(&mut self) -> CheckoutState {
        match self.state() {
            CheckoutState::Idle => {
                self.advance(CheckoutState::Idle, CheckoutState::WalletConnected);
            }
            CheckoutState::WalletConnected => {
                let Ok(runtime) = Handle::try_current() else {
                    tracing::warn!(
                        "No Tokio runtime to settle '{}', staying in WalletConnected",
                        self.request.item_name()
                    );
                    return self.state();
                };
                if self.advance(CheckoutState::WalletConnected, CheckoutState::Processing) {
                    self.schedule_settlement(&runtime);
                }
            }
            state @ (CheckoutState::Processing | CheckoutState::Complete) => {
                tracing::debug!("pay ignored in state {:?}", state);
            }
        }
        self.state()
    }

    /// Which controls should be live right now
    pub fn actions(&self) -> CheckoutActions {
        let state = self.state();
        let pay_label = match state {
            CheckoutState::Idle => "Continue to Payment",
            CheckoutState::Processing => "Processing...",
            CheckoutState::WalletConnected | CheckoutState::Complete => "Pay with Solana Pay",
        };

        CheckoutActions {
            show_actions: !state.is_complete(),
            pay_enabled: matches!(state, CheckoutState::Idle | CheckoutState::WalletConnected),
            pay_label,
            show_connect_wallet: state == CheckoutState::Idle,
        }
    }

    /// Resolve once the session reaches `Complete`
    ///
    /// Never resolves if payment is not started.
    pub async fn wait_until_complete(&self) -> CheckoutState {
        let mut rx = self.cell.subscribe();
        let result = rx
            .wait_for(|cell| cell.state.is_complete() || cell.discarded)
            .await
            .map(|cell| cell.state);
        result.unwrap_or_else(|_| self.state())
    }

    /// Back navigation: discard the session and any pending settlement
    pub fn cancel(mut self) {
        tracing::info!(
            "Checkout for '{}' cancelled in state {:?}",
            self.request.item_name(),
            self.state()
        );
        self.teardown();
    }

    fn advance(&self, from: CheckoutState, to: CheckoutState) -> bool {
        self.cell.send_if_modified(|cell| {
            if cell.discarded || cell.state != from {
                return false;
            }
            cell.state = to;
            true
        })
    }

    fn schedule_settlement(&mut self, runtime: &Handle) {
        let cell = Arc::clone(&self.cell);
        let delay = self.settlement_delay;
        let item = self.request.item_name().to_string();

        let (task, handle) = abortable(async move {
            tokio::time::sleep(delay).await;
            if cell.send_if_modified(SessionCell::settle) {
                tracing::info!("Payment for '{}' complete", item);
            }
        });

        tracing::info!(
            "Settlement for '{}' scheduled in {:?}",
            self.request.item_name(),
            delay
        );
        runtime.spawn(task);
        self.settlement = Some(handle);
    }

    // The discard mark is written under the channel lock, so a settlement
    // task that already woke up sees it before touching the state.
    fn teardown(&mut self) {
        self.cell.send_if_modified(|cell| {
            let newly_discarded = !cell.discarded;
            cell.discarded = true;
            newly_discarded
        });
        if let Some(handle) = self.settlement.take() {
            handle.abort();
        }
    }
}

impl Drop for CheckoutSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
