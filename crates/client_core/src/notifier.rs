//! Confirmation state shown after a successful order.

use std::sync::Arc;

use shared::protocol::OrderReceipt;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub request_id: String,
    pub amount: f64,
    pub visible: bool,
}

impl From<OrderReceipt> for OrderConfirmation {
    fn from(receipt: OrderReceipt) -> Self {
        Self {
            request_id: receipt.request_id,
            amount: receipt.amount,
            visible: true,
        }
    }
}

/// Shared observable holding the latest confirmation. Clones observe and
/// mutate the same state; rendering surfaces can `subscribe` for changes.
#[derive(Clone)]
pub struct ResponseNotifier {
    state: Arc<watch::Sender<Option<OrderConfirmation>>>,
}

impl Default for ResponseNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseNotifier {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
        }
    }

    /// Replaces whatever is displayed and makes it visible.
    pub fn on_confirmation(&self, confirmation: OrderConfirmation) {
        self.state.send_replace(Some(OrderConfirmation {
            visible: true,
            ..confirmation
        }));
    }

    /// Hides the current confirmation but keeps its id and amount readable.
    pub fn dismiss(&self) {
        self.state.send_if_modified(|current| match current {
            Some(confirmation) if confirmation.visible => {
                confirmation.visible = false;
                true
            }
            _ => false,
        });
    }

    pub fn current(&self) -> Option<OrderConfirmation> {
        self.state.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|confirmation| confirmation.visible)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<OrderConfirmation>> {
        self.state.subscribe()
    }

    pub fn render(&self) -> Option<String> {
        let state = self.state.borrow();
        let confirmation = state.as_ref().filter(|c| c.visible)?;
        Some(format!(
            "Order details\nYour order id: {}\nCups of coffee ordered: {} ☕",
            confirmation.request_id, confirmation.amount
        ))
    }
}
