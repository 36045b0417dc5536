// Notification Bridge - in-process end of the OS listener's event channel
//
// The OS-level listener shim filters posted notifications coarsely, joins
// their display text fields, and emits {package, text, postedAt} across the
// process boundary, fire-and-forget. This module models that channel: an
// unbounded queue with cloneable producer handles and exactly one consumer.

use chrono::Utc;
use log::{debug, warn};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::time::Duration;

use crate::classifier::{PaymentClassifier, PRIMARY_WALLET_PACKAGE};

/// A posted notification as delivered over the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    /// Sender identity as reported by the OS.
    pub package_name: String,
    /// Combined notification text (title, body, subtext joined by " | ").
    pub text: String,
    /// Post time in Unix milliseconds. This is the OS post time, not the
    /// transaction timestamp, which is stamped later at extraction.
    pub posted_at: i64,
}

// ============================================================================
// PRODUCER HANDLE
// ============================================================================

/// Producer side of the bridge. Clone freely; the listener shim and test
/// code each hold one.
///
/// Posting is fire-and-forget: there is no acknowledgment back to the
/// source, so duplicate or missed events cannot be corrected here.
#[derive(Clone)]
pub struct BridgeHandle {
    sender: Sender<NotificationEvent>,
    prefilter: PaymentClassifier,
}

impl BridgeHandle {
    /// Forward a posted notification. Applies the same coarse pre-filter as
    /// the OS shim (wallet package + payment keyword) before enqueueing;
    /// the consumer re-runs the full classifier regardless, so this filter
    /// is an optimization, not a correctness guarantee.
    pub fn post(&self, package_name: &str, text: &str, posted_at: i64) {
        if !self.prefilter.is_payment_notification(package_name, text) {
            debug!("Bridge pre-filter dropped notification from {}", package_name);
            return;
        }

        let event = NotificationEvent {
            package_name: package_name.to_string(),
            text: text.to_string(),
            posted_at,
        };

        // Consumer gone means the app side shut down; drop and keep going
        if self.sender.send(event).is_err() {
            warn!("Notification channel closed, dropping event");
        }
    }

    /// Inject `text` as if the primary wallet app posted it now. Testing
    /// path; mirrors the manual test trigger in the app.
    pub fn simulate(&self, text: &str) {
        self.post(PRIMARY_WALLET_PACKAGE, text, Utc::now().timestamp_millis());
    }
}

// ============================================================================
// BRIDGE (consumer side)
// ============================================================================

/// Receiving end of the notification channel.
///
/// Owns the single consumer; ownership of the `Receiver` enforces the
/// one-callback-path contract. Events arrive FIFO per producer.
pub struct NotificationBridge {
    events: Receiver<NotificationEvent>,
    handle: BridgeHandle,
}

impl NotificationBridge {
    pub fn new() -> Self {
        Self::with_prefilter(PaymentClassifier::new())
    }

    /// Bridge whose producer handles pre-filter with `classifier`.
    pub fn with_prefilter(classifier: PaymentClassifier) -> Self {
        let (sender, events) = channel();
        NotificationBridge {
            events,
            handle: BridgeHandle {
                sender,
                prefilter: classifier,
            },
        }
    }

    /// A producer handle for the listener shim or tests.
    pub fn handle(&self) -> BridgeHandle {
        self.handle.clone()
    }

    /// Next pending event, if any. Non-blocking.
    pub fn try_next(&self) -> Option<NotificationEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for the next event.
    pub fn next_timeout(&self, timeout: Duration) -> Option<NotificationEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Drain every event currently queued, in arrival order.
    pub fn drain(&self) -> Vec<NotificationEvent> {
        let mut drained = Vec::new();
        while let Some(event) = self.try_next() {
            drained.push(event);
        }
        drained
    }
}

impl Default for NotificationBridge {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
