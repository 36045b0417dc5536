// Ledger - wires the pipeline together:
// bridge event -> classify -> extract -> (split decision) -> store

use anyhow::Result;
use log::{debug, info};

use crate::bridge::NotificationEvent;
use crate::classifier::PaymentClassifier;
use crate::extractor::{NotificationExtractor, ParsedTransaction};
use crate::store::{Transaction, TransactionStore};

/// Canned wallet notification texts for manual test triggers.
pub const SAMPLE_NOTIFICATIONS: &[&str] = &[
    "You paid $15.67 at Starbucks with Google Pay",
    "Google Pay: $8.50 charged at McDonald's",
    "Payment of $25.00 at Target using Google Wallet",
    "You spent $12.34 at Subway with Google Pay",
];

/// Parse a comma-separated participant list into trimmed, non-empty names.
///
/// This is the contract for the split-confirmation outcome: order is
/// preserved, blanks are dropped.
pub fn parse_split_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

// ============================================================================
// LEDGER SERVICE
// ============================================================================

/// The notification-to-transaction pipeline.
///
/// Holds its collaborators explicitly (no ambient singletons) so tests can
/// assemble isolated instances with an in-memory store or a stub extractor.
pub struct Ledger {
    classifier: PaymentClassifier,
    extractor: Box<dyn NotificationExtractor>,
    store: TransactionStore,
}

impl Ledger {
    pub fn new(
        classifier: PaymentClassifier,
        extractor: Box<dyn NotificationExtractor>,
        store: TransactionStore,
    ) -> Self {
        Ledger {
            classifier,
            extractor,
            store,
        }
    }

    /// Classify and extract a bridge event.
    ///
    /// The classifier is re-applied here even though the bridge pre-filters:
    /// the bridge side is a coarse optimization, not a guarantee. A miss at
    /// either stage is a valid no-match, not an error; the caller gets
    /// `None` and nothing is recorded.
    pub fn observe(&self, event: &NotificationEvent) -> Option<ParsedTransaction> {
        if !self
            .classifier
            .is_payment_notification(&event.package_name, &event.text)
        {
            debug!(
                "Notification from {} did not classify as a payment",
                event.package_name
            );
            return None;
        }

        let parsed = self.extractor.extract(&event.text);
        if parsed.is_none() {
            debug!("No amount found in notification text, skipping");
        }
        parsed
    }

    /// Record a confirmed transaction.
    ///
    /// Assigns a fresh id and persists. `split_with` carries the outcome of
    /// the split confirmation: `None` when undecided, `Some(vec![])` for an
    /// explicit "no split". Returns the stored record only if the write
    /// confirmed; on error the ledger is unchanged and the caller must not
    /// show the transaction as recorded.
    pub fn commit(
        &self,
        parsed: ParsedTransaction,
        split_with: Option<Vec<String>>,
    ) -> Result<Transaction> {
        let transaction = Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            amount: parsed.amount,
            merchant: parsed.merchant,
            timestamp: parsed.timestamp,
            split_with,
            raw_notification: parsed.raw_notification,
        };

        self.store.save(&transaction)?;
        info!(
            "Recorded transaction {}: {} ${:.2}",
            transaction.id, transaction.merchant, transaction.amount
        );

        Ok(transaction)
    }

    /// Observe and, when the event qualifies, immediately commit with the
    /// given split decision. Convenience for non-interactive callers.
    pub fn observe_and_commit(
        &self,
        event: &NotificationEvent,
        split_with: Option<Vec<String>>,
    ) -> Result<Option<Transaction>> {
        match self.observe(event) {
            Some(parsed) => Ok(Some(self.commit(parsed, split_with)?)),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------------
    // Review surface passthroughs
    // ------------------------------------------------------------------------

    /// All recorded transactions, most-recent-first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.store.get_all()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Transaction> {
        self.store.get_by_id(id)
    }

    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        self.store.delete_by_id(id)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }
}

// ============================================================================
// TESTS
// ============================================================================
