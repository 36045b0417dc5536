// Transaction Store - durable ordered ledger
// One JSON array blob under a fixed key, most-recent-first

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// Fixed key the ledger blob lives under.
pub const STORAGE_KEY: &str = "transactions";

/// A recorded wallet transaction.
///
/// Created exactly once when a qualifying notification is confirmed (or
/// injected for testing), never updated in place, removed only by explicit
/// delete. Wire keys are camelCase so the persisted blob stays compatible
/// with ledgers written by earlier builds of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity, assigned at creation. Unique across the store.
    pub id: String,

    /// Non-negative payment amount.
    pub amount: f64,

    /// Merchant label; "Unknown Merchant" when extraction found none.
    pub merchant: String,

    /// When the transaction was recorded (not the notification post time).
    pub timestamp: DateTime<Utc>,

    /// Bill-splitting participants. `None` means not yet decided,
    /// `Some(vec![])` means explicitly not split.
    #[serde(rename = "splitWith")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_with: Option<Vec<String>>,

    /// Original notification text, kept verbatim for audit/debugging.
    #[serde(rename = "rawNotification")]
    pub raw_notification: String,
}

// ============================================================================
// STORE
// ============================================================================

/// CRUD over the ledger blob.
///
/// Every mutation is a read-modify-write of the whole collection, so all
/// mutations hold the connection lock for their entire cycle. One logical
/// writer at a time; concurrent callers queue on the lock instead of
/// losing updates.
///
/// Construct one instance at startup and hand out references; tests get
/// isolated instances via `open_in_memory()`.
pub struct TransactionStore {
    conn: Mutex<Connection>,
}

impl TransactionStore {
    /// Open (or create) the ledger database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger database: {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // WAL survives crashes mid-write; harmless for :memory:
        let _ = conn.pragma_update(None, "journal_mode", "WAL");

        conn.execute(
            "CREATE TABLE IF NOT EXISTS ledger_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create ledger_kv table")?;

        Ok(TransactionStore {
            conn: Mutex::new(conn),
        })
    }

    /// All transactions, most-recent-first.
    ///
    /// Never fails: a missing blob is an empty ledger, and a corrupt blob is
    /// logged and treated the same way.
    pub fn get_all(&self) -> Vec<Transaction> {
        let conn = lock_conn(&self.conn);
        read_ledger(&conn)
    }

    /// Prepend `transaction` and write the full list back.
    ///
    /// Write failures propagate; the caller must not treat the transaction
    /// as recorded unless this returns `Ok`.
    pub fn save(&self, transaction: &Transaction) -> Result<()> {
        let conn = lock_conn(&self.conn);

        let mut transactions = read_ledger(&conn);
        transactions.insert(0, transaction.clone());

        write_ledger(&conn, &transactions)
    }

    /// Remove the transaction with `id`, if present. Unknown ids are a no-op.
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        let conn = lock_conn(&self.conn);

        let transactions = read_ledger(&conn);
        let remaining: Vec<Transaction> = transactions
            .into_iter()
            .filter(|t| t.id != id)
            .collect();

        write_ledger(&conn, &remaining)
    }

    /// Linear scan for `id`.
    pub fn get_by_id(&self, id: &str) -> Option<Transaction> {
        self.get_all().into_iter().find(|t| t.id == id)
    }

    /// Drop the blob entirely. Idempotent.
    pub fn clear(&self) -> Result<()> {
        let conn = lock_conn(&self.conn);

        conn.execute(
            "DELETE FROM ledger_kv WHERE key = ?1",
            params![STORAGE_KEY],
        )
        .context("Failed to clear ledger")?;

        Ok(())
    }

    /// Number of recorded transactions.
    pub fn count(&self) -> usize {
        self.get_all().len()
    }
}

// A poisoned lock only means a previous caller panicked mid-operation;
// the blob itself is still consistent, so recover the guard and go on.
fn lock_conn(conn: &Mutex<Connection>) -> std::sync::MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_ledger(conn: &Connection) -> Vec<Transaction> {
    let blob: Option<String> = match conn
        .query_row(
            "SELECT value FROM ledger_kv WHERE key = ?1",
            params![STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()
    {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read ledger blob, treating as empty: {}", e);
            return Vec::new();
        }
    };

    let Some(blob) = blob else {
        return Vec::new();
    };

    match serde_json::from_str(&blob) {
        Ok(transactions) => transactions,
        Err(e) => {
            warn!("Corrupt ledger blob, treating as empty: {}", e);
            Vec::new()
        }
    }
}

fn write_ledger(conn: &Connection, transactions: &[Transaction]) -> Result<()> {
    let blob = serde_json::to_string(transactions).context("Failed to serialize ledger")?;

    conn.execute(
        "INSERT OR REPLACE INTO ledger_kv (key, value) VALUES (?1, ?2)",
        params![STORAGE_KEY, blob],
    )
    .context("Failed to write ledger blob")?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
