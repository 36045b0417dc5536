// CSV export of the ledger

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::store::Transaction;

/// Write `transactions` as CSV to `out`, one row per record.
///
/// Timestamps are RFC 3339; split participants are joined with "; " so the
/// column stays a single cell. Row order follows the input (most-recent-first
/// when fed straight from the store).
pub fn write_csv<W: Write>(out: W, transactions: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer
        .write_record([
            "id",
            "amount",
            "merchant",
            "timestamp",
            "split_with",
            "raw_notification",
        ])
        .context("Failed to write CSV header")?;

    for tx in transactions {
        let split = tx
            .split_with
            .as_deref()
            .map(|names| names.join("; "))
            .unwrap_or_default();

        let record = [
            tx.id.clone(),
            format!("{:.2}", tx.amount),
            tx.merchant.clone(),
            tx.timestamp.to_rfc3339(),
            split,
            tx.raw_notification.clone(),
        ];

        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {}", tx.id))?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export `transactions` to a CSV file at `path`.
pub fn export_to_path(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_csv(file, transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(id: &str, merchant: &str, split: Option<Vec<String>>) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: 15.67,
            merchant: merchant.to_string(),
            timestamp: Utc::now(),
            split_with: split,
            raw_notification: format!("You paid $15.67 at {} with Google Pay", merchant),
        }
    }

    #[test]
    fn test_export_includes_every_row() {
        let transactions = vec![
            sample("tx-1", "Starbucks", None),
            sample("tx-2", "Target", Some(vec!["John".to_string(), "Jane".to_string()])),
        ];

        let mut buf = Vec::new();
        write_csv(&mut buf, &transactions).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3, "header plus one line per transaction");
        assert!(lines[0].starts_with("id,amount,merchant"));
        assert!(lines[1].contains("Starbucks"));
        assert!(lines[2].contains("John; Jane"));
    }

    #[test]
    fn test_export_empty_ledger_writes_header_only() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        assert_eq!(csv.lines().count(), 1);
    }
}
