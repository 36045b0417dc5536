use anyhow::{bail, Result};
use chrono::Utc;
use std::env;
use std::io::BufRead;
use std::path::PathBuf;

use tap_and_track::{
    export_to_path, parse_split_names, Ledger, NotificationBridge, PaymentClassifier,
    RegexExtractor, TransactionStore, SAMPLE_NOTIFICATIONS,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None | Some("list") => run_list(),
        Some("simulate") => run_simulate(&args[2..]),
        Some("delete") => run_delete(&args[2..]),
        Some("clear") => run_clear(),
        Some("export") => run_export(&args[2..]),
        Some("watch") => run_watch(),
        Some("help") | Some("--help") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: tap-and-track <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                         Show the recorded ledger (default)");
    eprintln!("  simulate [text] [--split \"a, b\"]");
    eprintln!("                               Inject a wallet notification and record it");
    eprintln!("  delete <id>                  Remove one transaction");
    eprintln!("  clear                        Remove the whole ledger");
    eprintln!("  export <path>                Write the ledger to a CSV file");
    eprintln!("  watch                        Read notification texts from stdin, one per line");
    eprintln!();
    eprintln!("Ledger path comes from TAPANDTRACK_DB (default: tapandtrack.db)");
}

fn db_path() -> PathBuf {
    env::var("TAPANDTRACK_DB")
        .unwrap_or_else(|_| "tapandtrack.db".to_string())
        .into()
}

fn open_ledger() -> Result<Ledger> {
    let store = TransactionStore::open(&db_path())?;
    Ok(Ledger::new(
        PaymentClassifier::new(),
        Box::new(RegexExtractor::new()),
        store,
    ))
}

fn run_list() -> Result<()> {
    let ledger = open_ledger()?;
    let transactions = ledger.transactions();

    if transactions.is_empty() {
        println!("No transactions yet");
        return Ok(());
    }

    println!("Transactions ({}):", transactions.len());
    for tx in &transactions {
        let split = match &tx.split_with {
            Some(names) if !names.is_empty() => format!("  split with: {}", names.join(", ")),
            Some(_) => String::new(),
            None => "  (split undecided)".to_string(),
        };
        println!(
            "  {}  {}  ${:.2}  {}{}",
            tx.id,
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tx.amount,
            tx.merchant,
            split
        );
    }

    Ok(())
}

fn run_simulate(args: &[String]) -> Result<()> {
    // Text is every arg before --split; a missing text picks a canned sample
    let mut text_parts: Vec<&str> = Vec::new();
    let mut split: Option<Vec<String>> = None;

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--split" {
            let names = args
                .get(i + 1)
                .map(|s| parse_split_names(s))
                .unwrap_or_default();
            split = Some(names);
            i += 2;
        } else {
            text_parts.push(&args[i]);
            i += 1;
        }
    }

    let text = if text_parts.is_empty() {
        let pick = Utc::now().timestamp_millis() as usize % SAMPLE_NOTIFICATIONS.len();
        SAMPLE_NOTIFICATIONS[pick].to_string()
    } else {
        text_parts.join(" ")
    };

    let ledger = open_ledger()?;

    // Run the text through the full channel pipeline, like a real event
    let bridge = NotificationBridge::new();
    bridge.handle().simulate(&text);

    let Some(event) = bridge.try_next() else {
        println!("Notification did not pass the payment filter: {}", text);
        return Ok(());
    };

    match ledger.observe_and_commit(&event, split)? {
        Some(tx) => {
            println!("✓ Recorded {}: {} ${:.2}", tx.id, tx.merchant, tx.amount);
        }
        None => {
            println!("Notification did not parse as a transaction: {}", text);
        }
    }

    Ok(())
}

fn run_delete(args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        bail!("delete requires a transaction id");
    };

    let ledger = open_ledger()?;
    match ledger.get_by_id(id) {
        Some(tx) => {
            ledger.delete_by_id(id)?;
            println!("✓ Deleted {}: {} ${:.2}", tx.id, tx.merchant, tx.amount);
        }
        None => println!("No transaction with id {}", id),
    }

    Ok(())
}

fn run_clear() -> Result<()> {
    let ledger = open_ledger()?;
    let count = ledger.count();
    ledger.clear()?;
    println!("✓ Cleared {} transactions", count);
    Ok(())
}

fn run_export(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        bail!("export requires an output path");
    };

    let ledger = open_ledger()?;
    let transactions = ledger.transactions();
    export_to_path(path.as_ref(), &transactions)?;
    println!("✓ Exported {} transactions to {}", transactions.len(), path);

    Ok(())
}

/// Feed stdin lines through the bridge and record whatever qualifies.
/// Each line is treated as one posted notification's combined text.
fn run_watch() -> Result<()> {
    let ledger = open_ledger()?;
    let bridge = NotificationBridge::new();
    let handle = bridge.handle();

    println!("Listening for notifications on stdin (Ctrl-D to stop)");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        handle.simulate(&line);

        let events = bridge.drain();
        if events.is_empty() {
            println!("  Skipped (filtered)");
            continue;
        }

        for event in events {
            match ledger.observe_and_commit(&event, None) {
                Ok(Some(tx)) => {
                    println!("✓ Recorded {}: {} ${:.2}", tx.id, tx.merchant, tx.amount)
                }
                Ok(None) => println!("  Skipped (not a transaction)"),
                Err(e) => eprintln!("  Failed to record: {:#}", e),
            }
        }
    }

    println!("Ledger now holds {} transactions", ledger.count());
    Ok(())
}
