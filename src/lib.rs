// TapAndTrack - Core Library
// Wallet-notification parsing pipeline: classify, extract, persist

pub mod bridge;     // OS listener event channel (in-process end)
pub mod classifier; // Sender allow-list + payment keyword check
pub mod export;     // CSV export of the ledger
pub mod extractor;  // Amount/merchant extraction heuristics
pub mod ledger;     // Pipeline service wiring it all together
pub mod store;      // Durable transaction ledger

// Re-export commonly used types
pub use bridge::{BridgeHandle, NotificationBridge, NotificationEvent};
pub use classifier::{
    PaymentClassifier, PAYMENT_KEYWORDS, PRIMARY_WALLET_PACKAGE, WALLET_PACKAGES,
};
pub use export::{export_to_path, write_csv};
pub use extractor::{
    NotificationExtractor, ParsedTransaction, RegexExtractor, UNKNOWN_MERCHANT,
};
pub use ledger::{parse_split_names, Ledger, SAMPLE_NOTIFICATIONS};
pub use store::{Transaction, TransactionStore, STORAGE_KEY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
