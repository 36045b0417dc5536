// Notification Classifier - decides whether a posted notification
// looks like a wallet payment event

// ============================================================================
// DEFAULT ALLOW-LIST AND KEYWORDS
// ============================================================================

/// Wallet package names whose notifications we accept (US builds).
pub const WALLET_PACKAGES: &[&str] = &[
    "com.google.android.apps.walletnfcrel", // Google Wallet (primary)
    "com.android.vending",                  // Google Play Services
    "com.google.android.gms",               // Google Mobile Services
    "com.google.android.apps.nbu.paisa.user", // Google Pay (fallback)
];

/// Primary wallet package, used when synthesizing test notifications.
pub const PRIMARY_WALLET_PACKAGE: &str = "com.google.android.apps.walletnfcrel";

/// Keywords that indicate a payment transaction (US).
pub const PAYMENT_KEYWORDS: &[&str] = &[
    "paid",
    "payment",
    "sent",
    "transaction",
    "dollars",
    "$",
    "usd",
    "debited",
    "credited",
    "transferred",
    "successful",
    "completed",
    "purchase",
    "bill",
    "merchant",
    "store",
    "charged",
    "tap to pay",
];

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Classifies notifications by sender package and text content.
///
/// A notification qualifies only when BOTH hold: the sender package is in
/// the allow-list, and the lower-cased text contains at least one payment
/// keyword. Keyword matching is a plain substring test, not tokenized, so
/// a keyword inside an unrelated word still matches. That imprecision is
/// accepted; the extractor downstream is the real gate.
///
/// Construct one instance at startup and pass it where needed. The default
/// lists match the OS listener shim's, so the in-app check agrees with the
/// bridge's coarse pre-filter.
#[derive(Debug, Clone)]
pub struct PaymentClassifier {
    packages: Vec<String>,
    keywords: Vec<String>,
}

impl Default for PaymentClassifier {
    fn default() -> Self {
        PaymentClassifier {
            packages: WALLET_PACKAGES.iter().map(|s| s.to_string()).collect(),
            keywords: PAYMENT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PaymentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with a custom package allow-list (keywords keep defaults).
    pub fn with_packages(packages: &[&str]) -> Self {
        PaymentClassifier {
            packages: packages.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Classifier with a custom keyword set (packages keep defaults).
    pub fn with_keywords(keywords: &[&str]) -> Self {
        PaymentClassifier {
            keywords: keywords.iter().map(|s| s.to_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Is `package_name` a known wallet/payment sender?
    pub fn is_wallet_package(&self, package_name: &str) -> bool {
        self.packages.iter().any(|p| p == package_name)
    }

    /// Does the lower-cased text contain at least one payment keyword?
    pub fn contains_payment_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Full classification: allow-listed sender AND payment keyword present.
    ///
    /// Blank text yields false. Never panics.
    pub fn is_payment_notification(&self, package_name: &str, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        self.is_wallet_package(package_name) && self.contains_payment_keyword(text)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_wallet_payment_text() {
        let classifier = PaymentClassifier::new();
        assert!(classifier.is_payment_notification(
            PRIMARY_WALLET_PACKAGE,
            "You paid $15.67 at Starbucks with Google Pay"
        ));
    }

    #[test]
    fn test_rejects_unknown_package_regardless_of_text() {
        let classifier = PaymentClassifier::new();
        assert!(!classifier.is_payment_notification(
            "com.example.notawallet",
            "You paid $15.67 at Starbucks with Google Pay"
        ));
    }

    #[test]
    fn test_rejects_wallet_package_without_keywords() {
        let classifier = PaymentClassifier::new();
        assert!(!classifier
            .is_payment_notification(PRIMARY_WALLET_PACKAGE, "Your card design was updated"));
    }

    #[test]
    fn test_rejects_empty_and_blank_text() {
        let classifier = PaymentClassifier::new();
        assert!(!classifier.is_payment_notification(PRIMARY_WALLET_PACKAGE, ""));
        assert!(!classifier.is_payment_notification(PRIMARY_WALLET_PACKAGE, "   "));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let classifier = PaymentClassifier::new();
        assert!(classifier
            .is_payment_notification(PRIMARY_WALLET_PACKAGE, "PAYMENT of $5 COMPLETED"));
    }

    #[test]
    fn test_substring_match_inside_larger_word() {
        // "store" inside "restored" still matches; accepted heuristic noise
        let classifier = PaymentClassifier::new();
        assert!(classifier
            .is_payment_notification(PRIMARY_WALLET_PACKAGE, "Your pass was restored"));
    }

    #[test]
    fn test_currency_symbol_alone_qualifies() {
        let classifier = PaymentClassifier::new();
        assert!(classifier.is_payment_notification(PRIMARY_WALLET_PACKAGE, "$4.20 at Kiosk"));
    }

    #[test]
    fn test_all_default_packages_accepted() {
        let classifier = PaymentClassifier::new();
        for package in WALLET_PACKAGES {
            assert!(
                classifier.is_payment_notification(package, "payment completed"),
                "package {} should be allow-listed",
                package
            );
        }
    }

    #[test]
    fn test_custom_package_list() {
        let classifier = PaymentClassifier::with_packages(&["com.test.wallet"]);
        assert!(classifier.is_payment_notification("com.test.wallet", "payment completed"));
        assert!(!classifier.is_payment_notification(PRIMARY_WALLET_PACKAGE, "payment completed"));
    }

    #[test]
    fn test_custom_keyword_list() {
        let classifier = PaymentClassifier::with_keywords(&["zahlung"]);
        assert!(classifier.is_payment_notification(PRIMARY_WALLET_PACKAGE, "Zahlung erfolgt"));
        assert!(!classifier.is_payment_notification(PRIMARY_WALLET_PACKAGE, "payment completed"));
    }
}
