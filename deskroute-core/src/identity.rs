//! Identity types for Deskroute exchanges and tickets

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Exchange identifier using UUIDv7 for timestamp-sortable IDs.
pub type ExchangeId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Requester id substituted when the caller supplies none.
pub const UNKNOWN_REQUESTER: &str = "unknown";

/// Width of the numeric ticket suffix space (`0000`..=`9999`).
pub const TICKET_NUMBER_SPACE: u64 = 10_000;

/// Generate a new UUIDv7 exchange id.
pub fn new_exchange_id() -> ExchangeId {
    Uuid::now_v7()
}

/// Compute SHA-256 hash of content.
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Normalize a requester id: absent or blank ids become `"unknown"`.
pub fn normalize_requester_id(requester_id: Option<&str>) -> String {
    match requester_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => UNKNOWN_REQUESTER.to_string(),
    }
}

/// Fold the salient text and requester id into a number in `0..10000`.
///
/// Stable across processes and builds. Distinct requests can collide; the
/// suffix space is only 10,000 wide per prefix.
pub fn ticket_number(salient_text: &str, requester_id: &str) -> u16 {
    let mut content = String::with_capacity(salient_text.len() + requester_id.len());
    content.push_str(salient_text);
    content.push_str(requester_id);

    let hash = compute_content_hash(content.as_bytes());
    let mut folded = [0u8; 8];
    folded.copy_from_slice(&hash[..8]);
    (u64::from_be_bytes(folded) % TICKET_NUMBER_SPACE) as u16
}

/// Format a ticket id as `PREFIX-NNNN`.
pub fn format_ticket_id(prefix: &str, salient_text: &str, requester_id: &str) -> String {
    format!("{}-{:04}", prefix, ticket_number(salient_text, requester_id))
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ticket numbers are deterministic and bounded to four digits.
        #[test]
        fn prop_ticket_number_deterministic_and_bounded(
            salient in ".{0,200}",
            requester in "[A-Za-z0-9-]{0,20}"
        ) {
            let first = ticket_number(&salient, &requester);
            let second = ticket_number(&salient, &requester);
            prop_assert_eq!(first, second);
            prop_assert!(first < 10_000);
        }

        /// Formatted ids always carry the prefix and exactly four digits.
        #[test]
        fn prop_ticket_id_format(
            salient in ".{0,100}",
            requester in ".{0,20}"
        ) {
            let id = format_ticket_id("TECH", &salient, &requester);
            prop_assert!(id.starts_with("TECH-"));
            let suffix = &id["TECH-".len()..];
            prop_assert_eq!(suffix.len(), 4);
            prop_assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
