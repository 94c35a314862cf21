//! Result Extractor
//!
//! Separates a backend text blob into the user-facing message and an
//! embedded ticket payload, when one is present.

use serde_json::Value;

/// Outcome of scanning backend output for an embedded handler result.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// An object with a `ticket` key was found between the outermost braces.
    Parsed { message: String, ticket: Value },
    /// No usable payload; the text is passed through untouched.
    RawOnly(String),
}

impl Extraction {
    pub fn message(&self) -> &str {
        match self {
            Extraction::Parsed { message, .. } => message,
            Extraction::RawOnly(text) => text,
        }
    }

    pub fn ticket(&self) -> Option<&Value> {
        match self {
            Extraction::Parsed { ticket, .. } => Some(ticket),
            Extraction::RawOnly(_) => None,
        }
    }

    pub fn into_parts(self) -> (String, Option<Value>) {
        match self {
            Extraction::Parsed { message, ticket } => (message, Some(ticket)),
            Extraction::RawOnly(text) => (text, None),
        }
    }
}

/// Extract `{message, ticket}` from raw backend text.
///
/// Total: malformed or absent payloads yield `RawOnly(raw)`.
pub fn extract(raw: &str) -> Extraction {
    if !raw.contains('{') || !raw.contains("ticket") {
        return Extraction::RawOnly(raw.to_string());
    }

    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Extraction::RawOnly(raw.to_string());
    };
    if end <= start {
        return Extraction::RawOnly(raw.to_string());
    }

    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(&raw[start..=end]) else {
        return Extraction::RawOnly(raw.to_string());
    };

    let Some(ticket) = object.remove("ticket") else {
        return Extraction::RawOnly(raw.to_string());
    };

    let message = match object.remove("message") {
        Some(Value::String(message)) => message,
        _ => raw.to_string(),
    };

    Extraction::Parsed { message, ticket }
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Extraction never panics and RawOnly always preserves the input.
        #[test]
        fn prop_extract_is_total(raw in ".{0,300}") {
            if let Extraction::RawOnly(text) = extract(&raw) {
                prop_assert_eq!(text, raw);
            }
        }

        /// A serialized handler result surrounded by brace-free prose is found.
        #[test]
        fn prop_embedded_result_is_found(
            before in "[a-zа-я .,!]{0,40}",
            after in "[a-zа-я .,!]{0,40}",
            message in "[a-zа-я ]{1,40}",
            id in 0u16..10_000
        ) {
            let payload = json!({
                "success": true,
                "message": message.clone(),
                "ticket": {"ticket_id": format!("CERT-{:04}", id)}
            });
            let raw = format!("{}{}{}", before, payload, after);

            match extract(&raw) {
                Extraction::Parsed { message: found, ticket } => {
                    prop_assert_eq!(found, message);
                    prop_assert_eq!(ticket["ticket_id"].as_str().unwrap(), format!("CERT-{:04}", id));
                }
                other => prop_assert!(false, "expected Parsed, got {:?}", other),
            }
        }
    }
}
