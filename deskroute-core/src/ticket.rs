//! Ticket and handler result records

use crate::{Category, Priority, TicketStatus, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder substituted for a required input the requester never supplied.
pub const MISSING_INPUT_PLACEHOLDER: &str = "<не указано>";

/// A support ticket produced by a category handler.
///
/// Created once per successful handler invocation and never mutated by the
/// core afterwards. Category-specific inputs (freeze window, invitee contact,
/// etc.) are flattened into the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// `PREFIX-NNNN`
    pub ticket_id: String,
    pub category: Category,
    pub category_label: String,
    #[serde(default)]
    pub status: TicketStatus,
    pub priority: Priority,
    pub description: String,
    pub requester_id: String,
    pub created_at: Timestamp,
    pub sla_estimate: String,
    pub assignee: String,
    #[serde(default)]
    pub actions_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_inputs: Vec<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Ticket {
    /// Look up a category-specific string field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// Whether any required input was substituted with the placeholder.
    pub fn is_incomplete(&self) -> bool {
        !self.missing_inputs.is_empty()
    }
}

/// Output of a category handler, echoed back to the generation backend as
/// the tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
}

impl HandlerResult {
    pub fn created(message: String, ticket: Ticket) -> Self {
        Self {
            success: true,
            message,
            ticket: Some(ticket),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_ticket() -> Ticket {
        let mut fields = BTreeMap::new();
        fields.insert("freeze_start".to_string(), json!("1 марта"));
        fields.insert("freeze_end".to_string(), json!("1 мая"));
        Ticket {
            ticket_id: "FREEZE-0042".to_string(),
            category: Category::Freeze,
            category_label: "Заморозка обучения".to_string(),
            status: TicketStatus::Open,
            priority: Priority::Medium,
            description: "Заморозка с 1 марта по 1 мая".to_string(),
            requester_id: "ST-1".to_string(),
            created_at: chrono::Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            sla_estimate: "24 часа".to_string(),
            assignee: "Администратор".to_string(),
            actions_required: vec!["Оформить заморозку".to_string()],
            missing_inputs: vec![],
            fields,
        }
    }

    #[test]
    fn test_ticket_flattens_category_fields() {
        let value = serde_json::to_value(sample_ticket()).unwrap();
        assert_eq!(value["freeze_start"], "1 марта");
        assert_eq!(value["category"], "freeze");
        assert_eq!(value["status"], "open");
        assert!(value.get("fields").is_none());
        assert!(value.get("missing_inputs").is_none());
    }

    #[test]
    fn test_ticket_json_roundtrip_keeps_fields() {
        let ticket = sample_ticket();
        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ticket);
        assert_eq!(back.field("freeze_end"), Some("1 мая"));
    }

    #[test]
    fn test_handler_result_omits_absent_ticket() {
        let result = HandlerResult {
            success: false,
            message: "nope".to_string(),
            ticket: None,
        };
        let value = serde_json::to_value(result).unwrap();
        assert!(value.get("ticket").is_none());
    }
}
