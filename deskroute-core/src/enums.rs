//! Enum types for Deskroute requests and tickets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// REQUEST CATEGORY
// ============================================================================

/// Closed set of business request categories.
///
/// Every ticket belongs to exactly one category, and the generation backend
/// must name one of these tags when it invokes a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Tuition refund
    Refund,
    /// Pause studies for one to two months
    Freeze,
    /// Resume studies after a freeze
    Unfreeze,
    /// Redeem a bonus (consultation, platform access)
    Bonus,
    /// Move to another group or instructor
    GroupChange,
    /// Links, platform or homework-service problems
    TechIssue,
    /// Attendance certificate
    Certificate,
    /// Course extension or additional purchase
    Extension,
    /// Partner program referral
    PartnerReferral,
    /// Issues raised by staff members
    StaffIssue,
}

impl Category {
    /// All categories in registry order.
    pub const ALL: [Category; 10] = [
        Category::Refund,
        Category::Freeze,
        Category::Unfreeze,
        Category::Bonus,
        Category::GroupChange,
        Category::TechIssue,
        Category::Certificate,
        Category::Extension,
        Category::PartnerReferral,
        Category::StaffIssue,
    ];

    /// Wire tag, also used as the tool name exposed to the generation backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Refund => "refund",
            Category::Freeze => "freeze",
            Category::Unfreeze => "unfreeze",
            Category::Bonus => "bonus",
            Category::GroupChange => "group-change",
            Category::TechIssue => "tech-issue",
            Category::Certificate => "certificate",
            Category::Extension => "extension",
            Category::PartnerReferral => "partner-referral",
            Category::StaffIssue => "staff-issue",
        }
    }

    /// Ticket id prefix for this category.
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Refund => "REFUND",
            Category::Freeze => "FREEZE",
            Category::Unfreeze => "UNFREEZE",
            Category::Bonus => "BONUS",
            Category::GroupChange => "CHANGE",
            Category::TechIssue => "TECH",
            Category::Certificate => "CERT",
            Category::Extension => "EXTEND",
            Category::PartnerReferral => "PARTNER",
            Category::StaffIssue => "STAFF",
        }
    }

    /// Parse a category tag. Accepts kebab-case and snake_case spellings.
    pub fn from_tag(s: &str) -> Result<Self, CategoryParseError> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| CategoryParseError(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

/// Error when parsing an unregistered category tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(pub String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid category: {}", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

// ============================================================================
// PRIORITY
// ============================================================================

/// Ticket priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

// ============================================================================
// TICKET STATUS
// ============================================================================

/// Lifecycle status of a ticket. The core only ever creates `Open` tickets;
/// later transitions are administrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CONVERSATION ROLE
// ============================================================================

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tag_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_tag(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn test_category_accepts_snake_case() {
        assert_eq!(Category::from_tag("group_change"), Ok(Category::GroupChange));
        assert_eq!(Category::from_tag(" Tech_Issue "), Ok(Category::TechIssue));
    }

    #[test]
    fn test_category_rejects_unknown() {
        let err = Category::from_tag("request_document").unwrap_err();
        assert_eq!(err.to_string(), "Invalid category: request_document");
    }

    #[test]
    fn test_category_serde_uses_tag() {
        let json = serde_json::to_string(&Category::PartnerReferral).unwrap();
        assert_eq!(json, "\"partner-referral\"");
    }

    #[test]
    fn test_prefixes_are_unique() {
        let mut prefixes: Vec<&str> = Category::ALL.iter().map(|c| c.prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), Category::ALL.len());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
    }

    #[test]
    fn test_ticket_status_default_is_open() {
        assert_eq!(TicketStatus::default(), TicketStatus::Open);
        assert_eq!(serde_json::to_string(&TicketStatus::Open).unwrap(), "\"open\"");
    }
}
