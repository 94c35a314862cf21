//! Keyword-driven priority inference for derived-priority categories

use deskroute_core::Priority;

/// One row of a rule table: any keyword hit assigns `priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityRule {
    pub keywords: &'static [&'static str],
    pub priority: Priority,
}

/// Ordered rule table. The first row with a keyword hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityRules {
    pub rows: &'static [PriorityRule],
    pub default: Priority,
}

/// Access and login failures escalate technical issues.
pub const TECH_ISSUE_RULES: PriorityRules = PriorityRules {
    rows: &[PriorityRule {
        keywords: &[
            "не могу войти",
            "не могу зайти",
            "нет доступа",
            "доступ",
            "авторизац",
            "can't log in",
            "cannot log in",
            "login",
            "access",
        ],
        priority: Priority::High,
    }],
    default: Priority::Medium,
};

/// Urgency beats questions for staff issues.
pub const STAFF_ISSUE_RULES: PriorityRules = PriorityRules {
    rows: &[
        PriorityRule {
            keywords: &[
                "срочно",
                "критично",
                "не работает",
                "urgent",
                "critical",
                "broken",
            ],
            priority: Priority::High,
        },
        PriorityRule {
            keywords: &["вопрос", "уточнить", "question", "clarify"],
            priority: Priority::Low,
        },
    ],
    default: Priority::Medium,
};

/// Infer a priority from free text. Matching is case-insensitive substring
/// search over the lower-cased text.
pub fn infer(rules: &PriorityRules, text: &str) -> Priority {
    let lowered = text.to_lowercase();
    rules
        .rows
        .iter()
        .find(|row| row.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|row| row.priority)
        .unwrap_or(rules.default)
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

        /// Any text containing an urgency term is high, whatever else it says.
        #[test]
        fn prop_staff_urgency_dominates(
            prefix in "[a-zа-я ]{0,30}",
            suffix in "[a-zа-я ]{0,30}"
        ) {
            let text = format!("{} срочно {} вопрос", prefix, suffix);
            prop_assert_eq!(infer(&STAFF_ISSUE_RULES, &text), Priority::High);
        }

        /// Inference is insensitive to letter case.
        #[test]
        fn prop_case_insensitive(text in "[a-zA-Zа-яА-Я ]{0,60}") {
            prop_assert_eq!(
                infer(&TECH_ISSUE_RULES, &text.to_uppercase()),
                infer(&TECH_ISSUE_RULES, &text.to_lowercase())
            );
        }
    }
}
