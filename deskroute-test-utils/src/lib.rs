//! Deskroute Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Deterministic generation backends
//! - Proptest generators for domain types
//! - Fixtures for common scenarios

pub use deskroute_core::{
    Category, ConversationTurn, DeskError, DeskResult, HandlerResult, LlmError, Priority, Role,
    Ticket, TicketStatus, ToolInvocation,
};
pub use deskroute_llm::{BackendReply, GenerationBackend, GenerationRequest};

use async_trait::async_trait;
use deskroute_tickets::{CategoryRegistry, Inputs};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

// ============================================================================
// SCRIPTED BACKENDS
// ============================================================================

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replays a fixed queue of replies and records every request it sees.
///
/// Once the queue is drained every call fails with `InvalidResponse`.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<BackendReply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = BackendReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn respond(&self, request: &GenerationRequest) -> DeskResult<BackendReply> {
        lock(&self.requests).push(request.clone());
        lock(&self.replies).pop_front().ok_or_else(|| {
            LlmError::InvalidResponse {
                provider: "scripted".to_string(),
                reason: "script exhausted".to_string(),
            }
            .into()
        })
    }
}

/// Invokes the same handler on every call and never produces text.
#[derive(Debug)]
pub struct LoopingBackend {
    invocation: ToolInvocation,
    calls: AtomicU32,
}

impl LoopingBackend {
    pub fn new(category: Category, arguments: Value) -> Self {
        Self {
            invocation: ToolInvocation {
                call_id: "loop-0".to_string(),
                name: category.as_str().to_string(),
                arguments,
            },
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for LoopingBackend {
    fn provider_id(&self) -> &str {
        "looping"
    }

    async fn respond(&self, _request: &GenerationRequest) -> DeskResult<BackendReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BackendReply::ToolCalls(vec![self.invocation.clone()]))
    }
}

/// Always fails as an unreachable provider would.
#[derive(Debug, Default)]
pub struct FailingBackend {
    calls: AtomicU32,
}

impl FailingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for FailingBackend {
    fn provider_id(&self) -> &str {
        "failing"
    }

    async fn respond(&self, _request: &GenerationRequest) -> DeskResult<BackendReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::RequestFailed {
            provider: "failing".to_string(),
            status: 503,
            message: "service unavailable".to_string(),
        }
        .into())
    }
}

// ============================================================================
// KEYWORD BACKEND
// ============================================================================

/// Reply to anything that names no category.
pub const DIRECT_ANSWER: &str =
    "Оценки доступны в личном кабинете в разделе 'Успеваемость'. Обращайтесь, если появятся вопросы!";

/// Clarifying question asked when a category is detected but details are thin.
pub const CLARIFYING_QUESTION: &str =
    "Подскажите, пожалуйста, подробнее: что именно произошло и почему?";

/// User words needed before the keyword backend delegates.
pub const MIN_DETAIL_WORDS: usize = 5;

const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Refund, &["вернуть деньги", "возврат"]),
    (Category::Unfreeze, &["разморо", "продолжить обучение"]),
    (Category::Freeze, &["замороз", "заморожу"]),
    (Category::Bonus, &["бонус"]),
    (Category::GroupChange, &["сменить групп", "другую групп"]),
    (Category::TechIssue, &["не работает", "не могу войти", "ошибка"]),
    (Category::Certificate, &["справк"]),
    (Category::Extension, &["продлить", "продление", "допродаж"]),
    (Category::PartnerReferral, &["пригласить", "порекомендовать"]),
    (Category::StaffIssue, &["сотрудник"]),
];

/// Detect the category a text talks about, first table row wins.
pub fn detect_category(text: &str) -> Option<Category> {
    let lowered = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(category, _)| *category)
}

/// A rule-driven stand-in for a real model.
///
/// - No category keyword in the user turns: answers directly.
/// - Category found but fewer than [`MIN_DETAIL_WORDS`] user words: asks
///   [`CLARIFYING_QUESTION`].
/// - Otherwise invokes the handler, filling every input with the user turns.
/// - After a handler ran: echoes the last handler output verbatim.
#[derive(Debug, Default)]
pub struct KeywordBackend {
    registry: CategoryRegistry,
    calls: AtomicU32,
}

impl KeywordBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn arguments_for(&self, category: Category, user_text: &str) -> DeskResult<Value> {
        let def = self.registry.definition(category)?;
        let arguments: Map<String, Value> = def
            .required_inputs
            .iter()
            .map(|spec| (spec.name.to_string(), Value::String(user_text.to_string())))
            .collect();
        Ok(Value::Object(arguments))
    }
}

#[async_trait]
impl GenerationBackend for KeywordBackend {
    fn provider_id(&self) -> &str {
        "keyword"
    }

    async fn respond(&self, request: &GenerationRequest) -> DeskResult<BackendReply> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(last) = request.scratchpad.last() {
            return Ok(BackendReply::Text(last.output.clone()));
        }

        let user_text = request
            .transcript()
            .into_iter()
            .filter(|turn| turn.role == Role::User)
            .map(|turn| turn.content)
            .collect::<Vec<_>>()
            .join(" ");

        let Some(category) = detect_category(&user_text) else {
            return Ok(BackendReply::Text(DIRECT_ANSWER.to_string()));
        };
        if user_text.split_whitespace().count() < MIN_DETAIL_WORDS {
            return Ok(BackendReply::Text(CLARIFYING_QUESTION.to_string()));
        }

        Ok(BackendReply::ToolCalls(vec![ToolInvocation {
            call_id: format!("{}-{}", category, call),
            name: category.as_str().to_string(),
            arguments: self.arguments_for(category, &user_text)?,
        }]))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Deskroute domain types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_category() -> impl Strategy<Value = Category> {
        proptest::sample::select(Category::ALL.to_vec())
    }

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High),
        ]
    }

    /// Requester ids, including blank ones that normalize to "unknown".
    pub fn arb_requester_id() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            Just(Some("   ".to_string())),
            "[A-Z]{2}-[0-9]{1,6}".prop_map(Some),
        ]
    }

    /// Free text in the languages requests arrive in.
    pub fn arb_request_text() -> impl Strategy<Value = String> {
        "[a-zA-Zа-яА-Я0-9 ,.!?]{0,120}"
    }

    /// A category with values for every required input.
    pub fn arb_category_inputs() -> impl Strategy<Value = (Category, Inputs)> {
        (arb_category(), arb_request_text()).prop_map(|(category, text)| {
            let inputs = required_input_names(category)
                .into_iter()
                .map(|name| (name.to_string(), text.clone()))
                .collect();
            (category, inputs)
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Prebuilt inputs and conversations.

    use super::*;

    /// Plausible values for every required input of `category`.
    pub fn complete_inputs(category: Category) -> Inputs {
        let values: &[(&str, &str)] = match category {
            Category::Refund => &[("reason", "Курс оказался слишком сложным для меня")],
            Category::Freeze => &[
                ("duration_start", "1 марта"),
                ("duration_end", "1 апреля"),
                ("reason", "Командировка"),
            ],
            Category::Unfreeze => &[("preferred_date", "15 апреля")],
            Category::Bonus => &[
                ("bonus_type", "Консультация"),
                ("details", "Хочу разобрать итоговый проект"),
            ],
            Category::GroupChange => &[
                ("reason", "Сменился график работы"),
                ("preferences", "Вечер, вторник и четверг"),
            ],
            Category::TechIssue => &[
                ("issue_type", "Доступ"),
                ("description", "Не могу войти на платформу"),
            ],
            Category::Certificate => &[("purpose", "Для визы")],
            Category::Extension => &[
                ("request_type", "Продление"),
                ("details", "Python, 3 месяца"),
            ],
            Category::PartnerReferral => &[
                ("invitee_name", "Иван Петров"),
                ("invitee_telegram", "@ivan"),
                ("invitee_phone", "+7 900 000-00-00"),
            ],
            Category::StaffIssue => &[("issue_description", "Вопрос по расписанию")],
        };
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Tool arguments equivalent to [`complete_inputs`].
    pub fn complete_arguments(category: Category) -> Value {
        Value::Object(
            complete_inputs(category)
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    }

    /// A prior clarification round for a refund.
    pub fn refund_clarification_history() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user("Хочу оформить возврат"),
            ConversationTurn::assistant(CLARIFYING_QUESTION),
        ]
    }
}

/// Required input names of a standard category.
pub fn required_input_names(category: Category) -> Vec<&'static str> {
    CategoryRegistry::standard()
        .get(category)
        .map(|def| def.required_inputs.iter().map(|spec| spec.name).collect())
        .unwrap_or_default()
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Assert a ticket id is `PREFIX-NNNN` with the category's prefix.
pub fn assert_ticket_id_shape(ticket: &Ticket) {
    let (prefix, number) = ticket
        .ticket_id
        .split_once('-')
        .unwrap_or_else(|| panic!("ticket id {} has no dash", ticket.ticket_id));
    assert_eq!(prefix, ticket.category.prefix(), "prefix of {}", ticket.ticket_id);
    assert_eq!(number.len(), 4, "number width of {}", ticket.ticket_id);
    assert!(
        number.chars().all(|c| c.is_ascii_digit()),
        "number digits of {}",
        ticket.ticket_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category() {
        assert_eq!(detect_category("Хочу ВЕРНУТЬ деньги"), Some(Category::Refund));
        assert_eq!(detect_category("Хочу разморозить курс"), Some(Category::Unfreeze));
        assert_eq!(detect_category("Нужна справка"), Some(Category::Certificate));
        assert_eq!(detect_category("Как узнать свои оценки?"), None);
    }

    #[test]
    fn test_fixtures_cover_required_inputs() {
        for category in Category::ALL {
            let inputs = fixtures::complete_inputs(category);
            for name in required_input_names(category) {
                assert!(inputs.contains_key(name), "{} lacks {}", category, name);
            }
        }
    }

    #[tokio::test]
    async fn test_scripted_backend_drains_then_fails() {
        let backend = ScriptedBackend::new([BackendReply::Text("ok".to_string())]);
        let request = GenerationRequest {
            system_instructions: String::new(),
            history: Vec::new(),
            current_message: "hi".to_string(),
            tools: Vec::new(),
            scratchpad: Vec::new(),
        };

        assert_eq!(
            backend.respond(&request).await.unwrap(),
            BackendReply::Text("ok".to_string())
        );
        assert!(backend.respond(&request).await.is_err());
        assert_eq!(backend.call_count(), 2);
    }
}
