//! End-to-end exchange behavior against deterministic backends.

use deskroute_agent::{
    ExchangeRequest, ExchangeState, Orchestrator, APOLOGY_MESSAGE, ROUND_TRIP_CAP_MESSAGE,
};
use deskroute_core::{
    Category, ConversationTurn, DeskError, Priority, TicketStatus, ToolInvocation,
    DEFAULT_MAX_ROUND_TRIPS,
};
use deskroute_llm::BackendReply;
use deskroute_test_utils::{
    assert_ticket_id_shape, fixtures, FailingBackend, KeywordBackend, LoopingBackend,
    ScriptedBackend, CLARIFYING_QUESTION, DIRECT_ANSWER,
};
use deskroute_tickets::CategoryRegistry;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn refund_with_reason_creates_high_priority_ticket() {
    let orchestrator = Orchestrator::with_backend(Arc::new(KeywordBackend::new()));

    let outcome = orchestrator
        .handle_exchange(
            ExchangeRequest::new("Хочу вернуть деньги, курс слишком сложный")
                .with_requester("ST-101"),
        )
        .await
        .unwrap();

    assert_eq!(outcome.state, ExchangeState::Completed);
    assert_eq!(outcome.round_trips, 2);

    let ticket = outcome.ticket.expect("refund ticket");
    assert_eq!(ticket.category, Category::Refund);
    assert_eq!(ticket.priority, Priority::High);
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.requester_id, "ST-101");
    assert_ticket_id_shape(&ticket);
    assert!(ticket.ticket_id.starts_with("REFUND-"));

    assert!(outcome.message.contains(&ticket.ticket_id));
    assert!(!outcome.message.contains('{'));
}

#[tokio::test]
async fn general_question_gets_direct_answer_without_ticket() {
    let orchestrator = Orchestrator::with_backend(Arc::new(KeywordBackend::new()));

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("Как узнать свои оценки?"))
        .await
        .unwrap();

    assert_eq!(outcome.message, DIRECT_ANSWER);
    assert_eq!(outcome.ticket, None);
    assert_eq!(outcome.round_trips, 1);
}

#[tokio::test]
async fn clarification_then_ticket_across_two_exchanges() {
    let orchestrator = Orchestrator::with_backend(Arc::new(KeywordBackend::new()));

    let first = orchestrator
        .handle_exchange(ExchangeRequest::new("Хочу оформить возврат").with_requester("ST-7"))
        .await
        .unwrap();
    assert_eq!(first.message, CLARIFYING_QUESTION);
    assert_eq!(first.ticket, None);

    let second = orchestrator
        .handle_exchange(
            ExchangeRequest::new("Курс не подошел по уровню")
                .with_history(fixtures::refund_clarification_history())
                .with_requester("ST-7"),
        )
        .await
        .unwrap();

    let ticket = second.ticket.expect("ticket on second exchange");
    assert_eq!(ticket.category, Category::Refund);
    assert!(ticket.description.contains("Хочу оформить возврат"));
    assert!(ticket.description.contains("Курс не подошел по уровню"));
}

#[tokio::test]
async fn looping_backend_is_cut_off_at_the_cap() {
    let backend = Arc::new(LoopingBackend::new(
        Category::Certificate,
        fixtures::complete_arguments(Category::Certificate),
    ));
    let orchestrator = Orchestrator::with_backend(backend.clone());

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("Нужна справка для визы"))
        .await
        .unwrap();

    assert_eq!(backend.call_count(), DEFAULT_MAX_ROUND_TRIPS);
    assert_eq!(outcome.round_trips, DEFAULT_MAX_ROUND_TRIPS);
    assert_eq!(outcome.state, ExchangeState::Completed);

    // Partial output is the last handler result.
    let ticket = outcome.ticket.expect("partial ticket");
    assert_eq!(ticket.category, Category::Certificate);
    assert!(outcome.message.contains(&ticket.ticket_id));
}

#[tokio::test]
async fn cap_without_handler_output_uses_fixed_message() {
    let backend = Arc::new(ScriptedBackend::new([BackendReply::ToolCalls(Vec::new())]));
    let orchestrator =
        Orchestrator::with_limits(backend.clone(), CategoryRegistry::standard(), 1);

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("..."))
        .await
        .unwrap();

    assert_eq!(outcome.message, ROUND_TRIP_CAP_MESSAGE);
    assert_eq!(outcome.ticket, None);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn backend_failure_yields_apology_without_ticket() {
    let backend = Arc::new(FailingBackend::new());
    let orchestrator = Orchestrator::with_backend(backend.clone());

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("Хочу вернуть деньги, курс слишком сложный"))
        .await
        .unwrap();

    assert_eq!(outcome.state, ExchangeState::Failed);
    assert_eq!(outcome.message, APOLOGY_MESSAGE);
    assert_eq!(outcome.ticket, None);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn failure_after_handler_still_drops_ticket() {
    let backend = Arc::new(ScriptedBackend::new([BackendReply::ToolCalls(vec![
        ToolInvocation {
            call_id: "c1".to_string(),
            name: "refund".to_string(),
            arguments: fixtures::complete_arguments(Category::Refund),
        },
    ])]));
    let orchestrator = Orchestrator::with_backend(backend);

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("возврат"))
        .await
        .unwrap();

    assert_eq!(outcome.state, ExchangeState::Failed);
    assert_eq!(outcome.ticket, None);
}

#[tokio::test]
async fn unknown_handler_name_is_an_error() {
    let backend = Arc::new(ScriptedBackend::new([BackendReply::ToolCalls(vec![
        ToolInvocation {
            call_id: "c1".to_string(),
            name: "teleport".to_string(),
            arguments: json!({}),
        },
    ])]));
    let orchestrator = Orchestrator::with_backend(backend);

    let err = orchestrator
        .handle_exchange(ExchangeRequest::new("телепортируй меня"))
        .await
        .unwrap_err();

    assert!(matches!(err, DeskError::UnknownCategory { ref name } if name == "teleport"));
}

#[tokio::test]
async fn requester_is_injected_and_never_taken_from_arguments() {
    let mut arguments = fixtures::complete_arguments(Category::Refund);
    arguments["requester_id"] = json!("SPOOFED");
    let backend = Arc::new(ScriptedBackend::new([
        BackendReply::ToolCalls(vec![ToolInvocation {
            call_id: "c1".to_string(),
            name: "refund".to_string(),
            arguments,
        }]),
        BackendReply::Text("Готово".to_string()),
    ]));
    let orchestrator = Orchestrator::with_backend(backend.clone());

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("возврат"))
        .await
        .unwrap();

    // Plain text: message kept, ticket falls back to the one built here.
    assert_eq!(outcome.message, "Готово");
    let ticket = outcome.ticket.expect("ticket");
    assert_eq!(ticket.requester_id, "unknown");

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].scratchpad.is_empty());
    assert_eq!(requests[1].scratchpad.len(), 1);
    assert!(requests[0].system_instructions.ends_with("ID пользователя: unknown"));
}

#[tokio::test]
async fn fabricated_ticket_in_text_is_ignored_without_handler() {
    let fabricated = json!({
        "message": "Тикет создан",
        "ticket": {"ticket_id": "REFUND-0001"}
    });
    let backend = Arc::new(ScriptedBackend::new([BackendReply::Text(format!(
        "Вот: {}",
        fabricated
    ))]));
    let orchestrator = Orchestrator::with_backend(backend);

    let outcome = orchestrator
        .handle_exchange(ExchangeRequest::new("возврат"))
        .await
        .unwrap();

    assert_eq!(outcome.message, "Тикет создан");
    assert_eq!(outcome.ticket, None);
}

#[tokio::test]
async fn history_reaches_the_backend_in_order() {
    let backend = Arc::new(ScriptedBackend::new([BackendReply::Text("ok".to_string())]));
    let orchestrator = Orchestrator::with_backend(backend.clone());
    let history = vec![
        ConversationTurn::user("Привет"),
        ConversationTurn::assistant("Здравствуйте!"),
    ];

    orchestrator
        .handle_exchange(ExchangeRequest::new("Спасибо").with_history(history.clone()))
        .await
        .unwrap();

    let transcript = backend.requests()[0].transcript();
    assert_eq!(&transcript[..2], &history[..]);
    assert_eq!(transcript[2], ConversationTurn::user("Спасибо"));
}

#[tokio::test]
async fn streamed_chunks_concatenate_to_the_message() {
    let orchestrator = Orchestrator::with_backend(Arc::new(KeywordBackend::new()));
    let request = ExchangeRequest::new("Хочу вернуть деньги, курс слишком сложный");

    let (summary, chunks) = orchestrator
        .handle_exchange_stream(request.clone())
        .await
        .unwrap();
    let streamed: String = chunks.collect();

    let outcome = orchestrator.handle_exchange(request).await.unwrap();
    assert_eq!(streamed, outcome.message);
    assert_eq!(summary.ticket.map(|t| t.ticket_id), outcome.ticket.map(|t| t.ticket_id));
}
