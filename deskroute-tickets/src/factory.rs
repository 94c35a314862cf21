//! Ticket Factory
//!
//! Deterministic ticket construction from a category and collected inputs.
//! No side effects: the same inputs and timestamp always produce the same
//! ticket and message.

use crate::registry::{CategoryRegistry, ResolvedInputs, TemplateContext};
use deskroute_core::{
    format_ticket_id, normalize_requester_id, Category, DeskResult, Ticket, TicketStatus,
    Timestamp, MISSING_INPUT_PLACEHOLDER,
};
use std::collections::BTreeMap;

/// Raw inputs as collected from the conversation.
pub type Inputs = BTreeMap<String, String>;

/// Builds tickets and confirmation messages from registry rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketFactory {
    registry: CategoryRegistry,
}

impl TicketFactory {
    pub fn new(registry: CategoryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Build a ticket stamped with the current time.
    pub fn build(
        &self,
        category: Category,
        inputs: &Inputs,
        requester_id: Option<&str>,
    ) -> DeskResult<(Ticket, String)> {
        self.build_at(category, inputs, requester_id, chrono::Utc::now())
    }

    /// Build a ticket with an explicit creation timestamp.
    pub fn build_at(
        &self,
        category: Category,
        inputs: &Inputs,
        requester_id: Option<&str>,
        created_at: Timestamp,
    ) -> DeskResult<(Ticket, String)> {
        let def = self.registry.definition(category)?;
        let requester_id = normalize_requester_id(requester_id);

        let mut resolved = ResolvedInputs::new();
        let mut missing_inputs = Vec::new();
        for spec in def.required_inputs {
            match inputs.get(spec.name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(value) => resolved.insert(spec.name, value),
                None => {
                    resolved.insert(spec.name, MISSING_INPUT_PLACEHOLDER);
                    missing_inputs.push(spec.name.to_string());
                }
            }
        }

        let salient = resolved.get(def.salient_input);
        let priority = def.priority.resolve(salient);
        let assignee = def.assignee.resolve(&resolved);
        let sla = def.sla.resolve(priority);
        let ticket_id = format_ticket_id(def.prefix(), salient, &requester_id);

        let message = (def.message_template)(&TemplateContext {
            inputs: &resolved,
            ticket_id: &ticket_id,
            sla,
            assignee,
            priority,
        });

        let fields = def
            .ticket_fields
            .iter()
            .map(|(field, input)| {
                (
                    field.to_string(),
                    serde_json::Value::String(resolved.get(input).to_string()),
                )
            })
            .collect();

        let ticket = Ticket {
            ticket_id,
            category,
            category_label: def.label.to_string(),
            status: TicketStatus::Open,
            priority,
            description: (def.describe)(&resolved),
            requester_id,
            created_at,
            sla_estimate: sla.to_string(),
            assignee: assignee.to_string(),
            actions_required: def
                .actions
                .iter()
                .map(|action| action.replace("{assignee}", assignee))
                .collect(),
            missing_inputs,
            fields,
        };

        Ok((ticket, message))
    }
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_category() -> impl Strategy<Value = Category> {
        proptest::sample::select(Category::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Complete inputs always yield the registry's assignee and SLA.
        #[test]
        fn prop_complete_inputs_match_registry(
            category in any_category(),
            value in "[a-zа-я]{1,20}",
            requester in "[A-Z]{2}-[0-9]{1,4}"
        ) {
            let factory = TicketFactory::default();
            let def = factory.registry().get(category).unwrap();
            let inputs: Inputs = def
                .required_inputs
                .iter()
                .map(|spec| (spec.name.to_string(), value.clone()))
                .collect();

            let (ticket, _) = factory.build(category, &inputs, Some(&requester)).unwrap();
            let mut resolved = ResolvedInputs::new();
            for spec in def.required_inputs {
                resolved.insert(spec.name, value.clone());
            }

            prop_assert_eq!(ticket.category, category);
            prop_assert_eq!(ticket.assignee.as_str(), def.assignee.resolve(&resolved));
            prop_assert_eq!(ticket.sla_estimate.as_str(), def.sla.resolve(ticket.priority));
            prop_assert!(ticket.missing_inputs.is_empty());
            prop_assert_eq!(ticket.requester_id, requester);
        }

        /// The ticket id depends only on prefix, salient text and requester.
        #[test]
        fn prop_ticket_id_ignores_other_inputs(
            salient in "[a-z]{1,20}",
            other_a in "[a-z]{1,20}",
            other_b in "[a-z]{1,20}"
        ) {
            let factory = TicketFactory::default();
            let mut first = Inputs::new();
            first.insert("bonus_type".to_string(), salient.clone());
            first.insert("details".to_string(), other_a);
            let mut second = first.clone();
            second.insert("details".to_string(), other_b);

            let (a, _) = factory.build(Category::Bonus, &first, Some("ST-1")).unwrap();
            let (b, _) = factory.build(Category::Bonus, &second, Some("ST-1")).unwrap();
            prop_assert_eq!(a.ticket_id, b.ticket_id);
        }
    }
}
