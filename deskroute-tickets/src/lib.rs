//! Deskroute Tickets - Category Registry and Ticket Construction
//!
//! The business rules of the ten request categories, keyword priority
//! inference, deterministic ticket building and the handler dispatch used
//! when the generation backend invokes a category tool.

pub mod dispatch;
pub mod factory;
pub mod priority;
pub mod registry;

pub use dispatch::{arguments_to_inputs, TicketDispatcher};
pub use factory::{Inputs, TicketFactory};
pub use priority::{infer, PriorityRule, PriorityRules, STAFF_ISSUE_RULES, TECH_ISSUE_RULES};
pub use registry::{
    AssigneeRule, CategoryDefinition, CategoryRegistry, InputSpec, PriorityPolicy,
    ResolvedInputs, SlaPolicy, TemplateContext,
};
