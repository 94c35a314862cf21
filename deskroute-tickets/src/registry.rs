//! Category Registry
//!
//! Static table of the ten business categories and the rules each one
//! applies when a ticket is built: required inputs, priority, assignee, SLA,
//! administrator actions and the confirmation message shown to the requester.
//! The table is immutable after construction.

use crate::priority::{PriorityRules, STAFF_ISSUE_RULES, TECH_ISSUE_RULES};
use deskroute_core::{Category, DeskError, DeskResult, Priority, MISSING_INPUT_PLACEHOLDER};
use std::collections::BTreeMap;

// ============================================================================
// RULE TYPES
// ============================================================================

/// A named input the handler needs before it can act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub name: &'static str,
    /// Shown to the generation backend in the tool declaration.
    pub description: &'static str,
}

/// How a category decides ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityPolicy {
    Fixed(Priority),
    /// Scan the salient input with an ordered keyword table.
    Derived(&'static PriorityRules),
}

/// Who handles the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeRule {
    Fixed(&'static str),
    /// Pick by the value of `input`: `upsell` when it equals `upsell_marker`,
    /// `renewal` otherwise.
    ByRequestType {
        input: &'static str,
        upsell_marker: &'static str,
        upsell: &'static str,
        renewal: &'static str,
    },
}

/// Promised turnaround.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaPolicy {
    Fixed(&'static str),
    ByPriority {
        high: &'static str,
        otherwise: &'static str,
    },
}

impl PriorityPolicy {
    pub fn resolve(&self, salient_text: &str) -> Priority {
        match self {
            PriorityPolicy::Fixed(priority) => *priority,
            PriorityPolicy::Derived(rules) => crate::priority::infer(rules, salient_text),
        }
    }
}

impl AssigneeRule {
    pub fn resolve(&self, inputs: &ResolvedInputs) -> &'static str {
        match *self {
            AssigneeRule::Fixed(role) => role,
            AssigneeRule::ByRequestType {
                input,
                upsell_marker,
                upsell,
                renewal,
            } => {
                if inputs.get(input).trim().to_lowercase() == upsell_marker {
                    upsell
                } else {
                    renewal
                }
            }
        }
    }
}

impl SlaPolicy {
    pub fn resolve(&self, priority: Priority) -> &'static str {
        match *self {
            SlaPolicy::Fixed(sla) => sla,
            SlaPolicy::ByPriority { high, otherwise } => {
                if priority == Priority::High {
                    high
                } else {
                    otherwise
                }
            }
        }
    }
}

/// Required inputs after placeholder substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedInputs {
    values: BTreeMap<String, String>,
}

impl ResolvedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value of an input, or the placeholder when it was never collected.
    pub fn get(&self, name: &str) -> &str {
        self.values
            .get(name)
            .map(String::as_str)
            .unwrap_or(MISSING_INPUT_PLACEHOLDER)
    }
}

/// Everything a confirmation message may reference.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub inputs: &'a ResolvedInputs,
    pub ticket_id: &'a str,
    pub sla: &'a str,
    pub assignee: &'a str,
    pub priority: Priority,
}

impl TemplateContext<'_> {
    pub fn input(&self, name: &str) -> &str {
        self.inputs.get(name)
    }
}

/// Business rules for one category.
#[derive(Clone, Copy)]
pub struct CategoryDefinition {
    pub category: Category,
    /// Human title shown to administrators.
    pub label: &'static str,
    pub required_inputs: &'static [InputSpec],
    /// Hashed into the ticket number and scanned for derived priority.
    pub salient_input: &'static str,
    pub priority: PriorityPolicy,
    pub assignee: AssigneeRule,
    pub sla: SlaPolicy,
    /// Administrator checklist. `{assignee}` is interpolated.
    pub actions: &'static [&'static str],
    /// Category-specific ticket fields as `(field, input)` pairs.
    pub ticket_fields: &'static [(&'static str, &'static str)],
    pub describe: fn(&ResolvedInputs) -> String,
    pub message_template: fn(&TemplateContext<'_>) -> String,
    pub tool_description: &'static str,
}

impl std::fmt::Debug for CategoryDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryDefinition")
            .field("category", &self.category)
            .field("label", &self.label)
            .field("required_inputs", &self.required_inputs)
            .field("salient_input", &self.salient_input)
            .field("priority", &self.priority)
            .field("assignee", &self.assignee)
            .field("sla", &self.sla)
            .finish_non_exhaustive()
    }
}

impl CategoryDefinition {
    pub fn prefix(&self) -> &'static str {
        self.category.prefix()
    }

    pub fn requires(&self, input: &str) -> bool {
        self.required_inputs.iter().any(|spec| spec.name == input)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Read-only lookup over a table of category definitions.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRegistry {
    definitions: &'static [CategoryDefinition],
}

impl CategoryRegistry {
    /// The ten standard categories.
    pub fn standard() -> Self {
        Self {
            definitions: &STANDARD_DEFINITIONS,
        }
    }

    /// A registry over a custom table.
    pub fn from_definitions(definitions: &'static [CategoryDefinition]) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &'static [CategoryDefinition] {
        self.definitions
    }

    /// Definition for a category, if this registry carries it.
    pub fn get(&self, category: Category) -> Option<&'static CategoryDefinition> {
        self.definitions.iter().find(|def| def.category == category)
    }

    /// Definition for a category, failing loudly when it is not registered.
    pub fn definition(&self, category: Category) -> DeskResult<&'static CategoryDefinition> {
        self.get(category)
            .ok_or_else(|| DeskError::unknown_category(category.as_str()))
    }

    /// Look up by tag. Accepts `group-change` and `group_change`.
    pub fn lookup(&self, name: &str) -> DeskResult<&'static CategoryDefinition> {
        let category = Category::from_tag(name).map_err(|_| DeskError::unknown_category(name))?;
        self.get(category)
            .ok_or_else(|| DeskError::unknown_category(name))
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// STANDARD TABLE
// ============================================================================

const REFUND_ASSIGNEE: &str = "Операционный и Сервисный Директор";
const ADMINISTRATOR: &str = "Администратор";

static STANDARD_DEFINITIONS: [CategoryDefinition; 10] = [
    // Refund
    CategoryDefinition {
        category: Category::Refund,
        label: "Возврат средств",
        required_inputs: &[InputSpec {
            name: "reason",
            description: "Подробная причина возврата с деталями ситуации",
        }],
        salient_input: "reason",
        priority: PriorityPolicy::Fixed(Priority::High),
        assignee: AssigneeRule::Fixed(REFUND_ASSIGNEE),
        sla: SlaPolicy::Fixed("24 часа"),
        actions: &[
            "Изучить причину возврата",
            "Связаться с клиентом и заверить, что проблема будет решена",
            "Принять решение по возврату",
        ],
        ticket_fields: &[("reason", "reason")],
        describe: |inputs| format!("Запрос на возврат средств. Причина: {}", inputs.get("reason")),
        message_template: |ctx| {
            format!(
                "✅ Спасибо за информацию. Мы обязательно рассмотрим Ваш запрос.\n\n\
                 Тикет #{} передан операционному и сервисному директору.\n\
                 Ваш запрос будет обработан в течение 24 часов.\n\n\
                 Вы можете отслеживать статус в разделе 'Мои Заявки'.",
                ctx.ticket_id
            )
        },
        tool_description: "Возврат средств. Вызывай только после того, как узнал подробную \
                           причину возврата, заверил клиента, что проблему обязательно решим, \
                           и собрал все детали ситуации.",
    },
    // Freeze
    CategoryDefinition {
        category: Category::Freeze,
        label: "Заморозка обучения",
        required_inputs: &[
            InputSpec {
                name: "duration_start",
                description: "Дата начала заморозки (YYYY-MM-DD)",
            },
            InputSpec {
                name: "duration_end",
                description: "Дата конца заморозки (YYYY-MM-DD), от 1 до 2 месяцев после начала",
            },
            InputSpec {
                name: "reason",
                description: "Причина заморозки",
            },
        ],
        salient_input: "duration_start",
        priority: PriorityPolicy::Fixed(Priority::Medium),
        assignee: AssigneeRule::Fixed(ADMINISTRATOR),
        sla: SlaPolicy::Fixed("24 часа"),
        actions: &[
            "Оповестить учителей и кураторов",
            "Изменить статус на ЗАМОРОЗИТ в АльфаСРМ",
            "Обновить фикс. таблицу",
        ],
        ticket_fields: &[("freeze_start", "duration_start"), ("freeze_end", "duration_end")],
        describe: |inputs| {
            format!(
                "Запрос на заморозку обучения с {} по {}. Причина: {}",
                inputs.get("duration_start"),
                inputs.get("duration_end"),
                inputs.get("reason")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Запрос на заморозку обучения с {} по {} зарегистрирован.\n\n\
                 Тикет #{} создан.\n\n\
                 Администратор выполнит необходимые действия:\n\
                 • Уведомит учителей и кураторов\n\
                 • Изменит статус в системе на 'ЗАМОРОЗИТ'\n\
                 • Обновит все необходимые таблицы\n\n\
                 Вы получите уведомление об активации заморозки.",
                ctx.input("duration_start"),
                ctx.input("duration_end"),
                ctx.ticket_id
            )
        },
        tool_description: "Заморозка обучения на срок от 1 до 2 месяцев. Вызывай только после \
                           того, как уточнил точные даты начала и конца заморозки и узнал причину.",
    },
    // Unfreeze
    CategoryDefinition {
        category: Category::Unfreeze,
        label: "Разморозка обучения",
        required_inputs: &[InputSpec {
            name: "preferred_date",
            description: "Желаемая дата продолжения обучения (YYYY-MM-DD)",
        }],
        salient_input: "preferred_date",
        priority: PriorityPolicy::Fixed(Priority::Medium),
        assignee: AssigneeRule::Fixed(ADMINISTRATOR),
        sla: SlaPolicy::Fixed("24 часа"),
        actions: &[
            "Проверить свободные группы для уровня студента",
            "Проверить остаток уроков в Альфа СРМ",
            "Уведомить куратора и учителя",
            "Изменить статус на Активный",
            "Добавить в группу в CRM",
            "Обновить фикс. таблицу",
        ],
        ticket_fields: &[("unfreeze_date", "preferred_date")],
        describe: |inputs| {
            format!(
                "Запрос на разморозку обучения с {}",
                inputs.get("preferred_date")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Запрос на разморозку и продолжение обучения с {} зарегистрирован.\n\n\
                 Тикет #{} создан.\n\n\
                 Администратор:\n\
                 • Проверит наличие свободных групп для Вашего уровня\n\
                 • Подтвердит количество оставшихся уроков\n\
                 • Свяжется с Вами с вариантами групп\n\n\
                 ⚠️ Обратите внимание: Вы продолжите обучение с количеством уроков, \
                 согласно данным в CRM.",
                ctx.input("preferred_date"),
                ctx.ticket_id
            )
        },
        tool_description: "Разморозка и продолжение обучения. Вызывай только после того, как \
                           уточнил желаемую дату продолжения и предупредил о проверке свободных групп.",
    },
    // Bonus
    CategoryDefinition {
        category: Category::Bonus,
        label: "Использование бонусов",
        required_inputs: &[
            InputSpec {
                name: "bonus_type",
                description: "Тип бонуса: консультация, доступ к платформе или другое",
            },
            InputSpec {
                name: "details",
                description: "Детали запроса",
            },
        ],
        salient_input: "bonus_type",
        priority: PriorityPolicy::Fixed(Priority::Low),
        assignee: AssigneeRule::Fixed(ADMINISTRATOR),
        sla: SlaPolicy::Fixed("24 часа"),
        actions: &[
            "Проверить наличие бонуса в ФИХ таблице",
            "Предоставить бонус согласно типу",
            "Обновить статус бонуса",
        ],
        ticket_fields: &[("bonus_type", "bonus_type")],
        describe: |inputs| {
            format!(
                "Запрос на использование бонуса: {}. Детали: {}",
                inputs.get("bonus_type"),
                inputs.get("details")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Заявка на активацию бонуса '{}' зарегистрирована.\n\n\
                 Тикет #{} создан.\n\n\
                 Администратор:\n\
                 • Проверит наличие Вашего бонуса в системе\n\
                 • Активирует бонус согласно типу\n\
                 • Свяжется с Вами для подтверждения\n\n\
                 Ожидайте ответа в течение 24 часов.",
                ctx.input("bonus_type"),
                ctx.ticket_id
            )
        },
        tool_description: "Использование бонусов. Вызывай только после того, как уточнил, какой \
                           именно бонус хочет использовать студент, и собрал детали.",
    },
    // Group change
    CategoryDefinition {
        category: Category::GroupChange,
        label: "Смена группы/учителя",
        required_inputs: &[
            InputSpec {
                name: "reason",
                description: "Причина смены группы или учителя",
            },
            InputSpec {
                name: "preferences",
                description: "Пожелания: время, дни недели и т.д.",
            },
        ],
        salient_input: "reason",
        priority: PriorityPolicy::Fixed(Priority::Medium),
        assignee: AssigneeRule::Fixed("Операционный директор"),
        sla: SlaPolicy::Fixed("48 часов"),
        actions: &[
            "Получить разрешение операционного директора",
            "Предложить свободные группы",
            "Проверить совпадение количества уроков",
            "Обновить CRM и фикс. таблицу",
            "Уведомить учителей и кураторов",
        ],
        ticket_fields: &[("reason", "reason"), ("preferences", "preferences")],
        describe: |inputs| {
            format!(
                "Запрос на смену группы/учителя. Причина: {}. Пожелания: {}",
                inputs.get("reason"),
                inputs.get("preferences")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Заявка на смену группы/учителя зарегистрирована.\n\n\
                 Тикет #{} создан.\n\n\
                 Ваш запрос будет обработан операционным директором.\n\n\
                 Администратор:\n\
                 • Получит необходимое разрешение\n\
                 • Подберет подходящие варианты групп\n\
                 • Свяжется с Вами с предложениями\n\n\
                 Ожидайте ответа в течение 48 часов.",
                ctx.ticket_id
            )
        },
        tool_description: "Смена группы или учителя. Вызывай только после того, как узнал \
                           причину, уточнил желаемое время и дни недели и собрал все пожелания.",
    },
    // Technical issue
    CategoryDefinition {
        category: Category::TechIssue,
        label: "Технические проблемы",
        required_inputs: &[
            InputSpec {
                name: "issue_type",
                description: "Тип проблемы: ссылки, платформа, ХБ, пароли",
            },
            InputSpec {
                name: "description",
                description: "Описание проблемы",
            },
        ],
        salient_input: "description",
        priority: PriorityPolicy::Derived(&TECH_ISSUE_RULES),
        assignee: AssigneeRule::Fixed("Куратор"),
        sla: SlaPolicy::ByPriority {
            high: "4 часа",
            otherwise: "12 часов",
        },
        actions: &[
            "Проверить доступ студента",
            "Предоставить рабочие ссылки",
            "Проверить/предоставить пароли при необходимости",
            "Убедиться, что проблема решена",
        ],
        ticket_fields: &[("issue_type", "issue_type")],
        describe: |inputs| {
            format!(
                "Техническая проблема ({}): {}",
                inputs.get("issue_type"),
                inputs.get("description")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Тикет #{} создан для решения технической проблемы.\n\n\
                 Ваш куратор:\n\
                 • Проверит Ваш доступ к платформе\n\
                 • Предоставит рабочие ссылки\n\
                 • Проверит правильность паролей\n\
                 • Убедится, что всё работает\n\n\
                 Ожидайте ответа в течение {}.",
                ctx.ticket_id, ctx.sla
            )
        },
        tool_description: "Технические проблемы со ссылками, платформой или ХБ. Сначала \
                           предложи базовые решения: скопировать ссылку в адресную строку, \
                           включить VPN или подождать. Вызывай только если это не помогло.",
    },
    // Attendance certificate
    CategoryDefinition {
        category: Category::Certificate,
        label: "Справка о присутствии",
        required_inputs: &[InputSpec {
            name: "purpose",
            description: "Цель получения справки: работа, виза и т.д.",
        }],
        salient_input: "purpose",
        priority: PriorityPolicy::Fixed(Priority::Medium),
        assignee: AssigneeRule::Fixed("Бухгалтер"),
        sla: SlaPolicy::Fixed("3 рабочих дня"),
        actions: &[
            "Отправить студенту шаблон в Word",
            "Получить заполненный шаблон",
            "Передать бухгалтеру для подписания",
            "Отправить подписанную справку студенту",
        ],
        ticket_fields: &[("purpose", "purpose")],
        describe: |inputs| {
            format!(
                "Запрос на справку о присутствии на курсах. Цель: {}",
                inputs.get("purpose")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Запрос на справку о присутствии зарегистрирован.\n\n\
                 Тикет #{} создан.\n\n\
                 Процесс оформления:\n\
                 1. Вы получите шаблон справки в Word формате\n\
                 2. Заполните необходимые данные\n\
                 3. Отправьте заполненный шаблон обратно\n\
                 4. Бухгалтер подпишет справку\n\
                 5. Вы получите готовую справку\n\n\
                 Ожидаемый срок: {}.",
                ctx.ticket_id, ctx.sla
            )
        },
        tool_description: "Справка о присутствии на курсах. Вызывай только после того, как \
                           уточнил цель получения справки и объяснил процесс заполнения шаблона.",
    },
    // Extension or additional purchase
    CategoryDefinition {
        category: Category::Extension,
        label: "Продление/Докупка курсов",
        required_inputs: &[
            InputSpec {
                name: "request_type",
                description: "Тип запроса: продление или допродажа",
            },
            InputSpec {
                name: "details",
                description: "Детали запроса: какой курс, на какой срок и т.д.",
            },
        ],
        salient_input: "details",
        priority: PriorityPolicy::Fixed(Priority::Medium),
        assignee: AssigneeRule::ByRequestType {
            input: "request_type",
            upsell_marker: "допродажа",
            upsell: "РОП (Руководитель отдела продаж)",
            renewal: "Бухгалтер",
        },
        sla: SlaPolicy::Fixed("24 часа"),
        actions: &[
            "Отправить данные {assignee} по шаблону",
            "Связаться с клиентом для уточнения деталей",
            "Подтвердить оплату",
            "Обновить данные в CRM",
        ],
        ticket_fields: &[("request_type", "request_type"), ("details", "details")],
        describe: |inputs| {
            format!(
                "Запрос на {} курсов. Детали: {}",
                inputs.get("request_type"),
                inputs.get("details")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Запрос на {} курсов зарегистрирован.\n\n\
                 Тикет #{} создан.\n\n\
                 Ваши данные отправлены: {}.\n\n\
                 С Вами свяжутся для:\n\
                 • Уточнения деталей запроса\n\
                 • Предоставления информации об оплате\n\
                 • Подтверждения изменений\n\n\
                 Ожидайте звонка в течение 24 часов.",
                ctx.input("request_type"),
                ctx.ticket_id,
                ctx.assignee
            )
        },
        tool_description: "Продление или докупка курсов. Вызывай только после того, как уточнил \
                           тип запроса (продление или допродажа) и собрал детали.",
    },
    // Partner program
    CategoryDefinition {
        category: Category::PartnerReferral,
        label: "Партнерская программа",
        required_inputs: &[
            InputSpec {
                name: "invitee_name",
                description: "ФИО приглашенного человека",
            },
            InputSpec {
                name: "invitee_telegram",
                description: "Telegram приглашенного",
            },
            InputSpec {
                name: "invitee_phone",
                description: "Номер телефона приглашенного",
            },
        ],
        salient_input: "invitee_name",
        priority: PriorityPolicy::Fixed(Priority::Low),
        assignee: AssigneeRule::Fixed(ADMINISTRATOR),
        sla: SlaPolicy::Fixed("48 часов"),
        actions: &[
            "Связаться с приглашенным",
            "Подтвердить источник (от кого пришел)",
            "Проверить статус в Альфа СРМ",
            "Начислить бонус партнеру при подтверждении",
        ],
        ticket_fields: &[
            ("invitee_name", "invitee_name"),
            ("invitee_telegram", "invitee_telegram"),
            ("invitee_phone", "invitee_phone"),
        ],
        describe: |inputs| {
            format!(
                "Запрос по партнерской программе. Приглашенный: {}",
                inputs.get("invitee_name")
            )
        },
        message_template: |ctx| {
            format!(
                "✅ Запрос по партнерской программе зарегистрирован.\n\n\
                 Тикет #{} создан.\n\n\
                 Данные приглашенного:\n\
                 • ФИО: {}\n\
                 • Telegram: {}\n\
                 • Телефон: {}\n\n\
                 Администратор:\n\
                 • Свяжется с приглашенным для подтверждения\n\
                 • Проверит данные в CRM\n\
                 • Начислит Вам бонус при успешном подтверждении\n\n\
                 Результат проверки будет отправлен в течение 48 часов.",
                ctx.ticket_id,
                ctx.input("invitee_name"),
                ctx.input("invitee_telegram"),
                ctx.input("invitee_phone")
            )
        },
        tool_description: "Партнерская программа. Вызывай только после того, как собрал ФИО, \
                           Telegram и номер телефона приглашенного.",
    },
    // Staff issue
    CategoryDefinition {
        category: Category::StaffIssue,
        label: "Проблемы сотрудников",
        required_inputs: &[InputSpec {
            name: "issue_description",
            description: "Подробное описание проблемы",
        }],
        salient_input: "issue_description",
        priority: PriorityPolicy::Derived(&STAFF_ISSUE_RULES),
        assignee: AssigneeRule::Fixed("Администратор/Руководитель"),
        sla: SlaPolicy::ByPriority {
            high: "4 часа",
            otherwise: "24 часа",
        },
        actions: &[
            "Изучить суть проблемы",
            "Определить ответственного",
            "Решить проблему",
            "Подтвердить решение",
        ],
        ticket_fields: &[],
        describe: |inputs| format!("Проблема сотрудника: {}", inputs.get("issue_description")),
        message_template: |ctx| {
            format!(
                "✅ Тикет #{} создан для решения Вашей проблемы.\n\n\
                 Приоритет: {}\n\n\
                 Ваша проблема будет рассмотрена администратором.\n\
                 Ожидайте ответа в течение {}.\n\n\
                 Вы можете отслеживать статус в системе.",
                ctx.ticket_id,
                ctx.priority.as_str().to_uppercase(),
                ctx.sla
            )
        },
        tool_description: "Проблемы сотрудников. Вызывай только после того, как узнал суть \
                           проблемы детально и собрал всю необходимую информацию.",
    },
];

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_all_categories_in_order() {
        let registry = CategoryRegistry::standard();
        let categories: Vec<Category> = registry.definitions().iter().map(|d| d.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[test]
    fn test_salient_input_is_required() {
        for def in CategoryRegistry::standard().definitions() {
            assert!(!def.required_inputs.is_empty(), "{} has no inputs", def.category);
            assert!(
                def.requires(def.salient_input),
                "{} salient input {} is not required",
                def.category,
                def.salient_input
            );
        }
    }

    #[test]
    fn test_ticket_fields_reference_required_inputs() {
        for def in CategoryRegistry::standard().definitions() {
            for (_, input) in def.ticket_fields {
                assert!(def.requires(input), "{} maps unknown input {}", def.category, input);
            }
        }
    }

    #[test]
    fn test_lookup_accepts_both_spellings() {
        let registry = CategoryRegistry::standard();
        assert_eq!(
            registry.lookup("group-change").unwrap().category,
            Category::GroupChange
        );
        assert_eq!(
            registry.lookup("group_change").unwrap().category,
            Category::GroupChange
        );
    }

    #[test]
    fn test_lookup_unknown_fails() {
        let err = CategoryRegistry::standard().lookup("teleport").unwrap_err();
        assert!(matches!(err, DeskError::UnknownCategory { ref name } if name == "teleport"));
    }

    #[test]
    fn test_partial_registry_rejects_missing_category() {
        let refund = *CategoryRegistry::standard().get(Category::Refund).unwrap();
        let only_refund: &'static [CategoryDefinition] = Box::leak(vec![refund].into_boxed_slice());
        let registry = CategoryRegistry::from_definitions(only_refund);
        assert!(registry.lookup("refund").is_ok());
        assert!(matches!(
            registry.definition(Category::Bonus),
            Err(DeskError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_extension_assignee_by_request_type() {
        let def = CategoryRegistry::standard().get(Category::Extension).unwrap();
        let mut inputs = ResolvedInputs::new();
        inputs.insert("request_type", "допродажа");
        assert_eq!(def.assignee.resolve(&inputs), "РОП (Руководитель отдела продаж)");

        inputs.insert("request_type", "продление");
        assert_eq!(def.assignee.resolve(&inputs), "Бухгалтер");
    }

    #[test]
    fn test_sla_by_priority() {
        let def = CategoryRegistry::standard().get(Category::TechIssue).unwrap();
        assert_eq!(def.sla.resolve(Priority::High), "4 часа");
        assert_eq!(def.sla.resolve(Priority::Medium), "12 часов");

        let staff = CategoryRegistry::standard().get(Category::StaffIssue).unwrap();
        assert_eq!(staff.sla.resolve(Priority::Low), "24 часа");
    }

    #[test]
    fn test_resolved_inputs_default_to_placeholder() {
        let inputs = ResolvedInputs::new();
        assert_eq!(inputs.get("reason"), MISSING_INPUT_PLACEHOLDER);
    }
}
