//! System instructions for the generation backend

use deskroute_tickets::CategoryRegistry;

const PREAMBLE: &str = "\
Ты AI-ассистент службы поддержки для студентов и сотрудников.
Твоя задача: эффективно обрабатывать запросы, следуя точным бизнес-процессам.";

const CATEGORY_GUIDANCE: &str = "\
📋 СЦЕНАРИИ:
- refund: спроси подробную причину возврата, заверь, что запрос обязательно рассмотрим.
- freeze: уточни срок заморозки (от 1 до 2 месяцев), даты начала и конца и причину.
- unfreeze: спроси, с какой даты студент готов продолжить; предупреди о проверке свободных групп.
- bonus: спроси, какой бонус использовать (консультация или платформа).
- group-change: узнай причину смены, желаемое время и дни; потребуется одобрение операционного директора.
- tech-issue: СНАЧАЛА предложи решения (скопировать ссылку в адресную строку, включить VPN или подождать 5 минут, обновить страницу). Тикет создавай, только если не помогло.
- certificate: спроси цель справки; сообщи, что пришлем шаблон Word для заполнения.
- extension: уточни, продление это или допродажа, какой курс и на какой срок.
- partner-referral: собери ФИО, Telegram и телефон приглашенного.
- staff-issue: узнай суть проблемы сотрудника детально.";

const RULES: &str = "\
⚠️ ОБЩИЕ ПРАВИЛА:
1. Собирай только самую необходимую информацию. Задавай максимум 1-2 уточняющих вопроса.
   Если данных достаточно, СРАЗУ вызывай инструмент. Не переспрашивай то, что уже сказано.
2. Общие вопросы, благодарности, приветствия и вопросы о процессах: отвечай напрямую, без тикета.
3. После вызова инструмента верни его результат (JSON) без изменений, чтобы пользователь увидел номер тикета.
4. Отвечай на русском языке, дружелюбно и кратко. Сообщай сроки и кто будет обрабатывать запрос.";

/// Build the system instructions for one exchange.
pub fn system_instructions(registry: &CategoryRegistry, requester_id: &str) -> String {
    let categories = registry
        .definitions()
        .iter()
        .enumerate()
        .map(|(i, def)| format!("{}. {} ({})", i + 1, def.label, def.category))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nКАТЕГОРИИ ЗАПРОСОВ:\n{}\n\n{}\n\n{}\n\nID пользователя: {}",
        PREAMBLE, categories, CATEGORY_GUIDANCE, RULES, requester_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_name_every_category_and_requester() {
        let registry = CategoryRegistry::standard();
        let text = system_instructions(&registry, "ST-77");

        for def in registry.definitions() {
            assert!(text.contains(def.label), "missing {}", def.label);
            assert!(text.contains(def.category.as_str()));
        }
        assert!(text.ends_with("ID пользователя: ST-77"));
    }
}
