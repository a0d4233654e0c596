//! Prompt construction for LLM requests.
//!
//! The schema is static: the Olist tables are described once, as an
//! entity-relationship diagram, and embedded in every system message.

use crate::llm::types::Message;

/// Entity-relationship description of the Olist database.
pub const SCHEMA_DESCRIPTION: &str = r#"erDiagram
    orders ||--o{ order_items : contains
    orders ||--o{ order_payments : has
    orders ||--o{ order_reviews : has
    orders }|--|| customers : placed_by
    order_items }|--|| products : includes
    order_items }|--|| sellers : sold_by
    sellers }|--|| geolocation : located_in
    customers }|--|| geolocation : located_in

    orders {
        string order_id
        string customer_id
        string order_status
        datetime order_purchase_timestamp
        datetime order_approved_at
        datetime order_delivered_carrier_date
        datetime order_delivered_customer_date
        datetime order_estimated_delivery_date
    }

    order_items {
        string order_id
        int order_item_id
        string product_id
        string seller_id
        datetime shipping_limit_date
        float price
        float freight_value
    }

    order_payments {
        string order_id
        int payment_sequential
        string payment_type
        int payment_installments
        float payment_value
    }

    order_reviews {
        string review_id
        string order_id
        int review_score
        string review_comment_title
        string review_comment_message
        datetime review_creation_date
        datetime review_answer_timestamp
    }

    customers {
        string customer_id
        string customer_unique_id
        string customer_zip_code_prefix
        string customer_city
        string customer_state
    }

    sellers {
        string seller_id
        string seller_zip_code_prefix
        string seller_city
        string seller_state
    }

    products {
        string product_id
        string product_category_name
        int product_name_length
        int product_description_length
        int product_photos_qty
        float product_weight_g
        float product_length_cm
        float product_height_cm
        float product_width_cm
    }

    geolocation {
        string geolocation_zip_code_prefix
        float geolocation_lat
        float geolocation_lng
        string geolocation_city
        string geolocation_state
    }"#;

/// System prompt template for the SQL generator.
const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are an expert in SQLite databases and data analysis.
You are given a database schema and a question about the data.

Provide a correct SQLite query that answers the question.
Return ONLY the SQL query, on a single line, with no newlines.
Do not provide any explanation or any other text.
Note the relationships between tables and the data type of each column.

DATABASE SCHEMA:
{schema}"#;

/// Builds the system prompt with the schema description injected.
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT_TEMPLATE.replace("{schema}", SCHEMA_DESCRIPTION)
}

/// Builds the message list for one question.
///
/// Always `[system, user]`; the question is passed through untouched.
pub fn build_messages(question: &str) -> Vec<Message> {
    vec![
        Message::system(build_system_prompt()),
        Message::user(question),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Role;

    #[test]
    fn test_build_messages_system_then_user() {
        let question = "How many unique customers have placed orders in the state of Sao Paulo? [integer: count]";
        let messages = build_messages(question);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, question);
    }

    #[test]
    fn test_question_is_not_escaped_or_trimmed() {
        let question = "  What's the 'beleza_saude' score?\n\"quoted\" {schema}  ";
        let messages = build_messages(question);

        assert_eq!(messages[1].content, question);
    }

    #[test]
    fn test_empty_question_still_yields_two_messages() {
        let messages = build_messages("");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "");
    }

    #[test]
    fn test_system_prompt_contains_every_table() {
        let prompt = build_system_prompt();

        for table in [
            "orders {",
            "order_items {",
            "order_payments {",
            "order_reviews {",
            "customers {",
            "sellers {",
            "products {",
            "geolocation {",
        ] {
            assert!(prompt.contains(table), "missing {table}");
        }
        assert!(prompt.contains("customer_state"));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_system_prompt_is_stable() {
        assert_eq!(build_messages("a")[0], build_messages("b")[0]);
    }
}
