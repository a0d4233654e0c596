//! Built-in analytics questions.
//!
//! Each question ends with a bracketed hint naming the expected answer type
//! and field. The hint is part of the text sent to the model and is not
//! interpreted anywhere else.

/// Questions asked when neither the command line nor the config file
/// provides any.
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "Which seller has delivered the most orders to customers in Rio de Janeiro? [string: seller_id]",
    "What's the average review score for products in the 'beleza_saude' category? [float: score]",
    "How many sellers have completed orders worth more than 100,000 BRL in total? [integer: count]",
    "Which product category has the highest rate of 5 - star reviews ? [string: category_name]",
    "What's the most common payment installment count for orders over 1000 BRL? [integer: installments]",
    "Which city has the highest average freight value per order? [string: city_name]",
    "What's the most expensive product category based on average price? [string: category_name]",
    "Which product category has the shortest average delivery time? [string: category_name]",
    "How many unique customers have placed orders in the state of Sao Paulo? [integer: count]",
    "What percentage of orders are delivered before the estimated delivery date ? [float: percentage]",
];

/// Returns the built-in questions as owned strings.
pub fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}
