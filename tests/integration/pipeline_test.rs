//! Question loop tests against scripted collaborators.

use std::sync::Arc;

use olist_ask::db::{ColumnInfo, MockDatabaseConnector, QueryResult, Value};
use olist_ask::llm::{MockLlmClient, QueryGenerator};
use olist_ask::pipeline::Pipeline;
use olist_ask::query::QueryExecutor;
use olist_ask::questions::DEFAULT_QUESTIONS;
use olist_ask::report::{ConsoleReporter, DELIMITER};

const SP_QUESTION: &str =
    "How many unique customers have placed orders in the state of Sao Paulo? [integer: count]";
const SP_QUERY: &str =
    "SELECT COUNT(DISTINCT customer_id) FROM customers WHERE customer_state = 'SP';";

fn build(llm: &MockLlmClient, db: &MockDatabaseConnector) -> Pipeline {
    Pipeline::new(
        QueryGenerator::new(Arc::new(llm.clone())),
        QueryExecutor::new(Arc::new(db.clone())),
    )
}

fn reporter() -> ConsoleReporter<Vec<u8>, Vec<u8>> {
    ConsoleReporter::new(Vec::new(), Vec::new())
}

fn output(reporter: ConsoleReporter<Vec<u8>, Vec<u8>>) -> (String, String) {
    let (out, err) = reporter.into_inner();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[tokio::test]
async fn test_count_question_prints_question_query_and_rows() {
    let llm = MockLlmClient::new().with_response("Sao Paulo", SP_QUERY);
    let db = MockDatabaseConnector::new().with_rows(
        "customer_state = 'SP'",
        QueryResult::with_data(
            vec![ColumnInfo::new("COUNT(DISTINCT customer_id)", "INTEGER")],
            vec![vec![Value::Int(42)]],
        ),
    );
    let pipeline = build(&llm, &db);
    let mut reporter = reporter();

    let summary = pipeline.run(&[SP_QUESTION], &mut reporter).await.unwrap();
    assert_eq!(summary.succeeded, 1);

    let (out, err) = output(reporter);
    assert_eq!(
        out,
        format!(
            "Question: {SP_QUESTION}\n\
             SQL Query: {SP_QUERY}\n\
             Query executed successfully: [{{\"COUNT(DISTINCT customer_id)\":42}}]\n\
             {DELIMITER}\n"
        )
    );
    assert!(err.is_empty());
    assert_eq!(db.executed(), vec![SP_QUERY]);
}

#[tokio::test]
async fn test_missing_table_is_reported_and_run_continues() {
    let llm = MockLlmClient::new()
        .with_response("seller", "SELECT seller_id FROM ordersx;")
        .with_response("Sao Paulo", SP_QUERY);
    let db = MockDatabaseConnector::new().with_error("ordersx", "no such table: ordersx");
    let pipeline = build(&llm, &db);
    let mut reporter = reporter();

    let summary = pipeline
        .run(
            &["Which seller sold the most? [string: seller_id]", SP_QUESTION],
            &mut reporter,
        )
        .await
        .unwrap();

    assert_eq!(summary.asked, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(db.opens(), 2);
    assert_eq!(db.closes(), 2);

    let (out, err) = output(reporter);
    assert_eq!(err, "Error executing query: no such table: ordersx\n");
    assert!(out.contains(&format!("Question: {SP_QUESTION}")));
    assert_eq!(out.matches(DELIMITER).count(), 2);
}

#[tokio::test]
async fn test_default_questions_each_asked_once() {
    let llm = MockLlmClient::new();
    let db = MockDatabaseConnector::new();
    let pipeline = build(&llm, &db);
    let mut reporter = reporter();

    let summary = pipeline
        .run(DEFAULT_QUESTIONS, &mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.asked, DEFAULT_QUESTIONS.len());
    assert_eq!(llm.calls(), DEFAULT_QUESTIONS.len());
    assert_eq!(db.opens(), DEFAULT_QUESTIONS.len());

    let (out, _) = output(reporter);
    let asked: Vec<&str> = out
        .lines()
        .filter_map(|line| line.strip_prefix("Question: "))
        .collect();
    assert_eq!(asked, DEFAULT_QUESTIONS);
}

#[tokio::test]
async fn test_model_failure_stops_before_reporting() {
    let llm = MockLlmClient::new().with_failure("Sao Paulo", "connection refused");
    let db = MockDatabaseConnector::new();
    let pipeline = build(&llm, &db);
    let mut reporter = reporter();

    let err = pipeline
        .run(&[SP_QUESTION, "never asked"], &mut reporter)
        .await
        .unwrap_err();

    assert_eq!(err.category(), "LLM Error");
    assert_eq!(llm.calls(), 1);
    assert_eq!(db.opens(), 0);

    let (out, err) = output(reporter);
    assert!(out.is_empty());
    assert!(err.is_empty());
}
