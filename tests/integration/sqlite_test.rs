//! End-to-end runs against a small SQLite file shaped like the Olist tables.

use std::path::PathBuf;
use std::sync::Arc;

use olist_ask::db::SqliteConnector;
use olist_ask::llm::{MockLlmClient, QueryGenerator};
use olist_ask::pipeline::Pipeline;
use olist_ask::query::QueryExecutor;
use olist_ask::report::ConsoleReporter;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

async fn seed() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("olist.sqlite");

    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();

    for statement in [
        "CREATE TABLE customers (customer_id TEXT, customer_city TEXT, customer_state TEXT)",
        "CREATE TABLE orders (order_id TEXT, customer_id TEXT, order_status TEXT)",
        "INSERT INTO customers VALUES \
         ('c1', 'sao paulo', 'SP'), ('c2', 'campinas', 'SP'), ('c3', 'rio de janeiro', 'RJ')",
        "INSERT INTO orders VALUES \
         ('o1', 'c1', 'delivered'), ('o2', 'c1', 'delivered'), ('o3', 'c3', 'shipped')",
    ] {
        sqlx::query(statement).execute(&mut conn).await.unwrap();
    }
    conn.close().await.unwrap();

    (dir, path)
}

fn pipeline(llm: MockLlmClient, path: &PathBuf) -> Pipeline {
    Pipeline::new(
        QueryGenerator::new(Arc::new(llm)),
        QueryExecutor::new(Arc::new(SqliteConnector::new(path))),
    )
}

#[tokio::test]
async fn test_questions_against_sqlite_file() {
    let (_dir, path) = seed().await;
    let llm = MockLlmClient::new()
        .with_response(
            "Sao Paulo",
            "SELECT COUNT(DISTINCT customer_id) FROM customers WHERE customer_state = 'SP';",
        )
        .with_response("typo", "SELECT * FROM ordersx;")
        .with_response(
            "status",
            "SELECT order_status, COUNT(*) AS n FROM orders GROUP BY order_status ORDER BY n DESC;",
        );
    let pipeline = pipeline(llm, &path);
    let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());

    let summary = pipeline
        .run(
            &[
                "How many customers in Sao Paulo?",
                "A typo question",
                "Orders by status?",
            ],
            &mut reporter,
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);

    let (out, err) = reporter.into_inner();
    let out = String::from_utf8(out).unwrap();
    let err = String::from_utf8(err).unwrap();
    let count = r#"Query executed successfully: [{"COUNT(DISTINCT customer_id)":2}]"#;
    let by_status = "Query executed successfully: \
                     [{\"order_status\":\"delivered\",\"n\":2},{\"order_status\":\"shipped\",\"n\":1}]";
    assert!(out.contains(count));
    assert!(out.contains(by_status));
    assert_eq!(err, "Error executing query: no such table: ordersx\n");
}

#[tokio::test]
async fn test_write_is_refused_and_data_untouched() {
    let (_dir, path) = seed().await;
    let llm = MockLlmClient::new()
        .with_response("delete", "DELETE FROM orders;")
        .with_response("count", "SELECT COUNT(*) AS n FROM orders;");
    let pipeline = pipeline(llm, &path);
    let mut reporter = ConsoleReporter::new(Vec::new(), Vec::new());

    pipeline
        .run(&["Please delete the orders", "Now count them"], &mut reporter)
        .await
        .unwrap();

    let (out, err) = reporter.into_inner();
    assert!(String::from_utf8(err)
        .unwrap()
        .starts_with("Error executing query: refusing to run DELETE statement"));
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("Query executed successfully: [{\"n\":3}]"));
}
