//! End-to-end tests of every operation through the router, against an
//! on-disk SQLite database.

use serde_json::{Value as JsonValue, json};
use sqlite_mcp_server::db::SqliteHandler;
use sqlite_mcp_server::tools::{JsonObject, OperationRouter, ToolResponse};
use std::sync::Arc;
use tempfile::TempDir;

struct TestDb {
    router: OperationRouter,
    // Dropping the directory removes the database file.
    _dir: TempDir,
}

async fn setup_test_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let handler = SqliteHandler::open(dir.path().join("test.db")).await;
    assert!(handler.is_connected());

    let router = OperationRouter::new(Arc::new(handler));
    let created = call(
        &router,
        "query",
        json!({"sql": "CREATE TABLE t (id INTEGER PRIMARY KEY, a INTEGER, b TEXT)"}),
    )
    .await;
    assert!(!created.is_error, "{:?}", created);

    TestDb { router, _dir: dir }
}

async fn call(router: &OperationRouter, name: &str, args: JsonValue) -> ToolResponse {
    let arguments: Option<JsonObject> = args.as_object().cloned();
    router.call(name, arguments).await
}

/// Parse the JSON payload of a success envelope.
fn payload(response: &ToolResponse) -> JsonValue {
    assert!(!response.is_error, "unexpected failure: {:?}", response);
    serde_json::from_str(response.first_text().unwrap()).unwrap()
}

async fn seed(router: &OperationRouter, rows: &[(i64, &str)]) {
    for (a, b) in rows {
        let response = call(
            router,
            "create_record",
            json!({"table": "t", "data": {"a": a, "b": b}}),
        )
        .await;
        payload(&response);
    }
}

#[tokio::test]
async fn test_create_then_read_by_inserted_id() {
    let db = setup_test_db().await;

    let created = payload(
        &call(
            &db.router,
            "create_record",
            json!({"table": "t", "data": {"a": 1, "b": "x"}}),
        )
        .await,
    );
    assert_eq!(created["message"], "Record created successfully");
    let inserted_id = created["insertedId"].as_i64().unwrap();
    assert!(inserted_id > 0);

    let rows = payload(
        &call(
            &db.router,
            "read_records",
            json!({"table": "t", "conditions": {"id": inserted_id}}),
        )
        .await,
    );
    assert_eq!(rows, json!([{"id": inserted_id, "a": 1, "b": "x"}]));
}

#[tokio::test]
async fn test_read_with_limit_and_offset() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one"), (2, "two"), (3, "three"), (4, "four")]).await;

    let rows = payload(
        &call(
            &db.router,
            "read_records",
            json!({"table": "t", "limit": 2, "offset": 1}),
        )
        .await,
    );
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["b"], "two");
    assert_eq!(rows[1]["b"], "three");
}

#[tokio::test]
async fn test_offset_without_limit_returns_all_rows() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one"), (2, "two"), (3, "three")]).await;

    let rows = payload(
        &call(&db.router, "read_records", json!({"table": "t", "offset": 2})).await,
    );
    assert_eq!(rows.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_reports_rows_affected() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one")]).await;

    let updated = payload(
        &call(
            &db.router,
            "update_records",
            json!({"table": "t", "data": {"a": 5}, "conditions": {"id": 1}}),
        )
        .await,
    );
    assert_eq!(
        updated,
        json!({"message": "Records updated successfully", "rowsAffected": 1})
    );

    let rows = payload(
        &call(
            &db.router,
            "read_records",
            json!({"table": "t", "conditions": {"id": 1}}),
        )
        .await,
    );
    assert_eq!(rows[0]["a"], 5);

    let none = payload(
        &call(
            &db.router,
            "update_records",
            json!({"table": "t", "data": {"a": 6}, "conditions": {"id": 999}}),
        )
        .await,
    );
    assert_eq!(none["rowsAffected"], 0);
}

#[tokio::test]
async fn test_delete_without_match_is_success() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one")]).await;

    let deleted = payload(
        &call(
            &db.router,
            "delete_records",
            json!({"table": "t", "conditions": {"id": 999}}),
        )
        .await,
    );
    assert_eq!(
        deleted,
        json!({"message": "Records deleted successfully", "rowsAffected": 0})
    );

    let deleted = payload(
        &call(
            &db.router,
            "delete_records",
            json!({"table": "t", "conditions": {"id": 1}}),
        )
        .await,
    );
    assert_eq!(deleted["rowsAffected"], 1);
}

#[tokio::test]
async fn test_multiple_conditions_are_combined_with_and() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "x"), (1, "y"), (2, "x")]).await;

    let rows = payload(
        &call(
            &db.router,
            "read_records",
            json!({"table": "t", "conditions": {"a": 1, "b": "x"}}),
        )
        .await,
    );
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_conditions_never_touch_every_row() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one"), (2, "two")]).await;

    let response = call(
        &db.router,
        "delete_records",
        json!({"table": "t", "conditions": {}}),
    )
    .await;
    assert!(response.is_error);
    assert!(
        response
            .first_text()
            .unwrap()
            .starts_with("Error deleting records: ")
    );

    let response = call(
        &db.router,
        "update_records",
        json!({"table": "t", "data": {"a": 0}, "conditions": {}}),
    )
    .await;
    assert!(response.is_error);

    let rows = payload(&call(&db.router, "read_records", json!({"table": "t"})).await);
    assert_eq!(rows, json!([{"id": 1, "a": 1, "b": "one"}, {"id": 2, "a": 2, "b": "two"}]));
}

#[tokio::test]
async fn test_list_tables_and_schema() {
    let db = setup_test_db().await;

    let tables = payload(&call(&db.router, "list_tables", json!({})).await);
    assert_eq!(tables, json!([{"name": "t"}]));

    let schema = payload(
        &call(&db.router, "get_table_schema", json!({"tableName": "t"})).await,
    );
    assert_eq!(
        schema,
        json!([
            {"cid": 0, "name": "id", "type": "INTEGER", "notnull": false, "dflt_value": null, "pk": 1},
            {"cid": 1, "name": "a", "type": "INTEGER", "notnull": false, "dflt_value": null, "pk": 0},
            {"cid": 2, "name": "b", "type": "TEXT", "notnull": false, "dflt_value": null, "pk": 0},
        ])
    );

    let missing = payload(
        &call(
            &db.router,
            "get_table_schema",
            json!({"tableName": "nonexistent_table"}),
        )
        .await,
    );
    assert_eq!(missing, json!([]));
}

#[tokio::test]
async fn test_autoincrement_table_hides_sqlite_sequence() {
    let db = setup_test_db().await;
    let response = call(
        &db.router,
        "query",
        json!({"sql": "CREATE TABLE seq (id INTEGER PRIMARY KEY AUTOINCREMENT, v TEXT)"}),
    )
    .await;
    payload(&response);
    call(
        &db.router,
        "create_record",
        json!({"table": "seq", "data": {"v": "a"}}),
    )
    .await;

    let tables = payload(&call(&db.router, "list_tables", json!({})).await);
    let names: Vec<&str> = tables
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"seq"));
    assert!(!names.iter().any(|n| n.starts_with("sqlite_")));
}

#[tokio::test]
async fn test_query_with_positional_values() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one"), (2, "two")]).await;

    let rows = payload(
        &call(
            &db.router,
            "query",
            json!({"sql": "SELECT b FROM t WHERE a > ? ORDER BY id", "values": [1]}),
        )
        .await,
    );
    assert_eq!(rows, json!([{"b": "two"}]));
}

#[tokio::test]
async fn test_query_syntax_error_is_failure_envelope() {
    let db = setup_test_db().await;
    let response = call(&db.router, "query", json!({"sql": "SELEKT * FROM t"})).await;
    assert!(response.is_error);
    let text = response.first_text().unwrap();
    assert!(text.starts_with("Error: "), "{}", text);
    assert!(text.contains("syntax error"), "{}", text);
}

#[tokio::test]
async fn test_constraint_violation_is_failure_envelope() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one")]).await;

    let response = call(
        &db.router,
        "create_record",
        json!({"table": "t", "data": {"id": 1, "a": 2}}),
    )
    .await;
    assert!(response.is_error);
    let text = response.first_text().unwrap();
    assert!(text.starts_with("Error creating record: "), "{}", text);
    assert!(text.contains("UNIQUE constraint failed"), "{}", text);
}

#[tokio::test]
async fn test_utf8_values_survive_round_trip() {
    let db = setup_test_db().await;
    let text = "héllo 世界 🚀 Ωmega";

    let created = payload(
        &call(
            &db.router,
            "create_record",
            json!({"table": "t", "data": {"a": 1, "b": text}}),
        )
        .await,
    );

    let rows = payload(
        &call(
            &db.router,
            "read_records",
            json!({"table": "t", "conditions": {"b": text}}),
        )
        .await,
    );
    assert_eq!(rows[0]["id"], created["insertedId"]);
    assert_eq!(rows[0]["b"], text);
}

#[tokio::test]
async fn test_db_info_reports_file_details() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one")]).await;

    let info = payload(&call(&db.router, "db_info", json!({})).await);
    assert!(info["dbPath"].as_str().unwrap().ends_with("test.db"));
    assert_eq!(info["exists"], true);
    assert!(info["size"].is_u64());
    assert!(info["sizeHuman"].as_str().unwrap().ends_with('B'));
    assert!(info["lastModified"].is_string());
    assert_eq!(info["tableCount"], 1);
    assert_eq!(info["connected"], true);
}

#[tokio::test]
async fn test_success_payloads_round_trip_through_json() {
    let db = setup_test_db().await;
    seed(&db.router, &[(1, "one")]).await;

    for (name, args) in [
        ("db_info", json!({})),
        ("list_tables", json!({})),
        ("get_table_schema", json!({"tableName": "t"})),
        ("read_records", json!({"table": "t"})),
        ("query", json!({"sql": "SELECT count(*) AS n FROM t"})),
    ] {
        let response = call(&db.router, name, args).await;
        let value = payload(&response);
        let reparsed: JsonValue =
            serde_json::from_str(&serde_json::to_string(&value).unwrap()).unwrap();
        assert_eq!(value, reparsed, "{}", name);
    }
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persist.db");

    {
        let router = OperationRouter::new(Arc::new(SqliteHandler::open(&path).await));
        payload(&call(&router, "query", json!({"sql": "CREATE TABLE k (v TEXT)"})).await);
        payload(
            &call(
                &router,
                "create_record",
                json!({"table": "k", "data": {"v": "kept"}}),
            )
            .await,
        );
    }

    let router = OperationRouter::new(Arc::new(SqliteHandler::open(&path).await));
    let rows = payload(&call(&router, "read_records", json!({"table": "k"})).await);
    assert_eq!(rows, json!([{"v": "kept"}]));
}
