//! A small Exasol-style `sys` catalog attached to an in-memory SQLite database.
//!
//! The helpers only write catalog rows; they do not create the objects they
//! describe. Tests that need real relations create them in `main`.
#![allow(dead_code)]

use metaprobe_core::{ExaFormatter, FetchedRow, SqlFormatter};
use metaprobe_sqlite::{SqliteConnection, SqliteOptions};
use serde_json::Value;
use std::sync::Arc;

const CATALOG_DDL: &str = r#"
    ATTACH DATABASE ':memory:' AS sys;

    CREATE TABLE sys.exa_schemas (
        SCHEMA_NAME TEXT NOT NULL,
        SCHEMA_OWNER TEXT NOT NULL,
        SCHEMA_COMMENT TEXT
    );
    CREATE TABLE sys.exa_all_tables (
        TABLE_SCHEMA TEXT NOT NULL,
        TABLE_NAME TEXT NOT NULL,
        TABLE_OWNER TEXT NOT NULL,
        TABLE_ROW_COUNT INTEGER,
        TABLE_COMMENT TEXT
    );
    CREATE TABLE sys.exa_all_views (
        VIEW_SCHEMA TEXT NOT NULL,
        VIEW_NAME TEXT NOT NULL,
        VIEW_OWNER TEXT NOT NULL,
        VIEW_TEXT TEXT
    );
    CREATE TABLE sys.exa_all_columns (
        COLUMN_SCHEMA TEXT NOT NULL,
        COLUMN_TABLE TEXT NOT NULL,
        COLUMN_NAME TEXT NOT NULL,
        COLUMN_TYPE TEXT NOT NULL,
        COLUMN_ORDINAL_POSITION INTEGER NOT NULL
    );
    CREATE TABLE sys.exa_all_objects (
        OBJECT_NAME TEXT NOT NULL,
        OBJECT_TYPE TEXT NOT NULL,
        OWNER TEXT NOT NULL,
        ROOT_NAME TEXT,
        ROOT_TYPE TEXT
    );
    CREATE TABLE sys.exa_all_object_sizes (
        OBJECT_NAME TEXT NOT NULL,
        OBJECT_TYPE TEXT NOT NULL,
        OWNER TEXT NOT NULL,
        ROOT_NAME TEXT,
        ROOT_TYPE TEXT,
        RAW_OBJECT_SIZE INTEGER NOT NULL
    );
    CREATE TABLE sys.exa_all_indices (
        INDEX_SCHEMA TEXT NOT NULL,
        INDEX_TABLE TEXT NOT NULL,
        INDEX_OWNER TEXT NOT NULL,
        INDEX_TYPE TEXT NOT NULL
    );
"#;

pub const OWNER: &str = "SYS";

/// An in-memory connection with an empty `sys` catalog.
pub fn catalog() -> Arc<SqliteConnection> {
    catalog_with(SqliteOptions::default())
}

pub fn catalog_with(options: SqliteOptions) -> Arc<SqliteConnection> {
    let conn = SqliteConnection::open_in_memory(options).expect("open in-memory database");
    attach_catalog(&conn);
    conn
}

pub fn attach_catalog(conn: &SqliteConnection) {
    conn.execute_batch(CATALOG_DDL).expect("create sys catalog");
}

fn lit(value: &str) -> String {
    ExaFormatter::default().quote_literal(value)
}

pub fn create_schema(conn: &SqliteConnection, schema: &str) {
    conn.execute_batch(&format!(
        "INSERT INTO sys.exa_schemas VALUES ({}, {}, NULL);
         INSERT INTO sys.exa_all_objects VALUES ({}, 'SCHEMA', {}, NULL, NULL);",
        lit(schema),
        lit(OWNER),
        lit(schema),
        lit(OWNER),
    ))
    .expect("insert schema");
}

/// Registers a table and its columns, in ordinal order.
pub fn create_table(conn: &SqliteConnection, schema: &str, table: &str, columns: &[(&str, &str)]) {
    let mut sql = format!(
        "INSERT INTO sys.exa_all_tables VALUES ({s}, {t}, {o}, 0, NULL);
         INSERT INTO sys.exa_all_objects VALUES ({t}, 'TABLE', {o}, {s}, 'SCHEMA');
         INSERT INTO sys.exa_all_object_sizes VALUES ({t}, 'TABLE', {o}, {s}, 'SCHEMA', {size});",
        s = lit(schema),
        t = lit(table),
        o = lit(OWNER),
        size = 1024 * columns.len(),
    );
    for (position, (name, ty)) in columns.iter().enumerate() {
        sql.push_str(&format!(
            "INSERT INTO sys.exa_all_columns VALUES ({}, {}, {}, {}, {});",
            lit(schema),
            lit(table),
            lit(name),
            lit(ty),
            position + 1,
        ));
    }
    conn.execute_batch(&sql).expect("insert table");
}

pub fn drop_table(conn: &SqliteConnection, schema: &str, table: &str) {
    conn.execute_batch(&format!(
        "DELETE FROM sys.exa_all_tables WHERE TABLE_SCHEMA = {s} AND TABLE_NAME = {t};
         DELETE FROM sys.exa_all_columns WHERE COLUMN_SCHEMA = {s} AND COLUMN_TABLE = {t};
         DELETE FROM sys.exa_all_objects WHERE ROOT_NAME = {s} AND OBJECT_NAME = {t};
         DELETE FROM sys.exa_all_object_sizes WHERE ROOT_NAME = {s} AND OBJECT_NAME = {t};",
        s = lit(schema),
        t = lit(table),
    ))
    .expect("delete table");
}

pub fn create_view(conn: &SqliteConnection, schema: &str, view: &str, text: &str) {
    conn.execute_batch(&format!(
        "INSERT INTO sys.exa_all_views VALUES ({s}, {v}, {o}, {text});
         INSERT INTO sys.exa_all_objects VALUES ({v}, 'VIEW', {o}, {s}, 'SCHEMA');",
        s = lit(schema),
        v = lit(view),
        o = lit(OWNER),
        text = lit(text),
    ))
    .expect("insert view");
}

pub fn create_index(conn: &SqliteConnection, schema: &str, table: &str, index_type: &str) {
    conn.execute_batch(&format!(
        "INSERT INTO sys.exa_all_indices VALUES ({}, {}, {}, {});",
        lit(schema),
        lit(table),
        lit(OWNER),
        lit(index_type),
    ))
    .expect("insert index");
}

/// The sample catalog used by most tests: schema S1 with T1 and a view, S2 with T2.
pub fn sample() -> Arc<SqliteConnection> {
    let conn = catalog();
    create_schema(&conn, "S1");
    create_schema(&conn, "S2");
    create_table(&conn, "S1", "T1", &[("ID", "DECIMAL(18,0)"), ("NAME", "VARCHAR(100)")]);
    create_view(&conn, "S1", "V1", "SELECT * FROM T1");
    create_table(&conn, "S2", "T2", &[("ID", "DECIMAL(18,0)")]);
    create_index(&conn, "S1", "T1", "GLOBAL");
    conn
}

/// Runs `SELECT COUNT(*)` against `table` in `main`.
pub fn count_rows(conn: &SqliteConnection, table: &str) -> i64 {
    let rows = conn
        .query(&format!("SELECT COUNT(*) FROM {table}"))
        .expect("count rows");
    match rows.first() {
        Some(FetchedRow::Tuple(values)) => values[0].as_i64().expect("integer count"),
        other => panic!("unexpected count result: {other:?}"),
    }
}

/// The string values of `column` across `rows`.
pub fn column<'a>(rows: &'a [metaprobe_core::Row], column: &str) -> Vec<&'a str> {
    rows.iter()
        .map(|row| row.get(column).and_then(Value::as_str).unwrap_or_default())
        .collect()
}
