mod common;

use csv_ingest::sql::{
    column_identifiers, create_table_statement, insert_statement, insert_template,
    write_load_script,
};

#[test]
fn create_table_uses_inferred_sql_types() {
    let bytes = common::fixture_bytes("orders.csv");
    let table = common::typed(std::str::from_utf8(&bytes).expect("utf-8 fixture"));
    assert_eq!(
        create_table_statement(&table, "orders"),
        "CREATE TABLE orders (order_id INTEGER, customer TEXT, quantity INTEGER, \
         unit_price Mixed, notes TEXT);"
    );
}

#[test]
fn identifiers_are_sanitized_and_deduplicated() {
    let table = common::typed("Order ID,order id,,\"qty\"\n1,2,3,4\n");
    assert_eq!(
        column_identifiers(&table),
        vec!["Order_ID", "order_id_2", "column_3", "_qty_"]
    );
    assert_eq!(
        insert_template(&table, "daily orders"),
        "INSERT INTO daily_orders VALUES (@Order_ID, @order_id_2, @column_3, @_qty_);"
    );
}

#[test]
fn insert_statements_bind_typed_literals() {
    let table = common::typed("id,price,name,note\n7,3,O'Neil,\n8,2.25,plain,x\n");
    assert_eq!(
        insert_statement(&table, "t", 0).as_deref(),
        Some("INSERT INTO t VALUES (7, 3.0, 'O''Neil', NULL);")
    );
    assert_eq!(
        insert_statement(&table, "t", 1).as_deref(),
        Some("INSERT INTO t VALUES (8, 2.25, 'plain', 'x');")
    );
    assert_eq!(insert_statement(&table, "t", 2), None);
}

#[test]
fn load_script_wraps_rows_in_a_transaction() {
    let table = common::typed("a,b\n1,x\n2,y\n");
    let mut out = Vec::new();
    let written = write_load_script(&table, "pairs", &mut out).expect("write script");
    assert_eq!(written, 2);
    let script = String::from_utf8(out).expect("utf-8 script");
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(
        lines,
        vec![
            "CREATE TABLE pairs (a INTEGER, b TEXT);",
            "BEGIN TRANSACTION;",
            "INSERT INTO pairs VALUES (1, 'x');",
            "INSERT INTO pairs VALUES (2, 'y');",
            "END TRANSACTION;",
        ]
    );
}
