mod common;

use std::thread;

use csv_ingest::{
    ByteCursor, CellValue, ColumnType, Dialect, IngestError, IngestOptions, NumericValues,
    QuoteHandling, TypedTable, TypedTableBuilder, scan,
};

fn orders() -> TypedTable {
    let bytes = common::fixture_bytes("orders.csv");
    let mut cursor = ByteCursor::new(&bytes);
    TypedTable::from_csv(&mut cursor, &IngestOptions::default(), None).expect("ingest orders")
}

#[test]
fn orders_fixture_infers_column_types() {
    let table = orders();
    assert_eq!(table.num_rows(), 5);
    assert_eq!(
        table.headers().collect::<Vec<_>>(),
        vec!["order_id", "customer", "quantity", "unit_price", "notes"]
    );
    assert_eq!(
        (0..5).map(|c| table.column_type(c)).collect::<Vec<_>>(),
        vec![
            ColumnType::Integer,
            ColumnType::Text,
            ColumnType::Integer,
            ColumnType::Mixed,
            ColumnType::Text,
        ]
    );
    assert_eq!(table.integers(0), Some(&[1001, 1002, 1003, 1004, 1005][..]));
    assert_eq!(table.reals(3), Some(&[19.99, 4.0, 7.5, 12.0, 0.0][..]));
    assert_eq!(table.integers(3), None);
}

#[test]
fn text_only_cells_keep_the_numeric_tag_and_default_value() {
    let table = orders();
    let quantity = table.column(2).expect("quantity column");
    assert_eq!(quantity.integers(), Some(&[5, 12, 3, 0, 8][..]));
    assert_eq!(quantity.text_only_cells(), 1);
    assert_eq!(quantity.non_empty_cells(), 5);
    assert_eq!(table.cell_value(3, 2), CellValue::Text("n/a"));
    assert_eq!(table.cell_value(4, 2), CellValue::Integer(8));
}

#[test]
fn text_arrays_keep_the_source_text_of_every_non_empty_cell() {
    let table = orders();
    assert_eq!(table.cell_as_str(0, 1), Some("\"Acme, Inc.\""));
    assert_eq!(table.cell_as_str(0, 3), Some("19.99"));
    assert_eq!(table.cell_as_str(1, 4), Some(""));
    assert_eq!(table.column(4).map(|c| c.non_empty_cells()), Some(3));
    assert_eq!(table.cell_value(4, 3), CellValue::Null);
}

#[test]
fn quote_handling_changes_classification() {
    let input = "id,amount\n\"1\",\"2.5\"\n";
    let retained = common::typed(input);
    assert_eq!(retained.column_type(0), ColumnType::Text);
    assert_eq!(retained.column_type(1), ColumnType::Text);

    let options = IngestOptions::default()
        .with_dialect(Dialect::default().with_quote_handling(QuoteHandling::Strip));
    let stripped = common::typed_with(input, &options);
    assert_eq!(stripped.column_type(0), ColumnType::Integer);
    assert_eq!(stripped.column_type(1), ColumnType::Real);
    assert_eq!(stripped.reals(1), Some(&[2.5][..]));
}

#[test]
fn quoted_header_with_delimiters_keeps_its_columns_aligned() {
    let table = common::typed("\"last, first\",age\n\"Doe, J\",41\n");
    assert_eq!(table.num_columns(), 2);
    assert_eq!(table.header(0), Some("\"last, first\""));
    assert_eq!(table.column_type(1), ColumnType::Integer);
    assert_eq!(table.integers(1), Some(&[41][..]));
}

#[test]
fn carriage_return_before_end_of_input_does_not_turn_column_to_text() {
    let table = common::typed("a,b\r\n1,2\r");
    assert_eq!(table.column_type(1), ColumnType::Integer);
    assert_eq!(table.integers(1), Some(&[2][..]));
    assert_eq!(table.cell_as_str(0, 1), Some("2"));
}

#[test]
fn unification_replaces_zero_slots_with_integer_values() {
    let table = common::typed("v\n4\n0.5\n-2\n");
    assert_eq!(table.column_type(0), ColumnType::Mixed);
    match table.column(0).and_then(|c| c.numeric()) {
        Some(NumericValues::Real(values)) => assert_eq!(values, &[4.0, 0.5, -2.0]),
        other => panic!("expected unified reals, got {other:?}"),
    }
}

#[test]
fn headerless_options_treat_every_row_as_data() {
    let table = common::typed_with("1,2\n3,4", &IngestOptions::headerless());
    assert_eq!(table.num_rows(), 2);
    assert!(table.headers().all(str::is_empty));
    assert_eq!(table.integers(1), Some(&[2, 4][..]));
}

#[test]
fn header_row_can_follow_a_preamble_row() {
    let options = IngestOptions {
        header_row: Some(1),
        data_row: 2,
        ..IngestOptions::default()
    };
    let table = common::typed_with("exported,today\nid,val\n1,2.5\n", &options);
    assert_eq!(table.headers().collect::<Vec<_>>(), vec!["id", "val"]);
    assert_eq!(table.num_rows(), 1);
    assert_eq!(table.column_type(1), ColumnType::Real);
}

#[test]
fn header_row_at_or_after_data_start_is_not_captured() {
    let options = IngestOptions {
        header_row: Some(2),
        data_row: 1,
        ..IngestOptions::default()
    };
    let table = common::typed_with("a\n1\n2\n", &options);
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.header(0), Some(""));
    assert_eq!(table.integers(0), Some(&[1, 2][..]));
}

#[test]
fn empty_input_produces_empty_table() {
    let table = common::typed("");
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.num_columns(), 0);
    assert_eq!(table.column_type(0), ColumnType::None);
}

#[test]
fn progress_is_monotonic_and_ends_at_one() {
    let bytes = common::fixture_bytes("orders.csv");
    let mut cursor = ByteCursor::new(&bytes);
    let mut seen = Vec::new();
    let mut record = |fraction: f32| seen.push(fraction);
    TypedTable::from_csv(&mut cursor, &IngestOptions::default(), Some(&mut record))
        .expect("ingest");

    assert_eq!(seen.len(), 6);
    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(seen.last().copied(), Some(1.0));
}

#[test]
fn builder_exposes_frame_before_population() {
    let options = IngestOptions::default();
    let mut cursor = ByteCursor::new(b"a,b\n1,2\n3,4\n");
    let dims = scan(&mut cursor, &options.dialect);
    let builder = TypedTableBuilder::new(dims, &options);
    assert_eq!(builder.num_rows(), 2);
    assert_eq!(builder.dimensions().columns, 2);

    let table = builder.populate(&mut cursor, None).expect("populate");
    assert_eq!(table.integers(1), Some(&[2, 4][..]));
}

#[test]
fn strict_mode_rejects_malformed_input() {
    let strict = IngestOptions::default().strict();

    let mut cursor = ByteCursor::new(b"a,b\n1,2,3\n");
    let err = TypedTable::from_csv(&mut cursor, &strict, None).expect_err("wide row");
    assert!(matches!(err, IngestError::RowTooWide { row: 1, .. }));

    let mut cursor = ByteCursor::new(b"a\n\"never closed\n");
    let err = TypedTable::from_csv(&mut cursor, &strict, None).expect_err("open quote");
    assert_eq!(err, IngestError::UnterminatedQuote { row: 1 });

    let options = IngestOptions {
        header_row: Some(10),
        data_row: 11,
        ..IngestOptions::default().strict()
    };
    let mut cursor = ByteCursor::new(b"a\n1\n");
    let err = TypedTable::from_csv(&mut cursor, &options, None).expect_err("header row");
    assert_eq!(
        err,
        IngestError::HeaderRowOutOfRange {
            header_row: 10,
            rows: 2
        }
    );
}

#[test]
fn best_effort_mode_degrades_instead_of_failing() {
    let table = common::typed("a,b\n1,2,3\n\"x");
    assert_eq!(table.num_columns(), 2);
    assert_eq!(table.num_rows(), 2);
    assert_eq!(table.integers(1), Some(&[2, 0][..]));
    assert_eq!(table.cell_as_str(1, 0), Some("\"x"));
}

#[test]
fn independent_ingestions_run_concurrently() {
    let inputs: Vec<String> = (0..4)
        .map(|n| {
            let mut text = String::from("k,v\n");
            for row in 0..100 {
                text.push_str(&format!("{},{}.5\n", row * n, row));
            }
            text
        })
        .collect();

    let tables: Vec<TypedTable> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|text| scope.spawn(move || common::typed(text)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("ingestion thread"))
            .collect()
    });

    for (n, table) in tables.iter().enumerate() {
        assert_eq!(table.num_rows(), 100);
        assert_eq!(table.column_type(0), ColumnType::Integer);
        assert_eq!(table.column_type(1), ColumnType::Real);
        assert_eq!(table.integers(0).map(|v| v[99]), Some(99 * n as i32));
    }
}
