//! Integration tests for schemadoc: CSV directory in, schema.yml out.

use std::fs;

use tempfile::TempDir;

use schemadoc::output::ColumnTest;
use schemadoc::{CsvSource, DocGenerator, GeneratorConfig, SchemaSource, SchemaWriter, TestsConfig};

/// Helper to create a directory of table files.
fn create_schema_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("Failed to write table file");
    }
    dir
}

const ORDERS: &str = "order_id,customer_name,order_date,order_amt,status,is_gift\n\
                      1,Ada,2024-01-05,12.50,shipped,true\n\
                      2,Bob,2024-01-06,99,pending,false\n\
                      3,Ada,2024-01-07,40.25,shipped,false\n";

fn column_description<'a>(model: &'a schemadoc::output::ModelDoc, column: &str) -> &'a str {
    model
        .columns
        .iter()
        .find(|c| c.name == column)
        .map(|c| c.description.as_str())
        .unwrap_or_else(|| panic!("missing column {}", column))
}

// =============================================================================
// End-to-end Generation
// =============================================================================

#[test]
fn test_generate_orders_model() {
    let dir = create_schema_dir(&[("orders.csv", ORDERS)]);
    let source = CsvSource::open(dir.path()).expect("Failed to open source");
    let schema = source.schema().to_string();

    let doc = DocGenerator::new()
        .generate_schema(&source, &schema)
        .expect("Generation failed");

    assert_eq!(doc.models.len(), 1);
    let model = &doc.models[0];
    assert_eq!(model.name, "orders");
    assert_eq!(
        model.description,
        "Contains information about Order, Customer including various attributes and metrics"
    );

    assert_eq!(column_description(model, "order_id"), "Identifier for Order identifier");
    assert_eq!(
        column_description(model, "customer_name"),
        "Text field containing Customer name (e.g., Ada, Bob)"
    );
    assert_eq!(column_description(model, "order_date"), "Date associated with Order date");
    assert_eq!(
        column_description(model, "order_amt"),
        "Monetary amount for Order amount (ranges from 12.50 to 99.00)"
    );
    assert_eq!(
        column_description(model, "status"),
        "Text field containing Status (e.g., shipped, pending)"
    );
    assert_eq!(column_description(model, "is_gift"), "Flag indicating Is gift");
}

#[test]
fn test_models_follow_table_order() {
    let dir = create_schema_dir(&[
        ("customers.csv", "customer_id,first_name\n1,Ada\n"),
        ("accounts.tsv", "account_id\tbalance_amount\n7\t10.5\n"),
        ("notes.txt", "not a table"),
    ]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    let doc = DocGenerator::new().generate_schema(&source, &schema).unwrap();
    let names: Vec<&str> = doc.models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["accounts", "customers"]);
    assert_eq!(doc.column_count(), 4);
}

#[test]
fn test_empty_directory_yields_empty_document() {
    let dir = create_schema_dir(&[]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    assert!(source.list_tables(&schema).unwrap().is_empty());
    let doc = DocGenerator::new().generate_schema(&source, &schema).unwrap();
    assert!(doc.models.is_empty());
}

#[test]
fn test_generate_named_tables_only() {
    let dir = create_schema_dir(&[("orders.csv", ORDERS), ("refunds.csv", "refund_id\n1\n")]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    let doc = DocGenerator::new()
        .generate(&source, &schema, &["refunds".to_string()])
        .unwrap();
    assert_eq!(doc.models.len(), 1);
    assert_eq!(doc.models[0].columns[0].description, "Identifier for Refund identifier");
}

#[test]
fn test_unknown_table_is_an_error() {
    let dir = create_schema_dir(&[("orders.csv", ORDERS)]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    let result = DocGenerator::new().generate(&source, &schema, &["missing".to_string()]);
    assert!(result.is_err());
}

// =============================================================================
// Sampling
// =============================================================================

#[test]
fn test_sample_size_limits_range() {
    let dir = create_schema_dir(&[("orders.csv", ORDERS)]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    let generator = DocGenerator::with_config(GeneratorConfig {
        sample_size: 1,
        ..GeneratorConfig::default()
    });
    let model = generator.document_table(&source, &schema, "orders").unwrap();
    assert_eq!(
        column_description(&model, "order_amt"),
        "Monetary amount for Order amount (ranges from 12.50 to 12.50)"
    );
}

#[test]
fn test_null_only_column_falls_back_to_type() {
    let dir = create_schema_dir(&[("t.csv", "notes,total_count\nNA,\n,NULL\n")]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    let model = DocGenerator::new().document_table(&source, &schema, "t").unwrap();
    assert_eq!(column_description(&model, "notes"), "Text field containing Notes");
    assert_eq!(column_description(&model, "total_count"), "Count or quantity of Total count");
}

// =============================================================================
// Tests Configuration
// =============================================================================

#[test]
fn test_tests_config_attaches_tests() {
    let dir = create_schema_dir(&[("orders.csv", ORDERS)]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();

    let tests = TestsConfig::from_yaml(
        "tests:\n\
         \x20 - column: order_id\n\
         \x20   tests: [unique, not_null]\n\
         \x20 - column: status\n\
         \x20   tests:\n\
         \x20     - accepted_values:\n\
         \x20         values: [shipped, pending]\n",
    )
    .expect("Failed to parse tests config");

    let model = DocGenerator::new()
        .with_tests(tests)
        .document_table(&source, &schema, "orders")
        .unwrap();

    let order_id = &model.columns[0];
    assert_eq!(
        order_id.tests,
        vec![ColumnTest::Simple("unique".into()), ColumnTest::Simple("not_null".into())]
    );
    let status = model.columns.iter().find(|c| c.name == "status").unwrap();
    assert_eq!(status.tests.len(), 1);
    assert_eq!(status.tests[0].name(), "accepted_values");
    assert!(
        model
            .columns
            .iter()
            .filter(|c| c.name != "order_id" && c.name != "status")
            .all(|c| c.tests.is_empty())
    );
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_written_file_is_valid_yaml() {
    let dir = create_schema_dir(&[("orders.csv", ORDERS)]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();
    let doc = DocGenerator::new().generate_schema(&source, &schema).unwrap();

    let out_dir = TempDir::new().unwrap();
    let path = out_dir.path().join("models").join("staging").join("schema.yml");
    SchemaWriter::new().write_file(&doc, &path).expect("Write failed");

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("version: 2\n\nmodels:\n  - name: orders\n"));

    let parsed: serde_yaml::Value = serde_yaml::from_str(&written).expect("Output is not YAML");
    let models = parsed["models"].as_sequence().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["name"].as_str(), Some("orders"));

    let columns = models[0]["columns"].as_sequence().unwrap();
    assert_eq!(columns.len(), 6);
    assert_eq!(
        columns[3]["description"].as_str(),
        Some("Monetary amount for Order amount (ranges from 12.50 to 99.00)")
    );
}

#[test]
fn test_quotes_and_long_descriptions_survive_yaml() {
    let dir = create_schema_dir(&[("notes.csv", "remark\nit's fine\nit's fine\n")]);
    let source = CsvSource::open(dir.path()).unwrap();
    let schema = source.schema().to_string();
    let doc = DocGenerator::new().generate_schema(&source, &schema).unwrap();

    let rendered = SchemaWriter::with_widths(20, 20).render(&doc);
    assert!(rendered.contains("it''s fine"));

    let parsed: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
    let description = parsed["models"][0]["columns"][0]["description"].as_str().unwrap();
    assert_eq!(description, "Text field containing Remark (e.g., it's fine)");
}
