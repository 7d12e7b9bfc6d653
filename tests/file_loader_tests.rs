use minisql_engine::loader::{DatasetLoader, FileLoader};
use minisql_engine::utils::{
    config::LoaderConfig,
    error::{EngineError, LoaderError},
};
use std::fs;
use tempfile::TempDir;

/// Helper function to create a temporary directory with test files
fn create_test_files() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let csv_content = "id,name,age,active\n1,John,25,true\n2,Jane,30,false\n3,Bob,35,true\n";
    fs::write(temp_dir.path().join("users.csv"), csv_content).expect("Failed to write CSV file");

    let json_content = r#"[
        {"id": 1, "name": "John", "age": 25, "active": true},
        {"id": 2, "name": "Jane", "age": 30, "active": false},
        {"id": 3, "name": "Bob", "age": null, "active": true}
    ]"#;
    fs::write(temp_dir.path().join("users.json"), json_content).expect("Failed to write JSON file");

    fs::write(temp_dir.path().join("products.tsv"), "sku\tprice\nA1\t19.99\nB2\t29.99\n")
        .expect("Failed to write TSV file");
    fs::write(temp_dir.path().join("empty.csv"), "id,name\n").expect("Failed to write empty CSV");
    fs::write(temp_dir.path().join("blank.csv"), "").expect("Failed to write blank CSV");

    temp_dir
}

#[tokio::test]
async fn test_load_csv_file() {
    let temp_dir = create_test_files();
    let loader = FileLoader::new();

    let dataset = loader.load(&temp_dir.path().join("users.csv")).await.unwrap();

    assert_eq!(dataset.table_name(), "USERS");
    assert_eq!(dataset.row_count(), 3);
    assert_eq!(
        dataset.columns(),
        &["id".to_string(), "name".to_string(), "age".to_string(), "active".to_string()]
    );
    assert_eq!(dataset.rows()[0].get("name"), Some("John"));
    assert_eq!(dataset.rows()[2].get("age"), Some("35"));
}

#[tokio::test]
async fn test_load_json_file() {
    let temp_dir = create_test_files();
    let loader = FileLoader::new();

    let dataset = loader.load(&temp_dir.path().join("users.json")).await.unwrap();

    assert_eq!(dataset.table_name(), "USERS");
    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.columns()[0], "id");
    assert_eq!(dataset.rows()[1].get("active"), Some("false"));
    assert_eq!(dataset.rows()[2].get("age"), Some(""));
}

#[tokio::test]
async fn test_load_with_custom_delimiter() {
    let temp_dir = create_test_files();
    let loader = FileLoader::with_config(LoaderConfig {
        delimiter: '\t',
        trim: false,
    });

    let dataset = loader.load(&temp_dir.path().join("products.tsv")).await.unwrap();

    assert_eq!(dataset.table_name(), "PRODUCTS");
    assert_eq!(dataset.rows()[1].get("price"), Some("29.99"));
}

#[tokio::test]
async fn test_file_not_found() {
    let temp_dir = create_test_files();
    let loader = FileLoader::new();

    let result = loader.load(&temp_dir.path().join("missing.csv")).await;

    match result {
        Err(EngineError::Loader(LoaderError::FileNotFound(path))) => {
            assert!(path.contains("missing.csv"))
        }
        other => panic!("Expected FileNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_header_only_file_is_empty() {
    let temp_dir = create_test_files();
    let loader = FileLoader::new();

    for file in ["empty.csv", "blank.csv"] {
        let result = loader.load(&temp_dir.path().join(file)).await;
        assert!(
            matches!(result, Err(EngineError::Loader(LoaderError::EmptySource(_)))),
            "{} should be rejected as empty, got {:?}",
            file,
            result
        );
    }
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "[{\"id\": 1,").unwrap();

    let result = FileLoader::new().load(&path).await;

    assert!(matches!(result, Err(EngineError::Loader(LoaderError::MalformedSource(_)))));
}

#[tokio::test]
async fn test_byte_order_mark_stripped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bom.csv");
    fs::write(&path, "\u{feff}id,name\n1,Al\n").unwrap();

    let dataset = FileLoader::new().load(&path).await.unwrap();

    assert_eq!(dataset.columns()[0], "id");
}

#[test]
fn test_supported_extensions() {
    let loader = FileLoader::new();
    assert!(loader.supported_extensions().contains(&"csv"));
    assert!(loader.supported_extensions().contains(&"json"));
}
