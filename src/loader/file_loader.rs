use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::loader::{table_name_from_path, DatasetLoader};
use crate::utils::{
    config::LoaderConfig,
    types::Dataset,
    error::{EngineResult, LoaderError},
};

/// File system loader for delimited text (CSV, TSV, ...) and JSON files
pub struct FileLoader {
    config: LoaderConfig,
}

impl FileLoader {
    /// Create a new file loader reading comma-separated text
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create a file loader with explicit delimiter and trimming settings
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    fn is_json(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    /// Parse delimited text with a header record.
    ///
    /// Records may be ragged: short records leave their trailing columns
    /// absent, extra fields are dropped.
    fn parse_delimited(&self, content: &str, table_name: String) -> EngineResult<Dataset> {
        let trim = if self.config.trim { Trim::All } else { Trim::None };
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.config.delimiter_byte()?)
            .trim(trim)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| LoaderError::MalformedSource(format!("Failed to read headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| LoaderError::MalformedSource(format!("Failed to read record: {}", e)))?;
            if record.len() != headers.len() {
                debug!(
                    line = record.position().map(|p| p.line()),
                    fields = record.len(),
                    expected = headers.len(),
                    "ragged record"
                );
            }
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Dataset::new(table_name, headers, records))
    }

    /// Parse a JSON array of flat objects; the first object's keys form the header
    fn parse_json(&self, content: &str, table_name: String) -> EngineResult<Dataset> {
        let json_data: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| LoaderError::MalformedSource(format!("Failed to parse JSON: {}", e)))?;

        let serde_json::Value::Array(items) = json_data else {
            return Err(LoaderError::MalformedSource(
                "JSON file must contain an array of objects".to_string(),
            )
            .into());
        };

        let mut headers: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(items.len());

        for item in &items {
            let serde_json::Value::Object(object) = item else {
                return Err(LoaderError::MalformedSource(
                    "JSON file must contain an array of objects".to_string(),
                )
                .into());
            };

            if headers.is_empty() {
                headers = object.keys().cloned().collect();
            }

            let record = headers
                .iter()
                .map(|column| object.get(column).map(json_cell).unwrap_or_default())
                .collect::<Vec<_>>();
            records.push(record);
        }

        Ok(Dataset::new(table_name, headers, records))
    }
}

/// Render a JSON value as cell text
fn json_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => value.to_string(),
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetLoader for FileLoader {
    async fn load(&self, path: &Path) -> EngineResult<Dataset> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoaderError::FileNotFound(path.display().to_string()),
            _ => LoaderError::ReadFailed(format!("{}: {}", path.display(), e)),
        })?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        if !self
            .supported_extensions()
            .iter()
            .any(|supported| supported.eq_ignore_ascii_case(extension))
        {
            warn!("Unrecognized extension on {}, reading as delimited text", path.display());
        }

        let table_name = table_name_from_path(path);
        let dataset = if Self::is_json(path) {
            self.parse_json(content, table_name)?
        } else {
            self.parse_delimited(content, table_name)?
        };

        if dataset.is_empty() {
            return Err(LoaderError::EmptySource(format!("{} contains no rows", path.display())).into());
        }

        info!(
            table = dataset.table_name(),
            rows = dataset.row_count(),
            columns = dataset.columns().len(),
            "loaded dataset from {}",
            path.display()
        );

        Ok(dataset)
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &["csv", "tsv", "txt", "json"]
    }
}
