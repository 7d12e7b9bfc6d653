use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    engine::{
        QueryParser, DefaultQueryParser,
        QueryExecutor, DefaultQueryExecutor,
    },
    loader::{DatasetLoader, FileLoader},
    utils::{
        config::EngineConfig,
        error::{EngineResult, ExecutionError},
        types::{Dataset, QueryResult},
    },
};

/// Summary of a successful dataset load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub path: PathBuf,
    pub table_name: String,
    pub row_count: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loaded {} rows from {}", self.row_count, self.path.display())
    }
}

/// Query session that owns the currently loaded dataset.
///
/// Each query is parsed into a fresh plan and run against the current dataset.
/// Loading replaces the dataset wholesale; the previous one stays in place when
/// a load fails.
pub struct Engine {
    /// Engine configuration
    config: EngineConfig,
    /// Loader used by [`Engine::load`]
    loader: Box<dyn DatasetLoader>,
    /// Query parser for SQL parsing
    query_parser: Box<dyn QueryParser>,
    /// Query executor for plan execution
    query_executor: Box<dyn QueryExecutor>,
    /// Current dataset snapshot
    dataset: Option<Arc<Dataset>>,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        let loader = Box::new(FileLoader::with_config(config.loader.clone()));

        Self::with_components(
            config,
            loader,
            Box::new(DefaultQueryParser::new()),
            Box::new(DefaultQueryExecutor::new()),
        )
    }

    /// Create an engine with custom components
    pub fn with_components(
        config: EngineConfig,
        loader: Box<dyn DatasetLoader>,
        query_parser: Box<dyn QueryParser>,
        query_executor: Box<dyn QueryExecutor>,
    ) -> Self {
        Self {
            config,
            loader,
            query_parser,
            query_executor,
            dataset: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load a dataset from `path`, replacing the current one on success
    pub async fn load(&mut self, path: &Path) -> EngineResult<LoadSummary> {
        let dataset = self.loader.load(path).await?;

        let summary = LoadSummary {
            path: path.to_path_buf(),
            table_name: dataset.table_name().to_string(),
            row_count: dataset.row_count(),
        };
        self.set_dataset(dataset);

        Ok(summary)
    }

    /// Replace the current dataset
    pub fn set_dataset(&mut self, dataset: Dataset) {
        info!(
            table = dataset.table_name(),
            rows = dataset.row_count(),
            "dataset replaced"
        );
        self.dataset = Some(Arc::new(dataset));
    }

    /// Snapshot of the current dataset, if one is loaded
    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    /// Parse and execute a SQL query against the current dataset
    pub fn execute_query(&self, sql: &str) -> EngineResult<QueryResult> {
        let dataset = self.dataset.as_deref().ok_or_else(|| {
            ExecutionError::EmptyDataset("No data loaded. Load a CSV file first.".to_string())
        })?;

        let plan = self.query_parser.parse_query(sql)?;
        if !plan.source_table.eq_ignore_ascii_case(dataset.table_name()) {
            debug!(
                requested = %plan.source_table,
                loaded = dataset.table_name(),
                "FROM table differs from loaded table; querying loaded table"
            );
        }

        self.query_executor.execute_plan(&plan, dataset)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{EngineError, LoaderError};
    use async_trait::async_trait;

    struct FixedLoader(Option<Dataset>);

    #[async_trait]
    impl DatasetLoader for FixedLoader {
        async fn load(&self, path: &Path) -> EngineResult<Dataset> {
            self.0
                .clone()
                .ok_or_else(|| LoaderError::FileNotFound(path.display().to_string()).into())
        }

        fn supported_extensions(&self) -> &[&'static str] {
            &[]
        }
    }

    fn engine_with(loader: FixedLoader) -> Engine {
        Engine::with_components(
            EngineConfig::default(),
            Box::new(loader),
            Box::new(DefaultQueryParser::new()),
            Box::new(DefaultQueryExecutor::new()),
        )
    }

    fn sample_dataset() -> Dataset {
        Dataset::new("T", vec!["id", "name"], vec![vec!["1", "Al"], vec!["2", "Bo"]])
    }

    #[test]
    fn test_query_without_dataset() {
        let engine = Engine::default();

        match engine.execute_query("SELECT * FROM T") {
            Err(EngineError::Execution(ExecutionError::EmptyDataset(msg))) => {
                assert!(msg.contains("No data loaded"))
            }
            other => panic!("Expected EmptyDataset, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_replaces_dataset() {
        let mut engine = engine_with(FixedLoader(Some(sample_dataset())));

        let summary = engine.load(Path::new("t.csv")).await.unwrap();
        assert_eq!(summary.row_count, 2);
        assert_eq!(summary.table_name, "T");
        assert_eq!(summary.to_string(), "Loaded 2 rows from t.csv");
        assert_eq!(engine.dataset().unwrap().row_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_dataset() {
        let mut engine = engine_with(FixedLoader(None));
        engine.set_dataset(sample_dataset());

        assert!(engine.load(Path::new("missing.csv")).await.is_err());
        assert_eq!(engine.dataset().unwrap().row_count(), 2);
    }

    #[test]
    fn test_from_table_is_not_checked() {
        let mut engine = Engine::default();
        engine.set_dataset(sample_dataset());

        let result = engine.execute_query("SELECT name FROM other WHERE id = 2").unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let mut engine = Engine::default();
        engine.set_dataset(sample_dataset());
        let snapshot = engine.dataset().unwrap();

        engine.set_dataset(Dataset::new("U", vec!["x"], vec![vec!["9"]]));

        assert_eq!(snapshot.table_name(), "T");
        assert_eq!(engine.dataset().unwrap().table_name(), "U");
    }
}
