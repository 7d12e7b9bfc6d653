use async_trait::async_trait;
use std::path::Path;
use crate::utils::{
    types::Dataset,
    error::EngineResult,
};

/// Base trait for everything that can materialize a dataset from a source
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    /// Read the source at `path` into a new dataset.
    ///
    /// Fails when the source cannot be read, is malformed, or holds no rows.
    async fn load(&self, path: &Path) -> EngineResult<Dataset>;

    /// File extensions this loader reads with a dedicated format
    fn supported_extensions(&self) -> &[&'static str];
}

/// Derive a table name from a source path: the file stem, upper-cased
pub fn table_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}
