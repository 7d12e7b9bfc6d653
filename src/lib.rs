pub mod engine;
pub mod loader;
pub mod cli;
pub mod utils;

pub use engine::{
    Engine, LoadSummary,
    QueryParser, DefaultQueryParser,
    QueryExecutor, DefaultQueryExecutor,
    ConditionEvaluator,
};
pub use loader::{DatasetLoader, FileLoader};
pub use cli::{run_cli, OutputFormat, OutputFormatter};
pub use utils::*;
