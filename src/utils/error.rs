use thiserror::Error;

/// Main error type for the query engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Query parsing error: {0}")]
    QueryParsing(#[from] QueryParsingError),

    #[error("Query execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Error loading data: {0}")]
    Loader(#[from] LoaderError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Query parsing errors
#[derive(Debug, Error, PartialEq)]
pub enum QueryParsingError {
    #[error("Invalid SQL: Missing SELECT clause")]
    MissingSelect,

    #[error("Invalid SQL: Missing FROM clause")]
    MissingFrom,

    #[error("Invalid WHERE clause: {0}")]
    InvalidWhereClause(String),
}

/// Errors raised while running a query plan against a dataset
#[derive(Debug, Error, PartialEq)]
pub enum ExecutionError {
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    #[error("Only COUNT aggregation is supported (got '{0}')")]
    UnsupportedAggregate(String),

    #[error("{0}")]
    EmptyDataset(String),
}

/// Dataset loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read source: {0}")]
    ReadFailed(String),

    #[error("Malformed source: {0}")]
    MalformedSource(String),

    #[error("Source is empty: {0}")]
    EmptySource(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_from_query_parsing_error() {
        let engine_error: EngineError = QueryParsingError::MissingFrom.into();

        match engine_error {
            EngineError::QueryParsing(QueryParsingError::MissingFrom) => {}
            _ => panic!("Expected QueryParsing error"),
        }
    }

    #[test]
    fn test_engine_error_from_execution_error() {
        let execution_error = ExecutionError::ColumnNotFound("age".to_string());
        let engine_error: EngineError = execution_error.into();

        match engine_error {
            EngineError::Execution(ExecutionError::ColumnNotFound(column)) => {
                assert_eq!(column, "age");
            }
            _ => panic!("Expected Execution error"),
        }
    }

    #[test]
    fn test_engine_error_from_loader_error() {
        let loader_error = LoaderError::FileNotFound("missing.csv".to_string());
        let engine_error: EngineError = loader_error.into();

        match engine_error {
            EngineError::Loader(LoaderError::FileNotFound(path)) => assert_eq!(path, "missing.csv"),
            _ => panic!("Expected Loader error"),
        }
    }

    #[test]
    fn test_error_display() {
        let error: EngineError = ExecutionError::ColumnNotFound("salary".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Query execution error: Column 'salary' not found in table"
        );

        let error: EngineError = QueryParsingError::MissingSelect.into();
        assert_eq!(
            error.to_string(),
            "Query parsing error: Invalid SQL: Missing SELECT clause"
        );

        let error = EngineError::Configuration("bad delimiter".to_string());
        assert!(error.to_string().contains("Configuration error: bad delimiter"));
    }

    #[test]
    fn test_unsupported_aggregate_message() {
        let error = ExecutionError::UnsupportedAggregate("SUM(age)".to_string());
        assert!(error.to_string().starts_with("Only COUNT aggregation is supported"));
    }
}
