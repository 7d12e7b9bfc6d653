use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A single record of a dataset: an ordered mapping from column name to cell text.
///
/// Rows loaded from the same source share one column header. A row built from
/// a short source record holds fewer values than it has columns; the trailing
/// columns are then absent from the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Create a new row over a shared header
    pub fn new(columns: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.truncate(columns.len());
        Self { columns, values }
    }

    /// Get a cell by column name, `None` when the column is absent
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .zip(self.values.iter())
            .find(|(name, _)| name.as_str() == column)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether the column is present in this row
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names of the header this row was built against
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterate over the present `(column, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of present cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// An in-memory table: a named, ordered sequence of rows over one header
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    table_name: String,
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from a header and the raw cell text of each record
    pub fn new<S: Into<String>>(
        table_name: impl Into<String>,
        columns: Vec<S>,
        records: Vec<Vec<S>>,
    ) -> Self {
        let columns: Arc<[String]> = columns.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                Row::new(
                    Arc::clone(&columns),
                    record.into_iter().map(Into::into).collect(),
                )
            })
            .collect();

        Self {
            table_name: table_name.into(),
            columns,
            rows,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A coerced literal or cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::String(s) => write!(f, "'{}'", s),
        }
    }
}

/// Comparison operators supported in WHERE clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Operators in the order they must be searched for in a WHERE clause.
    /// Two-character operators come first so `>=` is never split on `>`.
    pub const SEARCH_ORDER: [ComparisonOperator; 6] = [
        ComparisonOperator::NotEqual,
        ComparisonOperator::GreaterThanOrEqual,
        ComparisonOperator::LessThanOrEqual,
        ComparisonOperator::Equal,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::LessThan,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `column <op> value` filter predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: ComparisonOperator,
    pub value: Scalar,
}

/// Columns requested by a SELECT
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    Wildcard,
    /// Column names or aggregate expressions, in the order written
    Columns(Vec<String>),
}

/// Parsed representation of a query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub selected_columns: Projection,
    pub source_table: String,
    pub filter: Option<Condition>,
}

/// One computed aggregate, labelled with the expression that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub label: String,
    pub count: usize,
}

/// Query execution result
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(Vec<Row>),
    Aggregates(Vec<Aggregate>),
}

impl QueryResult {
    /// Number of result entries (rows or aggregates)
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Rows(rows) => rows.len(),
            QueryResult::Aggregates(aggregates) => aggregates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            QueryResult::Rows(rows) => rows.serialize(serializer),
            QueryResult::Aggregates(aggregates) => {
                let entries: Vec<_> = aggregates.iter().map(AggregateEntry).collect();
                entries.serialize(serializer)
            }
        }
    }
}

struct AggregateEntry<'a>(&'a Aggregate);

impl Serialize for AggregateEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.label, &self.0.count)?;
        map.end()
    }
}
