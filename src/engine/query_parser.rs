use tracing::debug;
use crate::engine::coercion::coerce;
use crate::utils::types::{ComparisonOperator, Condition, Projection, QueryPlan};
use crate::utils::error::{EngineResult, QueryParsingError};

const SELECT: &str = "SELECT";
const FROM: &str = "FROM";
const WHERE: &str = "WHERE";

/// Trait for SQL query parsing functionality
pub trait QueryParser: Send + Sync {
    /// Parse SQL query string into a query plan
    fn parse_query(&self, sql: &str) -> EngineResult<QueryPlan>;

    /// Validate SQL syntax without keeping the plan
    fn validate_syntax(&self, sql: &str) -> bool {
        self.parse_query(sql).is_ok()
    }
}

/// Parser for the `SELECT <cols|*> FROM <table> [WHERE <col> <op> <value>]` dialect.
///
/// Keywords are located case-insensitively, but every piece of text handed to
/// the plan is sliced from the original query so names and literals keep their
/// casing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultQueryParser;

impl DefaultQueryParser {
    /// Create a new query parser instance
    pub fn new() -> Self {
        Self
    }

    /// Parse SQL query string into a query plan
    pub fn parse(&self, sql: &str) -> EngineResult<QueryPlan> {
        let query = sql.trim();
        let query = query.strip_suffix(';').map(str::trim_end).unwrap_or(query);
        // ASCII upper-casing keeps byte offsets identical to `query`
        let upper = query.to_ascii_uppercase();

        let select_pos = find_keyword(&upper, SELECT, 0).ok_or(QueryParsingError::MissingSelect)?;
        let select_end = select_pos + SELECT.len();

        let from_pos = find_keyword(&upper, FROM, select_end).ok_or(QueryParsingError::MissingFrom)?;
        let from_end = from_pos + FROM.len();

        let where_pos = find_keyword(&upper, WHERE, from_end);

        let selected_columns = parse_projection(&query[select_end..from_pos]);
        let source_table = query[from_end..where_pos.unwrap_or(query.len())]
            .trim()
            .to_string();
        let filter = where_pos
            .map(|pos| parse_condition(&query[pos + WHERE.len()..]))
            .transpose()?;

        let plan = QueryPlan {
            selected_columns,
            source_table,
            filter,
        };
        debug!(?plan, "parsed query");

        Ok(plan)
    }
}

impl QueryParser for DefaultQueryParser {
    fn parse_query(&self, sql: &str) -> EngineResult<QueryPlan> {
        self.parse(sql)
    }
}

/// Parse a SQL query string with the default parser
pub fn parse_query(sql: &str) -> EngineResult<QueryPlan> {
    DefaultQueryParser::new().parse(sql)
}

/// Parse the text after `WHERE` into a single condition.
///
/// Operators are tried in [`ComparisonOperator::SEARCH_ORDER`]; the first one
/// that occurs exactly once splits the text into column and literal. Text in
/// which no operator occurs exactly once, or that leaves either side empty,
/// is rejected.
pub fn parse_condition(where_text: &str) -> EngineResult<Condition> {
    let text = where_text.trim();

    let (operator, left, right) = ComparisonOperator::SEARCH_ORDER
        .iter()
        .copied()
        .filter(|operator| text.matches(operator.symbol()).count() == 1)
        .find_map(|operator| {
            text.split_once(operator.symbol())
                .map(|(left, right)| (operator, left, right))
        })
        .ok_or_else(|| QueryParsingError::InvalidWhereClause(text.to_string()))?;

    let column = left.trim();
    let literal = right.trim();
    if column.is_empty() || literal.is_empty() {
        return Err(QueryParsingError::InvalidWhereClause(text.to_string()).into());
    }

    Ok(Condition {
        column: column.to_string(),
        operator,
        value: coerce(literal),
    })
}

fn parse_projection(select_part: &str) -> Projection {
    let select_part = select_part.trim();
    if select_part == "*" {
        Projection::Wildcard
    } else {
        Projection::Columns(
            select_part
                .split(',')
                .map(|column| column.trim().to_string())
                .collect(),
        )
    }
}

/// Find `keyword` as a whole word in `upper`, starting at byte offset `from`
fn find_keyword(upper: &str, keyword: &str, from: usize) -> Option<usize> {
    let bytes = upper.as_bytes();
    let mut start = from;

    while let Some(offset) = upper.get(start..)?.find(keyword) {
        let pos = start + offset;
        let end = pos + keyword.len();
        let starts_word = pos == 0 || !is_identifier_byte(bytes[pos - 1]);
        let ends_word = end == bytes.len() || !is_identifier_byte(bytes[end]);

        if starts_word && ends_word {
            return Some(pos);
        }
        start = pos + 1;
    }

    None
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
