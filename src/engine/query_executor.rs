use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use crate::engine::condition_evaluator::ConditionEvaluator;
use crate::utils::{
    types::{Aggregate, Dataset, Projection, QueryPlan, QueryResult, Row},
    error::{EngineResult, ExecutionError},
};

/// Trait for query execution functionality
pub trait QueryExecutor: Send + Sync {
    /// Execute a query plan against a dataset and return results
    fn execute_plan(&self, plan: &QueryPlan, dataset: &Dataset) -> EngineResult<QueryResult>;
}

/// Default implementation of QueryExecutor: filter, then aggregate or project
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultQueryExecutor;

/// What a `COUNT(...)` expression counts
#[derive(Debug, Clone, PartialEq)]
enum CountTarget<'a> {
    AllRows,
    NonEmpty(&'a str),
}

impl DefaultQueryExecutor {
    /// Create a new query executor
    pub fn new() -> Self {
        Self
    }

    /// Execute a query plan against a dataset
    pub fn execute(&self, plan: &QueryPlan, dataset: &Dataset) -> EngineResult<QueryResult> {
        let start_time = Instant::now();

        if dataset.is_empty() {
            return Err(ExecutionError::EmptyDataset(format!(
                "Table {} has no rows",
                dataset.table_name()
            ))
            .into());
        }

        let rows: Vec<&Row> = match &plan.filter {
            Some(condition) => ConditionEvaluator::filter(dataset.rows(), condition)?,
            None => dataset.rows().iter().collect(),
        };

        let result = match &plan.selected_columns {
            Projection::Wildcard => QueryResult::Rows(rows.into_iter().cloned().collect()),
            Projection::Columns(columns) if Self::is_aggregation(columns) => {
                Self::apply_aggregation(&rows, columns)?
            }
            Projection::Columns(columns) => Self::apply_projection(&rows, columns)?,
        };

        debug!(
            entries = result.len(),
            elapsed_us = start_time.elapsed().as_micros() as u64,
            "query executed"
        );

        Ok(result)
    }

    /// A select list is an aggregation when any entry has function-call shape
    fn is_aggregation(columns: &[String]) -> bool {
        columns.iter().any(|column| function_call(column).is_some())
    }

    /// Compute one count per expression; every expression must be a COUNT
    fn apply_aggregation(rows: &[&Row], expressions: &[String]) -> EngineResult<QueryResult> {
        let mut aggregates = Vec::with_capacity(expressions.len());

        for expression in expressions {
            let target = count_target(expression)
                .ok_or_else(|| ExecutionError::UnsupportedAggregate(expression.clone()))?;

            let count = match target {
                CountTarget::AllRows => rows.len(),
                CountTarget::NonEmpty(column) => rows
                    .iter()
                    .filter(|row| row.get(column).is_some_and(|value| !value.is_empty()))
                    .count(),
            };

            aggregates.push(Aggregate {
                label: expression.clone(),
                count,
            });
        }

        Ok(QueryResult::Aggregates(aggregates))
    }

    /// Keep only the requested columns of each row, in the requested order
    fn apply_projection(rows: &[&Row], columns: &[String]) -> EngineResult<QueryResult> {
        let mut header: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            if !header.contains(column) {
                header.push(column.clone());
            }
        }
        let header: Arc<[String]> = header.into();

        let mut projected = Vec::with_capacity(rows.len());
        for row in rows {
            let values = header
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(str::to_string)
                        .ok_or_else(|| ExecutionError::ColumnNotFound(column.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            projected.push(Row::new(Arc::clone(&header), values));
        }

        Ok(QueryResult::Rows(projected))
    }
}

impl QueryExecutor for DefaultQueryExecutor {
    fn execute_plan(&self, plan: &QueryPlan, dataset: &Dataset) -> EngineResult<QueryResult> {
        self.execute(plan, dataset)
    }
}

/// Execute a plan with the default executor
pub fn execute(plan: &QueryPlan, dataset: &Dataset) -> EngineResult<QueryResult> {
    DefaultQueryExecutor::new().execute(plan, dataset)
}

/// Split `NAME(arg)` into its name and trimmed argument
fn function_call(expression: &str) -> Option<(&str, &str)> {
    let expression = expression.trim();
    let open = expression.find('(')?;
    let argument = expression.strip_suffix(')')?.get(open + 1..)?;
    let name = expression[..open].trim();

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some((name, argument.trim()))
}

fn count_target(expression: &str) -> Option<CountTarget<'_>> {
    let (name, argument) = function_call(expression)?;
    if !name.eq_ignore_ascii_case("COUNT") {
        return None;
    }

    Some(if argument == "*" {
        CountTarget::AllRows
    } else {
        CountTarget::NonEmpty(argument)
    })
}
