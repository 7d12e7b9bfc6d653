//! Condition evaluation for WHERE clauses
//!
//! A numeric filter value makes the evaluator read the row's cell as a number;
//! a cell that is not numeric simply fails to match. A string filter value is
//! compared against the raw cell text.

use crate::engine::coercion::{coerce_numeric, compare};
use crate::utils::types::{Condition, Row, Scalar};
use crate::utils::error::{EngineResult, ExecutionError};

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Decide whether `row` satisfies `condition`
    pub fn matches(row: &Row, condition: &Condition) -> EngineResult<bool> {
        let cell = row
            .get(&condition.column)
            .ok_or_else(|| ExecutionError::ColumnNotFound(condition.column.clone()))?;

        let matched = if condition.value.is_numeric() {
            match coerce_numeric(cell.trim()) {
                Some(number) => compare(&number, condition.operator, &condition.value),
                None => false,
            }
        } else {
            compare(&Scalar::String(cell.to_string()), condition.operator, &condition.value)
        };

        Ok(matched)
    }

    /// Keep the rows satisfying `condition`, in their original order
    pub fn filter<'a>(rows: &'a [Row], condition: &Condition) -> EngineResult<Vec<&'a Row>> {
        let mut filtered = Vec::new();
        for row in rows {
            if Self::matches(row, condition)? {
                filtered.push(row);
            }
        }
        Ok(filtered)
    }
}
