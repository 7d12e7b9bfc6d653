// Core engine components
pub mod coercion;
pub mod query_parser;
pub mod condition_evaluator;
pub mod query_executor;
pub mod engine;

pub use coercion::{coerce, coerce_numeric, compare};
pub use query_parser::*;
pub use condition_evaluator::*;
pub use query_executor::*;
pub use engine::*;
