//! Condition parsing and evaluation module
//!
//! This module handles parsing rule conditions like
//! `weight > 1000 AND pickup.city = 'Toronto'` and evaluating them
//! against a fact record.

mod ast;
pub mod cache;
mod evaluator;
pub mod formatter;
pub mod parser;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use formatter::*;
pub use parser::*;
