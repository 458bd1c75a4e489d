//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a Program. It uses a Pratt parser for expressions with proper
//! operator precedence and handles:
//!
//! - Statement parsing (function declarations, returns, blocks)
//! - Expression parsing (unary and binary operators, calls, indexing, literals)
//! - Type parsing for type annotations
//! - Error recovery and reporting
//!
//! Prefix, infix and postfix parselets are registered per token kind, each
//! carrying its binding power (and, for infix operators, associativity).

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod tests;
