//! Type checking and semantic analysis module.
//!
//! This module checks the parsed programs of one package and decorates
//! their expressions with types. It:
//!
//! - Binds every top-level function in the package scope (first pass)
//! - Resolves declared types to builtins
//! - Resolves identifiers through nested scopes (second pass)
//! - Infers expression types and checks operands and returns
//!
//! Scopes live in a stack-shaped tree owned by the checker and never
//! outlive the analysis.

pub mod scope;
pub mod symbols;
pub mod type_checker;

#[cfg(test)]
mod tests;
