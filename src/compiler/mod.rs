//! Code generation for checked programs.
//!
//! This module holds the backend boundary and the backends behind it:
//!
//! - `tree`, a typed S-expression dump
//! - `json`, the full tree as JSON
//! - `llvm`, LLVM IR through inkwell (with the `llvm` feature)

pub mod compiler;
pub mod json;
#[cfg(feature = "llvm")]
pub mod llvm;
pub mod tree;

#[cfg(test)]
mod tests;
