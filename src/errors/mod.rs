//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Diagnostics with source position information
//! - Specific diagnostic variants for the lexical, syntactic and semantic stages
//! - Pipeline level errors
//! - Diagnostic collection and report rendering

pub mod errors;
pub mod report;
