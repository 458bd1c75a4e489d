//! Lexical analysis module for the compiler.
//!
//! This module contains the scanner that converts source code into a stream
//! of tokens for parsing. It handles:
//!
//! - Whitespace, line and block comments, with line tracking
//! - Keywords, identifiers, string and character literals with escapes
//! - Numeric literals with base prefixes and type suffixes (`numbers`)
//! - Greedy longest-match operators driven by a prefix table

pub mod lexer;
pub mod numbers;
pub mod tokens;
