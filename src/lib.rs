#![allow(clippy::module_inception)]

use std::rc::Rc;

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod pipeline;
pub mod type_checker;

extern crate regex;

/// A line in a named source file. Lines start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn file(&self) -> &str {
        self.1.as_str()
    }
}
