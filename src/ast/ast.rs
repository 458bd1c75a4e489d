use std::{fmt::Display, rc::Rc};

use serde::Serialize;

use super::statements::{FnDeclStmt, Stmt};

/// One parsed source file: its top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub file: Rc<String>,
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(file: Rc<String>) -> Self {
        Program {
            file,
            statements: vec![],
        }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FnDeclStmt> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Stmt::FunctionDeclaration(decl) => Some(decl),
            _ => None,
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "(program {:?}", self.file.as_str())?;
        for stmt in &self.statements {
            writeln!(f, "  {}", stmt)?;
        }
        write!(f, ")")
    }
}
