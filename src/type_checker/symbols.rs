use crate::ast::types::{FunctionType, Type};

/// A named entity bound in a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// A top-level function, visible across the whole package.
    Function { ty: FunctionType },
    /// A function parameter.
    Variable { ty: Type },
}

impl Symbol {
    /// The type an identifier naming this symbol takes.
    pub fn get_type(&self) -> Type {
        match self {
            Symbol::Function { ty } => Type::Function(ty.clone()),
            Symbol::Variable { ty } => ty.clone(),
        }
    }
}
