use std::collections::HashMap;

use crate::{
    errors::errors::{Diagnostic, DiagnosticKind},
    Position,
};

use super::symbols::Symbol;

#[derive(Debug)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
    parent: Option<usize>,
}

impl Scope {
    fn new(parent: Option<usize>) -> Self {
        Scope {
            symbols: HashMap::new(),
            parent,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Nested scopes stored as a stack. Index 0 is the package scope, which has
/// no parent and lives as long as the tree; every other scope is pushed on
/// `enter` and dropped on `leave`.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::new(None)],
        }
    }

    fn current(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Number of open scopes, the package scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter(&mut self) {
        let parent = self.current();
        self.scopes.push(Scope::new(Some(parent)));
    }

    /// Drops the innermost scope. The package scope is never dropped.
    pub fn leave(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds `name` in the innermost scope. A name already bound in that same
    /// scope is a redefinition and the first binding stays; names from outer
    /// scopes may be shadowed.
    pub fn declare(&mut self, name: &str, symbol: Symbol, position: Position) -> Result<(), Diagnostic> {
        let current = self.current();
        let scope = &mut self.scopes[current];

        if scope.symbols.contains_key(name) {
            return Err(Diagnostic::new(
                DiagnosticKind::Redefinition {
                    name: name.to_string(),
                },
                position,
            ));
        }

        scope.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Resolves `name` from the innermost scope outwards to the package scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut index = Some(self.current());

        while let Some(current) = index {
            let scope = &self.scopes[current];
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
            index = scope.parent();
        }

        None
    }

    pub fn package_scope(&self) -> &Scope {
        &self.scopes[0]
    }
}
