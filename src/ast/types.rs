//! Type system definitions for the AST.
//!
//! This module defines the types a declaration or expression can carry:
//!
//! - Builtin scalar types (`i8` through `f64`, `bool`, `ptr`)
//! - Named references, resolved by the analyzer
//! - Function signatures
//! - `Unknown`, the state before analysis or after an error
//!
//! Types written in the source are parsed as `Named` and are then replaced
//! in place by `Builtin` during the analyzer's first pass.

use std::fmt::Display;

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

use crate::lexer::tokens::{Token, TokenKind};

lazy_static! {
    pub static ref BUILTIN_LOOKUP: HashMap<&'static str, BuiltinType> = {
        let mut map = HashMap::new();
        map.insert("i8", BuiltinType::I8);
        map.insert("i16", BuiltinType::I16);
        map.insert("i32", BuiltinType::I32);
        map.insert("i64", BuiltinType::I64);
        map.insert("u8", BuiltinType::U8);
        map.insert("u16", BuiltinType::U16);
        map.insert("u32", BuiltinType::U32);
        map.insert("u64", BuiltinType::U64);
        map.insert("f32", BuiltinType::F32);
        map.insert("f64", BuiltinType::F64);
        map.insert("bool", BuiltinType::Bool);
        map.insert("ptr", BuiltinType::Ptr);
        map
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuiltinType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Ptr,
}

impl BuiltinType {
    pub fn from_name(name: &str) -> Option<BuiltinType> {
        BUILTIN_LOOKUP.get(name).copied()
    }

    /// The type of a literal token, if the language gives that literal one.
    pub fn from_literal(kind: TokenKind) -> Option<BuiltinType> {
        match kind {
            TokenKind::I8 => Some(BuiltinType::I8),
            TokenKind::I16 => Some(BuiltinType::I16),
            TokenKind::I32 => Some(BuiltinType::I32),
            TokenKind::I64 => Some(BuiltinType::I64),
            TokenKind::U8 => Some(BuiltinType::U8),
            TokenKind::U16 => Some(BuiltinType::U16),
            TokenKind::U32 => Some(BuiltinType::U32),
            TokenKind::U64 => Some(BuiltinType::U64),
            TokenKind::F32 => Some(BuiltinType::F32),
            TokenKind::F64 => Some(BuiltinType::F64),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinType::I8 => "i8",
            BuiltinType::I16 => "i16",
            BuiltinType::I32 => "i32",
            BuiltinType::I64 => "i64",
            BuiltinType::U8 => "u8",
            BuiltinType::U16 => "u16",
            BuiltinType::U32 => "u32",
            BuiltinType::U64 => "u64",
            BuiltinType::F32 => "f32",
            BuiltinType::F64 => "f64",
            BuiltinType::Bool => "bool",
            BuiltinType::Ptr => "ptr",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, BuiltinType::Bool | BuiltinType::Ptr)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, BuiltinType::F32 | BuiltinType::F64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            BuiltinType::I8 | BuiltinType::I16 | BuiltinType::I32 | BuiltinType::I64
        )
    }
}

/// A function signature. A missing return type means the function is void.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionType {
    pub return_type: Option<Box<Type>>,
    pub parameters: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Builtin(BuiltinType),
    Named(Token),
    Function(FunctionType),
    Unknown,
}

impl Type {
    /// Structural equality. Builtin and named types compare by name, there is
    /// no implicit widening, and `Unknown` equals nothing.
    pub fn is_same_as(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Builtin(a), Type::Builtin(b)) => a == b,
            (Type::Named(a), Type::Named(b)) => a.name() == b.name(),
            (Type::Builtin(a), Type::Named(b)) | (Type::Named(b), Type::Builtin(a)) => {
                a.name() == b.name()
            }
            (Type::Function(a), Type::Function(b)) => {
                let returns_match = match (&a.return_type, &b.return_type) {
                    (None, None) => true,
                    (Some(a), Some(b)) => a.is_same_as(b),
                    _ => false,
                };

                returns_match
                    && a.parameters.len() == b.parameters.len()
                    && a.parameters
                        .iter()
                        .zip(b.parameters.iter())
                        .all(|(a, b)| a.is_same_as(b))
            }
            _ => false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Builtin(builtin) if builtin.is_numeric())
    }

    pub fn as_builtin(&self) -> Option<BuiltinType> {
        match self {
            Type::Builtin(builtin) => Some(*builtin),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Builtin(builtin) => write!(f, "{}", builtin.name()),
            Type::Named(token) => write!(f, "{}", token.name()),
            Type::Function(function) => {
                write!(f, "func(")?;
                for (idx, parameter) in function.parameters.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ")")?;
                if let Some(return_type) = &function.return_type {
                    write!(f, " {}", return_type)?;
                }
                Ok(())
            }
            Type::Unknown => write!(f, "<unknown>"),
        }
    }
}
