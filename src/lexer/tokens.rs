use lazy_static::lazy_static;
use serde::Serialize;
use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("func", TokenKind::Func);
        map.insert("return", TokenKind::Return);
        map
    };

    pub static ref PUNCTUATION_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("+", TokenKind::Plus);
        map.insert("-", TokenKind::Dash);
        map.insert("*", TokenKind::Star);
        map.insert("/", TokenKind::Slash);
        map.insert("%", TokenKind::Percent);
        map.insert("=", TokenKind::Assignment);
        map.insert("==", TokenKind::Equals);
        map.insert("!=", TokenKind::NotEquals);
        map.insert("<", TokenKind::Less);
        map.insert(">", TokenKind::Greater);
        map.insert("<=", TokenKind::LessEquals);
        map.insert(">=", TokenKind::GreaterEquals);
        map.insert("(", TokenKind::OpenParen);
        map.insert(")", TokenKind::CloseParen);
        map.insert("[", TokenKind::OpenBracket);
        map.insert("]", TokenKind::CloseBracket);
        map.insert("{", TokenKind::OpenCurly);
        map.insert("}", TokenKind::CloseCurly);
        map.insert(".", TokenKind::Dot);
        map.insert(":", TokenKind::Colon);
        map.insert("::", TokenKind::DoubleColon);
        map.insert(",", TokenKind::Comma);
        map.insert(";", TokenKind::Semicolon);
        map
    };

    /// Every prefix of every operator, with whether the prefix is itself an
    /// operator and whether some longer operator starts with it.
    pub static ref PREFIX_LOOKUP: HashMap<String, PrefixInfo> = {
        let mut map: HashMap<String, PrefixInfo> = HashMap::new();

        for op in PUNCTUATION_LOOKUP.keys() {
            let boundaries = op
                .char_indices()
                .map(|(idx, ch)| idx + ch.len_utf8());

            for end in boundaries {
                let prefix = &op[..end];
                let info = map.entry(prefix.to_string()).or_default();

                if end == op.len() {
                    info.exact = true;
                } else {
                    info.longer = true;
                }
            }
        }

        map
    };
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrefixInfo {
    pub exact: bool,
    pub longer: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TokenKind {
    EOF,
    Error,

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
    Char,
    String,
    Identifier,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=
    Less,
    Greater,
    LessEquals,
    GreaterEquals,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,

    Dot,
    Colon,
    DoubleColon,
    Comma,
    Semicolon,

    // Reserved
    Func,
    Return,
}

impl TokenKind {
    pub fn is_numeric_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::I8
                | TokenKind::I16
                | TokenKind::I32
                | TokenKind::I64
                | TokenKind::U8
                | TokenKind::U16
                | TokenKind::U32
                | TokenKind::U64
                | TokenKind::F32
                | TokenKind::F64
        )
    }

    pub fn is_literal(&self) -> bool {
        self.is_numeric_literal() || matches!(self, TokenKind::Char | TokenKind::String)
    }

    /// The source-level type name a numeric literal kind stands for.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            TokenKind::I8 => Some("i8"),
            TokenKind::I16 => Some("i16"),
            TokenKind::I32 => Some("i32"),
            TokenKind::I64 => Some("i64"),
            TokenKind::U8 => Some("u8"),
            TokenKind::U16 => Some("u16"),
            TokenKind::U32 => Some("u32"),
            TokenKind::U64 => Some("u64"),
            TokenKind::F32 => Some("f32"),
            TokenKind::F64 => Some("f64"),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Decoded payload of a literal token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::I8(v) => write!(f, "{}", v),
            LiteralValue::I16(v) => write!(f, "{}", v),
            LiteralValue::I32(v) => write!(f, "{}", v),
            LiteralValue::I64(v) => write!(f, "{}", v),
            LiteralValue::U8(v) => write!(f, "{}", v),
            LiteralValue::U16(v) => write!(f, "{}", v),
            LiteralValue::U32(v) => write!(f, "{}", v),
            LiteralValue::U64(v) => write!(f, "{}", v),
            LiteralValue::F32(v) => write!(f, "{:?}", v),
            LiteralValue::F64(v) => write!(f, "{:?}", v),
            LiteralValue::Char(c) => write!(f, "{:?}", c),
            LiteralValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: Option<LiteralValue>,
    pub identifier: Option<String>,
    pub line: u32,
    pub file: Rc<String>,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.value, &self.identifier) {
            (Some(value), _) => write!(f, "{}:{} {} ({})", self.file, self.line, self.kind, value),
            (None, Some(name)) => write!(f, "{}:{} {} ({})", self.file, self.line, self.kind, name),
            (None, None) => write!(f, "{}:{} {} {:?}", self.file, self.line, self.kind, self.lexeme),
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn position(&self) -> Position {
        Position(self.line, Rc::clone(&self.file))
    }

    /// The name an identifier token carries, falling back to its lexeme.
    pub fn name(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.lexeme)
    }
}
