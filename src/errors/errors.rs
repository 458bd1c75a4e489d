use std::{fmt::Display, io, path::PathBuf};

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

/// A single lexical, syntactic or semantic problem, pinned to a file and line.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    position: Position,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic { kind, position }
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn line(&self) -> u32 {
        self.position.line()
    }

    pub fn file(&self) -> &str {
        self.position.file()
    }

    pub fn stage(&self) -> Stage {
        match &self.kind {
            DiagnosticKind::UnterminatedBlockComment
            | DiagnosticKind::UnterminatedString
            | DiagnosticKind::UnterminatedChar
            | DiagnosticKind::InvalidEscape { .. }
            | DiagnosticKind::EmptyCharLiteral
            | DiagnosticKind::CharLiteralTooLong { .. }
            | DiagnosticKind::InvalidNumber { .. }
            | DiagnosticKind::UnrecognisedToken { .. } => Stage::Lexical,
            DiagnosticKind::UnexpectedToken { .. }
            | DiagnosticKind::ExpectedToken { .. }
            | DiagnosticKind::ExpectedExpression { .. }
            | DiagnosticKind::InvalidType { .. }
            | DiagnosticKind::NestingTooDeep { .. } => Stage::Syntactic,
            _ => Stage::Semantic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::UnterminatedBlockComment => "UnterminatedBlockComment",
            DiagnosticKind::UnterminatedString => "UnterminatedString",
            DiagnosticKind::UnterminatedChar => "UnterminatedChar",
            DiagnosticKind::InvalidEscape { .. } => "InvalidEscape",
            DiagnosticKind::EmptyCharLiteral => "EmptyCharLiteral",
            DiagnosticKind::CharLiteralTooLong { .. } => "CharLiteralTooLong",
            DiagnosticKind::InvalidNumber { .. } => "InvalidNumber",
            DiagnosticKind::UnrecognisedToken { .. } => "UnrecognisedToken",
            DiagnosticKind::UnexpectedToken { .. } => "UnexpectedToken",
            DiagnosticKind::ExpectedToken { .. } => "ExpectedToken",
            DiagnosticKind::ExpectedExpression { .. } => "ExpectedExpression",
            DiagnosticKind::InvalidType { .. } => "InvalidType",
            DiagnosticKind::NestingTooDeep { .. } => "NestingTooDeep",
            DiagnosticKind::Redefinition { .. } => "Redefinition",
            DiagnosticKind::NotDefined { .. } => "NotDefined",
            DiagnosticKind::UnknownType { .. } => "UnknownType",
            DiagnosticKind::ValueInVoidFunction { .. } => "ValueInVoidFunction",
            DiagnosticKind::MissingReturnValue { .. } => "MissingReturnValue",
            DiagnosticKind::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            DiagnosticKind::TypeMatchError { .. } => "TypeMatchError",
            DiagnosticKind::InvalidUnaryOperator { .. } => "InvalidUnaryOperator",
            DiagnosticKind::NonNumericOperand { .. } => "NonNumericOperand",
            DiagnosticKind::UnsupportedLiteral { .. } => "UnsupportedLiteral",
            DiagnosticKind::NotSupportedYet { .. } => "NotSupportedYet",
            DiagnosticKind::InvalidTopLevelStatement => "InvalidTopLevelStatement",
            DiagnosticKind::InvalidStatementPosition => "InvalidStatementPosition",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            DiagnosticKind::UnterminatedBlockComment => {
                ErrorTip::Suggestion(String::from("Close the comment with `*/`"))
            }
            DiagnosticKind::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literals must be closed with `\"` before the end of the line",
            )),
            DiagnosticKind::InvalidEscape { sequence } => ErrorTip::Suggestion(format!(
                "`{}` is not a known escape, use `\\\\` for a literal backslash",
                sequence
            )),
            DiagnosticKind::InvalidNumber { reason, .. } => match reason {
                NumberError::Overflow { kind } => ErrorTip::Suggestion(format!(
                    "The value does not fit in {}, try a wider suffix",
                    kind.type_name().unwrap_or("the selected type")
                )),
                NumberError::UnknownSuffix { .. } => ErrorTip::Suggestion(String::from(
                    "Valid suffixes are b, s, i, l, ub, us, ui, ul, f and d",
                )),
                _ => ErrorTip::None,
            },
            DiagnosticKind::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            DiagnosticKind::NestingTooDeep { .. } => ErrorTip::Suggestion(String::from(
                "Split the expression or block into smaller functions",
            )),
            DiagnosticKind::Redefinition { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            DiagnosticKind::ValueInVoidFunction { function } => ErrorTip::Suggestion(format!(
                "Declare a return type on `{}` or remove the returned value",
                function
            )),
            DiagnosticKind::TypeMatchError { .. } => ErrorTip::Suggestion(String::from(
                "There are no implicit conversions, both operands must have the same type",
            )),
            DiagnosticKind::NotSupportedYet { .. } => ErrorTip::Suggestion(String::from(
                "This feature is expected to be handled, but has not yet been implemented",
            )),
            DiagnosticKind::InvalidTopLevelStatement => ErrorTip::Suggestion(String::from(
                "Only function declarations are allowed at the top level",
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}:{}) {}", self.position.file(), self.position.line(), self.kind)
    }
}

impl std::error::Error for Diagnostic {}

/// The pipeline stage a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntactic,
    Semantic,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    // Lexical
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("invalid escape sequence {sequence:?}")]
    InvalidEscape { sequence: String },
    #[error("empty character literal")]
    EmptyCharLiteral,
    #[error("character literal {literal:?} must contain exactly one character")]
    CharLiteralTooLong { literal: String },
    #[error("invalid number literal {literal:?}: {reason}")]
    InvalidNumber { literal: String, reason: NumberError },
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },

    // Syntactic
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("expected {expected}, found {found:?}")]
    ExpectedToken { expected: TokenKind, found: String },
    #[error("expected an expression, found {found:?}")]
    ExpectedExpression { found: String },
    #[error("expected a type, found {found:?}")]
    InvalidType { found: String },
    #[error("nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    // Semantic
    #[error("redefinition of {name:?}")]
    Redefinition { name: String },
    #[error("used but not defined: {name}")]
    NotDefined { name: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("return has value in void function {function:?}")]
    ValueInVoidFunction { function: String },
    #[error("return without value in function {function:?} returning {expected}")]
    MissingReturnValue { function: String, expected: String },
    #[error("return type mismatch, expression of type {received:?}, expected {expected:?}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("mismatched types for expression: {left:?} and {right:?}")]
    TypeMatchError { left: String, right: String },
    #[error("invalid operator {operator:?} for unary expression")]
    InvalidUnaryOperator { operator: String },
    #[error("non-numeric expression type {operand:?} for unary {operator:?}")]
    NonNumericOperand { operator: String, operand: String },
    #[error("literal not yet supported: {literal}")]
    UnsupportedLiteral { literal: String },
    #[error("{construct} expression not supported yet")]
    NotSupportedYet { construct: String },
    #[error("invalid statement, only declarations are allowed in top-level scope")]
    InvalidTopLevelStatement,
    #[error("invalid statement in this position")]
    InvalidStatementPosition,
}

/// Why a numeric literal could not be classified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumberError {
    #[error("no digits")]
    NoDigits,
    #[error("trailing '.' without fractional digits")]
    TrailingDot,
    #[error("missing exponent digits")]
    MissingExponent,
    #[error("'.' is only allowed in base 10")]
    DotOutsideBase10,
    #[error("exponent is only allowed in base 10")]
    ExponentOutsideBase10,
    #[error("digit {digit:?} is not valid in base {base}")]
    InvalidDigit { digit: char, base: u32 },
    #[error("underscores are not allowed in number literals")]
    Underscore,
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unknown suffix {suffix:?}")]
    UnknownSuffix { suffix: String },
    #[error("integer suffix {suffix:?} on a floating point value")]
    IntegerSuffixOnFloat { suffix: String },
    #[error("float suffix is only allowed in base 10")]
    FloatSuffixOutsideBase10,
    #[error("value overflows {kind}")]
    Overflow { kind: TokenKind },
}

/// Failures at the pipeline level: I/O, a failed stage, or a misuse of the
/// analyzer. Stage failures carry every diagnostic the stage produced.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("lexing failed with {} diagnostic(s)", .0.len())]
    Lexing(Vec<Diagnostic>),
    #[error("parsing failed with {} diagnostic(s)", .0.len())]
    Parsing(Vec<Diagnostic>),
    #[error("semantic analysis failed with {} diagnostic(s)", .0.len())]
    Analysis(Vec<Diagnostic>),
    #[error("no programs were given to the analyzer")]
    NoPrograms,
}

impl CompileError {
    /// The diagnostics behind a failed stage, empty for setup and I/O errors.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Lexing(diagnostics)
            | CompileError::Parsing(diagnostics)
            | CompileError::Analysis(diagnostics) => diagnostics,
            _ => &[],
        }
    }
}
