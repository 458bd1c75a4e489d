//! Utility macros for the compiler.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DIAGNOSTIC!` - Creates a Diagnostic at a line of a shared file name

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$lexeme` - The raw source text of the token
/// * `$value` - (optional) The decoded literal value
/// * `$line` - The line the token starts on
/// * `$file` - The shared file name
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Semicolon, String::from(";"), 1, Rc::clone(&file));
/// let number = MK_TOKEN!(TokenKind::I64, String::from("42"), LiteralValue::I64(42), 1, file);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $lexeme:expr, $line:expr, $file:expr) => {
        Token {
            kind: $kind,
            lexeme: $lexeme,
            value: None,
            identifier: None,
            line: $line,
            file: $file,
        }
    };
    ($kind:expr, $lexeme:expr, $value:expr, $line:expr, $file:expr) => {
        Token {
            kind: $kind,
            lexeme: $lexeme,
            value: Some($value),
            identifier: None,
            line: $line,
            file: $file,
        }
    };
}

/// Creates a Diagnostic for `$kind` at `$line` of `$file`.
///
/// ```ignore
/// let diagnostic = MK_DIAGNOSTIC!(DiagnosticKind::UnterminatedString, 3, Rc::clone(&file));
/// ```
#[macro_export]
macro_rules! MK_DIAGNOSTIC {
    ($kind:expr, $line:expr, $file:expr) => {
        $crate::errors::errors::Diagnostic::new($kind, $crate::Position($line, $file))
    };
}
