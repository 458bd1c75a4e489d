use std::{fs, path::Path, rc::Rc};

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::{
    errors::errors::{CompileError, Diagnostic, DiagnosticKind},
    MK_DIAGNOSTIC, MK_TOKEN,
};

use super::{
    numbers::classify,
    tokens::{LiteralValue, Token, TokenKind, PREFIX_LOOKUP, PUNCTUATION_LOOKUP, RESERVED_LOOKUP},
};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"^[ \t\r\n]+").unwrap();
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[\p{Alphabetic}_][\p{Alphabetic}\p{Nd}_]*").unwrap();
}

pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
    finished: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            line: 1,
            file: file_name,
            finished: false,
            diagnostics: vec![],
        }
    }

    pub fn from_file(path: &Path) -> Result<Lexer, CompileError> {
        let source = fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Lexer::new(source, Some(path.to_string_lossy().into_owned())))
    }

    /// Whether another call to `next_token` can produce something other than
    /// the final EOF. Turns false once EOF or an Error token was handed out.
    pub fn has_input(&self) -> bool {
        !self.finished
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn tokenize_all(&mut self) -> Vec<Token> {
        let mut tokens = vec![];

        while self.has_input() {
            tokens.push(self.next_token());
        }

        debug!(
            "{}: scanned {} token(s), {} diagnostic(s)",
            self.file,
            tokens.len(),
            self.diagnostics.len()
        );

        tokens
    }

    pub fn next_token(&mut self) -> Token {
        if self.finished {
            return self.eof();
        }

        if let Err(line) = self.skip_trivia() {
            return self.fail(DiagnosticKind::UnterminatedBlockComment, String::from("/*"), line);
        }

        let Some(c) = self.at() else {
            self.finished = true;
            return self.eof();
        };

        let token = if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit())) {
            self.scan_number()
        } else if c.is_alphabetic() || c == '_' {
            self.scan_symbol()
        } else if c == '"' {
            self.scan_string()
        } else if c == '\'' {
            self.scan_char()
        } else {
            self.scan_punctuation()
        };

        trace!("{}", token);
        token
    }

    fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remainder().chars().nth(n)
    }

    fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.at()?;
        self.advance_n(c.len_utf8());
        Some(c)
    }

    fn eof(&self) -> Token {
        MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.line, Rc::clone(&self.file))
    }

    /// Records a lexical diagnostic and hands out the Error token that ends
    /// the stream.
    fn fail(&mut self, kind: DiagnosticKind, lexeme: String, line: u32) -> Token {
        self.diagnostics
            .push(MK_DIAGNOSTIC!(kind, line, Rc::clone(&self.file)));
        self.finished = true;

        MK_TOKEN!(TokenKind::Error, lexeme, line, Rc::clone(&self.file))
    }

    /// Skips whitespace and comments. An unterminated block comment yields
    /// the line it was opened on.
    fn skip_trivia(&mut self) -> Result<(), u32> {
        loop {
            let run = WHITESPACE
                .find(self.remainder())
                .map(|matched| (matched.as_str().matches('\n').count(), matched.end()));

            if let Some((newlines, end)) = run {
                self.line += newlines as u32;
                self.advance_n(end);
                continue;
            }

            if self.remainder().starts_with("//") {
                let length = self.remainder().find('\n').unwrap_or(self.remainder().len());
                self.advance_n(length);
                continue;
            }

            if self.remainder().starts_with("/*") {
                let opened = self.line;

                let Some(close) = self.remainder()[2..].find("*/") else {
                    self.pos = self.source.len();
                    return Err(opened);
                };

                let length = close + 4;
                let newlines = self.remainder()[..length].matches('\n').count();
                self.line += newlines as u32;
                self.advance_n(length);
                continue;
            }

            return Ok(());
        }
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        let hex = self.remainder().starts_with("0x");
        let mut previous = '\0';

        while let Some(c) = self.at() {
            let exponent_sign = (c == '+' || c == '-') && !hex && (previous == 'e' || previous == 'E');

            if c.is_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                previous = c;
                self.bump();
            } else {
                break;
            }
        }

        let literal = self.source[start..self.pos].to_string();

        match classify(&literal) {
            Ok((kind, value)) => {
                MK_TOKEN!(kind, literal, value, self.line, Rc::clone(&self.file))
            }
            Err(reason) => {
                let line = self.line;
                self.fail(
                    DiagnosticKind::InvalidNumber {
                        literal: literal.clone(),
                        reason,
                    },
                    literal,
                    line,
                )
            }
        }
    }

    fn scan_symbol(&mut self) -> Token {
        let value = match IDENTIFIER.find(self.remainder()) {
            Some(matched) => matched.as_str().to_string(),
            // '_' and alphabetic characters always start a match
            None => self.at().map(String::from).unwrap_or_default(),
        };

        self.advance_n(value.len());

        if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
            MK_TOKEN!(*kind, value, self.line, Rc::clone(&self.file))
        } else {
            Token {
                identifier: Some(value.clone()),
                ..MK_TOKEN!(TokenKind::Identifier, value, self.line, Rc::clone(&self.file))
            }
        }
    }

    fn scan_string(&mut self) -> Token {
        let start = self.pos;
        let line = self.line;
        self.bump();

        let mut result = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => {
                    let lexeme = self.source[start..self.pos].trim_end().to_string();
                    return self.fail(DiagnosticKind::UnterminatedString, lexeme, line);
                }
                Some('"') => break,
                Some('\\') => match self.read_escape('"', DiagnosticKind::UnterminatedString) {
                    Ok(ch) => result.push(ch),
                    Err(kind) => {
                        let lexeme = self.source[start..self.pos].to_string();
                        return self.fail(kind, lexeme, line);
                    }
                },
                Some(ch) => result.push(ch),
            }
        }

        let lexeme = self.source[start..self.pos].to_string();
        MK_TOKEN!(TokenKind::String, lexeme, LiteralValue::Str(result), line, Rc::clone(&self.file))
    }

    fn scan_char(&mut self) -> Token {
        let start = self.pos;
        let line = self.line;
        self.bump();

        let value = match self.bump() {
            None | Some('\n') => {
                let lexeme = self.source[start..self.pos].trim_end().to_string();
                return self.fail(DiagnosticKind::UnterminatedChar, lexeme, line);
            }
            Some('\'') => {
                return self.fail(DiagnosticKind::EmptyCharLiteral, String::from("''"), line);
            }
            Some('\\') => match self.read_escape('\'', DiagnosticKind::UnterminatedChar) {
                Ok(ch) => ch,
                Err(kind) => {
                    let lexeme = self.source[start..self.pos].to_string();
                    return self.fail(kind, lexeme, line);
                }
            },
            Some(ch) => ch,
        };

        if self.at() == Some('\'') {
            self.bump();
            let lexeme = self.source[start..self.pos].to_string();
            return MK_TOKEN!(TokenKind::Char, lexeme, LiteralValue::Char(value), line, Rc::clone(&self.file));
        }

        // More than one character: find the closing quote to report the whole literal
        loop {
            match self.bump() {
                None | Some('\n') => {
                    let lexeme = self.source[start..self.pos].trim_end().to_string();
                    return self.fail(DiagnosticKind::UnterminatedChar, lexeme, line);
                }
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => {
                    let literal = self.source[start..self.pos].to_string();
                    return self.fail(
                        DiagnosticKind::CharLiteralTooLong {
                            literal: literal.clone(),
                        },
                        literal,
                        line,
                    );
                }
                Some(_) => {}
            }
        }
    }

    /// Decodes the escape sequence after a backslash. Only the quote that
    /// delimits the literal may be escaped. `\xHH` and `\NNN` give a code
    /// point up to 0xFF, `\uHHHH` and `\UHHHHHHHH` any Unicode scalar value.
    /// Running out of input mid-sequence reports `unterminated`.
    fn read_escape(
        &mut self,
        quote: char,
        unterminated: DiagnosticKind,
    ) -> Result<char, DiagnosticKind> {
        let Some(c) = self.bump() else {
            return Err(unterminated);
        };

        let (sequence, code) = match c {
            'a' => return Ok('\u{07}'),
            'b' => return Ok('\u{08}'),
            'f' => return Ok('\u{0C}'),
            'n' => return Ok('\n'),
            'r' => return Ok('\r'),
            't' => return Ok('\t'),
            'v' => return Ok('\u{0B}'),
            '\\' => return Ok('\\'),
            '"' | '\'' if c == quote => return Ok(c),
            '0'..='7' => self.read_code(format!("\\{}", c), c.to_digit(8).unwrap_or(0), 2, 8, &unterminated)?,
            'x' => self.read_code(String::from("\\x"), 0, 2, 16, &unterminated)?,
            'u' => self.read_code(String::from("\\u"), 0, 4, 16, &unterminated)?,
            'U' => self.read_code(String::from("\\U"), 0, 8, 16, &unterminated)?,
            other => {
                return Err(DiagnosticKind::InvalidEscape {
                    sequence: format!("\\{}", other),
                })
            }
        };

        let limit = if matches!(c, 'u' | 'U') { 0x10FFFF } else { 0xFF };

        match char::from_u32(code).filter(|_| code <= limit) {
            Some(decoded) => Ok(decoded),
            None => Err(DiagnosticKind::InvalidEscape { sequence }),
        }
    }

    /// Reads exactly `count` digits of `radix` on top of `value`, returning
    /// the sequence as written and its numeric value.
    fn read_code(
        &mut self,
        mut sequence: String,
        mut value: u32,
        count: usize,
        radix: u32,
        unterminated: &DiagnosticKind,
    ) -> Result<(String, u32), DiagnosticKind> {
        for _ in 0..count {
            let Some(c) = self.at() else {
                return Err(unterminated.clone());
            };
            let Some(digit) = c.to_digit(radix) else {
                return Err(DiagnosticKind::InvalidEscape { sequence });
            };

            self.bump();
            sequence.push(c);
            value = value.wrapping_mul(radix).wrapping_add(digit);
        }

        Ok((sequence, value))
    }

    /// Greedy longest match against the operator prefix table.
    fn scan_punctuation(&mut self) -> Token {
        let rest = self.remainder();
        let mut best: Option<(usize, TokenKind)> = None;

        for (idx, ch) in rest.char_indices() {
            let end = idx + ch.len_utf8();
            let Some(info) = PREFIX_LOOKUP.get(&rest[..end]) else {
                break;
            };

            if info.exact {
                if let Some(kind) = PUNCTUATION_LOOKUP.get(&rest[..end]) {
                    best = Some((end, *kind));
                }
            }

            if !info.longer {
                break;
            }
        }

        match best {
            Some((length, kind)) => {
                let lexeme = rest[..length].to_string();
                self.advance_n(length);
                MK_TOKEN!(kind, lexeme, self.line, Rc::clone(&self.file))
            }
            None => {
                let token = self.at().map(String::from).unwrap_or_default();
                let line = self.line;
                self.fail(
                    DiagnosticKind::UnrecognisedToken {
                        token: token.clone(),
                    },
                    token,
                    line,
                )
            }
        }
    }
}

/// Scans a whole buffer, returning every token and the lexical diagnostics.
/// The token list ends with EOF, or with the single Error token that stopped
/// scanning.
pub fn scan_all(source: String, file: Option<String>) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lex = Lexer::new(source, file);
    let tokens = lex.tokenize_all();

    (tokens, lex.into_diagnostics())
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, CompileError> {
    let (tokens, diagnostics) = scan_all(source, file);

    if diagnostics.is_empty() {
        Ok(tokens)
    } else {
        Err(CompileError::Lexing(diagnostics))
    }
}
