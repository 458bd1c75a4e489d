//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach for expressions and recursive
//! descent for statements.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - Prefix parselets (literals, grouping, unary operators)
//! - Infix parselets (binary operators, with binding power and associativity)
//! - Postfix parselets (call and index)
//! - Type handlers

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{Token, TokenKind},
    Position, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, Associativity, BindingPower, InfixParselet, LEDHandler, LEDLookup,
        NUDHandler, NUDLookup, PostfixHandler, PostfixLookup, PostfixParselet, PrefixParselet,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Deepest nesting of expressions and blocks the parser accepts.
pub const MAX_NESTING: usize = 128;

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. It tracks the current
/// position in the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always ending with EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for prefix parselets
    nud_lookup: NUDLookup,
    /// Lookup table for infix parselets
    led_lookup: LEDLookup,
    /// Lookup table for postfix parselets
    postfix_lookup: PostfixLookup,
    /// Lookup table for type handlers
    type_nud_lookup: TypeNUDLookup,
    /// Diagnostics of statements that failed and were skipped
    diagnostics: Vec<Diagnostic>,
    /// Open expressions and blocks on the current parse path
    depth: usize,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// A synthetic EOF is appended when the stream does not already end with
    /// one, so the parser can always look at a current token.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), line, Rc::clone(&file)));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            postfix_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            diagnostics: vec![],
            depth: 0,
        }
    }

    /// Opens one level of expression or block nesting, failing once
    /// `MAX_NESTING` levels are open.
    pub fn enter_nested(&mut self) -> Result<(), Diagnostic> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(DiagnosticKind::NestingTooDeep { limit: MAX_NESTING }));
        }

        self.depth += 1;
        Ok(())
    }

    pub fn leave_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    /// Returns the most recently consumed token, if any.
    pub fn previous_token(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    /// Advances to the next token and returns the previous token.
    /// The final EOF is never stepped over.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns the
    /// given diagnostic or an `ExpectedToken` one at the current line.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Diagnostic>,
    ) -> Result<Token, Diagnostic> {
        if self.current_token_kind() != expected_kind {
            return Err(error.unwrap_or_else(|| {
                self.error(DiagnosticKind::ExpectedToken {
                    expected: expected_kind,
                    found: self.current_token().lexeme.clone(),
                })
            }));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Diagnostic> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Builds a diagnostic at the current token's line.
    pub fn error(&self, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic::new(kind, self.get_position())
    }

    /// Skips tokens until just after the next `;`, or until the current token
    /// is one of `boundaries` or EOF.
    pub fn synchronize(&mut self, boundaries: &[TokenKind]) {
        while self.has_tokens() {
            if self
                .previous_token()
                .is_some_and(|t| t.kind == TokenKind::Semicolon)
            {
                return;
            }

            if boundaries.contains(&self.current_token_kind()) {
                return;
            }

            self.advance();
        }
    }

    /// Index of the current token, used to tell whether a statement made
    /// progress before it failed.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Records `diagnostic` and recovers to a statement boundary. A statement
    /// that failed on its very first token has that token skipped, so every
    /// failure makes progress.
    pub fn recover(&mut self, diagnostic: Diagnostic, boundaries: &[TokenKind], started_at: usize) {
        debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);

        if self.pos == started_at && self.has_tokens() {
            self.advance();
        }

        self.synchronize(boundaries);
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the prefix lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the infix lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the postfix lookup table.
    pub fn get_postfix_lookup(&self) -> &PostfixLookup {
        &self.postfix_lookup
    }

    /// Returns a reference to the type lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers an infix handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence of this operator
    /// * `associativity` - How operators of equal precedence group
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        associativity: Associativity,
        led_fn: LEDHandler,
    ) {
        self.led_lookup.insert(
            kind,
            InfixParselet {
                binding_power,
                associativity,
                handler: led_fn,
            },
        );
    }

    /// Registers a prefix handler for a token. `binding_power` is passed to
    /// the handler as the minimum for its operand.
    pub fn nud(&mut self, kind: TokenKind, binding_power: BindingPower, nud_fn: NUDHandler) {
        self.nud_lookup.insert(
            kind,
            PrefixParselet {
                binding_power,
                handler: nud_fn,
            },
        );
    }

    /// Registers a postfix handler for a token.
    pub fn postfix(&mut self, kind: TokenKind, binding_power: BindingPower, postfix_fn: PostfixHandler) {
        self.postfix_lookup.insert(
            kind,
            PostfixParselet {
                binding_power,
                handler: postfix_fn,
            },
        );
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type handler for a token.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        Position(self.current_token().line, Rc::clone(&self.file))
    }
}

/// Parses a stream of tokens into a Program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF. A failed
/// statement is recorded and skipped up to the next `func`, so the result is
/// always the partial program together with every diagnostic.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut program = Program::new(file);

    while parser.has_tokens() {
        let started_at = parser.cursor();

        match parse_stmt(&mut parser) {
            Ok(stmt) => program.statements.push(stmt),
            Err(diagnostic) => parser.recover(diagnostic, &[TokenKind::Func], started_at),
        }
    }

    let diagnostics = parser.diagnostics;

    debug!(
        "{}: parsed {} statement(s), {} diagnostic(s)",
        program.file,
        program.statements.len(),
        diagnostics.len()
    );

    (program, diagnostics)
}
