//! Core parser infrastructure and top-level VHDL-2008 parsing rules.
//!
//! The [`VhdlParser`] struct provides primitive operations (advance, expect, eat)
//! and error recovery, while top-level methods parse design files, entities,
//! architectures, and packages.

use crate::ast::*;
use crate::token::{Token, VhdlToken};
use aion_common::{Ident, Interner};
use aion_diagnostics::code::{Category, DiagnosticCode};
use aion_diagnostics::{Diagnostic, DiagnosticSink};
use aion_source::{FileId, Span};

/// A recursive descent parser for VHDL-2008 source text.
///
/// The parser consumes a token stream produced by the lexer and builds an
/// [`VhdlDesignFile`] AST. Errors are reported to the diagnostic sink and
/// represented as `Error` variants in the AST for error recovery.
pub struct VhdlParser<'src> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    source: &'src str,
    #[allow(dead_code)]
    file: FileId,
    pub(crate) interner: &'src Interner,
    sink: &'src DiagnosticSink,
}

impl<'src> VhdlParser<'src> {
    /// Creates a new parser from a token stream.
    pub fn new(
        tokens: Vec<Token>,
        source: &'src str,
        file: FileId,
        interner: &'src Interner,
        sink: &'src DiagnosticSink,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
            file,
            interner,
            sink,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    /// Returns the kind of the current token.
    pub(crate) fn current(&self) -> VhdlToken {
        self.tokens[self.pos].kind
    }

    /// Returns the current token.
    #[allow(dead_code)]
    pub(crate) fn current_token(&self) -> Token {
        self.tokens[self.pos]
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Returns the source text of the current token.
    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    /// Returns `true` if the current token matches the given kind.
    pub(crate) fn at(&self, kind: VhdlToken) -> bool {
        self.current() == kind
    }

    /// Returns `true` if the parser is at end of file.
    pub(crate) fn at_eof(&self) -> bool {
        self.current() == VhdlToken::Eof
    }

    /// Returns the span of the previous token.
    pub(crate) fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    /// Advances past the current token.
    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches the given kind. Returns `true` if consumed.
    pub(crate) fn eat(&mut self, kind: VhdlToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind. Emits an error if not.
    pub(crate) fn expect(&mut self, kind: VhdlToken) {
        if !self.eat(kind) {
            self.expected(&format!("{kind:?}"));
        }
    }

    /// Expects and returns an identifier. Emits an error and returns a dummy if not.
    pub(crate) fn expect_ident(&mut self) -> Ident {
        if self.at(VhdlToken::Identifier) || self.at(VhdlToken::ExtendedIdentifier) {
            let text = self.current_text();
            let ident = self.interner.get_or_intern(text);
            self.advance();
            ident
        } else {
            self.expected("identifier");
            self.interner.get_or_intern("<missing>")
        }
    }

    /// Expects an identifier or keyword (for attribute names, entity classes, etc.).
    pub(crate) fn expect_ident_or_keyword(&mut self) -> Ident {
        if self.at(VhdlToken::Identifier) || self.at(VhdlToken::ExtendedIdentifier) {
            return self.expect_ident();
        }
        // Allow keywords to be used as identifiers in certain contexts
        if self.current().is_keyword() {
            let text = self.current_text();
            let ident = self.interner.get_or_intern(text);
            self.advance();
            return ident;
        }
        self.expected("identifier or keyword");
        self.interner.get_or_intern("<missing>")
    }

    /// Tries to consume an identifier. Returns `Some(Ident)` if present, `None` otherwise.
    pub(crate) fn eat_ident(&mut self) -> Option<Ident> {
        if self.at(VhdlToken::Identifier) || self.at(VhdlToken::ExtendedIdentifier) {
            Some(self.expect_ident())
        } else {
            None
        }
    }

    /// Returns `true` if the next token (after current) matches the given kind.
    pub(crate) fn peek_is(&self, kind: VhdlToken) -> bool {
        if self.pos + 1 < self.tokens.len() {
            self.tokens[self.pos + 1].kind == kind
        } else {
            false
        }
    }

    /// Returns `true` if the next token is an identifier or keyword.
    pub(crate) fn peek_is_ident_or_keyword(&self) -> bool {
        if self.pos + 1 < self.tokens.len() {
            let kind = self.tokens[self.pos + 1].kind;
            kind == VhdlToken::Identifier
                || kind == VhdlToken::ExtendedIdentifier
                || kind.is_keyword()
        } else {
            false
        }
    }

    // ========================================================================
    // Error handling and recovery
    // ========================================================================

    /// Emits an error diagnostic at the current position.
    pub(crate) fn error(&self, msg: &str) {
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            msg,
            self.current_span(),
        ));
    }

    /// Emits an "expected X" error at the current position.
    pub(crate) fn expected(&self, what: &str) {
        let actual = format!("{:?}", self.current());
        self.sink.emit(Diagnostic::error(
            DiagnosticCode::new(Category::Error, 101),
            format!("expected {what}, found {actual}"),
            self.current_span(),
        ));
    }

    /// Recovers to a semicolon, consuming everything before it (including the semicolon).
    pub(crate) fn recover_to_semicolon(&mut self) {
        while !self.at_eof() && !self.at(VhdlToken::Semicolon) {
            self.advance();
        }
        self.eat(VhdlToken::Semicolon);
    }

    /// Recovers to a design unit boundary (entity, architecture, package, or EOF).
    #[allow(dead_code)]
    fn recover_to_design_unit(&mut self) {
        while !self.at_eof() && !self.at_design_unit_start() {
            self.advance();
        }
    }

    /// Returns `true` if the current token could start a design unit.
    fn at_design_unit_start(&self) -> bool {
        matches!(
            self.current(),
            VhdlToken::Entity
                | VhdlToken::Architecture
                | VhdlToken::Package
                | VhdlToken::Library
                | VhdlToken::Use
                | VhdlToken::Context
                | VhdlToken::Configuration
        )
    }

    // ========================================================================
    // Top-level parsing
    // ========================================================================

    /// Parses a complete VHDL design file.
    pub fn parse_design_file(&mut self) -> VhdlDesignFile {
        let start = self.current_span();
        let mut units = Vec::new();

        while !self.at_eof() {
            match self.parse_design_unit() {
                Some(unit) => units.push(unit),
                None => {
                    // Error recovery: skip to next design unit
                    if !self.at_eof() {
                        let span = self.current_span();
                        self.error("unexpected token at top level");
                        self.advance();
                        units.push(DesignUnit::Error(span));
                    }
                }
            }
        }

        let span = if units.is_empty() {
            start
        } else {
            start.merge(self.prev_span())
        };

        VhdlDesignFile { units, span }
    }

    /// Parses a single design unit with its context items.
    fn parse_design_unit(&mut self) -> Option<DesignUnit> {
        let start = self.current_span();

        // Parse context items (library, use)
        let context = self.parse_context_items();

        // Parse the design unit kind
        let unit = match self.current() {
            VhdlToken::Entity => {
                let entity = self.parse_entity_declaration();
                Some(DesignUnitKind::Entity(entity))
            }
            VhdlToken::Architecture => {
                let arch = self.parse_architecture_declaration();
                Some(DesignUnitKind::Architecture(arch))
            }
            VhdlToken::Package => {
                if self.peek_is(VhdlToken::Body) {
                    let pkg_body = self.parse_package_body_declaration();
                    Some(DesignUnitKind::PackageBody(pkg_body))
                } else {
                    let pkg = self.parse_package_declaration();
                    Some(DesignUnitKind::Package(pkg))
                }
            }
            _ => {
                if !context.is_empty() {
                    // We have context but no unit — error
                    self.error("expected design unit after context clauses");
                    return Some(DesignUnit::Error(start.merge(self.prev_span())));
                }
                return None;
            }
        };

        unit.map(|u| {
            let span = start.merge(self.prev_span());
            DesignUnit::ContextUnit {
                context,
                unit: u,
                span,
            }
        })
    }

    /// Parses context items (library and use clauses).
    fn parse_context_items(&mut self) -> Vec<ContextItem> {
        let mut items = Vec::new();
        loop {
            match self.current() {
                VhdlToken::Library => items.push(self.parse_library_clause()),
                VhdlToken::Use => items.push(self.parse_use_clause()),
                _ => break,
            }
        }
        items
    }

    /// Parses a library clause: `library name {, name};`.
    fn parse_library_clause(&mut self) -> ContextItem {
        let start = self.current_span();
        self.expect(VhdlToken::Library);

        let mut names = Vec::new();
        names.push(self.expect_ident());
        while self.eat(VhdlToken::Comma) {
            names.push(self.expect_ident());
        }

        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());
        ContextItem::Library { names, span }
    }

    /// Parses a use clause: `use selected_name;`.
    fn parse_use_clause(&mut self) -> ContextItem {
        let start = self.current_span();
        self.expect(VhdlToken::Use);
        let name = self.parse_selected_name();
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());
        ContextItem::Use { name, span }
    }

    /// Parses a dotted selected name (e.g., `ieee.std_logic_1164.all`).
    pub fn parse_selected_name(&mut self) -> SelectedName {
        let start = self.current_span();
        let mut parts = Vec::new();

        // First part: identifier or keyword
        if self.at(VhdlToken::All) {
            parts.push(self.interner.get_or_intern("all"));
            self.advance();
        } else {
            parts.push(self.expect_ident());
        }

        while self.eat(VhdlToken::Dot) {
            if self.at(VhdlToken::All) {
                parts.push(self.interner.get_or_intern("all"));
                self.advance();
                break;
            }
            parts.push(self.expect_ident());
        }

        let span = start.merge(self.prev_span());
        SelectedName { parts, span }
    }

    // ========================================================================
    // Entity, Architecture, Package
    // ========================================================================

    /// Parses an entity declaration.
    fn parse_entity_declaration(&mut self) -> EntityDecl {
        let start = self.current_span();
        self.expect(VhdlToken::Entity);
        let name = self.expect_ident();
        self.expect(VhdlToken::Is);

        let generics = if self.at(VhdlToken::Generic) {
            Some(self.parse_generic_clause())
        } else {
            None
        };

        let ports = if self.at(VhdlToken::Port) {
            Some(self.parse_port_clause())
        } else {
            None
        };

        // Parse optional entity declarative items and statements
        let mut decls = Vec::new();
        let mut stmts = Vec::new();

        if self.at(VhdlToken::Begin) {
            self.advance();
            stmts = self.parse_concurrent_statements();
        } else if !self.at(VhdlToken::End) {
            decls = self.parse_declarations();
            if self.eat(VhdlToken::Begin) {
                stmts = self.parse_concurrent_statements();
            }
        }

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Entity);
        self.eat_ident(); // optional name
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());

        EntityDecl {
            name,
            generics,
            ports,
            decls,
            stmts,
            span,
        }
    }

    /// Parses an architecture declaration.
    fn parse_architecture_declaration(&mut self) -> ArchitectureDecl {
        let start = self.current_span();
        self.expect(VhdlToken::Architecture);
        let name = self.expect_ident();
        self.expect(VhdlToken::Of);
        let entity_name = self.expect_ident();
        self.expect(VhdlToken::Is);

        let decls = self.parse_declarations();
        self.expect(VhdlToken::Begin);
        let stmts = self.parse_concurrent_statements();

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Architecture);
        self.eat_ident(); // optional name
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());

        ArchitectureDecl {
            name,
            entity_name,
            decls,
            stmts,
            span,
        }
    }

    /// Parses a package declaration.
    fn parse_package_declaration(&mut self) -> PackageDecl {
        let start = self.current_span();
        self.expect(VhdlToken::Package);
        let name = self.expect_ident();
        self.expect(VhdlToken::Is);

        let decls = self.parse_declarations();

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Package);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());

        PackageDecl { name, decls, span }
    }

    /// Parses a package body declaration.
    fn parse_package_body_declaration(&mut self) -> PackageBodyDecl {
        let start = self.current_span();
        self.expect(VhdlToken::Package);
        self.expect(VhdlToken::Body);
        let name = self.expect_ident();
        self.expect(VhdlToken::Is);

        let decls = self.parse_declarations();

        self.expect(VhdlToken::End);
        self.eat(VhdlToken::Package);
        self.eat(VhdlToken::Body);
        self.eat_ident();
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());

        PackageBodyDecl { name, decls, span }
    }

    // ========================================================================
    // Interface declarations (generics, ports)
    // ========================================================================

    /// Parses a generic clause: `generic ( interface_list );`.
    pub fn parse_generic_clause(&mut self) -> GenericClause {
        let start = self.current_span();
        self.expect(VhdlToken::Generic);
        let decls = self.parse_interface_list();
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());
        GenericClause { decls, span }
    }

    /// Parses a port clause: `port ( interface_list );`.
    pub fn parse_port_clause(&mut self) -> PortClause {
        let start = self.current_span();
        self.expect(VhdlToken::Port);
        let decls = self.parse_interface_list();
        self.expect(VhdlToken::Semicolon);
        let span = start.merge(self.prev_span());
        PortClause { decls, span }
    }

    /// Parses an interface list: `( decl {; decl} )`.
    pub fn parse_interface_list(&mut self) -> Vec<InterfaceDecl> {
        self.expect(VhdlToken::LeftParen);
        let mut decls = Vec::new();

        loop {
            decls.push(self.parse_interface_decl());
            if !self.eat(VhdlToken::Semicolon) {
                break;
            }
            // Check if next token starts another decl or closes the paren
            if self.at(VhdlToken::RightParen) {
                break;
            }
        }

        self.expect(VhdlToken::RightParen);
        decls
    }

    /// Parses a single interface declaration.
    fn parse_interface_decl(&mut self) -> InterfaceDecl {
        let start = self.current_span();

        // Optional object class keywords (signal, variable, constant)
        self.eat(VhdlToken::Signal);
        self.eat(VhdlToken::Variable);
        self.eat(VhdlToken::Constant);

        let names = self.parse_identifier_list();
        self.expect(VhdlToken::Colon);

        // Optional mode
        let mode = match self.current() {
            VhdlToken::In => {
                self.advance();
                Some(PortMode::In)
            }
            VhdlToken::Out => {
                self.advance();
                Some(PortMode::Out)
            }
            VhdlToken::Inout => {
                self.advance();
                Some(PortMode::Inout)
            }
            VhdlToken::Buffer => {
                self.advance();
                Some(PortMode::Buffer)
            }
            VhdlToken::Linkage => {
                self.advance();
                Some(PortMode::Linkage)
            }
            _ => None,
        };

        let ty = self.parse_type_indication();

        let default = if self.eat(VhdlToken::ColonEquals) {
            Some(self.parse_expr())
        } else {
            None
        };

        let span = start.merge(self.prev_span());

        InterfaceDecl {
            names,
            mode,
            ty,
            default,
            span,
        }
    }
}
