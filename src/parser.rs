use crate::ast::{Block, Statement};
use crate::cursor::Cursor;
use crate::error::{Diagnostics, ErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::typechecker::{c_type_for, BuiltinType};

/// Parses a token sequence into a `Statement::Module`.
///
/// Errors go through the sink and short-circuit the descent; the module
/// built so far is still returned, so callers must consult the sink
/// before rendering it.
pub fn parse(tokens: &[Token], diagnostics: &mut Diagnostics) -> Statement {
    let mut parser = Parser {
        cursor: Cursor::new(tokens),
        diagnostics,
    };
    parser.parse_module()
}

struct Parser<'t, 'd> {
    cursor: Cursor<'t, Token>,
    diagnostics: &'d mut Diagnostics,
}

impl Parser<'_, '_> {
    fn parse_module(&mut self) -> Statement {
        let mut structs = Block::new();
        let mut functions = Block::new();

        while !self.cursor.eof() && !self.diagnostics.has_errors() {
            match self.cursor.peek().map(|token| token.kind) {
                Some(TokenKind::Struct) => {
                    if let Some(statement) = self.parse_struct_statement() {
                        structs.push(statement);
                    }
                }
                Some(TokenKind::Fn) => {
                    if let Some(statement) = self.parse_function_statement() {
                        functions.push(statement);
                    }
                }
                _ => {
                    self.report("expected 'struct' or 'fn' at module level");
                    break;
                }
            }
        }

        // The builtin types map to fixed-width C types, so every emitted
        // translation unit pulls in stdint.h.
        Statement::Module {
            name: "main".to_string(),
            includes: vec!["<stdint.h>".to_string()],
            structs,
            functions,
        }
    }

    fn parse_struct_statement(&mut self) -> Option<Statement> {
        // Skip the struct keyword
        self.cursor.advance(1);

        let name = self.expect_identifier("expected struct name after 'struct' keyword")?;

        if !self.consume(TokenKind::LeftBrace) {
            self.report("expected '{' after struct name");
            return None;
        }

        let mut members = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            if self.cursor.eof() || self.diagnostics.has_errors() {
                break;
            }
            members.push(self.parse_struct_member()?);
        }

        if !self.consume(TokenKind::RightBrace) {
            self.report("expected '}' after struct members");
            return None;
        }

        Some(Statement::Struct { name, members })
    }

    /// One member declaration, emitted as fully-formed C: the mapped
    /// type, pointer extensions, and the member name.
    fn parse_struct_member(&mut self) -> Option<String> {
        let ty = match self.cursor.peek() {
            Some(token) if token.kind.is_builtin_type() || token.matches(TokenKind::Identifier) => {
                token.lexeme.clone()
            }
            _ => {
                self.report("expected member type in struct declaration");
                return None;
            }
        };
        self.cursor.advance(1);

        let extensions = self.collect_pointer_extensions();
        let name = self.expect_identifier("expected member name in struct declaration")?;

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after struct member");
            return None;
        }

        Some(format!("{}{} {}", c_type_for(&ty), extensions, name))
    }

    fn parse_function_statement(&mut self) -> Option<Statement> {
        // Skip the fn keyword
        self.cursor.advance(1);

        let name = self.expect_identifier("expected function name after 'fn' keyword")?;

        if !self.consume(TokenKind::LeftParen) {
            self.report("expected '(' after function name");
            return None;
        }

        // The raw argument list keeps every lexeme, commas included,
        // space-separated the way the function renderer splits it.
        let mut args = String::new();
        while let Some(token) = self.cursor.peek() {
            if token.matches(TokenKind::RightParen) || self.diagnostics.has_errors() {
                break;
            }
            args.push(' ');
            args.push_str(&token.lexeme);
            self.cursor.advance(1);
        }

        if !self.consume(TokenKind::RightParen) {
            self.report("expected ')' after function arguments");
            return None;
        }

        if !self.consume(TokenKind::Arrow) {
            self.report("expected '->' after function arguments");
            return None;
        }

        let return_type = match self.cursor.peek() {
            Some(token) if token.kind.is_builtin_type() || token.matches(TokenKind::Identifier) => {
                token.lexeme.clone()
            }
            _ => {
                self.report("expected return type after '->'");
                return None;
            }
        };
        self.cursor.advance(1);

        if !self.consume(TokenKind::LeftBrace) {
            self.report("expected '{' after function return type");
            return None;
        }

        let body = self.parse_statement_block();

        if !self.consume(TokenKind::RightBrace) {
            self.report("expected '}' after function body");
            return None;
        }

        Some(Statement::Function {
            name,
            args,
            return_type,
            body,
        })
    }

    fn parse_statement_block(&mut self) -> Block {
        let mut block = Block::new();
        while !self.check(TokenKind::RightBrace) {
            if self.cursor.eof() || self.diagnostics.has_errors() {
                break;
            }
            if let Some(statement) = self.parse_statement() {
                block.push(statement);
            }
        }
        block
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cursor.peek().map(|token| token.kind) {
            Some(TokenKind::If) => self.parse_if_statement(),
            Some(TokenKind::Return) => self.parse_return_statement(),
            Some(TokenKind::While) => self.parse_while_statement(),
            Some(TokenKind::For) => self.parse_for_statement(),
            Some(TokenKind::Mut) => self.parse_variable_statement(),
            Some(kind) if kind.is_builtin_type() => self.parse_variable_statement(),
            Some(TokenKind::Identifier) => self.parse_identifier_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_if_statement(&mut self) -> Option<Statement> {
        // Skip the if keyword
        self.cursor.advance(1);

        if !self.consume(TokenKind::LeftParen) {
            self.report("expected '(' after 'if'");
            return None;
        }

        let condition = self.parse_expression(TokenKind::RightParen);
        if condition.is_empty() {
            self.report("expected condition in if statement");
            return None;
        }

        if !self.consume(TokenKind::RightParen) {
            self.report("expected ')' after if condition");
            return None;
        }

        if !self.consume(TokenKind::LeftBrace) {
            self.report("expected '{' after if condition");
            return None;
        }

        let then_block = self.parse_statement_block();

        if !self.consume(TokenKind::RightBrace) {
            self.report("expected '}' after if body");
            return None;
        }

        let mut else_block = Block::new();
        if self.check(TokenKind::Else) {
            self.cursor.advance(1);

            if !self.consume(TokenKind::LeftBrace) {
                self.report("expected '{' after 'else'");
                return None;
            }

            else_block = self.parse_statement_block();

            if !self.consume(TokenKind::RightBrace) {
                self.report("expected '}' after else body");
                return None;
            }
        }

        Some(Statement::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        // Skip the return keyword
        self.cursor.advance(1);

        let expression = self.parse_expression(TokenKind::Semicolon);
        if expression.is_empty() {
            self.report("expected expression after 'return'");
            return None;
        }

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after return expression");
            return None;
        }

        Some(Statement::Return { expression })
    }

    fn parse_while_statement(&mut self) -> Option<Statement> {
        // Skip the while keyword
        self.cursor.advance(1);

        if !self.consume(TokenKind::LeftParen) {
            self.report("expected '(' after 'while'");
            return None;
        }

        let condition = self.parse_expression(TokenKind::RightParen);
        if condition.is_empty() {
            self.report("expected condition in while loop");
            return None;
        }

        if !self.consume(TokenKind::RightParen) {
            self.report("expected ')' after while condition");
            return None;
        }

        if !self.consume(TokenKind::LeftBrace) {
            self.report("expected '{' after while condition");
            return None;
        }

        let body = self.parse_statement_block();

        if !self.consume(TokenKind::RightBrace) {
            self.report("expected '}' after while body");
            return None;
        }

        Some(Statement::While { condition, body })
    }

    fn parse_for_statement(&mut self) -> Option<Statement> {
        // Skip the for keyword
        self.cursor.advance(1);

        if !self.consume(TokenKind::LeftParen) {
            self.report("expected '(' after 'for'");
            return None;
        }

        // The initializer consumes its own terminating semicolon.
        let init = self.parse_variable_statement()?;

        let condition = self.parse_expression(TokenKind::Semicolon);

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after for-loop condition");
            return None;
        }

        let increment = self.parse_expression(TokenKind::RightParen);

        if !self.consume(TokenKind::RightParen) {
            self.report("expected ')' after for-loop increment");
            return None;
        }

        if !self.consume(TokenKind::LeftBrace) {
            self.report("expected '{' after for-loop header");
            return None;
        }

        let body = self.parse_statement_block();

        if !self.consume(TokenKind::RightBrace) {
            self.report("expected '}' after for-loop body");
            return None;
        }

        Some(Statement::For {
            init: Box::new(init),
            condition,
            increment,
            body,
        })
    }

    fn parse_variable_statement(&mut self) -> Option<Statement> {
        let is_mutable = self.check(TokenKind::Mut);
        if is_mutable {
            self.cursor.advance(1);
        }

        let ty = match self.cursor.peek().and_then(|token| BuiltinType::from_token(token.kind)) {
            Some(ty) => ty,
            None => {
                self.report("expected builtin type in variable declaration");
                return None;
            }
        };
        self.cursor.advance(1);

        let type_extensions = self.collect_pointer_extensions();
        let name = self.expect_identifier("expected variable name after type")?;

        if !self.consume(TokenKind::Equal) {
            self.report("expected '=' after variable name");
            return None;
        }

        let expression = self.parse_expression(TokenKind::Semicolon);
        if expression.is_empty() {
            self.report("expected expression after '=' in variable declaration");
            return None;
        }

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after variable declaration");
            return None;
        }

        Some(Statement::Variable {
            is_mutable,
            ty,
            type_extensions,
            name,
            expression,
        })
    }

    /// A statement led by an identifier: `name += expr;`, a bare call
    /// `name(args);`, or an expression statement starting with the name.
    fn parse_identifier_statement(&mut self) -> Option<Statement> {
        let name = self.cursor.bump()?.lexeme.clone();

        match self.cursor.peek().map(|token| token.kind) {
            Some(TokenKind::PlusEqual) => self.parse_plus_equal_statement(name),
            Some(TokenKind::LeftParen) => self.parse_call_statement(name),
            Some(TokenKind::Equal) => {
                self.report("unsupported assignment operator; only '+=' assigns to a variable");
                None
            }
            _ => {
                let rest = self.parse_expression(TokenKind::Semicolon);
                if !self.consume(TokenKind::Semicolon) {
                    self.report("expected ';' after expression");
                    return None;
                }
                Some(Statement::Expression {
                    expression: format!("{}{}", name, rest),
                })
            }
        }
    }

    fn parse_plus_equal_statement(&mut self, name: String) -> Option<Statement> {
        // Skip the += token
        self.cursor.advance(1);

        let expression = self.parse_expression(TokenKind::Semicolon);
        if expression.is_empty() {
            self.report("expected expression after '+='");
            return None;
        }

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after '+=' expression");
            return None;
        }

        Some(Statement::PlusEqual { name, expression })
    }

    fn parse_call_statement(&mut self, name: String) -> Option<Statement> {
        // Skip the opening paren
        self.cursor.advance(1);

        let args = self.parse_expression(TokenKind::RightParen);

        if !self.consume(TokenKind::RightParen) {
            self.report("expected ')' after call arguments");
            return None;
        }

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after call");
            return None;
        }

        Some(Statement::FunctionCall { name, args })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(TokenKind::Semicolon);
        if expression.is_empty() {
            self.report("expected expression");
            return None;
        }

        if !self.consume(TokenKind::Semicolon) {
            self.report("expected ';' after expression");
            return None;
        }

        Some(Statement::Expression { expression })
    }

    /// Collects lexemes up to an unnested `delimiter` into an opaque
    /// expression string. Parenthesis depth is tracked so nested calls
    /// and groupings survive.
    fn parse_expression(&mut self, delimiter: TokenKind) -> String {
        let mut expression = String::new();
        let mut depth = 0usize;

        while let Some(token) = self.cursor.peek() {
            if self.diagnostics.has_errors() {
                break;
            }
            if token.matches(delimiter) && depth == 0 {
                break;
            }
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            expression.push_str(&token.lexeme);
            self.cursor.advance(1);
        }

        expression
    }

    fn collect_pointer_extensions(&mut self) -> String {
        let mut extensions = String::new();
        while self.check(TokenKind::Star) {
            extensions.push('*');
            self.cursor.advance(1);
        }
        extensions
    }

    fn expect_identifier(&mut self, message: &str) -> Option<String> {
        match self.cursor.peek() {
            Some(token) if token.matches(TokenKind::Identifier) => {
                let name = token.lexeme.clone();
                self.cursor.advance(1);
                Some(name)
            }
            _ => {
                self.report(message);
                None
            }
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.peek().is_some_and(|token| token.matches(kind))
    }

    /// Consumes the current token when it matches `kind`.
    fn consume(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.cursor.advance(1);
        true
    }

    fn report(&mut self, message: &str) {
        let position = self
            .cursor
            .peek()
            .or_else(|| self.cursor.peek_behind(1))
            .map(|token| token.position)
            .unwrap_or_default();
        self.diagnostics.report(ErrorKind::Parse, position, message);
    }
}
