//! Evaluator for the top-level `return` expression of a script
//!
//! Array literals, scalars, string concatenation and `Name::class` references
//! are evaluated. Any other expression is skipped with bracket balancing and
//! kept as [`Value::Opaque`] so that unrelated syntax never aborts loading.

use super::SyntaxError;
use super::lexer::{Token, TokenKind};
use hookmerge_core::{ArrayKey, Collection, Value};

/// Evaluate the value returned by a script
pub fn evaluate(src: &str, tokens: &[Token]) -> Result<Value, SyntaxError> {
    let mut parser = Parser::new(src, tokens);
    parser.seek_return()?;
    let value = parser.parse_expr()?;

    match parser.peek() {
        None | Some(TokenKind::Semicolon | TokenKind::CloseTag) => Ok(value),
        Some(_) => Err(parser.error_here("expected ';' after return value")),
    }
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            src,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, ahead: usize) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn offset_here(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.src.len(), |t| t.span.start)
    }

    fn error_here(&self, message: &str) -> SyntaxError {
        SyntaxError::new(self.offset_here(), message)
    }

    /// Position the parser right after the first `return` outside any block
    fn seek_return(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 0_usize;
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                TokenKind::Ident(name) if depth == 0 && name.eq_ignore_ascii_case("return") => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(SyntaxError::new(0, "no top-level return statement"))
    }

    /// Whether the current token ends an expression at depth zero
    fn at_boundary(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(
                TokenKind::Comma
                    | TokenKind::Arrow
                    | TokenKind::RBracket
                    | TokenKind::RParen
                    | TokenKind::RBrace
                    | TokenKind::Semicolon
                    | TokenKind::CloseTag
            )
        )
    }

    fn parse_expr(&mut self) -> Result<Value, SyntaxError> {
        let start = self.pos;
        if let Some(value) = self.try_simple()?
            && self.at_boundary()
        {
            return Ok(value);
        }

        self.pos = start;
        self.skip_opaque()
    }

    /// Evaluate a literal, an array, a concatenation or a class reference
    ///
    /// Returns `None` when the expression is something else.
    fn try_simple(&mut self) -> Result<Option<Value>, SyntaxError> {
        let Some(kind) = self.peek() else {
            return Ok(None);
        };

        let value = match kind {
            TokenKind::LBracket => {
                self.pos += 1;
                Value::Array(self.parse_array(&TokenKind::RBracket)?)
            }
            TokenKind::Ident(name)
                if name.eq_ignore_ascii_case("array")
                    && self.peek_at(1) == Some(&TokenKind::LParen) =>
            {
                self.pos += 2;
                Value::Array(self.parse_array(&TokenKind::RParen)?)
            }
            TokenKind::Str(s) => {
                self.pos += 1;
                return Ok(self.concat(s.clone()));
            }
            TokenKind::Int(n) => {
                self.pos += 1;
                Value::Int(*n)
            }
            TokenKind::Float(f) => {
                self.pos += 1;
                Value::Float(*f)
            }
            TokenKind::Other('-') => match self.peek_at(1) {
                Some(TokenKind::Int(n)) => {
                    self.pos += 2;
                    Value::Int(n.wrapping_neg())
                }
                Some(TokenKind::Float(f)) => {
                    self.pos += 2;
                    Value::Float(-f)
                }
                _ => return Ok(None),
            },
            TokenKind::Ident(name) => {
                if self.peek_at(1) == Some(&TokenKind::DoubleColon) {
                    return Ok(self.class_reference(name));
                }
                self.pos += 1;
                match name.to_ascii_lowercase().trim_start_matches('\\') {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" => Value::Null,
                    _ => return Ok(None),
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(value))
    }

    /// `Name::class` evaluates to the name without a leading separator
    fn class_reference(&mut self, name: &str) -> Option<Value> {
        match self.peek_at(2) {
            Some(TokenKind::Ident(member)) if member.eq_ignore_ascii_case("class") => {
                self.pos += 3;
                Some(Value::Str(name.trim_start_matches('\\').to_string()))
            }
            _ => None,
        }
    }

    /// Fold `'a' . 'b' . 3` into one string
    fn concat(&mut self, mut acc: String) -> Option<Value> {
        while self.peek() == Some(&TokenKind::Dot) {
            self.pos += 1;
            match self.peek() {
                Some(TokenKind::Str(s)) => acc.push_str(s),
                Some(TokenKind::Int(n)) => acc.push_str(&n.to_string()),
                _ => return None,
            }
            self.pos += 1;
        }
        Some(Value::Str(acc))
    }

    /// Parse array elements after the opening token, up to and including `close`
    fn parse_array(&mut self, close: &TokenKind) -> Result<Collection, SyntaxError> {
        let mut collection = Collection::new();

        loop {
            match self.peek() {
                Some(kind) if kind == close => {
                    self.pos += 1;
                    return Ok(collection);
                }
                None => return Err(self.error_here("unterminated array literal")),
                _ => {}
            }

            let first = self.parse_expr()?;
            if self.peek() == Some(&TokenKind::Arrow) {
                self.pos += 1;
                let value = self.parse_expr()?;
                collection.insert(to_key(first), value);
            } else {
                collection.push(first);
            }

            match self.peek() {
                Some(TokenKind::Comma) => self.pos += 1,
                Some(kind) if kind == close => {}
                None => return Err(self.error_here("unterminated array literal")),
                Some(_) => {
                    return Err(self.error_here("expected ',' or end of array"));
                }
            }
        }
    }

    /// Skip one expression of unknown shape, keeping its source text
    fn skip_opaque(&mut self) -> Result<Value, SyntaxError> {
        let start_offset = self.offset_here();
        let mut stack: Vec<TokenKind> = Vec::new();
        let mut previous: Option<&TokenKind> = None;
        // `fn (...)` heads whose `=>` has not been reached yet
        let mut arrow_heads = 0_usize;

        loop {
            if stack.is_empty() {
                if arrow_heads > 0 && self.peek() == Some(&TokenKind::Arrow) {
                    // The arrow function body belongs to this expression
                    arrow_heads -= 1;
                    previous = self.peek();
                    self.pos += 1;
                    continue;
                }
                if self.at_boundary() {
                    break;
                }
            }
            let Some(kind) = self.peek() else {
                return Err(SyntaxError::new(start_offset, "unbalanced brackets"));
            };

            if is_literal(kind) && previous.is_some_and(ends_operand) {
                return Err(self.error_here("expected ',' or operator before literal"));
            }

            match kind {
                TokenKind::Ident(name) if stack.is_empty() && name.eq_ignore_ascii_case("fn") => {
                    arrow_heads += 1;
                }
                TokenKind::LBracket => stack.push(TokenKind::RBracket),
                TokenKind::LParen => stack.push(TokenKind::RParen),
                TokenKind::LBrace => stack.push(TokenKind::RBrace),
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    if stack.pop().as_ref() != Some(kind) {
                        return Err(self.error_here("mismatched closing bracket"));
                    }
                }
                _ => {}
            }
            previous = Some(kind);
            self.pos += 1;
        }

        let end_offset = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(start_offset, |t| t.span.end)
            .max(start_offset);

        if end_offset == start_offset {
            return Err(SyntaxError::new(start_offset, "expected an expression"));
        }

        Ok(Value::Opaque(
            self.src[start_offset..end_offset].trim().to_string(),
        ))
    }
}

fn is_literal(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Str(_) | TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Heredoc
    )
}

/// Tokens after which a literal can only follow an operator
fn ends_operand(kind: &TokenKind) -> bool {
    is_literal(kind) || *kind == TokenKind::RBracket
}

/// Convert an evaluated key expression to an array key
fn to_key(value: Value) -> ArrayKey {
    match value {
        Value::Str(s) => ArrayKey::from_string(&s),
        Value::Int(n) => ArrayKey::Int(n),
        Value::Bool(b) => ArrayKey::Int(i64::from(b)),
        Value::Null => ArrayKey::Str(String::new()),
        #[allow(clippy::cast_possible_truncation)]
        Value::Float(f) => ArrayKey::Int(f.trunc() as i64),
        Value::Opaque(raw) => ArrayKey::Str(raw),
        Value::Array(_) => ArrayKey::Str("Array".to_string()),
    }
}
