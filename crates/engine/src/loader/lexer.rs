//! Tokenizer for data-defining scripts
//!
//! Only the subset needed to evaluate array literals is recognised precisely.
//! Everything else becomes an [`TokenKind::Other`] token so the parser can
//! skip it as an opaque expression.

use super::SyntaxError;
use std::ops::Range;

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `<?php` or `<?=`
    OpenTag,
    /// `?>`
    CloseTag,
    /// String literal with escapes decoded
    Str(String),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Name, keyword or namespaced name (`App\Foo`, `\App\Foo`)
    Ident(String),
    /// `$name`
    Variable(String),
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=>`
    Arrow,
    /// `::`
    DoubleColon,
    /// `.`
    Dot,
    /// Heredoc or nowdoc, kept whole and never evaluated
    Heredoc,
    /// Any other punctuation
    Other(char),
}

/// A token and its byte span in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Kind and payload
    pub kind: TokenKind,
    /// Byte range in the source
    pub span: Range<usize>,
}

/// Tokenize a script
///
/// Text before the first open tag (and after a close tag) is inline output
/// and produces no tokens. A file without any open tag is read as code.
pub fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        if self.src.contains("<?") {
            self.skip_inline_output();
        }

        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c => self.pos += 1,
                b'#' => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b'?' if self.peek(1) == Some(b'>') => {
                    self.push(TokenKind::CloseTag, self.pos, self.pos + 2);
                    self.pos += 2;
                    self.skip_inline_output();
                }
                b'<' if self.src[self.pos..].starts_with("<<<") => self.heredoc()?,
                b'\'' => self.single_quoted()?,
                b'"' => self.double_quoted()?,
                b'0'..=b'9' => self.number(),
                b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
                b'$' if self.peek(1).is_some_and(is_name_start) => {
                    let start = self.pos;
                    self.pos += 1;
                    let name = self.take_name();
                    self.push(TokenKind::Variable(name), start, self.pos);
                }
                b if is_name_start(b) || b == b'\\' => self.name(),
                _ => self.punct(),
            }
        }

        Ok(self.tokens)
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: start..end,
        });
    }

    /// Skip output text up to and including the next open tag
    fn skip_inline_output(&mut self) {
        let rest = &self.src[self.pos..];
        match rest.find("<?") {
            Some(idx) => {
                let start = self.pos + idx;
                let after = &self.src[start + 2..];
                let tag_len = if after.get(..3).is_some_and(|t| t.eq_ignore_ascii_case("php")) {
                    5
                } else if after.starts_with('=') {
                    3
                } else {
                    2
                };
                self.push(TokenKind::OpenTag, start, start + tag_len);
                self.pos = start + tag_len;
            }
            None => self.pos = self.bytes.len(),
        }
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => return,
                b'?' if self.peek(1) == Some(b'>') => return,
                _ => self.pos += 1,
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        match self.src[self.pos + 2..].find("*/") {
            Some(idx) => {
                self.pos += 2 + idx + 2;
                Ok(())
            }
            None => Err(SyntaxError::new(start, "unterminated comment")),
        }
    }

    fn single_quoted(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut chunk_start = self.pos;

        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\'' => {
                    value.push_str(&self.src[chunk_start..self.pos]);
                    self.pos += 1;
                    self.push(TokenKind::Str(value), start, self.pos);
                    return Ok(());
                }
                b'\\' if matches!(self.peek(1), Some(b'\\' | b'\'')) => {
                    value.push_str(&self.src[chunk_start..self.pos]);
                    value.push(char::from(self.bytes[self.pos + 1]));
                    self.pos += 2;
                    chunk_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }

        Err(SyntaxError::new(start, "unterminated string"))
    }

    fn double_quoted(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut chunk_start = self.pos;

        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'"' => {
                    value.push_str(&self.src[chunk_start..self.pos]);
                    self.pos += 1;
                    self.push(TokenKind::Str(value), start, self.pos);
                    return Ok(());
                }
                b'\\' if self.pos + 1 < self.bytes.len() => {
                    let decoded = match self.bytes[self.pos + 1] {
                        b'n' => Some('\n'),
                        b't' => Some('\t'),
                        b'r' => Some('\r'),
                        b'v' => Some('\x0b'),
                        b'e' => Some('\x1b'),
                        b'f' => Some('\x0c'),
                        b'0' => Some('\0'),
                        b'\\' => Some('\\'),
                        b'$' => Some('$'),
                        b'"' => Some('"'),
                        _ => None,
                    };
                    if let Some(c) = decoded {
                        value.push_str(&self.src[chunk_start..self.pos]);
                        value.push(c);
                        self.pos += 2;
                        chunk_start = self.pos;
                    } else {
                        // Unknown escapes are kept verbatim, backslash included
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
        }

        Err(SyntaxError::new(start, "unterminated string"))
    }

    /// `<<<ID`, `<<<'ID'` or `<<<"ID"` up to the closing label
    ///
    /// The closing label may be indented and may be followed by more code on
    /// the same line.
    fn heredoc(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 3;
        while matches!(self.peek(0), Some(b' ' | b'\t')) {
            self.pos += 1;
        }

        let quote = match self.peek(0) {
            Some(q @ (b'\'' | b'"')) => {
                self.pos += 1;
                Some(q)
            }
            _ => None,
        };
        if !self.peek(0).is_some_and(is_name_start) {
            // Shift operator followed by `<`
            self.pos = start;
            self.punct();
            return Ok(());
        }

        let label = self.take_name();
        if let Some(q) = quote {
            if self.peek(0) != Some(q) {
                return Err(SyntaxError::new(start, "malformed heredoc label"));
            }
            self.pos += 1;
        }

        match self.src[self.pos..].find('\n') {
            Some(idx) => self.pos += idx + 1,
            None => return Err(SyntaxError::new(start, "unterminated heredoc")),
        }

        loop {
            let line_end = self.src[self.pos..]
                .find('\n')
                .map_or(self.bytes.len(), |idx| self.pos + idx);
            let line = self.src[self.pos..line_end].trim_start_matches([' ', '\t']);

            if let Some(rest) = line.strip_prefix(label.as_str())
                && !rest.bytes().next().is_some_and(is_name_char)
            {
                self.pos = line_end - rest.len();
                self.push(TokenKind::Heredoc, start, self.pos);
                return Ok(());
            }
            if line_end >= self.bytes.len() {
                return Err(SyntaxError::new(start, "unterminated heredoc"));
            }
            self.pos = line_end + 1;
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric() || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }

        let mut is_float = false;
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            while self.pos < self.bytes.len()
                && (self.bytes[self.pos].is_ascii_digit() || self.bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if matches!(self.peek(0), Some(b'e' | b'E')) {
                self.pos += 1;
                if matches!(self.peek(0), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
            }
        }

        let text: String = self.src[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let kind = if is_float {
            text.parse::<f64>()
                .map_or_else(|_| TokenKind::Other('0'), TokenKind::Float)
        } else {
            parse_int_literal(&text)
        };
        self.push(kind, start, self.pos);
    }

    fn take_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_char(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    fn name(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if is_name_char(b) {
                self.pos += 1;
            } else if b == b'\\' && self.peek(1).is_some_and(is_name_start) {
                self.pos += 1;
            } else {
                break;
            }
        }

        if self.pos == start {
            // A lone backslash
            self.pos += 1;
            self.push(TokenKind::Other('\\'), start, self.pos);
            return;
        }

        let name = self.src[start..self.pos].to_string();
        self.push(TokenKind::Ident(name), start, self.pos);
    }

    fn punct(&mut self) {
        let start = self.pos;
        let two = self.src.get(self.pos..self.pos + 2);
        let (kind, len) = match two {
            Some("=>") => (TokenKind::Arrow, 2),
            Some("::") => (TokenKind::DoubleColon, 2),
            _ => {
                let c = self.src[self.pos..].chars().next().unwrap_or('\0');
                let kind = match c {
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '.' => TokenKind::Dot,
                    other => TokenKind::Other(other),
                };
                (kind, c.len_utf8().max(1))
            }
        };
        self.pos += len;
        self.push(kind, start, self.pos);
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Parse decimal, hex, octal and binary integer literals; overflow becomes a float
fn parse_int_literal(text: &str) -> TokenKind {
    let lower = text.to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8)
    } else if lower.len() > 1 && lower.starts_with('0') {
        i64::from_str_radix(&lower[1..], 8)
    } else {
        lower.parse::<i64>()
    };

    match parsed {
        Ok(n) => TokenKind::Int(n),
        Err(_) => lower
            .parse::<f64>()
            .map_or(TokenKind::Other('0'), TokenKind::Float),
    }
}
