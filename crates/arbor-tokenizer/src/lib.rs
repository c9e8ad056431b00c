//! Splits source text into typed tokens.
//!
//! A token is just a kind and a byte length; the tokens of a text tile it
//! exactly. Malformed input is never rejected: the tokenizer picks the most
//! likely kind and attaches an error to the token.

mod cursor;
pub mod unescape;

use std::iter::FusedIterator;

use arbor_errors::SyntaxError;
use arbor_syntax::SyntaxKind::{self, *};
use arbor_syntax::T;
use cursor::Cursor;
use log::trace;
use text_size::{TextLen as _, TextRange, TextSize};
use unescape::{Mode, unescape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub len: TextSize,
    pub error: Option<SyntaxError>,
}

/// Lexes `text` lazily. A leading `#!` line that does not start an inner
/// attribute becomes a single `SHEBANG` token.
pub fn tokenize(text: &str) -> Tokenizer<'_> {
    let mut tokenizer = Tokenizer::new(text);
    tokenizer.shebang = shebang_len(text);
    tokenizer
}

/// Returns the kind of `text` if it is exactly one token, with the error the
/// tokenizer reported for it.
pub fn lex_single_syntax_kind(text: &str) -> Option<(SyntaxKind, Option<SyntaxError>)> {
    let mut tokens = Tokenizer::new(text);
    let token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((token.kind, token.error))
}

/// Like [`lex_single_syntax_kind`], but `None` for malformed tokens.
pub fn lex_single_valid_syntax_kind(text: &str) -> Option<SyntaxKind> {
    match lex_single_syntax_kind(text)? {
        (kind, None) => Some(kind),
        (_, Some(_)) => None,
    }
}

fn shebang_len(text: &str) -> Option<TextSize> {
    let rest = text.strip_prefix("#!")?;
    let next = Tokenizer::new(rest).map(|token| token.kind).find(|kind| !kind.is_trivia());
    if next == Some(T!['[']) {
        return None;
    }
    let line = rest.split('\n').next().unwrap_or_default();
    Some(TextSize::of("#!") + line.text_len())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Base {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hexadecimal = 16,
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    shebang: Option<TextSize>,
    error: Option<(String, Option<TextRange>)>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, cursor: Cursor::new(text), shebang: None, error: None }
    }

    /// Offset of the next token.
    pub fn offset(&self) -> TextSize {
        self.text.text_len() - self.cursor.len()
    }

    fn token_start(&self) -> TextSize {
        self.offset() - self.cursor.pos_within_token()
    }

    fn token_text(&self) -> &'a str {
        let text = self.text;
        &text[TextRange::new(self.token_start(), self.offset())]
    }

    fn error(&mut self, message: impl Into<String>) {
        self.error_at(message, None);
    }

    /// Records an error covering `range`, or the whole token if `None`. Only
    /// the first error of a token is kept.
    fn error_at(&mut self, message: impl Into<String>, range: Option<TextRange>) {
        if self.error.is_none() {
            self.error = Some((message.into(), range));
        }
    }

    fn finish_token(&mut self, kind: SyntaxKind) -> Token {
        let len = self.cursor.pos_within_token();
        let range = TextRange::at(self.token_start(), len);
        self.cursor.reset_pos_within_token();

        let error = self
            .error
            .take()
            .map(|(message, error_range)| SyntaxError::new(message, error_range.unwrap_or(range)));
        trace!("{kind:?}@{range:?}");
        Token { kind, len, error }
    }

    fn token_kind(&mut self) -> SyntaxKind {
        match self.cursor.advance() {
            c if c.is_whitespace() => {
                self.cursor.advance_while(char::is_whitespace);
                WHITESPACE
            }
            '/' if self.cursor.matches('/') => {
                self.cursor.advance_while(|c| c != '\n');
                COMMENT
            }
            '/' if self.cursor.matches('*') => self.block_comment(),

            'r' if self.cursor.matches('#') && is_ident_start(self.cursor.second()) => {
                self.cursor.advance();
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            'r' if matches!(self.cursor.peek(), '#' | '"') => {
                self.raw_string();
                STRING
            }
            'b' if self.cursor.matches('\'') => {
                self.cursor.advance();
                self.single_quoted(Mode::Byte);
                BYTE
            }
            'b' if self.cursor.matches('"') => {
                self.cursor.advance();
                self.double_quoted(Mode::ByteStr);
                BYTE_STRING
            }
            'b' if self.cursor.matches('r') && matches!(self.cursor.second(), '#' | '"') => {
                self.cursor.advance();
                self.raw_string();
                BYTE_STRING
            }

            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                match self.token_text() {
                    "_" => UNDERSCORE,
                    ident => SyntaxKind::from_keyword(ident).unwrap_or(IDENT),
                }
            }
            c @ '0'..='9' => self.number(c),
            '\'' => self.lifetime_or_char(),
            '"' => {
                self.double_quoted(Mode::Str);
                STRING
            }

            c => SyntaxKind::from_char(c).unwrap_or_else(|| {
                self.error("Unknown token");
                ERROR
            }),
        }
    }

    fn block_comment(&mut self) -> SyntaxKind {
        self.cursor.advance();
        let mut depth = 1usize;
        while !self.cursor.is_eof() {
            match self.cursor.advance() {
                '/' if self.cursor.matches('*') => {
                    self.cursor.advance();
                    depth += 1;
                }
                '*' if self.cursor.matches('/') => {
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        return COMMENT;
                    }
                }
                _ => {}
            }
        }
        self.error("Missing trailing `*/` symbols to terminate the block comment");
        COMMENT
    }

    fn lifetime_or_char(&mut self) -> SyntaxKind {
        let first = self.cursor.peek();
        let can_be_lifetime = self.cursor.second() != '\''
            && !self.cursor.is_eof()
            && (is_ident_start(first) || first.is_ascii_digit());
        if !can_be_lifetime {
            self.single_quoted(Mode::Char);
            return CHAR;
        }

        self.cursor.advance();
        self.cursor.advance_while(is_ident_continue);

        // `'ab'` is a char literal with too many chars, not a lifetime.
        if self.cursor.matches('\'') {
            self.cursor.advance();
            self.literal_suffix();
            return CHAR;
        }
        if first.is_ascii_digit() {
            self.error("Lifetime name cannot start with a number");
        }
        LIFETIME_IDENT
    }

    /// Lexes the rest of a char or byte literal, after the opening quote.
    fn single_quoted(&mut self, mode: Mode) {
        let body_start = self.offset();
        if !self.eat_single_quoted() {
            self.error(match mode {
                Mode::Byte => "Missing trailing `'` symbol to terminate the byte literal",
                _ => "Missing trailing `'` symbol to terminate the character literal",
            });
            return;
        }
        let body = TextRange::new(body_start, self.offset() - TextSize::of('\''));
        self.literal_suffix();
        self.check_escapes(body, mode);
    }

    fn eat_single_quoted(&mut self) -> bool {
        // One char literal, possibly a quote or a newline.
        if self.cursor.second() == '\'' && !self.cursor.matches('\\') && !self.cursor.is_eof() {
            self.cursor.advance();
            self.cursor.advance();
            return true;
        }

        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => return false,
                '\'' => {
                    self.cursor.advance();
                    return true;
                }
                // Likely the start of a comment after a stray quote.
                '/' => return false,
                '\n' if self.cursor.second() != '\'' => return false,
                '\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Lexes the rest of a string or byte string, after the opening quote.
    fn double_quoted(&mut self, mode: Mode) {
        let body_start = self.offset();
        while !self.cursor.is_eof() {
            match self.cursor.advance() {
                '"' => {
                    let body = TextRange::new(body_start, self.offset() - TextSize::of('"'));
                    self.literal_suffix();
                    self.check_escapes(body, mode);
                    return;
                }
                '\\' if matches!(self.cursor.peek(), '\\' | '"') => {
                    self.cursor.advance();
                }
                _ => {}
            }
        }
        self.error(match mode {
            Mode::ByteStr => "Missing trailing `\"` symbol to terminate the byte string literal",
            _ => "Missing trailing `\"` symbol to terminate the string literal",
        });
    }

    /// Lexes the rest of a raw string, from the `#` symbols or the quote.
    fn raw_string(&mut self) {
        let mut hashes = 0usize;
        while self.cursor.matches('#') {
            self.cursor.advance();
            hashes += 1;
        }
        if !self.cursor.matches('"') {
            self.error("Missing `\"` symbol after `#` symbols to begin the raw string literal");
            return;
        }
        self.cursor.advance();

        loop {
            if self.cursor.is_eof() {
                self.error(
                    "Missing trailing `\"` with `#` symbols to terminate the raw string literal",
                );
                return;
            }
            if self.cursor.advance() != '"' {
                continue;
            }
            let mut closing = 0usize;
            while closing < hashes && self.cursor.matches('#') {
                self.cursor.advance();
                closing += 1;
            }
            if closing == hashes {
                break;
            }
        }

        if hashes > 255 {
            self.error(
                "Too many `#` symbols: raw strings may be delimited by up to 255 `#` symbols",
            );
        }
        self.literal_suffix();
    }

    fn check_escapes(&mut self, body: TextRange, mode: Mode) {
        let text = self.text;
        let body_text = &text[body];
        let mut first_error = None;
        unescape(body_text, mode, &mut |range, result| {
            if let Err(error) = result {
                first_error.get_or_insert((range, error));
            }
        });

        if let Some((range, error)) = first_error {
            let start = body.start() + TextSize::of(&body_text[..range.start]);
            let range = TextRange::at(start, TextSize::of(&body_text[range]));
            self.error_at(error.message(), Some(range));
        }
    }

    fn number(&mut self, first: char) -> SyntaxKind {
        let mut base = Base::Decimal;
        if first == '0' {
            let prefix = match self.cursor.peek() {
                'b' => Some(Base::Binary),
                'o' => Some(Base::Octal),
                'x' => Some(Base::Hexadecimal),
                _ => None,
            };
            match prefix {
                Some(prefix) => {
                    base = prefix;
                    self.cursor.advance();
                    let has_digits = match base {
                        Base::Hexadecimal => self.eat_hexadecimal_digits(),
                        _ => self.eat_decimal_digits(),
                    };
                    if !has_digits {
                        self.error("Missing digits after the integer base prefix");
                        self.literal_suffix();
                        return INT_NUMBER;
                    }
                    self.check_digits(base);
                }
                None => {
                    self.eat_decimal_digits();
                }
            }
        } else {
            self.eat_decimal_digits();
        }

        let second = self.cursor.second();
        let kind = match self.cursor.peek() {
            // `1..2` and `1.foo()` keep the dot out of the number.
            '.' if second != '.' && !is_ident_start(second) => {
                self.cursor.advance();
                if self.cursor.peek().is_ascii_digit() {
                    self.eat_decimal_digits();
                    if matches!(self.cursor.peek(), 'e' | 'E') {
                        self.cursor.advance();
                        self.exponent();
                    }
                }
                FLOAT_NUMBER
            }
            'e' | 'E' if base != Base::Hexadecimal => {
                self.cursor.advance();
                self.exponent();
                FLOAT_NUMBER
            }
            _ => INT_NUMBER,
        };

        if kind == FLOAT_NUMBER {
            match base {
                Base::Binary => self.error("Binary float literal is not supported"),
                Base::Octal => self.error("Octal float literal is not supported"),
                Base::Hexadecimal => self.error("Hexadecimal float literal is not supported"),
                Base::Decimal => {}
            }
        }
        self.literal_suffix();
        kind
    }

    fn exponent(&mut self) {
        if matches!(self.cursor.peek(), '-' | '+') {
            self.cursor.advance();
        }
        if !self.eat_decimal_digits() {
            self.error("Missing digits after the exponent symbol");
        }
    }

    /// Reports the first digit after a `0b` or `0o` prefix that is too large
    /// for the base.
    fn check_digits(&mut self, base: Base) {
        if !matches!(base, Base::Binary | Base::Octal) {
            return;
        }
        let digits_start = self.token_start() + TextSize::of("0b");
        let text = self.text;
        let digits = &text[TextRange::new(digits_start, self.offset())];
        let invalid = digits.char_indices().find(|&(_, c)| {
            c.to_digit(10).is_some_and(|digit| digit >= base as u32)
        });
        if let Some((index, c)) = invalid {
            let start = digits_start + TextSize::of(&digits[..index]);
            self.error_at(
                format!("Invalid digit for a base {} literal", base as u32),
                Some(TextRange::at(start, TextSize::of(c))),
            );
        }
    }

    fn eat_decimal_digits(&mut self) -> bool {
        let mut has_digits = false;
        loop {
            match self.cursor.peek() {
                '_' => {}
                '0'..='9' => has_digits = true,
                _ => return has_digits,
            }
            self.cursor.advance();
        }
    }

    fn eat_hexadecimal_digits(&mut self) -> bool {
        let mut has_digits = false;
        loop {
            match self.cursor.peek() {
                '_' => {}
                c if c.is_ascii_hexdigit() => has_digits = true,
                _ => return has_digits,
            }
            self.cursor.advance();
        }
    }

    /// Eats an identifier directly after a literal, like `u8` in `1u8`.
    fn literal_suffix(&mut self) {
        if is_ident_start(self.cursor.peek()) {
            self.cursor.advance();
            self.cursor.advance_while(is_ident_continue);
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(len) = self.shebang.take() {
            self.cursor.advance_bytes(len);
            return Some(self.finish_token(SHEBANG));
        }
        if self.cursor.is_eof() {
            return None;
        }
        let kind = self.token_kind();
        Some(self.finish_token(kind))
    }
}

impl FusedIterator for Tokenizer<'_> {}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
