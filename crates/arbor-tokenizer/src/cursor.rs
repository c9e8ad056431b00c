use std::str::Chars;

use text_size::{TextLen as _, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

/// Peekable char iterator that tracks the length of the token being lexed.
#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    chars: Chars<'a>,
    len: TextSize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { chars: text.chars(), len: text.text_len() }
    }

    /// Bytes left to lex.
    pub(crate) fn len(&self) -> TextSize {
        self.chars.as_str().text_len()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn pos_within_token(&self) -> TextSize {
        self.len - self.len()
    }

    pub(crate) fn reset_pos_within_token(&mut self) {
        self.len = self.len();
    }

    /// The next char, or `EOF_CHAR`. A literal `'\0'` in the input is only
    /// told apart from the end by `is_eof`.
    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        self.peek() == c && !self.is_eof()
    }

    pub(crate) fn advance(&mut self) -> char {
        self.chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Skips `len` bytes, which must end on a char boundary.
    pub(crate) fn advance_bytes(&mut self, len: TextSize) {
        let rest = self.chars.as_str();
        self.chars = rest.get(usize::from(len)..).unwrap_or_default().chars();
    }
}
