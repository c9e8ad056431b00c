use arbor_errors::SyntaxError;
use arbor_syntax::SyntaxKind;
use arbor_tokenizer::tokenize;
use text_size::{TextRange, TextSize};

/// The tokens of a text, with their offsets.
pub(crate) struct Lexed<'a> {
    text: &'a str,
    kinds: Vec<SyntaxKind>,
    /// One entry per token plus the end of the text.
    starts: Vec<TextSize>,
    errors: Vec<Option<SyntaxError>>,
}

impl<'a> Lexed<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut kinds = Vec::new();
        let mut starts = vec![TextSize::new(0)];
        let mut errors = Vec::new();
        let mut offset = TextSize::new(0);

        for token in tokenize(text) {
            offset += token.len;
            kinds.push(token.kind);
            starts.push(offset);
            errors.push(token.error);
        }
        Self { text, kinds, starts, errors }
    }

    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    pub(crate) fn kind(&self, index: usize) -> SyntaxKind {
        self.kinds.get(index).copied().unwrap_or(SyntaxKind::EOF)
    }

    pub(crate) fn kinds(&self) -> &[SyntaxKind] {
        &self.kinds
    }

    /// Range of the token at `index`, or an empty range at the end of the
    /// text past the last token.
    pub(crate) fn range(&self, index: usize) -> TextRange {
        let end_of_text = self.starts[self.len()];
        let start = self.starts.get(index).copied().unwrap_or(end_of_text);
        let end = self.starts.get(index + 1).copied().unwrap_or(end_of_text);
        TextRange::new(start, end)
    }

    pub(crate) fn text(&self, index: usize) -> &'a str {
        let text = self.text;
        &text[self.range(index)]
    }

    pub(crate) fn error(&self, index: usize) -> Option<&SyntaxError> {
        self.errors.get(index)?.as_ref()
    }
}
