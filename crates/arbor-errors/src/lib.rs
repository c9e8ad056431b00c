use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;
use text_size::TextSize;

/// A lexical or structural problem in the source text.
///
/// Errors never stop tokenizing or parsing; they are collected next to the
/// tree they describe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    message: String,
    range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range }
    }

    pub fn new_at_offset(message: impl Into<String>, offset: TextSize) -> Self {
        Self::new(message, TextRange::empty(offset))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let message = Level::Error.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let error = SyntaxError::new("Unknown token", TextRange::new(2.into(), 3.into()));
        assert_eq!(error.to_string(), "Unknown token");
        assert_eq!(error.message(), "Unknown token");

        let moved = error.with_range(TextRange::empty(5.into()));
        assert_eq!(moved.range(), TextRange::empty(5.into()));
        assert_eq!(moved, SyntaxError::new_at_offset("Unknown token", 5.into()));
    }

    #[test]
    fn renders_an_annotated_snippet() {
        let text = "fn main() {\n    let x = 'ab';\n}\n";
        let error = SyntaxError::new(
            "Character literal should be one character long",
            TextRange::new(24.into(), 28.into()),
        );

        let rendered = error.render(&Renderer::plain(), "main.rs", text).to_string();
        assert!(rendered.starts_with("error: Character literal should be one character long"));
        assert!(rendered.contains("--> main.rs:2:13"), "{rendered}");
        assert!(rendered.contains("2 |     let x = 'ab';"), "{rendered}");
        assert!(rendered.contains("^^^^ here"), "{rendered}");
    }
}
