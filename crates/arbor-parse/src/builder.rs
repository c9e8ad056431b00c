use arbor_errors::SyntaxError;
use arbor_syntax::{GreenNode, GreenNodeBuilder, NodeCache, SyntaxKind, SyntaxNode};

use crate::Parse;

/// A [`GreenNodeBuilder`] that also collects the errors found while
/// building.
#[derive(Default)]
pub struct SyntaxTreeBuilder<'cache> {
    errors: Vec<SyntaxError>,
    inner: GreenNodeBuilder<'cache>,
}

impl SyntaxTreeBuilder<'static> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'cache> SyntaxTreeBuilder<'cache> {
    pub fn with_cache(cache: &'cache mut NodeCache) -> Self {
        Self { errors: Vec::new(), inner: GreenNodeBuilder::with_cache(cache) }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.inner.start_node(kind);
    }

    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        self.inner.token(kind, text);
    }

    #[track_caller]
    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn error(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    /// Returns the root and the errors, ordered by position.
    #[track_caller]
    pub fn finish_raw(self) -> (GreenNode, Vec<SyntaxError>) {
        let Self { mut errors, inner } = self;
        errors.sort_by_key(|error| error.range().start());
        (inner.finish(), errors)
    }

    #[track_caller]
    pub fn finish(self) -> Parse<SyntaxNode> {
        let (green, errors) = self.finish_raw();
        Parse::new(green, errors)
    }
}

#[cfg(test)]
mod tests {
    use arbor_syntax::SyntaxKind::*;
    use arbor_syntax::T;
    use text_size::TextRange;

    use super::*;

    #[test]
    fn collects_errors_in_order() {
        let mut builder = SyntaxTreeBuilder::new();
        builder.start_node(SOURCE_FILE);
        builder.token(IDENT, "a");
        builder.error(SyntaxError::new("second", TextRange::new(1.into(), 2.into())));
        builder.token(T![')'], ")");
        builder.error(SyntaxError::new("first", TextRange::new(0.into(), 1.into())));
        builder.finish_node();

        let parse = builder.finish();
        assert_eq!(parse.syntax_node().to_string(), "a)");
        let errors = parse.errors();
        let messages: Vec<_> = errors.iter().map(|error| error.message()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn shares_nodes_through_a_cache() {
        fn build(cache: &mut NodeCache) -> GreenNode {
            let mut builder = SyntaxTreeBuilder::with_cache(cache);
            builder.start_node(SOURCE_FILE);
            builder.token(IDENT, "a");
            builder.finish_node();
            builder.finish_raw().0
        }

        let mut cache = NodeCache::new();
        let first = build(&mut cache);
        let second = build(&mut cache);
        assert!(first.ptr_eq(&second));
    }
}
