use std::fmt;

use text_size::{TextRange, TextSize};

use crate::{NodeOrToken, SyntaxNode, SyntaxToken};

/// The text of a node, or of a range inside it, viewed as a sequence of token
/// chunks without being copied into one string.
#[derive(Clone)]
pub struct SyntaxText {
    node: SyntaxNode,
    range: TextRange,
}

impl SyntaxText {
    pub(crate) fn new(node: SyntaxNode) -> Self {
        let range = node.text_range();
        Self { node, range }
    }

    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn contains_char(&self, c: char) -> bool {
        self.try_for_each_chunk(|chunk| if chunk.contains(c) { Err(()) } else { Ok(()) }).is_err()
    }

    /// Offset of the first `c`, relative to the start of this text.
    pub fn find_char(&self, c: char) -> Option<TextSize> {
        let mut acc = TextSize::new(0);
        let res = self.try_for_each_chunk(|chunk| {
            if let Some(pos) = chunk.find(c) {
                return Err(acc + TextSize::of(&chunk[..pos]));
            }
            acc += TextSize::of(chunk);
            Ok(())
        });
        res.err()
    }

    /// The character starting at `offset`, relative to the start of this
    /// text. `None` if `offset` is out of bounds or not on a char boundary.
    pub fn char_at(&self, offset: TextSize) -> Option<char> {
        let mut start = TextSize::new(0);
        let res = self.try_for_each_chunk(|chunk| {
            let end = start + TextSize::of(chunk);
            if start <= offset && offset < end {
                let off = usize::from(offset - start);
                return Err(chunk.get(off..).and_then(|rest| rest.chars().next()));
            }
            start = end;
            Ok(())
        });
        res.err().flatten()
    }

    /// Narrows the view to `range`, given relative to the start of this text.
    ///
    /// # Panics
    ///
    /// If `range` extends past the end of this text.
    #[track_caller]
    pub fn slice(&self, range: TextRange) -> Self {
        assert!(
            range.end() <= self.len(),
            "invalid slice, range: {range:?}, text length: {:?}",
            self.len()
        );
        let range = range + self.range.start();
        Self { node: self.node.clone(), range }
    }

    pub fn try_fold_chunks<T, F, E>(&self, init: T, mut f: F) -> Result<T, E>
    where
        F: FnMut(T, &str) -> Result<T, E>,
    {
        self.tokens_with_ranges()
            .try_fold(init, move |acc, (token, range)| f(acc, &token.text()[range]))
    }

    pub fn try_for_each_chunk<F: FnMut(&str) -> Result<(), E>, E>(
        &self,
        mut f: F,
    ) -> Result<(), E> {
        self.try_fold_chunks((), move |(), chunk| f(chunk))
    }

    pub fn for_each_chunk<F: FnMut(&str)>(&self, mut f: F) {
        enum Void {}
        match self.try_for_each_chunk(|chunk| Ok::<(), Void>(f(chunk))) {
            Ok(()) => (),
            Err(void) => match void {},
        }
    }

    /// Tokens overlapping the view, each with the sub-range of its own text
    /// that falls inside the view.
    fn tokens_with_ranges(&self) -> impl Iterator<Item = (SyntaxToken, TextRange)> + use<> {
        let text_range = self.range;
        self.node.descendants_with_tokens().filter_map(NodeOrToken::into_token).filter_map(
            move |token| {
                let token_range = token.text_range();
                let range = text_range.intersect(token_range)?;
                if range.is_empty() && !token_range.is_empty() {
                    return None;
                }
                Some((token, range - token_range.start()))
            },
        )
    }
}

impl fmt::Debug for SyntaxText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string(), f)
    }
}

impl fmt::Display for SyntaxText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.try_for_each_chunk(|chunk| f.write_str(chunk))
    }
}

impl From<SyntaxText> for String {
    fn from(text: SyntaxText) -> String {
        text.to_string()
    }
}

impl PartialEq<str> for SyntaxText {
    fn eq(&self, mut rhs: &str) -> bool {
        self.try_for_each_chunk(|chunk| {
            if !rhs.starts_with(chunk) {
                return Err(());
            }
            rhs = &rhs[chunk.len()..];
            Ok(())
        })
        .is_ok()
            && rhs.is_empty()
    }
}

impl PartialEq<SyntaxText> for str {
    fn eq(&self, rhs: &SyntaxText) -> bool {
        rhs == self
    }
}

impl PartialEq<&str> for SyntaxText {
    fn eq(&self, rhs: &&str) -> bool {
        self == *rhs
    }
}

impl PartialEq<SyntaxText> for &str {
    fn eq(&self, rhs: &SyntaxText) -> bool {
        rhs == self
    }
}

impl PartialEq for SyntaxText {
    fn eq(&self, other: &Self) -> bool {
        if self.range.len() != other.range.len() {
            return false;
        }
        self.to_string() == other.to_string()
    }
}

impl Eq for SyntaxText {}

#[cfg(test)]
mod tests {
    use text_size::{TextRange, TextSize};

    use crate::SyntaxKind::*;
    use crate::{GreenNodeBuilder, SyntaxNode, T};

    fn build_tree(chunks: &[&str]) -> SyntaxNode {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SOURCE_FILE);
        for &chunk in chunks {
            builder.token(IDENT, chunk);
        }
        builder.finish_node();
        SyntaxNode::new_root(builder.finish())
    }

    fn nested_tree() -> SyntaxNode {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SOURCE_FILE);
        builder.token(IDENT, "foo");
        builder.start_node(TOKEN_TREE);
        builder.token(T!['('], "(");
        builder.token(IDENT, "bar");
        builder.token(T![')'], ")");
        builder.finish_node();
        builder.finish_node();
        SyntaxNode::new_root(builder.finish())
    }

    #[test]
    fn text_equality() {
        fn do_check(t1: &[&str], t2: &[&str]) {
            let t1 = build_tree(t1).text();
            let t2 = build_tree(t2).text();
            let expected = t1.to_string() == t2.to_string();
            let actual = t1 == t2;
            assert_eq!(expected, actual, "`{t1}` (SyntaxText) `{t2}` (SyntaxText)");
            let actual = t1 == *t2.to_string();
            assert_eq!(expected, actual, "`{t1}` (SyntaxText) `{t2}` (&str)");
        }
        fn check(t1: &[&str], t2: &[&str]) {
            do_check(t1, t2);
            do_check(t2, t1)
        }

        check(&[""], &[""]);
        check(&["a"], &[""]);
        check(&["a"], &["a"]);
        check(&["abc"], &["def"]);
        check(&["hello", "world"], &["hello", "world"]);
        check(&["hellowo", "rld"], &["hell", "oworld"]);
        check(&["hel", "lowo", "rld"], &["helloworld"]);
        check(&["{", "abc", "}"], &["{", "123", "}"]);
        check(&["{", "abc", "}", "{"], &["{", "123", "}"]);
        check(&["{", "abc", "}"], &["{", "123", "}", "{"]);
        check(&["{", "abc", "}ab"], &["{", "abc", "}", "ab"]);
    }

    #[test]
    fn char_queries() {
        let text = nested_tree().text();

        assert_eq!(text.len(), TextSize::new(8));
        assert!(text.contains_char('b'));
        assert!(!text.contains_char('z'));
        assert_eq!(text.find_char('('), Some(TextSize::new(3)));
        assert_eq!(text.find_char('r'), Some(TextSize::new(6)));
        assert_eq!(text.char_at(TextSize::new(4)), Some('b'));
        assert_eq!(text.char_at(TextSize::new(8)), None);
    }

    #[test]
    fn slices_are_relative() {
        let text = nested_tree().text();

        let slice = text.slice(TextRange::new(2.into(), 6.into()));
        assert_eq!(slice, "o(ba");
        assert_eq!(slice.char_at(TextSize::new(1)), Some('('));

        let nested = slice.slice(TextRange::new(1.into(), 3.into()));
        assert_eq!(nested, "(b");
        assert!(text.slice(TextRange::empty(4.into())).is_empty());
    }

    #[test]
    fn subtree_text_uses_absolute_ranges() {
        let root = nested_tree();
        let tree = root.first_child().unwrap();

        let text = tree.text();
        assert_eq!(text, "(bar)");
        assert_eq!(text.find_char('b'), Some(TextSize::new(1)));
        assert_eq!(text.to_string(), "(bar)");
    }
}
