//! Bottom-up builder for the immutable green tree.
//!
//! The builder is driven by a flat stream of `start_node` / `token` /
//! `finish_node` calls. Open nodes live on an explicit stack, so arbitrarily
//! deep input never recurses.

use std::ops::{Deref, DerefMut};

use log::warn;

use crate::{GreenElement, GreenNode, NodeCache, NodeOrToken, SyntaxKind};

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_CHILDREN_LEN: usize = 1024;

enum MaybeOwned<'a, T> {
    Owned(T),
    Borrowed(&'a mut T),
}

impl<T> Deref for MaybeOwned<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Self::Owned(it) => it,
            Self::Borrowed(it) => it,
        }
    }
}

impl<T> DerefMut for MaybeOwned<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match self {
            Self::Owned(it) => it,
            Self::Borrowed(it) => it,
        }
    }
}

/// A position in the children of the innermost open node, used to wrap
/// already-emitted children into a new node with [`GreenNodeBuilder::start_node_at`].
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint(usize);

/// Builds a `GreenNode` from start/token/finish events.
pub struct GreenNodeBuilder<'cache> {
    cache: MaybeOwned<'cache, NodeCache>,
    /// Kind of every open node and the index of its first child in `children`.
    opened: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl Default for GreenNodeBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GreenNodeBuilder<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            warn!("green builder dropped with {} unfinished nodes", self.opened.len());
        }
    }
}

impl GreenNodeBuilder<'_> {
    /// Creates a builder with a private node cache.
    pub fn new() -> GreenNodeBuilder<'static> {
        GreenNodeBuilder::with_maybe_owned(MaybeOwned::Owned(NodeCache::default()))
    }

    /// Creates a builder that interns into `cache`.
    pub fn with_cache(cache: &mut NodeCache) -> GreenNodeBuilder<'_> {
        GreenNodeBuilder::with_maybe_owned(MaybeOwned::Borrowed(cache))
    }

    fn with_maybe_owned(cache: MaybeOwned<'_, NodeCache>) -> GreenNodeBuilder<'_> {
        GreenNodeBuilder {
            cache,
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children: Vec::with_capacity(DEFAULT_CHILDREN_LEN),
        }
    }

    /// Starts a new node of the given kind.
    #[inline]
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.opened.push((kind, self.children.len()));
    }

    /// Adds a token to the innermost open node.
    #[inline]
    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        let token = self.cache.token(kind, text);
        self.children.push(token.into());
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.opened.pop().expect("no opened nodes?");
        let node = self.cache.node(kind, &self.children[first_child..]);
        self.children.truncate(first_child);
        self.children.push(node.into());
    }

    /// Remembers the current position so that the children added after it can
    /// later be wrapped into a node.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Starts a node that adopts every child added since `checkpoint`.
    #[track_caller]
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let Checkpoint(checkpoint) = checkpoint;
        assert!(
            checkpoint <= self.children.len(),
            "checkpoint no longer valid, was `finish_node` called early?"
        );

        if let Some(&(_, first_child)) = self.opened.last() {
            assert!(
                checkpoint >= first_child,
                "checkpoint no longer valid, was an unmatched `start_node_at` called?"
            );
        }

        self.opened.push((kind, checkpoint));
    }

    /// Finishes building and returns the root.
    ///
    /// # Panics
    ///
    /// If a node is still open, or if the events did not produce exactly one
    /// root node.
    #[track_caller]
    pub fn finish(mut self) -> GreenNode {
        assert!(self.opened.is_empty(), "you should call `finish_node()` for every started node");
        assert_eq!(self.children.len(), 1, "expected exactly one root node");
        match self.children.pop() {
            Some(NodeOrToken::Node(node)) => node,
            _ => panic!("the root must be a node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::T;

    #[test]
    fn builds_nested_nodes() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SOURCE_FILE);
        builder.token(IDENT, "foo");
        builder.start_node(TOKEN_TREE);
        builder.token(T!['('], "(");
        builder.token(T![')'], ")");
        builder.finish_node();
        builder.finish_node();
        let root = builder.finish();

        assert_eq!(root.kind(), SOURCE_FILE);
        assert_eq!(root.to_string(), "foo()");
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn checkpoint_wraps_previous_children() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SOURCE_FILE);
        let checkpoint = builder.checkpoint();
        builder.token(T![#], "#");
        builder.token(T!['['], "[");
        builder.token(T![']'], "]");
        builder.start_node_at(checkpoint, ATTR);
        builder.finish_node();
        builder.finish_node();
        let root = builder.finish();

        let kinds: Vec<_> = root.children().map(|child| child.kind()).collect();
        assert_eq!(kinds, [ATTR]);
        assert_eq!(root.to_string(), "#[]");
    }

    #[test]
    fn deep_nesting_builds_and_drops() {
        let depth = 10_000;
        let mut builder = GreenNodeBuilder::new();
        for _ in 0..depth {
            builder.start_node(TOKEN_TREE);
        }
        builder.token(IDENT, "x");
        for _ in 0..depth {
            builder.finish_node();
        }
        let root = builder.finish();

        assert_eq!(root.text_len(), 1.into());
        drop(root);
    }

    #[test]
    fn identical_tokens_are_shared() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SOURCE_FILE);
        builder.token(WHITESPACE, " ");
        builder.token(IDENT, "a");
        builder.token(WHITESPACE, " ");
        builder.finish_node();
        let root = builder.finish();

        let tokens: Vec<_> =
            root.children().filter_map(|child| child.into_token()).cloned().collect();
        assert!(tokens[0].ptr_eq(&tokens[2]));
        assert!(!tokens[0].ptr_eq(&tokens[1]));
    }

    #[test]
    fn shared_cache_makes_roots_identical() {
        let mut cache = NodeCache::new();
        let build = |cache: &mut NodeCache| {
            let mut builder = GreenNodeBuilder::with_cache(cache);
            builder.start_node(SOURCE_FILE);
            builder.start_node(TOKEN_TREE);
            builder.token(T!['{'], "{");
            builder.token(T!['}'], "}");
            builder.finish_node();
            builder.finish_node();
            builder.finish()
        };

        let first = build(&mut cache);
        let second = build(&mut cache);

        assert!(first.ptr_eq(&second));
        assert_eq!(cache.node_count(), 2);
        assert_eq!(cache.token_count(), 2);
    }

    #[test]
    #[should_panic(expected = "you should call `finish_node()`")]
    fn unfinished_node_panics_on_finish() {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SOURCE_FILE);
        builder.finish();
    }
}
