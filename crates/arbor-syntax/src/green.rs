//! Immutable, position-independent syntax tree storage.
//!
//! Green nodes know their kind, their text length and their children, but not
//! their parent or absolute position, so identical subtrees can be shared
//! between trees.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::RangeBounds;

use text_size::{TextRange, TextSize};
use triomphe::Arc;

use crate::{NodeOrToken, SyntaxKind};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;
pub type GreenElementRef<'a> = NodeOrToken<&'a GreenNode, &'a GreenToken>;

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        self.as_ref().kind()
    }

    pub fn text_len(&self) -> TextSize {
        self.as_ref().text_len()
    }
}

impl GreenElementRef<'_> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_len(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        }
    }

    /// Address of the shared allocation, used for identity-based interning.
    pub(crate) fn addr(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.addr(),
            NodeOrToken::Token(token) => token.addr(),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        NodeOrToken::Token(token)
    }
}

/// Leaf of the green tree.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

#[derive(PartialEq, Eq, Hash)]
struct GreenTokenData {
    kind: SyntaxKind,
    text: Box<str>,
}

impl GreenToken {
    pub fn new(kind: SyntaxKind, text: &str) -> Self {
        Self { data: Arc::new(GreenTokenData { kind, text: text.into() }) }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.data.text
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        TextSize::of(self.text())
    }

    /// Returns `true` if both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.data) as usize
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenToken")
            .field("kind", &self.kind())
            .field("text", &self.text())
            .finish()
    }
}

impl fmt::Display for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Internal node in the immutable tree. It has other nodes and tokens as
/// children.
#[derive(Clone)]
pub struct GreenNode {
    data: Arc<GreenNodeData>,
}

struct GreenNodeData {
    kind: SyntaxKind,
    text_len: TextSize,
    children: Box<[GreenChild]>,
}

impl Drop for GreenNodeData {
    fn drop(&mut self) {
        // Tear down uniquely owned descendants with an explicit stack, so that
        // dropping a deep tree does not recurse once per level.
        let mut stack = Vec::new();
        detach_nodes(&mut self.children, &mut stack);
        while let Some(mut node) = stack.pop() {
            if let Some(data) = Arc::get_mut(&mut node.data) {
                detach_nodes(&mut data.children, &mut stack);
            }
        }
    }
}

fn detach_nodes(children: &mut Box<[GreenChild]>, stack: &mut Vec<GreenNode>) {
    if children.iter().all(|child| child.element.as_node().is_none()) {
        return;
    }
    for child in std::mem::take(children) {
        if let NodeOrToken::Node(node) = child.element {
            stack.push(node);
        }
    }
}

/// A child together with its offset relative to the parent's start.
#[derive(Clone)]
pub(crate) struct GreenChild {
    pub(crate) rel_offset: TextSize,
    pub(crate) element: GreenElement,
}

impl GreenChild {
    #[inline]
    pub(crate) fn rel_range(&self) -> TextRange {
        TextRange::at(self.rel_offset, self.element.text_len())
    }
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: impl IntoIterator<Item = GreenElement>) -> Self {
        let mut text_len = TextSize::new(0);
        let children = children
            .into_iter()
            .map(|element| {
                let rel_offset = text_len;
                text_len += element.text_len();
                GreenChild { rel_offset, element }
            })
            .collect();

        Self { data: Arc::new(GreenNodeData { kind, text_len, children }) }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    /// Iterates over the direct children.
    #[inline]
    pub fn children(
        &self,
    ) -> impl ExactSizeIterator<Item = GreenElementRef<'_>> + DoubleEndedIterator + Clone {
        self.data.children.iter().map(|child| child.element.as_ref())
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[GreenChild] {
        &self.data.children
    }

    /// Finds the child whose range contains `rel_range` (relative to this node).
    pub(crate) fn child_at_range(&self, rel_range: TextRange) -> Option<(usize, &GreenChild)> {
        let slots = self.slots();
        let first = slots.partition_point(|child| child.rel_range().end() < rel_range.start());

        slots[first..]
            .iter()
            .enumerate()
            .take_while(|(_, child)| child.rel_offset <= rel_range.start())
            .find(|(_, child)| child.rel_range().contains_range(rel_range))
            .map(|(index, child)| (first + index, child))
    }

    /// Returns a new node with the children in `range` replaced.
    ///
    /// `self` is left untouched; all other children are shared by reference.
    pub fn splice_children<R, I>(&self, range: R, replace_with: I) -> Self
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = GreenElement>,
    {
        let mut children: Vec<_> = self.children().map(|child| child.cloned()).collect();
        children.splice(range, replace_with).for_each(drop);
        Self::new(self.kind(), children)
    }

    #[track_caller]
    pub fn replace_child(&self, index: usize, new_child: GreenElement) -> Self {
        assert!(index < self.slots().len(), "child index {index} out of bounds");
        self.splice_children(index..=index, Some(new_child))
    }

    #[track_caller]
    pub fn insert_child(&self, index: usize, new_child: GreenElement) -> Self {
        assert!(index <= self.slots().len(), "child index {index} out of bounds");
        self.splice_children(index..index, Some(new_child))
    }

    #[track_caller]
    pub fn remove_child(&self, index: usize) -> Self {
        assert!(index < self.slots().len(), "child index {index} out of bounds");
        self.splice_children(index..=index, None)
    }

    /// Returns `true` if both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.data) as usize
    }
}

/// Structural equality. Shared subtrees are compared by address.
impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((left, right)) = stack.pop() {
            if left.ptr_eq(right) {
                continue;
            }
            if left.kind() != right.kind()
                || left.text_len() != right.text_len()
                || left.slots().len() != right.slots().len()
            {
                return false;
            }
            for pair in left.children().zip(right.children()) {
                match pair {
                    (NodeOrToken::Node(left), NodeOrToken::Node(right)) => {
                        stack.push((left, right));
                    }
                    (NodeOrToken::Token(left), NodeOrToken::Token(right)) => {
                        if left != right {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for GreenNode {}

impl Hash for GreenNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.kind().hash(state);
            node.slots().len().hash(state);
            for child in node.children() {
                match child {
                    NodeOrToken::Node(child) => stack.push(child),
                    NodeOrToken::Token(token) => token.hash(state),
                }
            }
        }
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("text_len", &self.text_len())
            .field("n_children", &self.slots().len())
            .finish()
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![self.children()];
        while let Some(children) = stack.last_mut() {
            match children.next() {
                Some(NodeOrToken::Node(node)) => stack.push(node.children()),
                Some(NodeOrToken::Token(token)) => f.write_str(token.text())?,
                None => {
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    fn ident(text: &str) -> GreenElement {
        GreenToken::new(IDENT, text).into()
    }

    #[test]
    fn text_len_and_offsets() {
        let node = GreenNode::new(
            TOKEN_TREE,
            [
                GreenToken::new(L_PAREN, "(").into(),
                ident("abc"),
                GreenToken::new(R_PAREN, ")").into(),
            ],
        );

        assert_eq!(node.text_len(), TextSize::new(5));
        assert_eq!(node.to_string(), "(abc)");
        let offsets: Vec<u32> = node.slots().iter().map(|child| child.rel_offset.into()).collect();
        assert_eq!(offsets, [0, 1, 4]);
    }

    #[test]
    fn replace_child_shares_untouched_children() {
        let inner = GreenNode::new(TOKEN_TREE, [ident("x")]);
        let node = GreenNode::new(SOURCE_FILE, [inner.clone().into(), ident("y")]);

        let edited = node.replace_child(1, ident("zz"));

        assert_eq!(node.to_string(), "xy");
        assert_eq!(edited.to_string(), "xzz");
        let first = edited.children().next().and_then(|child| child.into_node()).cloned();
        assert!(first.is_some_and(|first| first.ptr_eq(&inner)));
    }

    #[test]
    fn insert_and_remove_children() {
        let node = GreenNode::new(SOURCE_FILE, [ident("a"), ident("c")]);

        let inserted = node.insert_child(1, ident("b"));
        assert_eq!(inserted.to_string(), "abc");

        let removed = inserted.remove_child(0);
        assert_eq!(removed.to_string(), "bc");
        assert_eq!(removed.text_len(), TextSize::new(2));
    }

    #[test]
    fn child_at_range_prefers_containing_child() {
        let node = GreenNode::new(SOURCE_FILE, [ident("abc"), ident("def")]);

        let (index, _) = node.child_at_range(TextRange::new(3.into(), 6.into())).unwrap();
        assert_eq!(index, 1);
        let (index, _) = node.child_at_range(TextRange::new(1.into(), 2.into())).unwrap();
        assert_eq!(index, 0);
        assert!(node.child_at_range(TextRange::new(2.into(), 4.into())).is_none());
    }

    #[test]
    fn structural_equality_is_not_identity() {
        let a = GreenNode::new(SOURCE_FILE, [ident("a")]);
        let b = GreenNode::new(SOURCE_FILE, [ident("a")]);

        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
        assert_ne!(a, GreenNode::new(SOURCE_FILE, [ident("b")]));
        assert_ne!(a, GreenNode::new(TOKEN_TREE, [ident("a")]));
        let wrapped = GreenNode::new(TOKEN_TREE, [ident("a")]);
        assert_ne!(a, GreenNode::new(SOURCE_FILE, [wrapped.into()]));
    }

    fn nested(depth: usize, leaf: &str) -> GreenNode {
        let mut node = GreenNode::new(TOKEN_TREE, [ident(leaf)]);
        for _ in 0..depth {
            node = GreenNode::new(TOKEN_TREE, [node.into()]);
        }
        node
    }

    fn hash_of(node: &GreenNode) -> u64 {
        use std::hash::BuildHasher as _;
        rustc_hash::FxBuildHasher.hash_one(node)
    }

    #[test]
    fn deep_trees_compare_and_hash_without_recursion() {
        let depth = 100_000;
        let a = nested(depth, "x");
        let b = nested(depth, "x");

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, nested(depth, "y"));
        assert_ne!(a, nested(depth - 1, "x"));
    }
}
