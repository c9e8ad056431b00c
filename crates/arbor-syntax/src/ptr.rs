//! Lightweight locators that find "the same" node again in another tree.
//!
//! A pointer stores only a kind and a range, so it stays valid across edits
//! that do not touch the node and can be kept without holding the tree alive.

use std::hash::{Hash, Hasher};
use std::iter;
use std::marker::PhantomData;

use text_size::TextRange;

use crate::ast::AstNode;
use crate::{Indel, SyntaxKind, SyntaxNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxNodePtr {
    kind: SyntaxKind,
    range: TextRange,
}

impl SyntaxNodePtr {
    pub fn new(node: &SyntaxNode) -> Self {
        Self { kind: node.kind(), range: node.text_range() }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn text_range(&self) -> TextRange {
        self.range
    }

    /// Resolves the pointer against `root`.
    ///
    /// Returns `None` if `root` is not a root or if no node with the same kind
    /// and range exists in it.
    pub fn try_to_node(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        if root.parent().is_some() {
            return None;
        }
        iter::successors(Some(root.clone()), |node| {
            node.child_or_token_at_range(self.range).and_then(|element| element.into_node())
        })
        .find(|node| node.text_range() == self.range && node.kind() == self.kind)
    }

    /// Like [`SyntaxNodePtr::try_to_node`], for pointers known to be valid.
    ///
    /// # Panics
    ///
    /// If the pointer does not resolve.
    #[track_caller]
    pub fn to_node(&self, root: &SyntaxNode) -> SyntaxNode {
        match self.try_to_node(root) {
            Some(node) => node,
            None => panic!("can't resolve {self:?} with {root:?}"),
        }
    }

    pub fn cast<N: AstNode>(self) -> Option<AstPtr<N>> {
        N::can_cast(self.kind).then_some(AstPtr { raw: self, _ty: PhantomData })
    }

    /// Moves the pointer across `edit`. `None` if the edit touches the node.
    pub fn after_edit(&self, edit: &Indel) -> Option<Self> {
        let range = edit.shift_range(self.range)?;
        Some(Self { kind: self.kind, range })
    }
}

/// A [`SyntaxNodePtr`] that remembers the typed view it was created from.
pub struct AstPtr<N: AstNode> {
    raw: SyntaxNodePtr,
    _ty: PhantomData<fn() -> N>,
}

impl<N: AstNode> AstPtr<N> {
    pub fn new(node: &N) -> Self {
        Self { raw: SyntaxNodePtr::new(node.syntax()), _ty: PhantomData }
    }

    pub fn try_to_node(&self, root: &SyntaxNode) -> Option<N> {
        self.raw.try_to_node(root).and_then(N::cast)
    }

    /// # Panics
    ///
    /// If the pointer does not resolve.
    #[track_caller]
    pub fn to_node(&self, root: &SyntaxNode) -> N {
        match self.try_to_node(root) {
            Some(node) => node,
            None => panic!("can't resolve {:?} with {root:?}", self.raw),
        }
    }

    pub fn syntax_node_ptr(&self) -> SyntaxNodePtr {
        self.raw
    }

    pub fn text_range(&self) -> TextRange {
        self.raw.text_range()
    }

    pub fn cast<U: AstNode>(self) -> Option<AstPtr<U>> {
        self.raw.cast()
    }

    /// Widens the pointer to a type that `N` always casts to.
    pub fn upcast<M: AstNode>(self) -> AstPtr<M>
    where
        N: Into<M>,
    {
        AstPtr { raw: self.raw, _ty: PhantomData }
    }
}

impl<N: AstNode> std::fmt::Debug for AstPtr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AstPtr").field(&self.raw).finish()
    }
}

impl<N: AstNode> Clone for AstPtr<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: AstNode> Copy for AstPtr<N> {}

impl<N: AstNode> PartialEq for AstPtr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<N: AstNode> Eq for AstPtr<N> {}

impl<N: AstNode> Hash for AstPtr<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<N: AstNode> From<AstPtr<N>> for SyntaxNodePtr {
    fn from(ptr: AstPtr<N>) -> Self {
        ptr.raw
    }
}
