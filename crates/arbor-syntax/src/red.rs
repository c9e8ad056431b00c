//! Position-aware cursors over the green tree.
//!
//! A cursor is created on demand from its parent cursor and holds a strong
//! reference to it. Parents never point at their children, so cursors form no
//! cycles and can be dropped and recomputed at any time.

use std::hash::{Hash, Hasher};
use std::iter::{self, FusedIterator};
use std::fmt;

use text_size::{TextRange, TextSize};
use triomphe::Arc;

use crate::cursor::{Preorder, PreorderWithTokens};
use crate::green::GreenChild;
use crate::{
    Direction, GreenNode, GreenToken, NodeOrToken, SyntaxKind, SyntaxText, TokenAtOffset,
    WalkEvent,
};

pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

#[derive(Clone)]
pub struct SyntaxNode {
    data: Arc<NodeData>,
}

struct NodeData {
    parent: Option<SyntaxNode>,
    index: u32,
    offset: TextSize,
    green: GreenNode,
}

impl Drop for NodeData {
    fn drop(&mut self) {
        // Unlink uniquely owned ancestors one by one instead of recursing
        // through the whole parent chain.
        let mut parent = self.parent.take();
        while let Some(mut node) = parent {
            parent = Arc::get_mut(&mut node.data).and_then(|data| data.parent.take());
        }
    }
}

#[derive(Clone)]
pub struct SyntaxToken {
    data: Arc<TokenData>,
}

struct TokenData {
    parent: SyntaxNode,
    index: u32,
    offset: TextSize,
    green: GreenToken,
}

impl SyntaxNode {
    /// Creates the root cursor of a green tree.
    pub fn new_root(green: GreenNode) -> Self {
        Self::new(None, 0, TextSize::new(0), green)
    }

    fn new(parent: Option<Self>, index: u32, offset: TextSize, green: GreenNode) -> Self {
        Self { data: Arc::new(NodeData { parent, index, offset, green }) }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.green.kind()
    }

    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.data.offset, self.data.green.text_len())
    }

    /// Position of this node among the children of its parent.
    #[inline]
    pub fn index(&self) -> usize {
        self.data.index as usize
    }

    pub fn text(&self) -> SyntaxText {
        SyntaxText::new(self.clone())
    }

    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.data.green
    }

    #[inline]
    pub fn parent(&self) -> Option<Self> {
        self.data.parent.clone()
    }

    /// Iterates over this node and all of its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + use<> {
        iter::successors(Some(self.clone()), Self::parent)
    }

    pub fn children(&self) -> SyntaxNodeChildren {
        SyntaxNodeChildren::new(self.clone(), 0, self.children_len())
    }

    pub fn children_with_tokens(&self) -> SyntaxElementChildren {
        SyntaxElementChildren { parent: self.clone(), front: 0, back: self.children_len() }
    }

    pub fn first_child(&self) -> Option<Self> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<Self> {
        self.children().next_back()
    }

    pub fn first_child_or_token(&self) -> Option<SyntaxElement> {
        self.child_element(0)
    }

    pub fn last_child_or_token(&self) -> Option<SyntaxElement> {
        self.children_len().checked_sub(1).and_then(|index| self.child_element(index))
    }

    pub fn next_sibling(&self) -> Option<Self> {
        let parent = self.data.parent.as_ref()?;
        SyntaxNodeChildren::new(parent.clone(), self.index() + 1, parent.children_len()).next()
    }

    pub fn prev_sibling(&self) -> Option<Self> {
        let parent = self.data.parent.as_ref()?;
        SyntaxNodeChildren::new(parent.clone(), 0, self.index()).next_back()
    }

    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement> {
        self.data.parent.as_ref()?.child_element(self.index() + 1)
    }

    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement> {
        let index = self.index().checked_sub(1)?;
        self.data.parent.as_ref()?.child_element(index)
    }

    /// Iterates over this node and its sibling nodes in `direction`.
    pub fn siblings(&self, direction: Direction) -> impl Iterator<Item = Self> + use<> {
        iter::successors(Some(self.clone()), move |node| match direction {
            Direction::Next => node.next_sibling(),
            Direction::Prev => node.prev_sibling(),
        })
    }

    /// Iterates over this node and its sibling elements in `direction`.
    pub fn siblings_with_tokens(
        &self,
        direction: Direction,
    ) -> impl Iterator<Item = SyntaxElement> + use<> {
        iter::successors(Some(SyntaxElement::Node(self.clone())), move |element| {
            match direction {
                Direction::Next => element.next_sibling_or_token(),
                Direction::Prev => element.prev_sibling_or_token(),
            }
        })
    }

    pub fn first_token(&self) -> Option<SyntaxToken> {
        let mut node = self.clone();
        loop {
            match node.first_child_or_token()? {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    pub fn last_token(&self) -> Option<SyntaxToken> {
        let mut node = self.clone();
        loop {
            match node.last_child_or_token()? {
                NodeOrToken::Node(child) => node = child,
                NodeOrToken::Token(token) => return Some(token),
            }
        }
    }

    /// All nodes of the subtree in preorder, starting with `self`.
    pub fn descendants(&self) -> impl Iterator<Item = Self> + use<> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// All nodes and tokens of the subtree in preorder, starting with `self`.
    pub fn descendants_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + use<> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEvent::Enter(element) => Some(element),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Enter/leave events for every node of the subtree.
    pub fn preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// Enter/leave events for every node and token of the subtree.
    pub fn preorder_with_tokens(&self) -> PreorderWithTokens {
        PreorderWithTokens::new(self.clone())
    }

    /// Finds the tokens touching `offset`.
    ///
    /// An offset strictly inside a token yields `Single`; an offset on the
    /// boundary of two tokens yields `Between`. Offsets outside the node, and
    /// empty nodes, yield `None`.
    pub fn token_at_offset(&self, offset: TextSize) -> TokenAtOffset<SyntaxToken> {
        let range = self.text_range();
        if range.is_empty() || offset < range.start() || range.end() < offset {
            return TokenAtOffset::None;
        }

        let mut node = self.clone();
        loop {
            let (left, right) = match node.children_at_offset(offset) {
                (Some(NodeOrToken::Node(child)), None) => {
                    node = child;
                    continue;
                }
                (Some(NodeOrToken::Token(token)), None) => return TokenAtOffset::Single(token),
                (Some(left), Some(right)) => (left, right),
                (None, _) => return TokenAtOffset::None,
            };
            let left = edge_token_at_offset(left, offset, Direction::Prev);
            let right = edge_token_at_offset(right, offset, Direction::Next);
            return match (left, right) {
                (Some(left), Some(right)) => TokenAtOffset::Between(left, right),
                (Some(token), None) | (None, Some(token)) => TokenAtOffset::Single(token),
                (None, None) => TokenAtOffset::None,
            };
        }
    }

    /// The non-empty children touching `offset`, left to right. There are
    /// two only when `offset` is the boundary between them.
    fn children_at_offset(
        &self,
        offset: TextSize,
    ) -> (Option<SyntaxElement>, Option<SyntaxElement>) {
        let Some(rel_offset) = offset.checked_sub(self.data.offset) else {
            return (None, None);
        };
        let slots = self.data.green.slots();
        let first = slots.partition_point(|child| child.rel_range().end() < rel_offset);
        let mut candidates = slots[first..]
            .iter()
            .enumerate()
            .take_while(|(_, child)| child.rel_offset <= rel_offset)
            .filter(|(_, child)| !child.rel_range().is_empty())
            .map(|(index, child)| self.make_child(first + index, child));
        (candidates.next(), candidates.next())
    }

    /// Returns the smallest node or token that covers `range`.
    ///
    /// # Panics
    ///
    /// If `range` is not contained in this node.
    #[track_caller]
    pub fn covering_element(&self, range: TextRange) -> SyntaxElement {
        assert!(
            self.text_range().contains_range(range),
            "range {range:?} is not inside the node {:?}",
            self.text_range()
        );

        let mut node = self.clone();
        loop {
            match node.child_or_token_at_range(range) {
                Some(NodeOrToken::Node(child)) => node = child,
                Some(NodeOrToken::Token(token)) => return token.into(),
                None => return node.into(),
            }
        }
    }

    /// Returns the direct child that contains `range`, if any.
    pub fn child_or_token_at_range(&self, range: TextRange) -> Option<SyntaxElement> {
        let rel_range = range.checked_sub(self.data.offset)?;
        let (index, child) = self.data.green.child_at_range(rel_range)?;
        Some(self.make_child(index, child))
    }

    /// Returns the root of a new tree in which this node is replaced by
    /// `replacement`. Every subtree off the path to the root is shared.
    #[track_caller]
    pub fn replace_with(&self, replacement: GreenNode) -> GreenNode {
        assert_eq!(self.kind(), replacement.kind(), "replacement must keep the node kind");

        let mut green = replacement;
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            green = parent.green().replace_child(node.index(), green.into());
            node = parent;
        }
        green
    }

    /// Detaches this subtree into a new tree rooted at offset zero.
    pub fn clone_subtree(&self) -> Self {
        Self::new_root(self.green().clone())
    }

    fn children_len(&self) -> usize {
        self.data.green.slots().len()
    }

    fn child_element(&self, index: usize) -> Option<SyntaxElement> {
        let child = self.data.green.slots().get(index)?;
        Some(self.make_child(index, child))
    }

    fn child_node(&self, index: usize) -> Option<Self> {
        let child = self.data.green.slots().get(index)?;
        let node = child.element.as_node()?;
        let offset = self.data.offset + child.rel_offset;
        Some(Self::new(Some(self.clone()), index as u32, offset, node.clone()))
    }

    fn make_child(&self, index: usize, child: &GreenChild) -> SyntaxElement {
        let offset = self.data.offset + child.rel_offset;
        match &child.element {
            NodeOrToken::Node(node) => {
                Self::new(Some(self.clone()), index as u32, offset, node.clone()).into()
            }
            NodeOrToken::Token(token) => {
                SyntaxToken::new(self.clone(), index as u32, offset, token.clone()).into()
            }
        }
    }
}

/// Descends from `element` to the token touching `offset`, taking the last
/// candidate for `Direction::Prev` and the first one for `Direction::Next`.
fn edge_token_at_offset(
    mut element: SyntaxElement,
    offset: TextSize,
    direction: Direction,
) -> Option<SyntaxToken> {
    loop {
        let node = match element {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => return Some(token),
        };
        let (first, second) = node.children_at_offset(offset);
        element = match direction {
            Direction::Next => first?,
            Direction::Prev => second.or(first)?,
        };
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.data.green.ptr_eq(&other.data.green) && self.data.offset == other.data.offset
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.green.addr().hash(state);
        self.data.offset.hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "{:?}@{:?}", self.kind(), self.text_range());
        }

        let mut level = 0usize;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(element) => {
                    write!(f, "{:indent$}", "", indent = level * 2)?;
                    match element {
                        NodeOrToken::Node(node) => writeln!(f, "{node:?}")?,
                        NodeOrToken::Token(token) => writeln!(f, "{token:?}")?,
                    }
                    level += 1;
                }
                WalkEvent::Leave(_) => level -= 1,
            }
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.green(), f)
    }
}

impl SyntaxToken {
    fn new(parent: SyntaxNode, index: u32, offset: TextSize, green: GreenToken) -> Self {
        Self { data: Arc::new(TokenData { parent, index, offset, green }) }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.green.kind()
    }

    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.data.offset, self.data.green.text_len())
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.data.index as usize
    }

    #[inline]
    pub fn text(&self) -> &str {
        self.data.green.text()
    }

    #[inline]
    pub fn green(&self) -> &GreenToken {
        &self.data.green
    }

    /// Every token lives inside a node, so the parent always exists.
    #[inline]
    pub fn parent(&self) -> SyntaxNode {
        self.data.parent.clone()
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.parent().ancestors()
    }

    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement> {
        self.data.parent.child_element(self.index() + 1)
    }

    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement> {
        let index = self.index().checked_sub(1)?;
        self.data.parent.child_element(index)
    }

    pub fn siblings_with_tokens(
        &self,
        direction: Direction,
    ) -> impl Iterator<Item = SyntaxElement> + use<> {
        iter::successors(Some(SyntaxElement::Token(self.clone())), move |element| {
            match direction {
                Direction::Next => element.next_sibling_or_token(),
                Direction::Prev => element.prev_sibling_or_token(),
            }
        })
    }

    /// The next token of the whole tree, in text order.
    pub fn next_token(&self) -> Option<Self> {
        match self.next_sibling_or_token() {
            Some(element) => element.first_token(),
            None => self
                .ancestors()
                .find_map(|node| node.next_sibling_or_token())
                .and_then(|element| element.first_token()),
        }
    }

    /// The previous token of the whole tree, in text order.
    pub fn prev_token(&self) -> Option<Self> {
        match self.prev_sibling_or_token() {
            Some(element) => element.last_token(),
            None => self
                .ancestors()
                .find_map(|node| node.prev_sibling_or_token())
                .and_then(|element| element.last_token()),
        }
    }

    /// Returns the root of a new tree in which this token is replaced by
    /// `replacement`.
    pub fn replace_with(&self, replacement: GreenToken) -> GreenNode {
        let parent = self.parent();
        let green = parent.green().replace_child(self.index(), replacement.into());
        parent.replace_with(green)
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.data.green.ptr_eq(&other.data.green) && self.data.offset == other.data.offset
    }
}

impl Eq for SyntaxToken {}

impl Hash for SyntaxToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.green.addr().hash(state);
        self.data.offset.hash(state);
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.index(),
            NodeOrToken::Token(token) => token.index(),
        }
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        let first = match self {
            NodeOrToken::Node(node) => Some(node.clone()),
            NodeOrToken::Token(token) => Some(token.parent()),
        };
        iter::successors(first, SyntaxNode::parent)
    }

    pub fn next_sibling_or_token(&self) -> Option<Self> {
        match self {
            NodeOrToken::Node(node) => node.next_sibling_or_token(),
            NodeOrToken::Token(token) => token.next_sibling_or_token(),
        }
    }

    pub fn prev_sibling_or_token(&self) -> Option<Self> {
        match self {
            NodeOrToken::Node(node) => node.prev_sibling_or_token(),
            NodeOrToken::Token(token) => token.prev_sibling_or_token(),
        }
    }

    pub fn first_token(&self) -> Option<SyntaxToken> {
        match self {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token.clone()),
        }
    }

    pub fn last_token(&self) -> Option<SyntaxToken> {
        match self {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => Some(token.clone()),
        }
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<SyntaxToken> for SyntaxElement {
    fn from(token: SyntaxToken) -> Self {
        NodeOrToken::Token(token)
    }
}

/// Double-ended iterator over the children (nodes and tokens) of a node.
#[derive(Clone, Debug)]
pub struct SyntaxElementChildren {
    parent: SyntaxNode,
    front: usize,
    back: usize,
}

impl Iterator for SyntaxElementChildren {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<SyntaxElement> {
        if self.front == self.back {
            return None;
        }
        let element = self.parent.child_element(self.front);
        self.front += 1;
        element
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for SyntaxElementChildren {
    fn next_back(&mut self) -> Option<SyntaxElement> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.parent.child_element(self.back)
    }
}

impl ExactSizeIterator for SyntaxElementChildren {}

impl FusedIterator for SyntaxElementChildren {}

/// Double-ended iterator over the child nodes of a node, skipping tokens.
#[derive(Clone, Debug)]
pub struct SyntaxNodeChildren {
    parent: SyntaxNode,
    front: usize,
    back: usize,
}

impl SyntaxNodeChildren {
    fn new(parent: SyntaxNode, front: usize, back: usize) -> Self {
        Self { parent, front: front.min(back), back }
    }
}

impl Iterator for SyntaxNodeChildren {
    type Item = SyntaxNode;

    fn next(&mut self) -> Option<SyntaxNode> {
        while self.front < self.back {
            let index = self.front;
            self.front += 1;
            if let Some(node) = self.parent.child_node(index) {
                return Some(node);
            }
        }
        None
    }
}

impl DoubleEndedIterator for SyntaxNodeChildren {
    fn next_back(&mut self) -> Option<SyntaxNode> {
        while self.front < self.back {
            self.back -= 1;
            if let Some(node) = self.parent.child_node(self.back) {
                return Some(node);
            }
        }
        None
    }
}

impl FusedIterator for SyntaxNodeChildren {}

#[cfg(test)]
mod tests;
