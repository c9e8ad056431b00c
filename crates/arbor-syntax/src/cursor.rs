use std::iter::FusedIterator;

use crate::{NodeOrToken, SyntaxElement, SyntaxNode, WalkEvent};

/// Lazy enter/leave walk over the nodes of a subtree.
#[derive(Debug, Clone)]
pub struct Preorder {
    start: SyntaxNode,
    next: Option<WalkEvent<SyntaxNode>>,
    skip_subtree: bool,
}

impl Preorder {
    pub(crate) fn new(start: SyntaxNode) -> Self {
        let next = Some(WalkEvent::Enter(start.clone()));
        Self { start, next, skip_subtree: false }
    }

    /// Skips the children of the node that was just entered; the next event
    /// is its `Leave`.
    pub fn skip_subtree(&mut self) {
        self.skip_subtree = true;
    }

    fn do_skip(&mut self) {
        self.next = self.next.take().and_then(|next| match next {
            WalkEvent::Enter(first_child) => first_child.parent().map(WalkEvent::Leave),
            WalkEvent::Leave(parent) => Some(WalkEvent::Leave(parent)),
        });
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent<SyntaxNode>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_subtree {
            self.do_skip();
            self.skip_subtree = false;
        }

        let next = self.next.take();

        self.next = next.as_ref().and_then(|event| {
            Some(match event {
                WalkEvent::Enter(node) => match node.first_child() {
                    Some(child) => WalkEvent::Enter(child),
                    None => WalkEvent::Leave(node.clone()),
                },
                WalkEvent::Leave(node) => {
                    if node == &self.start {
                        return None;
                    }

                    match node.next_sibling() {
                        Some(sibling) => WalkEvent::Enter(sibling),
                        None => WalkEvent::Leave(node.parent()?),
                    }
                }
            })
        });

        next
    }
}

impl FusedIterator for Preorder {}

/// Lazy enter/leave walk over the nodes and tokens of a subtree.
#[derive(Debug, Clone)]
pub struct PreorderWithTokens {
    start: SyntaxElement,
    next: Option<WalkEvent<SyntaxElement>>,
    skip_subtree: bool,
}

impl PreorderWithTokens {
    pub(crate) fn new(start: SyntaxNode) -> Self {
        let start = SyntaxElement::Node(start);
        let next = Some(WalkEvent::Enter(start.clone()));
        Self { start, next, skip_subtree: false }
    }

    pub fn skip_subtree(&mut self) {
        self.skip_subtree = true;
    }

    fn do_skip(&mut self) {
        self.next = self.next.take().and_then(|next| match next {
            WalkEvent::Enter(first_child) => {
                first_child.parent().map(|parent| WalkEvent::Leave(parent.into()))
            }
            WalkEvent::Leave(parent) => Some(WalkEvent::Leave(parent)),
        });
    }
}

impl Iterator for PreorderWithTokens {
    type Item = WalkEvent<SyntaxElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_subtree {
            self.do_skip();
            self.skip_subtree = false;
        }

        let next = self.next.take();

        self.next = next.as_ref().and_then(|event| {
            Some(match event {
                WalkEvent::Enter(element) => match element {
                    NodeOrToken::Node(node) => match node.first_child_or_token() {
                        Some(child) => WalkEvent::Enter(child),
                        None => WalkEvent::Leave(element.clone()),
                    },
                    NodeOrToken::Token(_) => WalkEvent::Leave(element.clone()),
                },
                WalkEvent::Leave(element) => {
                    if element == &self.start {
                        return None;
                    }

                    match element.next_sibling_or_token() {
                        Some(sibling) => WalkEvent::Enter(sibling),
                        None => WalkEvent::Leave(element.parent()?.into()),
                    }
                }
            })
        });

        next
    }
}

impl FusedIterator for PreorderWithTokens {}
