//! Interning of green tokens and nodes.

use std::hash::{BuildHasher, Hash, Hasher};

use hashbrown::HashTable;
use rustc_hash::FxBuildHasher;

use crate::{GreenElement, GreenNode, GreenToken, SyntaxKind};

/// Deduplicates green tokens and nodes.
///
/// Nodes are keyed by kind and by the identity of their children, so a node is
/// only found again when its children were themselves produced by this cache.
/// Sharing one cache between several builds makes unchanged subtrees, and
/// unchanged roots, pointer-identical.
#[derive(Default)]
pub struct NodeCache {
    nodes: HashTable<GreenNode>,
    tokens: HashTable<GreenToken>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes held by the cache.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct tokens held by the cache.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn token(&mut self, kind: SyntaxKind, text: &str) -> GreenToken {
        let hash = token_hash(kind, text);

        self.tokens
            .entry(
                hash,
                |token| token.kind() == kind && token.text() == text,
                |token| token_hash(token.kind(), token.text()),
            )
            .or_insert_with(|| GreenToken::new(kind, text))
            .get()
            .clone()
    }

    pub(crate) fn node(&mut self, kind: SyntaxKind, children: &[GreenElement]) -> GreenNode {
        let hash = node_hash(kind, children.iter().map(|child| child.as_ref().addr()));

        self.nodes
            .entry(
                hash,
                |node| {
                    node.kind() == kind
                        && node.children().len() == children.len()
                        && node
                            .children()
                            .zip(children)
                            .all(|(cached, child)| cached.addr() == child.as_ref().addr())
                },
                |node| node_hash(node.kind(), node.children().map(|child| child.addr())),
            )
            .or_insert_with(|| GreenNode::new(kind, children.iter().cloned()))
            .get()
            .clone()
    }
}

impl std::fmt::Debug for NodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCache")
            .field("nodes", &self.nodes.len())
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

fn token_hash(kind: SyntaxKind, text: &str) -> u64 {
    FxBuildHasher.hash_one((kind, text))
}

fn node_hash(kind: SyntaxKind, children: impl Iterator<Item = usize>) -> u64 {
    let mut hasher = FxBuildHasher.build_hasher();
    kind.hash(&mut hasher);
    for child in children {
        child.hash(&mut hasher);
    }
    hasher.finish()
}
