//! Lossless syntax trees.
//!
//! The green tree is immutable, reference counted and position independent,
//! so unchanged subtrees are shared between versions of a file. The red tree
//! is a thin layer of cursors computed on demand from it, adding parent links
//! and absolute offsets.

/// Typed wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod cache;
mod cursor;
mod edit;
mod green;
mod ptr;
mod red;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod syntax_text;

/// Event-driven construction of green trees.
pub use builder::{Checkpoint, GreenNodeBuilder};
/// Interning of green tokens and nodes.
pub use cache::NodeCache;
/// Walk iterators returned by `SyntaxNode::preorder*`.
pub use cursor::{Preorder, PreorderWithTokens};
pub use edit::Indel;
pub use green::{GreenElement, GreenElementRef, GreenNode, GreenToken};
pub use ptr::{AstPtr, SyntaxNodePtr};
/// Position-aware cursors.
pub use red::{SyntaxElement, SyntaxElementChildren, SyntaxNode, SyntaxNodeChildren, SyntaxToken};
pub use syntax::{Direction, NodeOrToken, TokenAtOffset, WalkEvent};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
pub use syntax_text::SyntaxText;
pub use text_size::{TextLen, TextRange, TextSize};
