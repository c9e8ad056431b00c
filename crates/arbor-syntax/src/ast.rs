//! Typed views over the untyped tree.

use std::marker::PhantomData;

use crate::SyntaxKind::*;
use crate::{NodeOrToken, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken, T};

/// A typed wrapper around a `SyntaxNode` of one (or a few) kinds.
pub trait AstNode {
    fn can_cast(kind: SyntaxKind) -> bool
    where
        Self: Sized;

    fn cast(syntax: SyntaxNode) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxNode;
}

impl AstNode for SyntaxNode {
    fn can_cast(_: SyntaxKind) -> bool {
        true
    }

    fn cast(syntax: Self) -> Option<Self> {
        Some(syntax)
    }

    fn syntax(&self) -> &Self {
        self
    }
}

/// Like `AstNode`, but wraps tokens rather than nodes.
pub trait AstToken {
    fn can_cast(kind: SyntaxKind) -> bool
    where
        Self: Sized;

    fn cast(syntax: SyntaxToken) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxToken;

    fn text(&self) -> &str {
        self.syntax().text()
    }
}

/// Iterator over the children of a node that cast to `N`.
#[derive(Debug, Clone)]
pub struct AstChildren<N> {
    inner: SyntaxNodeChildren,
    ph: PhantomData<N>,
}

impl<N> AstChildren<N> {
    fn new(parent: &SyntaxNode) -> Self {
        Self { inner: parent.children(), ph: PhantomData }
    }
}

impl<N: AstNode> Iterator for AstChildren<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.inner.find_map(N::cast)
    }
}

mod support {
    use super::{AstChildren, AstNode};
    use crate::{SyntaxKind, SyntaxNode, SyntaxToken};

    pub(super) fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
        parent.children().find_map(N::cast)
    }

    pub(super) fn children<N: AstNode>(parent: &SyntaxNode) -> AstChildren<N> {
        AstChildren::new(parent)
    }

    pub(super) fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        parent
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == kind)
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.syntax, f)
            }
        }
    };
}

macro_rules! ast_token {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxToken,
        }

        impl AstToken for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxToken) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxToken {
                &self.syntax
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.syntax, f)
            }
        }
    };
}

ast_node!(SourceFile, SOURCE_FILE);
ast_node!(Attr, ATTR);
ast_node!(TokenTree, TOKEN_TREE);

ast_token!(Comment, COMMENT);
ast_token!(Whitespace, WHITESPACE);

impl SourceFile {
    /// The `#!` line, if the file starts with one.
    pub fn shebang(&self) -> Option<SyntaxToken> {
        self.syntax.first_token().filter(|token| token.kind() == SHEBANG)
    }

    pub fn attrs(&self) -> AstChildren<Attr> {
        support::children(&self.syntax)
    }

    /// Top-level token trees, excluding the ones inside attributes.
    pub fn token_trees(&self) -> AstChildren<TokenTree> {
        support::children(&self.syntax)
    }
}

impl Attr {
    pub fn pound_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, T![#])
    }

    /// `#![...]` rather than `#[...]`.
    pub fn is_inner(&self) -> bool {
        support::token(&self.syntax, T![!]).is_some()
    }

    pub fn token_tree(&self) -> Option<TokenTree> {
        support::child(&self.syntax)
    }
}

impl TokenTree {
    pub fn left_delimiter(&self) -> Option<SyntaxToken> {
        self.syntax
            .first_child_or_token()
            .and_then(NodeOrToken::into_token)
            .filter(|token| token.kind().is_opening_delimiter())
    }

    /// The closing delimiter, if the tree was closed by the matching one.
    pub fn right_delimiter(&self) -> Option<SyntaxToken> {
        let left = self.left_delimiter()?.kind();
        self.syntax
            .last_child_or_token()
            .and_then(NodeOrToken::into_token)
            .filter(|token| left.matching_delimiter() == Some(token.kind()))
    }

    pub fn token_trees(&self) -> AstChildren<Self> {
        support::children(&self.syntax)
    }
}

/// Where a doc comment attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    /// `//!` and `/*!`, documenting the enclosing item.
    Inner,
    /// `///` and `/**`, documenting the following item.
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentShape {
    Line,
    Block,
}

const COMMENT_PREFIXES: &[(&str, CommentShape, Option<CommentPlacement>)] = &[
    ("////", CommentShape::Line, None),
    ("///", CommentShape::Line, Some(CommentPlacement::Outer)),
    ("//!", CommentShape::Line, Some(CommentPlacement::Inner)),
    ("/**", CommentShape::Block, Some(CommentPlacement::Outer)),
    ("/*!", CommentShape::Block, Some(CommentPlacement::Inner)),
    ("//", CommentShape::Line, None),
    ("/*", CommentShape::Block, None),
];

impl Comment {
    pub fn shape(&self) -> CommentShape {
        self.classify().0
    }

    pub fn is_block(&self) -> bool {
        self.shape() == CommentShape::Block
    }

    /// `None` for plain comments.
    pub fn doc_placement(&self) -> Option<CommentPlacement> {
        self.classify().1
    }

    pub fn is_doc(&self) -> bool {
        self.doc_placement().is_some()
    }

    /// Text of a doc comment without its prefix (and block suffix).
    pub fn doc_text(&self) -> Option<&str> {
        self.doc_placement()?;
        let text = self.text();
        let text = &text[3..];
        Some(if self.is_block() { text.strip_suffix("*/").unwrap_or(text) } else { text })
    }

    fn classify(&self) -> (CommentShape, Option<CommentPlacement>) {
        let text = self.text();
        // `/**/` and `/***` are plain block comments.
        if text == "/**/" || text.starts_with("/***") {
            return (CommentShape::Block, None);
        }
        COMMENT_PREFIXES
            .iter()
            .find(|(prefix, ..)| text.starts_with(prefix))
            .map_or((CommentShape::Line, None), |&(_, shape, placement)| (shape, placement))
    }
}

impl Whitespace {
    /// Contains at least two newlines, i.e. separates paragraphs.
    pub fn spans_multiple_lines(&self) -> bool {
        let text = self.text();
        text.find('\n').is_some_and(|idx| text[idx + 1..].contains('\n'))
    }
}

/// Matches a node against several typed views, in order.
///
/// ```ignore
/// match_ast! {
///     match node {
///         ast::Attr(it) => it.is_inner(),
///         ast::TokenTree(it) => it.left_delimiter().is_some(),
///         _ => false,
///     }
/// }
/// ```
#[macro_export]
macro_rules! match_ast {
    (match $node:ident { $($tt:tt)* }) => { $crate::match_ast!(match ($node) { $($tt)* }) };

    (match ($node:expr) {
        $( $( $path:ident )::+ ($it:pat) => $res:expr, )*
        _ => $catch_all:expr $(,)?
    }) => {{
        $(
            if let Some($it) = <$($path)::+ as $crate::ast::AstNode>::cast($node.clone()) {
                $res
            } else
        )*
        { $catch_all }
    }};
}
