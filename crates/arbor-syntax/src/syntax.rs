//! Vocabulary shared by the green and the red layer.

use std::fmt;

/// Either a node or a token. Children of a node are a mix of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    pub fn into_node(self) -> Option<N> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    pub fn into_token(self) -> Option<T> {
        match self {
            Self::Token(token) => Some(token),
            Self::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        self.as_ref().into_node()
    }

    pub fn as_token(&self) -> Option<&T> {
        self.as_ref().into_token()
    }

    pub fn as_ref(&self) -> NodeOrToken<&N, &T> {
        match self {
            Self::Node(node) => NodeOrToken::Node(node),
            Self::Token(token) => NodeOrToken::Token(token),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token(_))
    }
}

impl<N: Clone, T: Clone> NodeOrToken<&N, &T> {
    pub fn cloned(&self) -> NodeOrToken<N, T> {
        match *self {
            Self::Node(node) => NodeOrToken::Node(node.clone()),
            Self::Token(token) => NodeOrToken::Token(token.clone()),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => fmt::Display::fmt(node, f),
            Self::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Prev,
}

/// The tokens touching an offset. An offset on the boundary of two tokens
/// touches both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenAtOffset<T> {
    None,
    Single(T),
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> TokenAtOffset<U> {
        match self {
            Self::None => TokenAtOffset::None,
            Self::Single(token) => TokenAtOffset::Single(f(token)),
            Self::Between(left, right) => {
                let left = f(left);
                TokenAtOffset::Between(left, f(right))
            }
        }
    }

    /// The only token, or the left one of two.
    pub fn left_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(token) | Self::Between(token, _) => Some(token),
        }
    }

    /// The only token, or the right one of two.
    pub fn right_biased(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Single(token) | Self::Between(_, token) => Some(token),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match self {
            Self::None => 0,
            Self::Single(_) => 1,
            Self::Between(..) => 2,
        };
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}

/// One step of a preorder walk: a node is entered before its children and
/// left after them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WalkEvent<T> {
    Enter(T),
    Leave(T),
}

impl<T> WalkEvent<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WalkEvent<U> {
        match self {
            Self::Enter(it) => WalkEvent::Enter(f(it)),
            Self::Leave(it) => WalkEvent::Leave(f(it)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_at_offset_yields_left_then_right() {
        let between = TokenAtOffset::Between(1, 2);
        assert_eq!(between.len(), 2);
        assert_eq!(between.clone().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(between.clone().left_biased(), Some(1));
        assert_eq!(between.map(|n| n * 10).right_biased(), Some(20));
        assert_eq!(TokenAtOffset::<u8>::None.left_biased(), None);
    }

    #[test]
    fn node_or_token_accessors() {
        let node: NodeOrToken<u8, char> = NodeOrToken::Node(1);
        assert!(node.is_node());
        assert_eq!(node.as_node(), Some(&1));
        assert_eq!(node.into_token(), None);
        assert_eq!(NodeOrToken::<u8, char>::Token('x').to_string(), "x");
    }
}
