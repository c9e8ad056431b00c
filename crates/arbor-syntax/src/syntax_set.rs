use crate::SyntaxKind;

/// A `const`-constructible set of `SyntaxKind`s, one bit per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet(u128);

const _: () = assert!((SyntaxKind::__LAST as u32) < u128::BITS);

impl SyntaxSet {
    pub const EMPTY: Self = Self(0);

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < N {
            bits |= mask(kinds[i]);
            i += 1;
        }
        Self(bits)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, kind: SyntaxKind) -> bool {
        self.0 & mask(kind) != 0
    }
}

const fn mask(kind: SyntaxKind) -> u128 {
    1 << kind as u16
}
