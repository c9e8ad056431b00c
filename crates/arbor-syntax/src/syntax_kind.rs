//! Kinds of tokens and nodes.

/// The kind of a syntax node or token, e.g. `IDENT`, `USE_KW`, or `TOKEN_TREE`.
///
/// The numbering is stable within a build, so kinds can be stored as `u16`.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u16)]
pub enum SyntaxKind {
    SEMICOLON,
    COMMA,
    L_PAREN,
    R_PAREN,
    L_CURLY,
    R_CURLY,
    L_BRACK,
    R_BRACK,
    L_ANGLE,
    R_ANGLE,
    AT,
    POUND,
    TILDE,
    QUESTION,
    DOLLAR,
    AMP,
    PIPE,
    PLUS,
    STAR,
    SLASH,
    CARET,
    PERCENT,
    UNDERSCORE,
    DOT,
    COLON,
    EQ,
    BANG,
    MINUS,

    AS_KW,
    ASYNC_KW,
    AWAIT_KW,
    BOX_KW,
    BREAK_KW,
    CONST_KW,
    CONTINUE_KW,
    CRATE_KW,
    DYN_KW,
    ELSE_KW,
    ENUM_KW,
    EXTERN_KW,
    FALSE_KW,
    FN_KW,
    FOR_KW,
    IF_KW,
    IMPL_KW,
    IN_KW,
    LET_KW,
    LOOP_KW,
    MACRO_KW,
    MATCH_KW,
    MOD_KW,
    MOVE_KW,
    MUT_KW,
    PUB_KW,
    REF_KW,
    RETURN_KW,
    SELF_KW,
    SELF_TYPE_KW,
    STATIC_KW,
    STRUCT_KW,
    SUPER_KW,
    TRAIT_KW,
    TRUE_KW,
    TRY_KW,
    TYPE_KW,
    UNSAFE_KW,
    USE_KW,
    WHERE_KW,
    WHILE_KW,
    YIELD_KW,

    INT_NUMBER,
    FLOAT_NUMBER,
    CHAR,
    BYTE,
    STRING,
    BYTE_STRING,

    ERROR,
    IDENT,
    LIFETIME_IDENT,
    WHITESPACE,
    COMMENT,
    SHEBANG,

    SOURCE_FILE,
    ATTR,
    TOKEN_TREE,

    TOMBSTONE,
    EOF,

    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

use crate::SyntaxSet;

const TRIVIA: SyntaxSet = SyntaxSet::new([WHITESPACE, COMMENT]);
const LITERALS: SyntaxSet =
    SyntaxSet::new([INT_NUMBER, FLOAT_NUMBER, CHAR, BYTE, STRING, BYTE_STRING]);
const OPENING_DELIMITERS: SyntaxSet = SyntaxSet::new([L_PAREN, L_CURLY, L_BRACK]);
const CLOSING_DELIMITERS: SyntaxSet = SyntaxSet::new([R_PAREN, R_CURLY, R_BRACK]);

impl SyntaxKind {
    /// Whitespace and comments.
    #[inline]
    pub const fn is_trivia(self) -> bool {
        TRIVIA.contains(self)
    }

    #[inline]
    pub const fn is_punct(self) -> bool {
        (self as u16) <= (MINUS as u16)
    }

    #[inline]
    pub const fn is_keyword(self) -> bool {
        (AS_KW as u16) <= (self as u16) && (self as u16) <= (YIELD_KW as u16)
    }

    #[inline]
    pub const fn is_literal(self) -> bool {
        LITERALS.contains(self)
    }

    #[inline]
    pub const fn is_opening_delimiter(self) -> bool {
        OPENING_DELIMITERS.contains(self)
    }

    #[inline]
    pub const fn is_closing_delimiter(self) -> bool {
        CLOSING_DELIMITERS.contains(self)
    }

    /// Returns the delimiter that pairs with `self`, in either direction.
    pub const fn matching_delimiter(self) -> Option<Self> {
        Some(match self {
            L_PAREN => R_PAREN,
            R_PAREN => L_PAREN,
            L_CURLY => R_CURLY,
            R_CURLY => L_CURLY,
            L_BRACK => R_BRACK,
            R_BRACK => L_BRACK,
            _ => return None,
        })
    }

    /// Maps a strict keyword to its kind.
    pub fn from_keyword(ident: &str) -> Option<Self> {
        let kw = match ident {
            "as" => AS_KW,
            "async" => ASYNC_KW,
            "await" => AWAIT_KW,
            "box" => BOX_KW,
            "break" => BREAK_KW,
            "const" => CONST_KW,
            "continue" => CONTINUE_KW,
            "crate" => CRATE_KW,
            "dyn" => DYN_KW,
            "else" => ELSE_KW,
            "enum" => ENUM_KW,
            "extern" => EXTERN_KW,
            "false" => FALSE_KW,
            "fn" => FN_KW,
            "for" => FOR_KW,
            "if" => IF_KW,
            "impl" => IMPL_KW,
            "in" => IN_KW,
            "let" => LET_KW,
            "loop" => LOOP_KW,
            "macro" => MACRO_KW,
            "match" => MATCH_KW,
            "mod" => MOD_KW,
            "move" => MOVE_KW,
            "mut" => MUT_KW,
            "pub" => PUB_KW,
            "ref" => REF_KW,
            "return" => RETURN_KW,
            "self" => SELF_KW,
            "Self" => SELF_TYPE_KW,
            "static" => STATIC_KW,
            "struct" => STRUCT_KW,
            "super" => SUPER_KW,
            "trait" => TRAIT_KW,
            "true" => TRUE_KW,
            "try" => TRY_KW,
            "type" => TYPE_KW,
            "unsafe" => UNSAFE_KW,
            "use" => USE_KW,
            "where" => WHERE_KW,
            "while" => WHILE_KW,
            "yield" => YIELD_KW,
            _ => return None,
        };
        Some(kw)
    }

    /// Maps a single punctuation character to its kind.
    pub fn from_char(c: char) -> Option<Self> {
        let tok = match c {
            ';' => SEMICOLON,
            ',' => COMMA,
            '(' => L_PAREN,
            ')' => R_PAREN,
            '{' => L_CURLY,
            '}' => R_CURLY,
            '[' => L_BRACK,
            ']' => R_BRACK,
            '<' => L_ANGLE,
            '>' => R_ANGLE,
            '@' => AT,
            '#' => POUND,
            '~' => TILDE,
            '?' => QUESTION,
            '$' => DOLLAR,
            '&' => AMP,
            '|' => PIPE,
            '+' => PLUS,
            '*' => STAR,
            '/' => SLASH,
            '^' => CARET,
            '%' => PERCENT,
            '_' => UNDERSCORE,
            '.' => DOT,
            ':' => COLON,
            '=' => EQ,
            '!' => BANG,
            '-' => MINUS,
            _ => return None,
        };
        Some(tok)
    }
}

impl From<u16> for SyntaxKind {
    #[inline]
    fn from(raw: u16) -> Self {
        assert!(raw <= (__LAST as u16), "invalid syntax kind: {raw}");
        // SAFETY: `SyntaxKind` is `repr(u16)` with contiguous discriminants and
        // `raw` was checked against the last one.
        unsafe { std::mem::transmute::<u16, Self>(raw) }
    }
}

impl From<SyntaxKind> for u16 {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        kind as u16
    }
}

/// Maps punctuation and keywords to their `SyntaxKind`, e.g. `T![;]`, `T![fn]`.
#[macro_export]
macro_rules! T {
    [;] => { $crate::SyntaxKind::SEMICOLON };
    [,] => { $crate::SyntaxKind::COMMA };
    ['('] => { $crate::SyntaxKind::L_PAREN };
    [')'] => { $crate::SyntaxKind::R_PAREN };
    ['{'] => { $crate::SyntaxKind::L_CURLY };
    ['}'] => { $crate::SyntaxKind::R_CURLY };
    ['['] => { $crate::SyntaxKind::L_BRACK };
    [']'] => { $crate::SyntaxKind::R_BRACK };
    [<] => { $crate::SyntaxKind::L_ANGLE };
    [>] => { $crate::SyntaxKind::R_ANGLE };
    [@] => { $crate::SyntaxKind::AT };
    [#] => { $crate::SyntaxKind::POUND };
    [~] => { $crate::SyntaxKind::TILDE };
    [?] => { $crate::SyntaxKind::QUESTION };
    [$] => { $crate::SyntaxKind::DOLLAR };
    [&] => { $crate::SyntaxKind::AMP };
    [|] => { $crate::SyntaxKind::PIPE };
    [+] => { $crate::SyntaxKind::PLUS };
    [*] => { $crate::SyntaxKind::STAR };
    [/] => { $crate::SyntaxKind::SLASH };
    [^] => { $crate::SyntaxKind::CARET };
    [%] => { $crate::SyntaxKind::PERCENT };
    [_] => { $crate::SyntaxKind::UNDERSCORE };
    [.] => { $crate::SyntaxKind::DOT };
    [:] => { $crate::SyntaxKind::COLON };
    [=] => { $crate::SyntaxKind::EQ };
    [!] => { $crate::SyntaxKind::BANG };
    [-] => { $crate::SyntaxKind::MINUS };
    [as] => { $crate::SyntaxKind::AS_KW };
    [async] => { $crate::SyntaxKind::ASYNC_KW };
    [await] => { $crate::SyntaxKind::AWAIT_KW };
    [box] => { $crate::SyntaxKind::BOX_KW };
    [break] => { $crate::SyntaxKind::BREAK_KW };
    [const] => { $crate::SyntaxKind::CONST_KW };
    [continue] => { $crate::SyntaxKind::CONTINUE_KW };
    [crate] => { $crate::SyntaxKind::CRATE_KW };
    [dyn] => { $crate::SyntaxKind::DYN_KW };
    [else] => { $crate::SyntaxKind::ELSE_KW };
    [enum] => { $crate::SyntaxKind::ENUM_KW };
    [extern] => { $crate::SyntaxKind::EXTERN_KW };
    [false] => { $crate::SyntaxKind::FALSE_KW };
    [fn] => { $crate::SyntaxKind::FN_KW };
    [for] => { $crate::SyntaxKind::FOR_KW };
    [if] => { $crate::SyntaxKind::IF_KW };
    [impl] => { $crate::SyntaxKind::IMPL_KW };
    [in] => { $crate::SyntaxKind::IN_KW };
    [let] => { $crate::SyntaxKind::LET_KW };
    [loop] => { $crate::SyntaxKind::LOOP_KW };
    [macro] => { $crate::SyntaxKind::MACRO_KW };
    [match] => { $crate::SyntaxKind::MATCH_KW };
    [mod] => { $crate::SyntaxKind::MOD_KW };
    [move] => { $crate::SyntaxKind::MOVE_KW };
    [mut] => { $crate::SyntaxKind::MUT_KW };
    [pub] => { $crate::SyntaxKind::PUB_KW };
    [ref] => { $crate::SyntaxKind::REF_KW };
    [return] => { $crate::SyntaxKind::RETURN_KW };
    [self] => { $crate::SyntaxKind::SELF_KW };
    [Self] => { $crate::SyntaxKind::SELF_TYPE_KW };
    [static] => { $crate::SyntaxKind::STATIC_KW };
    [struct] => { $crate::SyntaxKind::STRUCT_KW };
    [super] => { $crate::SyntaxKind::SUPER_KW };
    [trait] => { $crate::SyntaxKind::TRAIT_KW };
    [true] => { $crate::SyntaxKind::TRUE_KW };
    [try] => { $crate::SyntaxKind::TRY_KW };
    [type] => { $crate::SyntaxKind::TYPE_KW };
    [unsafe] => { $crate::SyntaxKind::UNSAFE_KW };
    [use] => { $crate::SyntaxKind::USE_KW };
    [where] => { $crate::SyntaxKind::WHERE_KW };
    [while] => { $crate::SyntaxKind::WHILE_KW };
    [yield] => { $crate::SyntaxKind::YIELD_KW };
    [lifetime_ident] => { $crate::SyntaxKind::LIFETIME_IDENT };
    [ident] => { $crate::SyntaxKind::IDENT };
    [shebang] => { $crate::SyntaxKind::SHEBANG };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        for raw in 0..(__LAST as u16) {
            assert_eq!(u16::from(SyntaxKind::from(raw)), raw);
        }
    }

    #[test]
    fn classification() {
        assert!(T![;].is_punct());
        assert!(T![-].is_punct());
        assert!(!T![as].is_punct());
        assert!(T![as].is_keyword());
        assert!(T![yield].is_keyword());
        assert!(!IDENT.is_keyword());
        assert!(WHITESPACE.is_trivia());
        assert!(COMMENT.is_trivia());
        assert!(!SHEBANG.is_trivia());
        assert_eq!(T!['{'].matching_delimiter(), Some(T!['}']));
        assert_eq!(T![')'].matching_delimiter(), Some(T!['(']));
        assert_eq!(SyntaxKind::from_keyword("Self"), Some(T![Self]));
        assert_eq!(SyntaxKind::from_keyword("union"), None);
        assert_eq!(SyntaxKind::from_char('#'), Some(T![#]));
    }
}
