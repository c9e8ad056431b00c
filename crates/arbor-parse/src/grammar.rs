//! A delimiter-level grammar: a file is a flat sequence of tokens, attributes
//! and balanced `()`, `[]`, `{}` groups.

use arbor_syntax::SyntaxKind::{self, *};
use arbor_syntax::T;
use text_size::TextRange;

use crate::parser::{Marker, Parser};

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();
    while !p.at(EOF) {
        match p.current() {
            T![#] if at_attr(p) => attr(p),
            kind if kind.is_opening_delimiter() => token_tree(p),
            kind if kind.is_closing_delimiter() => unmatched_delimiter(p),
            _ => p.bump(),
        }
    }
    m.complete(p, SOURCE_FILE);
}

fn at_attr(p: &Parser<'_>) -> bool {
    match p.nth(1) {
        T!['['] => true,
        T![!] => p.nth(2) == T!['['],
        _ => false,
    }
}

// #[attr] or #![attr]
fn attr(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    p.eat(T![!]);
    token_tree(p);
    m.complete(p, ATTR);
}

fn unmatched_delimiter(p: &mut Parser<'_>) {
    let m = p.start();
    p.error("unmatched closing delimiter");
    p.bump();
    m.complete(p, ERROR);
}

struct OpenTree {
    marker: Marker,
    close: SyntaxKind,
    open_range: TextRange,
}

/// Parses a group starting at an opening delimiter.
///
/// Open groups are kept on an explicit stack rather than the call stack. A
/// closing delimiter that belongs to an outer group ends the inner ones with
/// an error.
pub(crate) fn token_tree(p: &mut Parser<'_>) {
    let mut open = Vec::new();
    open_tree(p, &mut open);

    while let Some(close) = open.last().map(|tree| tree.close) {
        match p.current() {
            kind if kind == close => {
                p.bump();
                close_tree(p, &mut open);
            }
            EOF => {
                if let Some(tree) = open.last() {
                    let range = tree.open_range;
                    p.error_at("unclosed delimiter", range);
                }
                close_tree(p, &mut open);
            }
            kind if kind.is_opening_delimiter() => open_tree(p, &mut open),
            kind if kind.is_closing_delimiter() && open.iter().any(|tree| tree.close == kind) => {
                p.error("mismatched closing delimiter");
                close_tree(p, &mut open);
            }
            kind if kind.is_closing_delimiter() => unmatched_delimiter(p),
            _ => p.bump(),
        }
    }
}

fn open_tree(p: &mut Parser<'_>, open: &mut Vec<OpenTree>) {
    let Some(close) = p.current().matching_delimiter() else {
        return;
    };
    let open_range = p.current_range();
    let marker = p.start();
    p.bump();
    open.push(OpenTree { marker, close, open_range });
}

fn close_tree(p: &mut Parser<'_>, open: &mut Vec<OpenTree>) {
    if let Some(tree) = open.pop() {
        tree.marker.complete(p, TOKEN_TREE);
    }
}
