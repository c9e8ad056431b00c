//! Reparsing only the part of a tree an edit touches.
//!
//! Two local strategies are tried before giving up: relexing the single token
//! the edit falls into, and reparsing the innermost token tree around it. Both
//! only apply when the result is guaranteed to equal a full parse of the
//! edited text.

use std::iter;

use arbor_errors::SyntaxError;
use arbor_syntax::SyntaxKind::{self, *};
use arbor_syntax::{GreenNode, GreenToken, Indel, SyntaxNode, SyntaxSet, SyntaxToken};
use arbor_tokenizer::tokenize;
use log::debug;
use text_size::{TextRange, TextSize};

use crate::lexed::Lexed;
use crate::{SyntaxTreeBuilder, grammar};

/// Tokens relexed on each side of an edited token. The tokenizer never looks
/// more than two characters past the end of a token.
const CONTEXT: usize = 2;

/// Tokens whose edits can be handled by relexing them alone.
const RELEXABLE: SyntaxSet = SyntaxSet::new([WHITESPACE, COMMENT, IDENT, STRING]);

pub(crate) fn incremental_reparse(
    root: &SyntaxNode,
    edit: &Indel,
    errors: &[SyntaxError],
) -> Option<(GreenNode, Vec<SyntaxError>)> {
    // Whether the first line stays a shebang depends on any amount of text
    // after it.
    if root.first_token().is_some_and(|token| token.kind() == SHEBANG) {
        return None;
    }
    if let Some((green, new_errors, range)) = reparse_token(root, edit) {
        debug!("relexed token at {range:?}");
        return Some((green, merge_errors(errors, new_errors, range, edit)));
    }
    if let Some((green, new_errors, range)) = reparse_block(root, edit) {
        debug!("reparsed token tree at {range:?}");
        return Some((green, merge_errors(errors, new_errors, range, edit)));
    }
    None
}

fn reparse_token(
    root: &SyntaxNode,
    edit: &Indel,
) -> Option<(GreenNode, Vec<SyntaxError>, TextRange)> {
    let token = root.covering_element(edit.delete).into_token()?;
    let kind = token.kind();
    if !RELEXABLE.contains(kind) {
        return None;
    }

    let token_range = token.text_range();
    let mut new_text = token.text().to_owned();
    Indel::replace(edit.delete.checked_sub(token_range.start())?, edit.insert.clone())
        .apply(&mut new_text);
    if new_text.is_empty() {
        return None;
    }

    // The edited token must lex the same way in its neighbourhood, so that
    // neither it nor its neighbours change kind or length.
    let before: Vec<_> =
        iter::successors(token.prev_token(), SyntaxToken::prev_token).take(CONTEXT).collect();
    let after: Vec<_> =
        iter::successors(token.next_token(), SyntaxToken::next_token).take(CONTEXT).collect();

    let mut window = String::new();
    let mut expected = Vec::with_capacity(before.len() + after.len() + 1);
    for context in before.iter().rev() {
        window.push_str(context.text());
        expected.push((context.kind(), TextSize::of(context.text())));
    }
    let new_start = TextSize::of(&window);
    window.push_str(&new_text);
    expected.push((kind, TextSize::of(&new_text)));
    for context in &after {
        window.push_str(context.text());
        expected.push((context.kind(), TextSize::of(context.text())));
    }

    let mut relexed: Vec<_> = tokenize(&window).collect();
    if !relexed.iter().map(|token| (token.kind, token.len)).eq(expected) {
        return None;
    }

    let errors = relexed
        .swap_remove(before.len())
        .error
        .map(|error| {
            let range = error.range() - new_start + token_range.start();
            error.with_range(range)
        })
        .into_iter()
        .collect();
    let green = token.replace_with(GreenToken::new(kind, &new_text));
    Some((green, errors, token_range))
}

fn reparse_block(
    root: &SyntaxNode,
    edit: &Indel,
) -> Option<(GreenNode, Vec<SyntaxError>, TextRange)> {
    let node = root
        .covering_element(edit.delete)
        .ancestors()
        .find(|node| node.kind() == TOKEN_TREE)?;

    let open = node.first_token()?.kind();
    let close = open.matching_delimiter()?;
    // A tree cut short by a mismatched closer or the end of the text depends
    // on what follows it.
    if node.last_token()?.kind() != close {
        return None;
    }

    let node_range = node.text_range();
    let mut text = node.to_string();
    Indel::replace(edit.delete.checked_sub(node_range.start())?, edit.insert.clone())
        .apply(&mut text);

    let lexed = Lexed::new(&text);
    if !is_balanced(lexed.kinds(), open) {
        return None;
    }

    let mut builder = SyntaxTreeBuilder::new();
    crate::parse_with(&lexed, grammar::token_tree, &mut builder);
    let (green, errors) = builder.finish_raw();
    let errors = errors
        .into_iter()
        .map(|error| {
            let range = error.range() + node_range.start();
            error.with_range(range)
        })
        .collect();
    Some((node.replace_with(green), errors, node_range))
}

/// Whether `kinds` is a single group opened by `open` with every delimiter
/// inside it matched.
fn is_balanced(kinds: &[SyntaxKind], open: SyntaxKind) -> bool {
    if kinds.first() != Some(&open) {
        return false;
    }

    let mut stack = Vec::new();
    for (index, &kind) in kinds.iter().enumerate() {
        if kind.is_opening_delimiter() {
            stack.push(kind);
        } else if kind.is_closing_delimiter() {
            if stack.pop().and_then(SyntaxKind::matching_delimiter) != Some(kind) {
                return false;
            }
            if stack.is_empty() {
                return index + 1 == kinds.len();
            }
        }
    }
    false
}

/// Combines the errors of the old tree outside `range` with the errors of
/// the reparsed part.
///
/// `range` is in old coordinates and covers `edit.delete`. Errors after it
/// move with the edit; errors inside it are replaced by `new`.
fn merge_errors(
    old: &[SyntaxError],
    new: Vec<SyntaxError>,
    range: TextRange,
    edit: &Indel,
) -> Vec<SyntaxError> {
    let mut errors = Vec::with_capacity(old.len() + new.len());
    for error in old {
        let error_range = error.range();
        if error_range.end() <= range.start() {
            errors.push(error.clone());
        } else if error_range.start() >= range.end() {
            let start = error_range.start() - edit.delete.len() + edit.insert_len();
            errors.push(error.clone().with_range(TextRange::at(start, error_range.len())));
        }
    }
    errors.extend(new);
    errors.sort_by_key(|error| error.range().start());
    errors
}
