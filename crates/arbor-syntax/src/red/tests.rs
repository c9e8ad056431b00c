use expect_test::expect;
use text_size::{TextRange, TextSize};

use crate::SyntaxKind::*;
use crate::{
    Direction, GreenNodeBuilder, GreenToken, NodeCache, NodeOrToken, SyntaxElement, SyntaxNode,
    SyntaxToken, T, TokenAtOffset, WalkEvent,
};

// foo (bar {}) baz
fn sample() -> SyntaxNode {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SOURCE_FILE);
    builder.token(IDENT, "foo");
    builder.token(WHITESPACE, " ");
    builder.start_node(TOKEN_TREE);
    builder.token(T!['('], "(");
    builder.token(IDENT, "bar");
    builder.token(WHITESPACE, " ");
    builder.start_node(TOKEN_TREE);
    builder.token(T!['{'], "{");
    builder.token(T!['}'], "}");
    builder.finish_node();
    builder.token(T![')'], ")");
    builder.finish_node();
    builder.token(WHITESPACE, " ");
    builder.token(IDENT, "baz");
    builder.finish_node();
    SyntaxNode::new_root(builder.finish())
}

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

fn texts(tokens: impl IntoIterator<Item = SyntaxToken>) -> Vec<String> {
    tokens.into_iter().map(|token| token.text().to_owned()).collect()
}

#[test]
fn debug_dump() {
    let root = sample();
    expect![[r#"
        SOURCE_FILE@0..16
          IDENT@0..3 "foo"
          WHITESPACE@3..4 " "
          TOKEN_TREE@4..12
            L_PAREN@4..5 "("
            IDENT@5..8 "bar"
            WHITESPACE@8..9 " "
            TOKEN_TREE@9..11
              L_CURLY@9..10 "{"
              R_CURLY@10..11 "}"
            R_PAREN@11..12 ")"
          WHITESPACE@12..13 " "
          IDENT@13..16 "baz"
    "#]]
    .assert_eq(&format!("{root:#?}"));
    assert_eq!(format!("{root:?}"), "SOURCE_FILE@0..16");
    assert_eq!(root.to_string(), "foo (bar {}) baz");
}

#[test]
fn child_and_sibling_navigation() {
    let root = sample();
    let outer = root.first_child().unwrap();
    let inner = outer.first_child().unwrap();

    assert_eq!(outer.text_range(), range(4, 12));
    assert_eq!(inner.text_range(), range(9, 11));
    assert_eq!(root.last_child(), Some(outer.clone()));
    assert_eq!(inner.parent(), Some(outer.clone()));
    assert_eq!(outer.index(), 2);
    assert_eq!(inner.index(), 3);
    assert_eq!(outer.next_sibling(), None);
    assert_eq!(outer.prev_sibling(), None);

    let next = outer.next_sibling_or_token().unwrap();
    assert_eq!(next.kind(), WHITESPACE);
    let prev = outer.prev_sibling_or_token().unwrap();
    assert_eq!(prev.text_range(), range(3, 4));

    let kinds: Vec<_> = outer.children_with_tokens().map(|element| element.kind()).collect();
    assert_eq!(kinds, [L_PAREN, IDENT, WHITESPACE, TOKEN_TREE, R_PAREN]);
    let reversed: Vec<_> =
        outer.children_with_tokens().rev().map(|element| element.kind()).collect();
    assert_eq!(reversed, [R_PAREN, TOKEN_TREE, WHITESPACE, IDENT, L_PAREN]);
    assert_eq!(outer.children_with_tokens().len(), 5);

    let first = root.first_child_or_token().and_then(NodeOrToken::into_token).unwrap();
    let siblings: Vec<_> =
        first.siblings_with_tokens(Direction::Next).map(|element| element.kind()).collect();
    assert_eq!(siblings, [IDENT, WHITESPACE, TOKEN_TREE, WHITESPACE, IDENT]);

    let last = root.last_child_or_token().unwrap();
    assert_eq!(last.kind(), IDENT);
    let back: Vec<_> = outer.siblings_with_tokens(Direction::Prev).map(|e| e.kind()).collect();
    assert_eq!(back, [TOKEN_TREE, WHITESPACE, IDENT]);
    assert_eq!(inner.siblings(Direction::Next).count(), 1);
}

#[test]
fn ancestors_and_descendants() {
    let root = sample();
    let inner = root.descendants().find(|node| node.text_range() == range(9, 11)).unwrap();

    let ancestors: Vec<_> = inner.ancestors().map(|node| node.text_range()).collect();
    assert_eq!(ancestors, [range(9, 11), range(4, 12), range(0, 16)]);

    let kinds: Vec<_> = root.descendants().map(|node| node.kind()).collect();
    assert_eq!(kinds, [SOURCE_FILE, TOKEN_TREE, TOKEN_TREE]);

    let tokens = root.descendants_with_tokens().filter_map(SyntaxElement::into_token);
    assert_eq!(texts(tokens).concat(), "foo (bar {}) baz");
}

#[test]
fn first_last_and_adjacent_tokens() {
    let root = sample();
    let outer = root.first_child().unwrap();

    assert_eq!(outer.first_token().unwrap().text(), "(");
    assert_eq!(outer.last_token().unwrap().text(), ")");

    let open_brace = root.token_at_offset(TextSize::new(9)).right_biased().unwrap();
    assert_eq!(open_brace.kind(), L_CURLY);
    assert_eq!(open_brace.prev_token().unwrap().kind(), WHITESPACE);
    let close_brace = open_brace.next_token().unwrap();
    assert_eq!(close_brace.kind(), R_CURLY);
    assert_eq!(close_brace.next_token().unwrap().kind(), R_PAREN);

    let forward = texts(std::iter::successors(root.first_token(), SyntaxToken::next_token));
    assert_eq!(forward.concat(), "foo (bar {}) baz");
    let mut backward = texts(std::iter::successors(root.last_token(), SyntaxToken::prev_token));
    backward.reverse();
    assert_eq!(backward, forward);
}

#[test]
fn token_at_offset_boundaries() {
    let root = sample();

    let single = root.token_at_offset(TextSize::new(1));
    assert!(matches!(&single, TokenAtOffset::Single(token) if token.text_range() == range(0, 3)));

    match root.token_at_offset(TextSize::new(3)) {
        TokenAtOffset::Between(left, right) => {
            assert_eq!(left.text_range(), range(0, 3));
            assert_eq!(right.text_range(), range(3, 4));
        }
        other => panic!("expected two tokens, got {other:?}"),
    }

    // The boundary between a token and a nested node descends into the node.
    match root.token_at_offset(TextSize::new(4)) {
        TokenAtOffset::Between(left, right) => {
            assert_eq!(left.kind(), WHITESPACE);
            assert_eq!(right.kind(), L_PAREN);
        }
        other => panic!("expected two tokens, got {other:?}"),
    }

    assert_eq!(root.token_at_offset(TextSize::new(0)).count(), 1);
    assert_eq!(root.token_at_offset(TextSize::new(16)).count(), 1);
    assert_eq!(root.token_at_offset(TextSize::new(17)), TokenAtOffset::None);

    let inner = root.first_child().unwrap().first_child().unwrap();
    assert_eq!(inner.token_at_offset(TextSize::new(3)), TokenAtOffset::None);
}

#[test]
fn token_at_offset_skips_empty_tokens() {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SOURCE_FILE);
    builder.token(IDENT, "ab");
    builder.token(ERROR, "");
    builder.token(IDENT, "cd");
    builder.finish_node();
    let root = SyntaxNode::new_root(builder.finish());

    let texts: Vec<_> = root.token_at_offset(TextSize::new(2)).map(|t| t.to_string()).collect();
    assert_eq!(texts, ["ab", "cd"]);

    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SOURCE_FILE);
    builder.finish_node();
    let empty = SyntaxNode::new_root(builder.finish());
    assert_eq!(empty.token_at_offset(TextSize::new(0)), TokenAtOffset::None);
}

#[test]
fn covering_element() {
    let root = sample();

    let element = root.covering_element(range(5, 7));
    assert_eq!(element.kind(), IDENT);
    assert_eq!(element.text_range(), range(5, 8));

    let element = root.covering_element(range(5, 10));
    assert_eq!(element.kind(), TOKEN_TREE);
    assert_eq!(element.text_range(), range(4, 12));

    let element = root.covering_element(range(2, 5));
    assert_eq!(element.kind(), SOURCE_FILE);

    assert!(root.child_or_token_at_range(range(2, 5)).is_none());
    assert!(root.child_or_token_at_range(range(20, 21)).is_none());
}

#[test]
#[should_panic(expected = "is not inside the node")]
fn covering_element_outside_panics() {
    sample().covering_element(range(10, 30));
}

#[test]
fn walk_events_in_order() {
    let root = sample();
    let events: Vec<String> = root
        .preorder()
        .map(|event| match event {
            WalkEvent::Enter(node) => format!("enter {:?}", node.text_range()),
            WalkEvent::Leave(node) => format!("leave {:?}", node.text_range()),
        })
        .collect();

    assert_eq!(
        events,
        ["enter 0..16", "enter 4..12", "enter 9..11", "leave 9..11", "leave 4..12", "leave 0..16"]
    );

    let with_tokens = root.preorder_with_tokens().count();
    // 3 nodes and 10 tokens, entered and left once each.
    assert_eq!(with_tokens, 26);
}

#[test]
fn skip_subtree() {
    let root = sample();
    let mut preorder = root.preorder_with_tokens();
    let mut entered = Vec::new();
    while let Some(event) = preorder.next() {
        if let WalkEvent::Enter(element) = event {
            entered.push(element.kind());
            if element.kind() == TOKEN_TREE {
                preorder.skip_subtree();
            }
        }
    }

    assert_eq!(entered, [SOURCE_FILE, IDENT, WHITESPACE, TOKEN_TREE, WHITESPACE, IDENT]);
}

#[test]
fn walk_of_a_subtree_stays_inside_it() {
    let root = sample();
    let outer = root.first_child().unwrap();

    let kinds: Vec<_> = outer.descendants_with_tokens().map(|element| element.kind()).collect();
    assert_eq!(
        kinds,
        [TOKEN_TREE, L_PAREN, IDENT, WHITESPACE, TOKEN_TREE, L_CURLY, R_CURLY, R_PAREN]
    );
}

#[test]
fn identity_is_green_and_offset() {
    let mut cache = NodeCache::new();
    let mut builder = GreenNodeBuilder::with_cache(&mut cache);
    builder.start_node(SOURCE_FILE);
    for _ in 0..2 {
        builder.start_node(TOKEN_TREE);
        builder.token(T!['('], "(");
        builder.token(T![')'], ")");
        builder.finish_node();
    }
    builder.finish_node();
    let root = SyntaxNode::new_root(builder.finish());

    let first = root.first_child().unwrap();
    let second = root.last_child().unwrap();
    assert!(first.green().ptr_eq(second.green()));
    assert_ne!(first, second);

    assert_eq!(root.first_child(), Some(first.clone()));
    let mut set = std::collections::HashSet::new();
    set.insert(first.clone());
    assert!(set.contains(&root.first_child().unwrap()));
    assert!(!set.contains(&second));

    // Same green, same offset, different tree: still equal.
    let reparsed = SyntaxNode::new_root(root.green().clone());
    assert_eq!(reparsed, root);
    assert_eq!(reparsed.first_child().unwrap(), first);
}

#[test]
fn replace_with_shares_untouched_subtrees() {
    let root = sample();
    let outer = root.first_child().unwrap();
    let inner = outer.first_child().unwrap();

    let mut builder = GreenNodeBuilder::new();
    builder.start_node(TOKEN_TREE);
    builder.token(T!['['], "[");
    builder.token(T![']'], "]");
    builder.finish_node();
    let new_root = SyntaxNode::new_root(inner.replace_with(builder.finish()));

    assert_eq!(new_root.to_string(), "foo (bar []) baz");
    assert_eq!(root.to_string(), "foo (bar {}) baz");

    let old_greens: Vec<_> = root.green().children().collect();
    let new_greens: Vec<_> = new_root.green().children().collect();
    for index in [0, 1, 3, 4] {
        let (old, new) = (old_greens[index].cloned(), new_greens[index].cloned());
        assert_eq!(old.kind(), new.kind());
        match (old, new) {
            (NodeOrToken::Token(old), NodeOrToken::Token(new)) => assert!(old.ptr_eq(&new)),
            _ => panic!("expected tokens"),
        }
    }

    let baz = new_root.last_token().unwrap();
    let renamed = SyntaxNode::new_root(baz.replace_with(GreenToken::new(IDENT, "quux")));
    assert_eq!(renamed.to_string(), "foo (bar []) quux");
}

#[test]
fn clone_subtree_rebases_offsets() {
    let root = sample();
    let inner = root.first_child().unwrap().first_child().unwrap();

    let detached = inner.clone_subtree();
    assert_eq!(detached.text_range(), range(0, 2));
    assert_eq!(detached.parent(), None);
    assert!(detached.green().ptr_eq(inner.green()));
}

#[test]
fn deep_trees_drop_without_recursion() {
    let depth = 100_000;
    let mut builder = GreenNodeBuilder::new();
    for _ in 0..depth {
        builder.start_node(TOKEN_TREE);
    }
    builder.token(IDENT, "x");
    for _ in 0..depth {
        builder.finish_node();
    }
    let green = builder.finish();

    let token = SyntaxNode::new_root(green.clone()).first_token().unwrap();
    assert_eq!(token.ancestors().count(), depth);
    drop(token);
    drop(green);
}

#[test]
fn trees_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyntaxNode>();
    assert_send_sync::<SyntaxToken>();
    assert_send_sync::<crate::GreenNode>();
    assert_send_sync::<crate::NodeCache>();

    let root = sample();
    let handle = std::thread::spawn(move || root.descendants().count());
    assert_eq!(handle.join().unwrap(), 3);
}

#[test]
fn child_nodes_from_both_ends() {
    // (a) [c] {d}
    let groups = [
        ((T!['('], "("), "a", (T![')'], ")")),
        ((T!['['], "["), "c", (T![']'], "]")),
        ((T!['{'], "{"), "d", (T!['}'], "}")),
    ];
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SOURCE_FILE);
    for ((open, open_text), inner, (close, close_text)) in groups {
        builder.start_node(TOKEN_TREE);
        builder.token(open, open_text);
        builder.token(IDENT, inner);
        builder.token(close, close_text);
        builder.finish_node();
        builder.token(WHITESPACE, " ");
    }
    builder.finish_node();
    let root = SyntaxNode::new_root(builder.finish());

    let forward: Vec<_> = root.children().map(|node| node.to_string()).collect();
    assert_eq!(forward, ["(a)", "[c]", "{d}"]);
    let backward: Vec<_> = root.children().rev().map(|node| node.to_string()).collect();
    assert_eq!(backward, ["{d}", "[c]", "(a)"]);

    let mut children = root.children();
    assert_eq!(children.next().map(|node| node.to_string()).as_deref(), Some("(a)"));
    assert_eq!(children.next_back().map(|node| node.to_string()).as_deref(), Some("{d}"));
    assert_eq!(children.next().map(|node| node.to_string()).as_deref(), Some("[c]"));
    assert!(children.next().is_none());
    assert!(children.next_back().is_none());
}
