use arbor_errors::SyntaxError;
use arbor_syntax::SyntaxKind::{self, *};
use drop_bomb::DropBomb;
use text_size::TextRange;

use crate::SyntaxTreeBuilder;
use crate::lexed::Lexed;

/// Event parser over the non-trivia tokens of a text.
///
/// The grammar only records events; trivia is put back in while the events
/// are replayed by [`build_tree`].
pub(crate) struct Parser<'t> {
    lexed: &'t Lexed<'t>,
    /// Indices into `lexed` of the tokens the grammar sees.
    tokens: Vec<usize>,
    pos: usize,
    events: Vec<Event>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(lexed: &'t Lexed<'t>) -> Self {
        let tokens = (0..lexed.len()).filter(|&index| !lexed.kind(index).is_trivia()).collect();
        Self { lexed, tokens, pos: 0, events: Vec::new() }
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens.get(self.pos + n).map_or(EOF, |&index| self.lexed.kind(index))
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Range of the current token, or an empty range at the end of the text.
    pub(crate) fn current_range(&self) -> TextRange {
        let index = self.tokens.get(self.pos).copied().unwrap_or(self.lexed.len());
        self.lexed.range(index)
    }

    pub(crate) fn bump(&mut self) {
        if self.at(EOF) {
            return;
        }
        self.pos += 1;
        self.events.push(Event::Token);
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.bump();
        true
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: &str) {
        let range = self.current_range();
        self.error_at(message, range);
    }

    pub(crate) fn error_at(&mut self, message: &str, range: TextRange) {
        self.events.push(Event::Error(SyntaxError::new(message, range)));
    }

    pub(crate) fn finish(self) -> Vec<Event> {
        self.events
    }
}

pub(crate) enum Event {
    Start { kind: SyntaxKind },
    Finish,
    /// Consumes the next non-trivia token.
    Token,
    Error(SyntaxError),
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: TOMBSTONE };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(position: u32) -> Self {
        Self { position, bomb: DropBomb::new("Marker must be completed") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot } => *slot = kind,
            _ => unreachable!(),
        }
        p.events.push(Event::Finish);
    }
}

/// Replays `events` into `builder`, interleaving the trivia the parser
/// skipped.
///
/// Trivia before a node goes to its parent, so nodes start and end with
/// significant tokens. The root owns leading and trailing trivia.
pub(crate) fn build_tree(
    lexed: &Lexed<'_>,
    events: Vec<Event>,
    builder: &mut SyntaxTreeBuilder<'_>,
) {
    let mut sink = TreeSink { lexed, pos: 0, depth: 0, builder };
    for event in events {
        match event {
            Event::Start { kind: TOMBSTONE } => {}
            Event::Start { kind } => sink.start_node(kind),
            Event::Finish => sink.finish_node(),
            Event::Token => {
                sink.eat_trivia();
                sink.token();
            }
            Event::Error(error) => sink.builder.error(error),
        }
    }
}

struct TreeSink<'a, 'b, 'cache> {
    lexed: &'a Lexed<'a>,
    pos: usize,
    depth: usize,
    builder: &'b mut SyntaxTreeBuilder<'cache>,
}

impl TreeSink<'_, '_, '_> {
    fn start_node(&mut self, kind: SyntaxKind) {
        if self.depth > 0 {
            self.eat_trivia();
        }
        self.depth += 1;
        self.builder.start_node(kind);
    }

    fn finish_node(&mut self) {
        self.depth -= 1;
        if self.depth == 0 {
            self.eat_trivia();
        }
        self.builder.finish_node();
    }

    fn eat_trivia(&mut self) {
        while self.pos < self.lexed.len() && self.lexed.kind(self.pos).is_trivia() {
            self.token();
        }
    }

    fn token(&mut self) {
        if let Some(error) = self.lexed.error(self.pos) {
            self.builder.error(error.clone());
        }
        self.builder.token(self.lexed.kind(self.pos), self.lexed.text(self.pos));
        self.pos += 1;
    }
}
