//! Parsing text into lossless syntax trees.
//!
//! The grammar only knows about delimiters: a file is a sequence of tokens,
//! attributes and balanced token trees. Parses can be updated in place with
//! [`Parse::reparse`].

mod builder;
mod grammar;
mod lexed;
mod parse;
mod parser;
mod reparsing;
mod validation;

pub use arbor_errors::SyntaxError;
use arbor_syntax::NodeCache;
use arbor_syntax::ast::SourceFile;
pub use builder::SyntaxTreeBuilder;
use log::debug;
pub use parse::Parse;

use crate::lexed::Lexed;
use crate::parser::Parser;

pub fn source_file(text: &str) -> Parse<SourceFile> {
    parse_source_file(text, SyntaxTreeBuilder::new())
}

/// Like [`source_file`], but interns the tree in `cache`, so that parses of
/// similar texts share their nodes.
pub fn source_file_with_cache(text: &str, cache: &mut NodeCache) -> Parse<SourceFile> {
    parse_source_file(text, SyntaxTreeBuilder::with_cache(cache))
}

fn parse_source_file(text: &str, mut builder: SyntaxTreeBuilder<'_>) -> Parse<SourceFile> {
    let lexed = Lexed::new(text);
    debug!("parsing {} tokens", lexed.len());
    parse_with(&lexed, grammar::source_file, &mut builder);

    let (green, errors) = builder.finish_raw();
    Parse::new(green, errors)
}

fn parse_with(
    lexed: &Lexed<'_>,
    grammar: fn(&mut Parser<'_>),
    builder: &mut SyntaxTreeBuilder<'_>,
) {
    let mut parser = Parser::new(lexed);
    grammar(&mut parser);
    parser::build_tree(lexed, parser.finish(), builder);
}
