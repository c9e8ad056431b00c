mod logger;

use anyhow::{Context as _, bail};
use arbor_errors::Renderer;
use arbor_parse::source_file;
use arbor_syntax::{TextRange, TextSize};
use arbor_tokenizer::tokenize;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser as _;
use log::LevelFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(clap::Parser)]
#[command(version, about = "Inspect lossless syntax trees of Rust-like source files")]
struct Options {
    /// Log tokenizer and parser decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print every token with its range.
    Tokens { path: Utf8PathBuf },
    /// Print the syntax tree and its errors.
    Tree { path: Utf8PathBuf },
    /// Report syntax errors, failing if there are any.
    Check { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    let level = if options.verbose { LevelFilter::Trace } else { LevelFilter::Warn };
    logger::init(level)?;

    match options.command {
        Command::Tokens { path } => {
            let text = read(&path)?;
            let mut offset = TextSize::new(0);
            for token in tokenize(&text) {
                let range = TextRange::at(offset, token.len);
                offset += token.len;
                println!("{:?}@{range:?} {:?}", token.kind, &text[range]);
                if let Some(error) = token.error {
                    println!("  error: {error}");
                }
            }
        }
        Command::Tree { path } => {
            let text = read(&path)?;
            print!("{}", source_file(&text).debug_dump());
        }
        Command::Check { path } => {
            let text = read(&path)?;
            let errors = source_file(&text).errors();

            let renderer = Renderer::styled();
            for error in &errors {
                eprintln!("{}", error.render(&renderer, path.as_str(), &text));
            }
            if !errors.is_empty() {
                bail!("`{path}` has {} syntax error(s)", errors.len());
            }
        }
    }
    Ok(())
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::Options;

    #[test]
    fn options_are_consistent() {
        Options::command().debug_assert();
    }
}
