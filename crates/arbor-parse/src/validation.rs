//! Checks on literal tokens that the tokenizer leaves to a later pass.

use arbor_errors::SyntaxError;
use arbor_syntax::SyntaxKind::*;
use arbor_syntax::{NodeOrToken, SyntaxNode, SyntaxToken};
use arbor_tokenizer::unescape::{Mode, unescape};
use text_size::{TextRange, TextSize};

const INT_SUFFIXES: &[&str] =
    &["u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128", "isize"];
const FLOAT_SUFFIXES: &[&str] = &["f32", "f64"];

pub(crate) fn validate(root: &SyntaxNode, errors: &mut Vec<SyntaxError>) {
    for token in root.descendants_with_tokens().filter_map(NodeOrToken::into_token) {
        match token.kind() {
            CHAR => validate_char(&token, Mode::Char, errors),
            BYTE => validate_char(&token, Mode::Byte, errors),
            BYTE_STRING => validate_byte_string(&token, errors),
            INT_NUMBER => validate_int(&token, errors),
            FLOAT_NUMBER => validate_float(&token, errors),
            _ => {}
        }
    }
}

fn validate_char(token: &SyntaxToken, mode: Mode, errors: &mut Vec<SyntaxError>) {
    let text = token.text();
    let prefix_len = if mode == Mode::Byte { 2 } else { 1 };
    let Some(inner) = text.get(prefix_len..) else { return };
    // Unterminated literals are reported by the tokenizer.
    let Some(close) = inner.rfind('\'') else { return };
    let body = &inner[..close];

    let mut units = 0usize;
    let mut malformed = false;
    unescape(body, mode, &mut |_, result| {
        units += 1;
        malformed |= result.is_err();
    });
    if malformed {
        return;
    }

    let name = if mode == Mode::Byte { "Byte" } else { "Character" };
    match units {
        0 => errors.push(SyntaxError::new(
            format!("Empty {} literal", name.to_lowercase()),
            token.text_range(),
        )),
        1 => {}
        _ => errors.push(SyntaxError::new(
            format!("{name} literal should be one character long"),
            token.text_range(),
        )),
    }

    if mode == Mode::Byte {
        let body_start = token.text_range().start() + TextSize::new(prefix_len as u32);
        check_ascii(body, body_start, "Byte literals", errors);
    }
}

fn validate_byte_string(token: &SyntaxToken, errors: &mut Vec<SyntaxError>) {
    let text = token.text();
    let (Some(open), Some(close)) = (text.find('"'), text.rfind('"')) else { return };
    if open == close {
        return;
    }
    let body_start = token.text_range().start() + TextSize::of(&text[..=open]);
    check_ascii(&text[open + 1..close], body_start, "Byte string literals", errors);
}

fn check_ascii(body: &str, body_start: TextSize, what: &str, errors: &mut Vec<SyntaxError>) {
    if let Some((index, c)) = body.char_indices().find(|(_, c)| !c.is_ascii()) {
        let start = body_start + TextSize::of(&body[..index]);
        errors.push(SyntaxError::new(
            format!("{what} must not contain non-ASCII characters"),
            TextRange::at(start, TextSize::of(c)),
        ));
    }
}

fn validate_int(token: &SyntaxToken, errors: &mut Vec<SyntaxError>) {
    let text = token.text();
    let (prefix, is_digit): (usize, fn(char) -> bool) = match text.get(..2) {
        Some("0x") => (2, |c| c.is_ascii_hexdigit() || c == '_'),
        Some("0b" | "0o") => (2, |c| c.is_ascii_digit() || c == '_'),
        _ => (0, |c| c.is_ascii_digit() || c == '_'),
    };
    let digits_end = skip_while(text, prefix, is_digit);
    let suffix = &text[digits_end..];

    let valid = suffix.is_empty()
        || INT_SUFFIXES.contains(&suffix)
        || (prefix == 0 && FLOAT_SUFFIXES.contains(&suffix));
    if !valid {
        invalid_suffix(token, digits_end, errors);
    }
}

fn validate_float(token: &SyntaxToken, errors: &mut Vec<SyntaxError>) {
    let text = token.text();
    // Floats with a base prefix are already an error.
    if matches!(text.get(..2), Some("0x" | "0b" | "0o")) {
        return;
    }

    let is_digit = |c: char| c.is_ascii_digit() || c == '_';
    let mut end = skip_while(text, 0, is_digit);
    if text[end..].starts_with('.') {
        end = skip_while(text, end + 1, is_digit);
    }
    if text[end..].starts_with(['e', 'E']) {
        end += 1;
        if text[end..].starts_with(['+', '-']) {
            end += 1;
        }
        end = skip_while(text, end, is_digit);
    }

    let suffix = &text[end..];
    if !suffix.is_empty() && !FLOAT_SUFFIXES.contains(&suffix) {
        invalid_suffix(token, end, errors);
    }
}

fn invalid_suffix(token: &SyntaxToken, suffix_start: usize, errors: &mut Vec<SyntaxError>) {
    let text = token.text();
    let suffix = &text[suffix_start..];
    let start = token.text_range().start() + TextSize::of(&text[..suffix_start]);
    errors.push(SyntaxError::new(
        format!("Invalid suffix `{suffix}` for number literal"),
        TextRange::at(start, TextSize::of(suffix)),
    ));
}

fn skip_while(text: &str, start: usize, f: impl Fn(char) -> bool) -> usize {
    text[start..].find(|c: char| !f(c)).map_or(text.len(), |offset| start + offset)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::source_file;

    fn messages(text: &str) -> Vec<String> {
        source_file(text).errors().iter().map(|error| error.message().to_owned()).collect()
    }

    #[rstest]
    #[case("'a' b'x' '\\n' 1u8 0x1Fi64 2f32 1.5 1e3f64 b\"abc\" br#\"x\"#")]
    #[case("0b1010_u128 1_000usize '\\u{1F600}'")]
    fn valid_literals(#[case] text: &str) {
        assert_eq!(messages(text), Vec::<String>::new());
    }

    #[rstest]
    #[case("''", "Empty character literal")]
    #[case("b''", "Empty byte literal")]
    #[case("'ab'", "Character literal should be one character long")]
    #[case("b'é'", "Byte literals must not contain non-ASCII characters")]
    #[case("b\"é\"", "Byte string literals must not contain non-ASCII characters")]
    #[case("br\"é\"", "Byte string literals must not contain non-ASCII characters")]
    #[case("1u7", "Invalid suffix `u7` for number literal")]
    #[case("0x1g", "Invalid suffix `g` for number literal")]
    #[case("0b1f32", "Invalid suffix `f32` for number literal")]
    #[case("1.0u8", "Invalid suffix `u8` for number literal")]
    fn invalid_literals(#[case] text: &str, #[case] message: &str) {
        assert_eq!(messages(text), [message]);
    }

    #[test]
    fn error_ranges_point_at_the_problem() {
        let parse = source_file("x 12abc b\"aé\"");
        let ranges: Vec<_> = parse.errors().iter().map(|error| error.range()).collect();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0], text_size::TextRange::new(4.into(), 7.into()));
        assert_eq!(ranges[1], text_size::TextRange::new(11.into(), 13.into()));
    }
}
