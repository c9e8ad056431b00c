//! Decoding of escape sequences in char, byte and string literals.

use std::ops::Range;
use std::str::Chars;

/// The literal whose body is being unescaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Char,
    Byte,
    Str,
    ByteStr,
}

impl Mode {
    pub fn is_byte(self) -> bool {
        matches!(self, Mode::Byte | Mode::ByteStr)
    }

    pub fn in_double_quotes(self) -> bool {
        matches!(self, Mode::Str | Mode::ByteStr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeError {
    /// A `\` at the very end of the literal.
    LoneSlash,
    /// `\` followed by a char that starts no escape.
    InvalidEscape,
    /// A bare `'`, newline or tab in a char or byte literal.
    EscapeOnlyChar,
    TooShortHexEscape,
    InvalidCharInHexEscape,
    /// `\x80` and above outside byte literals.
    OutOfRangeHexEscape,
    NoBraceInUnicodeEscape,
    InvalidCharInUnicodeEscape,
    EmptyUnicodeEscape,
    UnclosedUnicodeEscape,
    LeadingUnderscoreUnicodeEscape,
    OverlongUnicodeEscape,
    LoneSurrogateUnicodeEscape,
    OutOfRangeUnicodeEscape,
    UnicodeEscapeInByte,
}

impl EscapeError {
    pub fn message(self) -> &'static str {
        match self {
            EscapeError::LoneSlash => "Character must be escaped: `\\`",
            EscapeError::InvalidEscape => "Invalid escape sequence",
            EscapeError::EscapeOnlyChar => "Character must be escaped in a character literal",
            EscapeError::TooShortHexEscape => "ASCII hex escape code must have exactly two digits",
            EscapeError::InvalidCharInHexEscape => {
                "ASCII hex escape code must contain only hex characters"
            }
            EscapeError::OutOfRangeHexEscape => "Escape sequence should be ASCII",
            EscapeError::NoBraceInUnicodeEscape => "Missing `{` to begin the unicode escape",
            EscapeError::InvalidCharInUnicodeEscape => {
                "Unicode escape must contain only hex characters and underscores"
            }
            EscapeError::EmptyUnicodeEscape => "Unicode escape must not be empty",
            EscapeError::UnclosedUnicodeEscape => "Missing `}` to terminate the unicode escape",
            EscapeError::LeadingUnderscoreUnicodeEscape => {
                "Unicode escape code must not begin with an underscore"
            }
            EscapeError::OverlongUnicodeEscape => "Unicode escape code must have at most 6 digits",
            EscapeError::LoneSurrogateUnicodeEscape => {
                "Unicode escape code must not be a surrogate"
            }
            EscapeError::OutOfRangeUnicodeEscape => "Unicode escape code must be at most 10FFFF",
            EscapeError::UnicodeEscapeInByte => "Byte literals must not contain unicode escapes",
        }
    }
}

/// Decodes the body of a literal (the text between the quotes), reporting
/// every decoded char or escape error together with its byte range in `src`.
///
/// A line continuation (`\` before a newline) in a string produces nothing.
pub fn unescape(
    src: &str,
    mode: Mode,
    callback: &mut impl FnMut(Range<usize>, Result<char, EscapeError>),
) {
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        let start = src.len() - chars.as_str().len() - c.len_utf8();
        let result = match c {
            '\\' if mode.in_double_quotes() && chars.clone().next() == Some('\n') => {
                chars.next();
                let rest = chars.as_str();
                chars = rest.trim_start_matches(is_continuation_whitespace).chars();
                continue;
            }
            '\\' => scan_escape(&mut chars, mode),
            '\'' | '\n' | '\t' if !mode.in_double_quotes() => Err(EscapeError::EscapeOnlyChar),
            _ => Ok(c),
        };
        let end = src.len() - chars.as_str().len();
        callback(start..end, result);
    }
}

fn is_continuation_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn scan_escape(chars: &mut Chars<'_>, mode: Mode) -> Result<char, EscapeError> {
    let escaped = chars.next().ok_or(EscapeError::LoneSlash)?;
    let c = match escaped {
        '"' => '"',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '\\' => '\\',
        '\'' => '\'',
        '0' => '\0',
        'x' => {
            let hi = chars.next().ok_or(EscapeError::TooShortHexEscape)?;
            let hi = hi.to_digit(16).ok_or(EscapeError::InvalidCharInHexEscape)?;
            let lo = chars.next().ok_or(EscapeError::TooShortHexEscape)?;
            let lo = lo.to_digit(16).ok_or(EscapeError::InvalidCharInHexEscape)?;
            let value = hi * 16 + lo;
            if !mode.is_byte() && value > 0x7F {
                return Err(EscapeError::OutOfRangeHexEscape);
            }
            u8::try_from(value).map(char::from).map_err(|_| EscapeError::OutOfRangeHexEscape)?
        }
        'u' => {
            let c = scan_unicode(chars)?;
            if mode.is_byte() {
                return Err(EscapeError::UnicodeEscapeInByte);
            }
            c
        }
        _ => return Err(EscapeError::InvalidEscape),
    };
    Ok(c)
}

fn scan_unicode(chars: &mut Chars<'_>) -> Result<char, EscapeError> {
    if chars.next() != Some('{') {
        return Err(EscapeError::NoBraceInUnicodeEscape);
    }

    let mut n_digits = 1;
    let mut value = match chars.next().ok_or(EscapeError::UnclosedUnicodeEscape)? {
        '_' => return Err(EscapeError::LeadingUnderscoreUnicodeEscape),
        '}' => return Err(EscapeError::EmptyUnicodeEscape),
        c => c.to_digit(16).ok_or(EscapeError::InvalidCharInUnicodeEscape)?,
    };

    loop {
        match chars.next() {
            None => return Err(EscapeError::UnclosedUnicodeEscape),
            Some('_') => {}
            Some('}') => {
                if n_digits > 6 {
                    return Err(EscapeError::OverlongUnicodeEscape);
                }
                return char::from_u32(value).ok_or(if value > 0x10FFFF {
                    EscapeError::OutOfRangeUnicodeEscape
                } else {
                    EscapeError::LoneSurrogateUnicodeEscape
                });
            }
            Some(c) => {
                let digit = c.to_digit(16).ok_or(EscapeError::InvalidCharInUnicodeEscape)?;
                n_digits += 1;
                if n_digits <= 6 {
                    value = value * 16 + digit;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn decode(src: &str, mode: Mode) -> Result<String, EscapeError> {
        let mut text = String::new();
        let mut first_error = None;
        unescape(src, mode, &mut |_, result| match result {
            Ok(c) => text.push(c),
            Err(error) => {
                first_error.get_or_insert(error);
            }
        });
        match first_error {
            Some(error) => Err(error),
            None => Ok(text),
        }
    }

    #[rstest]
    #[case(r"a\nb", "a\nb")]
    #[case(r#"\"\'\\"#, "\"'\\")]
    #[case(r"\x41\0", "A\0")]
    #[case(r"\u{1F600}", "\u{1F600}")]
    #[case(r"\u{1_0}", "\u{10}")]
    #[case("line \\\n    continued", "line continued")]
    fn decodes_strings(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(decode(src, Mode::Str).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case(r"\q", Mode::Str, EscapeError::InvalidEscape)]
    #[case("\\", Mode::Str, EscapeError::LoneSlash)]
    #[case(r"\x4", Mode::Str, EscapeError::TooShortHexEscape)]
    #[case(r"\xZZ", Mode::Str, EscapeError::InvalidCharInHexEscape)]
    #[case(r"\xFF", Mode::Str, EscapeError::OutOfRangeHexEscape)]
    #[case(r"\u41", Mode::Str, EscapeError::NoBraceInUnicodeEscape)]
    #[case(r"\u{}", Mode::Str, EscapeError::EmptyUnicodeEscape)]
    #[case(r"\u{_1}", Mode::Str, EscapeError::LeadingUnderscoreUnicodeEscape)]
    #[case(r"\u{41", Mode::Str, EscapeError::UnclosedUnicodeEscape)]
    #[case(r"\u{4g}", Mode::Str, EscapeError::InvalidCharInUnicodeEscape)]
    #[case(r"\u{1234567}", Mode::Str, EscapeError::OverlongUnicodeEscape)]
    #[case(r"\u{D800}", Mode::Str, EscapeError::LoneSurrogateUnicodeEscape)]
    #[case(r"\u{110000}", Mode::Str, EscapeError::OutOfRangeUnicodeEscape)]
    #[case(r"\u{41}", Mode::Byte, EscapeError::UnicodeEscapeInByte)]
    #[case("'", Mode::Char, EscapeError::EscapeOnlyChar)]
    fn reports_escape_errors(#[case] src: &str, #[case] mode: Mode, #[case] expected: EscapeError) {
        assert_eq!(decode(src, mode), Err(expected));
    }

    #[test]
    fn high_hex_escapes_are_bytes() {
        assert_eq!(decode(r"\xFF", Mode::ByteStr), Ok("\u{FF}".to_owned()));
    }

    #[test]
    fn ranges_cover_escapes() {
        let mut ranges = Vec::new();
        unescape(r"a\tb", Mode::Str, &mut |range, _| ranges.push(range));
        assert_eq!(ranges, [0..1, 1..3, 3..4]);
    }
}
