//! # Scanner
//!
//! Converts one raw command line into an ordered sequence of classified [`Token`]s.
//!
//! At every position the scanner tries a fixed list of matchers in priority order
//! (`true`, `false`, `null`, number, string, identifier). Each matcher re-scans from
//! the same offset without consuming anything on failure; the first one that matches
//! wins and scanning resumes after the characters it consumed.

use crate::models::{Token, TokenKind};
use thiserror::Error;

/// Errors raised while classifying characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No matcher accepted the input at this position.
    #[error("unexpected character(s) '{found}' at line {line}, column {column}")]
    UnexpectedCharacter {
        found: String,
        line: usize,
        column: usize,
    },
    /// A backslash inside a string literal was followed by something other than `\` or `n`.
    #[error("'\\{found}' is not a valid escape sequence (line {line}, column {column})")]
    InvalidEscape {
        found: char,
        line: usize,
        column: usize,
    },
    /// The input ended inside a string literal.
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },
}

/// Characters a command name, identifier or keyword delimiter check is made of.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits `line` into tokens and appends a final [`TokenKind::EndOfInput`].
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len() / 4 + 1);
    let mut cursor = Cursor::start();
    let mut pos = 0;

    loop {
        while let Some(&c) = chars.get(pos) {
            if !c.is_whitespace() {
                break;
            }
            cursor.advance(c);
            pos += 1;
        }

        let rest = chars.get(pos..).unwrap_or_default();
        if rest.is_empty() {
            break;
        }

        let (kind, matched) = match match_next(rest) {
            Ok(Some(found)) => found,
            Ok(None) => {
                return Err(LexError::UnexpectedCharacter {
                    found: rest.iter().take_while(|c| !c.is_whitespace()).collect(),
                    line: cursor.line,
                    column: cursor.column,
                });
            }
            Err(failure) => return Err(failure.into_lex_error(rest, cursor)),
        };

        tokens.push(Token::new(kind, matched.text, cursor.line, cursor.column));
        for &c in rest.iter().take(matched.consumed) {
            cursor.advance(c);
        }
        pos += matched.consumed;
    }

    tokens.push(Token::new(
        TokenKind::EndOfInput,
        String::new(),
        cursor.line,
        cursor.column,
    ));
    log::trace!("Tokenized {:?} into {} token(s).", line, tokens.len());
    Ok(tokens)
}

// --- MATCHERS ---

/// What a matcher would consume if it wins.
#[derive(Debug)]
struct Match {
    consumed: usize,
    text: String,
}

/// A hard failure: the input started like a string literal but is malformed.
#[derive(Debug)]
enum MatchFailure {
    InvalidEscape { offset: usize, found: char },
    Unterminated,
}

impl MatchFailure {
    fn into_lex_error(self, rest: &[char], start: Cursor) -> LexError {
        match self {
            Self::InvalidEscape { offset, found } => {
                let mut at = start;
                for &c in rest.iter().take(offset) {
                    at.advance(c);
                }
                LexError::InvalidEscape {
                    found,
                    line: at.line,
                    column: at.column,
                }
            }
            Self::Unterminated => LexError::UnterminatedString {
                line: start.line,
                column: start.column,
            },
        }
    }
}

type MatchResult = Result<Option<Match>, MatchFailure>;
type Matcher = fn(&[char]) -> MatchResult;

/// Priority order matters: keywords shadow identifiers, numbers shadow identifiers.
const MATCHERS: &[(TokenKind, Matcher)] = &[
    (TokenKind::True, match_true),
    (TokenKind::False, match_false),
    (TokenKind::Null, match_null),
    (TokenKind::Number, match_number),
    (TokenKind::String, match_string),
    (TokenKind::Identifier, match_identifier),
];

fn match_next(input: &[char]) -> Result<Option<(TokenKind, Match)>, MatchFailure> {
    for (kind, matcher) in MATCHERS {
        if let Some(matched) = matcher(input)? {
            return Ok(Some((*kind, matched)));
        }
    }
    Ok(None)
}

fn match_true(input: &[char]) -> MatchResult {
    Ok(match_keyword(input, "true"))
}

fn match_false(input: &[char]) -> MatchResult {
    Ok(match_keyword(input, "false"))
}

fn match_null(input: &[char]) -> MatchResult {
    Ok(match_keyword(input, "null"))
}

/// Case-insensitive literal that must not run into further identifier characters.
fn match_keyword(input: &[char], keyword: &str) -> Option<Match> {
    let len = keyword.chars().count();
    let candidate: String = input.get(..len)?.iter().collect();
    if !candidate.eq_ignore_ascii_case(keyword) {
        return None;
    }
    if input.get(len).is_some_and(|&next| is_identifier_char(next)) {
        return None;
    }
    Some(Match {
        consumed: len,
        text: candidate,
    })
}

/// `-` only in first position, at most one `.`, and `_` group separators once a
/// digit has been seen. Separators are consumed but left out of the token text.
fn match_number(input: &[char]) -> MatchResult {
    let mut text = String::new();
    let mut consumed = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    for (i, &c) in input.iter().enumerate() {
        match c {
            '-' if i == 0 => text.push(c),
            '0'..='9' => {
                seen_digit = true;
                text.push(c);
            }
            '.' if seen_point => return Ok(None),
            '.' => {
                seen_point = true;
                text.push(c);
            }
            '_' if seen_digit => {}
            _ => break,
        }
        consumed = i + 1;
    }

    Ok(seen_digit.then_some(Match { consumed, text }))
}

/// Validates escapes but leaves decoding to the parser; the text keeps its quotes.
fn match_string(input: &[char]) -> MatchResult {
    if input.first() != Some(&'"') {
        return Ok(None);
    }

    let mut i = 1;
    while let Some(&c) = input.get(i) {
        match c {
            '"' => {
                return Ok(Some(Match {
                    consumed: i + 1,
                    text: input.iter().take(i + 1).collect(),
                }));
            }
            '\\' => match input.get(i + 1) {
                Some('\\' | 'n') => i += 2,
                Some(&found) => return Err(MatchFailure::InvalidEscape { offset: i, found }),
                None => return Err(MatchFailure::Unterminated),
            },
            _ => i += 1,
        }
    }

    Err(MatchFailure::Unterminated)
}

fn match_identifier(input: &[char]) -> MatchResult {
    let consumed = input.iter().take_while(|&&c| is_identifier_char(c)).count();
    Ok((consumed > 0).then(|| Match {
        consumed,
        text: input.iter().take(consumed).collect(),
    }))
}

/// 1-based line/column tracker.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    line: usize,
    column: usize,
}

impl Cursor {
    fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize(line).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(line: &str) -> Vec<String> {
        tokenize(line).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_empty_line_yields_only_end_of_input() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfInput]);
        assert_eq!(kinds("   \t "), vec![TokenKind::EndOfInput]);
    }

    #[test]
    fn test_classifies_every_kind() {
        assert_eq!(
            kinds(r#"cmd "text" -12.5 TRUE false Null name_1"#),
            vec![
                TokenKind::Identifier,
                TokenKind::String,
                TokenKind::Number,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_keyword_requires_delimiter() {
        assert_eq!(
            kinds("truely nullable false_"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndOfInput,
            ]
        );
        // A non-identifier character is a valid delimiter.
        assert_eq!(
            kinds("true-1"),
            vec![TokenKind::True, TokenKind::Number, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn test_number_underscore_separators_are_discarded() {
        let tokens = tokenize("1_000_000.5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text, "1000000.5");
        assert_eq!(tokens[1].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_leading_underscore_is_not_a_number() {
        assert_eq!(
            kinds("_1"),
            vec![TokenKind::Identifier, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn test_minus_only_leads_a_number() {
        assert_eq!(texts("1-2"), vec!["1", "-2", ""]);
        let err = tokenize("-").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { ref found, .. } if found == "-"));
    }

    #[test]
    fn test_two_decimal_points_do_not_form_a_number() {
        let err = tokenize("cmd 1.2.3").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { column: 6, .. }));
    }

    #[test]
    fn test_number_stops_before_letters() {
        assert_eq!(
            kinds("12abc"),
            vec![
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::EndOfInput
            ]
        );
    }

    #[test]
    fn test_string_keeps_quotes_and_raw_escapes() {
        let tokens = tokenize(r#"say "a\\b\nc""#).unwrap();
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, r#""a\\b\nc""#);
    }

    #[test]
    fn test_string_rejects_unknown_escape() {
        let err = tokenize(r#"test "hello\t""#).unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidEscape {
                found: 't',
                line: 1,
                column: 12
            }
        );
        assert!(err.to_string().contains("not a valid escape sequence"));
    }

    #[test]
    fn test_escaped_quote_is_not_valid() {
        let err = tokenize(r#"test "say \"hi\"""#).unwrap_err();
        assert!(matches!(err, LexError::InvalidEscape { found: '"', .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#"echo "never ends"#).unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { line: 1, column: 6 });

        let err = tokenize(r#"echo "dangling\"#).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unexpected_characters_report_position() {
        let err = tokenize("go $HOME now").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                found: "$HOME".to_string(),
                line: 1,
                column: 4
            }
        );
        assert!(err.to_string().starts_with("unexpected character(s)"));
    }

    #[test]
    fn test_positions_are_tracked() {
        let tokens = tokenize("a  \"b\"\n  c").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 4));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
        assert_eq!(tokens[3].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_adjacent_tokens_without_whitespace() {
        assert_eq!(texts(r#"a"b"c"#), vec!["a", "\"b\"", "c", ""]);
    }
}
