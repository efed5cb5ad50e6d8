//! # Parser
//!
//! Turns the token stream of one line into a [`ParseResult`]: the command name
//! followed by typed argument values in encounter order.

use crate::{
    core::scanner::{self, LexError},
    models::{ArgValue, Number, NumberPrecision, ParseResult, ParserOptions, TokenKind},
};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while structuring a line into a command and its arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("cannot parse an empty command line")]
    EmptyInput,
    #[error("expecting an identifier for command name, found {kind} '{text}' at line {line}, column {column}")]
    MissingCommandName {
        kind: TokenKind,
        text: String,
        line: usize,
        column: usize,
    },
    /// `null` appeared while the parser was configured to reject it.
    #[error("unexpected character(s) '{text}' at line {line}, column {column}: null arguments are not allowed")]
    NullNotAllowed {
        text: String,
        line: usize,
        column: usize,
    },
    #[error("'{sequence}' is not a valid escape sequence in string {literal}")]
    InvalidEscape { literal: String, sequence: String },
    #[error("malformed string literal {literal}")]
    MalformedString { literal: String },
    #[error("number '{literal}' cannot be represented with {precision} precision")]
    NumberOutOfRange {
        literal: String,
        precision: NumberPrecision,
    },
}

/// Parses one command line under `options`.
///
/// Blank lines are rejected; positions in errors refer to the untrimmed line. The
/// first token must be an identifier naming the command. Every following token up
/// to the end of input becomes one argument.
pub fn parse(line: &str, options: &ParserOptions) -> Result<ParseResult, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut tokens = scanner::tokenize(line)?.into_iter();

    let command = match tokens.next() {
        Some(token) if token.kind == TokenKind::Identifier => token.text,
        Some(token) => {
            return Err(ParseError::MissingCommandName {
                kind: token.kind,
                text: token.text,
                line: token.line,
                column: token.column,
            });
        }
        None => return Err(ParseError::EmptyInput),
    };

    let mut arguments = Vec::new();
    for token in tokens {
        let value = match token.kind {
            TokenKind::EndOfInput => break,
            TokenKind::Identifier => ArgValue::Identifier(token.text),
            TokenKind::String => ArgValue::String(unescape(&token.text)?),
            TokenKind::Number => {
                ArgValue::Number(parse_number(&token.text, options.number_precision)?)
            }
            TokenKind::True => ArgValue::Bool(true),
            TokenKind::False => ArgValue::Bool(false),
            TokenKind::Null if options.allow_null => ArgValue::Null,
            TokenKind::Null => {
                return Err(ParseError::NullNotAllowed {
                    text: token.text,
                    line: token.line,
                    column: token.column,
                });
            }
        };
        arguments.push(value);
    }

    log::trace!(
        "Parsed command '{}' with arguments {:?}",
        command,
        arguments
    );
    Ok(ParseResult { command, arguments })
}

/// Decodes a quoted string literal: strips the quotes and resolves `\\` and `\n`.
///
/// Any other escape, including a trailing lone backslash, is rejected even though
/// the scanner already screens for them.
pub fn unescape(literal: &str) -> Result<String, ParseError> {
    let body = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| ParseError::MalformedString {
            literal: literal.to_string(),
        })?;

    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => value.push('\\'),
            Some('n') => value.push('\n'),
            Some(other) => {
                return Err(ParseError::InvalidEscape {
                    literal: literal.to_string(),
                    sequence: format!("\\{other}"),
                });
            }
            None => {
                return Err(ParseError::InvalidEscape {
                    literal: literal.to_string(),
                    sequence: "\\".to_string(),
                });
            }
        }
    }
    Ok(value)
}

/// Parses a scanned number literal under the configured precision.
///
/// Non-finite floats and decimal overflow are reported as out of range.
pub fn parse_number(literal: &str, precision: NumberPrecision) -> Result<Number, ParseError> {
    let normalized = normalize_number_literal(literal);
    let out_of_range = || ParseError::NumberOutOfRange {
        literal: literal.to_string(),
        precision,
    };

    match precision {
        NumberPrecision::Single => normalized
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Number::Single)
            .ok_or_else(out_of_range),
        NumberPrecision::Double => normalized
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Number::Double)
            .ok_or_else(out_of_range),
        NumberPrecision::Decimal => Decimal::from_str(&normalized)
            .map(Number::Decimal)
            .map_err(|_| out_of_range()),
    }
}

/// The scanner accepts `5.`, `.5` and `-.5`; give every target a leading and
/// trailing digit.
fn normalize_number_literal(literal: &str) -> String {
    let (sign, digits) = match literal.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", literal),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    if digits.starts_with('.') {
        format!("{sign}0{digits}")
    } else {
        format!("{sign}{digits}")
    }
}
