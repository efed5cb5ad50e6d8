// src/models.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- LEXICAL MODELS ---
// Produced by the scanner, consumed by the parser.

/// The classification of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A numeric literal, optionally negative, with at most one decimal point.
    Number,
    /// A double-quoted string literal, quotes and escapes still in place.
    String,
    /// A bare run of letters, digits and underscores.
    Identifier,
    /// The case-insensitive keyword `true`.
    True,
    /// The case-insensitive keyword `false`.
    False,
    /// The case-insensitive keyword `null`.
    Null,
    /// Appended once after the last real token.
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Identifier => "identifier",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::EndOfInput => "end of input",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit. Positions are 1-based and only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::EndOfInput {
            write!(f, "{} at {}:{}", self.kind, self.line, self.column)
        } else {
            write!(
                f,
                "{} '{}' at {}:{}",
                self.kind, self.text, self.line, self.column
            )
        }
    }
}

// --- PARSED VALUES ---

/// The numeric representation used for every number literal of a parse.
/// This is a parser-wide choice, never a per-argument one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberPrecision {
    /// 32-bit floating point (`f32`).
    #[default]
    Single,
    /// 64-bit floating point (`f64`).
    Double,
    /// 96-bit fixed-point decimal (`rust_decimal::Decimal`).
    Decimal,
}

impl fmt::Display for NumberPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Decimal => "decimal",
        };
        f.write_str(name)
    }
}

/// A parsed number, tagged with the precision it was parsed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Single(f32),
    Double(f64),
    Decimal(Decimal),
}

impl Number {
    pub fn precision(&self) -> NumberPrecision {
        match self {
            Self::Single(_) => NumberPrecision::Single,
            Self::Double(_) => NumberPrecision::Double,
            Self::Decimal(_) => NumberPrecision::Decimal,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
        }
    }
}

/// A dynamically typed argument value as produced by the parser.
///
/// Bare identifiers are kept apart from quoted strings here, but bind to
/// string parameters exactly like them.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
    Identifier(String),
}

impl ArgValue {
    /// The coarse type category used in type-mismatch reports.
    pub fn category(&self) -> TypeCategory {
        match self {
            Self::String(_) | Self::Identifier(_) => TypeCategory::String,
            Self::Number(_) => TypeCategory::Number,
            Self::Bool(_) => TypeCategory::Bool,
            Self::Null => TypeCategory::Unknown,
        }
    }

    /// Returns the text of a string or identifier value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Identifier(s) => f.write_str(s),
        }
    }
}

/// Type categories named in binding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    String,
    Bool,
    Number,
    Unknown,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The outcome of parsing one line: a command name and its arguments in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub command: String,
    pub arguments: Vec<ArgValue>,
}

// --- PARAMETER SHAPE ---
// Declared per command through the registry builder.

/// The declared type of a command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    String,
    Bool,
    Single,
    Double,
    Decimal,
}

impl ArgType {
    pub fn category(self) -> TypeCategory {
        match self {
            Self::String => TypeCategory::String,
            Self::Bool => TypeCategory::Bool,
            Self::Single | Self::Double | Self::Decimal => TypeCategory::Number,
        }
    }

    /// The number precision this type requires, if it is numeric.
    pub fn precision(self) -> Option<NumberPrecision> {
        match self {
            Self::Single => Some(NumberPrecision::Single),
            Self::Double => Some(NumberPrecision::Double),
            Self::Decimal => Some(NumberPrecision::Decimal),
            Self::String | Self::Bool => None,
        }
    }

    /// Whether a parameter of this type may be declared under `precision`.
    pub fn is_allowed_under(self, precision: NumberPrecision) -> bool {
        self.precision().is_none_or(|required| required == precision)
    }

    /// Assignability table for non-null values.
    pub fn accepts(self, value: &ArgValue) -> bool {
        matches!(
            (self, value),
            (Self::String, ArgValue::String(_) | ArgValue::Identifier(_))
                | (Self::Bool, ArgValue::Bool(_))
                | (Self::Single, ArgValue::Number(Number::Single(_)))
                | (Self::Double, ArgValue::Number(Number::Double(_)))
                | (Self::Decimal, ArgValue::Number(Number::Decimal(_)))
        )
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Single => "single",
            Self::Double => "double",
            Self::Decimal => "decimal",
        };
        f.write_str(name)
    }
}

/// A declared type together with whether its nullable form was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgSpec {
    pub arg_type: ArgType,
    pub nullable: bool,
}

impl ArgSpec {
    pub const fn new(arg_type: ArgType, nullable: bool) -> Self {
        Self { arg_type, nullable }
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.arg_type)
        } else {
            write!(f, "{}", self.arg_type)
        }
    }
}

/// One slot of a command's parameter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterSpec {
    pub declared: ArgSpec,
    pub optional: bool,
}

impl ParameterSpec {
    pub const fn new(declared: ArgSpec, optional: bool) -> Self {
        Self { declared, optional }
    }
}

// --- CONFIGURATION MODELS (What is read from `config.toml`) ---

/// Options threaded into the scanner and parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    pub number_precision: NumberPrecision,
    pub allow_null: bool,
}

/// Options governing command lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerOptions {
    pub case_insensitive_command_names: bool,
}

/// The complete configuration of a command runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub parser: ParserOptions,
    pub runner: RunnerOptions,
}
