// src/cli.rs

use crate::models::{NumberPrecision, ShellConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// typeshell: run one typed command line against a set of demo commands.
///
/// The words of LINE are joined with single spaces and executed as one command
/// line, e.g. `typeshell add 1 2` or `typeshell echo '"hello world"'`.
///
/// Settings come from the config file and can be overridden by the flags below.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file. Defaults to `$TYPESHELL_CONFIG` or
    /// `<config dir>/typeshell/config.toml`.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Numeric representation used for number literals.
    #[arg(long, value_enum)]
    pub precision: Option<PrecisionArg>,

    /// Accept `null` as an argument value.
    #[arg(long)]
    pub allow_null: bool,

    /// Match command names and aliases ignoring case.
    #[arg(long)]
    pub case_insensitive: bool,

    /// Print the token stream of the line instead of executing it.
    #[arg(long)]
    pub tokens: bool,

    /// The command line to execute.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub line: Vec<String>,
}

/// Command-line spelling of [`NumberPrecision`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionArg {
    Single,
    Double,
    Decimal,
}

impl From<PrecisionArg> for NumberPrecision {
    fn from(value: PrecisionArg) -> Self {
        match value {
            PrecisionArg::Single => Self::Single,
            PrecisionArg::Double => Self::Double,
            PrecisionArg::Decimal => Self::Decimal,
        }
    }
}

impl Cli {
    /// Applies the command-line flags on top of a loaded configuration.
    /// Flags can only switch options on; absent flags keep the file's values.
    pub fn apply_overrides(&self, config: &mut ShellConfig) {
        if let Some(precision) = self.precision {
            config.parser.number_precision = precision.into();
        }
        if self.allow_null {
            config.parser.allow_null = true;
        }
        if self.case_insensitive {
            config.runner.case_insensitive_command_names = true;
        }
    }

    pub fn joined_line(&self) -> String {
        self.line.join(" ")
    }
}
