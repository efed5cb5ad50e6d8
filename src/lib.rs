//! A typed command shell: a scanner and parser for one-line commands, a registry
//! of commands declared through a builder, and a dispatcher that binds the parsed
//! arguments to typed handler closures.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;

pub use crate::core::{
    dispatcher::DispatchError,
    handler::{CommandArg, HandlerKind, IntoHandler},
    parser::ParseError,
    registry::{CommandBuilder, CommandDefinition, CommandRegistry, RegistrationError},
    runner::{CommandRunner, ExecuteError},
    scanner::LexError,
};
pub use crate::models::{
    ArgSpec, ArgType, ArgValue, Number, NumberPrecision, ParseResult, ParserOptions,
    RunnerOptions, ShellConfig,
};
