//! # Command Runner
//!
//! The facade applications talk to: one parser configuration plus one registry.
//! `execute` runs a whole line through scan, parse and dispatch.

use crate::{
    core::{
        dispatcher::{self, DispatchError},
        parser::{self, ParseError},
        registry::{CommandBuilder, CommandDefinition, CommandRegistry, RegistrationError},
    },
    models::{ParseResult, ParserOptions, ShellConfig},
};
use thiserror::Error;

/// Any failure of [`CommandRunner::execute`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[derive(Debug, Default)]
pub struct CommandRunner {
    options: ParserOptions,
    registry: CommandRegistry,
}

impl CommandRunner {
    pub fn new(config: ShellConfig) -> Self {
        log::debug!("Creating command runner with {:?}", config);
        Self {
            options: config.parser,
            registry: CommandRegistry::new(
                config.runner.case_insensitive_command_names,
                config.parser.number_precision,
            ),
        }
    }

    pub fn parser_options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses `line` without dispatching it.
    pub fn parse(&self, line: &str) -> Result<ParseResult, ParseError> {
        parser::parse(line, &self.options)
    }

    /// Parses `line` and dispatches it to the matching command.
    ///
    /// On error no handler has run.
    pub fn execute(&mut self, line: &str) -> Result<(), ExecuteError> {
        let parsed = self.parse(line)?;
        log::debug!("Executing '{}'", parsed.command);
        dispatcher::dispatch(&mut self.registry, parsed)?;
        Ok(())
    }

    // --- REGISTRY DELEGATION ---

    pub fn register_command(&mut self, name: &str) -> Result<CommandBuilder<'_>, RegistrationError> {
        self.registry.register_command(name)
    }

    pub fn remove_command(&mut self, name: &str) -> bool {
        self.registry.remove_command(name)
    }

    pub fn clear_commands(&mut self) {
        self.registry.clear_commands();
    }

    pub fn is_valid_command(&self, name_or_alias: &str) -> bool {
        self.registry.is_valid_command(name_or_alias)
    }

    pub fn find_command(&self, name_or_alias: &str) -> Option<&CommandDefinition> {
        self.registry.find_command(name_or_alias)
    }

    pub fn help_print(&self, name_or_alias: &str) -> Option<String> {
        self.registry.help_print_for(name_or_alias)
    }

    /// One line per command, see [`CommandRegistry::help_lines`].
    pub fn help_overview(&self) -> String {
        self.registry.help_lines().join("\n")
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.registry.commands()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}
