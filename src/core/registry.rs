//! # Command Registry
//!
//! Holds the command definitions of one session and implements the builder
//! protocol used to declare them:
//!
//! ```text
//! register_command(name) -> with_alias* -> with_arg* -> with_help? -> with_execution
//! ```
//!
//! A definition is added to the registry as soon as its name is accepted. Until a
//! handler is attached it stays *incomplete*, and dispatching it fails.

use crate::{
    constants::MAX_PARAMETERS,
    core::handler::{CommandArg, Handler, HandlerKind, IntoHandler},
    models::{ArgSpec, NumberPrecision, ParameterSpec, ParseResult},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static! {
    // Same character classes the scanner accepts for identifiers.
    static ref COMMAND_NAME_RE: Regex = Regex::new(r"^[\p{Alphabetic}\p{N}_]+$").unwrap();
}

/// Errors raised synchronously while declaring a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("'{name}' is not a valid command name: only letters, digits and underscores are allowed")]
    InvalidName { name: String },
    #[error("'{name}' is already registered as a command name or alias")]
    DuplicateName { name: String },
    #[error("invalid argument type '{spec}' for command '{command}': only string, bool and {precision} are allowed; use precision option to choose different numeric type")]
    InvalidArgumentType {
        command: String,
        spec: ArgSpec,
        precision: NumberPrecision,
    },
    #[error("command '{command}': required parameter {index} cannot follow an optional parameter")]
    RequiredAfterOptional { command: String, index: usize },
    #[error("command '{command}' cannot declare more than {max} parameters")]
    TooManyParameters { command: String, max: usize },
    #[error("handler for command '{command}' takes ({handler}) but the declared parameters are ({declared})")]
    HandlerSignatureMismatch {
        command: String,
        declared: String,
        handler: String,
    },
}

// --- DEFINITIONS ---

/// A registered command: its names, parameter shape, help text and handler.
pub struct CommandDefinition {
    name: String,
    aliases: Vec<String>,
    parameters: Vec<ParameterSpec>,
    help_text: Option<String>,
    handler: Option<Handler>,
}

impl CommandDefinition {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            parameters: Vec::new(),
            help_text: None,
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Aliases in the order they were added.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// `false` until a handler has been attached.
    pub fn is_complete(&self) -> bool {
        self.handler.is_some()
    }

    pub fn handler_kind(&self) -> Option<HandlerKind> {
        self.handler.as_ref().map(Handler::kind)
    }

    /// Number of leading required parameters.
    pub fn min_arguments(&self) -> usize {
        self.parameters.iter().take_while(|p| !p.optional).count()
    }

    pub fn max_arguments(&self) -> usize {
        self.parameters.len()
    }

    /// Whether `name` is this command's name or one of its aliases.
    pub fn matches(&self, name: &str, case_insensitive: bool) -> bool {
        names_match(&self.name, name, case_insensitive)
            || self
                .aliases
                .iter()
                .any(|alias| names_match(alias, name, case_insensitive))
    }

    /// Renders a one-line signature, e.g. `teleport <string> <single> [bool?]`.
    pub fn usage(&self) -> String {
        if matches!(self.handler_kind(), Some(HandlerKind::Raw)) {
            return format!("{} ...", self.name);
        }
        let mut usage = self.name.clone();
        for parameter in &self.parameters {
            if parameter.optional {
                usage.push_str(&format!(" [{}]", parameter.declared));
            } else {
                usage.push_str(&format!(" <{}>", parameter.declared));
            }
        }
        usage
    }

    /// Name, aliases (if any), a blank line, then the help text.
    pub fn help_print(&self) -> String {
        let mut print = self.name.clone();
        if !self.aliases.is_empty() {
            print.push_str(&format!("\nAliases: {}", self.aliases.join(", ")));
        }
        print.push_str("\n\n");
        if let Some(help) = &self.help_text {
            print.push_str(help);
        }
        print
    }

    pub(crate) fn execution_parts(&mut self) -> (Option<&mut Handler>, &[ParameterSpec]) {
        (self.handler.as_mut(), &self.parameters)
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("parameters", &self.parameters)
            .field("help_text", &self.help_text)
            .field("handler", &self.handler_kind())
            .finish()
    }
}

/// Compares two command names or aliases under the given case rule.
pub fn names_match(a: &str, b: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

// --- REGISTRY ---

/// Session-scoped set of command definitions.
///
/// Invariant: no two definitions share a name or alias under the active case rule.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    definitions: Vec<CommandDefinition>,
    case_insensitive: bool,
    precision: NumberPrecision,
}

impl CommandRegistry {
    /// Creates an empty registry. `precision` restricts which numeric parameter
    /// types may be declared.
    pub fn new(case_insensitive: bool, precision: NumberPrecision) -> Self {
        Self {
            definitions: Vec::new(),
            case_insensitive,
            precision,
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn precision(&self) -> NumberPrecision {
        self.precision
    }

    /// Adds an incomplete definition named `name` and returns its builder.
    pub fn register_command(&mut self, name: &str) -> Result<CommandBuilder<'_>, RegistrationError> {
        ensure_available(&self.definitions, name, self.case_insensitive)?;
        log::debug!("Registering command '{}'.", name);

        self.definitions.push(CommandDefinition::new(name));
        let case_insensitive = self.case_insensitive;
        let precision = self.precision;
        // Never empty after the push.
        self.definitions
            .split_last_mut()
            .map(|(definition, others)| CommandBuilder {
                definition,
                others,
                case_insensitive,
                precision,
            })
            .ok_or_else(|| RegistrationError::InvalidName {
                name: name.to_string(),
            })
    }

    /// Removes the command whose primary name is `name`. Aliases are not considered.
    pub fn remove_command(&mut self, name: &str) -> bool {
        let before = self.definitions.len();
        let case_insensitive = self.case_insensitive;
        self.definitions
            .retain(|definition| !names_match(&definition.name, name, case_insensitive));
        let removed = self.definitions.len() != before;
        log::debug!("Removing command '{}': removed = {}.", name, removed);
        removed
    }

    pub fn clear_commands(&mut self) {
        log::debug!("Clearing {} command(s).", self.definitions.len());
        self.definitions.clear();
    }

    /// Finds a definition by name, then by alias, under the active case rule.
    pub fn find_command(&self, name_or_alias: &str) -> Option<&CommandDefinition> {
        self.definitions
            .iter()
            .find(|d| names_match(&d.name, name_or_alias, self.case_insensitive))
            .or_else(|| {
                self.definitions
                    .iter()
                    .find(|d| d.matches(name_or_alias, self.case_insensitive))
            })
    }

    pub(crate) fn find_command_mut(&mut self, name_or_alias: &str) -> Option<&mut CommandDefinition> {
        let case_insensitive = self.case_insensitive;
        let position = self
            .definitions
            .iter()
            .position(|d| names_match(&d.name, name_or_alias, case_insensitive))
            .or_else(|| {
                self.definitions
                    .iter()
                    .position(|d| d.matches(name_or_alias, case_insensitive))
            })?;
        self.definitions.get_mut(position)
    }

    pub fn is_valid_command(&self, name_or_alias: &str) -> bool {
        self.find_command(name_or_alias).is_some()
    }

    /// The formatted help of a command, or `None` if it is unknown.
    pub fn help_print_for(&self, name_or_alias: &str) -> Option<String> {
        self.find_command(name_or_alias)
            .map(CommandDefinition::help_print)
    }

    /// One line per command: the name padded to the longest name, then the first
    /// line of its help text.
    pub fn help_lines(&self) -> Vec<String> {
        let longest = self
            .definitions
            .iter()
            .map(|d| d.name.chars().count())
            .max()
            .unwrap_or(0);
        self.definitions
            .iter()
            .map(|d| {
                let summary = d.help_text().and_then(|h| h.lines().next()).unwrap_or("");
                format!("{:<width$} {}", d.name, summary, width = longest)
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    /// Definitions in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Validates the character set of `name` and that no definition uses it yet.
fn ensure_available(
    definitions: &[CommandDefinition],
    name: &str,
    case_insensitive: bool,
) -> Result<(), RegistrationError> {
    if !COMMAND_NAME_RE.is_match(name) {
        return Err(RegistrationError::InvalidName {
            name: name.to_string(),
        });
    }
    if definitions.iter().any(|d| d.matches(name, case_insensitive)) {
        return Err(RegistrationError::DuplicateName {
            name: name.to_string(),
        });
    }
    Ok(())
}

// --- BUILDER ---

/// Progressive declaration of one command. Obtained from
/// [`CommandRegistry::register_command`].
pub struct CommandBuilder<'r> {
    definition: &'r mut CommandDefinition,
    others: &'r [CommandDefinition],
    case_insensitive: bool,
    precision: NumberPrecision,
}

impl fmt::Debug for CommandBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl CommandBuilder<'_> {
    /// Adds an alternative name, validated like the primary name.
    pub fn with_alias(self, alias: &str) -> Result<Self, RegistrationError> {
        ensure_available(self.others, alias, self.case_insensitive)?;
        if self.definition.matches(alias, self.case_insensitive) {
            return Err(RegistrationError::DuplicateName {
                name: alias.to_string(),
            });
        }
        self.definition.aliases.push(alias.to_string());
        Ok(self)
    }

    /// Declares the next parameter with the Rust type `T` (see [`CommandArg`]).
    ///
    /// Once a parameter is optional, every later one must be optional too.
    pub fn with_arg<T: CommandArg>(self, optional: bool) -> Result<Self, RegistrationError> {
        self.with_arg_spec(T::SPEC, optional)
    }

    /// Declares the next parameter from a runtime type description.
    pub fn with_arg_spec(self, spec: ArgSpec, optional: bool) -> Result<Self, RegistrationError> {
        let command = self.definition.name.clone();
        if self.definition.parameters.len() >= MAX_PARAMETERS {
            return Err(RegistrationError::TooManyParameters {
                command,
                max: MAX_PARAMETERS,
            });
        }
        self.check_arg_type(spec)?;
        if !optional && self.definition.parameters.iter().any(|p| p.optional) {
            return Err(RegistrationError::RequiredAfterOptional {
                command,
                index: self.definition.parameters.len(),
            });
        }
        self.definition
            .parameters
            .push(ParameterSpec::new(spec, optional));
        Ok(self)
    }

    pub fn with_help(self, text: impl Into<String>) -> Self {
        self.definition.help_text = Some(text.into());
        self
    }

    /// Attaches a typed handler of zero to ten parameters.
    ///
    /// When no parameter was declared, the handler's own parameter list becomes
    /// the (all required) parameter shape. Otherwise it must match the declared
    /// types in order.
    pub fn with_execution<Args, H>(self, handler: H) -> Result<(), RegistrationError>
    where
        H: IntoHandler<Args>,
    {
        let handler_specs = H::parameter_specs();
        if self.definition.parameters.is_empty() {
            for spec in &handler_specs {
                self.check_arg_type(*spec)?;
            }
            self.definition.parameters = handler_specs
                .iter()
                .map(|spec| ParameterSpec::new(*spec, false))
                .collect();
        } else {
            let declared: Vec<ArgSpec> = self
                .definition
                .parameters
                .iter()
                .map(|p| p.declared)
                .collect();
            if declared != handler_specs {
                return Err(RegistrationError::HandlerSignatureMismatch {
                    command: self.definition.name.clone(),
                    declared: join_specs(&declared),
                    handler: join_specs(&handler_specs),
                });
            }
        }

        log::debug!(
            "Attached typed handler to '{}' ({} parameter(s)).",
            self.definition.name,
            handler_specs.len()
        );
        self.definition.handler = Some(Handler::Typed {
            arity: handler_specs.len(),
            call: handler.into_handler(),
        });
        Ok(())
    }

    /// Attaches a handler that receives the whole parse result, unvalidated.
    pub fn with_raw_execution<F>(self, handler: F)
    where
        F: FnMut(&ParseResult) + 'static,
    {
        log::debug!("Attached raw handler to '{}'.", self.definition.name);
        self.definition.handler = Some(Handler::Raw(Box::new(handler)));
    }

    fn check_arg_type(&self, spec: ArgSpec) -> Result<(), RegistrationError> {
        if spec.arg_type.is_allowed_under(self.precision) {
            Ok(())
        } else {
            Err(RegistrationError::InvalidArgumentType {
                command: self.definition.name.clone(),
                spec,
                precision: self.precision,
            })
        }
    }
}

fn join_specs(specs: &[ArgSpec]) -> String {
    specs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
