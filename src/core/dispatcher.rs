//! # Dispatcher
//!
//! Resolves a parsed line to its command definition, validates arity and types,
//! binds the arguments to parameter slots and invokes the handler.

use crate::{
    core::{
        handler::{BindingError, Handler},
        registry::CommandRegistry,
    },
    models::{ArgValue, ParameterSpec, ParseResult, TypeCategory},
};
use thiserror::Error;

/// Errors raised while matching a parsed line against the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("command '{0}' not found")]
    CommandNotFound(String),
    #[error("command '{0}' has no execution handler")]
    Incomplete(String),
    #[error("too many arguments for command '{command}': expected at most {max}, got {supplied}")]
    TooManyArguments {
        command: String,
        max: usize,
        supplied: usize,
    },
    #[error("too few arguments for command '{command}': expected at least {min}, got {supplied}")]
    TooFewArguments {
        command: String,
        min: usize,
        supplied: usize,
    },
    #[error("argument {index} of command '{command}': cannot assign {supplied} to {expected}")]
    TypeMismatch {
        command: String,
        index: usize,
        expected: TypeCategory,
        supplied: TypeCategory,
    },
}

/// Executes `parsed` against `registry`.
///
/// Raw handlers receive the parse result untouched. Typed handlers only run when
/// every supplied argument binds to its slot.
pub fn dispatch(registry: &mut CommandRegistry, parsed: ParseResult) -> Result<(), DispatchError> {
    let definition = registry
        .find_command_mut(&parsed.command)
        .ok_or_else(|| DispatchError::CommandNotFound(parsed.command.clone()))?;
    let command = definition.name().to_string();

    let (handler, parameters) = definition.execution_parts();
    match handler {
        None => Err(DispatchError::Incomplete(command)),
        Some(Handler::Raw(call)) => {
            log::debug!("Dispatching '{}' to its raw handler.", command);
            call(&parsed);
            Ok(())
        }
        Some(Handler::Typed { call, .. }) => {
            let slots = bind_arguments(&command, parameters, parsed.arguments)?;
            log::debug!("Dispatching '{}' with {} slot(s).", command, slots.len());
            call(slots).map_err(|e| type_mismatch(&command, e))
        }
    }
}

/// Maps supplied arguments onto the parameter slots of `command`.
///
/// Slots without a supplied argument, and slots receiving `null`, are `None` and
/// get the parameter's default value.
pub fn bind_arguments(
    command: &str,
    parameters: &[ParameterSpec],
    arguments: Vec<ArgValue>,
) -> Result<Vec<Option<ArgValue>>, DispatchError> {
    let max = parameters.len();
    let min = parameters.iter().take_while(|p| !p.optional).count();
    let supplied = arguments.len();

    if supplied > max {
        return Err(DispatchError::TooManyArguments {
            command: command.to_string(),
            max,
            supplied,
        });
    }
    if supplied < min {
        return Err(DispatchError::TooFewArguments {
            command: command.to_string(),
            min,
            supplied,
        });
    }

    let mut arguments = arguments.into_iter();
    let mut slots = Vec::with_capacity(max);
    for (index, parameter) in parameters.iter().enumerate() {
        let slot = match arguments.next() {
            None | Some(ArgValue::Null) => None,
            Some(value) if parameter.declared.arg_type.accepts(&value) => Some(value),
            Some(value) => {
                return Err(DispatchError::TypeMismatch {
                    command: command.to_string(),
                    index,
                    expected: parameter.declared.arg_type.category(),
                    supplied: value.category(),
                });
            }
        };
        slots.push(slot);
    }
    log::trace!("Bound arguments of '{}': {:?}", command, slots);
    Ok(slots)
}

fn type_mismatch(command: &str, error: BindingError) -> DispatchError {
    DispatchError::TypeMismatch {
        command: command.to_string(),
        index: error.index,
        expected: error.expected,
        supplied: error.supplied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArgSpec, ArgType, Number, NumberPrecision};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn call(command: &str, arguments: Vec<ArgValue>) -> ParseResult {
        ParseResult {
            command: command.to_string(),
            arguments,
        }
    }

    fn text(s: &str) -> ArgValue {
        ArgValue::String(s.to_string())
    }

    #[test]
    fn test_typed_handler_receives_arguments() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry
            .register_command("move")
            .unwrap()
            .with_execution(move |who: String, x: f32| {
                *sink.borrow_mut() = Some((who, x));
            })
            .unwrap();

        dispatch(
            &mut registry,
            call(
                "move",
                vec![
                    ArgValue::Identifier("bob".into()),
                    ArgValue::Number(Number::Single(3.5)),
                ],
            ),
        )
        .unwrap();
        assert_eq!(*seen.borrow(), Some(("bob".to_string(), 3.5)));
    }

    #[test]
    fn test_unknown_and_incomplete_commands() {
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry.register_command("draft").unwrap();

        assert_eq!(
            dispatch(&mut registry, call("nope", vec![])),
            Err(DispatchError::CommandNotFound("nope".to_string()))
        );
        assert_eq!(
            dispatch(&mut registry, call("draft", vec![])),
            Err(DispatchError::Incomplete("draft".to_string()))
        );
    }

    #[test]
    fn test_lookup_respects_case_rule() {
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry.register_command("Test").unwrap().with_execution(|| {}).unwrap();
        assert!(matches!(
            dispatch(&mut registry, call("test", vec![])),
            Err(DispatchError::CommandNotFound(_))
        ));

        let mut registry = CommandRegistry::new(true, NumberPrecision::Single);
        registry.register_command("Test").unwrap().with_execution(|| {}).unwrap();
        assert!(dispatch(&mut registry, call("test", vec![])).is_ok());
    }

    #[test]
    fn test_arity_bounds() {
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry
            .register_command("pair")
            .unwrap()
            .with_arg::<String>(false)
            .unwrap()
            .with_arg::<Option<String>>(true)
            .unwrap()
            .with_execution(|_: String, _: Option<String>| {})
            .unwrap();

        assert!(matches!(
            dispatch(&mut registry, call("pair", vec![])),
            Err(DispatchError::TooFewArguments { min: 1, supplied: 0, .. })
        ));
        assert!(dispatch(&mut registry, call("pair", vec![text("a")])).is_ok());
        assert!(dispatch(&mut registry, call("pair", vec![text("a"), text("b")])).is_ok());
        assert!(matches!(
            dispatch(&mut registry, call("pair", vec![text("a"), text("b"), text("c")])),
            Err(DispatchError::TooManyArguments { max: 2, supplied: 3, .. })
        ));
    }

    #[test]
    fn test_number_into_string_slot_is_a_mismatch() {
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry
            .register_command("cmd")
            .unwrap()
            .with_execution(|_: String| {})
            .unwrap();

        let err = dispatch(
            &mut registry,
            call("cmd", vec![ArgValue::Number(Number::Single(12.0))]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DispatchError::TypeMismatch {
                command: "cmd".to_string(),
                index: 0,
                expected: TypeCategory::String,
                supplied: TypeCategory::Number
            }
        );
        let message = err.to_string();
        assert!(message.contains("number") && message.contains("string"));
    }

    #[test]
    fn test_null_binds_default_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry
            .register_command("set")
            .unwrap()
            .with_execution(move |name: String, value: f32, flag: Option<bool>| {
                sink.borrow_mut().push(format!("{name:?} {value} {flag:?}"));
            })
            .unwrap();

        dispatch(
            &mut registry,
            call("set", vec![ArgValue::Null, ArgValue::Null, ArgValue::Null]),
        )
        .unwrap();
        assert_eq!(*seen.borrow(), vec!["\"\" 0 None".to_string()]);
    }

    #[test]
    fn test_missing_optional_slots_get_defaults() {
        let parameters = [
            ParameterSpec::new(ArgSpec::new(ArgType::Bool, false), false),
            ParameterSpec::new(ArgSpec::new(ArgType::Single, true), true),
        ];
        let slots = bind_arguments("x", &parameters, vec![ArgValue::Bool(true)]).unwrap();
        assert_eq!(slots, vec![Some(ArgValue::Bool(true)), None]);
    }

    #[test]
    fn test_raw_handler_skips_validation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry
            .register_command("raw")
            .unwrap()
            .with_raw_execution(move |parsed| {
                sink.borrow_mut().push(parsed.arguments.len());
            });

        let arguments = vec![ArgValue::Bool(true); 12];
        dispatch(&mut registry, call("raw", arguments)).unwrap();
        dispatch(&mut registry, call("raw", vec![])).unwrap();
        assert_eq!(*seen.borrow(), vec![12, 0]);
    }

    #[test]
    fn test_alias_dispatches_to_command() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut registry = CommandRegistry::new(false, NumberPrecision::Single);
        registry
            .register_command("increment")
            .unwrap()
            .with_alias("inc")
            .unwrap()
            .with_execution(move || *sink.borrow_mut() += 1)
            .unwrap();

        dispatch(&mut registry, call("inc", vec![])).unwrap();
        dispatch(&mut registry, call("increment", vec![])).unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_alias_lookup_ignores_case_when_configured() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut registry = CommandRegistry::new(true, NumberPrecision::Single);
        registry
            .register_command("increment")
            .unwrap()
            .with_alias("inc")
            .unwrap()
            .with_execution(move || *sink.borrow_mut() += 1)
            .unwrap();

        dispatch(&mut registry, call("INC", vec![])).unwrap();
        assert_eq!(*count.borrow(), 1);
    }
}
