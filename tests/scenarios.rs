//! End-to-end scenarios through `CommandRunner::execute`.

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;
use typeshell::models::{RunnerOptions, TypeCategory};
use typeshell::{
    ArgValue, CommandRunner, DispatchError, ExecuteError, LexError, Number, NumberPrecision,
    ParseError, ParserOptions, RegistrationError, ShellConfig,
};

fn runner_with(precision: NumberPrecision) -> CommandRunner {
    CommandRunner::new(ShellConfig {
        parser: ParserOptions {
            number_precision: precision,
            allow_null: false,
        },
        runner: RunnerOptions::default(),
    })
}

#[test]
fn scenario_lone_command() {
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    let mut runner = CommandRunner::default();
    runner
        .register_command("enableCheats")
        .unwrap()
        .with_execution(move || *sink.borrow_mut() += 1)
        .unwrap();

    let parsed = runner.parse("enableCheats").unwrap();
    assert_eq!(parsed.command, "enableCheats");
    assert!(parsed.arguments.is_empty());

    runner.execute("enableCheats").unwrap();
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn scenario_set_position() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut runner = CommandRunner::default();
    runner
        .register_command("setPosition")
        .unwrap()
        .with_arg::<String>(false)
        .unwrap()
        .with_arg::<f32>(false)
        .unwrap()
        .with_arg::<f32>(false)
        .unwrap()
        .with_arg::<Option<f32>>(true)
        .unwrap()
        .with_execution(move |who: String, x: f32, y: f32, z: Option<f32>| {
            sink.borrow_mut().push((who, x, y, z));
        })
        .unwrap();

    let parsed = runner.parse(r#"setPosition "player1" 100 200 50.5"#).unwrap();
    assert_eq!(
        parsed.arguments,
        vec![
            ArgValue::String("player1".to_string()),
            ArgValue::Number(Number::Single(100.0)),
            ArgValue::Number(Number::Single(200.0)),
            ArgValue::Number(Number::Single(50.5)),
        ]
    );

    runner.execute(r#"setPosition "player1" 100 200 50.5"#).unwrap();
    runner.execute("setPosition player2 1 2").unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![
            ("player1".to_string(), 100.0, 200.0, Some(50.5)),
            ("player2".to_string(), 1.0, 2.0, None),
        ]
    );
    assert_eq!(
        runner.find_command("setPosition").unwrap().usage(),
        "setPosition <string> <single> <single> [single?]"
    );
}

#[test]
fn scenario_set_path_with_escaped_backslashes() {
    let seen = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&seen);
    let mut runner = CommandRunner::default();
    runner
        .register_command("setPath")
        .unwrap()
        .with_execution(move |path: String| *sink.borrow_mut() = path)
        .unwrap();

    runner.execute(r#"setPath "C:\\Users\\Player""#).unwrap();
    assert_eq!(*seen.borrow(), r"C:\Users\Player");
}

#[test]
fn scenario_invalid_escape_sequence() {
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    let mut runner = CommandRunner::default();
    runner
        .register_command("test")
        .unwrap()
        .with_execution(move |_: String| *sink.borrow_mut() += 1)
        .unwrap();

    let err = runner.execute(r#"test "hello\t""#).unwrap_err();
    assert!(matches!(
        err,
        ExecuteError::Parse(ParseError::Lex(LexError::InvalidEscape { found: 't', .. }))
    ));
    assert!(err.to_string().contains("not a valid escape sequence"));
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn scenario_required_after_optional_is_rejected() {
    let mut runner = runner_with(NumberPrecision::Double);
    let err = runner
        .register_command("go")
        .unwrap()
        .with_arg::<String>(true)
        .unwrap()
        .with_arg::<f64>(false)
        .unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::RequiredAfterOptional { index: 1, .. }
    ));
}

#[test]
fn scenario_number_into_string_slot() {
    let mut runner = CommandRunner::default();
    runner
        .register_command("cmd")
        .unwrap()
        .with_arg::<String>(false)
        .unwrap()
        .with_execution(|_: String| {})
        .unwrap();

    let err = runner.execute("cmd 12").unwrap_err();
    assert_eq!(
        err,
        ExecuteError::Dispatch(DispatchError::TypeMismatch {
            command: "cmd".to_string(),
            index: 0,
            expected: TypeCategory::String,
            supplied: TypeCategory::Number,
        })
    );
}

#[test]
fn scenario_decimal_precision() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut runner = runner_with(NumberPrecision::Decimal);
    runner
        .register_command("pay")
        .unwrap()
        .with_execution(move |amount: Decimal| sink.borrow_mut().push(amount))
        .unwrap();

    runner.execute("pay 0.1").unwrap();
    runner.execute("pay 1_000.25").unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![Decimal::new(1, 1), Decimal::new(100_025, 2)]
    );

    // Single-precision parameters cannot be declared under decimal precision.
    assert!(matches!(
        runner.register_command("other").unwrap().with_arg::<f32>(false),
        Err(RegistrationError::InvalidArgumentType { .. })
    ));
}

#[test]
fn scenario_case_sensitivity() {
    let mut sensitive = CommandRunner::default();
    sensitive
        .register_command("Test")
        .unwrap()
        .with_execution(|| {})
        .unwrap();
    assert!(matches!(
        sensitive.execute("test"),
        Err(ExecuteError::Dispatch(DispatchError::CommandNotFound(_)))
    ));
    assert!(sensitive.register_command("test").is_ok());

    let mut insensitive = CommandRunner::new(ShellConfig {
        runner: RunnerOptions {
            case_insensitive_command_names: true,
        },
        ..ShellConfig::default()
    });
    insensitive
        .register_command("Test")
        .unwrap()
        .with_execution(|| {})
        .unwrap();
    assert!(insensitive.execute("test").is_ok());
    assert!(matches!(
        insensitive.register_command("TEST"),
        Err(RegistrationError::DuplicateName { .. })
    ));
}

#[test]
fn scenario_incomplete_command() {
    let mut runner = CommandRunner::default();
    runner
        .register_command("draft")
        .unwrap()
        .with_arg::<bool>(false)
        .unwrap()
        .with_help("Not finished yet.");

    assert!(!runner.find_command("draft").unwrap().is_complete());
    assert_eq!(
        runner.execute("draft true"),
        Err(ExecuteError::Dispatch(DispatchError::Incomplete(
            "draft".to_string()
        )))
    );
}
