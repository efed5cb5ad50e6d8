// src/bin/typeshell.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rust_decimal::Decimal;
use std::{cell::RefCell, fmt::Display, rc::Rc};
use typeshell::{
    CommandArg, CommandRunner, NumberPrecision, RegistrationError, ShellConfig,
    cli::Cli,
    core::{config_loader, registry::names_match, scanner},
};

// --- Demo Commands ---

/// Help text captured once every command is registered.
#[derive(Debug, Default)]
struct HelpIndex {
    overview: String,
    pages: Vec<HelpPage>,
    case_insensitive: bool,
}

#[derive(Debug)]
struct HelpPage {
    names: Vec<String>,
    text: String,
}

impl HelpIndex {
    fn capture(runner: &CommandRunner) -> Self {
        let pages = runner
            .commands()
            .map(|definition| {
                let mut names = vec![definition.name().to_string()];
                names.extend(definition.aliases().iter().cloned());
                HelpPage {
                    names,
                    text: format!("{}\n\nUsage: {}", definition.help_print(), definition.usage()),
                }
            })
            .collect();
        Self {
            overview: runner.help_overview(),
            pages,
            case_insensitive: runner.registry().is_case_insensitive(),
        }
    }

    fn page(&self, name: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|page| {
                page.names
                    .iter()
                    .any(|n| names_match(n, name, self.case_insensitive))
            })
            .map(|page| page.text.as_str())
    }
}

/// Numeric parameter types the `add` command can be registered with.
trait Summand: CommandArg + Display + Copy {
    fn checked_sum(self, other: Self) -> Option<Self>;
}

impl Summand for f32 {
    fn checked_sum(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}

impl Summand for f64 {
    fn checked_sum(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}

impl Summand for Decimal {
    fn checked_sum(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

fn register_add<T: Summand>(runner: &mut CommandRunner) -> Result<(), RegistrationError> {
    runner
        .register_command("add")?
        .with_alias("sum")?
        .with_help("Adds two numbers using the configured precision.")
        .with_execution(|a: T, b: T| match a.checked_sum(b) {
            Some(total) => println!("{}", total),
            None => println!("{}", "overflow".yellow()),
        })
}

/// Registers the demo command set on `runner`.
fn register_demo_commands(runner: &mut CommandRunner) -> Result<()> {
    let help = Rc::new(RefCell::new(HelpIndex::default()));

    let index = Rc::clone(&help);
    runner
        .register_command("help")?
        .with_alias("h")?
        .with_arg::<Option<String>>(true)?
        .with_help("Lists the commands, or shows the help of one command.")
        .with_execution(move |command: Option<String>| {
            let index = index.borrow();
            match command {
                None => println!("{}", index.overview),
                Some(name) => match index.page(&name) {
                    Some(text) => println!("{}", text),
                    None => println!("{} '{}'", "Unknown command".yellow(), name),
                },
            }
        })?;

    runner
        .register_command("echo")?
        .with_alias("say")?
        .with_help("Prints its argument.\nBare words and quoted strings are both accepted.")
        .with_execution(|text: String| println!("{}", text))?;

    match runner.parser_options().number_precision {
        NumberPrecision::Single => register_add::<f32>(runner)?,
        NumberPrecision::Double => register_add::<f64>(runner)?,
        NumberPrecision::Decimal => register_add::<Decimal>(runner)?,
    }

    runner
        .register_command("toggle")?
        .with_arg::<String>(false)?
        .with_arg::<Option<bool>>(true)?
        .with_help("Switches a named flag on or off.")
        .with_execution(|flag: String, state: Option<bool>| match state {
            Some(true) => println!("{} {}", flag, "on".green()),
            Some(false) => println!("{} {}", flag, "off".red()),
            None => println!("{} {}", flag, "toggled".cyan()),
        })?;

    runner
        .register_command("args")?
        .with_help("Prints the parsed arguments without checking them.")
        .with_raw_execution(|parsed| {
            println!("{} ({} argument(s))", parsed.command.bold(), parsed.arguments.len());
            for (i, value) in parsed.arguments.iter().enumerate() {
                println!("  {}: {} [{}]", i, value, value.category());
            }
        });

    *help.borrow_mut() = HelpIndex::capture(runner);
    Ok(())
}

// --- Entry Point ---

fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut config = load_config(&cli)?;
    cli.apply_overrides(&mut config);
    log::debug!("Effective configuration: {:?}", config);

    let line = cli.joined_line();
    if cli.tokens {
        let tokens = scanner::tokenize(&line).context("Failed to tokenize the line")?;
        for token in tokens {
            println!("{}", token);
        }
        return Ok(());
    }

    let mut runner = CommandRunner::new(config);
    register_demo_commands(&mut runner).context("Failed to register commands")?;
    runner
        .execute(&line)
        .with_context(|| format!("Failed to execute '{}'", line))
}

fn load_config(cli: &Cli) -> Result<ShellConfig> {
    if let Some(path) = &cli.config {
        return config_loader::load_config(path).context("Failed to load configuration");
    }
    match config_loader::default_config_path() {
        Some(path) => {
            config_loader::load_config_or_default(&path).context("Failed to load configuration")
        }
        None => {
            log::warn!("No config directory available, using defaults.");
            Ok(ShellConfig::default())
        }
    }
}
