//! desk-calc: keypad calculator for the terminal

use clap::Parser;
use desk_calculator::cli::{parse_script, run_script, Cli, Commands, KeysArgs};
use desk_calculator::config::{CalculatorConfig, Verbosity};
use desk_calculator::error::AppResult;
use desk_calculator::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let log_format = cli.log_format();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            // stderr shares the screen with the keypad
            let verbosity = if cli.verbose > 0 {
                config.verbosity
            } else {
                Verbosity::Quiet
            };
            logging::init(verbosity, log_format);
            run_terminal(config)
        }
        Commands::Keys(args) => {
            logging::init(config.verbosity, log_format);
            run_keys(config, &args)
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn run_keys(config: CalculatorConfig, args: &KeysArgs) -> AppResult<()> {
    let steps = parse_script(&args.tokens)?;
    let report = run_script(config, &steps);
    let output = if args.json {
        report.to_json(args.trace)?
    } else {
        report.to_text(args.trace)
    };
    println!("{output}");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_terminal(config: CalculatorConfig) -> AppResult<()> {
    let display = desk_calculator::terminal::run_interactive(config)?;
    println!("{}", display.primary);
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_terminal(_config: CalculatorConfig) -> AppResult<()> {
    Err(desk_calculator::error::AppError::invalid_argument(
        "interactive mode needs the `tui` feature; use `desk-calc keys`",
    ))
}
