//! Interactive interpreter.
//!
//! Reads `compile <text>`, `decompile <code>`, `compress <code>` and `quit`
//! commands, one per line.

use super::CliError;
use genalpha::{GeneticConfig, Interpreter};
use log::{debug, info};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "> ";
const USAGE: &str = "Commands: compile <code>, decompile <code>, compress <code>, quit";

/// What a single input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    /// Nothing to do.
    Empty,
    /// Leave the interpreter.
    Quit,
    /// A result to print.
    Output(String),
    /// A diagnostic to print.
    Error(String),
}

fn handle(interpreter: &Interpreter<'_>, line: &str) -> Reply {
    let line = line.trim();
    if line.is_empty() {
        return Reply::Empty;
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        return Reply::Quit;
    }
    if line.eq_ignore_ascii_case("help") {
        return Reply::Output(USAGE.to_string());
    }

    let Some((command, argument)) = line.split_once(char::is_whitespace) else {
        return Reply::Error("Command requires an argument (e.g., 'compile START STOP')".to_string());
    };
    let argument = argument.trim();

    match command.to_lowercase().as_str() {
        "compile" => {
            let compilation = interpreter.compile_strict(argument);
            if compilation.is_clean() {
                Reply::Output(format!("Compiled: {}", compilation.code))
            } else {
                let skipped: Vec<&str> = compilation
                    .skipped
                    .iter()
                    .map(|s| s.token.as_str())
                    .collect();
                Reply::Output(format!(
                    "Compiled: {} (skipped: {})",
                    compilation.code,
                    skipped.join(" ")
                ))
            }
        }
        "decompile" => Reply::Output(format!("Decompiled: {}", interpreter.decompile(argument))),
        "compress" => Reply::Output(format!("Compressed: {}", interpreter.compress(argument))),
        other => Reply::Error(format!(
            "Unknown command: {other}. Use compile, decompile, or compress."
        )),
    }
}

/// Run the interpreter loop over arbitrary input and output.
fn run_loop<R: BufRead, W: Write>(
    config: &GeneticConfig,
    input: R,
    output: &mut W,
) -> Result<(), CliError> {
    let interpreter = Interpreter::new(config);
    write!(output, "{PROMPT}")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        debug!("Received command: {line}");
        match handle(&interpreter, &line) {
            Reply::Quit => return Ok(()),
            Reply::Empty => {}
            Reply::Output(text) => writeln!(output, "{text}")?,
            Reply::Error(text) => writeln!(output, "Error: {text}")?,
        }
        write!(output, "{PROMPT}")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

/// Execute the interpret command on stdin and stdout.
///
/// # Errors
///
/// Returns an error if reading stdin or writing stdout fails.
pub(crate) fn execute(config: &GeneticConfig) -> Result<(), CliError> {
    info!("Starting genetic code interpreter (type 'quit' to exit)");
    info!("{USAGE}");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(config, stdin.lock(), &mut stdout)?;
    info!("Exiting interpreter");
    Ok(())
}
