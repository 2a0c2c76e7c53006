//! One-shot compile, decompile and compress commands.

use super::CliError;
use genalpha::{GeneticConfig, Interpreter};
use std::fs;
use std::path::Path;

/// Execute the compile command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or in strict mode if any
/// token was dropped.
pub(crate) fn compile(config: &GeneticConfig, source: &Path, strict: bool) -> Result<(), CliError> {
    let text = fs::read_to_string(source)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", source.display())))?;
    let interpreter = Interpreter::new(config);

    if strict {
        let compilation = interpreter.compile_strict(&text);
        if !compilation.is_clean() {
            let tokens: Vec<String> = compilation
                .skipped
                .iter()
                .map(|s| format!("line {}: {}", s.line, s.token))
                .collect();
            return Err(CliError::new(format!(
                "Invalid tokens in {}: {}",
                source.display(),
                tokens.join(", ")
            )));
        }
        println!("{}", compilation.code);
    } else {
        println!("{}", interpreter.compile(&text));
    }
    Ok(())
}

/// Execute the decompile command.
pub(crate) fn decompile(config: &GeneticConfig, code: &str) {
    println!("{}", Interpreter::new(config).decompile(code.trim()));
}

/// Execute the compress command.
pub(crate) fn compress(config: &GeneticConfig, code: &str) {
    println!("{}", Interpreter::new(config).compress(code.trim()));
}
