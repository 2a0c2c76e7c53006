//! Mnemonic compiler, decompiler and compressor.
//!
//! Mnemonic text is one or more lines of whitespace-separated tokens. A token
//! is either an operation name (`START`, `COPY`, ...) or a raw codon string
//! made of alphabet characters. Lines starting with `#` are comments.
//!
//! Compilation degrades gracefully: unknown tokens are logged and dropped.
//! [`Interpreter::compile_strict`] returns the dropped tokens as well.

use crate::alphabet::split_codons;
use crate::config::GeneticConfig;
use log::warn;
use serde::Serialize;

/// Comment marker for mnemonic text.
pub const COMMENT_MARKER: char = '#';

/// A token [`Interpreter::compile`] could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedToken {
    /// One-based line number in the source text.
    pub line: usize,
    /// The token after normalization.
    pub token: String,
}

/// Output of [`Interpreter::compile_strict`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Compilation {
    /// Compiled codon string.
    pub code: String,
    /// Tokens that were dropped, in source order.
    pub skipped: Vec<SkippedToken>,
}

impl Compilation {
    /// Whether every token resolved.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Translates between mnemonic text and codon strings.
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'a> {
    config: &'a GeneticConfig,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter for the given configuration.
    #[must_use]
    pub fn new(config: &'a GeneticConfig) -> Self {
        Self { config }
    }

    /// Compile mnemonic text to a codon string, dropping unknown tokens.
    #[must_use]
    pub fn compile(&self, source: &str) -> String {
        let compilation = self.compile_strict(source);
        for skipped in &compilation.skipped {
            warn!(
                "Invalid token on line {}: {} (not an operation or codon string)",
                skipped.line, skipped.token
            );
        }
        compilation.code
    }

    /// Compile mnemonic text, returning the dropped tokens with the code.
    #[must_use]
    pub fn compile_strict(&self, source: &str) -> Compilation {
        let mut compilation = Compilation::default();

        for (index, line) in source.lines().enumerate() {
            let line = line.trim().to_uppercase();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            for token in line.split_whitespace() {
                match self.resolve(token) {
                    Some(codons) => compilation.code.push_str(codons),
                    None => compilation.skipped.push(SkippedToken {
                        line: index + 1,
                        token: token.to_string(),
                    }),
                }
            }
        }

        compilation
    }

    /// Resolve one normalized token to the codons it compiles to.
    fn resolve<'t>(&self, token: &'t str) -> Option<&'t str>
    where
        'a: 't,
    {
        let config: &'a GeneticConfig = self.config;
        if let Some(codon) = config.operations.canonical(token) {
            return Some(codon.as_str());
        }
        let len = token.chars().count();
        let aligned = len > 0 && len.checked_rem(config.codon_size) == Some(0);
        (aligned && config.is_alphabet_string(token)).then_some(token)
    }

    /// Render a codon string as operation names and raw codons.
    #[must_use]
    pub fn decompile(&self, code: &str) -> String {
        self.tokenize(code)
            .into_iter()
            .map(|codon| match self.config.operations.operation_of(&codon) {
                Some(name) => name.to_string(),
                None => codon,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Split a codon string into codon-size chunks without validation.
    #[must_use]
    pub fn tokenize(&self, code: &str) -> Vec<String> {
        split_codons(code, self.config.codon_size)
    }

    /// Keep only operation codons.
    #[must_use]
    pub fn compress(&self, code: &str) -> String {
        self.tokenize(code)
            .into_iter()
            .filter(|codon| self.config.operations.is_operation_codon(codon))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_operations() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        assert_eq!(interpreter.compile("START COPY STOP"), "AAAAAGAUA");
        assert_eq!(interpreter.compile("start  stop"), "AAAAUA");
    }

    #[test]
    fn test_compile_raw_codons_and_comments() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        let source = "# header\n\nSTART UUU\n   # indented comment\nuuuccc STOP\n";
        assert_eq!(interpreter.compile(source), "AAAUUUUUUCCCAUA");
    }

    #[test]
    fn test_compile_drops_unknown_tokens() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        assert_eq!(interpreter.compile("START FOO UU STOP"), "AAAAUA");
        assert_eq!(interpreter.compile(""), "");
    }

    #[test]
    fn test_zero_codon_size_drops_raw_codons() {
        let config = GeneticConfig {
            codon_size: 0,
            ..GeneticConfig::default()
        };
        let interpreter = Interpreter::new(&config);
        let compilation = interpreter.compile_strict("START UUU STOP");
        assert_eq!(compilation.code, "AAAAUA");
        assert_eq!(
            compilation.skipped,
            vec![SkippedToken {
                line: 1,
                token: "UUU".to_string()
            }]
        );
    }

    #[test]
    fn test_compile_strict_reports_skipped() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        let compilation = interpreter.compile_strict("START\nfoo UUU\n# bar\nXYZ STOP");
        assert_eq!(compilation.code, "AAAUUUAUA");
        assert_eq!(
            compilation.skipped,
            vec![
                SkippedToken {
                    line: 2,
                    token: "FOO".to_string()
                },
                SkippedToken {
                    line: 4,
                    token: "XYZ".to_string()
                },
            ]
        );
        assert!(!compilation.is_clean());
        assert!(interpreter.compile_strict("START STOP").is_clean());
    }

    #[test]
    fn test_decompile() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        assert_eq!(interpreter.decompile("AAAUUUAUA"), "START UUU STOP");
        assert_eq!(interpreter.decompile("ATGGAA"), "STOP COND");
        assert_eq!(interpreter.decompile(""), "");
    }

    #[test]
    fn test_round_trip_operation_names() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        let source = "start copy\nif jump cond stop";
        assert_eq!(
            interpreter.decompile(&interpreter.compile(source)),
            "START COPY IF JUMP COND STOP"
        );
    }

    #[test]
    fn test_tokenize() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        assert_eq!(interpreter.tokenize("AAAUUUG"), vec!["AAA", "UUU", "G"]);
    }

    #[test]
    fn test_compress() {
        let config = GeneticConfig::default();
        let interpreter = Interpreter::new(&config);
        let compressed = interpreter.compress("AAAUUUAAGCCCAUA");
        assert_eq!(compressed, "AAAAAGAUA");
        assert_eq!(interpreter.compress(&compressed), compressed);
        assert_eq!(interpreter.compress("UUUCCC"), "");
    }
}
