#![no_main]

use genalpha::validator::check_list;
use genalpha::{GeneticConfig, Interpreter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    let config = GeneticConfig::default();
    let interpreter = Interpreter::new(&config);

    // Lenient and strict compilation must agree on the code
    let compilation = interpreter.compile_strict(source);
    let code = interpreter.compile(source);
    assert_eq!(code, compilation.code);

    // Whatever compiles is a valid tape
    if !code.is_empty() {
        assert!(check_list(&config, &code), "compiled code failed validation: {code}");
    }

    // Compression only drops codons and is idempotent
    let compressed = interpreter.compress(&code);
    assert!(compressed.len() <= code.len());
    assert_eq!(interpreter.compress(&compressed), compressed);

    // Arbitrary text must never panic the decompiler
    let _ = interpreter.decompile(source);
    let _ = interpreter.compress(source);
});
