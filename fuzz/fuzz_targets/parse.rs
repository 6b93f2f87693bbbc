#![no_main]

use libfuzzer_sys::fuzz_target;
use pineapl::parser::{AlternationPolicy, ParseOptions};
use pineapl::{IrCodegen, lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the lexer
        if let Ok(tokens) = lexer::lex(s) {
            // If lexing succeeds, fuzz the parser under both alternation policies
            let first_set = parser::parse(&tokens);
            let exhaustive = ParseOptions::new().with_alternation(AlternationPolicy::Exhaustive);
            let _ = parser::parse_with(&tokens, &exhaustive);

            if let Ok(file) = first_set {
                let _ = IrCodegen::new().generate(&file);
            }
        }
    }
});
