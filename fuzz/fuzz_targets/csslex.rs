#![no_main]

use csslex::{tokenize, Syntax};

fn fuzz(data: &str, syntax: Syntax) {
    // Totality: tokenize never panics, whatever the input.
    let tokens = tokenize(data, syntax);

    // Round-trip: the token texts concatenate back to the input.
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, data, "token texts must reproduce the input");

    // Indices are sequential and lines never decrease.
    let mut line = 1;
    for (i, token) in tokens.iter().enumerate() {
        assert_eq!(token.index, i);
        assert!(token.line >= line);
        line = token.line;
        assert!(!token.text.is_empty(), "tokens never cover an empty run");
    }
}

libfuzzer_sys::fuzz_target!(|data: &str| {
    fuzz(data, Syntax::Css);
    fuzz(data, Syntax::Less);
    fuzz(data, Syntax::Scss);
});
