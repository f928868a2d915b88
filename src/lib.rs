/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![deny(missing_docs)]
#![cfg_attr(feature = "bench", feature(test))]

/*!

A lossless tokenizer for CSS-family stylesheets.

The input is broken into a flat, ordered list of [`Token`]s, one per lexical
run: whitespace, punctuation, quoted strings, decimal digit runs,
identifiers, and comments. Every token keeps the exact substring it was
scanned from, so concatenating the `text` of all tokens in order
reconstructs the input byte for byte. Grammar-level structure (rules,
declarations, selectors, numeric values) is left to a downstream parser
that consumes the token list positionally.

Tokenization is total: it never fails, for any input. Unterminated strings
and comments simply extend to the end of the input, and unbalanced braces
are recorded as-is for the parser to diagnose with the line information
each token carries.

The [`Syntax`] argument selects the comment policy of the dialect being
tokenized: in Less and Scss a bare `//` always starts a single-line
comment, while in plain CSS it only does so outside a declaration block
(and never inside a `url(...)` literal, in any dialect).

```
use csslex::{tokenize, Syntax, TokenKind};

let input = "a { color: #fff }";
let tokens = tokenize(input, Syntax::Css);
assert_eq!(tokens[0].kind, TokenKind::Identifier);
assert_eq!(tokens[0].text, "a");

let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
assert_eq!(rebuilt, input);
```

*/

#[cfg(feature = "bench")]
extern crate test;

pub use crate::tokenizer::{tokenize, Syntax, SyntaxParseError, Token, TokenKind};

mod tokenizer;
