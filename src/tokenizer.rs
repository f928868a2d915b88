/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::TokenKind::*;

/// The lexical category of a [`Token`].
///
/// Whitespace and punctuation get one kind per character (named after the
/// Unicode name of that character); variable-length runs get one kind per
/// scanning routine. `QuotationMark` and `Apostrophe` are part of the
/// classification table so that a quote terminates an identifier run, but
/// they are never emitted as tokens: the dispatch loop always hands quotes
/// to the string scanner first.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    /// A run of one or more U+0020 space characters.
    Space,

    /// A single `\n` or `\r`. These are never merged into a `Space` run;
    /// a `\r\n` pair is two `Newline` tokens.
    Newline,

    /// A single `\t`.
    Tab,

    /// `!`
    ExclamationMark,
    /// `"` (classification only, see the type-level docs)
    QuotationMark,
    /// `#`
    NumberSign,
    /// `$`
    DollarSign,
    /// `%`
    PercentSign,
    /// `&`
    Ampersand,
    /// `'` (classification only, see the type-level docs)
    Apostrophe,
    /// `(`
    LeftParenthesis,
    /// `)` — also leaves url mode, see [`Syntax`]
    RightParenthesis,
    /// `*`
    Asterisk,
    /// `+`
    PlusSign,
    /// `,`
    Comma,
    /// `-`
    HyphenMinus,
    /// `.`
    FullStop,
    /// `/`
    Solidus,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `<`
    LessThanSign,
    /// `=`
    EqualsSign,
    /// `>`
    GreaterThanSign,
    /// `?`
    QuestionMark,
    /// `@`
    CommercialAt,
    /// `[`
    LeftSquareBracket,
    /// `]`
    RightSquareBracket,
    /// `^`
    CircumflexAccent,
    /// `_`
    LowLine,
    /// `{` — opens a declaration block
    LeftCurlyBracket,
    /// `|`
    VerticalLine,
    /// `}` — closes a declaration block
    RightCurlyBracket,
    /// `~`
    Tilde,

    /// A `"`-delimited string, quotes included in the text. If the closing
    /// quote is missing the text extends to the end of the input.
    StringDoubleQuoted,

    /// A `'`-delimited string, with the same rules as `StringDoubleQuoted`.
    StringSingleQuoted,

    /// A maximal run of ASCII decimal digits. Sign, decimal point, and
    /// exponent are *not* part of this token: `-1.5` tokenizes as
    /// `HyphenMinus`, `DecimalNumber("1")`, `FullStop`,
    /// `DecimalNumber("5")`, and composing a numeric literal out of those
    /// pieces is the parser's job.
    DecimalNumber,

    /// Any other run of characters, up to the next unescaped punctuation
    /// character. A `\` escape absorbs the following character, so `a\;b`
    /// is a single identifier.
    Identifier,

    /// A `/* ... */` comment, markers included in the text. Extends to the
    /// end of the input when unterminated.
    CommentMultiLine,

    /// A `// ...` comment, up to but not including the end of the line.
    /// Only produced where the active [`Syntax`] treats `//` as a comment
    /// marker.
    CommentSingleLine,
}

impl TokenKind {
    /// Classify a single byte against the fixed punctuation table.
    ///
    /// Returns `None` for anything that is not in the table (letters,
    /// digits, `\`, non-ASCII bytes, ...). This is the classifier the
    /// dispatch loop and the identifier scanner run once per byte, so it
    /// compiles to a jump table rather than any kind of lookup by hash.
    #[inline]
    pub fn from_punctuation(byte: u8) -> Option<TokenKind> {
        Some(match byte {
            b' ' => Space,
            b'\n' | b'\r' => Newline,
            b'\t' => Tab,
            b'!' => ExclamationMark,
            b'"' => QuotationMark,
            b'#' => NumberSign,
            b'$' => DollarSign,
            b'%' => PercentSign,
            b'&' => Ampersand,
            b'\'' => Apostrophe,
            b'(' => LeftParenthesis,
            b')' => RightParenthesis,
            b'*' => Asterisk,
            b'+' => PlusSign,
            b',' => Comma,
            b'-' => HyphenMinus,
            b'.' => FullStop,
            b'/' => Solidus,
            b':' => Colon,
            b';' => Semicolon,
            b'<' => LessThanSign,
            b'=' => EqualsSign,
            b'>' => GreaterThanSign,
            b'?' => QuestionMark,
            b'@' => CommercialAt,
            b'[' => LeftSquareBracket,
            b']' => RightSquareBracket,
            b'^' => CircumflexAccent,
            b'_' => LowLine,
            b'{' => LeftCurlyBracket,
            b'|' => VerticalLine,
            b'}' => RightCurlyBracket,
            b'~' => Tilde,
            _ => return None,
        })
    }

    /// Whether this kind is whitespace (`Space`, `Newline`, or `Tab`).
    ///
    /// The tokenizer itself never discards whitespace; this is a
    /// convenience for consumers whose grammar treats it as trivia.
    #[inline]
    pub fn is_whitespace(self) -> bool {
        matches!(self, Space | Newline | Tab)
    }

    /// Whether this kind is a comment, single- or multi-line.
    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, CommentMultiLine | CommentSingleLine)
    }
}

/// One of the pieces the input is broken into.
///
/// Tokens are immutable once emitted, own their text (the tokenizer does
/// not borrow from the input after `tokenize` returns), and carry enough
/// positional information for a parser to report diagnostics.
#[derive(PartialEq, Eq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// The lexical category.
    pub kind: TokenKind,

    /// The exact substring this token was scanned from, delimiters
    /// included. Concatenating the `text` of every token of a
    /// tokenization, in order, reproduces the input exactly.
    pub text: String,

    /// 1-based line number at the start of the token. The `Newline` token
    /// for a line break itself still carries the old line number.
    pub line: usize,

    /// 0-based position of this token in the output sequence.
    pub index: usize,
}

impl fmt::Display for Token {
    /// Writes the verbatim token text, so that formatting a whole token
    /// sequence round-trips the input.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The stylesheet dialect being tokenized.
///
/// The dialect only affects whether a bare `//` (outside a `url(...)`
/// literal) starts a single-line comment. Everything else tokenizes
/// identically across dialects.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Syntax {
    /// Plain CSS. `//` is not valid CSS, but inside a declaration block it
    /// must not be swallowed as a comment either, so there it tokenizes as
    /// an identifier run instead.
    Css,
    /// Less. `//` always starts a single-line comment.
    Less,
    /// Scss. Same comment policy as Less.
    Scss,
}

impl Syntax {
    /// Whether `//` starts a single-line comment at the given block depth.
    ///
    /// The depth can be negative when the input has more `}` than `{`;
    /// brace balancing is the parser's concern, and a negative depth
    /// counts as "outside any block" here.
    #[inline]
    fn line_comments_allowed(self, block_depth: i32) -> bool {
        match self {
            Syntax::Css => block_depth <= 0,
            Syntax::Less | Syntax::Scss => true,
        }
    }
}

impl Default for Syntax {
    fn default() -> Syntax {
        Syntax::Css
    }
}

impl FromStr for Syntax {
    type Err = SyntaxParseError;

    fn from_str(s: &str) -> Result<Syntax, SyntaxParseError> {
        match s {
            "css" => Ok(Syntax::Css),
            "less" => Ok(Syntax::Less),
            "scss" => Ok(Syntax::Scss),
            _ => Err(SyntaxParseError(s.to_owned())),
        }
    }
}

/// The error returned when parsing an unknown [`Syntax`] name.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct SyntaxParseError(String);

impl fmt::Display for SyntaxParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown stylesheet syntax {:?}", self.0)
    }
}

impl std::error::Error for SyntaxParseError {}

/// Break `input` into a flat list of tokens.
///
/// This is a total function: it succeeds for every input, including the
/// empty string (empty vec) and inputs with unterminated strings,
/// unterminated comments, unbalanced braces, or a trailing `\` escape.
/// Malformed constructs are truncated at the end of the input rather than
/// reported; the parser consuming the tokens owns diagnostics.
pub fn tokenize(input: &str, syntax: Syntax) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input, syntax);
    tokenizer.run();
    tokenizer.tokens
}

/// All per-call scanning state.
///
/// A fresh value is built for every `tokenize` call, so concurrent calls
/// never share the url-mode flag or the block depth.
struct Tokenizer<'a> {
    input: &'a str,

    /// Counted in bytes, not code points. From 0.
    position: usize,

    /// 1-based, advanced only when a `Newline` token is pushed. Newlines
    /// embedded in strings or multiline comments do not advance it.
    line: usize,

    syntax: Syntax,

    /// True from an identifier spelled exactly `url` until the next
    /// unescaped `)`. Suppresses `//` comment detection so the path part
    /// of an unquoted URL survives as tokens.
    url_mode: bool,

    /// Open-brace count; decremented below zero on unbalanced `}` rather
    /// than treated as an error.
    block_depth: i32,

    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    #[inline]
    fn new(input: &'a str, syntax: Syntax) -> Tokenizer<'a> {
        Tokenizer {
            input,
            position: 0,
            line: 1,
            syntax,
            url_mode: false,
            block_depth: 0,
            tokens: Vec::new(),
        }
    }

    /// The dispatch loop: one iteration per token. Each arm consumes at
    /// least one byte, so the loop always terminates.
    fn run(&mut self) {
        while !self.is_eof() {
            match self.next_byte() {
                b'/' if self.starts_with(b"/*") => self.consume_multiline_comment(),
                b'/' if !self.url_mode && self.starts_with(b"//") => {
                    if self.syntax.line_comments_allowed(self.block_depth) {
                        self.consume_single_line_comment()
                    } else {
                        // Inside a CSS declaration block `//` is not a
                        // comment marker; the identifier scanner absorbs
                        // the leading slashes.
                        self.consume_identifier()
                    }
                }
                quote @ b'"' | quote @ b'\'' => self.consume_string(quote),
                b' ' => self.consume_spaces(),
                byte => match TokenKind::from_punctuation(byte) {
                    Some(kind) => self.consume_punctuation(kind, byte),
                    None if byte.is_ascii_digit() => self.consume_decimal_number(),
                    None => self.consume_identifier(),
                },
            }
        }
    }

    // If false, `next_byte()` will not panic.
    #[inline]
    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    // Assumes non-EOF.
    #[inline]
    fn next_byte(&self) -> u8 {
        self.input.as_bytes()[self.position]
    }

    /// Clamped at the end of the input, so that skipping past an escape
    /// whose escaped character is missing (a trailing `\`) is not an
    /// out-of-bounds position.
    #[inline]
    fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.input.len());
    }

    #[inline]
    fn starts_with(&self, needle: &[u8]) -> bool {
        self.input.as_bytes()[self.position..].starts_with(needle)
    }

    #[inline]
    fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.position]
    }

    /// Emit the token for `input[start..position]` at the current line.
    fn push_token(&mut self, kind: TokenKind, start: usize) {
        let index = self.tokens.len();
        self.tokens.push(Token {
            kind,
            text: self.slice_from(start).to_owned(),
            line: self.line,
            index,
        });
    }

    /// A single punctuation byte, plus the mode-state bookkeeping hung off
    /// specific characters.
    fn consume_punctuation(&mut self, kind: TokenKind, byte: u8) {
        let start = self.position;
        self.advance(1);
        self.push_token(kind, start);
        match byte {
            b'\n' | b'\r' => self.line += 1,
            b')' => self.url_mode = false,
            b'{' => self.block_depth += 1,
            // May go below zero; brace balance is the parser's concern.
            b'}' => self.block_depth -= 1,
            _ => {}
        }
    }

    /// A maximal run of U+0020 spaces. Tabs and newlines are punctuation
    /// (single-character tokens) and never join a space run.
    fn consume_spaces(&mut self) {
        let start = self.position;
        while !self.is_eof() && self.next_byte() == b' ' {
            self.advance(1);
        }
        self.push_token(Space, start);
    }

    /// A quoted string, from the opening `quote` to the next unescaped
    /// occurrence of the same quote, both included in the token text. An
    /// escaped quote never terminates the string, and an unterminated
    /// string extends to the end of the input.
    fn consume_string(&mut self, quote: u8) {
        let start = self.position;
        self.advance(1); // the opening quote
        while !self.is_eof() {
            match self.next_byte() {
                b'\\' => self.advance(2),
                byte if byte == quote => {
                    self.advance(1);
                    break;
                }
                _ => self.advance(1),
            }
        }
        let kind = if quote == b'"' {
            StringDoubleQuoted
        } else {
            StringSingleQuoted
        };
        self.push_token(kind, start);
    }

    /// A maximal run of ASCII decimal digits.
    fn consume_decimal_number(&mut self) {
        let start = self.position;
        while !self.is_eof() && self.next_byte().is_ascii_digit() {
            self.advance(1);
        }
        self.push_token(DecimalNumber, start);
    }

    /// Any number of leading slashes, then everything up to the next
    /// unescaped punctuation byte. `\` always absorbs the following
    /// character, whatever it is. Non-ASCII bytes are never punctuation,
    /// so multi-byte characters flow through whole and every token
    /// boundary lands on an ASCII byte or the end of the input.
    ///
    /// An identifier spelled exactly `url` flips the tokenizer into url
    /// mode until the next unescaped `)`. This triggers on any such
    /// identifier, `(` following or not, and re-seeing `url` while the
    /// mode is already set changes nothing.
    fn consume_identifier(&mut self) {
        let start = self.position;
        while !self.is_eof() && self.next_byte() == b'/' {
            self.advance(1);
        }
        while !self.is_eof() {
            match self.next_byte() {
                b'\\' => self.advance(2),
                byte if TokenKind::from_punctuation(byte).is_some() => break,
                _ => self.advance(1),
            }
        }
        if self.slice_from(start) == "url" {
            self.url_mode = true;
        }
        self.push_token(Identifier, start);
    }

    /// `/*` through the matching `*/` inclusive, or to the end of the
    /// input when unterminated.
    fn consume_multiline_comment(&mut self) {
        let start = self.position;
        self.advance(2); // consume "/*"
        match self.input[self.position..].find("*/") {
            Some(offset) => self.advance(offset + 2),
            None => self.position = self.input.len(),
        }
        self.push_token(CommentMultiLine, start);
    }

    /// `//` through the end of the line, the newline itself excluded (it
    /// becomes the following `Newline` token), or to the end of the input.
    fn consume_single_line_comment(&mut self) {
        let start = self.position;
        self.advance(2); // consume "//"
        while !self.is_eof() && !matches!(self.next_byte(), b'\n' | b'\r') {
            self.advance(1);
        }
        self.push_token(CommentSingleLine, start);
    }
}
