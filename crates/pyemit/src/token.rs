//! Output tokens and the sink they are written to.
//!
//! The formatter never concatenates strings itself. It emits typed tokens
//! into a [`TokenSink`], and the sink decides spacing, indentation, and
//! line breaks. [`SourceWriter`] is the reference sink that renders to a
//! `String` with four-space indentation.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Lexical class of an emitted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TokenKind {
    /// A keyword or other alphabetic token (`def`, `return`, `and`).
    Word,
    /// Operator or delimiter text (`(`, `,`, `+=`).
    Punctuation,
    /// An identifier.
    Name,
    /// An already-escaped string literal, quotes included.
    Str,
    /// A numeric literal, already rendered.
    Number,
    /// A line comment, without the leading `#`.
    Comment,
}

/// Which side(s) a token glues to, suppressing the space the writer
/// would otherwise put between adjacent tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TokenAssoc {
    /// Spaces on both sides.
    Neither,
    /// No space before this token.
    Left,
    /// No space after this token.
    Right,
    /// No space on either side.
    Both,
}

impl TokenAssoc {
    #[must_use]
    pub fn glues_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    #[must_use]
    pub fn glues_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

/// Receiver for the formatter's token stream.
///
/// Implementations decide concrete layout. Indent and dedent apply from
/// the next line onward; the writer tracks the level itself.
pub trait TokenSink {
    fn token(&mut self, text: &str, kind: TokenKind, assoc: TokenAssoc);
    fn newline(&mut self);
    fn indent(&mut self);
    fn dedent(&mut self);

    fn word(&mut self, text: &str) {
        self.token(text, TokenKind::Word, TokenAssoc::Neither);
    }

    fn punctuation(&mut self, text: &str) {
        self.token(text, TokenKind::Punctuation, TokenAssoc::Neither);
    }

    fn name(&mut self, text: &str) {
        self.token(text, TokenKind::Name, TokenAssoc::Neither);
    }

    fn number(&mut self, text: &str) {
        self.token(text, TokenKind::Number, TokenAssoc::Neither);
    }

    /// Escapes and quotes `text` before emitting it as a string literal.
    fn string(&mut self, text: &str) {
        let quoted = py_string_token(text);
        self.token(&quoted, TokenKind::Str, TokenAssoc::Neither);
    }

    /// Emits a line comment. `text` must not contain a line terminator.
    fn comment(&mut self, text: &str) {
        self.token(text, TokenKind::Comment, TokenAssoc::Neither);
    }
}

/// Number of spaces per indentation level.
const INDENT_WIDTH: usize = 4;

/// Renders the token stream to an owned `String`.
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    level: usize,
    /// True when nothing has been written on the current line yet.
    at_line_start: bool,
    /// True when the previous token wants a space before the next one.
    pending_space: bool,
}

impl SourceWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: String::new(),
            level: 0,
            at_line_start: true,
            pending_space: false,
        }
    }

    /// Consumes the writer and returns the rendered source text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    /// Text rendered so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }
}

impl TokenSink for SourceWriter {
    fn token(&mut self, text: &str, kind: TokenKind, assoc: TokenAssoc) {
        if self.at_line_start {
            for _ in 0..self.level * INDENT_WIDTH {
                self.out.push(' ');
            }
            self.at_line_start = false;
        } else if self.pending_space && !assoc.glues_left() {
            self.out.push(' ');
        }
        if kind == TokenKind::Comment {
            self.out.push_str("# ");
        }
        self.out.push_str(text);
        self.pending_space = !assoc.glues_right();
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
        self.pending_space = false;
    }

    fn indent(&mut self) {
        self.level += 1;
    }

    fn dedent(&mut self) {
        debug_assert!(self.level > 0, "dedent below level zero");
        self.level = self.level.saturating_sub(1);
    }
}

/// Renders `text` as a Python string literal, quotes included.
///
/// Picks the quote character that needs less escaping: single quotes
/// unless the text contains more single than double quotes. Backslashes,
/// the chosen quote, and control characters are escaped; everything else
/// passes through verbatim.
#[must_use]
pub fn py_string_token(text: &str) -> String {
    let singles = text.chars().filter(|&c| c == '\'').count();
    let doubles = text.chars().filter(|&c| c == '"').count();
    let quote = if singles > doubles { '"' } else { '\'' };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
