//! Declarative formatting templates.
//!
//! Every node shape renders through one of a fixed set of precomputed
//! templates. A template is a flat sequence of pieces: literal tokens,
//! layout markers, and substitution slots that the formatter fills from
//! the node's formattable-slot list. Templates are written in a small
//! format-string DSL and parsed once into `LazyLock` statics.
//!
//! DSL, atoms separated by spaces:
//!
//! - `{2}` — substitute formattable slot 2
//! - `{1*}` — substitute group slot 1, elements back to back
//!   (statement groups: each statement terminates its own line)
//! - `{1*,}` `{1*=}` `{1*.}` — group with a separator token between
//!   (never after) elements
//! - `NL` / `IND` / `DED` — newline, indent, dedent
//! - anything else — a literal token; a `~` prefix or suffix glues it to
//!   the neighboring token (no space on that side)

use serde::Serialize;

use crate::token::{TokenAssoc, TokenKind};

/// A literal output token inside a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralToken {
    pub text: &'static str,
    pub kind: TokenKind,
    pub assoc: TokenAssoc,
}

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Piece {
    Literal(LiteralToken),
    Newline,
    Indent,
    Dedent,
    /// Substitute the single node in the given slot.
    Slot(usize),
    /// Substitute every node in the given group slot, emitting the
    /// separator between (not after) consecutive elements.
    Group {
        slot: usize,
        separator: Option<LiteralToken>,
    },
}

/// A parsed formatting template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

/// Separator tokens the DSL understands inside `{N*sep}`.
fn separator_token(sep: &str) -> LiteralToken {
    match sep {
        "," => LiteralToken {
            text: ",",
            kind: TokenKind::Punctuation,
            assoc: TokenAssoc::Left,
        },
        "=" => LiteralToken {
            text: "=",
            kind: TokenKind::Punctuation,
            assoc: TokenAssoc::Neither,
        },
        "." => LiteralToken {
            text: ".",
            kind: TokenKind::Punctuation,
            assoc: TokenAssoc::Both,
        },
        other => panic!("unknown group separator {other:?}"),
    }
}

fn literal_atom(atom: &'static str) -> LiteralToken {
    let glue_left = atom.starts_with('~');
    let glue_right = atom.len() > 1 && atom.ends_with('~');
    let text = &atom[usize::from(glue_left)..atom.len() - usize::from(glue_right)];
    assert!(!text.is_empty(), "empty literal in template");
    let kind = if text.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        TokenKind::Word
    } else {
        TokenKind::Punctuation
    };
    let assoc = match (glue_left, glue_right) {
        (false, false) => TokenAssoc::Neither,
        (true, false) => TokenAssoc::Left,
        (false, true) => TokenAssoc::Right,
        (true, true) => TokenAssoc::Both,
    };
    LiteralToken { text, kind, assoc }
}

/// Parses one template. Only called on static format strings.
///
/// # Panics
///
/// Panics on a malformed format string; templates are fixed constants,
/// so this is a programming error, not input handling.
#[must_use]
pub fn parse_template(fmt: &'static str) -> Template {
    let mut pieces = Vec::new();
    for atom in fmt.split_ascii_whitespace() {
        let piece = match atom {
            "NL" => Piece::Newline,
            "IND" => Piece::Indent,
            "DED" => Piece::Dedent,
            _ if atom.starts_with('{') && atom.len() > 1 && atom.as_bytes()[1].is_ascii_digit() => {
                let inner = atom
                    .strip_prefix('{')
                    .and_then(|a| a.strip_suffix('}'))
                    .unwrap_or_else(|| panic!("unterminated slot {atom:?}"));
                if let Some((index, sep)) = inner.split_once('*') {
                    let slot: usize = index.parse().unwrap_or_else(|_| panic!("bad slot {atom:?}"));
                    let separator = if sep.is_empty() {
                        None
                    } else {
                        Some(separator_token(sep))
                    };
                    Piece::Group { slot, separator }
                } else {
                    let slot: usize = inner.parse().unwrap_or_else(|_| panic!("bad slot {atom:?}"));
                    Piece::Slot(slot)
                }
            }
            _ => Piece::Literal(literal_atom(atom)),
        };
        pieces.push(piece);
    }
    Template { pieces }
}

/// Declares `LazyLock` template statics from format strings.
macro_rules! templates {
    ($($(#[$meta:meta])* $name:ident => $fmt:expr;)*) => {
        $(
            $(#[$meta])*
            static $name: std::sync::LazyLock<$crate::template::Template> =
                std::sync::LazyLock::new(|| $crate::template::parse_template($fmt));
        )*
    };
}
pub(crate) use templates;
