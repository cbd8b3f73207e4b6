//! The Python node model: a strictly-owned tree of statement and
//! expression shapes. Every shape knows its formattable slots and picks
//! one precomputed formatting template from its own attributes; the
//! generic interpreter in [`crate::format`] does the rest.
//!
//! Ownership is exclusive: nodes own their children outright, and
//! reparenting a subtree means cloning it. `Clone` is the deep copy.
//! Equality and hashing cover attributes and children but never source
//! positions.

mod expr;
mod stmt;

pub mod build;

pub use expr::{ArgPrefix, CallArg, Comprehension, Constant, DictItem, Expr};
pub use stmt::{
    DependencyCategory, Elif, ExceptHandler, ImportAlias, Param, ParamPrefix, Program, Stmt,
    WithItem,
};

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::dotted::DottedIdentifier;
use crate::token::{TokenAssoc, TokenKind};

/// A source position carried for diagnostics only.
///
/// Positions never participate in equality or hashing: two trees that
/// differ only in positions compare equal, which is what deep-copy and
/// template tests rely on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    #[must_use]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl PartialEq for Pos {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for Pos {}

impl Hash for Pos {
    fn hash<H: Hasher>(&self, _: &mut H) {}
}

/// A borrowed reference to anything a template slot can hold.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Expr(&'a Expr),
    Stmt(&'a Stmt),
    Param(&'a Param),
    CallArg(&'a CallArg),
    Clause(&'a Comprehension),
    /// An `if` condition inside a comprehension clause.
    CompIf(&'a Expr),
    Handler(&'a ExceptHandler),
    Elif(&'a Elif),
    WithItem(&'a WithItem),
    Alias(&'a ImportAlias),
    DictItem(&'a DictItem),
    /// A decorator expression, rendered as `@expr` on its own line.
    Decorator(&'a Expr),
    Dotted(&'a DottedIdentifier),
    /// An identifier token.
    Ident(&'a str),
    /// Raw string-literal content; quoted and escaped at render time.
    StrLit(&'a str),
    /// A pre-rendered token (operator text, numbers, comment text).
    Token {
        text: &'a str,
        kind: TokenKind,
        assoc: TokenAssoc,
    },
}

/// One formattable slot of a node.
///
/// Slot indices are fixed per node shape; templates reference slots by
/// index, and a template selected for one attribute combination simply
/// does not mention the slots that combination leaves empty.
#[derive(Debug, Clone)]
pub enum Slot<'a> {
    /// An optional child that is absent.
    Empty,
    /// A child in an expression position where a bare tuple or yield
    /// would change meaning; the formatter may parenthesize it.
    One(NodeRef<'a>),
    /// A child rendered with no parenthesization pressure at all.
    Bare(NodeRef<'a>),
    /// A repeated group; the template supplies the separator.
    Group(SmallVec<[NodeRef<'a>; 4]>),
}

/// Slot lists are short; eight covers every shape in the model.
pub type Slots<'a> = SmallVec<[Slot<'a>; 8]>;

pub(crate) fn group<'a, T, F>(items: &'a [T], wrap: F) -> Slot<'a>
where
    F: Fn(&'a T) -> NodeRef<'a>,
{
    Slot::Group(items.iter().map(wrap).collect())
}
