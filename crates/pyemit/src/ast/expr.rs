//! Expression shapes, their formattable slots, and their templates.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use crate::ast::{group, NodeRef, Pos, Slot, Slots};
use crate::op::{
    self, BinaryOp, BoolOpKind, CompareOp, OpDef, UnaryOp,
};
use crate::template::{templates, Template};
use crate::token::{TokenAssoc, TokenKind};

use super::stmt::Param;

/// Sentinel constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    None,
    True,
    False,
    Ellipsis,
    NotImplemented,
}

impl Constant {
    #[must_use]
    pub fn token(self) -> (&'static str, TokenKind) {
        match self {
            Self::None => ("None", TokenKind::Word),
            Self::True => ("True", TokenKind::Word),
            Self::False => ("False", TokenKind::Word),
            Self::Ellipsis => ("...", TokenKind::Punctuation),
            Self::NotImplemented => ("NotImplemented", TokenKind::Word),
        }
    }
}

/// Prefix of a call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgPrefix {
    None,
    Star,
    DoubleStar,
}

/// One argument in a call or class-base list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallArg {
    pub pos: Pos,
    pub prefix: ArgPrefix,
    pub name: Option<String>,
    pub value: Expr,
}

impl CallArg {
    /// A plain positional argument.
    #[must_use]
    pub fn positional(pos: Pos, value: Expr) -> Self {
        Self { pos, prefix: ArgPrefix::None, name: None, value }
    }

    /// A `name=value` keyword argument.
    #[must_use]
    pub fn named(pos: Pos, name: impl Into<String>, value: Expr) -> Self {
        Self { pos, prefix: ArgPrefix::None, name: Some(name.into()), value }
    }

    /// A `*value` spread argument.
    #[must_use]
    pub fn star(pos: Pos, value: Expr) -> Self {
        Self { pos, prefix: ArgPrefix::Star, name: None, value }
    }

    /// A `**value` keyword-spread argument.
    #[must_use]
    pub fn double_star(pos: Pos, value: Expr) -> Self {
        Self { pos, prefix: ArgPrefix::DoubleStar, name: None, value }
    }

    fn template(&self) -> &'static Template {
        match (self.prefix, self.name.is_some()) {
            (ArgPrefix::Star, _) => &ARG_STAR,
            (ArgPrefix::DoubleStar, _) => &ARG_DOUBLE_STAR,
            (ArgPrefix::None, true) => &ARG_NAMED,
            (ArgPrefix::None, false) => &ARG_VALUE,
        }
    }

    fn slots(&self) -> Slots<'_> {
        let name = match &self.name {
            Some(name) => Slot::Bare(NodeRef::Ident(name)),
            None => Slot::Empty,
        };
        smallvec![name, Slot::One(NodeRef::Expr(&self.value))]
    }
}

/// A `key: value` entry of a dict display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DictItem {
    pub pos: Pos,
    pub key: Expr,
    pub value: Expr,
}

impl DictItem {
    #[must_use]
    pub fn new(pos: Pos, key: Expr, value: Expr) -> Self {
        Self { pos, key, value }
    }

    fn slots(&self) -> Slots<'_> {
        smallvec![
            Slot::One(NodeRef::Expr(&self.key)),
            Slot::One(NodeRef::Expr(&self.value)),
        ]
    }
}

/// One `for target in iter [if cond]*` clause of a comprehension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comprehension {
    pub pos: Pos,
    pub is_async: bool,
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
}

impl Comprehension {
    #[must_use]
    pub fn new(pos: Pos, target: Expr, iter: Expr, ifs: Vec<Expr>) -> Self {
        Self { pos, is_async: false, target, iter, ifs }
    }

    fn template(&self) -> &'static Template {
        if self.is_async { &CLAUSE_ASYNC } else { &CLAUSE }
    }

    fn slots(&self) -> Slots<'_> {
        smallvec![
            Slot::Bare(NodeRef::Expr(&self.target)),
            Slot::One(NodeRef::Expr(&self.iter)),
            group(&self.ifs, NodeRef::CompIf),
        ]
    }
}

/// The expression family. `Clone` deep-copies; equality and hashing skip
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Name {
        pos: Pos,
        id: String,
    },
    /// A numeric literal carried as already-rendered text.
    Num {
        pos: Pos,
        text: String,
    },
    Str {
        pos: Pos,
        value: String,
    },
    Constant {
        pos: Pos,
        value: Constant,
    },
    /// A comma expression. Renders bare; the formatter adds parentheses
    /// where a bare tuple would change meaning.
    Tuple {
        pos: Pos,
        elts: Vec<Expr>,
    },
    List {
        pos: Pos,
        elts: Vec<Expr>,
    },
    Set {
        pos: Pos,
        elts: Vec<Expr>,
    },
    Dict {
        pos: Pos,
        items: Vec<DictItem>,
    },
    ListComp {
        pos: Pos,
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    SetComp {
        pos: Pos,
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    DictComp {
        pos: Pos,
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    GeneratorExp {
        pos: Pos,
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },
    BoolOp {
        pos: Pos,
        left: Box<Expr>,
        op: BoolOpKind,
        right: Box<Expr>,
    },
    BinOp {
        pos: Pos,
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    UnaryOp {
        pos: Pos,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Compare {
        pos: Pos,
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    IfExp {
        pos: Pos,
        body: Box<Expr>,
        test: Box<Expr>,
        orelse: Box<Expr>,
    },
    Lambda {
        pos: Pos,
        params: Vec<Param>,
        body: Box<Expr>,
    },
    Await {
        pos: Pos,
        value: Box<Expr>,
    },
    Yield {
        pos: Pos,
        value: Option<Box<Expr>>,
    },
    YieldFrom {
        pos: Pos,
        value: Box<Expr>,
    },
    Call {
        pos: Pos,
        func: Box<Expr>,
        args: Vec<CallArg>,
    },
    Attribute {
        pos: Pos,
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        pos: Pos,
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        pos: Pos,
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Starred {
        pos: Pos,
        value: Box<Expr>,
    },
}

impl Expr {
    #[must_use]
    pub fn pos(&self) -> Pos {
        match self {
            Self::Name { pos, .. }
            | Self::Num { pos, .. }
            | Self::Str { pos, .. }
            | Self::Constant { pos, .. }
            | Self::Tuple { pos, .. }
            | Self::List { pos, .. }
            | Self::Set { pos, .. }
            | Self::Dict { pos, .. }
            | Self::ListComp { pos, .. }
            | Self::SetComp { pos, .. }
            | Self::DictComp { pos, .. }
            | Self::GeneratorExp { pos, .. }
            | Self::BoolOp { pos, .. }
            | Self::BinOp { pos, .. }
            | Self::UnaryOp { pos, .. }
            | Self::Compare { pos, .. }
            | Self::IfExp { pos, .. }
            | Self::Lambda { pos, .. }
            | Self::Await { pos, .. }
            | Self::Yield { pos, .. }
            | Self::YieldFrom { pos, .. }
            | Self::Call { pos, .. }
            | Self::Attribute { pos, .. }
            | Self::Subscript { pos, .. }
            | Self::Slice { pos, .. }
            | Self::Starred { pos, .. } => *pos,
        }
    }

    /// This expression's own precedence definition, judged when it sits
    /// in someone else's operand slot.
    #[must_use]
    pub fn op_def(&self) -> &'static OpDef {
        match self {
            Self::Tuple { .. } => &op::TUPLE_DEF,
            Self::Lambda { .. } => &op::LAMBDA_DEF,
            Self::IfExp { .. } => &op::TERNARY_DEF,
            Self::BoolOp { op, .. } => op.def(),
            Self::BinOp { op, .. } => op.def(),
            Self::UnaryOp { op, .. } => op.def(),
            Self::Compare { .. } => &op::COMPARISON_DEF,
            Self::Starred { .. } => &op::STAR_DEF,
            Self::Await { .. } => &op::AWAIT_DEF,
            Self::Yield { .. } | Self::YieldFrom { .. } => &op::YIELD_DEF,
            Self::Call { .. } | Self::Attribute { .. } | Self::Subscript { .. } => &op::CALL_DEF,
            Self::Name { .. }
            | Self::Num { .. }
            | Self::Str { .. }
            | Self::Constant { .. }
            | Self::List { .. }
            | Self::Set { .. }
            | Self::Dict { .. }
            | Self::ListComp { .. }
            | Self::SetComp { .. }
            | Self::DictComp { .. }
            | Self::GeneratorExp { .. }
            | Self::Slice { .. } => &op::ATOM_DEF,
        }
    }

    /// The definition this expression imposes on its own `One` operand
    /// slots, or `None` for container-like shapes whose checked slots
    /// only guard against bare tuples and yields.
    #[must_use]
    pub fn child_pressure(&self) -> Option<&'static OpDef> {
        match self {
            Self::BoolOp { op, .. } => Some(op.def()),
            Self::BinOp { op, .. } => Some(op.def()),
            Self::UnaryOp { op, .. } => Some(op.def()),
            Self::Compare { .. } => Some(&op::COMPARISON_DEF),
            Self::IfExp { .. } => Some(&op::TERNARY_DEF),
            Self::Lambda { .. } => Some(&op::LAMBDA_DEF),
            Self::Await { .. } => Some(&op::AWAIT_DEF),
            Self::Starred { .. } => Some(&op::STAR_DEF),
            Self::Call { .. } | Self::Attribute { .. } | Self::Subscript { .. } => {
                Some(&op::CALL_DEF)
            }
            _ => None,
        }
    }

    /// Picks the precomputed template for the node's current attributes.
    #[must_use]
    pub fn template(&self) -> &'static Template {
        match self {
            Self::Name { .. }
            | Self::Num { .. }
            | Self::Str { .. }
            | Self::Constant { .. } => &ATOM_TOKEN,
            Self::Tuple { elts, .. } => match elts.len() {
                0 => &TUPLE_EMPTY,
                1 => &TUPLE_SINGLE,
                _ => &TUPLE_MANY,
            },
            Self::List { .. } => &LIST,
            Self::Set { elts, .. } => {
                if elts.is_empty() {
                    &SET_EMPTY
                } else {
                    &SET
                }
            }
            Self::Dict { .. } => &DICT,
            Self::ListComp { .. } => &LIST_COMP,
            Self::SetComp { .. } => &SET_COMP,
            Self::DictComp { .. } => &DICT_COMP,
            Self::GeneratorExp { .. } => &GENERATOR_EXP,
            Self::BoolOp { .. } | Self::BinOp { .. } | Self::Compare { .. } => &INFIX,
            Self::UnaryOp { .. } => &PREFIX,
            Self::IfExp { .. } => &IF_EXP,
            Self::Lambda { .. } => &LAMBDA,
            Self::Await { .. } => &AWAIT,
            Self::Yield { value, .. } => {
                if value.is_some() {
                    &YIELD_VALUE
                } else {
                    &YIELD_BARE
                }
            }
            Self::YieldFrom { .. } => &YIELD_FROM,
            Self::Call { .. } => &CALL,
            Self::Attribute { .. } => &ATTRIBUTE,
            Self::Subscript { .. } => &SUBSCRIPT,
            Self::Slice { step, .. } => {
                if step.is_some() {
                    &SLICE_STEP
                } else {
                    &SLICE
                }
            }
            Self::Starred { .. } => &STARRED,
        }
    }

    /// The ordered formattable slots the templates index into.
    #[must_use]
    pub fn slots(&self) -> Slots<'_> {
        fn opt(value: &Option<Box<Expr>>) -> Slot<'_> {
            match value {
                Some(v) => Slot::One(NodeRef::Expr(v)),
                None => Slot::Empty,
            }
        }

        match self {
            Self::Name { id, .. } => smallvec![Slot::Bare(NodeRef::Ident(id))],
            Self::Num { text, .. } => smallvec![Slot::Bare(NodeRef::Token {
                text,
                kind: TokenKind::Number,
                assoc: TokenAssoc::Neither,
            })],
            Self::Str { value, .. } => smallvec![Slot::Bare(NodeRef::StrLit(value))],
            Self::Constant { value, .. } => {
                let (text, kind) = value.token();
                smallvec![Slot::Bare(NodeRef::Token {
                    text,
                    kind,
                    assoc: TokenAssoc::Neither,
                })]
            }
            Self::Tuple { elts, .. } | Self::List { elts, .. } | Self::Set { elts, .. } => {
                smallvec![group(elts, NodeRef::Expr)]
            }
            Self::Dict { items, .. } => smallvec![group(items, NodeRef::DictItem)],
            Self::ListComp { elt, generators, .. }
            | Self::SetComp { elt, generators, .. }
            | Self::GeneratorExp { elt, generators, .. } => smallvec![
                Slot::One(NodeRef::Expr(elt)),
                group(generators, NodeRef::Clause),
            ],
            Self::DictComp { key, value, generators, .. } => smallvec![
                Slot::One(NodeRef::Expr(key)),
                Slot::One(NodeRef::Expr(value)),
                group(generators, NodeRef::Clause),
            ],
            Self::BoolOp { left, op, right, .. } => smallvec![
                Slot::One(NodeRef::Expr(left)),
                Slot::Bare(NodeRef::Token {
                    text: op.token(),
                    kind: TokenKind::Word,
                    assoc: TokenAssoc::Neither,
                }),
                Slot::One(NodeRef::Expr(right)),
            ],
            Self::BinOp { left, op, right, .. } => smallvec![
                Slot::One(NodeRef::Expr(left)),
                Slot::Bare(NodeRef::Token {
                    text: op.token(),
                    kind: TokenKind::Punctuation,
                    assoc: TokenAssoc::Neither,
                }),
                Slot::One(NodeRef::Expr(right)),
            ],
            Self::UnaryOp { op, operand, .. } => smallvec![
                Slot::Bare(NodeRef::Token {
                    text: op.token(),
                    kind: if op.is_word() {
                        TokenKind::Word
                    } else {
                        TokenKind::Punctuation
                    },
                    assoc: if op.is_word() {
                        TokenAssoc::Neither
                    } else {
                        TokenAssoc::Right
                    },
                }),
                Slot::One(NodeRef::Expr(operand)),
            ],
            Self::Compare { left, op, right, .. } => smallvec![
                Slot::One(NodeRef::Expr(left)),
                Slot::Bare(NodeRef::Token {
                    text: op.token(),
                    kind: if op.is_word() {
                        TokenKind::Word
                    } else {
                        TokenKind::Punctuation
                    },
                    assoc: TokenAssoc::Neither,
                }),
                Slot::One(NodeRef::Expr(right)),
            ],
            Self::IfExp { body, test, orelse, .. } => smallvec![
                Slot::One(NodeRef::Expr(body)),
                Slot::One(NodeRef::Expr(test)),
                Slot::One(NodeRef::Expr(orelse)),
            ],
            Self::Lambda { params, body, .. } => smallvec![
                group(params, NodeRef::Param),
                Slot::One(NodeRef::Expr(body)),
            ],
            Self::Await { value, .. }
            | Self::YieldFrom { value, .. }
            | Self::Starred { value, .. } => {
                smallvec![Slot::One(NodeRef::Expr(value))]
            }
            Self::Yield { value, .. } => smallvec![match value {
                Some(v) => Slot::Bare(NodeRef::Expr(v)),
                None => Slot::Empty,
            }],
            Self::Call { func, args, .. } => smallvec![
                Slot::One(NodeRef::Expr(func)),
                group(args, NodeRef::CallArg),
            ],
            Self::Attribute { value, attr, .. } => smallvec![
                Slot::One(NodeRef::Expr(value)),
                Slot::Bare(NodeRef::Ident(attr)),
            ],
            Self::Subscript { value, index, .. } => smallvec![
                Slot::One(NodeRef::Expr(value)),
                Slot::Bare(NodeRef::Expr(index)),
            ],
            Self::Slice { lower, upper, step, .. } => {
                smallvec![opt(lower), opt(upper), opt(step)]
            }
        }
    }
}

/// Template and slot access for the helper shapes that are not
/// themselves expressions or statements.
impl<'a> NodeRef<'a> {
    pub(crate) fn aux_template(self) -> Option<&'static Template> {
        match self {
            Self::Expr(e) => Some(e.template()),
            Self::Stmt(s) => Some(s.template()),
            Self::Param(p) => Some(p.template()),
            Self::CallArg(a) => Some(a.template()),
            Self::Clause(c) => Some(c.template()),
            Self::CompIf(_) => Some(&COMP_IF),
            Self::Handler(h) => Some(h.template()),
            Self::Elif(e) => Some(e.template()),
            Self::WithItem(w) => Some(w.template()),
            Self::Alias(a) => Some(a.template()),
            Self::DictItem(_) => Some(&DICT_ITEM),
            Self::Decorator(_) => Some(&DECORATOR),
            Self::Dotted(_) | Self::Ident(_) | Self::StrLit(_) | Self::Token { .. } => None,
        }
    }

    pub(crate) fn aux_slots(self) -> Slots<'a> {
        match self {
            Self::Expr(e) => e.slots(),
            Self::Stmt(s) => s.slots(),
            Self::Param(p) => p.slots(),
            Self::CallArg(a) => a.slots(),
            Self::Clause(c) => c.slots(),
            Self::CompIf(cond) => smallvec![Slot::One(NodeRef::Expr(cond))],
            Self::Handler(h) => h.slots(),
            Self::Elif(e) => e.slots(),
            Self::WithItem(w) => w.slots(),
            Self::Alias(a) => a.slots(),
            Self::DictItem(item) => item.slots(),
            Self::Decorator(expr) => smallvec![Slot::Bare(NodeRef::Expr(expr))],
            Self::Dotted(_) | Self::Ident(_) | Self::StrLit(_) | Self::Token { .. } => {
                Slots::new()
            }
        }
    }
}

templates! {
    ATOM_TOKEN => "{0}";
    TUPLE_EMPTY => "(~ ~)";
    TUPLE_SINGLE => "{0*,} ~,";
    TUPLE_MANY => "{0*,}";
    LIST => "[~ {0*,} ~]";
    SET => "{~ {0*,} ~}";
    SET_EMPTY => "set ~(~ ~)";
    DICT => "{~ {0*,} ~}";
    DICT_ITEM => "{0} ~: {1}";
    LIST_COMP => "[~ {0} {1*} ~]";
    SET_COMP => "{~ {0} {1*} ~}";
    DICT_COMP => "{~ {0} ~: {1} {2*} ~}";
    GENERATOR_EXP => "(~ {0} {1*} ~)";
    CLAUSE => "for {0} in {1} {2*}";
    CLAUSE_ASYNC => "async for {0} in {1} {2*}";
    COMP_IF => "if {0}";
    INFIX => "{0} {1} {2}";
    PREFIX => "{0} {1}";
    IF_EXP => "{0} if {1} else {2}";
    LAMBDA => "lambda {0*,} ~: {1}";
    AWAIT => "await {0}";
    YIELD_BARE => "yield";
    YIELD_VALUE => "yield {0}";
    YIELD_FROM => "yield from {0}";
    CALL => "{0} ~(~ {1*,} ~)";
    ATTRIBUTE => "{0} ~.~ {1}";
    SUBSCRIPT => "{0} ~[~ {1} ~]";
    SLICE => "{0} ~:~ {1}";
    SLICE_STEP => "{0} ~:~ {1} ~:~ {2}";
    STARRED => "*~ {0}";
    ARG_VALUE => "{1}";
    ARG_NAMED => "{0} ~=~ {1}";
    ARG_STAR => "*~ {1}";
    ARG_DOUBLE_STAR => "**~ {1}";
    DECORATOR => "@~ {0} NL";
}
