//! Statement shapes, their formattable slots, and the template catalog.
//!
//! Every statement template is newline-terminated, so statement groups
//! compose without separators: a block is `IND {body*} DED` and each
//! element ends its own line. Shapes with optional clauses or bodies
//! that may render empty pick among several precomputed templates; the
//! `pass` placeholder is part of the template, chosen at render time
//! from the then-current child list.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use crate::ast::build::needs_pass;
use crate::ast::{group, NodeRef, Pos, Slot, Slots};
use crate::dotted::DottedIdentifier;
use crate::op::AugAssignOp;
use crate::template::{templates, Template};
use crate::token::{TokenAssoc, TokenKind};

use super::expr::{CallArg, Expr};

/// Whether a program is part of the shipped package or its test suite.
/// Support-code requests are split along the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyCategory {
    Production,
    Test,
}

/// A whole translated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    pub pos: Pos,
    pub body: Vec<Stmt>,
    pub category: DependencyCategory,
}

impl Program {
    #[must_use]
    pub fn new(pos: Pos, body: Vec<Stmt>, category: DependencyCategory) -> Self {
        Self { pos, body, category }
    }

    #[must_use]
    pub fn template(&self) -> &'static Template {
        &PROGRAM
    }

    #[must_use]
    pub fn slots(&self) -> Slots<'_> {
        smallvec![group(&self.body, NodeRef::Stmt)]
    }
}

/// Prefix of a formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamPrefix {
    None,
    /// `*rest`
    Star,
    /// `**kwargs`
    DoubleStar,
}

/// A formal parameter of a function or lambda.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub pos: Pos,
    pub prefix: ParamPrefix,
    pub name: String,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
}

impl Param {
    /// A plain, unannotated parameter.
    #[must_use]
    pub fn plain(pos: Pos, name: impl Into<String>) -> Self {
        Self {
            pos,
            prefix: ParamPrefix::None,
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    /// An optional parameter with a default value.
    ///
    /// # Panics
    ///
    /// Never panics itself; combining a default with a rest/spread
    /// prefix is rejected by [`Param::with_prefix`].
    #[must_use]
    pub fn with_default(pos: Pos, name: impl Into<String>, default: Expr) -> Self {
        Self {
            pos,
            prefix: ParamPrefix::None,
            name: name.into(),
            annotation: None,
            default: Some(default),
        }
    }

    /// Attaches a rest or spread prefix.
    ///
    /// # Panics
    ///
    /// Panics when the parameter also carries a default value.
    #[must_use]
    pub fn with_prefix(mut self, prefix: ParamPrefix) -> Self {
        assert!(
            prefix == ParamPrefix::None || self.default.is_none(),
            "rest/spread parameter {:?} must not carry a default",
            self.name,
        );
        self.prefix = prefix;
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Expr) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub(crate) fn template(&self) -> &'static Template {
        match (self.prefix, self.annotation.is_some(), self.default.is_some()) {
            (ParamPrefix::Star, true, _) => &PARAM_STAR_ANN,
            (ParamPrefix::Star, false, _) => &PARAM_STAR,
            (ParamPrefix::DoubleStar, true, _) => &PARAM_DOUBLE_STAR_ANN,
            (ParamPrefix::DoubleStar, false, _) => &PARAM_DOUBLE_STAR,
            (ParamPrefix::None, true, true) => &PARAM_ANN_DEFAULT,
            (ParamPrefix::None, true, false) => &PARAM_ANN,
            (ParamPrefix::None, false, true) => &PARAM_DEFAULT,
            (ParamPrefix::None, false, false) => &PARAM,
        }
    }

    pub(crate) fn slots(&self) -> Slots<'_> {
        smallvec![
            Slot::Bare(NodeRef::Ident(&self.name)),
            match &self.annotation {
                Some(a) => Slot::One(NodeRef::Expr(a)),
                None => Slot::Empty,
            },
            match &self.default {
                Some(d) => Slot::One(NodeRef::Expr(d)),
                None => Slot::Empty,
            },
        ]
    }
}

/// An `elif` branch. Owned by [`Stmt::If`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Elif {
    pub pos: Pos,
    pub test: Expr,
    pub body: Vec<Stmt>,
}

impl Elif {
    #[must_use]
    pub fn new(pos: Pos, test: Expr, body: Vec<Stmt>) -> Self {
        Self { pos, test, body }
    }

    pub(crate) fn template(&self) -> &'static Template {
        if needs_pass(&self.body) { &ELIF_PASS } else { &ELIF }
    }

    pub(crate) fn slots(&self) -> Slots<'_> {
        smallvec![Slot::One(NodeRef::Expr(&self.test)), group(&self.body, NodeRef::Stmt)]
    }
}

/// One `except` clause of a try statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExceptHandler {
    pub pos: Pos,
    pub typ: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

impl ExceptHandler {
    /// # Panics
    ///
    /// Panics when a binding name is given without an exception type.
    #[must_use]
    pub fn new(pos: Pos, typ: Option<Expr>, name: Option<String>, body: Vec<Stmt>) -> Self {
        assert!(
            typ.is_some() || name.is_none(),
            "except binding requires an exception type",
        );
        Self { pos, typ, name, body }
    }

    pub(crate) fn template(&self) -> &'static Template {
        match (self.typ.is_some(), self.name.is_some(), needs_pass(&self.body)) {
            (true, true, false) => &EXCEPT_AS,
            (true, true, true) => &EXCEPT_AS_PASS,
            (true, false, false) => &EXCEPT_TYPE,
            (true, false, true) => &EXCEPT_TYPE_PASS,
            (false, _, false) => &EXCEPT,
            (false, _, true) => &EXCEPT_PASS,
        }
    }

    pub(crate) fn slots(&self) -> Slots<'_> {
        smallvec![
            match &self.typ {
                Some(t) => Slot::One(NodeRef::Expr(t)),
                None => Slot::Empty,
            },
            match &self.name {
                Some(n) => Slot::Bare(NodeRef::Ident(n)),
                None => Slot::Empty,
            },
            group(&self.body, NodeRef::Stmt),
        ]
    }
}

/// One context manager of a with statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithItem {
    pub pos: Pos,
    pub context: Expr,
    pub binding: Option<Expr>,
}

impl WithItem {
    #[must_use]
    pub fn new(pos: Pos, context: Expr, binding: Option<Expr>) -> Self {
        Self { pos, context, binding }
    }

    pub(crate) fn template(&self) -> &'static Template {
        if self.binding.is_some() { &WITH_ITEM_AS } else { &WITH_ITEM }
    }

    pub(crate) fn slots(&self) -> Slots<'_> {
        smallvec![
            Slot::One(NodeRef::Expr(&self.context)),
            match &self.binding {
                Some(b) => Slot::Bare(NodeRef::Expr(b)),
                None => Slot::Empty,
            },
        ]
    }
}

/// A `name` or `name as asname` entry of an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportAlias {
    pub pos: Pos,
    pub name: String,
    pub asname: Option<String>,
}

impl ImportAlias {
    #[must_use]
    pub fn new(pos: Pos, name: impl Into<String>, asname: Option<String>) -> Self {
        Self { pos, name: name.into(), asname }
    }

    /// The simple name this alias binds in the importing module.
    #[must_use]
    pub fn bound_name(&self) -> &str {
        match &self.asname {
            Some(asname) => asname,
            // `import a.b` binds `a`.
            None => self.name.split('.').next().unwrap_or(&self.name),
        }
    }

    pub(crate) fn template(&self) -> &'static Template {
        if self.asname.is_some() { &ALIAS_AS } else { &ALIAS }
    }

    pub(crate) fn slots(&self) -> Slots<'_> {
        smallvec![
            Slot::Bare(NodeRef::Ident(&self.name)),
            match &self.asname {
                Some(asname) => Slot::Bare(NodeRef::Ident(asname)),
                None => Slot::Empty,
            },
        ]
    }
}

/// The statement family. `Clone` deep-copies; equality and hashing skip
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    FunctionDef {
        pos: Pos,
        is_async: bool,
        name: String,
        decorators: Vec<Expr>,
        params: Vec<Param>,
        returns: Option<Expr>,
        body: Vec<Stmt>,
    },
    ClassDef {
        pos: Pos,
        name: String,
        decorators: Vec<Expr>,
        bases: Vec<CallArg>,
        body: Vec<Stmt>,
    },
    Return {
        pos: Pos,
        value: Option<Expr>,
    },
    Assign {
        pos: Pos,
        targets: Vec<Expr>,
        value: Expr,
    },
    AugAssign {
        pos: Pos,
        target: Expr,
        op: AugAssignOp,
        value: Expr,
    },
    AnnAssign {
        pos: Pos,
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    Delete {
        pos: Pos,
        targets: Vec<Expr>,
    },
    For {
        pos: Pos,
        is_async: bool,
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        pos: Pos,
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    If {
        pos: Pos,
        test: Expr,
        body: Vec<Stmt>,
        elifs: Vec<Elif>,
        orelse: Vec<Stmt>,
    },
    With {
        pos: Pos,
        is_async: bool,
        items: Vec<WithItem>,
        body: Vec<Stmt>,
    },
    Try {
        pos: Pos,
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    },
    Assert {
        pos: Pos,
        test: Expr,
        msg: Option<Expr>,
    },
    Raise {
        pos: Pos,
        exc: Option<Expr>,
        cause: Option<Expr>,
    },
    Global {
        pos: Pos,
        names: Vec<String>,
    },
    Nonlocal {
        pos: Pos,
        names: Vec<String>,
    },
    ExprStmt {
        pos: Pos,
        value: Expr,
    },
    Pass {
        pos: Pos,
    },
    Break {
        pos: Pos,
    },
    Continue {
        pos: Pos,
    },
    /// A full-line `#` comment. The text must not contain a newline.
    Comment {
        pos: Pos,
        text: String,
    },
    Import {
        pos: Pos,
        aliases: Vec<ImportAlias>,
    },
    ImportFrom {
        pos: Pos,
        module: DottedIdentifier,
        aliases: Vec<ImportAlias>,
    },
}

impl Stmt {
    #[must_use]
    pub fn pos(&self) -> Pos {
        match self {
            Self::FunctionDef { pos, .. }
            | Self::ClassDef { pos, .. }
            | Self::Return { pos, .. }
            | Self::Assign { pos, .. }
            | Self::AugAssign { pos, .. }
            | Self::AnnAssign { pos, .. }
            | Self::Delete { pos, .. }
            | Self::For { pos, .. }
            | Self::While { pos, .. }
            | Self::If { pos, .. }
            | Self::With { pos, .. }
            | Self::Try { pos, .. }
            | Self::Assert { pos, .. }
            | Self::Raise { pos, .. }
            | Self::Global { pos, .. }
            | Self::Nonlocal { pos, .. }
            | Self::ExprStmt { pos, .. }
            | Self::Pass { pos }
            | Self::Break { pos }
            | Self::Continue { pos }
            | Self::Comment { pos, .. }
            | Self::Import { pos, .. }
            | Self::ImportFrom { pos, .. } => *pos,
        }
    }

    /// Picks the precomputed template for the node's current attributes,
    /// including whether each body currently needs a `pass` placeholder.
    #[must_use]
    pub fn template(&self) -> &'static Template {
        match self {
            Self::FunctionDef { is_async, returns, body, .. } => {
                match (*is_async, returns.is_some(), needs_pass(body)) {
                    (false, false, false) => &DEF,
                    (false, false, true) => &DEF_PASS,
                    (false, true, false) => &DEF_RET,
                    (false, true, true) => &DEF_RET_PASS,
                    (true, false, false) => &ASYNC_DEF,
                    (true, false, true) => &ASYNC_DEF_PASS,
                    (true, true, false) => &ASYNC_DEF_RET,
                    (true, true, true) => &ASYNC_DEF_RET_PASS,
                }
            }
            Self::ClassDef { bases, body, .. } => {
                match (bases.is_empty(), needs_pass(body)) {
                    (true, false) => &CLASS,
                    (true, true) => &CLASS_PASS,
                    (false, false) => &CLASS_BASES,
                    (false, true) => &CLASS_BASES_PASS,
                }
            }
            Self::Return { value, .. } => {
                if value.is_some() { &RETURN_VALUE } else { &RETURN_BARE }
            }
            Self::Assign { .. } => &ASSIGN,
            Self::AugAssign { .. } => &AUG_ASSIGN,
            Self::AnnAssign { value, .. } => {
                if value.is_some() { &ANN_ASSIGN } else { &ANN_ASSIGN_BARE }
            }
            Self::Delete { .. } => &DELETE,
            Self::For { is_async, body, orelse, .. } => {
                let orelse_state = else_state(orelse);
                match (*is_async, needs_pass(body), orelse_state) {
                    (false, false, ElseState::Absent) => &FOR,
                    (false, true, ElseState::Absent) => &FOR_PASS,
                    (false, false, ElseState::Present) => &FOR_ELSE,
                    (false, true, ElseState::Present) => &FOR_PASS_ELSE,
                    (false, false, ElseState::Pass) => &FOR_ELSE_PASS,
                    (false, true, ElseState::Pass) => &FOR_PASS_ELSE_PASS,
                    (true, false, ElseState::Absent) => &ASYNC_FOR,
                    (true, true, ElseState::Absent) => &ASYNC_FOR_PASS,
                    (true, false, ElseState::Present) => &ASYNC_FOR_ELSE,
                    (true, true, ElseState::Present) => &ASYNC_FOR_PASS_ELSE,
                    (true, false, ElseState::Pass) => &ASYNC_FOR_ELSE_PASS,
                    (true, true, ElseState::Pass) => &ASYNC_FOR_PASS_ELSE_PASS,
                }
            }
            Self::While { body, orelse, .. } => {
                match (needs_pass(body), else_state(orelse)) {
                    (false, ElseState::Absent) => &WHILE,
                    (true, ElseState::Absent) => &WHILE_PASS,
                    (false, ElseState::Present) => &WHILE_ELSE,
                    (true, ElseState::Present) => &WHILE_PASS_ELSE,
                    (false, ElseState::Pass) => &WHILE_ELSE_PASS,
                    (true, ElseState::Pass) => &WHILE_PASS_ELSE_PASS,
                }
            }
            Self::If { body, orelse, .. } => {
                match (needs_pass(body), else_state(orelse)) {
                    (false, ElseState::Absent) => &IF,
                    (true, ElseState::Absent) => &IF_PASS,
                    (false, ElseState::Present) => &IF_ELSE,
                    (true, ElseState::Present) => &IF_PASS_ELSE,
                    (false, ElseState::Pass) => &IF_ELSE_PASS,
                    (true, ElseState::Pass) => &IF_PASS_ELSE_PASS,
                }
            }
            Self::With { is_async, body, .. } => {
                match (*is_async, needs_pass(body)) {
                    (false, false) => &WITH,
                    (false, true) => &WITH_PASS,
                    (true, false) => &ASYNC_WITH,
                    (true, true) => &ASYNC_WITH_PASS,
                }
            }
            Self::Try { body, orelse, finalbody, .. } => {
                match (needs_pass(body), else_state(orelse), else_state(finalbody)) {
                    (false, ElseState::Absent, ElseState::Absent) => &TRY,
                    (false, ElseState::Absent, ElseState::Present) => &TRY_FINAL,
                    (false, ElseState::Absent, ElseState::Pass) => &TRY_FINAL_PASS,
                    (false, ElseState::Present, ElseState::Absent) => &TRY_ELSE,
                    (false, ElseState::Present, ElseState::Present) => &TRY_ELSE_FINAL,
                    (false, ElseState::Present, ElseState::Pass) => &TRY_ELSE_FINAL_PASS,
                    (false, ElseState::Pass, ElseState::Absent) => &TRY_ELSE_PASS,
                    (false, ElseState::Pass, ElseState::Present) => &TRY_ELSE_PASS_FINAL,
                    (false, ElseState::Pass, ElseState::Pass) => &TRY_ELSE_PASS_FINAL_PASS,
                    (true, ElseState::Absent, ElseState::Absent) => &TRY_PASS,
                    (true, ElseState::Absent, ElseState::Present) => &TRY_PASS_FINAL,
                    (true, ElseState::Absent, ElseState::Pass) => &TRY_PASS_FINAL_PASS,
                    (true, ElseState::Present, ElseState::Absent) => &TRY_PASS_ELSE,
                    (true, ElseState::Present, ElseState::Present) => &TRY_PASS_ELSE_FINAL,
                    (true, ElseState::Present, ElseState::Pass) => &TRY_PASS_ELSE_FINAL_PASS,
                    (true, ElseState::Pass, ElseState::Absent) => &TRY_PASS_ELSE_PASS,
                    (true, ElseState::Pass, ElseState::Present) => &TRY_PASS_ELSE_PASS_FINAL,
                    (true, ElseState::Pass, ElseState::Pass) => &TRY_PASS_ELSE_PASS_FINAL_PASS,
                }
            }
            Self::Assert { msg, .. } => {
                if msg.is_some() { &ASSERT_MSG } else { &ASSERT }
            }
            Self::Raise { exc, cause, .. } => match (exc.is_some(), cause.is_some()) {
                (false, _) => &RAISE_BARE,
                (true, false) => &RAISE,
                (true, true) => &RAISE_FROM,
            },
            Self::Global { .. } => &GLOBAL,
            Self::Nonlocal { .. } => &NONLOCAL,
            Self::ExprStmt { .. } => &EXPR_STMT,
            Self::Pass { .. } => &PASS,
            Self::Break { .. } => &BREAK,
            Self::Continue { .. } => &CONTINUE,
            Self::Comment { .. } => &COMMENT,
            Self::Import { .. } => &IMPORT,
            Self::ImportFrom { .. } => &IMPORT_FROM,
        }
    }

    /// The ordered formattable slots the templates index into.
    #[must_use]
    pub fn slots(&self) -> Slots<'_> {
        fn opt(value: &Option<Expr>) -> Slot<'_> {
            match value {
                Some(v) => Slot::One(NodeRef::Expr(v)),
                None => Slot::Empty,
            }
        }
        fn opt_bare(value: &Option<Expr>) -> Slot<'_> {
            match value {
                Some(v) => Slot::Bare(NodeRef::Expr(v)),
                None => Slot::Empty,
            }
        }

        match self {
            Self::FunctionDef { name, decorators, params, returns, body, .. } => smallvec![
                group(decorators, NodeRef::Decorator),
                Slot::Bare(NodeRef::Ident(name)),
                group(params, NodeRef::Param),
                opt(returns),
                group(body, NodeRef::Stmt),
            ],
            Self::ClassDef { name, decorators, bases, body, .. } => smallvec![
                group(decorators, NodeRef::Decorator),
                Slot::Bare(NodeRef::Ident(name)),
                group(bases, NodeRef::CallArg),
                group(body, NodeRef::Stmt),
            ],
            Self::Return { value, .. } => smallvec![opt_bare(value)],
            Self::Assign { targets, value, .. } => smallvec![
                group(targets, NodeRef::Expr),
                Slot::Bare(NodeRef::Expr(value)),
            ],
            Self::AugAssign { target, op, value, .. } => smallvec![
                Slot::Bare(NodeRef::Expr(target)),
                Slot::Bare(NodeRef::Token {
                    text: op.token(),
                    kind: TokenKind::Punctuation,
                    assoc: TokenAssoc::Neither,
                }),
                Slot::Bare(NodeRef::Expr(value)),
            ],
            Self::AnnAssign { target, annotation, value, .. } => smallvec![
                Slot::Bare(NodeRef::Expr(target)),
                Slot::One(NodeRef::Expr(annotation)),
                opt_bare(value),
            ],
            Self::Delete { targets, .. } => smallvec![group(targets, NodeRef::Expr)],
            Self::For { target, iter, body, orelse, .. } => smallvec![
                Slot::Bare(NodeRef::Expr(target)),
                Slot::One(NodeRef::Expr(iter)),
                group(body, NodeRef::Stmt),
                group(orelse, NodeRef::Stmt),
            ],
            Self::While { test, body, orelse, .. } => smallvec![
                Slot::One(NodeRef::Expr(test)),
                group(body, NodeRef::Stmt),
                group(orelse, NodeRef::Stmt),
            ],
            Self::If { test, body, elifs, orelse, .. } => smallvec![
                Slot::One(NodeRef::Expr(test)),
                group(body, NodeRef::Stmt),
                group(elifs, NodeRef::Elif),
                group(orelse, NodeRef::Stmt),
            ],
            Self::With { items, body, .. } => smallvec![
                group(items, NodeRef::WithItem),
                group(body, NodeRef::Stmt),
            ],
            Self::Try { body, handlers, orelse, finalbody, .. } => smallvec![
                group(body, NodeRef::Stmt),
                group(handlers, NodeRef::Handler),
                group(orelse, NodeRef::Stmt),
                group(finalbody, NodeRef::Stmt),
            ],
            Self::Assert { test, msg, .. } => {
                smallvec![Slot::One(NodeRef::Expr(test)), opt(msg)]
            }
            Self::Raise { exc, cause, .. } => smallvec![opt(exc), opt(cause)],
            Self::Global { names, .. } | Self::Nonlocal { names, .. } => {
                smallvec![Slot::Group(
                    names.iter().map(|n| NodeRef::Ident(n)).collect()
                )]
            }
            Self::ExprStmt { value, .. } => smallvec![Slot::Bare(NodeRef::Expr(value))],
            Self::Pass { .. } | Self::Break { .. } | Self::Continue { .. } => Slots::new(),
            Self::Comment { text, .. } => smallvec![Slot::Bare(NodeRef::Token {
                text,
                kind: TokenKind::Comment,
                assoc: TokenAssoc::Neither,
            })],
            Self::Import { aliases, .. } => smallvec![group(aliases, NodeRef::Alias)],
            Self::ImportFrom { module, aliases, .. } => smallvec![
                Slot::Bare(NodeRef::Dotted(module)),
                group(aliases, NodeRef::Alias),
            ],
        }
    }
}

/// State of an optional trailing block, folding in its own `pass` need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElseState {
    Absent,
    Present,
    Pass,
}

fn else_state(block: &[Stmt]) -> ElseState {
    if block.is_empty() {
        ElseState::Absent
    } else if needs_pass(block) {
        ElseState::Pass
    } else {
        ElseState::Present
    }
}

templates! {
    PROGRAM => "{0*}";

    DEF => "{0*} def {1} ~(~ {2*,} ~) ~: NL IND {4*} DED";
    DEF_PASS => "{0*} def {1} ~(~ {2*,} ~) ~: NL IND {4*} pass NL DED";
    DEF_RET => "{0*} def {1} ~(~ {2*,} ~) -> {3} ~: NL IND {4*} DED";
    DEF_RET_PASS => "{0*} def {1} ~(~ {2*,} ~) -> {3} ~: NL IND {4*} pass NL DED";
    ASYNC_DEF => "{0*} async def {1} ~(~ {2*,} ~) ~: NL IND {4*} DED";
    ASYNC_DEF_PASS => "{0*} async def {1} ~(~ {2*,} ~) ~: NL IND {4*} pass NL DED";
    ASYNC_DEF_RET => "{0*} async def {1} ~(~ {2*,} ~) -> {3} ~: NL IND {4*} DED";
    ASYNC_DEF_RET_PASS => "{0*} async def {1} ~(~ {2*,} ~) -> {3} ~: NL IND {4*} pass NL DED";

    CLASS => "{0*} class {1} ~: NL IND {3*} DED";
    CLASS_PASS => "{0*} class {1} ~: NL IND {3*} pass NL DED";
    CLASS_BASES => "{0*} class {1} ~(~ {2*,} ~) ~: NL IND {3*} DED";
    CLASS_BASES_PASS => "{0*} class {1} ~(~ {2*,} ~) ~: NL IND {3*} pass NL DED";

    RETURN_BARE => "return NL";
    RETURN_VALUE => "return {0} NL";
    ASSIGN => "{0*=} = {1} NL";
    AUG_ASSIGN => "{0} {1} {2} NL";
    ANN_ASSIGN => "{0} ~: {1} = {2} NL";
    ANN_ASSIGN_BARE => "{0} ~: {1} NL";
    DELETE => "del {0*,} NL";

    FOR => "for {0} in {1} ~: NL IND {2*} DED";
    FOR_PASS => "for {0} in {1} ~: NL IND {2*} pass NL DED";
    FOR_ELSE => "for {0} in {1} ~: NL IND {2*} DED else ~: NL IND {3*} DED";
    FOR_PASS_ELSE => "for {0} in {1} ~: NL IND {2*} pass NL DED else ~: NL IND {3*} DED";
    FOR_ELSE_PASS => "for {0} in {1} ~: NL IND {2*} DED else ~: NL IND {3*} pass NL DED";
    FOR_PASS_ELSE_PASS => "for {0} in {1} ~: NL IND {2*} pass NL DED else ~: NL IND {3*} pass NL DED";
    ASYNC_FOR => "async for {0} in {1} ~: NL IND {2*} DED";
    ASYNC_FOR_PASS => "async for {0} in {1} ~: NL IND {2*} pass NL DED";
    ASYNC_FOR_ELSE => "async for {0} in {1} ~: NL IND {2*} DED else ~: NL IND {3*} DED";
    ASYNC_FOR_PASS_ELSE => "async for {0} in {1} ~: NL IND {2*} pass NL DED else ~: NL IND {3*} DED";
    ASYNC_FOR_ELSE_PASS => "async for {0} in {1} ~: NL IND {2*} DED else ~: NL IND {3*} pass NL DED";
    ASYNC_FOR_PASS_ELSE_PASS => "async for {0} in {1} ~: NL IND {2*} pass NL DED else ~: NL IND {3*} pass NL DED";

    WHILE => "while {0} ~: NL IND {1*} DED";
    WHILE_PASS => "while {0} ~: NL IND {1*} pass NL DED";
    WHILE_ELSE => "while {0} ~: NL IND {1*} DED else ~: NL IND {2*} DED";
    WHILE_PASS_ELSE => "while {0} ~: NL IND {1*} pass NL DED else ~: NL IND {2*} DED";
    WHILE_ELSE_PASS => "while {0} ~: NL IND {1*} DED else ~: NL IND {2*} pass NL DED";
    WHILE_PASS_ELSE_PASS => "while {0} ~: NL IND {1*} pass NL DED else ~: NL IND {2*} pass NL DED";

    IF => "if {0} ~: NL IND {1*} DED {2*}";
    IF_PASS => "if {0} ~: NL IND {1*} pass NL DED {2*}";
    IF_ELSE => "if {0} ~: NL IND {1*} DED {2*} else ~: NL IND {3*} DED";
    IF_PASS_ELSE => "if {0} ~: NL IND {1*} pass NL DED {2*} else ~: NL IND {3*} DED";
    IF_ELSE_PASS => "if {0} ~: NL IND {1*} DED {2*} else ~: NL IND {3*} pass NL DED";
    IF_PASS_ELSE_PASS => "if {0} ~: NL IND {1*} pass NL DED {2*} else ~: NL IND {3*} pass NL DED";
    ELIF => "elif {0} ~: NL IND {1*} DED";
    ELIF_PASS => "elif {0} ~: NL IND {1*} pass NL DED";

    WITH => "with {0*,} ~: NL IND {1*} DED";
    WITH_PASS => "with {0*,} ~: NL IND {1*} pass NL DED";
    ASYNC_WITH => "async with {0*,} ~: NL IND {1*} DED";
    ASYNC_WITH_PASS => "async with {0*,} ~: NL IND {1*} pass NL DED";
    WITH_ITEM => "{0}";
    WITH_ITEM_AS => "{0} as {1}";

    TRY => "try ~: NL IND {0*} DED {1*}";
    TRY_FINAL => "try ~: NL IND {0*} DED {1*} finally ~: NL IND {3*} DED";
    TRY_FINAL_PASS => "try ~: NL IND {0*} DED {1*} finally ~: NL IND {3*} pass NL DED";
    TRY_ELSE => "try ~: NL IND {0*} DED {1*} else ~: NL IND {2*} DED";
    TRY_ELSE_FINAL => "try ~: NL IND {0*} DED {1*} else ~: NL IND {2*} DED finally ~: NL IND {3*} DED";
    TRY_ELSE_FINAL_PASS => "try ~: NL IND {0*} DED {1*} else ~: NL IND {2*} DED finally ~: NL IND {3*} pass NL DED";
    TRY_ELSE_PASS => "try ~: NL IND {0*} DED {1*} else ~: NL IND {2*} pass NL DED";
    TRY_ELSE_PASS_FINAL => "try ~: NL IND {0*} DED {1*} else ~: NL IND {2*} pass NL DED finally ~: NL IND {3*} DED";
    TRY_ELSE_PASS_FINAL_PASS => "try ~: NL IND {0*} DED {1*} else ~: NL IND {2*} pass NL DED finally ~: NL IND {3*} pass NL DED";
    TRY_PASS => "try ~: NL IND {0*} pass NL DED {1*}";
    TRY_PASS_FINAL => "try ~: NL IND {0*} pass NL DED {1*} finally ~: NL IND {3*} DED";
    TRY_PASS_FINAL_PASS => "try ~: NL IND {0*} pass NL DED {1*} finally ~: NL IND {3*} pass NL DED";
    TRY_PASS_ELSE => "try ~: NL IND {0*} pass NL DED {1*} else ~: NL IND {2*} DED";
    TRY_PASS_ELSE_FINAL => "try ~: NL IND {0*} pass NL DED {1*} else ~: NL IND {2*} DED finally ~: NL IND {3*} DED";
    TRY_PASS_ELSE_FINAL_PASS => "try ~: NL IND {0*} pass NL DED {1*} else ~: NL IND {2*} DED finally ~: NL IND {3*} pass NL DED";
    TRY_PASS_ELSE_PASS => "try ~: NL IND {0*} pass NL DED {1*} else ~: NL IND {2*} pass NL DED";
    TRY_PASS_ELSE_PASS_FINAL => "try ~: NL IND {0*} pass NL DED {1*} else ~: NL IND {2*} pass NL DED finally ~: NL IND {3*} DED";
    TRY_PASS_ELSE_PASS_FINAL_PASS => "try ~: NL IND {0*} pass NL DED {1*} else ~: NL IND {2*} pass NL DED finally ~: NL IND {3*} pass NL DED";

    EXCEPT => "except ~: NL IND {2*} DED";
    EXCEPT_PASS => "except ~: NL IND {2*} pass NL DED";
    EXCEPT_TYPE => "except {0} ~: NL IND {2*} DED";
    EXCEPT_TYPE_PASS => "except {0} ~: NL IND {2*} pass NL DED";
    EXCEPT_AS => "except {0} as {1} ~: NL IND {2*} DED";
    EXCEPT_AS_PASS => "except {0} as {1} ~: NL IND {2*} pass NL DED";

    ASSERT => "assert {0} NL";
    ASSERT_MSG => "assert {0} ~, {1} NL";
    RAISE_BARE => "raise NL";
    RAISE => "raise {0} NL";
    RAISE_FROM => "raise {0} from {1} NL";
    GLOBAL => "global {0*,} NL";
    NONLOCAL => "nonlocal {0*,} NL";
    EXPR_STMT => "{0} NL";
    PASS => "pass NL";
    BREAK => "break NL";
    CONTINUE => "continue NL";
    COMMENT => "{0} NL";
    IMPORT => "import {0*,} NL";
    IMPORT_FROM => "from {0} import {1*,} NL";
    ALIAS => "{0}";
    ALIAS_AS => "{0} as {1}";

    PARAM => "{0}";
    PARAM_ANN => "{0} ~: {1}";
    PARAM_DEFAULT => "{0} ~=~ {2}";
    PARAM_ANN_DEFAULT => "{0} ~: {1} = {2}";
    PARAM_STAR => "*~ {0}";
    PARAM_STAR_ANN => "*~ {0} ~: {1}";
    PARAM_DOUBLE_STAR => "**~ {0}";
    PARAM_DOUBLE_STAR_ANN => "**~ {0} ~: {1}";
}
