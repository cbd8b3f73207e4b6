//! Operator tokens and the precedence/associativity table that drives
//! parenthesization decisions during formatting.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Associativity of one precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assoc {
    Left,
    Right,
    /// Chaining is not allowed at equal precedence (comparisons).
    NonAssoc,
}

/// Precedence and associativity for one grammar level. Higher
/// `precedence` binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpDef {
    pub precedence: u8,
    pub assoc: Assoc,
}

impl OpDef {
    const fn new(precedence: u8, assoc: Assoc) -> Self {
        Self { precedence, assoc }
    }

    /// Decides whether a child expression with definition `child` can sit
    /// unparenthesized in this operator's operand slot `child_index`
    /// (0 = leftmost of `child_count` operands).
    #[must_use]
    pub fn can_nest(&self, child: &Self, child_index: usize, child_count: usize) -> bool {
        if child.precedence > self.precedence {
            return true;
        }
        if child.precedence < self.precedence {
            return false;
        }
        match self.assoc {
            Assoc::Left => child_index == 0,
            Assoc::Right => child_index + 1 == child_count,
            Assoc::NonAssoc => false,
        }
    }
}

// The Python expression grammar, loosest binding first.
pub const YIELD_DEF: OpDef = OpDef::new(0, Assoc::Left);
pub const TUPLE_DEF: OpDef = OpDef::new(1, Assoc::Left);
pub const STAR_DEF: OpDef = OpDef::new(1, Assoc::Left);
pub const LAMBDA_DEF: OpDef = OpDef::new(2, Assoc::Right);
pub const TERNARY_DEF: OpDef = OpDef::new(3, Assoc::Right);
pub const OR_DEF: OpDef = OpDef::new(4, Assoc::Left);
pub const AND_DEF: OpDef = OpDef::new(5, Assoc::Left);
pub const NOT_DEF: OpDef = OpDef::new(6, Assoc::Right);
pub const COMPARISON_DEF: OpDef = OpDef::new(7, Assoc::NonAssoc);
pub const BIT_OR_DEF: OpDef = OpDef::new(8, Assoc::Left);
pub const BIT_XOR_DEF: OpDef = OpDef::new(9, Assoc::Left);
pub const BIT_AND_DEF: OpDef = OpDef::new(10, Assoc::Left);
pub const SHIFT_DEF: OpDef = OpDef::new(11, Assoc::Left);
pub const ADDITIVE_DEF: OpDef = OpDef::new(12, Assoc::Left);
pub const MULTIPLICATIVE_DEF: OpDef = OpDef::new(13, Assoc::Left);
pub const UNARY_DEF: OpDef = OpDef::new(14, Assoc::Right);
pub const POWER_DEF: OpDef = OpDef::new(15, Assoc::Right);
pub const AWAIT_DEF: OpDef = OpDef::new(16, Assoc::Right);
pub const CALL_DEF: OpDef = OpDef::new(17, Assoc::Left);
pub const ATOM_DEF: OpDef = OpDef::new(18, Assoc::Left);

/// Binary operators, `and`/`or` excluded (those short-circuit and live in
/// their own node so boolean rewrites can keep clear of them).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, EnumIter,
)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "@")]
    MatMul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "//")]
    FloorDiv,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Pow,
    #[strum(serialize = "<<")]
    LShift,
    #[strum(serialize = ">>")]
    RShift,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "&")]
    BitAnd,
}

impl BinaryOp {
    #[must_use]
    pub fn def(self) -> &'static OpDef {
        match self {
            Self::Add | Self::Sub => &ADDITIVE_DEF,
            Self::Mul | Self::MatMul | Self::Div | Self::FloorDiv | Self::Mod => {
                &MULTIPLICATIVE_DEF
            }
            Self::Pow => &POWER_DEF,
            Self::LShift | Self::RShift => &SHIFT_DEF,
            Self::BitOr => &BIT_OR_DEF,
            Self::BitXor => &BIT_XOR_DEF,
            Self::BitAnd => &BIT_AND_DEF,
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }
}

/// Short-circuit boolean operators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum BoolOpKind {
    And,
    Or,
}

impl BoolOpKind {
    #[must_use]
    pub fn def(self) -> &'static OpDef {
        match self {
            Self::And => &AND_DEF,
            Self::Or => &OR_DEF,
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }
}

/// Unary operators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, EnumIter,
)]
pub enum UnaryOp {
    #[strum(serialize = "not")]
    Not,
    #[strum(serialize = "+")]
    UAdd,
    #[strum(serialize = "-")]
    USub,
    #[strum(serialize = "~")]
    Invert,
}

impl UnaryOp {
    #[must_use]
    pub fn def(self) -> &'static OpDef {
        match self {
            Self::Not => &NOT_DEF,
            Self::UAdd | Self::USub | Self::Invert => &UNARY_DEF,
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// True for `not`, which renders as a word with surrounding spaces;
    /// the symbolic operators glue to their operand.
    #[must_use]
    pub fn is_word(self) -> bool {
        self == Self::Not
    }
}

/// Comparison, membership, and identity operators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, EnumIter,
)]
pub enum CompareOp {
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    LtEq,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    GtEq,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    NotEq,
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "not in")]
    NotIn,
    #[strum(serialize = "is")]
    Is,
    #[strum(serialize = "is not")]
    IsNot,
}

impl CompareOp {
    /// The logically complementary operator, used when negating a
    /// comparison instead of wrapping it in `not (...)`.
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Self::Lt => Self::GtEq,
            Self::GtEq => Self::Lt,
            Self::Gt => Self::LtEq,
            Self::LtEq => Self::Gt,
            Self::Eq => Self::NotEq,
            Self::NotEq => Self::Eq,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
            Self::Is => Self::IsNot,
            Self::IsNot => Self::Is,
        }
    }

    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// True for the word-shaped operators (`in`, `not in`, `is`, `is not`).
    #[must_use]
    pub fn is_word(self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Is | Self::IsNot)
    }
}

/// Augmented assignment operators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr, EnumIter,
)]
pub enum AugAssignOp {
    #[strum(serialize = "+=")]
    Add,
    #[strum(serialize = "-=")]
    Sub,
    #[strum(serialize = "*=")]
    Mul,
    #[strum(serialize = "@=")]
    MatMul,
    #[strum(serialize = "/=")]
    Div,
    #[strum(serialize = "//=")]
    FloorDiv,
    #[strum(serialize = "%=")]
    Mod,
    #[strum(serialize = "**=")]
    Pow,
    #[strum(serialize = "<<=")]
    LShift,
    #[strum(serialize = ">>=")]
    RShift,
    #[strum(serialize = "|=")]
    BitOr,
    #[strum(serialize = "^=")]
    BitXor,
    #[strum(serialize = "&=")]
    BitAnd,
}

impl AugAssignOp {
    #[must_use]
    pub fn token(self) -> &'static str {
        self.into()
    }
}
