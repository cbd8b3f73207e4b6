//! Builder helpers for assembling trees, plus the small rewrites the
//! translator layer leans on (boolean negation, placeholder bodies,
//! diagnostic garbage nodes).
//!
//! Structural invariants are enforced here, at construction: a malformed
//! node is an upstream bug and fails fast rather than rendering broken
//! source.

use crate::ast::{
    ArgPrefix, CallArg, Constant, Elif, ExceptHandler, Expr, Param, ParamPrefix, Pos, Program,
    Stmt, WithItem,
};
use crate::op::{BinaryOp, BoolOpKind, CompareOp, UnaryOp};

// ---- expressions -----------------------------------------------------

#[must_use]
pub fn name_ref(pos: Pos, id: impl Into<String>) -> Expr {
    Expr::Name { pos, id: id.into() }
}

#[must_use]
pub fn int_lit(pos: Pos, value: i64) -> Expr {
    Expr::Num { pos, text: value.to_string() }
}

#[must_use]
pub fn float_lit(pos: Pos, value: f64) -> Expr {
    let mut text = value.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    Expr::Num { pos, text }
}

#[must_use]
pub fn str_lit(pos: Pos, value: impl Into<String>) -> Expr {
    Expr::Str { pos, value: value.into() }
}

#[must_use]
pub fn none(pos: Pos) -> Expr {
    Expr::Constant { pos, value: Constant::None }
}

#[must_use]
pub fn true_lit(pos: Pos) -> Expr {
    Expr::Constant { pos, value: Constant::True }
}

#[must_use]
pub fn false_lit(pos: Pos) -> Expr {
    Expr::Constant { pos, value: Constant::False }
}

#[must_use]
pub fn bool_lit(pos: Pos, value: bool) -> Expr {
    if value { true_lit(pos) } else { false_lit(pos) }
}

#[must_use]
pub fn tuple(pos: Pos, elts: Vec<Expr>) -> Expr {
    Expr::Tuple { pos, elts }
}

#[must_use]
pub fn list(pos: Pos, elts: Vec<Expr>) -> Expr {
    Expr::List { pos, elts }
}

#[must_use]
pub fn attr(pos: Pos, value: Expr, name: impl Into<String>) -> Expr {
    Expr::Attribute { pos, value: Box::new(value), attr: name.into() }
}

#[must_use]
pub fn subscript(pos: Pos, value: Expr, index: Expr) -> Expr {
    Expr::Subscript { pos, value: Box::new(value), index: Box::new(index) }
}

#[must_use]
pub fn bin(pos: Pos, left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::BinOp { pos, left: Box::new(left), op, right: Box::new(right) }
}

#[must_use]
pub fn unary(pos: Pos, op: UnaryOp, operand: Expr) -> Expr {
    Expr::UnaryOp { pos, op, operand: Box::new(operand) }
}

#[must_use]
pub fn compare(pos: Pos, left: Expr, op: CompareOp, right: Expr) -> Expr {
    Expr::Compare { pos, left: Box::new(left), op, right: Box::new(right) }
}

#[must_use]
pub fn bool_op(pos: Pos, left: Expr, op: BoolOpKind, right: Expr) -> Expr {
    Expr::BoolOp { pos, left: Box::new(left), op, right: Box::new(right) }
}

/// Builds a call node.
///
/// # Panics
///
/// Panics when the argument list carries more than one `**` spread, or a
/// `*` spread with a keyword name.
#[must_use]
pub fn call(pos: Pos, func: Expr, args: Vec<CallArg>) -> Expr {
    let double_stars = args.iter().filter(|a| a.prefix == ArgPrefix::DoubleStar).count();
    assert!(double_stars <= 1, "at most one ** argument per call");
    for arg in &args {
        assert!(
            arg.prefix == ArgPrefix::None || arg.name.is_none(),
            "a spread argument must not carry a name",
        );
    }
    Expr::Call { pos, func: Box::new(func), args }
}

/// A call with plain positional arguments.
#[must_use]
pub fn call_positional(pos: Pos, func: Expr, args: Vec<Expr>) -> Expr {
    call(
        pos,
        func,
        args.into_iter().map(|a| CallArg::positional(pos, a)).collect(),
    )
}

/// Builds a lambda.
///
/// # Panics
///
/// Panics when any parameter carries a type annotation; the grammar
/// forbids annotations in lambda parameter lists.
#[must_use]
pub fn lambda(pos: Pos, params: Vec<Param>, body: Expr) -> Expr {
    for param in &params {
        assert!(
            param.annotation.is_none(),
            "lambda parameter {:?} must not be annotated",
            param.name,
        );
    }
    check_param_order(&params);
    Expr::Lambda { pos, params, body: Box::new(body) }
}

// ---- statements ------------------------------------------------------

#[must_use]
pub fn expr_stmt(pos: Pos, value: Expr) -> Stmt {
    Stmt::ExprStmt { pos, value }
}

#[must_use]
pub fn return_stmt(pos: Pos, value: Option<Expr>) -> Stmt {
    Stmt::Return { pos, value }
}

#[must_use]
pub fn assign1(pos: Pos, target: Expr, value: Expr) -> Stmt {
    Stmt::Assign { pos, targets: vec![target], value }
}

/// Builds a single-line comment.
///
/// # Panics
///
/// Panics when the text contains a line terminator; comments are
/// strictly one line, and the caller splits beforehand.
#[must_use]
pub fn comment(pos: Pos, text: impl Into<String>) -> Stmt {
    let text = text.into();
    assert!(
        !text.contains(['\n', '\r']),
        "comment text must not contain a newline",
    );
    Stmt::Comment { pos, text }
}

/// Builds a function definition.
///
/// # Panics
///
/// Panics when parameters are out of order: plain parameters must come
/// before a `*rest`, which must come before a `**spread`.
#[must_use]
pub fn function_def(
    pos: Pos,
    name: impl Into<String>,
    params: Vec<Param>,
    body: Vec<Stmt>,
) -> Stmt {
    check_param_order(&params);
    Stmt::FunctionDef {
        pos,
        is_async: false,
        name: name.into(),
        decorators: Vec::new(),
        params,
        returns: None,
        body,
    }
}

#[must_use]
pub fn class_def(
    pos: Pos,
    name: impl Into<String>,
    bases: Vec<CallArg>,
    body: Vec<Stmt>,
) -> Stmt {
    let double_stars = bases.iter().filter(|a| a.prefix == ArgPrefix::DoubleStar).count();
    assert!(double_stars <= 1, "at most one ** argument in a base list");
    Stmt::ClassDef {
        pos,
        name: name.into(),
        decorators: Vec::new(),
        bases,
        body,
    }
}

#[must_use]
pub fn if_stmt(pos: Pos, test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
    Stmt::If { pos, test, body, elifs: Vec::new(), orelse }
}

#[must_use]
pub fn if_elif(
    pos: Pos,
    test: Expr,
    body: Vec<Stmt>,
    elifs: Vec<Elif>,
    orelse: Vec<Stmt>,
) -> Stmt {
    Stmt::If { pos, test, body, elifs, orelse }
}

#[must_use]
pub fn while_stmt(pos: Pos, test: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While { pos, test, body, orelse: Vec::new() }
}

#[must_use]
pub fn for_stmt(pos: Pos, target: Expr, iter: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::For { pos, is_async: false, target, iter, body, orelse: Vec::new() }
}

#[must_use]
pub fn with_stmt(pos: Pos, items: Vec<WithItem>, body: Vec<Stmt>) -> Stmt {
    assert!(!items.is_empty(), "with statement needs at least one item");
    Stmt::With { pos, is_async: false, items, body }
}

/// Builds a try statement.
///
/// # Panics
///
/// Panics when the node would be syntactically impossible: no handlers
/// and no finally body, or an else body without handlers.
#[must_use]
pub fn try_stmt(
    pos: Pos,
    body: Vec<Stmt>,
    handlers: Vec<ExceptHandler>,
    orelse: Vec<Stmt>,
    finalbody: Vec<Stmt>,
) -> Stmt {
    assert!(
        !handlers.is_empty() || !finalbody.is_empty(),
        "try needs at least one handler or a finally body",
    );
    assert!(
        orelse.is_empty() || !handlers.is_empty(),
        "try else requires at least one handler",
    );
    Stmt::Try { pos, body, handlers, orelse, finalbody }
}

fn check_param_order(params: &[Param]) {
    let mut stage = ParamPrefix::None;
    for param in params {
        match param.prefix {
            ParamPrefix::None => assert!(
                stage == ParamPrefix::None,
                "plain parameter {:?} after a rest/spread parameter",
                param.name,
            ),
            ParamPrefix::Star => {
                assert!(stage == ParamPrefix::None, "duplicate or misplaced *rest");
                stage = ParamPrefix::Star;
            }
            ParamPrefix::DoubleStar => {
                assert!(stage != ParamPrefix::DoubleStar, "duplicate **spread");
                stage = ParamPrefix::DoubleStar;
            }
        }
        assert!(
            param.prefix == ParamPrefix::None || param.default.is_none(),
            "rest/spread parameter {:?} must not carry a default",
            param.name,
        );
    }
}

// ---- render-time placeholder rule ------------------------------------

/// True when a body block would render with no semantic statement: only
/// comments, or nothing at all. Such a block gets a `pass` appended by
/// the selected template. Checked at render time because children can
/// change between construction and rendering.
#[must_use]
pub fn needs_pass(body: &[Stmt]) -> bool {
    body.iter().all(|s| matches!(s, Stmt::Comment { .. }))
}

// ---- boolean negation ------------------------------------------------

fn num_text_is_zero(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(|v| v == 0.0)
}

/// Logically negates an expression without piling up `not`s.
///
/// Comparisons flip to their complement, `not not x` cancels to `x`,
/// and literals constant-fold to a boolean. Everything else wraps in a
/// single `not`. Deliberately never distributes over `and`/`or`: De
/// Morgan expansion would change short-circuit evaluation order.
#[must_use]
pub fn boolean_negate(expr: Expr) -> Expr {
    match expr {
        Expr::Compare { pos, left, op, right } => Expr::Compare {
            pos,
            left,
            op: op.complement(),
            right,
        },
        Expr::UnaryOp { op: UnaryOp::Not, operand, .. } => *operand,
        Expr::Num { pos, text } => bool_lit(pos, num_text_is_zero(&text)),
        Expr::Str { pos, value } => bool_lit(pos, value.is_empty()),
        Expr::Constant { pos, value: Constant::None } => true_lit(pos),
        Expr::Constant { pos, value: Constant::True } => false_lit(pos),
        Expr::Constant { pos, value: Constant::False } => true_lit(pos),
        Expr::Constant { pos, value: Constant::Ellipsis } => false_lit(pos),
        other => {
            let pos = other.pos();
            unary(pos, UnaryOp::Not, other)
        }
    }
}

// ---- diagnostic placeholders -----------------------------------------

fn garbage_string(pos: Pos, src: &str, diagnostic: Option<&str>) -> Expr {
    let text = match diagnostic {
        Some(d) => format!("<<{src}: {d}>>"),
        None => format!("<<{src}>>"),
    };
    str_lit(pos, text)
}

/// A visibly-marked placeholder for an expression this backend could not
/// translate. Renders as `('<<...>>', NotImplemented)` so output stays
/// parseable and the marker is easy to grep for.
#[must_use]
pub fn garbage_expr(pos: Pos, src: &str, diagnostic: Option<&str>) -> Expr {
    tuple(
        pos,
        vec![
            garbage_string(pos, src, diagnostic),
            Expr::Constant { pos, value: Constant::NotImplemented },
        ],
    )
}

/// The statement-shaped counterpart of [`garbage_expr`].
#[must_use]
pub fn garbage_stmt(pos: Pos, src: &str, diagnostic: Option<&str>) -> Stmt {
    expr_stmt(pos, garbage_string(pos, src, diagnostic))
}

// ---- statement-list rewriting ----------------------------------------

/// Replaces each top-level statement with zero or more statements.
pub fn replace_many<F>(program: &mut Program, mut f: F)
where
    F: FnMut(Stmt) -> Vec<Stmt>,
{
    let body = std::mem::take(&mut program.body);
    program.body = body.into_iter().flat_map(|s| f(s)).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DependencyCategory;

    fn p() -> Pos {
        Pos::default()
    }

    // ==== structural invariants ====

    #[test]
    #[should_panic(expected = "at least one handler or a finally")]
    fn try_without_handlers_or_finally_panics() {
        let _ = try_stmt(p(), vec![], vec![], vec![], vec![]);
    }

    #[test]
    #[should_panic(expected = "else requires at least one handler")]
    fn try_else_without_handlers_panics() {
        let orelse = vec![expr_stmt(p(), int_lit(p(), 1))];
        let finalbody = vec![expr_stmt(p(), int_lit(p(), 2))];
        let _ = try_stmt(p(), vec![], vec![], orelse, finalbody);
    }

    #[test]
    fn try_with_only_finally_is_fine() {
        let finalbody = vec![expr_stmt(p(), int_lit(p(), 1))];
        let _ = try_stmt(p(), vec![], vec![], vec![], finalbody);
    }

    #[test]
    #[should_panic(expected = "at most one ** argument")]
    fn call_with_two_double_stars_panics() {
        let args = vec![
            CallArg::double_star(p(), name_ref(p(), "a")),
            CallArg::double_star(p(), name_ref(p(), "b")),
        ];
        let _ = call(p(), name_ref(p(), "f"), args);
    }

    #[test]
    #[should_panic(expected = "must not carry a name")]
    fn named_star_argument_panics() {
        let mut arg = CallArg::star(p(), name_ref(p(), "a"));
        arg.name = Some("bad".into());
        let _ = call(p(), name_ref(p(), "f"), vec![arg]);
    }

    #[test]
    #[should_panic(expected = "after a rest/spread parameter")]
    fn plain_param_after_star_panics() {
        let params = vec![
            Param::plain(p(), "rest").with_prefix(ParamPrefix::Star),
            Param::plain(p(), "x"),
        ];
        let _ = function_def(p(), "f", params, vec![]);
    }

    #[test]
    #[should_panic(expected = "must not carry a default")]
    fn star_param_with_default_panics() {
        let _ = Param::with_default(p(), "rest", int_lit(p(), 1)).with_prefix(ParamPrefix::Star);
    }

    #[test]
    #[should_panic(expected = "must not be annotated")]
    fn annotated_lambda_param_panics() {
        let params = vec![Param::plain(p(), "x").with_annotation(name_ref(p(), "int"))];
        let _ = lambda(p(), params, name_ref(p(), "x"));
    }

    #[test]
    #[should_panic(expected = "must not contain a newline")]
    fn multiline_comment_panics() {
        let _ = comment(p(), "one\ntwo");
    }

    // ==== deep copy ====

    #[test]
    fn deep_copy_is_equal_but_disjoint() {
        let original = function_def(
            p(),
            "f",
            vec![Param::plain(p(), "x")],
            vec![return_stmt(
                p(),
                Some(bin(p(), name_ref(p(), "x"), BinaryOp::Add, int_lit(p(), 1))),
            )],
        );
        let copy = original.clone();
        assert_eq!(copy, original);

        // Mutating the copy's children must not touch the original.
        let mut copy = copy;
        if let Stmt::FunctionDef { body, .. } = &mut copy {
            body.clear();
        }
        assert_ne!(copy, original);
        if let Stmt::FunctionDef { body, .. } = &original {
            assert_eq!(body.len(), 1);
        }
    }

    #[test]
    fn equality_ignores_positions() {
        let a = name_ref(Pos::new(1, 2), "x");
        let b = name_ref(Pos::new(9, 9), "x");
        assert_eq!(a, b);
    }

    // ==== placeholder bodies ====

    #[test]
    fn needs_pass_detection() {
        assert!(needs_pass(&[]));
        assert!(needs_pass(&[comment(p(), "only a comment")]));
        assert!(needs_pass(&[comment(p(), "a"), comment(p(), "b")]));
        assert!(!needs_pass(&[comment(p(), "a"), expr_stmt(p(), int_lit(p(), 1))]));
    }

    // ==== boolean negation ====

    #[test]
    fn negate_flips_every_comparator() {
        let table = [
            (CompareOp::Lt, CompareOp::GtEq),
            (CompareOp::LtEq, CompareOp::Gt),
            (CompareOp::Gt, CompareOp::LtEq),
            (CompareOp::GtEq, CompareOp::Lt),
            (CompareOp::Eq, CompareOp::NotEq),
            (CompareOp::NotEq, CompareOp::Eq),
            (CompareOp::In, CompareOp::NotIn),
            (CompareOp::NotIn, CompareOp::In),
            (CompareOp::Is, CompareOp::IsNot),
            (CompareOp::IsNot, CompareOp::Is),
        ];
        for (op, flipped) in table {
            let negated =
                boolean_negate(compare(p(), name_ref(p(), "a"), op, name_ref(p(), "b")));
            assert_eq!(
                negated,
                compare(p(), name_ref(p(), "a"), flipped, name_ref(p(), "b")),
            );
        }
    }

    #[test]
    fn negate_cancels_double_not() {
        let x = name_ref(p(), "x");
        let negated = boolean_negate(unary(p(), UnaryOp::Not, x.clone()));
        assert_eq!(negated, x);
    }

    #[test]
    fn negate_folds_literals() {
        assert_eq!(boolean_negate(int_lit(p(), 0)), true_lit(p()));
        assert_eq!(boolean_negate(int_lit(p(), 5)), false_lit(p()));
        assert_eq!(boolean_negate(float_lit(p(), 0.0)), true_lit(p()));
        assert_eq!(boolean_negate(str_lit(p(), "")), true_lit(p()));
        assert_eq!(boolean_negate(str_lit(p(), "x")), false_lit(p()));
        assert_eq!(boolean_negate(none(p())), true_lit(p()));
        assert_eq!(boolean_negate(true_lit(p())), false_lit(p()));
        assert_eq!(boolean_negate(false_lit(p())), true_lit(p()));
        let ellipsis = Expr::Constant { pos: p(), value: Constant::Ellipsis };
        assert_eq!(boolean_negate(ellipsis), false_lit(p()));
    }

    #[test]
    fn negate_never_applies_de_morgan() {
        // not (a and b) must stay a single wrapping not, not expand to
        // (not a) or (not b): that would change evaluation order.
        let conj = bool_op(p(), name_ref(p(), "a"), BoolOpKind::And, name_ref(p(), "b"));
        let negated = boolean_negate(conj.clone());
        assert_eq!(negated, unary(p(), UnaryOp::Not, conj));

        let disj = bool_op(p(), name_ref(p(), "a"), BoolOpKind::Or, name_ref(p(), "b"));
        let negated = boolean_negate(disj.clone());
        assert_eq!(negated, unary(p(), UnaryOp::Not, disj));
    }

    #[test]
    fn negate_falls_back_to_not() {
        let call_expr = call_positional(p(), name_ref(p(), "f"), vec![]);
        let negated = boolean_negate(call_expr.clone());
        assert_eq!(negated, unary(p(), UnaryOp::Not, call_expr));
    }

    // ==== statement rewriting ====

    #[test]
    fn replace_many_flattens() {
        let mut program = Program::new(
            p(),
            vec![expr_stmt(p(), int_lit(p(), 1)), Stmt::Pass { pos: p() }],
            DependencyCategory::Production,
        );
        replace_many(&mut program, |s| match s {
            Stmt::Pass { pos } => vec![
                comment(pos, "expanded"),
                expr_stmt(pos, int_lit(pos, 2)),
            ],
            other => vec![other],
        });
        assert_eq!(program.body.len(), 3);
    }
}
