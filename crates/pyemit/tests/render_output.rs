//! End-to-end rendering tests: trees in, exact source text out.
//!
//! Each test builds a small tree through the builder API and checks the
//! rendered text character for character, covering spacing, glue,
//! indentation, `pass` placeholders, and parenthesization working
//! together.

use pretty_assertions::assert_eq;
use pyemit::ast::{
    build, CallArg, Comprehension, DependencyCategory, Elif, ExceptHandler, Expr, ImportAlias,
    Param, Pos, Program, Stmt, WithItem,
};
use pyemit::{
    program_to_source, render_expr, render_stmt, AugAssignOp, BinaryOp, CompareOp,
    DottedIdentifier, SourceWriter, UnaryOp,
};

fn stmt_text(stmt: &Stmt) -> String {
    let mut w = SourceWriter::new();
    render_stmt(stmt, &mut w);
    w.finish()
}

fn expr_text(expr: &Expr) -> String {
    let mut w = SourceWriter::new();
    render_expr(expr, &mut w);
    w.finish()
}

// =============================================================================
// Definitions
// =============================================================================

#[test]
fn annotated_function_with_default_and_return_type() {
    let p = Pos::default();
    let comp = Expr::ListComp {
        pos: p,
        elt: Box::new(build::bin(
            p,
            build::name_ref(p, "v"),
            BinaryOp::Mul,
            build::name_ref(p, "factor"),
        )),
        generators: vec![Comprehension::new(
            p,
            build::name_ref(p, "v"),
            build::name_ref(p, "values"),
            vec![],
        )],
    };
    let mut def = build::function_def(
        p,
        "scale",
        vec![
            Param::plain(p, "values").with_annotation(build::name_ref(p, "list")),
            Param::with_default(p, "factor", build::int_lit(p, 2))
                .with_annotation(build::name_ref(p, "int")),
        ],
        vec![build::return_stmt(p, Some(comp))],
    );
    if let Stmt::FunctionDef { returns, .. } = &mut def {
        *returns = Some(build::name_ref(p, "list"));
    }
    assert_eq!(
        stmt_text(&def),
        "def scale(values: list, factor: int = 2) -> list:\n    return [v * factor for v in values]\n"
    );
}

#[test]
fn decorated_function_with_empty_body_gets_pass() {
    let p = Pos::default();
    let mut def = build::function_def(p, "helper", vec![], vec![]);
    if let Stmt::FunctionDef { decorators, .. } = &mut def {
        decorators.push(build::name_ref(p, "staticmethod"));
    }
    assert_eq!(stmt_text(&def), "@staticmethod\ndef helper():\n    pass\n");
}

#[test]
fn class_with_base_and_method() {
    let p = Pos::default();
    let init = build::function_def(
        p,
        "__init__",
        vec![Param::plain(p, "self"), Param::plain(p, "x")],
        vec![build::assign1(
            p,
            build::attr(p, build::name_ref(p, "self"), "x"),
            build::name_ref(p, "x"),
        )],
    );
    let class = build::class_def(
        p,
        "Point",
        vec![CallArg::positional(p, build::name_ref(p, "Base"))],
        vec![init],
    );
    assert_eq!(
        stmt_text(&class),
        "class Point(Base):\n    def __init__(self, x):\n        self.x = x\n"
    );
}

#[test]
fn comment_only_class_body_keeps_the_comment_and_adds_pass() {
    let p = Pos::default();
    let class = build::class_def(p, "Placeholder", vec![], vec![build::comment(p, "soon")]);
    assert_eq!(stmt_text(&class), "class Placeholder:\n    # soon\n    pass\n");
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn try_except_else_finally() {
    let p = Pos::default();
    let call = |name: &str, args: Vec<Expr>| {
        build::expr_stmt(p, build::call_positional(p, build::name_ref(p, name), args))
    };
    let handler = ExceptHandler::new(
        p,
        Some(build::name_ref(p, "ValueError")),
        Some("err".to_owned()),
        vec![call("log", vec![build::name_ref(p, "err")])],
    );
    let stmt = build::try_stmt(
        p,
        vec![call("risky", vec![])],
        vec![handler],
        vec![call("ok", vec![])],
        vec![call("cleanup", vec![])],
    );
    assert_eq!(
        stmt_text(&stmt),
        "try:\n    risky()\nexcept ValueError as err:\n    log(err)\nelse:\n    ok()\nfinally:\n    cleanup()\n"
    );
}

#[test]
fn if_elif_else_chain() {
    let p = Pos::default();
    let call = |name: &str| {
        build::expr_stmt(p, build::call_positional(p, build::name_ref(p, name), vec![]))
    };
    let stmt = build::if_elif(
        p,
        build::name_ref(p, "a"),
        vec![call("first")],
        vec![Elif::new(p, build::name_ref(p, "b"), vec![call("second")])],
        vec![call("third")],
    );
    assert_eq!(
        stmt_text(&stmt),
        "if a:\n    first()\nelif b:\n    second()\nelse:\n    third()\n"
    );
}

#[test]
fn while_loop_with_yield_and_aug_assign() {
    let p = Pos::default();
    let body = vec![
        build::expr_stmt(
            p,
            Expr::Yield { pos: p, value: Some(Box::new(build::name_ref(p, "n"))) },
        ),
        Stmt::AugAssign {
            pos: p,
            target: build::name_ref(p, "n"),
            op: AugAssignOp::Sub,
            value: build::int_lit(p, 1),
        },
    ];
    let test = build::compare(p, build::name_ref(p, "n"), CompareOp::Gt, build::int_lit(p, 0));
    let def = build::function_def(
        p,
        "countdown",
        vec![Param::plain(p, "n")],
        vec![build::while_stmt(p, test, body)],
    );
    assert_eq!(
        stmt_text(&def),
        "def countdown(n):\n    while n > 0:\n        yield n\n        n -= 1\n"
    );
}

#[test]
fn with_statement_binds_its_context() {
    let p = Pos::default();
    let item = WithItem::new(
        p,
        build::call_positional(p, build::name_ref(p, "open"), vec![build::name_ref(p, "path")]),
        Some(build::name_ref(p, "f")),
    );
    let body = vec![build::assign1(
        p,
        build::name_ref(p, "data"),
        build::call_positional(
            p,
            build::attr(p, build::name_ref(p, "f"), "read"),
            vec![],
        ),
    )];
    let stmt = build::with_stmt(p, vec![item], body);
    assert_eq!(stmt_text(&stmt), "with open(path) as f:\n    data = f.read()\n");
}

#[test]
fn raise_with_cause() {
    let p = Pos::default();
    let stmt = Stmt::Raise {
        pos: p,
        exc: Some(build::call_positional(
            p,
            build::name_ref(p, "ValueError"),
            vec![build::str_lit(p, "bad")],
        )),
        cause: Some(build::name_ref(p, "err")),
    };
    assert_eq!(stmt_text(&stmt), "raise ValueError('bad') from err\n");
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn slices_glue_their_colons() {
    let p = Pos::default();
    let open_end = build::subscript(
        p,
        build::name_ref(p, "items"),
        Expr::Slice {
            pos: p,
            lower: Some(Box::new(build::int_lit(p, 1))),
            upper: None,
            step: None,
        },
    );
    assert_eq!(expr_text(&open_end), "items[1:]");

    let stepped = build::subscript(
        p,
        build::name_ref(p, "data"),
        Expr::Slice {
            pos: p,
            lower: None,
            upper: None,
            step: Some(Box::new(build::int_lit(p, 2))),
        },
    );
    assert_eq!(expr_text(&stepped), "data[::2]");
}

#[test]
fn call_chains_stay_flat() {
    let p = Pos::default();
    let cursor = build::call_positional(
        p,
        build::attr(p, build::name_ref(p, "conn"), "cursor"),
        vec![],
    );
    let execute = build::call_positional(
        p,
        build::attr(p, cursor, "execute"),
        vec![build::name_ref(p, "query")],
    );
    assert_eq!(expr_text(&execute), "conn.cursor().execute(query)");
}

#[test]
fn dict_display_with_mixed_quotes() {
    let p = Pos::default();
    let dict = Expr::Dict {
        pos: p,
        items: vec![
            pyemit::ast::DictItem::new(p, build::str_lit(p, "name"), build::str_lit(p, "it's")),
            pyemit::ast::DictItem::new(p, build::str_lit(p, "size"), build::int_lit(p, 10)),
        ],
    };
    assert_eq!(expr_text(&dict), "{'name': \"it's\", 'size': 10}");
}

#[test]
fn lambda_with_conditional_body() {
    let p = Pos::default();
    let cond = Expr::IfExp {
        pos: p,
        body: Box::new(build::name_ref(p, "x")),
        test: Box::new(build::compare(
            p,
            build::name_ref(p, "x"),
            CompareOp::Gt,
            build::int_lit(p, 0),
        )),
        orelse: Box::new(build::name_ref(p, "fallback")),
    };
    let stmt = build::assign1(
        p,
        build::name_ref(p, "pick"),
        build::lambda(p, vec![Param::plain(p, "x")], cond),
    );
    assert_eq!(stmt_text(&stmt), "pick = lambda x: x if x > 0 else fallback\n");
}

#[test]
fn negative_base_of_a_power_keeps_meaning() {
    let p = Pos::default();
    // -(x ** 2): unary binds looser, so the power stays bare.
    let negated = build::unary(
        p,
        UnaryOp::USub,
        build::bin(p, build::name_ref(p, "x"), BinaryOp::Pow, build::int_lit(p, 2)),
    );
    assert_eq!(expr_text(&negated), "-x ** 2");

    // (-x) ** 2 needs the parentheses back.
    let powered = build::bin(
        p,
        build::unary(p, UnaryOp::USub, build::name_ref(p, "x")),
        BinaryOp::Pow,
        build::int_lit(p, 2),
    );
    assert_eq!(expr_text(&powered), "(-x) ** 2");
}

#[test]
fn comprehension_with_condition() {
    let p = Pos::default();
    let comp = Expr::ListComp {
        pos: p,
        elt: Box::new(build::name_ref(p, "y")),
        generators: vec![Comprehension::new(
            p,
            build::name_ref(p, "y"),
            build::name_ref(p, "xs"),
            vec![build::compare(
                p,
                build::name_ref(p, "y"),
                CompareOp::Gt,
                build::int_lit(p, 0),
            )],
        )],
    };
    assert_eq!(expr_text(&comp), "[y for y in xs if y > 0]");
}

#[test]
fn lambda_in_call_arguments_stays_bare() {
    let p = Pos::default();
    let call = build::call_positional(
        p,
        build::name_ref(p, "f"),
        vec![
            build::lambda(p, vec![Param::plain(p, "x")], build::name_ref(p, "x")),
            build::name_ref(p, "y"),
        ],
    );
    assert_eq!(expr_text(&call), "f(lambda x: x, y)");
}

#[test]
fn tuple_subscripts_stay_bare() {
    let p = Pos::default();
    let sub = build::subscript(
        p,
        build::name_ref(p, "d"),
        build::tuple(p, vec![build::name_ref(p, "a"), build::name_ref(p, "b")]),
    );
    assert_eq!(expr_text(&sub), "d[a, b]");
}

// =============================================================================
// Whole programs
// =============================================================================

#[test]
fn import_statements_render_both_forms() {
    let p = Pos::default();
    let program = Program::new(
        p,
        vec![
            Stmt::Import {
                pos: p,
                aliases: vec![ImportAlias::new(p, "os.path", Some("osp".to_owned()))],
            },
            Stmt::ImportFrom {
                pos: p,
                module: DottedIdentifier::parse("typing"),
                aliases: vec![
                    ImportAlias::new(p, "Any", None),
                    ImportAlias::new(p, "Optional", None),
                ],
            },
        ],
        DependencyCategory::Production,
    );
    assert_eq!(
        program_to_source(&program),
        "import os.path as osp\nfrom typing import Any, Optional\n"
    );
}

#[test]
fn relative_imports_keep_the_space_after_from() {
    let p = Pos::default();
    let sibling = Stmt::ImportFrom {
        pos: p,
        module: DottedIdentifier::parse(".sibling"),
        aliases: vec![ImportAlias::new(p, "x", None)],
    };
    assert_eq!(stmt_text(&sibling), "from .sibling import x\n");

    let up_two = Stmt::ImportFrom {
        pos: p,
        module: DottedIdentifier::parse("..pkg.mod"),
        aliases: vec![ImportAlias::new(p, "y", None)],
    };
    assert_eq!(stmt_text(&up_two), "from ..pkg.mod import y\n");
}

#[test]
fn statements_compose_without_separators() {
    let p = Pos::default();
    let program = Program::new(
        p,
        vec![
            build::comment(p, "module state"),
            Stmt::Global { pos: p, names: vec!["counter".to_owned()] },
            Stmt::Delete {
                pos: p,
                targets: vec![build::subscript(
                    p,
                    build::name_ref(p, "cache"),
                    build::str_lit(p, "k"),
                )],
            },
        ],
        DependencyCategory::Production,
    );
    assert_eq!(
        program_to_source(&program),
        "# module state\nglobal counter\ndel cache['k']\n"
    );
}
