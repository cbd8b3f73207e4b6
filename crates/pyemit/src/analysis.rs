//! Export-surface and free-variable analysis over a finished tree.
//!
//! Exports are the module-level bindings an importer can see. Imports
//! are computed by free-variable analysis: two passes per scope, the
//! first collecting every name bound anywhere in the scope, the second
//! collecting bare-name uses not covered by the accumulated exclusion
//! set. Binding collection is deliberately order-insensitive, matching
//! Python's scope-wide assignment semantics; tracking bindings
//! per-statement-order would only produce false positives on forward
//! references.

use ahash::AHashSet;
use indexmap::IndexSet;

use crate::ast::{CallArg, Comprehension, Expr, Param, Program, Stmt};
use crate::ident::looks_exportable;

/// True when a module-level binding with this output text belongs in the
/// export surface. The leading underscore is the privacy marker, which
/// also hides every synthesized temporary.
fn is_export_name(name: &str) -> bool {
    looks_exportable(name) && !name.starts_with('_')
}

/// Computes the module's export surface: every exportable module-level
/// binding, plus class members qualified by their (exportable) class
/// name, recursively.
#[must_use]
pub fn gather_exports(program: &Program) -> IndexSet<String> {
    let mut exports = IndexSet::new();
    gather_block_exports(&program.body, None, &mut exports);
    exports
}

/// The simple names bound by `import`/`from-import` statements at the
/// top level. The linker subtracts these from the export surface so a
/// module never re-exports what it merely imported, and de-duplicates
/// synthesized imports against them.
#[must_use]
pub fn import_bound_names(program: &Program) -> AHashSet<String> {
    let mut bound = AHashSet::new();
    for stmt in &program.body {
        match stmt {
            Stmt::Import { aliases, .. } | Stmt::ImportFrom { aliases, .. } => {
                for alias in aliases {
                    bound.insert(alias.bound_name().to_owned());
                }
            }
            _ => {}
        }
    }
    bound
}

fn gather_block_exports(block: &[Stmt], qualifier: Option<&str>, exports: &mut IndexSet<String>) {
    let qualify = |name: &str| match qualifier {
        Some(outer) => format!("{outer}.{name}"),
        None => name.to_owned(),
    };
    for stmt in block {
        match stmt {
            Stmt::FunctionDef { name, .. } => {
                if is_export_name(name) {
                    exports.insert(qualify(name));
                }
            }
            Stmt::ClassDef { name, body, .. } => {
                if is_export_name(name) {
                    let qualified = qualify(name);
                    gather_block_exports(body, Some(&qualified), exports);
                    exports.insert(qualified);
                }
            }
            Stmt::Assign { targets, .. } | Stmt::Delete { targets, .. } => {
                let mut names = Vec::new();
                for target in targets {
                    binding_names(target, &mut names);
                }
                for name in names {
                    if is_export_name(&name) {
                        exports.insert(qualify(&name));
                    }
                }
            }
            Stmt::AnnAssign { target, .. } => {
                let mut names = Vec::new();
                binding_names(target, &mut names);
                for name in names {
                    if is_export_name(&name) {
                        exports.insert(qualify(&name));
                    }
                }
            }
            Stmt::Import { aliases, .. } | Stmt::ImportFrom { aliases, .. } => {
                for alias in aliases {
                    let bound = alias.bound_name();
                    if is_export_name(bound) {
                        exports.insert(qualify(bound));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Computes the module's import surface: every bare-name use not bound
/// anywhere in its enclosing scope, in first-use order.
#[must_use]
pub fn gather_imports(program: &Program) -> IndexSet<String> {
    let mut scope = AHashSet::new();
    for stmt in &program.body {
        collect_stmt_bindings(stmt, &mut scope);
    }
    let mut free = IndexSet::new();
    for stmt in &program.body {
        stmt_uses(stmt, &scope, &mut free);
    }
    free
}

/// Simple names a binding-position expression introduces. Attribute and
/// subscript targets mutate an existing object and bind nothing.
fn binding_names(target: &Expr, out: &mut Vec<String>) {
    match target {
        Expr::Name { id, .. } => out.push(id.clone()),
        Expr::Tuple { elts, .. } | Expr::List { elts, .. } => {
            for elt in elts {
                binding_names(elt, out);
            }
        }
        Expr::Starred { value, .. } => binding_names(value, out),
        _ => {}
    }
}

fn bind_target(target: &Expr, scope: &mut AHashSet<String>) {
    let mut names = Vec::new();
    binding_names(target, &mut names);
    scope.extend(names);
}

/// Pass one: every name the statement binds in the current scope.
/// Recurses through control-flow bodies (same scope) but stops at
/// function and class bodies (new scopes), keeping only their names.
fn collect_stmt_bindings(stmt: &Stmt, scope: &mut AHashSet<String>) {
    match stmt {
        Stmt::FunctionDef { name, .. } | Stmt::ClassDef { name, .. } => {
            scope.insert(name.clone());
        }
        Stmt::Assign { targets, .. } | Stmt::Delete { targets, .. } => {
            for target in targets {
                bind_target(target, scope);
            }
        }
        Stmt::AugAssign { target, .. } | Stmt::AnnAssign { target, .. } => {
            bind_target(target, scope);
        }
        Stmt::For { target, body, orelse, .. } => {
            bind_target(target, scope);
            collect_block_bindings(body, scope);
            collect_block_bindings(orelse, scope);
        }
        Stmt::While { body, orelse, .. } => {
            collect_block_bindings(body, scope);
            collect_block_bindings(orelse, scope);
        }
        Stmt::If { body, elifs, orelse, .. } => {
            collect_block_bindings(body, scope);
            for elif in elifs {
                collect_block_bindings(&elif.body, scope);
            }
            collect_block_bindings(orelse, scope);
        }
        Stmt::With { items, body, .. } => {
            for item in items {
                if let Some(binding) = &item.binding {
                    bind_target(binding, scope);
                }
            }
            collect_block_bindings(body, scope);
        }
        Stmt::Try { body, handlers, orelse, finalbody, .. } => {
            collect_block_bindings(body, scope);
            for handler in handlers {
                if let Some(name) = &handler.name {
                    scope.insert(name.clone());
                }
                collect_block_bindings(&handler.body, scope);
            }
            collect_block_bindings(orelse, scope);
            collect_block_bindings(finalbody, scope);
        }
        Stmt::Global { names, .. } | Stmt::Nonlocal { names, .. } => {
            scope.extend(names.iter().cloned());
        }
        Stmt::Import { aliases, .. } | Stmt::ImportFrom { aliases, .. } => {
            for alias in aliases {
                scope.insert(alias.bound_name().to_owned());
            }
        }
        Stmt::Return { .. }
        | Stmt::Assert { .. }
        | Stmt::Raise { .. }
        | Stmt::ExprStmt { .. }
        | Stmt::Pass { .. }
        | Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::Comment { .. } => {}
    }
}

fn collect_block_bindings(block: &[Stmt], scope: &mut AHashSet<String>) {
    for stmt in block {
        collect_stmt_bindings(stmt, scope);
    }
}

/// Pass two over a block that shares the current scope.
fn block_uses(block: &[Stmt], scope: &AHashSet<String>, free: &mut IndexSet<String>) {
    for stmt in block {
        stmt_uses(stmt, scope, free);
    }
}

fn opt_expr_uses(value: Option<&Expr>, scope: &AHashSet<String>, free: &mut IndexSet<String>) {
    if let Some(value) = value {
        expr_uses(value, scope, free);
    }
}

/// Uses inside an assignment target: the bound names themselves are not
/// uses, but an attribute or subscript target evaluates its base.
fn target_uses(target: &Expr, scope: &AHashSet<String>, free: &mut IndexSet<String>) {
    match target {
        Expr::Name { .. } => {}
        Expr::Tuple { elts, .. } | Expr::List { elts, .. } => {
            for elt in elts {
                target_uses(elt, scope, free);
            }
        }
        Expr::Starred { value, .. } => target_uses(value, scope, free),
        Expr::Attribute { value, .. } => expr_uses(value, scope, free),
        Expr::Subscript { value, index, .. } => {
            expr_uses(value, scope, free);
            expr_uses(index, scope, free);
        }
        other => expr_uses(other, scope, free),
    }
}

fn stmt_uses(stmt: &Stmt, scope: &AHashSet<String>, free: &mut IndexSet<String>) {
    match stmt {
        Stmt::FunctionDef { decorators, params, returns, body, .. } => {
            // Decorators, defaults, and annotations evaluate in the
            // enclosing scope before the function scope exists.
            for dec in decorators {
                expr_uses(dec, scope, free);
            }
            for param in params {
                opt_expr_uses(param.annotation.as_ref(), scope, free);
                opt_expr_uses(param.default.as_ref(), scope, free);
            }
            opt_expr_uses(returns.as_ref(), scope, free);
            let mut inner = scope.clone();
            for param in params {
                inner.insert(param.name.clone());
            }
            collect_block_bindings(body, &mut inner);
            block_uses(body, &inner, free);
        }
        Stmt::ClassDef { decorators, bases, body, .. } => {
            for dec in decorators {
                expr_uses(dec, scope, free);
            }
            for base in bases {
                expr_uses(&base.value, scope, free);
            }
            let mut inner = scope.clone();
            collect_block_bindings(body, &mut inner);
            block_uses(body, &inner, free);
        }
        Stmt::Return { value, .. } => opt_expr_uses(value.as_ref(), scope, free),
        Stmt::Assign { targets, value, .. } => {
            for target in targets {
                target_uses(target, scope, free);
            }
            expr_uses(value, scope, free);
        }
        Stmt::AugAssign { target, value, .. } => {
            target_uses(target, scope, free);
            expr_uses(value, scope, free);
        }
        Stmt::AnnAssign { target, annotation, value, .. } => {
            target_uses(target, scope, free);
            expr_uses(annotation, scope, free);
            opt_expr_uses(value.as_ref(), scope, free);
        }
        Stmt::Delete { targets, .. } => {
            for target in targets {
                target_uses(target, scope, free);
            }
        }
        Stmt::For { target, iter, body, orelse, .. } => {
            target_uses(target, scope, free);
            expr_uses(iter, scope, free);
            block_uses(body, scope, free);
            block_uses(orelse, scope, free);
        }
        Stmt::While { test, body, orelse, .. } => {
            expr_uses(test, scope, free);
            block_uses(body, scope, free);
            block_uses(orelse, scope, free);
        }
        Stmt::If { test, body, elifs, orelse, .. } => {
            expr_uses(test, scope, free);
            block_uses(body, scope, free);
            for elif in elifs {
                expr_uses(&elif.test, scope, free);
                block_uses(&elif.body, scope, free);
            }
            block_uses(orelse, scope, free);
        }
        Stmt::With { items, body, .. } => {
            for item in items {
                expr_uses(&item.context, scope, free);
                if let Some(binding) = &item.binding {
                    target_uses(binding, scope, free);
                }
            }
            block_uses(body, scope, free);
        }
        Stmt::Try { body, handlers, orelse, finalbody, .. } => {
            block_uses(body, scope, free);
            for handler in handlers {
                opt_expr_uses(handler.typ.as_ref(), scope, free);
                block_uses(&handler.body, scope, free);
            }
            block_uses(orelse, scope, free);
            block_uses(finalbody, scope, free);
        }
        Stmt::Assert { test, msg, .. } => {
            expr_uses(test, scope, free);
            opt_expr_uses(msg.as_ref(), scope, free);
        }
        Stmt::Raise { exc, cause, .. } => {
            opt_expr_uses(exc.as_ref(), scope, free);
            opt_expr_uses(cause.as_ref(), scope, free);
        }
        Stmt::ExprStmt { value, .. } => expr_uses(value, scope, free),
        Stmt::Global { .. }
        | Stmt::Nonlocal { .. }
        | Stmt::Pass { .. }
        | Stmt::Break { .. }
        | Stmt::Continue { .. }
        | Stmt::Comment { .. }
        | Stmt::Import { .. }
        | Stmt::ImportFrom { .. } => {}
    }
}

fn call_arg_uses(args: &[CallArg], scope: &AHashSet<String>, free: &mut IndexSet<String>) {
    for arg in args {
        expr_uses(&arg.value, scope, free);
    }
}

fn param_scope_uses(
    params: &[Param],
    body: &Expr,
    scope: &AHashSet<String>,
    free: &mut IndexSet<String>,
) {
    for param in params {
        opt_expr_uses(param.annotation.as_ref(), scope, free);
        opt_expr_uses(param.default.as_ref(), scope, free);
    }
    let mut inner = scope.clone();
    for param in params {
        inner.insert(param.name.clone());
    }
    expr_uses(body, &inner, free);
}

/// Comprehension clauses bind their targets for every later clause and
/// the element expression, but the first iterable evaluates before any
/// target exists. The scope is threaded as an augmented copy so the
/// targets never leak into the enclosing scope.
fn comprehension_uses<'a>(
    generators: &[Comprehension],
    elements: impl IntoIterator<Item = &'a Expr>,
    scope: &AHashSet<String>,
    free: &mut IndexSet<String>,
) {
    let mut inner = scope.clone();
    for generator in generators {
        expr_uses(&generator.iter, &inner, free);
        bind_target(&generator.target, &mut inner);
        for cond in &generator.ifs {
            expr_uses(cond, &inner, free);
        }
    }
    for element in elements {
        expr_uses(element, &inner, free);
    }
}

fn expr_uses(expr: &Expr, scope: &AHashSet<String>, free: &mut IndexSet<String>) {
    match expr {
        Expr::Name { id, .. } => {
            if looks_exportable(id) && !scope.contains(id) {
                free.insert(id.clone());
            }
        }
        Expr::Num { .. } | Expr::Str { .. } | Expr::Constant { .. } => {}
        Expr::Tuple { elts, .. } | Expr::List { elts, .. } | Expr::Set { elts, .. } => {
            for elt in elts {
                expr_uses(elt, scope, free);
            }
        }
        Expr::Dict { items, .. } => {
            for item in items {
                expr_uses(&item.key, scope, free);
                expr_uses(&item.value, scope, free);
            }
        }
        Expr::ListComp { elt, generators, .. }
        | Expr::SetComp { elt, generators, .. }
        | Expr::GeneratorExp { elt, generators, .. } => {
            comprehension_uses(generators, [elt.as_ref()], scope, free);
        }
        Expr::DictComp { key, value, generators, .. } => {
            comprehension_uses(generators, [key.as_ref(), value.as_ref()], scope, free);
        }
        Expr::BoolOp { left, right, .. }
        | Expr::BinOp { left, right, .. }
        | Expr::Compare { left, right, .. } => {
            expr_uses(left, scope, free);
            expr_uses(right, scope, free);
        }
        Expr::UnaryOp { operand, .. } => expr_uses(operand, scope, free),
        Expr::IfExp { body, test, orelse, .. } => {
            expr_uses(body, scope, free);
            expr_uses(test, scope, free);
            expr_uses(orelse, scope, free);
        }
        Expr::Lambda { params, body, .. } => param_scope_uses(params, body, scope, free),
        Expr::Await { value, .. }
        | Expr::YieldFrom { value, .. }
        | Expr::Starred { value, .. } => expr_uses(value, scope, free),
        Expr::Yield { value, .. } => opt_expr_uses(value.as_deref(), scope, free),
        Expr::Call { func, args, .. } => {
            expr_uses(func, scope, free);
            call_arg_uses(args, scope, free);
        }
        Expr::Attribute { value, .. } => expr_uses(value, scope, free),
        Expr::Subscript { value, index, .. } => {
            expr_uses(value, scope, free);
            expr_uses(index, scope, free);
        }
        Expr::Slice { lower, upper, step, .. } => {
            opt_expr_uses(lower.as_deref(), scope, free);
            opt_expr_uses(upper.as_deref(), scope, free);
            opt_expr_uses(step.as_deref(), scope, free);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{build, DependencyCategory, Pos, Program};
    use crate::op::CompareOp;

    use super::*;

    fn module(body: Vec<Stmt>) -> Program {
        Program::new(Pos::default(), body, DependencyCategory::Production)
    }

    #[test]
    fn function_def_exports_its_name_and_imports_nothing() {
        let p = Pos::default();
        let body = vec![build::return_stmt(
            p,
            Some(build::bin(
                p,
                build::name_ref(p, "n"),
                crate::op::BinaryOp::Add,
                build::int_lit(p, 1),
            )),
        )];
        let def = build::function_def(
            p,
            "add_one",
            vec![crate::ast::Param::plain(p, "n")],
            body,
        );
        let program = module(vec![def]);
        let exports = gather_exports(&program);
        assert_eq!(exports.iter().collect::<Vec<_>>(), ["add_one"]);
        assert!(gather_imports(&program).is_empty());
    }

    #[test]
    fn comprehension_targets_shadow_but_iterables_are_free() {
        // [y for y in xs if y > 0] imports xs, never y.
        let p = Pos::default();
        let comp = Expr::ListComp {
            pos: p,
            elt: Box::new(build::name_ref(p, "y")),
            generators: vec![crate::ast::Comprehension::new(
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
        let program = module(vec![build::expr_stmt(p, comp)]);
        let imports = gather_imports(&program);
        assert_eq!(imports.iter().collect::<Vec<_>>(), ["xs"]);
    }

    #[test]
    fn private_assignments_never_export() {
        let p = Pos::default();
        let program = module(vec![
            build::assign1(p, build::name_ref(p, "_cache"), Expr::Dict { pos: p, items: vec![] }),
            build::assign1(p, build::name_ref(p, "limit"), build::int_lit(p, 10)),
        ]);
        let exports = gather_exports(&program);
        assert_eq!(exports.iter().collect::<Vec<_>>(), ["limit"]);
    }

    #[test]
    fn nested_classes_export_qualified_members() {
        let p = Pos::default();
        let inner = build::class_def(p, "Inner", vec![], vec![]);
        let hidden = build::class_def(p, "_Hidden", vec![], vec![]);
        let outer = build::class_def(p, "Outer", vec![], vec![inner, hidden]);
        let exports = gather_exports(&module(vec![outer]));
        assert_eq!(exports.iter().collect::<Vec<_>>(), ["Outer.Inner", "Outer"]);
    }

    #[test]
    fn decorators_and_bases_use_the_enclosing_scope() {
        let p = Pos::default();
        let mut def = build::class_def(
            p,
            "Widget",
            vec![CallArg::positional(p, build::name_ref(p, "Base"))],
            vec![],
        );
        if let Stmt::ClassDef { decorators, .. } = &mut def {
            decorators.push(build::name_ref(p, "register"));
        }
        let imports = gather_imports(&module(vec![def]));
        assert_eq!(imports.iter().collect::<Vec<_>>(), ["register", "Base"]);
    }

    #[test]
    fn bound_names_are_excluded_across_forward_references() {
        // Assignment later in the module still shadows an earlier use.
        let p = Pos::default();
        let program = module(vec![
            build::expr_stmt(
                p,
                build::call_positional(p, build::name_ref(p, "helper"), vec![]),
            ),
            build::assign1(p, build::name_ref(p, "helper"), build::name_ref(p, "thing")),
        ]);
        let imports = gather_imports(&program);
        assert_eq!(imports.iter().collect::<Vec<_>>(), ["thing"]);
    }

    #[test]
    fn with_and_except_bindings_count() {
        let p = Pos::default();
        let handler = crate::ast::ExceptHandler::new(
            p,
            Some(build::name_ref(p, "ValueError")),
            Some("err".to_owned()),
            vec![build::expr_stmt(p, build::name_ref(p, "err"))],
        );
        let program = module(vec![Stmt::Try {
            pos: p,
            body: vec![build::expr_stmt(p, build::name_ref(p, "risky"))],
            handlers: vec![handler],
            orelse: vec![],
            finalbody: vec![],
        }]);
        let imports = gather_imports(&program);
        assert_eq!(imports.iter().collect::<Vec<_>>(), ["risky", "ValueError"]);
    }

    #[test]
    fn import_aliases_bind_and_are_tracked() {
        let p = Pos::default();
        let program = module(vec![
            Stmt::Import {
                pos: p,
                aliases: vec![crate::ast::ImportAlias::new(p, "os.path", None)],
            },
            build::expr_stmt(
                p,
                build::attr(p, build::name_ref(p, "os"), "sep"),
            ),
        ]);
        assert!(gather_imports(&program).is_empty());
        assert!(import_bound_names(&program).contains("os"));
    }
}
