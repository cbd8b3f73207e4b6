//! Runtime-support code: the closed table of target-runtime primitives
//! the upstream translator can request, and the per-module request
//! batches drained at finalization.
//!
//! A support entry is either *inline* (a factory that expands to a tree
//! at the call site) or *separate* (a concrete module + name pair that
//! becomes an import). Entries compare and hash by base name alone, so
//! a request set never holds the same fragment twice.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use ahash::AHashMap;
use indexmap::IndexSet;

use crate::ast::{build, DependencyCategory, Expr, Pos};
use crate::dotted::DottedIdentifier;
use crate::op::BinaryOp;

/// Expands one inline support fragment into a tree. Arguments are
/// deep-copied into the result; the tree model owns children outright.
pub type InlineFactory = fn(Pos, &[Expr]) -> Expr;

/// The module holding the shared runtime-support declarations.
pub static RUNTIME_MODULE: LazyLock<DottedIdentifier> =
    LazyLock::new(|| DottedIdentifier::parse("pyemit_runtime.core"));

/// How a support entry materializes in output.
#[derive(Clone)]
pub enum SupportKind {
    /// Expanded in place by a tree-producing factory of fixed arity.
    Inline { arity: usize, factory: InlineFactory },
    /// Imported from a concrete module under a concrete name.
    Separate {
        module: DottedIdentifier,
        name: &'static str,
    },
}

/// One entry of the support table. Identity is the base name.
#[derive(Clone)]
pub struct SupportCode {
    base_name: &'static str,
    kind: SupportKind,
}

impl SupportCode {
    #[must_use]
    pub fn base_name(&self) -> &'static str {
        self.base_name
    }

    #[must_use]
    pub fn kind(&self) -> &SupportKind {
        &self.kind
    }

    /// The module this entry must be imported from, or `None` when it
    /// expands inline.
    #[must_use]
    pub fn import_source(&self) -> Option<(&DottedIdentifier, &'static str)> {
        match &self.kind {
            SupportKind::Inline { .. } => None,
            SupportKind::Separate { module, name } => Some((module, *name)),
        }
    }

    /// Expands the entry at a call site. Inline entries run their
    /// factory; separate entries become a bare name reference (the
    /// import is the caller's bookkeeping). An inline arity mismatch
    /// degrades to a diagnostic placeholder instead of failing the
    /// whole module.
    #[must_use]
    pub fn expand(&self, pos: Pos, args: &[Expr]) -> Expr {
        match &self.kind {
            SupportKind::Inline { arity, factory } => {
                if args.len() == *arity {
                    factory(pos, args)
                } else {
                    build::garbage_expr(
                        pos,
                        self.base_name,
                        Some(&format!("expected {arity} arguments, got {}", args.len())),
                    )
                }
            }
            SupportKind::Separate { name, .. } => {
                if args.is_empty() {
                    build::name_ref(pos, *name)
                } else {
                    build::call_positional(pos, build::name_ref(pos, *name), args.to_vec())
                }
            }
        }
    }
}

impl fmt::Debug for SupportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupportCode").field("base_name", &self.base_name).finish()
    }
}

impl PartialEq for SupportCode {
    fn eq(&self, other: &Self) -> bool {
        self.base_name == other.base_name
    }
}

impl Eq for SupportCode {}

impl Hash for SupportCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base_name.hash(state);
    }
}

// ---- the entry table ---------------------------------------------------

fn inline(base_name: &'static str, arity: usize, factory: InlineFactory) -> SupportCode {
    SupportCode { base_name, kind: SupportKind::Inline { arity, factory } }
}

fn separate(base_name: &'static str, module: &str, name: &'static str) -> SupportCode {
    SupportCode {
        base_name,
        kind: SupportKind::Separate { module: DottedIdentifier::parse(module), name },
    }
}

fn call_builtin(pos: Pos, name: &str, arg: &Expr) -> Expr {
    build::call_positional(pos, build::name_ref(pos, name), vec![arg.clone()])
}

static SUPPORT_TABLE: LazyLock<AHashMap<&'static str, SupportCode>> = LazyLock::new(|| {
    let runtime = RUNTIME_MODULE.to_string();
    let entries = vec![
        // Arithmetic and string primitives expand inline.
        inline("float_div", 2, |pos, args| {
            build::bin(pos, args[0].clone(), BinaryOp::Div, args[1].clone())
        }),
        inline("int_div", 2, |pos, args| {
            build::bin(pos, args[0].clone(), BinaryOp::FloorDiv, args[1].clone())
        }),
        inline("int_mod", 2, |pos, args| {
            build::bin(pos, args[0].clone(), BinaryOp::Mod, args[1].clone())
        }),
        inline("pow", 2, |pos, args| {
            build::bin(pos, args[0].clone(), BinaryOp::Pow, args[1].clone())
        }),
        inline("str_cat", 2, |pos, args| {
            build::bin(pos, args[0].clone(), BinaryOp::Add, args[1].clone())
        }),
        inline("bool_not", 1, |_pos, args| build::boolean_negate(args[0].clone())),
        inline("len", 1, |pos, args| call_builtin(pos, "len", &args[0])),
        inline("to_string", 1, |pos, args| call_builtin(pos, "str", &args[0])),
        inline("to_int", 1, |pos, args| call_builtin(pos, "int", &args[0])),
        inline("to_float", 1, |pos, args| call_builtin(pos, "float", &args[0])),
        inline("truthy", 1, |pos, args| call_builtin(pos, "bool", &args[0])),
        inline("str_index", 2, |pos, args| {
            build::subscript(pos, args[0].clone(), args[1].clone())
        }),
        // Typing names come from the standard library.
        separate("any_type", "typing", "Any"),
        separate("callable_type", "typing", "Callable"),
        separate("optional_type", "typing", "Optional"),
        separate("sequence_type", "typing", "Sequence"),
        separate("mapping_type", "typing", "Mapping"),
        separate("type_var", "typing", "TypeVar"),
        separate("generic_type", "typing", "Generic"),
        separate("math_sqrt", "math", "sqrt"),
        separate("math_floor", "math", "floor"),
        separate("math_ceil", "math", "ceil"),
        separate("math_isnan", "math", "isnan"),
        separate("math_inf", "math", "inf"),
        separate("math_nan", "math", "nan"),
        separate("abstract_base", "abc", "ABC"),
        separate("abstract_method", "abc", "abstractmethod"),
        separate("date_type", "datetime", "date"),
        separate("datetime_type", "datetime", "datetime"),
        separate("timezone_utc", "datetime", "timezone"),
        separate("regex_compile", "re", "compile"),
        // Everything the standard library cannot supply lives in the
        // shared runtime module.
        separate("generic_eq", &runtime, "generic_eq"),
        separate("generic_cmp", &runtime, "generic_cmp"),
        separate("list_builder", &runtime, "ListBuilder"),
        separate("string_slice", &runtime, "string_slice"),
        separate("code_points", &runtime, "code_points"),
        separate("require_index", &runtime, "require_index"),
        separate("cast_by_type", &runtime, "cast_by_type"),
        separate("async_run", &runtime, "async_run"),
    ];
    entries.into_iter().map(|e| (e.base_name, e)).collect()
});

/// Looks up a support entry by base name.
#[must_use]
pub fn support_entry(base_name: &str) -> Option<&'static SupportCode> {
    SUPPORT_TABLE.get(base_name)
}

/// All separate entries backed by the shared runtime module, keyed by
/// the name they export. The linker resolves leftover free names
/// against this pool.
#[must_use]
pub fn runtime_pool() -> AHashMap<&'static str, &'static SupportCode> {
    SUPPORT_TABLE
        .values()
        .filter_map(|entry| match &entry.kind {
            SupportKind::Separate { module, name } if *module == *RUNTIME_MODULE => {
                Some((*name, entry))
            }
            _ => None,
        })
        .collect()
}

// ---- per-module request batches ------------------------------------------

/// The mutable support-code request set of one module, split between
/// production and test dependencies. Drained exactly once when the
/// module is finalized; draining again yields nothing.
#[derive(Debug, Default)]
pub struct SupportBatch {
    production: IndexSet<SupportCode>,
    test: IndexSet<SupportCode>,
}

impl SupportBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one request. Duplicate base names collapse.
    pub fn request(&mut self, code: SupportCode, category: DependencyCategory) {
        match category {
            DependencyCategory::Production => self.production.insert(code),
            DependencyCategory::Test => self.test.insert(code),
        };
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.test.is_empty()
    }

    /// Removes and returns the requests of one category, in request
    /// order.
    pub fn drain(&mut self, category: DependencyCategory) -> Vec<SupportCode> {
        let set = match category {
            DependencyCategory::Production => &mut self.production,
            DependencyCategory::Test => &mut self.test,
        };
        std::mem::take(set).into_iter().collect()
    }
}
