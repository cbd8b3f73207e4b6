#![doc = include_str!("../../../README.md")]
#![expect(
    clippy::missing_panics_doc,
    reason = "structural invariants panic at construction and carry their own # Panics sections where they matter"
)]

pub mod ast;

mod analysis;
mod dotted;
mod error;
mod format;
mod ident;
mod link;
mod module;
mod names;
mod op;
mod support;
mod template;
mod token;

pub use crate::{
    analysis::{gather_exports, gather_imports, import_bound_names},
    dotted::{Descent, DiPart, DottedIdentifier},
    error::EmitError,
    format::{program_to_source, render_expr, render_program, render_stmt},
    ident::{
        is_identifier, is_reserved, looks_exportable, pythonize, safe_identifier,
        safe_module_file_name, test_function_name, RESERVED_WORDS,
    },
    link::link_modules,
    module::{ImportNeed, PyModule},
    names::{ModuleId, NameInfo, NameKind, NameTable, PendingImport, Reach},
    op::{Assoc, AugAssignOp, BinaryOp, BoolOpKind, CompareOp, OpDef, UnaryOp},
    support::{
        runtime_pool, support_entry, InlineFactory, SupportBatch, SupportCode, SupportKind,
        RUNTIME_MODULE,
    },
    token::{py_string_token, SourceWriter, TokenAssoc, TokenKind, TokenSink},
};
