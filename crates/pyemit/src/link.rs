//! Cross-module linking: turning every module's free names into
//! concrete import statements.
//!
//! Exported names map to their owning module (imports never count as
//! exports, so nothing re-exports transitively). A free name resolves
//! against that map, then against the shared runtime-support pool, and
//! otherwise becomes a diagnostic placeholder statement. The reference
//! is never silently dropped.

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;

use crate::analysis::import_bound_names;
use crate::ast::{build, ImportAlias, Stmt};
use crate::dotted::DottedIdentifier;
use crate::error::EmitError;
use crate::module::{ImportNeed, PyModule};
use crate::names::NameTable;
use crate::support::{runtime_pool, RUNTIME_MODULE};

/// Links a whole program: analyzes every module, finalizes its deferred
/// requests, resolves its free names, and splices the synthesized
/// import statements at the top of each module's tree.
pub fn link_modules(modules: &mut [PyModule], names: &mut NameTable) -> Result<(), EmitError> {
    for module in modules.iter_mut() {
        module.analyze()?;
    }

    // Exported-name to owning module. First exporter wins; a name
    // merely bound by an import statement never provides.
    let mut providers: AHashMap<String, DottedIdentifier> = AHashMap::new();
    for module in modules.iter() {
        let import_bound = import_bound_names(module.program()?);
        for export in &module.exports {
            if export.contains('.') || import_bound.contains(export) {
                continue;
            }
            providers.entry(export.clone()).or_insert_with(|| module.name.clone());
        }
    }

    for module in modules.iter_mut() {
        let context = format!("module {}", module.name);
        link_one(module, &providers, names).map_err(|e| e.context(context))?;
    }
    Ok(())
}

fn link_one(
    module: &mut PyModule,
    providers: &AHashMap<String, DottedIdentifier>,
    names: &mut NameTable,
) -> Result<(), EmitError> {
    let mut needs = module.finalize(names)?;
    let mut unresolved = Vec::new();
    let pool = runtime_pool();

    // Finalized support requests already satisfy some free names.
    let satisfied: AHashSet<String> = needs.iter().map(|n| n.name.clone()).collect();

    for name in module.imports.clone() {
        if module.exports.contains(&name) || satisfied.contains(&name) {
            continue;
        }
        if let Some(from) = providers.get(&name) {
            if *from != module.name {
                needs.push(ImportNeed { from: from.clone(), name });
            }
        } else if pool.contains_key(name.as_str()) {
            needs.push(ImportNeed { from: RUNTIME_MODULE.clone(), name });
        } else {
            unresolved.push(name);
        }
    }

    // De-duplicate against imports the translator already wrote, by the
    // simple names they bind.
    let already: AHashSet<String> = import_bound_names(module.program()?);
    let mut grouped: IndexMap<DottedIdentifier, IndexMap<String, Option<String>>> =
        IndexMap::new();
    for need in needs {
        if already.contains(&need.name) {
            continue;
        }
        grouped.entry(need.from).or_default().entry(need.name).or_insert(None);
    }

    for name_map in grouped.values() {
        for name in name_map.keys() {
            if names.get(module.id, name).is_some() {
                names.resolve_import(module.id, name, name)?;
            }
        }
    }

    let program = module.program_mut()?;
    let pos = program.pos;
    let mut prefix: Vec<Stmt> = Vec::new();
    for (from, name_map) in grouped {
        let aliases = name_map
            .into_iter()
            .map(|(name, asname)| ImportAlias::new(pos, name, asname))
            .collect();
        prefix.push(Stmt::ImportFrom { pos, module: from, aliases });
    }
    for name in unresolved {
        prefix.push(build::garbage_stmt(
            pos,
            "link_modules",
            Some(&format!("Can't find import for {name}")),
        ));
    }
    if !prefix.is_empty() {
        prefix.append(&mut program.body);
        program.body = prefix;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::ast::{DependencyCategory, Param, Pos, Program};
    use crate::format::program_to_source;
    use crate::names::ModuleId;

    use super::*;

    fn make_module(index: u32, name: &str, body: Vec<Stmt>) -> PyModule {
        let mut module = PyModule::new(ModuleId::new(index), DottedIdentifier::parse(name));
        module.set_program(Program::new(
            Pos::default(),
            body,
            DependencyCategory::Production,
        ));
        module
    }

    #[test]
    fn links_a_free_name_to_its_exporter() {
        let p = Pos::default();
        let helper = build::function_def(
            p,
            "helper",
            vec![],
            vec![build::return_stmt(p, Some(build::int_lit(p, 1)))],
        );
        let user = build::function_def(
            p,
            "use_it",
            vec![],
            vec![build::return_stmt(
                p,
                Some(build::call_positional(p, build::name_ref(p, "helper"), vec![])),
            )],
        );
        let mut modules = vec![
            make_module(0, "lib", vec![helper]),
            make_module(1, "app", vec![user]),
        ];
        let mut names = NameTable::new();
        link_modules(&mut modules, &mut names).unwrap();

        let app = program_to_source(modules[1].program().unwrap());
        assert!(app.starts_with("from lib import helper\n"), "got:\n{app}");
        let lib = program_to_source(modules[0].program().unwrap());
        assert!(!lib.contains("import"), "exporter gains no import:\n{lib}");
    }

    #[test]
    fn unresolved_names_become_placeholders_not_errors() {
        let p = Pos::default();
        let user = build::expr_stmt(
            p,
            build::call_positional(p, build::name_ref(p, "missing_thing"), vec![]),
        );
        let mut modules = vec![make_module(0, "app", vec![user])];
        let mut names = NameTable::new();
        link_modules(&mut modules, &mut names).unwrap();

        let out = program_to_source(modules[0].program().unwrap());
        assert!(
            out.contains("Can't find import for missing_thing"),
            "got:\n{out}"
        );
    }

    #[test]
    fn runtime_pool_names_import_from_the_runtime_module() {
        let p = Pos::default();
        let user = build::expr_stmt(
            p,
            build::call_positional(
                p,
                build::name_ref(p, "generic_eq"),
                vec![build::int_lit(p, 1), build::int_lit(p, 2)],
            ),
        );
        let mut modules = vec![make_module(0, "app", vec![user])];
        let mut names = NameTable::new();
        link_modules(&mut modules, &mut names).unwrap();

        let out = program_to_source(modules[0].program().unwrap());
        assert!(
            out.starts_with("from pyemit_runtime.core import generic_eq\n"),
            "got:\n{out}"
        );
    }

    #[test]
    fn existing_imports_are_preserved_and_not_duplicated() {
        let p = Pos::default();
        let existing = Stmt::ImportFrom {
            pos: p,
            module: DottedIdentifier::parse("lib"),
            aliases: vec![ImportAlias::new(p, "helper", None)],
        };
        let use_it = build::expr_stmt(
            p,
            build::call_positional(p, build::name_ref(p, "helper"), vec![]),
        );
        let helper = build::function_def(
            p,
            "helper",
            vec![Param::plain(p, "x")],
            vec![build::return_stmt(p, Some(build::name_ref(p, "x")))],
        );
        let mut modules = vec![
            make_module(0, "lib", vec![helper]),
            make_module(1, "app", vec![existing, use_it]),
        ];
        let mut names = NameTable::new();
        link_modules(&mut modules, &mut names).unwrap();

        let out = program_to_source(modules[1].program().unwrap());
        assert_eq!(out.matches("import").count(), 1, "got:\n{out}");
    }
}
