//! The unit of translation: one finished program plus its analysis
//! results and support-code requests.
//!
//! A module is created when the upstream translator finishes one
//! logical compilation unit, analyzed to compute its export and import
//! surfaces, finalized once to drain its deferred requests, and then
//! linked and rendered. It is never destroyed once emitted.

use indexmap::IndexSet;

use crate::analysis::{gather_exports, gather_imports};
use crate::ast::{DependencyCategory, Program};
use crate::dotted::DottedIdentifier;
use crate::error::EmitError;
use crate::names::{ModuleId, NameTable};
use crate::support::{SupportBatch, SupportKind};

/// One import requirement synthesized at finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNeed {
    pub from: DottedIdentifier,
    pub name: String,
}

/// One translated module.
#[derive(Debug)]
pub struct PyModule {
    pub id: ModuleId,
    pub name: DottedIdentifier,
    program: Option<Program>,
    /// Exportable module-level bindings, filled by [`PyModule::analyze`].
    pub exports: IndexSet<String>,
    /// Free names needing an import, filled by [`PyModule::analyze`].
    pub imports: IndexSet<String>,
    /// Support-code requests accumulated during translation.
    pub support: SupportBatch,
}

impl PyModule {
    #[must_use]
    pub fn new(id: ModuleId, name: DottedIdentifier) -> Self {
        Self {
            id,
            name,
            program: None,
            exports: IndexSet::new(),
            imports: IndexSet::new(),
            support: SupportBatch::new(),
        }
    }

    /// Attaches the finished tree. The upstream translator calls this
    /// exactly once per module.
    pub fn set_program(&mut self, program: Program) {
        self.program = Some(program);
    }

    fn missing_program(name: &DottedIdentifier) -> EmitError {
        EmitError::new("module has no program").context(format!("module {name}"))
    }

    pub fn program(&self) -> Result<&Program, EmitError> {
        self.program.as_ref().ok_or_else(|| Self::missing_program(&self.name))
    }

    pub fn program_mut(&mut self) -> Result<&mut Program, EmitError> {
        let name = &self.name;
        self.program.as_mut().ok_or_else(|| Self::missing_program(name))
    }

    /// Whether this module belongs to the shipped package or the test
    /// suite. Defaults to production until a program is attached.
    #[must_use]
    pub fn category(&self) -> DependencyCategory {
        self.program
            .as_ref()
            .map_or(DependencyCategory::Production, |p| p.category)
    }

    /// Recomputes the export and import surfaces from the current tree.
    pub fn analyze(&mut self) -> Result<(), EmitError> {
        let program = self.program.as_ref().ok_or_else(|| Self::missing_program(&self.name))?;
        self.exports = gather_exports(program);
        self.imports = gather_imports(program);
        Ok(())
    }

    /// Drains this module's deferred requests into concrete import
    /// needs: separate support entries plus the pending imports the
    /// name table accumulated for this module. Inline support entries
    /// expand at their call sites and need nothing here. Draining is
    /// one-shot; a second call returns an empty list.
    pub fn finalize(&mut self, names: &mut NameTable) -> Result<Vec<ImportNeed>, EmitError> {
        if self.program.is_none() {
            return Err(Self::missing_program(&self.name));
        }
        let category = self.category();
        let mut needs = Vec::new();
        for entry in self.support.drain(category) {
            if let SupportKind::Separate { module, name } = entry.kind() {
                needs.push(ImportNeed { from: module.clone(), name: (*name).to_owned() });
            }
        }
        for (_, pending) in names.drain_pending(self.id) {
            needs.push(ImportNeed { from: pending.from, name: pending.name });
        }
        needs.dedup();
        Ok(needs)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{build, Pos};
    use crate::names::PendingImport;
    use crate::support::support_entry;

    use super::*;

    fn sample_module() -> PyModule {
        let p = Pos::default();
        let mut module = PyModule::new(ModuleId::new(0), DottedIdentifier::parse("util"));
        let def = build::function_def(
            p,
            "add_one",
            vec![crate::ast::Param::plain(p, "n")],
            vec![build::return_stmt(p, Some(build::name_ref(p, "n")))],
        );
        module.set_program(Program::new(p, vec![def], DependencyCategory::Production));
        module
    }

    #[test]
    fn analyze_requires_a_program() {
        let mut module = PyModule::new(ModuleId::new(0), DottedIdentifier::parse("util"));
        let err = module.analyze().unwrap_err();
        assert_eq!(err.to_string(), "in module util: module has no program");
    }

    #[test]
    fn program_mut_reports_the_missing_program() {
        let mut module = PyModule::new(ModuleId::new(0), DottedIdentifier::parse("util"));
        let err = module.program_mut().unwrap_err();
        assert_eq!(err.to_string(), "in module util: module has no program");
    }

    #[test]
    fn analyze_fills_both_surfaces() {
        let mut module = sample_module();
        module.analyze().unwrap();
        assert!(module.exports.contains("add_one"));
        assert!(module.imports.is_empty());
    }

    #[test]
    fn finalize_drains_support_and_pending_imports_once() {
        let mut module = sample_module();
        let mut names = NameTable::new();
        module
            .support
            .request(support_entry("math_sqrt").unwrap().clone(), DependencyCategory::Production);
        module
            .support
            .request(support_entry("int_div").unwrap().clone(), DependencyCategory::Production);
        names.pending_import(
            module.id,
            "helper",
            PendingImport { from: DottedIdentifier::parse("other"), name: "helper".into() },
        );

        let needs = module.finalize(&mut names).unwrap();
        // The inline entry contributes nothing.
        assert_eq!(needs.len(), 2);
        assert!(needs.iter().any(|n| n.name == "sqrt"));
        assert!(needs.iter().any(|n| n.name == "helper"));

        assert!(module.finalize(&mut names).unwrap().is_empty());
    }
}
