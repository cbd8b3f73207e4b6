//! Whole-program name resolution and renaming.
//!
//! One [`NameTable`] lives for the whole translation run. A collection
//! pass visits every declaration, support-code request, and import edge
//! once, creating a record per (module, logical name); records are
//! mutated afterwards only through the two idempotent transitions
//! (import resolution and optional-parameter privatization) and are
//! never deleted.
//!
//! There is no ambient "current module": the table is an explicit
//! context object, and callers address records by [`ModuleId`].

use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dotted::DottedIdentifier;
use crate::error::EmitError;
use crate::ident::{pythonize, safe_identifier};

/// Index of a module within one translation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u32);

impl ModuleId {
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Syntactic kind of a name; affects casing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameKind {
    /// Functions, variables, parameters: camel case converts to snake.
    Value,
    /// Classes and type aliases: source casing is kept.
    Type,
}

/// Visibility of a name; affects the collision-avoidance strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reach {
    /// Module-internal: a numeric uid suffix guarantees uniqueness.
    Internal,
    /// Visible to importers: the styled name is kept, with only a
    /// trailing underscore when it collides with a keyword.
    External,
}

/// One name record. Created once, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameInfo {
    /// The collision-avoided, style-converted output text.
    pub out_name: String,
    /// Whether the name is declared at module top level.
    pub declared_top_level: bool,
    pub kind: NameKind,
    pub reach: Reach,
    /// Stable qualified name for cross-pass selection, when known.
    pub qualified_name: Option<String>,
    /// Filled exactly once when a pending import resolves.
    pub imported_name: Option<String>,
    /// The public half of a privatized optional parameter.
    public_name: Option<String>,
}

/// A deferred "import this if it is actually used" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingImport {
    pub from: DottedIdentifier,
    pub name: String,
}

/// The per-run name-resolution context.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NameTable {
    records: AHashMap<(ModuleId, String), NameInfo>,
    uid_counters: AHashMap<ModuleId, u32>,
    /// Explicit pending-import request table, drained once per module
    /// alongside its support-code requests.
    pending: AHashMap<ModuleId, IndexMap<String, PendingImport>>,
}

impl NameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_uid(&mut self, module: ModuleId) -> u32 {
        let counter = self.uid_counters.entry(module).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Records a name on first visit and returns its record. Repeated
    /// calls with the same key return the existing record unchanged.
    pub fn record(
        &mut self,
        module: ModuleId,
        logical: &str,
        kind: NameKind,
        reach: Reach,
        declared_top_level: bool,
    ) -> &NameInfo {
        let key = (module, logical.to_owned());
        if !self.records.contains_key(&key) {
            let styled = match kind {
                NameKind::Value => safe_identifier(&pythonize(logical)),
                NameKind::Type => safe_identifier(logical),
            };
            let out_name = match reach {
                Reach::Internal => {
                    let uid = self.next_uid(module);
                    format!("{styled}_{uid}")
                }
                Reach::External => styled,
            };
            self.records.insert(
                key.clone(),
                NameInfo {
                    out_name,
                    declared_top_level,
                    kind,
                    reach,
                    qualified_name: None,
                    imported_name: None,
                    public_name: None,
                },
            );
        }
        &self.records[&key]
    }

    #[must_use]
    pub fn get(&self, module: ModuleId, logical: &str) -> Option<&NameInfo> {
        self.records.get(&(module, logical.to_owned()))
    }

    /// The output text chosen for a recorded name.
    pub fn out_name(&self, module: ModuleId, logical: &str) -> Result<&str, EmitError> {
        self.get(module, logical)
            .map(|info| info.out_name.as_str())
            .ok_or_else(|| EmitError::new(format!("name {logical:?} was never recorded")))
    }

    /// Folds a just-resolved import alias into the record, exactly once.
    /// Later calls return the first resolution and ignore the new alias.
    pub fn resolve_import(
        &mut self,
        module: ModuleId,
        logical: &str,
        imported_as: &str,
    ) -> Result<&str, EmitError> {
        let info = self
            .records
            .get_mut(&(module, logical.to_owned()))
            .ok_or_else(|| EmitError::new(format!("name {logical:?} was never recorded")))?;
        Ok(info.imported_name.get_or_insert_with(|| imported_as.to_owned()))
    }

    /// Rewrites an optional parameter's name to a private variant and
    /// returns `(private, public)`. Idempotent: the second call returns
    /// the same pair.
    pub fn privatize(
        &mut self,
        module: ModuleId,
        logical: &str,
    ) -> Result<(String, String), EmitError> {
        let info = self
            .records
            .get_mut(&(module, logical.to_owned()))
            .ok_or_else(|| EmitError::new(format!("name {logical:?} was never recorded")))?;
        if info.public_name.is_none() {
            let public = info.out_name.clone();
            info.out_name = format!("_{public}");
            info.public_name = Some(public);
        }
        let public = info.public_name.clone().unwrap_or_default();
        Ok((info.out_name.clone(), public))
    }

    /// A fresh synthesized temporary. The leading underscore keeps it
    /// out of every export surface.
    pub fn unused_name(&mut self, module: ModuleId, hint: &str) -> String {
        let uid = self.next_uid(module);
        let styled = safe_identifier(&pythonize(hint));
        format!("_{styled}_{uid}")
    }

    /// Registers a deferred import request, one-shot per logical name.
    pub fn pending_import(&mut self, module: ModuleId, logical: &str, request: PendingImport) {
        self.pending
            .entry(module)
            .or_default()
            .entry(logical.to_owned())
            .or_insert(request);
    }

    /// Drains the pending-import requests for one module. Draining a
    /// second time returns empty.
    pub fn drain_pending(&mut self, module: ModuleId) -> IndexMap<String, PendingImport> {
        self.pending.remove(&module).unwrap_or_default()
    }

    /// Names a runtime-support entry within a module, recording it as an
    /// externally-reached value and deferring its import when the entry
    /// lives in a separate runtime module.
    pub fn support_code_name(
        &mut self,
        module: ModuleId,
        base_name: &str,
        from: Option<&DottedIdentifier>,
    ) -> String {
        let out = self
            .record(module, base_name, NameKind::Value, Reach::External, false)
            .out_name
            .clone();
        if let Some(from) = from {
            self.pending_import(
                module,
                base_name,
                PendingImport { from: from.clone(), name: out.clone() },
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: ModuleId = ModuleId(0);

    #[test]
    fn record_is_idempotent() {
        let mut table = NameTable::new();
        let first = table
            .record(M, "addOne", NameKind::Value, Reach::External, true)
            .out_name
            .clone();
        assert_eq!(first, "add_one");
        let second = table
            .record(M, "addOne", NameKind::Value, Reach::External, true)
            .out_name
            .clone();
        assert_eq!(second, first);
    }

    #[test]
    fn type_names_keep_their_casing() {
        let mut table = NameTable::new();
        let info = table.record(M, "HttpClient", NameKind::Type, Reach::External, true);
        assert_eq!(info.out_name, "HttpClient");
    }

    #[test]
    fn internal_names_get_uid_suffixes() {
        let mut table = NameTable::new();
        let a = table
            .record(M, "tmp", NameKind::Value, Reach::Internal, false)
            .out_name
            .clone();
        let b = table
            .record(M, "tmp2", NameKind::Value, Reach::Internal, false)
            .out_name
            .clone();
        assert_ne!(a, b);
        assert!(a.starts_with("tmp_"));
    }

    #[test]
    fn external_reserved_words_get_suffixed() {
        let mut table = NameTable::new();
        let info = table.record(M, "class", NameKind::Value, Reach::External, true);
        assert_eq!(info.out_name, "class_");
    }

    #[test]
    fn resolve_import_fills_exactly_once() {
        let mut table = NameTable::new();
        table.record(M, "helper", NameKind::Value, Reach::External, false);
        let first = table.resolve_import(M, "helper", "helper").unwrap().to_owned();
        let second = table.resolve_import(M, "helper", "other").unwrap().to_owned();
        assert_eq!(first, "helper");
        assert_eq!(second, "helper");
    }

    #[test]
    fn privatize_is_idempotent() {
        let mut table = NameTable::new();
        table.record(M, "limit", NameKind::Value, Reach::External, false);
        let (private, public) = table.privatize(M, "limit").unwrap();
        assert_eq!(private, "_limit");
        assert_eq!(public, "limit");
        assert_eq!(table.privatize(M, "limit").unwrap(), (private, public));
    }

    #[test]
    fn unused_names_are_private_and_fresh() {
        let mut table = NameTable::new();
        let a = table.unused_name(M, "return");
        let b = table.unused_name(M, "return");
        assert!(a.starts_with('_'));
        assert_ne!(a, b);
    }

    #[test]
    fn pending_imports_drain_once() {
        let mut table = NameTable::new();
        table.pending_import(
            M,
            "helper",
            PendingImport { from: DottedIdentifier::parse("runtime"), name: "helper".into() },
        );
        let drained = table.drain_pending(M);
        assert_eq!(drained.len(), 1);
        assert!(table.drain_pending(M).is_empty());
    }
}
