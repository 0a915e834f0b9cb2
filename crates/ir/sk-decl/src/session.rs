//! Compilation session
//!
//! A session bundles everything a checker needs: the use-site module, the
//! fully built module graph, feature flags, and the two external lookup
//! services. Nothing here is ambient or global; callers pass the session
//! explicitly through every check.

use rustc_hash::FxHashSet;
use sk_intern::Interner;
use sk_names::{CallableId, ClassId};
use sk_span::FileId;

use crate::{DeclId, DeclTable, ModuleGraph, ModuleId};

/// Language-version feature toggles, threaded explicitly through checks
#[derive(Copy, Clone, Debug, Default)]
pub struct FeatureFlags {
    /// When set, synthetic property accessors of protected members are only
    /// visible within the owner's package (the staged diagnostic
    /// tightening); when unset the lenient behavior applies.
    pub strict_protected_synthetic_accessors: bool,
}

/// External lookup service mapping identities to declarations and files.
///
/// Absence is the only failure mode; a missing answer simply means the
/// session has no source for the identity.
pub trait DeclProvider {
    /// The file declaring the classifier with the given id
    fn classifier_container_file(&self, id: &ClassId) -> Option<FileId>;

    /// The file declaring the callable with the given id
    fn callable_container_file(&self, id: &CallableId) -> Option<FileId>;

    /// The declaration of the classifier with the given id
    fn class_by_id(&self, id: &ClassId) -> Option<DeclId>;
}

/// External supertype lookup: a deduplicated, flattened supertype set
pub trait SupertypeProvider {
    /// All supertypes of `class`, optionally including interfaces and
    /// optionally transitive
    fn lookup_supertypes(
        &self,
        class: &ClassId,
        include_interfaces: bool,
        deep: bool,
    ) -> FxHashSet<ClassId>;
}

/// Read-only context for one use-site module
pub struct Session<'sess> {
    /// The module the checked code belongs to
    pub module: ModuleId,
    /// The full module graph
    pub modules: &'sess ModuleGraph,
    /// Feature toggles
    pub features: FeatureFlags,
    /// All known declarations
    pub decls: &'sess DeclTable,
    /// Identity-to-declaration lookups
    pub provider: &'sess dyn DeclProvider,
    /// Supertype lookups
    pub supertypes: &'sess dyn SupertypeProvider,
    /// The session's interner
    pub interner: &'sess Interner,
}

impl Session<'_> {
    /// The outer class id when `class_id` names a companion object, else
    /// `None`. Local classes never count.
    pub fn owner_if_companion(&self, class_id: &ClassId) -> Option<ClassId> {
        let outer = class_id.outer()?;
        if class_id.is_local {
            return None;
        }
        let decl_id = self.provider.class_by_id(class_id)?;
        if self.decls.get(decl_id).is_companion() {
            Some(outer)
        } else {
            None
        }
    }
}
