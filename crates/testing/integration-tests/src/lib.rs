//! Integration test utilities for the Skua middle-end
//!
//! `TestWorld` wires the declaration table, module graph and lookup
//! providers together the way an embedding driver would, so scenario tests
//! can build small programs without repeating the plumbing.

use sk_decl::providers::{MapDeclProvider, MapSupertypes};
use sk_decl::{
    ClassKind, DeclId, DeclKind, DeclOrigin, DeclTable, Declaration, FeatureFlags, ModuleGraph,
    ModuleId, Session, Visibility,
};
use sk_intern::Interner;
use sk_names::{CallableId, ClassId, FqName};
use sk_span::FileId;
use sk_visibility::UseSiteFile;

/// In-memory declaration world shared by scenario tests
pub struct TestWorld {
    /// The session interner
    pub interner: Interner,
    /// All allocated declarations
    pub decls: DeclTable,
    /// Modules and friend edges
    pub modules: ModuleGraph,
    /// Classifier and callable lookup
    pub provider: MapDeclProvider,
    /// Direct supertype edges
    pub supertypes: MapSupertypes,
}

impl TestWorld {
    /// Creates an empty world
    #[must_use]
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            decls: DeclTable::new(),
            modules: ModuleGraph::new(),
            provider: MapDeclProvider::new(),
            supertypes: MapSupertypes::new(),
        }
    }

    /// Registers a module
    pub fn module(&mut self, name: &str) -> ModuleId {
        self.modules.add_module(self.interner.intern(name))
    }

    /// Parses a dotted package path
    #[must_use]
    pub fn package(&self, path: &str) -> FqName {
        FqName::parse(path, &self.interner)
    }

    /// Declares a public top-level class in the given module and file
    pub fn class(
        &mut self,
        module: ModuleId,
        package: &str,
        name: &str,
        file: FileId,
    ) -> (DeclId, ClassId) {
        let id = ClassId::top_level(self.package(package), self.interner.intern(name));
        let decl = self.decls.alloc(Declaration {
            name: id.short_name(),
            owner: None,
            visibility: Visibility::Public,
            module,
            kind: DeclKind::Class {
                id: id.clone(),
                kind: ClassKind::Class,
                is_companion: false,
                is_sealed: false,
            },
            origin: DeclOrigin::Source,
            containing_file: Some(file),
        });
        self.provider.add_class(id.clone(), decl, file);
        (decl, id)
    }

    /// Declares a member function on an existing class
    pub fn member_fn(
        &mut self,
        module: ModuleId,
        owner: &ClassId,
        owner_decl: DeclId,
        name: &str,
        visibility: Visibility,
    ) -> DeclId {
        let name = self.interner.intern(name);
        self.decls.alloc(Declaration {
            name,
            owner: Some(owner_decl),
            visibility,
            module,
            kind: DeclKind::Function {
                id: CallableId::member(owner.clone(), name),
                is_sam_synthesized: false,
            },
            origin: DeclOrigin::Source,
            containing_file: None,
        })
    }

    /// A session checking from the given module with default feature flags
    #[must_use]
    pub fn session(&self, module: ModuleId) -> Session<'_> {
        self.session_with(module, FeatureFlags::default())
    }

    /// A session with explicit feature flags
    #[must_use]
    pub fn session_with(&self, module: ModuleId, features: FeatureFlags) -> Session<'_> {
        Session {
            module,
            modules: &self.modules,
            features,
            decls: &self.decls,
            provider: &self.provider,
            supertypes: &self.supertypes,
            interner: &self.interner,
        }
    }

    /// A use-site file in the given package
    #[must_use]
    pub fn file(&self, file: FileId, package: &str) -> UseSiteFile {
        UseSiteFile {
            file,
            package: self.package(package),
        }
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}
