//! Symbol and declaration model
//!
//! Declarations form a strict tree through their `owner` links: a class owns
//! its members, a function owns its parameters. Every non-local declaration
//! carries its module and (through its class/callable id) its package, which
//! is what the visibility checker navigates.

pub mod module;
pub mod providers;
pub mod session;

pub use module::{Module, ModuleGraph, ModuleId};
pub use session::{DeclProvider, FeatureFlags, Session, SupertypeProvider};

use serde::{Deserialize, Serialize};
use sk_arena::{Arena, Idx};
use sk_intern::Symbol;
use sk_names::{CallableId, ClassId, FqName};
use sk_span::FileId;

/// Handle to a declaration in a [`DeclTable`]
pub type DeclId = Idx<Declaration>;

/// Visibility modifiers
///
/// The last two are platform-interop visibilities with no meaning in the
/// core language; the checker routes them to the platform hook.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Visibility {
    /// Visible everywhere
    Public,
    /// Visible within the declaring module and its declared friends
    Internal,
    /// Visible within the owner class and its subclasses
    Protected,
    /// Visible within the owner class (or file, for top-level declarations)
    Private,
    /// Like private, but additionally bound to the `this` receiver
    PrivateToThis,
    /// Declared in a body-level scope
    Local,
    /// Platform interop: visible within the same package
    PackagePrivate,
    /// Platform interop: protected + static semantics
    ProtectedStatic,
}

impl Visibility {
    /// Whether this visibility is resolved by the platform hook rather than
    /// the core rules
    pub fn is_platform_specific(self) -> bool {
        matches!(self, Self::PackagePrivate | Self::ProtectedStatic)
    }
}

/// Class-like declaration kinds
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ClassKind {
    /// Ordinary class
    Class,
    /// Interface
    Interface,
    /// Singleton object
    Object,
    /// Enum class
    Enum,
}

/// What a declaration is, together with its identity
#[derive(Clone, Debug, PartialEq)]
pub enum DeclKind {
    /// A class, interface, object or enum
    Class {
        /// Class identity
        id: ClassId,
        /// Which class-like kind this is
        kind: ClassKind,
        /// Whether this is a companion object
        is_companion: bool,
        /// Whether this class is sealed
        is_sealed: bool,
    },
    /// A function
    Function {
        /// Callable identity
        id: CallableId,
        /// Whether this callable was synthesized for SAM conversion
        is_sam_synthesized: bool,
    },
    /// A constructor
    Constructor {
        /// Callable identity
        id: CallableId,
        /// Whether the constructed class is sealed
        from_sealed_class: bool,
    },
    /// A property
    Property {
        /// Callable identity
        id: CallableId,
    },
    /// A synthesized accessor for a platform field/getter pair
    SyntheticPropertyAccessor {
        /// Callable identity
        id: CallableId,
    },
    /// A value parameter
    Parameter,
}

/// Where a declaration came from
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum DeclOrigin {
    /// Written in source in the current module
    Source,
    /// Loaded from a compiled library
    Library,
    /// Synthesized by the compiler
    Synthetic,
    /// An override materialized during supertype substitution or
    /// intersection; visibility questions delegate to the original
    FakeOverride {
        /// The declaration this override was derived from
        original: DeclId,
    },
}

/// A named, typed program entity
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// Declared name
    pub name: Symbol,
    /// Enclosing declaration, if any
    pub owner: Option<DeclId>,
    /// Declared visibility
    pub visibility: Visibility,
    /// Module this declaration belongs to
    pub module: ModuleId,
    /// Kind and identity
    pub kind: DeclKind,
    /// Provenance
    pub origin: DeclOrigin,
    /// File the declaration was written in, when known
    pub containing_file: Option<FileId>,
}

impl Declaration {
    /// Whether this declaration came from a compiled library
    pub fn is_from_library(&self) -> bool {
        matches!(self.origin, DeclOrigin::Library)
    }

    /// The class identity, for class-like declarations
    pub fn class_id(&self) -> Option<&ClassId> {
        match &self.kind {
            DeclKind::Class { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The callable identity, for callable declarations
    pub fn callable_id(&self) -> Option<&CallableId> {
        match &self.kind {
            DeclKind::Function { id, .. }
            | DeclKind::Constructor { id, .. }
            | DeclKind::Property { id }
            | DeclKind::SyntheticPropertyAccessor { id } => Some(id),
            _ => None,
        }
    }

    /// Whether this is a companion object declaration
    pub fn is_companion(&self) -> bool {
        matches!(self.kind, DeclKind::Class { is_companion: true, .. })
    }
}

/// Arena of all declarations known to a session
#[derive(Default)]
pub struct DeclTable {
    decls: Arena<Declaration>,
}

impl DeclTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a declaration, returning its handle
    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        self.decls.alloc(decl)
    }

    /// Looks up a declaration
    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id]
    }

    /// Iterates all declarations with their handles
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls.iter()
    }

    /// The class id owning the given declaration, if any.
    ///
    /// For a class-like declaration this is the outer class (a local class
    /// with no outer class owns itself, flagged local). For a callable it is
    /// the containing class. Asking for any other kind is a caller bug.
    pub fn owner_class_id(&self, id: DeclId) -> Option<ClassId> {
        let decl = self.get(id);
        match &decl.kind {
            DeclKind::Class { id: class_id, .. } => {
                let outer = class_id.outer();
                if class_id.is_local {
                    Some(outer.map_or_else(|| class_id.clone(), |out| out.as_local()))
                } else {
                    outer
                }
            }
            DeclKind::Function { id: callable, .. }
            | DeclKind::Constructor { id: callable, .. }
            | DeclKind::Property { id: callable }
            | DeclKind::SyntheticPropertyAccessor { id: callable } => callable.class_id.clone(),
            DeclKind::Parameter => {
                panic!("COMPILER BUG: unsupported owner query for parameter declaration")
            }
        }
    }

    /// The package a declaration belongs to. Parameters have no package of
    /// their own; asking is a caller bug.
    pub fn package_of(&self, id: DeclId) -> FqName {
        let decl = self.get(id);
        if let Some(class_id) = decl.class_id() {
            return class_id.package.clone();
        }
        if let Some(callable) = decl.callable_id() {
            return callable.package.clone();
        }
        panic!("COMPILER BUG: no package for declaration kind {:?}", decl.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_intern::Interner;

    fn class_decl(table: &mut DeclTable, id: ClassId, module: ModuleId) -> DeclId {
        table.alloc(Declaration {
            name: id.short_name(),
            owner: None,
            visibility: Visibility::Public,
            module,
            kind: DeclKind::Class {
                id,
                kind: ClassKind::Class,
                is_companion: false,
                is_sealed: false,
            },
            origin: DeclOrigin::Source,
            containing_file: None,
        })
    }

    #[test]
    fn test_owner_class_id_of_nested_class() {
        let interner = Interner::new();
        let mut table = DeclTable::new();
        let mut graph = ModuleGraph::new();
        let module = graph.add_module(interner.intern("app"));

        let package = FqName::parse("app", &interner);
        let outer = ClassId::top_level(package, interner.intern("Outer"));
        let inner = outer.nested(interner.intern("Inner"));
        let inner_decl = class_decl(&mut table, inner, module);

        assert_eq!(table.owner_class_id(inner_decl), Some(outer));
    }

    #[test]
    fn test_owner_class_id_of_local_class_is_itself() {
        let interner = Interner::new();
        let mut table = DeclTable::new();
        let mut graph = ModuleGraph::new();
        let module = graph.add_module(interner.intern("app"));

        let package = FqName::parse("app", &interner);
        let local = ClassId::top_level(package, interner.intern("Runner")).as_local();
        let decl = class_decl(&mut table, local.clone(), module);

        assert_eq!(table.owner_class_id(decl), Some(local));
    }

    #[test]
    fn test_owner_class_id_of_member_callable() {
        let interner = Interner::new();
        let mut table = DeclTable::new();
        let mut graph = ModuleGraph::new();
        let module = graph.add_module(interner.intern("app"));

        let package = FqName::parse("app", &interner);
        let class_id = ClassId::top_level(package, interner.intern("Widget"));
        let method = table.alloc(Declaration {
            name: interner.intern("draw"),
            owner: None,
            visibility: Visibility::Private,
            module,
            kind: DeclKind::Function {
                id: CallableId::member(class_id.clone(), interner.intern("draw")),
                is_sam_synthesized: false,
            },
            origin: DeclOrigin::Source,
            containing_file: None,
        });

        assert_eq!(table.owner_class_id(method), Some(class_id));
    }
}
