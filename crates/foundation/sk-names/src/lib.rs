//! Qualified name model
//!
//! Fully qualified names are sequences of interned segments. A `ClassId`
//! splits a class's location into its package and the relative path of
//! nesting inside that package, so owner navigation (dropping the innermost
//! segment) never has to guess where the package ends.

use serde::{Deserialize, Serialize};
use sk_intern::{Interner, Symbol};

/// A dot-separated qualified name as a list of interned segments
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FqName {
    segments: Vec<Symbol>,
}

impl FqName {
    /// The root (empty) name
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Builds a name from already-interned segments
    pub fn from_segments(segments: Vec<Symbol>) -> Self {
        Self { segments }
    }

    /// Interns every segment of a dotted path
    pub fn parse(path: &str, interner: &Interner) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self {
            segments: path.split('.').map(|seg| interner.intern(seg)).collect(),
        }
    }

    /// Whether this is the root name
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments of this name
    pub fn segments(&self) -> &[Symbol] {
        &self.segments
    }

    /// The last segment, if any
    pub fn short_name(&self) -> Option<Symbol> {
        self.segments.last().copied()
    }

    /// This name with one more segment appended
    pub fn child(&self, name: Symbol) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name);
        Self { segments }
    }

    /// This name without its last segment; `None` at the root
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Renders the dotted form
    pub fn display(&self, interner: &Interner) -> String {
        self.segments
            .iter()
            .map(|seg| interner.resolve(*seg))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Identity of a class-like declaration: its package plus the relative path
/// of class nesting within the package
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClassId {
    /// Package the class lives in
    pub package: FqName,
    /// Nesting path relative to the package (outermost first)
    pub relative: FqName,
    /// Whether the class is declared in a local (body-level) scope
    pub is_local: bool,
}

impl ClassId {
    /// A top-level class in the given package
    pub fn top_level(package: FqName, name: Symbol) -> Self {
        Self {
            package,
            relative: FqName::root().child(name),
            is_local: false,
        }
    }

    /// A class nested directly inside this one
    pub fn nested(&self, name: Symbol) -> Self {
        Self {
            package: self.package.clone(),
            relative: self.relative.child(name),
            is_local: self.is_local,
        }
    }

    /// The class id one nesting level out; `None` for top-level classes
    pub fn outer(&self) -> Option<Self> {
        let relative = self.relative.parent()?;
        if relative.is_root() {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            relative,
            is_local: self.is_local,
        })
    }

    /// This class id with the local flag set
    pub fn as_local(&self) -> Self {
        Self {
            package: self.package.clone(),
            relative: self.relative.clone(),
            is_local: true,
        }
    }

    /// Identity comparison that ignores the local flag
    pub fn is_same(&self, other: &Self) -> bool {
        self.package == other.package && self.relative == other.relative
    }

    /// The class's own (innermost) name
    pub fn short_name(&self) -> Symbol {
        self.relative
            .short_name()
            .unwrap_or_else(|| panic!("COMPILER BUG: class id with empty relative path"))
    }

    /// Renders `package.Outer.Inner`
    pub fn display(&self, interner: &Interner) -> String {
        let package = self.package.display(interner);
        let relative = self.relative.display(interner);
        if package.is_empty() {
            relative
        } else {
            format!("{package}.{relative}")
        }
    }
}

/// Identity of a callable declaration (function, constructor, property)
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CallableId {
    /// Package the callable lives in
    pub package: FqName,
    /// Containing class, if the callable is a member
    pub class_id: Option<ClassId>,
    /// The callable's own name
    pub name: Symbol,
}

impl CallableId {
    /// A top-level callable in the given package
    pub fn top_level(package: FqName, name: Symbol) -> Self {
        Self {
            package,
            class_id: None,
            name,
        }
    }

    /// A member callable of the given class
    pub fn member(class_id: ClassId, name: Symbol) -> Self {
        Self {
            package: class_id.package.clone(),
            class_id: Some(class_id),
            name,
        }
    }

    /// The synthetic class id standing in for a SAM-synthesized callable.
    ///
    /// SAM conversion synthesizes a top-level callable per functional
    /// interface; its containing file is the one declaring the classifier
    /// with the callable's own name.
    pub fn sam_synthetic_class_id(&self) -> ClassId {
        ClassId::top_level(self.package.clone(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_name_parse_and_display() {
        let interner = Interner::new();
        let name = FqName::parse("std.internal.sync", &interner);
        assert_eq!(name.segments().len(), 3);
        assert_eq!(name.display(&interner), "std.internal.sync");
        assert!(FqName::parse("", &interner).is_root());
    }

    #[test]
    fn test_class_id_outer_navigation() {
        let interner = Interner::new();
        let package = FqName::parse("app", &interner);
        let outer = ClassId::top_level(package, interner.intern("Outer"));
        let inner = outer.nested(interner.intern("Inner"));

        assert_eq!(inner.outer(), Some(outer.clone()));
        assert_eq!(outer.outer(), None);
        assert_eq!(inner.display(&interner), "app.Outer.Inner");
    }

    #[test]
    fn test_is_same_ignores_local_flag() {
        let interner = Interner::new();
        let package = FqName::parse("app", &interner);
        let id = ClassId::top_level(package, interner.intern("Widget"));
        assert!(id.is_same(&id.as_local()));
        assert_ne!(id, id.as_local());
    }

    #[test]
    fn test_sam_synthetic_class_id() {
        let interner = Interner::new();
        let package = FqName::parse("app.ui", &interner);
        let callable = CallableId::top_level(package.clone(), interner.intern("Clickable"));
        let class_id = callable.sam_synthetic_class_id();
        assert_eq!(class_id, ClassId::top_level(package, interner.intern("Clickable")));
    }
}
