//! Map-backed provider implementations
//!
//! The embedding driver resolves files and supertypes from its own indexes;
//! these implementations back sessions built from in-memory tables, which is
//! all the middle-end tests and small embedders need.

use rustc_hash::{FxHashMap, FxHashSet};
use sk_names::{CallableId, ClassId};
use sk_span::FileId;

use crate::{DeclId, DeclProvider, SupertypeProvider};

/// Declaration provider backed by hash maps
#[derive(Default)]
pub struct MapDeclProvider {
    classifier_files: FxHashMap<ClassId, FileId>,
    callable_files: FxHashMap<CallableId, FileId>,
    classes: FxHashMap<ClassId, DeclId>,
}

impl MapDeclProvider {
    /// Creates an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a classifier with its declaration and containing file
    pub fn add_class(&mut self, id: ClassId, decl: DeclId, file: FileId) {
        self.classifier_files.insert(id.clone(), file);
        self.classes.insert(id, decl);
    }

    /// Registers a callable's containing file
    pub fn add_callable(&mut self, id: CallableId, file: FileId) {
        self.callable_files.insert(id, file);
    }
}

impl DeclProvider for MapDeclProvider {
    fn classifier_container_file(&self, id: &ClassId) -> Option<FileId> {
        self.classifier_files.get(id).copied()
    }

    fn callable_container_file(&self, id: &CallableId) -> Option<FileId> {
        self.callable_files.get(id).copied()
    }

    fn class_by_id(&self, id: &ClassId) -> Option<DeclId> {
        self.classes.get(id).copied()
    }
}

/// Supertype provider backed by a direct-supertype table
#[derive(Default)]
pub struct MapSupertypes {
    direct: FxHashMap<ClassId, Vec<(ClassId, bool)>>,
}

impl MapSupertypes {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a direct supertype edge; `is_interface` tags the supertype
    pub fn add_supertype(&mut self, class: ClassId, supertype: ClassId, is_interface: bool) {
        self.direct
            .entry(class)
            .or_default()
            .push((supertype, is_interface));
    }
}

impl SupertypeProvider for MapSupertypes {
    fn lookup_supertypes(
        &self,
        class: &ClassId,
        include_interfaces: bool,
        deep: bool,
    ) -> FxHashSet<ClassId> {
        let mut result = FxHashSet::default();
        let mut work = vec![class.clone()];
        while let Some(current) = work.pop() {
            for (supertype, is_interface) in self.direct.get(&current).into_iter().flatten() {
                if *is_interface && !include_interfaces {
                    continue;
                }
                if result.insert(supertype.clone()) && deep {
                    work.push(supertype.clone());
                }
            }
        }
        result
    }
}
