//! Modules and the friend graph

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use sk_intern::Symbol;

/// A unique identifier for a module
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

/// A compilation-unit boundary owning declarations
#[derive(Clone, Debug)]
pub struct Module {
    /// Unique id
    pub id: ModuleId,
    /// Module name
    pub name: Symbol,
    /// Modules this module grants access to its `internal` declarations.
    /// Friendship is unidirectional: an entry here says nothing about what
    /// the friend exposes back.
    friends: FxHashSet<ModuleId>,
}

impl Module {
    /// Whether this module has granted friendship to `other`
    pub fn is_friend(&self, other: ModuleId) -> bool {
        self.friends.contains(&other)
    }
}

/// All modules of a compilation, fully constructed before any visibility
/// check runs
#[derive(Default)]
pub struct ModuleGraph {
    modules: FxHashMap<ModuleId, Module>,
    next_id: u32,
}

impl ModuleGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new module
    pub fn add_module(&mut self, name: Symbol) -> ModuleId {
        let id = ModuleId(self.next_id);
        self.next_id += 1;
        self.modules.insert(
            id,
            Module {
                id,
                name,
                friends: FxHashSet::default(),
            },
        );
        id
    }

    /// Grants `friend` access to `module`'s internal declarations
    pub fn declare_friend(&mut self, module: ModuleId, friend: ModuleId) {
        let entry = self
            .modules
            .get_mut(&module)
            .unwrap_or_else(|| panic!("COMPILER BUG: unknown module {module:?}"));
        entry.friends.insert(friend);
    }

    /// Looks up a module
    pub fn get(&self, id: ModuleId) -> &Module {
        self.modules
            .get(&id)
            .unwrap_or_else(|| panic!("COMPILER BUG: unknown module {id:?}"))
    }

    /// Whether the declaring module has granted friendship to the use-site
    /// module
    pub fn grants_friendship(&self, declaring: ModuleId, use_site: ModuleId) -> bool {
        self.get(declaring).is_friend(use_site)
    }
}
