//! IR tree for the lowering pipeline
//!
//! One `IrUnit` per compilation unit (file), owning arenas of declarations,
//! statements and expressions. Every node records its parent; a child
//! belongs to exactly one parent at a time, and all mutators on `IrUnit`
//! keep the back-links consistent. Detached nodes stay in the arena (arenas
//! never free) but are unreachable from the unit's roots.

pub mod pretty;
pub mod transform;
pub mod visit;

pub use transform::IrTransformer;
pub use visit::IrVisitor;

use sk_arena::{Arena, Idx};
use sk_decl::Visibility;
use sk_intern::Symbol;
use sk_names::FqName;
use sk_span::{FileId, Span};

/// Handle to a declaration node
pub type IrDeclId = Idx<IrDecl>;
/// Handle to a statement node
pub type IrStmtId = Idx<IrStmt>;
/// Handle to an expression node
pub type IrExprId = Idx<IrExpr>;

/// The owner of a node
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IrParent {
    /// Owned directly by the unit (top-level declarations)
    Unit,
    /// Owned by a declaration
    Decl(IrDeclId),
    /// Owned by a statement
    Stmt(IrStmtId),
    /// Owned by an expression
    Expr(IrExprId),
    /// Spliced out of the tree and not re-attached
    Detached,
}

/// Where a declaration came from
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IrOrigin {
    /// Written in source
    Source,
    /// Synthesized per-file global initializer
    FileGlobalInitializer,
    /// Synthesized per-file thread-local initializer (paired with a global
    /// one)
    FileThreadLocalInitializer,
    /// Synthesized per-file thread-local initializer with no global sibling
    FileStandaloneThreadLocalInitializer,
    /// Synthesized module-level initializer for the deferred-property table
    ModuleDeferredInitializer,
    /// The per-file deferred-property reflection table field
    DeferredPropertyTable,
}

impl IrOrigin {
    /// Whether this origin marks a function synthesized by the
    /// file-initializers lowering
    pub fn is_file_initializer(self) -> bool {
        matches!(
            self,
            Self::FileGlobalInitializer
                | Self::FileThreadLocalInitializer
                | Self::FileStandaloneThreadLocalInitializer
                | Self::ModuleDeferredInitializer
        )
    }
}

/// How a top-level field is stored at runtime
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StorageKind {
    /// Shared, frozen global storage: initialized by the global initializer
    SharedGlobal,
    /// Explicitly thread-local storage
    ThreadLocal,
    /// No explicit marking: only main-thread visible, treated as
    /// thread-local for initialization
    Default,
}

/// Static types carried by expressions
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IrType {
    /// The unit type
    Unit,
    /// Booleans
    Bool,
    /// Integers
    Int,
    /// Strings
    Str,
    /// A named class-like type
    Named(Symbol),
}

/// Constant values
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    /// Unit constant
    Unit,
    /// Boolean constant
    Bool(bool),
    /// Integer constant
    Int(i64),
    /// String constant
    Str(String),
}

/// A symbol reference inside the tree.
///
/// A pass may leave a reference unbound only when a later pass is documented
/// to bind it; the pipeline's final binding check rejects leftovers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IrTarget {
    /// Bound to a declaration in this unit
    Bound(IrDeclId),
    /// Not (yet) bound; carries the referenced name
    Unbound(Symbol),
}

/// A declaration node
#[derive(Clone, Debug, PartialEq)]
pub struct IrDecl {
    /// Declared name
    pub name: Symbol,
    /// Source span (synthetic for synthesized declarations)
    pub span: Span,
    /// Owner link
    pub parent: IrParent,
    /// Provenance
    pub origin: IrOrigin,
    /// Declared visibility
    pub visibility: Visibility,
    /// Kind-specific payload
    pub kind: IrDeclKind,
}

/// Declaration payloads
#[derive(Clone, Debug, PartialEq)]
pub enum IrDeclKind {
    /// A function with an optional block body
    Function {
        /// Parameter names
        params: Vec<Symbol>,
        /// Body statements; `None` for declarations without bodies
        body: Option<Vec<IrStmtId>>,
    },
    /// A top-level or member field
    Field {
        /// Storage classification (side information from an earlier pass)
        storage: StorageKind,
        /// Initializer expression, if any
        initializer: Option<IrExprId>,
    },
    /// A class owning member declarations
    Class {
        /// Member declarations
        members: Vec<IrDeclId>,
    },
}

/// A statement node
#[derive(Clone, Debug, PartialEq)]
pub struct IrStmt {
    /// Source span
    pub span: Span,
    /// Owner link
    pub parent: IrParent,
    /// Kind-specific payload
    pub kind: IrStmtKind,
}

/// Statement payloads
#[derive(Clone, Debug, PartialEq)]
pub enum IrStmtKind {
    /// Expression statement
    Expr(IrExprId),
    /// Store into a field
    SetField {
        /// The field being written
        field: IrTarget,
        /// The stored value
        value: IrExprId,
    },
    /// Return from the enclosing function
    Return(Option<IrExprId>),
}

/// An expression node
#[derive(Clone, Debug, PartialEq)]
pub struct IrExpr {
    /// Source span
    pub span: Span,
    /// Owner link
    pub parent: IrParent,
    /// Static type
    pub ty: IrType,
    /// Kind-specific payload
    pub kind: IrExprKind,
}

/// Expression payloads
#[derive(Clone, Debug, PartialEq)]
pub enum IrExprKind {
    /// Constant
    Const(ConstValue),
    /// Read a field
    GetField {
        /// The field being read
        field: IrTarget,
    },
    /// Call a function
    Call {
        /// The called function
        callee: IrTarget,
        /// Argument expressions
        args: Vec<IrExprId>,
    },
}

/// One compilation unit's tree
#[derive(Clone, Debug, PartialEq)]
pub struct IrUnit {
    /// The unit's source file
    pub file: FileId,
    /// The unit's package
    pub package: FqName,
    decls: Arena<IrDecl>,
    stmts: Arena<IrStmt>,
    exprs: Arena<IrExpr>,
    /// Top-level declarations in declaration order
    pub top_level: Vec<IrDeclId>,
}

impl IrUnit {
    /// Creates an empty unit
    pub fn new(file: FileId, package: FqName) -> Self {
        Self {
            file,
            package,
            decls: Arena::new(),
            stmts: Arena::new(),
            exprs: Arena::new(),
            top_level: Vec::new(),
        }
    }

    /// Looks up a declaration
    pub fn decl(&self, id: IrDeclId) -> &IrDecl {
        &self.decls[id]
    }

    /// Looks up a declaration mutably
    pub fn decl_mut(&mut self, id: IrDeclId) -> &mut IrDecl {
        &mut self.decls[id]
    }

    /// Looks up a statement
    pub fn stmt(&self, id: IrStmtId) -> &IrStmt {
        &self.stmts[id]
    }

    /// Looks up a statement mutably
    pub fn stmt_mut(&mut self, id: IrStmtId) -> &mut IrStmt {
        &mut self.stmts[id]
    }

    /// Looks up an expression
    pub fn expr(&self, id: IrExprId) -> &IrExpr {
        &self.exprs[id]
    }

    /// Looks up an expression mutably
    pub fn expr_mut(&mut self, id: IrExprId) -> &mut IrExpr {
        &mut self.exprs[id]
    }

    /// Allocates a detached declaration node
    pub fn alloc_decl(&mut self, mut decl: IrDecl) -> IrDeclId {
        decl.parent = IrParent::Detached;
        self.decls.alloc(decl)
    }

    /// Allocates a detached statement node
    pub fn alloc_stmt(&mut self, mut stmt: IrStmt) -> IrStmtId {
        stmt.parent = IrParent::Detached;
        self.stmts.alloc(stmt)
    }

    /// Allocates an expression node with the parent it carries
    pub fn alloc_expr(&mut self, expr: IrExpr) -> IrExprId {
        self.exprs.alloc(expr)
    }

    /// Attaches a declaration at the given top-level position
    pub fn insert_top_level(&mut self, index: usize, decl: IrDeclId) {
        self.decls[decl].parent = IrParent::Unit;
        self.top_level.insert(index, decl);
    }

    /// Attaches a declaration at the end of the top level
    pub fn push_top_level(&mut self, decl: IrDeclId) {
        self.decls[decl].parent = IrParent::Unit;
        self.top_level.push(decl);
    }

    /// Inserts a statement into a function body at the given position,
    /// re-parenting it to the function. The function must have a body.
    pub fn insert_body_stmt(&mut self, function: IrDeclId, index: usize, stmt: IrStmtId) {
        self.stmts[stmt].parent = IrParent::Decl(function);
        match &mut self.decls[function].kind {
            IrDeclKind::Function { body: Some(body), .. } => body.insert(index, stmt),
            other => panic!("COMPILER BUG: inserting statement into bodiless declaration {other:?}"),
        }
    }

    /// Appends a statement to a function body
    pub fn push_body_stmt(&mut self, function: IrDeclId, stmt: IrStmtId) {
        let len = match &self.decls[function].kind {
            IrDeclKind::Function { body: Some(body), .. } => body.len(),
            other => panic!("COMPILER BUG: appending statement to bodiless declaration {other:?}"),
        };
        self.insert_body_stmt(function, len, stmt);
    }

    /// Detaches and returns a field's initializer expression, if any
    pub fn take_field_initializer(&mut self, field: IrDeclId) -> Option<IrExprId> {
        let taken = match &mut self.decls[field].kind {
            IrDeclKind::Field { initializer, .. } => initializer.take(),
            other => panic!("COMPILER BUG: taking initializer of non-field {other:?}"),
        };
        if let Some(expr) = taken {
            self.exprs[expr].parent = IrParent::Detached;
        }
        taken
    }

    /// Re-parents an expression under a statement
    pub fn attach_expr_to_stmt(&mut self, expr: IrExprId, stmt: IrStmtId) {
        self.exprs[expr].parent = IrParent::Stmt(stmt);
    }

    /// Replaces `old` with `new` in the child slots of an expression's
    /// parent, keeping both parent links consistent
    pub fn replace_expr(&mut self, old: IrExprId, new: IrExprId) {
        if old == new {
            return;
        }
        let parent = self.exprs[old].parent;
        match parent {
            IrParent::Stmt(stmt) => match &mut self.stmts[stmt].kind {
                IrStmtKind::Expr(slot) | IrStmtKind::SetField { value: slot, .. } => {
                    if *slot == old {
                        *slot = new;
                    }
                }
                IrStmtKind::Return(slot) => {
                    if *slot == Some(old) {
                        *slot = Some(new);
                    }
                }
            },
            IrParent::Expr(outer) => {
                if let IrExprKind::Call { args, .. } = &mut self.exprs[outer].kind {
                    for arg in args {
                        if *arg == old {
                            *arg = new;
                        }
                    }
                }
            }
            IrParent::Decl(decl) => {
                if let IrDeclKind::Field { initializer, .. } = &mut self.decls[decl].kind {
                    if *initializer == Some(old) {
                        *initializer = Some(new);
                    }
                }
            }
            IrParent::Unit | IrParent::Detached => {
                panic!("COMPILER BUG: replacing expression with no attached parent")
            }
        }
        self.exprs[new].parent = parent;
        self.exprs[old].parent = IrParent::Detached;
    }

    /// All declarations reachable from the top level, depth first
    pub fn reachable_decls(&self) -> Vec<IrDeclId> {
        let mut result = Vec::new();
        let mut work: Vec<IrDeclId> = self.top_level.iter().rev().copied().collect();
        while let Some(id) = work.pop() {
            result.push(id);
            if let IrDeclKind::Class { members } = &self.decl(id).kind {
                work.extend(members.iter().rev().copied());
            }
        }
        result
    }

    /// Whether any top-level declaration already uses the given name
    pub fn has_top_level_name(&self, name: Symbol) -> bool {
        self.top_level.iter().any(|&id| self.decl(id).name == name)
    }
}
