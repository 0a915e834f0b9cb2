//! File initializer synthesis
//!
//! Scans a unit's top-level fields for non-constant initializers and moves
//! them into up to two synthesized per-file initializer functions: one for
//! shared global storage, one for thread-local storage. Every function body
//! in the unit then calls the synthesized initializers first, global before
//! thread-local: a thread-local top-level field may reference a global, but
//! not vice versa.
//!
//! The delegated-property reflection table is special-cased: when it is the
//! only non-constant field in the unit, its initialization folds into a
//! single module-level initializer instead of a whole file-level one.

use sk_decl::Visibility;
use sk_ir::{
    ConstValue, IrDecl, IrDeclId, IrDeclKind, IrExpr, IrExprKind, IrOrigin, IrParent, IrStmt,
    IrStmtKind, IrTarget, IrType, IrUnit, StorageKind,
};
use sk_span::Span;

use crate::{LoweringContext, LoweringError, LoweringPass};

/// Name of the synthesized global initializer
pub const GLOBAL_INIT_NAME: &str = "$init_global";
/// Name of the synthesized thread-local initializer
pub const THREAD_LOCAL_INIT_NAME: &str = "$init_thread_local";
/// Name of the synthesized module-level deferred-table initializer
pub const DEFERRED_INIT_NAME: &str = "$init_deferred";

/// The file-initializers lowering
pub struct FileInitializersPass;

impl LoweringPass for FileInitializersPass {
    fn name(&self) -> &'static str {
        "file-initializers"
    }

    fn lower(&self, unit: &mut IrUnit, ctx: &LoweringContext<'_>) -> Result<(), LoweringError> {
        let mut global_fields = Vec::new();
        let mut thread_local_fields = Vec::new();
        let mut deferred_table: Option<IrDeclId> = None;

        for &decl in &unit.top_level {
            let node = unit.decl(decl);
            let IrDeclKind::Field { storage, initializer: Some(init) } = &node.kind else {
                continue;
            };
            if matches!(unit.expr(*init).kind, IrExprKind::Const(_)) {
                continue;
            }
            if node.origin == IrOrigin::DeferredPropertyTable {
                if deferred_table.is_some() {
                    return Err(LoweringError::InvariantViolation {
                        pass: self.name(),
                        message: "expected at most one deferred-property table field".to_owned(),
                    });
                }
                deferred_table = Some(decl);
                continue;
            }
            match storage {
                StorageKind::SharedGlobal => global_fields.push(decl),
                // Unmarked fields are only main-thread visible, so they
                // initialize with the thread-local group.
                StorageKind::ThreadLocal | StorageKind::Default => {
                    thread_local_fields.push(decl);
                }
            }
        }

        if global_fields.is_empty() && thread_local_fields.is_empty() {
            if let Some(field) = deferred_table {
                self.fold_deferred_table(unit, ctx, field)?;
            }
            return Ok(());
        }

        // The deferred table initializes with the globals.
        if let Some(field) = deferred_table {
            global_fields.insert(0, field);
        }

        // Collect injection targets before synthesizing anything, so the
        // initializers themselves receive no injected calls.
        let targets: Vec<IrDeclId> = unit
            .reachable_decls()
            .into_iter()
            .filter(|&decl| {
                matches!(
                    unit.decl(decl).kind,
                    IrDeclKind::Function { body: Some(_), .. }
                )
            })
            .collect();

        let global_init = if global_fields.is_empty() {
            None
        } else {
            Some(self.build_init_function(
                unit,
                ctx,
                GLOBAL_INIT_NAME,
                IrOrigin::FileGlobalInitializer,
                &global_fields,
            )?)
        };
        let thread_local_init = if thread_local_fields.is_empty() {
            None
        } else {
            let origin = if global_init.is_some() {
                IrOrigin::FileThreadLocalInitializer
            } else {
                IrOrigin::FileStandaloneThreadLocalInitializer
            };
            Some(self.build_init_function(
                unit,
                ctx,
                THREAD_LOCAL_INIT_NAME,
                origin,
                &thread_local_fields,
            )?)
        };

        for target in targets {
            // Insert thread-local first, then global at the same position,
            // so the global call ends up ahead of it.
            if let Some(init) = thread_local_init {
                inject_initializer_call(unit, target, init);
            }
            if let Some(init) = global_init {
                inject_initializer_call(unit, target, init);
            }
        }

        Ok(())
    }
}

impl FileInitializersPass {
    /// Builds one initializer function containing a `SetField` per field,
    /// moving each field's initializer into it, and inserts the function at
    /// the top of the unit
    fn build_init_function(
        &self,
        unit: &mut IrUnit,
        ctx: &LoweringContext<'_>,
        name: &str,
        origin: IrOrigin,
        fields: &[IrDeclId],
    ) -> Result<IrDeclId, LoweringError> {
        let name = ctx.interner.intern(name);
        if unit.has_top_level_name(name) {
            return Err(LoweringError::InvariantViolation {
                pass: self.name(),
                message: format!(
                    "synthesized initializer name `{}` collides in unit",
                    ctx.interner.resolve(name)
                ),
            });
        }

        let function = unit.alloc_decl(IrDecl {
            name,
            span: Span::SYNTHETIC,
            parent: IrParent::Detached,
            origin,
            visibility: Visibility::Private,
            kind: IrDeclKind::Function {
                params: vec![ctx.interner.intern("is_main_thread")],
                body: Some(Vec::new()),
            },
        });

        for &field in fields {
            let init = unit
                .take_field_initializer(field)
                .unwrap_or_else(|| panic!("COMPILER BUG: collected field lost its initializer"));
            let stmt = unit.alloc_stmt(IrStmt {
                span: Span::SYNTHETIC,
                parent: IrParent::Detached,
                kind: IrStmtKind::SetField {
                    field: IrTarget::Bound(field),
                    value: init,
                },
            });
            unit.attach_expr_to_stmt(init, stmt);
            unit.push_body_stmt(function, stmt);
        }

        unit.insert_top_level(0, function);
        Ok(function)
    }

    /// The single-deferred-table fast path: one module-level initializer
    /// appended to the unit, no per-function call injection
    fn fold_deferred_table(
        &self,
        unit: &mut IrUnit,
        ctx: &LoweringContext<'_>,
        field: IrDeclId,
    ) -> Result<(), LoweringError> {
        let name = ctx.interner.intern(DEFERRED_INIT_NAME);
        if unit.has_top_level_name(name) {
            return Err(LoweringError::InvariantViolation {
                pass: self.name(),
                message: "deferred-table initializer already synthesized for unit".to_owned(),
            });
        }

        let span = unit.decl(field).span;
        let init = unit
            .take_field_initializer(field)
            .unwrap_or_else(|| panic!("COMPILER BUG: deferred table lost its initializer"));

        let function = unit.alloc_decl(IrDecl {
            name,
            span,
            parent: IrParent::Detached,
            origin: IrOrigin::ModuleDeferredInitializer,
            visibility: Visibility::Private,
            kind: IrDeclKind::Function {
                params: Vec::new(),
                body: Some(Vec::new()),
            },
        });
        let stmt = unit.alloc_stmt(IrStmt {
            span: Span::SYNTHETIC,
            parent: IrParent::Detached,
            kind: IrStmtKind::SetField {
                field: IrTarget::Bound(field),
                value: init,
            },
        });
        unit.attach_expr_to_stmt(init, stmt);
        unit.push_body_stmt(function, stmt);
        unit.push_top_level(function);
        Ok(())
    }
}

/// Prepends `call $init(false)` to the target function's body
fn inject_initializer_call(unit: &mut IrUnit, target: IrDeclId, initializer: IrDeclId) {
    let arg = unit.alloc_expr(IrExpr {
        span: Span::SYNTHETIC,
        parent: IrParent::Detached,
        ty: IrType::Bool,
        kind: IrExprKind::Const(ConstValue::Bool(false)),
    });
    let call = unit.alloc_expr(IrExpr {
        span: Span::SYNTHETIC,
        parent: IrParent::Detached,
        ty: IrType::Unit,
        kind: IrExprKind::Call {
            callee: IrTarget::Bound(initializer),
            args: vec![arg],
        },
    });
    unit.expr_mut(arg).parent = IrParent::Expr(call);
    let stmt = unit.alloc_stmt(IrStmt {
        span: Span::SYNTHETIC,
        parent: IrParent::Detached,
        kind: IrStmtKind::Expr(call),
    });
    unit.attach_expr_to_stmt(call, stmt);
    unit.insert_body_stmt(target, 0, stmt);
}
