//! End-to-end lowering pipeline scenarios

use expect_test::expect;
use sk_decl::Visibility;
use sk_intern::Interner;
use sk_ir::{
    pretty, ConstValue, IrDecl, IrDeclId, IrDeclKind, IrExpr, IrExprId, IrExprKind, IrOrigin,
    IrParent, IrStmt, IrStmtKind, IrTarget, IrType, IrUnit, StorageKind,
};
use sk_lower::{LoweringContext, LoweringError, Pipeline};
use sk_names::FqName;
use sk_span::{FileId, Span};

fn function(unit: &mut IrUnit, interner: &Interner, name: &str) -> IrDeclId {
    let func = unit.alloc_decl(IrDecl {
        name: interner.intern(name),
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        origin: IrOrigin::Source,
        visibility: Visibility::Public,
        kind: IrDeclKind::Function {
            params: Vec::new(),
            body: Some(Vec::new()),
        },
    });
    unit.push_top_level(func);
    func
}

fn global_field(
    unit: &mut IrUnit,
    interner: &Interner,
    name: &str,
    initializer: IrExprId,
) -> IrDeclId {
    let field = unit.alloc_decl(IrDecl {
        name: interner.intern(name),
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        origin: IrOrigin::Source,
        visibility: Visibility::Private,
        kind: IrDeclKind::Field {
            storage: StorageKind::SharedGlobal,
            initializer: Some(initializer),
        },
    });
    unit.expr_mut(initializer).parent = IrParent::Decl(field);
    unit.push_top_level(field);
    field
}

#[test]
fn test_pipeline_unwraps_intrinsics_before_initializer_synthesis() {
    let interner = Interner::new();
    let mut unit = IrUnit::new(FileId(0), FqName::parse("app.cache", &interner));

    let compute = function(&mut unit, &interner, "compute");

    // `cache` needs a real initializer call; `limit` is a constant wrapped
    // in a freezing hint, which must unwrap to a constant and synthesize
    // nothing.
    let cache_init = unit.alloc_expr(IrExpr {
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        ty: IrType::Int,
        kind: IrExprKind::Call {
            callee: IrTarget::Bound(compute),
            args: Vec::new(),
        },
    });
    global_field(&mut unit, &interner, "cache", cache_init);

    let wrapped = unit.alloc_expr(IrExpr {
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        ty: IrType::Int,
        kind: IrExprKind::Const(ConstValue::Int(64)),
    });
    let hint = unit.alloc_expr(IrExpr {
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        ty: IrType::Int,
        kind: IrExprKind::Call {
            callee: IrTarget::Unbound(interner.intern("assume_frozen")),
            args: vec![wrapped],
        },
    });
    unit.expr_mut(wrapped).parent = IrParent::Expr(hint);
    global_field(&mut unit, &interner, "limit", hint);

    let ctx = LoweringContext {
        interner: &interner,
    };
    let lowered = Pipeline::standard(&interner).run(unit, &ctx).unwrap();

    expect![[r#"
        unit app.cache
          fn $init_global(is_main_thread) [FileGlobalInitializer]
            set cache
              call compute
          fn compute() [Source]
            call $init_global
              const false
          field cache [SharedGlobal]
          field limit [SharedGlobal]
            const 64
    "#]]
    .assert_eq(&pretty::print_unit(&lowered, &interner));
}

#[test]
fn test_pipeline_rejects_unit_with_unresolved_reference() {
    let interner = Interner::new();
    let mut unit = IrUnit::new(FileId(0), FqName::parse("app", &interner));

    let call = unit.alloc_expr(IrExpr {
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        ty: IrType::Unit,
        kind: IrExprKind::Call {
            callee: IrTarget::Unbound(interner.intern("undefined_helper")),
            args: Vec::new(),
        },
    });
    let stmt = unit.alloc_stmt(IrStmt {
        span: Span::new(0, 1),
        parent: IrParent::Detached,
        kind: IrStmtKind::Expr(call),
    });
    unit.attach_expr_to_stmt(call, stmt);
    let main = function(&mut unit, &interner, "main");
    unit.push_body_stmt(main, stmt);

    let ctx = LoweringContext {
        interner: &interner,
    };
    let result = Pipeline::standard(&interner).run(unit, &ctx);
    match result {
        Err(LoweringError::UnresolvedReference { name }) => assert_eq!(name, "undefined_helper"),
        other => panic!("expected unresolved reference, got {other:?}"),
    }
}
