//! Final binding consistency check
//!
//! Earlier passes may leave a reference unbound only when a later pass is
//! documented to bind it. This pass closes every pipeline: any reference
//! still unbound here is a bug in a prior pass and aborts the unit.

use sk_ir::{visit, IrExprId, IrStmtId, IrStmtKind, IrTarget, IrUnit, IrVisitor};

use crate::{LoweringContext, LoweringError, LoweringPass};

/// The pipeline's closing consistency gate
pub struct BindingCheckPass;

impl LoweringPass for BindingCheckPass {
    fn name(&self) -> &'static str {
        "binding-check"
    }

    fn lower(&self, unit: &mut IrUnit, ctx: &LoweringContext<'_>) -> Result<(), LoweringError> {
        let mut check = Check { unbound: None };
        check.visit_unit(unit);
        match check.unbound {
            Some(target) => {
                let IrTarget::Unbound(name) = target else {
                    panic!("COMPILER BUG: binding check recorded a bound target")
                };
                Err(LoweringError::UnresolvedReference {
                    name: ctx.interner.resolve(name).to_owned(),
                })
            }
            None => Ok(()),
        }
    }
}

struct Check {
    unbound: Option<IrTarget>,
}

impl Check {
    fn note(&mut self, target: IrTarget) {
        if self.unbound.is_none() && matches!(target, IrTarget::Unbound(_)) {
            self.unbound = Some(target);
        }
    }
}

impl IrVisitor for Check {
    fn visit_stmt(&mut self, unit: &IrUnit, stmt: IrStmtId) {
        if let IrStmtKind::SetField { field, .. } = &unit.stmt(stmt).kind {
            self.note(*field);
        }
        visit::walk_stmt(self, unit, stmt);
    }

    fn visit_expr(&mut self, unit: &IrUnit, expr: IrExprId) {
        match &unit.expr(expr).kind {
            sk_ir::IrExprKind::GetField { field } => self.note(*field),
            sk_ir::IrExprKind::Call { callee, .. } => self.note(*callee),
            sk_ir::IrExprKind::Const(_) => {}
        }
        visit::walk_expr(self, unit, expr);
    }
}
