//! In-place tree transformation
//!
//! A transformer rewrites nodes as it walks. `transform_expr` returns the
//! node that should stand in the original's place: the original id for "no
//! change", or a replacement allocated in the same unit. The framework
//! splices replacements into the parent's child slot and fixes both parent
//! links, so a transform can never leave a dangling back-reference.

use crate::{IrDeclId, IrDeclKind, IrExprId, IrStmtId, IrStmtKind, IrUnit};

/// Mutating transformer over one unit
pub trait IrTransformer {
    /// Transform the whole unit
    fn transform_unit(&mut self, unit: &mut IrUnit) {
        // Snapshot: transforms may insert new top-level declarations, which
        // are not revisited in this pass.
        let top_level = unit.top_level.clone();
        for decl in top_level {
            self.transform_decl(unit, decl);
        }
    }

    /// Transform a declaration. Default: children only.
    fn transform_decl(&mut self, unit: &mut IrUnit, decl: IrDeclId) {
        self.transform_decl_children(unit, decl);
    }

    /// Transform a declaration's children
    fn transform_decl_children(&mut self, unit: &mut IrUnit, decl: IrDeclId) {
        match unit.decl(decl).kind.clone() {
            IrDeclKind::Function { body, .. } => {
                for stmt in body.into_iter().flatten() {
                    self.transform_stmt(unit, stmt);
                }
            }
            IrDeclKind::Field { initializer, .. } => {
                if let Some(expr) = initializer {
                    let replacement = self.transform_expr(unit, expr);
                    unit.replace_expr(expr, replacement);
                }
            }
            IrDeclKind::Class { members } => {
                for member in members {
                    self.transform_decl(unit, member);
                }
            }
        }
    }

    /// Transform a statement. Default: children only.
    fn transform_stmt(&mut self, unit: &mut IrUnit, stmt: IrStmtId) {
        self.transform_stmt_children(unit, stmt);
    }

    /// Transform a statement's children
    fn transform_stmt_children(&mut self, unit: &mut IrUnit, stmt: IrStmtId) {
        let child = match &unit.stmt(stmt).kind {
            IrStmtKind::Expr(expr) => Some(*expr),
            IrStmtKind::SetField { value, .. } => Some(*value),
            IrStmtKind::Return(value) => *value,
        };
        if let Some(expr) = child {
            let replacement = self.transform_expr(unit, expr);
            unit.replace_expr(expr, replacement);
        }
    }

    /// Transform an expression, returning its replacement (possibly itself)
    fn transform_expr(&mut self, unit: &mut IrUnit, expr: IrExprId) -> IrExprId {
        self.transform_expr_children(unit, expr);
        expr
    }

    /// Transform an expression's children
    fn transform_expr_children(&mut self, unit: &mut IrUnit, expr: IrExprId) {
        if let crate::IrExprKind::Call { args, .. } = &unit.expr(expr).kind {
            for arg in args.clone() {
                let replacement = self.transform_expr(unit, arg);
                unit.replace_expr(arg, replacement);
            }
        }
    }
}
