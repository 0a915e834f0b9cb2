//! Read-only traversal
//!
//! Depth-first, parent-then-children. Default methods recurse; overriding a
//! method and not calling the `walk_` helper skips that subtree. Child
//! traversal is implemented once per variant in the `walk_` functions, never
//! per visitor.

use crate::{IrDeclId, IrDeclKind, IrExprId, IrExprKind, IrStmtId, IrStmtKind, IrUnit};

/// Read-only visitor over one unit
pub trait IrVisitor {
    /// Visit the whole unit
    fn visit_unit(&mut self, unit: &IrUnit) {
        walk_unit(self, unit);
    }

    /// Visit a declaration
    fn visit_decl(&mut self, unit: &IrUnit, decl: IrDeclId) {
        walk_decl(self, unit, decl);
    }

    /// Visit a statement
    fn visit_stmt(&mut self, unit: &IrUnit, stmt: IrStmtId) {
        walk_stmt(self, unit, stmt);
    }

    /// Visit an expression
    fn visit_expr(&mut self, unit: &IrUnit, expr: IrExprId) {
        walk_expr(self, unit, expr);
    }
}

/// Visits every top-level declaration
pub fn walk_unit<V: IrVisitor + ?Sized>(visitor: &mut V, unit: &IrUnit) {
    for &decl in &unit.top_level {
        visitor.visit_decl(unit, decl);
    }
}

/// Visits a declaration's children
pub fn walk_decl<V: IrVisitor + ?Sized>(visitor: &mut V, unit: &IrUnit, decl: IrDeclId) {
    match &unit.decl(decl).kind {
        IrDeclKind::Function { body, .. } => {
            for &stmt in body.iter().flatten() {
                visitor.visit_stmt(unit, stmt);
            }
        }
        IrDeclKind::Field { initializer, .. } => {
            if let Some(expr) = initializer {
                visitor.visit_expr(unit, *expr);
            }
        }
        IrDeclKind::Class { members } => {
            for &member in members {
                visitor.visit_decl(unit, member);
            }
        }
    }
}

/// Visits a statement's children
pub fn walk_stmt<V: IrVisitor + ?Sized>(visitor: &mut V, unit: &IrUnit, stmt: IrStmtId) {
    match &unit.stmt(stmt).kind {
        IrStmtKind::Expr(expr) => visitor.visit_expr(unit, *expr),
        IrStmtKind::SetField { value, .. } => visitor.visit_expr(unit, *value),
        IrStmtKind::Return(value) => {
            if let Some(expr) = value {
                visitor.visit_expr(unit, *expr);
            }
        }
    }
}

/// Visits an expression's children
pub fn walk_expr<V: IrVisitor + ?Sized>(visitor: &mut V, unit: &IrUnit, expr: IrExprId) {
    match &unit.expr(expr).kind {
        IrExprKind::Const(_) | IrExprKind::GetField { .. } => {}
        IrExprKind::Call { args, .. } => {
            for &arg in args {
                visitor.visit_expr(unit, arg);
            }
        }
    }
}
