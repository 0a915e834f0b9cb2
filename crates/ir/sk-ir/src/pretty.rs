//! Structural pretty printer for snapshot tests

use sk_intern::Interner;

use crate::{
    ConstValue, IrDeclId, IrDeclKind, IrExprId, IrExprKind, IrStmtId, IrStmtKind, IrTarget, IrUnit,
};

/// Renders the unit's reachable structure, one node per line
pub fn print_unit(unit: &IrUnit, interner: &Interner) -> String {
    let mut out = String::new();
    out.push_str(&format!("unit {}\n", unit.package.display(interner)));
    for &decl in &unit.top_level {
        print_decl(unit, interner, decl, 1, &mut out);
    }
    out
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn print_decl(unit: &IrUnit, interner: &Interner, decl: IrDeclId, depth: usize, out: &mut String) {
    let node = unit.decl(decl);
    indent(depth, out);
    match &node.kind {
        IrDeclKind::Function { params, body } => {
            out.push_str(&format!(
                "fn {}({}) [{:?}]\n",
                interner.resolve(node.name),
                params
                    .iter()
                    .map(|param| interner.resolve(*param))
                    .collect::<Vec<_>>()
                    .join(", "),
                node.origin,
            ));
            for &stmt in body.iter().flatten() {
                print_stmt(unit, interner, stmt, depth + 1, out);
            }
        }
        IrDeclKind::Field { storage, initializer } => {
            out.push_str(&format!(
                "field {} [{storage:?}]\n",
                interner.resolve(node.name)
            ));
            if let Some(expr) = initializer {
                print_expr(unit, interner, *expr, depth + 1, out);
            }
        }
        IrDeclKind::Class { members } => {
            out.push_str(&format!("class {}\n", interner.resolve(node.name)));
            for &member in members {
                print_decl(unit, interner, member, depth + 1, out);
            }
        }
    }
}

fn print_stmt(unit: &IrUnit, interner: &Interner, stmt: IrStmtId, depth: usize, out: &mut String) {
    let node = unit.stmt(stmt);
    match &node.kind {
        IrStmtKind::Expr(expr) => print_expr(unit, interner, *expr, depth, out),
        IrStmtKind::SetField { field, value } => {
            indent(depth, out);
            out.push_str(&format!("set {}\n", target_name(unit, interner, *field)));
            print_expr(unit, interner, *value, depth + 1, out);
        }
        IrStmtKind::Return(value) => {
            indent(depth, out);
            out.push_str("return\n");
            if let Some(expr) = value {
                print_expr(unit, interner, *expr, depth + 1, out);
            }
        }
    }
}

fn print_expr(unit: &IrUnit, interner: &Interner, expr: IrExprId, depth: usize, out: &mut String) {
    let node = unit.expr(expr);
    indent(depth, out);
    match &node.kind {
        IrExprKind::Const(value) => {
            let rendered = match value {
                ConstValue::Unit => "unit".to_owned(),
                ConstValue::Bool(value) => value.to_string(),
                ConstValue::Int(value) => value.to_string(),
                ConstValue::Str(value) => format!("{value:?}"),
            };
            out.push_str(&format!("const {rendered}\n"));
        }
        IrExprKind::GetField { field } => {
            out.push_str(&format!("get {}\n", target_name(unit, interner, *field)));
        }
        IrExprKind::Call { callee, args } => {
            out.push_str(&format!("call {}\n", target_name(unit, interner, *callee)));
            for &arg in args {
                print_expr(unit, interner, arg, depth + 1, out);
            }
        }
    }
}

fn target_name(unit: &IrUnit, interner: &Interner, target: IrTarget) -> String {
    match target {
        IrTarget::Bound(decl) => interner.resolve(unit.decl(decl).name).to_owned(),
        IrTarget::Unbound(name) => format!("?{}", interner.resolve(name)),
    }
}
