//! Intrinsic call unwrapping
//!
//! Calls to compiler intrinsics that merely tag their argument (freezing
//! hints, identity casts) unwrap to the argument itself. This is the one
//! standard pass that deliberately changes a node's static contract: the
//! call's type is replaced by the argument's, and the splice updates the
//! consumer's child slot in the same step.

use rustc_hash::FxHashSet;
use sk_intern::{Interner, Symbol};
use sk_ir::{IrExprId, IrExprKind, IrTarget, IrTransformer, IrUnit};

use crate::{LoweringContext, LoweringError, LoweringPass};

/// Intrinsic names unwrapped by [`UnwrapIntrinsicsPass::standard`]
pub const STANDARD_UNWRAPPED_INTRINSICS: [&str; 2] = ["identity", "assume_frozen"];

/// The intrinsic-unwrap lowering
pub struct UnwrapIntrinsicsPass {
    intrinsics: FxHashSet<Symbol>,
}

impl UnwrapIntrinsicsPass {
    /// A pass unwrapping the given intrinsic names
    pub fn new(intrinsics: FxHashSet<Symbol>) -> Self {
        Self { intrinsics }
    }

    /// The standard intrinsic set
    pub fn standard(interner: &Interner) -> Self {
        Self::new(
            STANDARD_UNWRAPPED_INTRINSICS
                .iter()
                .map(|name| interner.intern(name))
                .collect(),
        )
    }
}

impl LoweringPass for UnwrapIntrinsicsPass {
    fn name(&self) -> &'static str {
        "unwrap-intrinsics"
    }

    fn lower(&self, unit: &mut IrUnit, _ctx: &LoweringContext<'_>) -> Result<(), LoweringError> {
        let mut transformer = Unwrapper {
            intrinsics: &self.intrinsics,
            error: None,
        };
        transformer.transform_unit(unit);
        match transformer.error {
            Some(message) => Err(LoweringError::InvariantViolation {
                pass: self.name(),
                message,
            }),
            None => Ok(()),
        }
    }
}

struct Unwrapper<'pass> {
    intrinsics: &'pass FxHashSet<Symbol>,
    error: Option<String>,
}

impl Unwrapper<'_> {
    fn callee_name(&self, unit: &IrUnit, expr: IrExprId) -> Option<Symbol> {
        let IrExprKind::Call { callee, .. } = &unit.expr(expr).kind else {
            return None;
        };
        let name = match callee {
            IrTarget::Bound(decl) => unit.decl(*decl).name,
            IrTarget::Unbound(name) => *name,
        };
        self.intrinsics.contains(&name).then_some(name)
    }
}

impl IrTransformer for Unwrapper<'_> {
    fn transform_expr(&mut self, unit: &mut IrUnit, expr: IrExprId) -> IrExprId {
        self.transform_expr_children(unit, expr);
        if self.callee_name(unit, expr).is_none() {
            return expr;
        }
        let IrExprKind::Call { args, .. } = &unit.expr(expr).kind else {
            return expr;
        };
        if args.len() != 1 {
            self.error = Some(format!(
                "intrinsic call with {} arguments, expected exactly 1",
                args.len()
            ));
            return expr;
        }
        args[0]
    }
}
