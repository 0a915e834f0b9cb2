//! Lowering pass framework
//!
//! Passes run once per compilation unit, in a fixed global order; each
//! pass's output is the next pass's input. Distinct units are independent
//! and may be lowered concurrently by the caller. A pass that detects a
//! broken precondition fails fast: the error signals a bug earlier in the
//! pipeline, and the partially mutated tree is dropped rather than handed
//! back.

pub mod binding_check;
pub mod file_initializers;
pub mod intrinsics;

pub use binding_check::BindingCheckPass;
pub use file_initializers::FileInitializersPass;
pub use intrinsics::UnwrapIntrinsicsPass;

use sk_intern::Interner;
use sk_ir::{IrDeclId, IrParent, IrUnit};

/// Fatal lowering failures. These are pipeline bugs, not user errors, and
/// abort the current unit's pipeline entirely.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoweringError {
    /// A pass precondition did not hold
    #[error("invariant violation in pass `{pass}`: {message}")]
    InvariantViolation {
        /// The pass that detected the violation
        pass: &'static str,
        /// What was violated
        message: String,
    },
    /// A symbol reference survived to the final consistency check unbound
    #[error("unresolved reference to `{name}` after lowering")]
    UnresolvedReference {
        /// The referenced name
        name: String,
    },
}

/// Read-only context shared by all passes of one compilation
pub struct LoweringContext<'ctx> {
    /// The session's interner
    pub interner: &'ctx Interner,
}

/// One step of the lowering pipeline
pub trait LoweringPass {
    /// The pass's stable name, used in invariant reports
    fn name(&self) -> &'static str;

    /// Rewrites the unit in place
    fn lower(&self, unit: &mut IrUnit, ctx: &LoweringContext<'_>) -> Result<(), LoweringError>;
}

/// A declaration-level transformation that can insert or delete
/// declarations, not just rewrite 1:1.
pub trait DeclTransformer {
    /// Returns `None` for "no structural change", or the replacement list
    /// for the declaration (empty list deletes it).
    fn transform_flat(
        &self,
        unit: &mut IrUnit,
        decl: IrDeclId,
        ctx: &LoweringContext<'_>,
    ) -> Option<Vec<IrDeclId>>;
}

/// Applies a flat transformer across a unit's top level, splicing
/// replacement lists and fixing parent links
pub fn apply_flat_transform(
    unit: &mut IrUnit,
    transformer: &dyn DeclTransformer,
    ctx: &LoweringContext<'_>,
) {
    let mut new_top_level = Vec::with_capacity(unit.top_level.len());
    for decl in unit.top_level.clone() {
        match transformer.transform_flat(unit, decl, ctx) {
            None => new_top_level.push(decl),
            Some(replacements) => {
                if !replacements.contains(&decl) {
                    unit.decl_mut(decl).parent = IrParent::Detached;
                }
                for replacement in replacements {
                    unit.decl_mut(replacement).parent = IrParent::Unit;
                    new_top_level.push(replacement);
                }
            }
        }
    }
    unit.top_level = new_top_level;
}

/// The fixed-order pipeline for one compilation
pub struct Pipeline {
    passes: Vec<Box<dyn LoweringPass>>,
}

impl Pipeline {
    /// A pipeline with the given passes, applied in order
    pub fn new(passes: Vec<Box<dyn LoweringPass>>) -> Self {
        Self { passes }
    }

    /// The standard middle-end ordering: intrinsic unwrapping, file
    /// initializers, then the final binding consistency gate
    pub fn standard(interner: &Interner) -> Self {
        Self::new(vec![
            Box::new(UnwrapIntrinsicsPass::standard(interner)),
            Box::new(FileInitializersPass),
            Box::new(BindingCheckPass),
        ])
    }

    /// Runs every pass over the unit. Consumes the unit so that a failed
    /// run cannot leak a partially mutated tree back to the caller.
    pub fn run(
        &self,
        mut unit: IrUnit,
        ctx: &LoweringContext<'_>,
    ) -> Result<IrUnit, LoweringError> {
        for pass in &self.passes {
            pass.lower(&mut unit, ctx)?;
        }
        Ok(unit)
    }
}
