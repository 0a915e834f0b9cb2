//! Change-impact computation over class snapshots
//!
//! `collect_changes` diffs two snapshots of the same declared class and
//! produces the minimal dirty set: lookup symbols whose reverse-index
//! entries must be reconsidered, dirty class names, and the names that force
//! a full recompile when the change is too structural to express as a
//! symbol-level diff. Soundness and precision pull in opposite directions
//! here: every ABI-relevant change must be reported, and no
//! implementation-only change may be.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sk_snapshot::{ClassSnapshot, MemberSignature};

/// Name of the synthetic lookup symbol recorded at call sites that use a
/// class through function-literal conversion instead of a member reference
pub const SAM_LOOKUP_NAME: &str = "<SAM-CONSTRUCTOR>";

/// Key into the persisted reverse lookup index: a name and the scope it was
/// looked up in
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LookupSymbol {
    /// The looked-up name
    pub name: String,
    /// The fully qualified scope the lookup happened in
    pub scope: String,
}

impl LookupSymbol {
    /// A lookup symbol for `name` in `scope`
    pub fn new(name: &str, scope: &str) -> Self {
        Self {
            name: name.to_owned(),
            scope: scope.to_owned(),
        }
    }
}

/// The result of diffing two snapshots.
///
/// Ordered sets: identical snapshot pairs must produce byte-identical
/// results regardless of hash iteration order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DirtyData {
    /// Lookup symbols whose dependents must be reconsidered
    pub dirty_lookup_symbols: BTreeSet<LookupSymbol>,
    /// Fully qualified names of classes with ABI-relevant changes
    pub dirty_classes_fq_names: BTreeSet<String>,
    /// Fully qualified names whose dependents must be fully recompiled, not
    /// just re-looked-up
    pub force_recompile_fq_names: BTreeSet<String>,
}

impl DirtyData {
    /// Whether nothing downstream needs to be reconsidered
    pub fn is_empty(&self) -> bool {
        self.dirty_lookup_symbols.is_empty()
            && self.dirty_classes_fq_names.is_empty()
            && self.force_recompile_fq_names.is_empty()
    }

    /// The conservative fallback when snapshots cannot be compared at all:
    /// everything depending on the class recompiles.
    pub fn full_invalidation(fq_name: &str) -> Self {
        let mut data = Self::default();
        data.dirty_classes_fq_names.insert(fq_name.to_owned());
        data.force_recompile_fq_names.insert(fq_name.to_owned());
        data
    }
}

/// The caller diffed snapshots of two different declared classes
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot diff snapshot of `{old}` against snapshot of `{new}`")]
pub struct SnapshotMismatch {
    /// Declared name of the old snapshot
    pub old: String,
    /// Declared name of the new snapshot
    pub new: String,
}

/// Diffs two snapshots of the same declared class.
///
/// Member changes key lookup-symbol invalidations by (member name, declaring
/// class); supertype, annotation and inline-body changes force a full
/// recompile of dependents; private-only changes produce an empty result.
pub fn collect_changes(
    old: &ClassSnapshot,
    new: &ClassSnapshot,
) -> Result<DirtyData, SnapshotMismatch> {
    if old.class_fq_name != new.class_fq_name {
        return Err(SnapshotMismatch {
            old: old.class_fq_name.clone(),
            new: new.class_fq_name.clone(),
        });
    }

    let scope = &old.class_fq_name;
    let mut data = DirtyData::default();

    if supertype_set(old) != supertype_set(new) {
        data.force_recompile_fq_names.insert(scope.clone());
    }

    // Annotation semantics are open-ended (the producer records only the
    // ABI-relevant ones), so any change counts as structural.
    if annotation_set(old) != annotation_set(new) {
        data.dirty_classes_fq_names.insert(scope.clone());
        data.force_recompile_fq_names.insert(scope.clone());
    }

    let old_members = member_index(old);
    let new_members = member_index(new);
    let mut changed_names: BTreeSet<&str> = BTreeSet::new();

    for (key, old_member) in &old_members {
        match new_members.get(key) {
            None => {
                changed_names.insert(&old_member.name);
            }
            Some(new_member) if abi_shape(old_member) != abi_shape(new_member) => {
                changed_names.insert(&old_member.name);
            }
            Some(new_member) => {
                // Same signature and modifiers. An inline body is still part
                // of the ABI: dependents inlined the old body.
                if old_member.is_inline && old_member.inline_body_hash != new_member.inline_body_hash
                {
                    changed_names.insert(&old_member.name);
                    data.force_recompile_fq_names.insert(scope.clone());
                }
            }
        }
    }
    for (key, new_member) in &new_members {
        if !old_members.contains_key(key) {
            changed_names.insert(&new_member.name);
        }
    }

    if !changed_names.is_empty() {
        for name in changed_names {
            data.dirty_lookup_symbols.insert(LookupSymbol::new(name, scope));
        }
        if old.is_sam_shaped() || new.is_sam_shaped() {
            data.dirty_lookup_symbols
                .insert(LookupSymbol::new(SAM_LOOKUP_NAME, scope));
        }
        data.dirty_classes_fq_names.insert(scope.clone());
    }

    Ok(data)
}

fn supertype_set(snapshot: &ClassSnapshot) -> BTreeSet<&str> {
    snapshot.supertypes.iter().map(String::as_str).collect()
}

fn annotation_set(snapshot: &ClassSnapshot) -> BTreeSet<&str> {
    snapshot.annotations.iter().map(String::as_str).collect()
}

/// ABI members keyed by (name, descriptor); private members never enter the
/// comparison
fn member_index(snapshot: &ClassSnapshot) -> FxHashMap<(&str, &str), &MemberSignature> {
    snapshot
        .abi_members()
        .map(|member| ((member.name.as_str(), member.descriptor.as_str()), member))
        .collect()
}

/// The modifier bits that downstream code observes through the signature
fn abi_shape(member: &MemberSignature) -> (sk_snapshot::SnapshotVisibility, bool, bool, bool) {
    (
        member.visibility,
        member.is_abstract,
        member.is_inline,
        member.is_const,
    )
}
