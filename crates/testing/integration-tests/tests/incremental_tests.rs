//! Change-impact scenarios over class snapshots

use std::collections::BTreeSet;

use sk_dirty::{collect_changes, DirtyData, LookupSymbol, SAM_LOOKUP_NAME};
use sk_snapshot::{ClassSnapshot, MemberSignature, SnapshotClassKind, SnapshotVisibility};

fn listener(member_name: &str) -> ClassSnapshot {
    ClassSnapshot {
        class_fq_name: "app.events.Listener".to_owned(),
        kind: SnapshotClassKind::Interface,
        supertypes: vec!["lang.Any".to_owned()],
        members: vec![MemberSignature {
            is_abstract: true,
            ..MemberSignature::method(member_name, "()V")
        }],
        annotations: Vec::new(),
    }
}

#[test]
fn test_renaming_sam_member_invalidates_exact_symbol_set() {
    let old = listener("publicMethod");
    let new = listener("changedPublicMethod");

    let data = collect_changes(&old, &new).unwrap();

    let scope = "app.events.Listener";
    let expected: BTreeSet<LookupSymbol> = [
        LookupSymbol::new(SAM_LOOKUP_NAME, scope),
        LookupSymbol::new("publicMethod", scope),
        LookupSymbol::new("changedPublicMethod", scope),
    ]
    .into();
    assert_eq!(data.dirty_lookup_symbols, expected);
    assert_eq!(data.dirty_classes_fq_names, BTreeSet::from([scope.to_owned()]));
    assert!(data.force_recompile_fq_names.is_empty());
}

#[test]
fn test_private_implementation_churn_never_propagates() {
    let mut old = listener("onEvent");
    old.members.push(MemberSignature {
        visibility: SnapshotVisibility::Private,
        ..MemberSignature::method("dispatch", "()V")
    });
    let mut new = listener("onEvent");
    new.members.push(MemberSignature {
        visibility: SnapshotVisibility::Private,
        ..MemberSignature::method("dispatch", "(Z)V")
    });

    let data = collect_changes(&old, &new).unwrap();
    assert!(data.is_empty());
}

#[test]
fn test_identical_inputs_give_reproducible_output() {
    let old = listener("publicMethod");
    let new = listener("changedPublicMethod");

    let first = collect_changes(&old, &new).unwrap();
    let second = collect_changes(&old, &new).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_supertype_change_forces_recompile_independent_of_members() {
    let old = listener("onEvent");
    let mut new = listener("onEvent");
    new.supertypes.push("app.events.Closeable".to_owned());

    let data = collect_changes(&old, &new).unwrap();
    assert_eq!(
        data.force_recompile_fq_names,
        BTreeSet::from(["app.events.Listener".to_owned()])
    );
    assert!(data.dirty_lookup_symbols.is_empty());
}

#[test]
fn test_dirty_data_survives_persistence() {
    let old = listener("publicMethod");
    let new = listener("changedPublicMethod");
    let data = collect_changes(&old, &new).unwrap();

    let json = serde_json::to_string(&data).unwrap();
    let parsed: DirtyData = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, data);
}

#[test]
fn test_incomparable_snapshot_degrades_to_full_invalidation() {
    let old = listener("onEvent");
    let renamed_class = ClassSnapshot {
        class_fq_name: "app.events.Handler".to_owned(),
        ..listener("onEvent")
    };

    // The engine refuses the diff; the caller falls back conservatively.
    let fallback = match collect_changes(&old, &renamed_class) {
        Err(_) => DirtyData::full_invalidation(&old.class_fq_name),
        Ok(_) => panic!("expected a snapshot mismatch"),
    };
    assert!(fallback
        .force_recompile_fq_names
        .contains("app.events.Listener"));
}
