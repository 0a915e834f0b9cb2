//! Binary-interface snapshots of compiled classes
//!
//! A snapshot is an immutable structural digest of a compiled class: its
//! name, supertypes, ABI-relevant member signatures and annotations. The
//! snapshot producer (the build tool's artifact reader) builds these from
//! compiled output; this crate only models the result, never raw bytes.
//! Names are plain strings here because snapshots outlive any one compiler
//! session and its interner.

use serde::{Deserialize, Serialize};

/// What kind of class-like declaration a snapshot describes
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SnapshotClassKind {
    /// A regular class
    Class,
    /// An interface
    Interface,
    /// A singleton object
    Object,
    /// An enum class
    Enum,
}

/// Visibility recorded in a compiled member's signature
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SnapshotVisibility {
    /// Visible everywhere
    Public,
    /// Visible in the declaring module and its friends
    Internal,
    /// Visible in subclasses
    Protected,
    /// Implementation detail, not part of the ABI
    Private,
}

/// One ABI-relevant member signature
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemberSignature {
    /// Declared name
    pub name: String,
    /// Type descriptor (parameter and return types, encoded by the producer)
    pub descriptor: String,
    /// Declared visibility
    pub visibility: SnapshotVisibility,
    /// Whether the member is abstract
    pub is_abstract: bool,
    /// Whether the member is inline (its body is part of the ABI)
    pub is_inline: bool,
    /// Whether the member is a compile-time constant
    pub is_const: bool,
    /// Hash of the inline body, present iff `is_inline`
    pub inline_body_hash: Option<u64>,
}

impl MemberSignature {
    /// A plain public method signature
    pub fn method(name: &str, descriptor: &str) -> Self {
        Self {
            name: name.to_owned(),
            descriptor: descriptor.to_owned(),
            visibility: SnapshotVisibility::Public,
            is_abstract: false,
            is_inline: false,
            is_const: false,
            inline_body_hash: None,
        }
    }

    /// Whether this member participates in the binary interface at all.
    /// Private members never do; their changes are invisible downstream.
    pub fn is_abi_relevant(&self) -> bool {
        self.visibility != SnapshotVisibility::Private
    }
}

/// Structural digest of one compiled class
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClassSnapshot {
    /// Fully qualified class name
    pub class_fq_name: String,
    /// Kind of the class-like declaration
    pub kind: SnapshotClassKind,
    /// Fully qualified supertype names, as declared
    pub supertypes: Vec<String>,
    /// Member signatures, ABI-relevant and otherwise
    pub members: Vec<MemberSignature>,
    /// ABI-relevant annotation names
    pub annotations: Vec<String>,
}

impl ClassSnapshot {
    /// The members that participate in the binary interface
    pub fn abi_members(&self) -> impl Iterator<Item = &MemberSignature> {
        self.members.iter().filter(|member| member.is_abi_relevant())
    }

    /// Whether this class is shaped for function-literal conversion: an
    /// interface with exactly one abstract member. Call sites relying on
    /// that conversion look the class up through a synthetic SAM symbol
    /// rather than an ordinary member name.
    pub fn is_sam_shaped(&self) -> bool {
        self.kind == SnapshotClassKind::Interface
            && self.members.iter().filter(|member| member.is_abstract).count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abstract_method(name: &str) -> MemberSignature {
        MemberSignature {
            is_abstract: true,
            ..MemberSignature::method(name, "()V")
        }
    }

    #[test]
    fn test_sam_shape_requires_interface_with_one_abstract_member() {
        let mut snapshot = ClassSnapshot {
            class_fq_name: "app.Runnable".to_owned(),
            kind: SnapshotClassKind::Interface,
            supertypes: Vec::new(),
            members: vec![abstract_method("run")],
            annotations: Vec::new(),
        };
        assert!(snapshot.is_sam_shaped());

        snapshot.members.push(abstract_method("stop"));
        assert!(!snapshot.is_sam_shaped());

        snapshot.members.pop();
        snapshot.kind = SnapshotClassKind::Class;
        assert!(!snapshot.is_sam_shaped());
    }

    #[test]
    fn test_private_members_are_not_abi_relevant() {
        let snapshot = ClassSnapshot {
            class_fq_name: "app.Service".to_owned(),
            kind: SnapshotClassKind::Class,
            supertypes: Vec::new(),
            members: vec![
                MemberSignature::method("start", "()V"),
                MemberSignature {
                    visibility: SnapshotVisibility::Private,
                    ..MemberSignature::method("helper", "()V")
                },
            ],
            annotations: Vec::new(),
        };
        let names: Vec<&str> = snapshot.abi_members().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["start"]);
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = ClassSnapshot {
            class_fq_name: "app.Config".to_owned(),
            kind: SnapshotClassKind::Object,
            supertypes: vec!["app.Base".to_owned()],
            members: vec![MemberSignature {
                is_const: true,
                ..MemberSignature::method("VERSION", "I")
            }],
            annotations: vec!["app.Stable".to_owned()],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: ClassSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
