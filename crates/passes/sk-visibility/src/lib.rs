//! Visibility and accessibility resolution
//!
//! Decides, for a declaration and a use site, whether the use site is
//! permitted to see the declaration. The checker is a pure boolean
//! predicate: it never reports, callers attach diagnostics. Sessions and
//! module graphs are fully built before any check runs, so checks over
//! independent units may run concurrently.

pub mod platform;

pub use platform::{CorePlatform, JvmInteropPlatform, PlatformVisibility};

use sk_decl::{DeclId, DeclKind, DeclOrigin, Declaration, Session, Visibility};
use sk_names::{ClassId, FqName};
use sk_span::FileId;

/// Package holding the runtime's lock intrinsics. Functions here stay
/// `private` in source but are called from generated code outside the
/// module, so the checker admits them across module boundaries.
pub const SYNC_INTRINSICS_PACKAGE: &str = "std.internal.sync";

const SYNC_INTRINSIC_NAMES: [&str; 2] = ["monitor_enter", "monitor_exit"];

/// How a dispatch receiver was written at the use site
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReceiverKind {
    /// An implicit or explicit `this`
    This,
    /// An explicit `super` qualifier
    ExplicitSuper,
    /// Any other receiver expression
    Expression,
}

/// The dispatch receiver at a use site, when the access has one
#[derive(Clone, Debug)]
pub struct DispatchReceiver {
    /// How the receiver was written
    pub kind: ReceiverKind,
    /// The receiver expression's static class type, when class-like
    pub static_type: Option<ClassId>,
}

impl DispatchReceiver {
    /// A plain `this` receiver of the given type
    pub fn this(static_type: ClassId) -> Self {
        Self {
            kind: ReceiverKind::This,
            static_type: Some(static_type),
        }
    }

    /// An ordinary receiver expression of the given static type
    pub fn expression(static_type: ClassId) -> Self {
        Self {
            kind: ReceiverKind::Expression,
            static_type: Some(static_type),
        }
    }
}

/// The file a reference appears in, with its package
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UseSiteFile {
    /// File identity
    pub file: FileId,
    /// The file's declared package
    pub package: FqName,
}

/// The visibility checker, parameterized by a platform hook for
/// visibilities the core language does not define
pub struct VisibilityChecker<'hook> {
    platform: &'hook dyn PlatformVisibility,
}

impl<'hook> VisibilityChecker<'hook> {
    /// A checker using the given platform hook
    pub fn new(platform: &'hook dyn PlatformVisibility) -> Self {
        Self { platform }
    }

    /// Whether `decl` is visible from the given use site.
    ///
    /// `containing_decls` is the chain of declarations enclosing the
    /// reference, in either nesting order; only membership matters here.
    pub fn is_visible(
        &self,
        decl: DeclId,
        session: &Session<'_>,
        use_site_file: &UseSiteFile,
        containing_decls: &[DeclId],
        dispatch_receiver: Option<&DispatchReceiver>,
    ) -> bool {
        let declaration = session.decls.get(decl);

        // A fake override is never more or less visible than its original.
        if let DeclOrigin::FakeOverride { original } = declaration.origin {
            return self.is_visible(
                original,
                session,
                use_site_file,
                containing_decls,
                dispatch_receiver,
            );
        }

        match declaration.visibility {
            Visibility::Internal => {
                declaration.module == session.module
                    || session
                        .modules
                        .grants_friendship(declaration.module, session.module)
            }

            Visibility::Private | Visibility::PrivateToThis => {
                let owner_id = session.decls.owner_class_id(decl);
                if declaration.module == session.module {
                    match owner_id {
                        None => self.is_visible_in_file(declaration, session, use_site_file),
                        Some(_)
                            if matches!(
                                declaration.kind,
                                DeclKind::Constructor {
                                    from_sealed_class: true,
                                    ..
                                }
                            ) =>
                        {
                            // Sealed-class constructors relax file privacy to
                            // the whole package.
                            session.decls.package_of(decl) == use_site_file.package
                        }
                        Some(owner_id) => {
                            self.can_see_private_member_of(containing_decls, &owner_id, session)
                        }
                    }
                } else {
                    is_intrinsic_accessible_from_outside(declaration, session)
                }
            }

            Visibility::Protected => {
                let Some(owner_id) = session.decls.owner_class_id(decl) else {
                    return false;
                };
                self.can_see_protected_member_of(
                    containing_decls,
                    dispatch_receiver,
                    &owner_id,
                    matches!(declaration.kind, DeclKind::SyntheticPropertyAccessor { .. }),
                    session,
                )
            }

            _ => self.platform.check(
                declaration.visibility,
                decl,
                use_site_file,
                containing_decls,
                dispatch_receiver,
                session,
            ),
        }
    }

    /// File-scoped privacy for top-level declarations
    fn is_visible_in_file(
        &self,
        declaration: &Declaration,
        session: &Session<'_>,
        use_site_file: &UseSiteFile,
    ) -> bool {
        let candidate_file = match &declaration.kind {
            DeclKind::Function {
                id,
                is_sam_synthesized: true,
            } => {
                // SAM case: the synthesized callable lives wherever the
                // classifier with the callable's name was declared.
                session
                    .provider
                    .classifier_container_file(&id.sam_synthetic_class_id())
            }
            DeclKind::Class { id, .. } => session.provider.classifier_container_file(id),
            DeclKind::Function { id, .. }
            | DeclKind::Constructor { id, .. }
            | DeclKind::Property { id }
            | DeclKind::SyntheticPropertyAccessor { id } => {
                session.provider.callable_container_file(id)
            }
            DeclKind::Parameter => None,
        };
        candidate_file == Some(use_site_file.file)
    }

    /// Whether any enclosing class of the use site is the owner, unwrapping
    /// companion ownership: a private member of a companion is visible from
    /// the outer class's scope too.
    fn can_see_private_member_of(
        &self,
        containing_decls: &[DeclId],
        owner_id: &ClassId,
        session: &Session<'_>,
    ) -> bool {
        if let Some(companion_owner) = session.owner_if_companion(owner_id) {
            return self.can_see_private_member_of(containing_decls, &companion_owner, session);
        }

        containing_decls.iter().any(|&containing| {
            session
                .decls
                .get(containing)
                .class_id()
                .is_some_and(|class_id| class_id.is_same(owner_id))
        })
    }

    /// The protected rule over the whole enclosing chain. Platform hooks
    /// reuse this for protected-like interop visibilities.
    pub(crate) fn can_see_protected_member_of(
        &self,
        containing_decls: &[DeclId],
        dispatch_receiver: Option<&DispatchReceiver>,
        owner_id: &ClassId,
        is_synthetic_accessor: bool,
        session: &Session<'_>,
    ) -> bool {
        if self.can_see_private_member_of(containing_decls, owner_id, session) {
            return true;
        }

        containing_decls.iter().any(|&containing| {
            session
                .decls
                .get(containing)
                .class_id()
                .is_some_and(|use_site_class| {
                    self.class_can_see_protected(
                        use_site_class,
                        dispatch_receiver,
                        owner_id,
                        is_synthetic_accessor,
                        session,
                    )
                })
        })
    }

    /// The protected rule for one enclosing class
    fn class_can_see_protected(
        &self,
        use_site_class: &ClassId,
        dispatch_receiver: Option<&DispatchReceiver>,
        owner_id: &ClassId,
        is_synthetic_accessor: bool,
        session: &Session<'_>,
    ) -> bool {
        if let Some(receiver_type) = dispatch_receiver.and_then(|recv| recv.static_type.as_ref()) {
            if let Some(companion_owner) = session.owner_if_companion(receiver_type) {
                if is_subclass(use_site_class, &companion_owner, session) {
                    return true;
                }
            }
        }

        if !is_subclass(use_site_class, owner_id, session) {
            return false;
        }

        let receiver_admits = match dispatch_receiver {
            None => true,
            Some(receiver) => match receiver.kind {
                ReceiverKind::This | ReceiverKind::ExplicitSuper => true,
                ReceiverKind::Expression => receiver
                    .static_type
                    .as_ref()
                    // Guards against reaching protected members through an
                    // unrelated subtype of the owner.
                    .is_some_and(|receiver_type| {
                        is_subclass(receiver_type, use_site_class, session)
                    }),
            },
        };
        if receiver_admits {
            return true;
        }

        if is_synthetic_accessor {
            return if session.features.strict_protected_synthetic_accessors {
                use_site_class.package == owner_id.package
            } else {
                true
            };
        }

        false
    }
}

/// Reflexive, deep, interface-aware subclass test
fn is_subclass(class: &ClassId, owner_id: &ClassId, session: &Session<'_>) -> bool {
    if class.is_same(owner_id) {
        return true;
    }
    session
        .supertypes
        .lookup_supertypes(class, true, true)
        .iter()
        .any(|supertype| supertype.is_same(owner_id))
}

/// The fixed allow-list of private library functions callable across module
/// boundaries: the runtime's monitor intrinsics, which codegen calls from
/// generated code.
fn is_intrinsic_accessible_from_outside(declaration: &Declaration, session: &Session<'_>) -> bool {
    if !declaration.is_from_library() {
        return false;
    }
    let DeclKind::Function { id, .. } = &declaration.kind else {
        return false;
    };
    let name = session.interner.resolve(declaration.name);
    id.package.display(session.interner) == SYNC_INTRINSICS_PACKAGE
        && SYNC_INTRINSIC_NAMES.contains(&name)
}
