//! Platform visibility hooks
//!
//! Visibilities the core language does not define (package-private,
//! protected-static) come from platform interop. The checker delegates them
//! here; the default hook admits everything, which is the right answer for
//! the pure core language where the only visibility reaching this branch is
//! public.

use sk_decl::{DeclId, DeclKind, Session, Visibility};

use crate::{DispatchReceiver, UseSiteFile, VisibilityChecker};

/// Pluggable check for platform-specific visibilities
pub trait PlatformVisibility {
    /// Whether the declaration is visible from the use site under platform
    /// rules
    fn check(
        &self,
        visibility: Visibility,
        decl: DeclId,
        use_site_file: &UseSiteFile,
        containing_decls: &[DeclId],
        dispatch_receiver: Option<&DispatchReceiver>,
        session: &Session<'_>,
    ) -> bool;
}

/// The core-language hook: no platform visibilities exist, everything that
/// reaches this branch is visible
#[derive(Default)]
pub struct CorePlatform;

impl PlatformVisibility for CorePlatform {
    fn check(
        &self,
        _visibility: Visibility,
        _decl: DeclId,
        _use_site_file: &UseSiteFile,
        _containing_decls: &[DeclId],
        _dispatch_receiver: Option<&DispatchReceiver>,
        _session: &Session<'_>,
    ) -> bool {
        true
    }
}

/// JVM-interop rules for package-private and protected-static members
#[derive(Default)]
pub struct JvmInteropPlatform;

impl PlatformVisibility for JvmInteropPlatform {
    fn check(
        &self,
        visibility: Visibility,
        decl: DeclId,
        use_site_file: &UseSiteFile,
        containing_decls: &[DeclId],
        dispatch_receiver: Option<&DispatchReceiver>,
        session: &Session<'_>,
    ) -> bool {
        match visibility {
            Visibility::PackagePrivate => {
                session.decls.package_of(decl) == use_site_file.package
            }
            Visibility::ProtectedStatic => {
                if session.decls.package_of(decl) == use_site_file.package {
                    return true;
                }
                let Some(owner_id) = session.decls.owner_class_id(decl) else {
                    return false;
                };
                let declaration = session.decls.get(decl);
                // Outside the package the ordinary protected rule applies.
                VisibilityChecker::new(self).can_see_protected_member_of(
                    containing_decls,
                    dispatch_receiver,
                    &owner_id,
                    matches!(declaration.kind, DeclKind::SyntheticPropertyAccessor { .. }),
                    session,
                )
            }
            _ => true,
        }
    }
}
