//! Cross-module visibility scenarios

use integration_tests::TestWorld;
use sk_decl::Visibility;
use sk_span::FileId;
use sk_visibility::{CorePlatform, DispatchReceiver, JvmInteropPlatform, VisibilityChecker};

const CORE: CorePlatform = CorePlatform;
const JVM: JvmInteropPlatform = JvmInteropPlatform;

#[test]
fn test_friend_module_sees_internal_api_surface() {
    let mut world = TestWorld::new();
    let core = world.module("core");
    let plugins = world.module("plugins");
    let thirdparty = world.module("thirdparty");
    world.modules.declare_friend(core, plugins);

    let (api_decl, api) = world.class(core, "core.api", "Registry", FileId(0));
    let register = world.member_fn(core, &api, api_decl, "register", Visibility::Internal);
    let lookup = world.member_fn(core, &api, api_decl, "lookup", Visibility::Public);

    let checker = VisibilityChecker::new(&CORE);
    let plugin_file = world.file(FileId(10), "plugins");
    let thirdparty_file = world.file(FileId(20), "thirdparty");

    let from_plugins = world.session(plugins);
    assert!(checker.is_visible(register, &from_plugins, &plugin_file, &[], None));
    assert!(checker.is_visible(lookup, &from_plugins, &plugin_file, &[], None));

    let from_thirdparty = world.session(thirdparty);
    assert!(!checker.is_visible(register, &from_thirdparty, &thirdparty_file, &[], None));
    assert!(checker.is_visible(lookup, &from_thirdparty, &thirdparty_file, &[], None));
}

#[test]
fn test_protected_member_across_modules_through_hierarchy() {
    let mut world = TestWorld::new();
    let core = world.module("core");
    let app = world.module("app");

    let (base_decl, base) = world.class(core, "core", "Widget", FileId(0));
    let (sub_decl, sub) = world.class(app, "app.ui", "Button", FileId(1));
    let (unrelated_decl, _) = world.class(app, "app.ui", "Theme", FileId(1));
    world.supertypes.add_supertype(sub.clone(), base.clone(), false);

    let redraw = world.member_fn(core, &base, base_decl, "redraw", Visibility::Protected);

    let checker = VisibilityChecker::new(&CORE);
    let session = world.session(app);
    let use_site = world.file(FileId(1), "app.ui");

    let receiver = DispatchReceiver::expression(sub);
    assert!(checker.is_visible(redraw, &session, &use_site, &[sub_decl], Some(&receiver)));
    assert!(!checker.is_visible(redraw, &session, &use_site, &[unrelated_decl], None));
}

#[test]
fn test_jvm_protected_static_admits_same_package_or_subclass() {
    let mut world = TestWorld::new();
    let app = world.module("app");

    let (java_decl, java_class) = world.class(app, "interop", "JavaBase", FileId(0));
    let (sub_decl, sub) = world.class(app, "app", "Derived", FileId(1));
    let (stranger_decl, _) = world.class(app, "app", "Stranger", FileId(2));
    world.supertypes.add_supertype(sub, java_class.clone(), false);

    let helper = world.member_fn(app, &java_class, java_decl, "helper", Visibility::ProtectedStatic);

    let checker = VisibilityChecker::new(&JVM);
    let session = world.session(app);

    // Same package admits regardless of hierarchy.
    let same_package = world.file(FileId(3), "interop");
    assert!(checker.is_visible(helper, &session, &same_package, &[stranger_decl], None));

    // Different package needs the protected rule's subclass relation.
    let other_package = world.file(FileId(1), "app");
    assert!(checker.is_visible(helper, &session, &other_package, &[sub_decl], None));
    assert!(!checker.is_visible(helper, &session, &other_package, &[stranger_decl], None));
}
