//! Path resolution against real directory trees

use crate::common::{create_test_services, ProjectFixture};
use fsgate::core::error::PathViolation;
use fsgate::core::registry::ServiceOp;

#[test]
fn test_resolves_file_inside_service() {
    let fixture = ProjectFixture::standard();
    let services = create_test_services(fixture.path());
    let frontend = services.registry.get("frontend").unwrap();

    let resolved = services.resolver.resolve(frontend, "src/main.ts").unwrap();
    assert_eq!(resolved.service, "frontend");
    assert_eq!(resolved.relative_path, "src/main.ts");
    assert!(resolved.absolute_path.is_file());
}

#[test]
fn test_service_root_resolves_to_dot() {
    let fixture = ProjectFixture::standard();
    let services = create_test_services(fixture.path());
    let api = services.registry.get("api").unwrap();

    let resolved = services.resolver.resolve(api, ".").unwrap();
    assert_eq!(resolved.relative_path, ".");
}

#[test]
fn test_no_input_escapes_the_root() {
    let fixture = ProjectFixture::standard();
    let services = create_test_services(fixture.path());
    let frontend = services.registry.get("frontend").unwrap();
    let real_root = frontend.root_path.canonicalize().unwrap();

    let attempts = [
        "../api/src/lib.rs",
        "../../etc/passwd",
        "src/../../notes.txt",
        "..\\notes.txt",
        "/etc/passwd",
        "\\windows\\system32",
        "C:\\Windows\\win.ini",
        "src/\0main.ts",
        "",
        "   ",
        ".env",
        "src/.hidden",
        "node_modules/pkg/index.js",
        "does/not/exist.txt",
    ];

    for attempt in attempts {
        match services.resolver.resolve(frontend, attempt) {
            Ok(resolved) => {
                assert!(
                    resolved.absolute_path.starts_with(&real_root),
                    "{attempt:?} resolved outside the root"
                );
                panic!("{attempt:?} should have been refused");
            }
            Err(violation) => {
                // Messages never leak host paths
                let message = violation.to_string();
                assert!(!message.contains(&*real_root.to_string_lossy()), "{message}");
            }
        }
    }
}

#[test]
fn test_refusal_reasons() {
    let fixture = ProjectFixture::standard();
    let services = create_test_services(fixture.path());
    let frontend = services.registry.get("frontend").unwrap();
    let resolve = |p: &str| services.resolver.resolve(frontend, p).unwrap_err();

    assert_eq!(resolve("../notes.txt"), PathViolation::Traversal);
    assert_eq!(resolve("/etc/passwd"), PathViolation::Absolute);
    assert_eq!(resolve(""), PathViolation::Empty);
    assert_eq!(resolve("a\0b"), PathViolation::NulByte);
    assert_eq!(resolve(".env"), PathViolation::Hidden(".env".to_string()));
    assert_eq!(resolve("missing.txt"), PathViolation::Unresolvable);
    assert!(matches!(
        resolve("node_modules/pkg/index.js"),
        PathViolation::Blocked(_)
    ));
}

#[test]
fn test_sibling_prefix_is_not_inside() {
    // "api-evil" shares a string prefix with "api" but is a sibling
    let fixture = ProjectFixture::standard();
    fixture.write("api-evil/loot.txt", "nope\n");
    let services = create_test_services(fixture.path());
    let api = services.registry.get("api").unwrap();

    let err = services.resolver.resolve(api, "../api-evil/loot.txt").unwrap_err();
    assert_eq!(err, PathViolation::Traversal);
}

#[test]
fn test_blocked_extension_anywhere() {
    let fixture = ProjectFixture::standard();
    let services = create_test_services(fixture.path());
    let api = services.registry.get("api").unwrap();

    for path in ["keys/server.pem", "keys/SERVER.PEM", "keys/../keys/server.pem"] {
        assert!(services.resolver.resolve(api, path).is_err(), "{path}");
    }
}

#[test]
fn test_operation_allow_list() {
    let fixture = ProjectFixture::standard();
    let services = create_test_services(fixture.path());

    assert!(services.registry.is_allowed("docs", ServiceOp::List));
    assert!(!services.registry.is_allowed("docs", ServiceOp::Read));
    assert!(!services.registry.is_allowed("docs", ServiceOp::Search));
    assert!(!services.registry.is_allowed("unknown", ServiceOp::Read));
    assert_eq!(
        services.registry.names_for(ServiceOp::Read),
        vec!["api", "frontend"]
    );
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_symlink_out_of_root_is_refused() {
        let fixture = ProjectFixture::standard();
        let outside = tempfile::TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "outside\n").unwrap();
        symlink(outside.path(), fixture.path().join("frontend/src/escape")).unwrap();
        symlink(
            outside.path().join("secret.txt"),
            fixture.path().join("frontend/link.txt"),
        )
        .unwrap();

        let services = create_test_services(fixture.path());
        let frontend = services.registry.get("frontend").unwrap();

        assert_eq!(
            services
                .resolver
                .resolve(frontend, "src/escape/secret.txt")
                .unwrap_err(),
            PathViolation::Escape
        );
        assert_eq!(
            services.resolver.resolve(frontend, "link.txt").unwrap_err(),
            PathViolation::Escape
        );
    }

    #[test]
    fn test_symlink_to_sibling_service_is_refused() {
        let fixture = ProjectFixture::standard();
        symlink(
            fixture.path().join("api/src"),
            fixture.path().join("frontend/api-src"),
        )
        .unwrap();

        let services = create_test_services(fixture.path());
        let frontend = services.registry.get("frontend").unwrap();

        assert_eq!(
            services
                .resolver
                .resolve(frontend, "api-src/lib.rs")
                .unwrap_err(),
            PathViolation::Escape
        );
    }

    #[test]
    fn test_symlink_inside_root_to_hidden_file_is_refused() {
        let fixture = ProjectFixture::standard();
        symlink(
            fixture.path().join("frontend/.env"),
            fixture.path().join("frontend/env.txt"),
        )
        .unwrap();

        let services = create_test_services(fixture.path());
        let frontend = services.registry.get("frontend").unwrap();

        assert_eq!(
            services.resolver.resolve(frontend, "env.txt").unwrap_err(),
            PathViolation::Hidden(".env".to_string())
        );
    }

    #[test]
    fn test_symlink_inside_root_is_followed() {
        let fixture = ProjectFixture::standard();
        symlink(
            fixture.path().join("frontend/src/main.ts"),
            fixture.path().join("frontend/entry.ts"),
        )
        .unwrap();

        let services = create_test_services(fixture.path());
        let frontend = services.registry.get("frontend").unwrap();

        let resolved = services.resolver.resolve(frontend, "entry.ts").unwrap();
        assert_eq!(resolved.relative_path, "src/main.ts");
    }
}
