mod common;

use common::{FixtureServer, build_dir};
use sendcheck::{AcquisitionError, AcquisitionStep, AssetFilter, AuditError, BuildCommand, GitNpmBuilder, PrebuiltBuild, ReferenceBuilder, Target, discover_version};

#[tokio::test]
async fn test_discover_version() {
    let server = FixtureServer::start(&[(
        "__version__",
        r#"{"version":"v3.0.21","commit":"6d1b5c8","source":"https://github.com/mozilla/send"}"#,
    )]).await;
    let target = Target::send().with_base_url(&server.base_url);

    let info = discover_version(&reqwest::Client::new(), &target.version_url()).await.unwrap();

    assert_eq!(info.version, "v3.0.21");
    assert_eq!(info.commit.as_deref(), Some("6d1b5c8"));
}

#[tokio::test]
async fn test_missing_version_endpoint() {
    let server = FixtureServer::start(&[]).await;
    let target = Target::send().with_base_url(&server.base_url);

    let err = discover_version(&reqwest::Client::new(), &target.version_url()).await.unwrap_err();

    match err {
        AcquisitionError::VersionUnavailable { reason, .. } => assert!(reason.contains("404")),
        other => panic!("expected VersionUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_version_metadata() {
    let server = FixtureServer::start(&[("__version__", r#"{"commit":"abc"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);

    let err = discover_version(&reqwest::Client::new(), &target.version_url()).await.unwrap_err();
    assert_eq!(err.step(), AcquisitionStep::VersionDiscovery);
}

#[tokio::test]
async fn test_option_like_version_rejected() {
    let server = FixtureServer::start(&[("__version__", r#"{"version":"--upload-pack=sh"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);

    let err = discover_version(&reqwest::Client::new(), &target.version_url()).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::InvalidVersion { .. }));
}

#[tokio::test]
async fn test_prebuilt_records_deployed_version() {
    let server = FixtureServer::start(&[("__version__", r#"{"version":"v3.0.21"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);
    let dir = build_dir(&[("app.js", "x")]);

    let build = PrebuiltBuild::new(dir.path(), AssetFilter::scripts())
        .with_version_check(target, reqwest::Client::new())
        .acquire_reference_build()
        .await
        .unwrap();

    assert_eq!(build.version(), Some("v3.0.21"));
    assert_eq!(build.asset_names().unwrap(), vec!["app.js"]);
}

#[tokio::test]
async fn test_failed_checkout_is_fatal() {
    let server = FixtureServer::start(&[("__version__", r#"{"version":"v3.0.21"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);
    let work = tempfile::TempDir::new().unwrap();

    let builder = GitNpmBuilder::new(target, work.path(), reqwest::Client::new())
        .with_git_program("false");
    let err = builder.acquire_reference_build().await.unwrap_err();

    match err {
        AuditError::Acquisition(AcquisitionError::CommandFailed { step, .. }) => {
            assert_eq!(step, AcquisitionStep::Checkout);
        }
        other => panic!("expected checkout failure, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_build_is_fatal() {
    let server = FixtureServer::start(&[("__version__", r#"{"version":"v3.0.21"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);
    let work = tempfile::TempDir::new().unwrap();

    let builder = GitNpmBuilder::new(target, work.path(), reqwest::Client::new())
        .with_git_program(fake_git(work.path()))
        .with_install_command(BuildCommand::new("true", Vec::<String>::new()))
        .with_build_command(BuildCommand::new("sh", ["-c", "echo 'webpack exploded' >&2; exit 7"]));
    let err = builder.acquire_reference_build().await.unwrap_err();

    match err {
        AuditError::Acquisition(AcquisitionError::CommandFailed { step, exit_code, stderr, .. }) => {
            assert_eq!(step, AcquisitionStep::Build);
            assert_eq!(exit_code, Some(7));
            assert!(stderr.contains("webpack exploded"));
        }
        other => panic!("expected build failure, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_missing_output_dir_is_fatal() {
    let server = FixtureServer::start(&[("__version__", r#"{"version":"v3.0.21"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);
    let work = tempfile::TempDir::new().unwrap();

    let builder = GitNpmBuilder::new(target, work.path(), reqwest::Client::new())
        .with_git_program(fake_git(work.path()))
        .with_install_command(BuildCommand::new("true", Vec::<String>::new()))
        .with_build_command(BuildCommand::new("true", Vec::<String>::new()));
    let err = builder.acquire_reference_build().await.unwrap_err();

    assert!(matches!(err, AuditError::Acquisition(AcquisitionError::OutputMissing { .. })));
}

#[cfg(unix)]
#[tokio::test]
async fn test_successful_build_yields_dist() {
    let server = FixtureServer::start(&[("__version__", r#"{"version":"v3.0.21"}"#)]).await;
    let target = Target::send().with_base_url(&server.base_url);
    let work = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(work.path().join("send/dist")).unwrap();
    std::fs::write(work.path().join("send/dist/stale.js"), "old").unwrap();

    let builder = GitNpmBuilder::new(target, work.path(), reqwest::Client::new())
        .with_git_program(fake_git(work.path()))
        .with_install_command(BuildCommand::new("true", Vec::<String>::new()))
        .with_build_command(BuildCommand::new(
            "sh",
            ["-c", "mkdir -p dist && printf 'console.log(1)' > dist/app.abc123.js"],
        ));

    let build = builder.acquire_reference_build().await.unwrap();

    assert_eq!(build.version(), Some("v3.0.21"));
    assert!(build.root().ends_with("send/dist"));
    assert_eq!(build.asset_names().unwrap(), vec!["app.abc123.js"]);
}

/// A stand-in for git that creates the clone target directory (its last
/// argument) and nothing else.
#[cfg(unix)]
fn fake_git(work: &std::path::Path) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = work.join("fake-git.sh");
    std::fs::write(&path, "#!/bin/sh\nfor last; do :; done\nmkdir -p \"$last\"\n").unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.display().to_string()
}
