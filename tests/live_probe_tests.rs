//! These tests drive a real headless Chromium and are ignored by default.
//! Run them with `cargo test -- --ignored` on a machine with Chrome installed.

mod common;

use std::time::Duration;
use common::{FixtureServer, build_dir};
use sendcheck::{AssetFilter, AuditError, BuildOutput, ChromeOptions, ChromeProber, SessionProber, SettlePolicy};

fn prober() -> ChromeProber {
    let settle = SettlePolicy::default()
        .without_readiness()
        .with_quiet_window(Duration::from_millis(500))
        .with_max_settle(Duration::from_secs(5));
    let options = ChromeOptions {
        no_sandbox: true,
        ..ChromeOptions::default()
    };
    ChromeProber::new(options, settle)
}

const INDEX: &str = r#"<!doctype html>
<html>
<head><script src="/app.abc123.js"></script></head>
<body>
<script>window.app = { ready: true };</script>
</body>
</html>"#;

const INDEX_WITH_EXTRA: &str = r#"<!doctype html>
<html>
<head>
<script src="/app.abc123.js"></script>
<script src="/extra.999.js"></script>
</head>
<body></body>
</html>"#;

const INDEX_WITH_INJECTION: &str = r#"<!doctype html>
<html>
<head><script src="/app.abc123.js"></script></head>
<body>
<script>
setTimeout(() => {
  const s = document.createElement('script');
  s.src = '/late.js';
  document.head.appendChild(s);
}, 200);
</script>
</body>
</html>"#;

#[tokio::test]
#[ignore]
async fn test_live_session_matches_reference() {
    let dir = build_dir(&[("app.abc123.js", "console.log(1)")]);
    let server = FixtureServer::start(&[
        ("index.html", INDEX),
        ("app.abc123.js", "console.log(1)"),
    ]).await;

    let build = BuildOutput::new(dir.path(), AssetFilter::scripts());
    let outcome = prober()
        .probe_live_session(&format!("{}/", server.base_url), &build)
        .await
        .unwrap();

    assert_eq!(outcome.verdicts.len(), 1);
    assert!(outcome.verdicts[0].matched);
    assert_eq!(outcome.inline_scripts.len(), 1);
    assert_eq!(
        outcome.inline_scripts[0].markup(),
        "<script>window.app = { ready: true };</script>"
    );
}

#[tokio::test]
#[ignore]
async fn test_extra_script_is_unaccounted() {
    let dir = build_dir(&[("app.abc123.js", "console.log(1)")]);
    let server = FixtureServer::start(&[
        ("index.html", INDEX_WITH_EXTRA),
        ("app.abc123.js", "console.log(1)"),
        ("extra.999.js", "console.log('not from github')"),
    ]).await;

    let build = BuildOutput::new(dir.path(), AssetFilter::scripts());
    let err = prober()
        .probe_live_session(&format!("{}/", server.base_url), &build)
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::UnaccountedAsset { ref name, .. } if name == "extra.999.js"));
}

#[tokio::test]
#[ignore]
async fn test_late_injected_script_is_observed() {
    let dir = build_dir(&[
        ("app.abc123.js", "console.log(1)"),
        ("late.js", "console.log('late')"),
    ]);
    let server = FixtureServer::start(&[
        ("index.html", INDEX_WITH_INJECTION),
        ("app.abc123.js", "console.log(1)"),
        ("late.js", "console.log('tampered')"),
    ]).await;

    let build = BuildOutput::new(dir.path(), AssetFilter::scripts());
    let err = prober()
        .probe_live_session(&format!("{}/", server.base_url), &build)
        .await
        .unwrap_err();

    assert!(matches!(err, AuditError::IntegrityMismatch { ref name, .. } if name == "late.js"));
}
