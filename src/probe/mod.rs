mod chrome;
mod judge;
mod settle;
mod tracker;

use async_trait::async_trait;
use serde::Serialize;
use crate::asset::{BuildOutput, Verdict};
use crate::error::Result;

pub use chrome::{ChromeOptions, ChromeProber};
pub use judge::{ResponseJudge, basename};
pub use settle::{Quiescence, SettlePolicy, SEND_READY_EXPRESSION};
pub use tracker::ScriptTracker;

/// Markup of a `<script>` element with embedded code. Never judged; the
/// operator reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InlineScript(String);

impl InlineScript {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn markup(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeOutcome {
    pub verdicts: Vec<Verdict>,
    pub inline_scripts: Vec<InlineScript>,
}

/// Observes a real page load of the live site.
#[async_trait]
pub trait SessionProber: Send + Sync {
    async fn probe_live_session(&self, url: &str, build: &BuildOutput) -> Result<ProbeOutcome>;
}
