use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventResponseReceived, GetResponseBodyParams, RequestId,
    ResourceType,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};
use crate::asset::BuildOutput;
use crate::error::{AuditError, Result};
use super::judge::ResponseJudge;
use super::settle::{Quiescence, SettlePolicy};
use super::tracker::ScriptTracker;
use super::{InlineScript, ProbeOutcome, SessionProber};

const INLINE_SCRIPTS_JS: &str =
    "Array.from(document.querySelectorAll('script:not([src])'), s => s.outerHTML)";

#[derive(Debug, Clone)]
pub struct ChromeOptions {
    pub executable: Option<PathBuf>,
    pub no_sandbox: bool,
    pub request_timeout: Duration,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            executable: None,
            no_sandbox: false,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives a headless Chromium against the live site and judges every script
/// the page actually loads.
pub struct ChromeProber {
    options: ChromeOptions,
    settle: SettlePolicy,
}

impl ChromeProber {
    pub fn new(options: ChromeOptions, settle: SettlePolicy) -> Self {
        Self { options, settle }
    }

    fn browser_config(&self, profile: &Path) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile)
            .request_timeout(self.options.request_timeout);

        if let Some(executable) = &self.options.executable {
            builder = builder.chrome_executable(executable);
        }
        if self.options.no_sandbox {
            builder = builder.no_sandbox();
        }

        builder.build().map_err(AuditError::Browser)
    }

    async fn run_session(&self, browser: &Browser, url: &str, build: &BuildOutput) -> Result<ProbeOutcome> {
        let page = browser.new_page("about:blank").await?;

        let mut responses = page.event_listener::<EventResponseReceived>().await?;
        let mut finished = page.event_listener::<EventLoadingFinished>().await?;
        let mut failed = page.event_listener::<EventLoadingFailed>().await?;

        let judge = ResponseJudge::new(build);
        let mut tracker: ScriptTracker<RequestId> = ScriptTracker::new();
        let mut verdicts = Vec::new();

        let mut navigated = false;
        let mut ready = self.settle.ready_expression.is_none();
        let mut ready_deadline: Option<Instant> = None;
        let mut quiescence: Option<Quiescence> = None;
        let mut poll = tokio::time::interval(self.settle.poll_interval);

        info!("Loading {}", url);
        let navigation = page.goto(url);
        tokio::pin!(navigation);

        loop {
            let deadline = quiescence.as_ref().map(|q| q.deadline(tracker.pending()));
            let mut complete: Option<(RequestId, String)> = None;

            tokio::select! {
                biased;

                Some(event) = responses.next() => {
                    let script_url = &event.response.url;
                    let candidate = judge.is_candidate(script_url, event.r#type == ResourceType::Script);
                    if candidate {
                        debug!("Observed script {}", script_url);
                    }
                    if let Some(ready_url) = tracker.on_response(event.request_id.clone(), script_url, candidate)? {
                        complete = Some((event.request_id.clone(), ready_url));
                    }
                    if candidate {
                        if let Some(q) = quiescence.as_mut() {
                            q.record_activity(Instant::now());
                        }
                    }
                }

                Some(event) = finished.next() => {
                    if let Some(script_url) = tracker.on_finished(event.request_id.clone()) {
                        complete = Some((event.request_id.clone(), script_url));
                    }
                }

                Some(event) = failed.next() => {
                    tracker.on_failed(event.request_id.clone(), &event.error_text)?;
                }

                result = &mut navigation, if !navigated => {
                    result?;
                    navigated = true;
                    debug!("Navigation to {} complete", url);
                    let now = Instant::now();
                    ready_deadline = Some(now + self.settle.ready_timeout);
                    if ready {
                        quiescence = Some(Quiescence::start(&self.settle, now));
                    }
                }

                _ = poll.tick(), if navigated && !ready => {
                    if self.is_ready(&page).await? {
                        ready = true;
                        quiescence = Some(Quiescence::start(&self.settle, Instant::now()));
                    } else if ready_deadline.is_some_and(|d| Instant::now() >= d) {
                        return Err(AuditError::Browser(format!(
                            "page did not satisfy `{}` within {:?}",
                            self.settle.ready_expression.as_deref().unwrap_or_default(),
                            self.settle.ready_timeout,
                        )));
                    }
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {}

                else => {
                    return Err(AuditError::Browser("browser event streams closed unexpectedly".to_string()));
                }
            }

            if let Some((request_id, script_url)) = complete {
                let body = response_body(&page, request_id).await?;
                let verdict = judge.judge(&script_url, &body)?;
                info!("{} ok", script_url);
                verdicts.push(verdict);
                if let Some(q) = quiescence.as_mut() {
                    q.record_activity(Instant::now());
                }
            }

            if let Some(q) = &quiescence {
                let now = Instant::now();
                if q.is_settled(now, tracker.pending()) {
                    if q.hit_hard_deadline(now) {
                        tracker.ensure_resolved(&format!(
                            "still loading when the {:?} settle limit expired",
                            self.settle.max_settle
                        ))?;
                    }
                    break;
                }
            }
        }

        let inline_scripts = self.inline_scripts(&page).await?;
        Ok(ProbeOutcome { verdicts, inline_scripts })
    }

    async fn is_ready(&self, page: &Page) -> Result<bool> {
        let Some(expression) = &self.settle.ready_expression else {
            return Ok(true);
        };
        let result = page.evaluate_expression(evaluate_params(expression)?).await?;
        Ok(result.into_value::<bool>().unwrap_or(false))
    }

    async fn inline_scripts(&self, page: &Page) -> Result<Vec<InlineScript>> {
        let result = page.evaluate_expression(evaluate_params(INLINE_SCRIPTS_JS)?).await?;
        let markup: Vec<String> = result.into_value()?;
        Ok(markup.into_iter().map(InlineScript::new).collect())
    }
}

#[async_trait]
impl SessionProber for ChromeProber {
    async fn probe_live_session(&self, url: &str, build: &BuildOutput) -> Result<ProbeOutcome> {
        let profile = tempfile::Builder::new().prefix("sendcheck-profile-").tempdir()?;
        let (mut browser, mut handler) = Browser::launch(self.browser_config(profile.path())?).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = self.run_session(&browser, url, build).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = browser.wait().await {
            warn!("Failed to reap browser process: {}", e);
        }
        handler_task.abort();

        result
    }
}

fn evaluate_params(expression: &str) -> Result<EvaluateParams> {
    EvaluateParams::builder()
        .expression(expression)
        .return_by_value(true)
        .build()
        .map_err(AuditError::Browser)
}

async fn response_body(page: &Page, request_id: RequestId) -> Result<Vec<u8>> {
    let returns = page.execute(GetResponseBodyParams::new(request_id)).await?.result;
    if returns.base64_encoded {
        STANDARD
            .decode(returns.body.as_bytes())
            .map_err(|e| AuditError::Browser(format!("undecodable response body: {}", e)))
    } else {
        Ok(returns.body.into_bytes())
    }
}
