use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;
use crate::compare::StaticComparator;
use crate::error::Result;
use crate::probe::SessionProber;
use crate::reference::ReferenceBuilder;
use crate::remote::AssetFetcher;
use crate::target::Target;
use super::report::{AuditFailure, AuditOutcome, AuditReport, AuditSummary};
use super::stage::AuditStage;

/// Runs one audit: acquire reference, static compare, live probe, report.
/// The first error of any kind ends the run.
pub struct AuditOrchestrator {
    target: Target,
    builder: Box<dyn ReferenceBuilder>,
    fetcher: Box<dyn AssetFetcher>,
    prober: Box<dyn SessionProber>,
}

impl AuditOrchestrator {
    pub fn new(
        target: Target,
        builder: Box<dyn ReferenceBuilder>,
        fetcher: Box<dyn AssetFetcher>,
        prober: Box<dyn SessionProber>,
    ) -> Self {
        Self { target, builder, fetcher, prober }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub async fn run(&self) -> AuditReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut stage = AuditStage::Start;

        let outcome = match self.execute(&mut stage).await {
            Ok(summary) => {
                advance(&mut stage, AuditStage::ReportOk);
                AuditOutcome::Ok(summary)
            }
            Err(error) => {
                error!("Audit failed during {}: {}", stage.as_str(), error);
                let failed_at = stage;
                advance(&mut stage, AuditStage::ReportFailure);
                AuditOutcome::Failure(AuditFailure { stage: failed_at, error })
            }
        };

        AuditReport {
            run_id,
            target: self.target.base().to_string(),
            started_at,
            finished_at: Utc::now(),
            stage,
            outcome,
        }
    }

    /// The pipeline itself. `stage` is left at the stage that was running
    /// when an error surfaced.
    pub async fn execute(&self, stage: &mut AuditStage) -> Result<AuditSummary> {
        info!("Checking if {} has been pwned...", self.target.base());

        advance(stage, AuditStage::AcquiringReference);
        let build = self.builder.acquire_reference_build().await?;

        advance(stage, AuditStage::StaticCompare);
        info!(
            "Comparing local {} files with {}",
            build.filter().patterns().join(", "),
            self.target.base()
        );
        let static_verdicts = StaticComparator::new(self.fetcher.as_ref())
            .compare_static_assets(&build, self.target.base())
            .await?;

        advance(stage, AuditStage::LiveProbe);
        info!("Checking scripts loaded by {}...", self.target.page_url());
        let probe = self
            .prober
            .probe_live_session(&self.target.page_url(), &build)
            .await?;

        Ok(AuditSummary {
            version: build.version().map(str::to_string),
            reference: self.builder.describe(),
            build_dir: build.root().to_path_buf(),
            static_verdicts,
            live_verdicts: probe.verdicts,
            inline_scripts: probe.inline_scripts,
        })
    }
}

fn advance(stage: &mut AuditStage, to: AuditStage) {
    debug_assert!(stage.can_transition_to(to), "illegal transition {:?} -> {:?}", stage, to);
    debug!("{} -> {}", stage.as_str(), to.as_str());
    *stage = to;
}
