use std::path::PathBuf;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};
use uuid::Uuid;
use crate::asset::Verdict;
use crate::error::AuditError;
use crate::probe::InlineScript;
use super::stage::AuditStage;

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub version: Option<String>,
    pub reference: String,
    pub build_dir: PathBuf,
    pub static_verdicts: Vec<Verdict>,
    pub live_verdicts: Vec<Verdict>,
    pub inline_scripts: Vec<InlineScript>,
}

impl AuditSummary {
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.static_verdicts.iter().chain(self.live_verdicts.iter())
    }
}

#[derive(Debug)]
pub struct AuditFailure {
    pub stage: AuditStage,
    pub error: AuditError,
}

impl AuditFailure {
    pub fn suggestion(&self) -> Option<String> {
        match &self.error {
            AuditError::Acquisition(e) => Some(e.suggestion()),
            _ => None,
        }
    }
}

impl Serialize for AuditFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let fingerprints = match &self.error {
            AuditError::IntegrityMismatch { expected, actual, .. } => Some((expected, actual)),
            _ => None,
        };

        let field_count = if fingerprints.is_some() { 6 } else { 4 };
        let mut state = serializer.serialize_struct("AuditFailure", field_count)?;

        state.serialize_field("stage", &self.stage)?;
        state.serialize_field("kind", self.error.kind())?;
        state.serialize_field("asset", &self.error.asset_name())?;
        state.serialize_field("message", &self.error.to_string())?;

        if let Some((expected, actual)) = fingerprints {
            state.serialize_field("expected", expected)?;
            state.serialize_field("actual", actual)?;
        }

        state.end()
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    Ok(AuditSummary),
    Failure(AuditFailure),
}

#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub run_id: Uuid,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stage: AuditStage,
    pub outcome: AuditOutcome,
}

impl AuditReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, AuditOutcome::Ok(_))
    }

    pub fn summary(&self) -> Option<&AuditSummary> {
        match &self.outcome {
            AuditOutcome::Ok(summary) => Some(summary),
            AuditOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AuditFailure> {
        match &self.outcome {
            AuditOutcome::Ok(_) => None,
            AuditOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Human-readable report: verdict table, inline scripts, final banner.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        match &self.outcome {
            AuditOutcome::Ok(summary) => {
                let rows: Vec<VerdictRow> = summary.verdicts().map(VerdictRow::from).collect();
                if !rows.is_empty() {
                    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
                    out.push('\n');
                }

                if !summary.inline_scripts.is_empty() {
                    out.push_str(&format!(
                        "\n{}\n",
                        "Please manually inspect these inline script tags:".yellow()
                    ));
                    for script in &summary.inline_scripts {
                        out.push_str(script.markup());
                        out.push('\n');
                    }
                }

                out.push_str(&format!(
                    "\n{} {} is probably ok. It matches {}{}.\n",
                    "✓".green(),
                    self.target,
                    summary.reference,
                    summary.version.as_deref().map(|v| format!(" at {}", v)).unwrap_or_default(),
                ));
            }

            AuditOutcome::Failure(failure) => {
                out.push_str(&format!(
                    "{} [{}] during {}\n  {}\n",
                    "✗ AUDIT FAILED".red().bold(),
                    failure.error.kind(),
                    failure.stage.as_str(),
                    failure.error,
                ));

                if let Some(suggestion) = failure.suggestion() {
                    out.push_str(&format!("\n{}\n", "Suggestion:".yellow()));
                    for line in suggestion.lines() {
                        out.push_str(&format!("  {}\n", line));
                    }
                }
            }
        }

        out
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct VerdictRow {
    #[tabled(rename = "Asset")]
    pub asset: String,
    #[tabled(rename = "Via")]
    pub via: String,
    #[tabled(rename = "Fingerprint")]
    pub fingerprint: String,
    #[tabled(rename = "Bytes")]
    pub bytes: usize,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Verdict> for VerdictRow {
    fn from(verdict: &Verdict) -> Self {
        let status = if verdict.matched { "✓ ok" } else { "✗ mismatch" };

        VerdictRow {
            asset: verdict.name.clone(),
            via: verdict.remote.mode.as_str().to_string(),
            fingerprint: verdict.expected.to_string(),
            bytes: verdict.remote.size,
            status: status.to_string(),
        }
    }
}
