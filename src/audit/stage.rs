use serde::Serialize;

/// Linear lifecycle of one audit run. Any non-terminal stage may fail
/// straight to `ReportFailure`; nothing ever moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStage {
    Start,
    AcquiringReference,
    StaticCompare,
    LiveProbe,
    ReportOk,
    ReportFailure,
}

impl AuditStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStage::Start => "start",
            AuditStage::AcquiringReference => "acquiring_reference",
            AuditStage::StaticCompare => "static_compare",
            AuditStage::LiveProbe => "live_probe",
            AuditStage::ReportOk => "report_ok",
            AuditStage::ReportFailure => "report_failure",
        }
    }

    /// The stage that follows on success.
    pub fn next(&self) -> Option<AuditStage> {
        match self {
            AuditStage::Start => Some(AuditStage::AcquiringReference),
            AuditStage::AcquiringReference => Some(AuditStage::StaticCompare),
            AuditStage::StaticCompare => Some(AuditStage::LiveProbe),
            AuditStage::LiveProbe => Some(AuditStage::ReportOk),
            AuditStage::ReportOk | AuditStage::ReportFailure => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AuditStage::ReportOk | AuditStage::ReportFailure)
    }

    pub fn can_transition_to(&self, to: AuditStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == AuditStage::ReportFailure || self.next() == Some(to)
    }
}
