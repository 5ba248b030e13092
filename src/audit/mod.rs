mod orchestrator;
mod report;
mod stage;

pub use orchestrator::AuditOrchestrator;
pub use report::{AuditFailure, AuditOutcome, AuditReport, AuditSummary, VerdictRow};
pub use stage::AuditStage;
