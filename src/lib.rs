pub mod error;
pub mod fingerprint;
pub mod target;
pub mod asset;
pub mod reference;
pub mod remote;
pub mod compare;
pub mod probe;
pub mod audit;

pub use error::{AuditError, AcquisitionError, AcquisitionStep, Result};
pub use fingerprint::{Fingerprint, fingerprint};
pub use target::Target;
pub use asset::{AcquisitionMode, AssetFilter, BuildOutput, ReferenceArtifact, RemoteArtifact, Verdict};
pub use reference::{BuildCommand, GitNpmBuilder, PrebuiltBuild, ReferenceBuilder, VersionInfo, discover_version};
pub use remote::{AssetFetcher, HttpFetcher};
pub use compare::StaticComparator;
pub use probe::{ChromeOptions, ChromeProber, InlineScript, ProbeOutcome, ResponseJudge, SessionProber, SettlePolicy};
pub use audit::{AuditOrchestrator, AuditOutcome, AuditReport, AuditStage, AuditSummary};
