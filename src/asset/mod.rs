mod artifact;
mod build_output;
mod filter;
mod verdict;

pub use artifact::{AcquisitionMode, ReferenceArtifact, RemoteArtifact};
pub use build_output::BuildOutput;
pub use filter::{AssetFilter, is_plain_name};
pub use verdict::Verdict;
