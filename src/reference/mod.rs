mod command;
mod git_build;
mod prebuilt;
mod version;

use async_trait::async_trait;
use crate::asset::BuildOutput;
use crate::error::Result;

pub use command::BuildCommand;
pub use git_build::GitNpmBuilder;
pub use prebuilt::PrebuiltBuild;
pub use version::{VersionInfo, discover_version, validate_version};

/// Produces the build output the live deployment is judged against.
///
/// Any failure is fatal to the audit: there is no partial reference.
#[async_trait]
pub trait ReferenceBuilder: Send + Sync {
    async fn acquire_reference_build(&self) -> Result<BuildOutput>;

    fn describe(&self) -> String;
}
