use serde::Serialize;

pub const SEND_BASE_URL: &str = "https://send.firefox.com";
pub const SEND_REPOSITORY: &str = "https://github.com/mozilla/send.git";
pub const VERSION_PATH: &str = "/__version__";
pub const CHECKOUT_DIR: &str = "send";
pub const BUILD_OUTPUT_DIR: &str = "dist";

/// Identity of the audited deployment and the upstream it claims to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub base_url: String,
    pub repository: String,
    pub version_path: String,
    pub checkout_dir: String,
    pub build_output_dir: String,
}

impl Target {
    pub fn send() -> Self {
        Self {
            base_url: SEND_BASE_URL.to_string(),
            repository: SEND_REPOSITORY.to_string(),
            version_path: VERSION_PATH.to_string(),
            checkout_dir: CHECKOUT_DIR.to_string(),
            build_output_dir: BUILD_OUTPUT_DIR.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn version_url(&self) -> String {
        format!("{}/{}", self.base(), self.version_path.trim_start_matches('/'))
    }

    /// URL the live probe navigates to.
    pub fn page_url(&self) -> String {
        format!("{}/", self.base())
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::send()
    }
}

pub fn asset_url(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}
