use glob::{MatchOptions, Pattern, PatternError};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Decides which file names count as deliverable client assets.
///
/// Applied to build-output entry names and to the basename of URLs observed
/// in the live session, so both sides agree on what gets compared.
#[derive(Debug, Clone)]
pub struct AssetFilter {
    patterns: Vec<Pattern>,
}

impl AssetFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn scripts() -> Self {
        Self::from_static(&["*.js"])
    }

    pub fn stylesheets() -> Self {
        Self::from_static(&["*.css"])
    }

    fn from_static(patterns: &[&'static str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p).expect("static asset pattern is valid"))
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, name: &str) -> bool {
        is_plain_name(name)
            && self.patterns.iter().any(|p| p.matches_with(name, MATCH_OPTIONS))
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.as_str()).collect()
    }
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self::scripts()
    }
}

/// A bare file name: no separators, not a relative path component.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
