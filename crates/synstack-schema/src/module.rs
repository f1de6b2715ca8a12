use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a module's sources are fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlType {
    Git,
    Wget,
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlType::Git => write!(f, "GIT_URL"),
            UrlType::Wget => write!(f, "WGET_URL"),
        }
    }
}

/// One entry of the install manifest: a buildable unit with a name, version,
/// install path, and source location.
///
/// The module name doubles as a path macro: later manifest rows may refer to
/// this module's resolved location as `$(NAME)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallModule {
    pub name: String,
    pub version: String,
    /// Raw install path as written in the manifest, possibly macro-bearing.
    pub rel_path: String,
    /// Fully resolved install path. Empty until the module is added to an
    /// [`InstallConfig`](crate::InstallConfig), which resolves it against the
    /// install root and all previously added modules.
    pub abs_path: String,
    pub url_type: UrlType,
    /// Base fetch location inherited from the most recent URL directive.
    pub url: String,
    /// Repository name appended to `url` when fetching.
    pub repository: String,
    pub clone: bool,
    pub build: bool,
}

impl InstallModule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        rel_path: impl Into<String>,
        url_type: UrlType,
        url: impl Into<String>,
        repository: impl Into<String>,
        clone: bool,
        build: bool,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            rel_path: rel_path.into(),
            abs_path: String::new(),
            url_type,
            url: url.into(),
            repository: repository.into(),
            clone,
            build,
        }
    }
}
