use std::fmt;
use std::path::{Path, PathBuf};

/// Which backing store the process talks to. Chosen once, never switched.
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Managed Qdrant endpoint.
    Remote { url: String, api_key: Option<String> },
    /// Embedded store rooted at a directory.
    Local { path: PathBuf },
}

impl ConnectionMode {
    /// A non-empty remote URL wins; otherwise fall back to the local directory.
    pub fn select(url: &str, api_key: &str, local_path: impl Into<PathBuf>) -> Self {
        let url = url.trim();
        if url.is_empty() {
            return ConnectionMode::Local {
                path: local_path.into(),
            };
        }
        let api_key = api_key.trim();
        ConnectionMode::Remote {
            url: url.to_string(),
            api_key: (!api_key.is_empty()).then(|| api_key.to_string()),
        }
    }

    pub fn local(path: impl AsRef<Path>) -> Self {
        ConnectionMode::Local {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionMode::Remote { .. } => "remote",
            ConnectionMode::Local { .. } => "local",
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionMode::Remote { url, api_key } => f
                .debug_struct("Remote")
                .field("url", url)
                .field("api_key", &api_key.as_ref().map(|_| "<redacted>"))
                .finish(),
            ConnectionMode::Local { path } => f.debug_struct("Local").field("path", path).finish(),
        }
    }
}
