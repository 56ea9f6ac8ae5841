use std::path::PathBuf;
use std::time::Duration;

use crate::data::loader::{DataSource, DEFAULT_DATA_URL};

/// Startup configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Remote CSV location (`PENGUINS_DATA_URL`).
    pub data_url: String,
    /// Local table used instead of the URL when set (`PENGUINS_DATA_PATH`).
    pub data_path: Option<PathBuf>,
    /// HTTP timeout (`PENGUINS_HTTP_TIMEOUT_SECS`, default 30).
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_url: lookup("PENGUINS_DATA_URL").unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
            data_path: lookup("PENGUINS_DATA_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            http_timeout: Duration::from_secs(
                lookup("PENGUINS_HTTP_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    pub fn data_source(&self) -> DataSource {
        match &self.data_path {
            Some(path) => DataSource::File(path.clone()),
            None => DataSource::Url(self.data_url.clone()),
        }
    }
}
