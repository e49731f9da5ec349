use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the exam backend lives and how to authenticate against it.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub image_base_url: Url,
    pub access_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Build a config from explicit base URLs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either URL fails to parse or is not http(s).
    pub fn new(api_base_url: &str, image_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base("api base url", api_base_url)?,
            image_base_url: parse_base("image base url", image_base_url)?,
            access_token: None,
            request_timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Read `EXAM_API_BASE_URL`, `EXAM_IMAGE_BASE_URL` and `EXAM_API_TOKEN`,
    /// falling back to the local development server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a configured URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api = env::var("EXAM_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());
        let images =
            env::var("EXAM_IMAGE_BASE_URL").unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.into());
        let token = env::var("EXAM_API_TOKEN").ok();
        Ok(Self::new(&api, &images)?.with_token(token))
    }

    /// Replace the API base URL, e.g. from a command-line override.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `url` is invalid.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base("api base url", url)?;
        Ok(self)
    }

    /// Blank tokens are treated as absent.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|token| !token.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Absolute URL of an API endpoint given as a path relative to the base.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_base_url.join(path.trim_start_matches('/'))
    }

    /// Question and option images come back as server-relative paths; absolute
    /// URLs pass through untouched.
    #[must_use]
    pub fn resolve_image_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.image_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Parses a base URL, keeping a trailing slash so `join` appends to the path.
fn parse_base(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|source| ConfigError::InvalidUrl { name, source })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            name,
            scheme: other.to_string(),
        }),
    }
}
