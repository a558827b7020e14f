//! Upstream request construction and execution.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use url::Url;

use crate::config::{ConfigError, UpstreamConfig};
use crate::error::ApiError;
use crate::observability::metrics;

/// Repository resource exposed by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Issues,
    Labels,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Issues => "issues",
            Resource::Labels => "labels",
        }
    }
}

/// `{base}/{owner}/{repo}/{resource}?{query}` on the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    url: Url,
}

impl UpstreamTarget {
    /// Build a target under `base`. Owner and repo are percent-encoded as
    /// single path segments.
    pub fn new(base: &Url, owner: &str, repo: &str, resource: Resource) -> Self {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([owner, repo, resource.as_str()]);
        }
        Self { url }
    }

    /// Append already validated query pairs, preserving their order.
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            self.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// A successful upstream response, relayed as-is.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Thin wrapper over a shared `reqwest::Client` bound to one base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base: Url,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn target(&self, owner: &str, repo: &str, resource: Resource) -> UpstreamTarget {
        UpstreamTarget::new(&self.base, owner, repo, resource)
    }

    /// Issue a GET for `target`. Non-success statuses become `ApiError`s;
    /// 403 and 404 get their fixed messages.
    pub async fn fetch(&self, target: &UpstreamTarget) -> Result<UpstreamResponse, ApiError> {
        let start = Instant::now();
        tracing::debug!(url = %target.url(), "Calling upstream");

        let response = match self.client.get(target.url().clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %target.url(), error = %e, "Upstream request failed");
                metrics::record_upstream(None, start);
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        metrics::record_upstream(Some(status.as_u16()), start);

        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(url = %target.url(), error = %e, "Failed to read upstream body");
            ApiError::Transport(e)
        })?;

        if status.is_success() {
            return Ok(UpstreamResponse { content_type, body });
        }

        tracing::info!(url = %target.url(), status = %status, "Upstream returned an error");
        Err(match status {
            StatusCode::FORBIDDEN => ApiError::RateLimited,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => ApiError::Upstream {
                status,
                content_type,
                body,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github() -> Url {
        Url::parse("https://api.github.com/repos/").unwrap()
    }

    #[test]
    fn test_labels_target() {
        let target = UpstreamTarget::new(&github(), "octocat", "Hello-World", Resource::Labels);
        assert_eq!(
            target.url().as_str(),
            "https://api.github.com/repos/octocat/Hello-World/labels"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let base = Url::parse("http://127.0.0.1:9000/repos").unwrap();
        let target = UpstreamTarget::new(&base, "o", "r", Resource::Issues);
        assert_eq!(target.url().as_str(), "http://127.0.0.1:9000/repos/o/r/issues");
    }

    #[test]
    fn test_segments_are_encoded() {
        let target = UpstreamTarget::new(&github(), "a/b", "c d?", Resource::Issues);
        assert_eq!(
            target.url().as_str(),
            "https://api.github.com/repos/a%2Fb/c%20d%3F/issues"
        );
    }

    #[test]
    fn test_no_query_when_nothing_forwarded() {
        let target = UpstreamTarget::new(&github(), "o", "r", Resource::Issues)
            .with_query(Vec::<(&str, &str)>::new());
        assert_eq!(target.url().query(), None);
    }

    #[test]
    fn test_query_order_and_encoding() {
        let target = UpstreamTarget::new(&github(), "o", "r", Resource::Issues).with_query([
            ("sort", "created"),
            ("since", "2024-01-01T00:00:00+02:00"),
            ("labels", "bug,help wanted"),
        ]);
        assert_eq!(
            target.url().query(),
            Some("sort=created&since=2024-01-01T00%3A00%3A00%2B02%3A00&labels=bug%2Chelp+wanted")
        );
    }

    #[test]
    fn test_client_rejects_bad_user_agent() {
        let config = UpstreamConfig {
            user_agent: "bad\nagent".into(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(UpstreamClient::new(&config), Err(ConfigError::InvalidHeader(_))));
    }
}
