//! Network access for installing and passing through uncached requests.

use async_trait::async_trait;

use super::error::FetchError;
use super::types::CachedResponse;

/// Fetches one resource from the network.
///
/// Non-success HTTP statuses are returned as responses, not errors; the
/// installer decides whether a status is acceptable.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CachedResponse, FetchError>;
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use chrono::Utc;
    use reqwest::{Client, Url, header};
    use tracing::debug;

    use super::{FetchError, Fetcher};
    use crate::cache::types::CachedResponse;

    /// reqwest-backed fetcher resolving relative manifest entries
    /// (`./`, `./index.html`) against the app's base URL.
    pub struct HttpFetcher {
        client: Client,
        base_url: Url,
    }

    impl HttpFetcher {
        pub fn new(base_url: &str) -> Result<Self, FetchError> {
            let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;
            Ok(Self {
                client: Client::new(),
                base_url,
            })
        }

        pub fn base_url(&self) -> &Url {
            &self.base_url
        }

        /// Absolute URLs pass through unchanged.
        pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
            self.base_url.join(url).map_err(|e| FetchError::InvalidUrl {
                url: url.to_owned(),
                reason: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl Fetcher for HttpFetcher {
        async fn fetch(&self, url: &str) -> Result<CachedResponse, FetchError> {
            let resolved = self.resolve(url)?;
            let transport = |e: reqwest::Error| FetchError::Transport {
                url: url.to_owned(),
                reason: e.to_string(),
            };

            let response = self
                .client
                .get(resolved.clone())
                .send()
                .await
                .map_err(transport)?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await.map_err(transport)?;
            debug!("GET {} -> {} ({} bytes)", resolved, status, body.len());

            Ok(CachedResponse {
                url: url.to_owned(),
                status,
                content_type,
                body,
                stored_at: Utc::now(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn resolves_relative_entries_against_base() {
            let fetcher = HttpFetcher::new("https://games.example/treehouse/").unwrap();
            assert_eq!(
                fetcher.resolve("./").unwrap().as_str(),
                "https://games.example/treehouse/"
            );
            assert_eq!(
                fetcher.resolve("./index.html").unwrap().as_str(),
                "https://games.example/treehouse/index.html"
            );
            assert_eq!(
                fetcher.resolve("https://cdn.tailwindcss.com").unwrap().as_str(),
                "https://cdn.tailwindcss.com/"
            );
        }

        #[test]
        fn rejects_invalid_base() {
            assert!(matches!(
                HttpFetcher::new("not a url"),
                Err(FetchError::InvalidUrl { .. })
            ));
        }
    }
}
