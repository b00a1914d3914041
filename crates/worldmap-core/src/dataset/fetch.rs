// crates/worldmap-core/src/dataset/fetch.rs
use crate::error::Result;

/// Black-box GET: returns the response body of a successful request.
///
/// Implementations must turn a non-success status into
/// [`crate::MapError::Status`] so callers can tell a 404 from a transport
/// failure.
#[allow(async_fn_in_trait)]
pub trait HttpFetch {
    async fn fetch(&self, url: &str) -> Result<String>;
}

impl<T: HttpFetch + ?Sized> HttpFetch for &T {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}

impl<T: HttpFetch + ?Sized> HttpFetch for std::rc::Rc<T> {
    async fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url).await
    }
}

#[cfg(feature = "http")]
pub use reqwest_impl::ReqwestFetcher;

#[cfg(feature = "http")]
mod reqwest_impl {
    use super::HttpFetch;
    use crate::error::{MapError, Result};

    /// [`HttpFetch`] over a shared `reqwest::Client`.
    ///
    /// On `wasm32` reqwest delegates to the browser's `fetch`, so the same
    /// type serves both native hosts and the wasm bindings.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestFetcher {
        client: reqwest::Client,
    }

    impl ReqwestFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl HttpFetch for ReqwestFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            log::debug!("GET {url}");
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(MapError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(response.text().await?)
        }
    }
}
