use super::types::{BlogSummary, LoginResponse, SearchRequest, SearchResponse};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::form::Form;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument, trace};

const LOGIN_PATH: &str = "/login";
const LOGOUT_PATH: &str = "/logout";
const SEARCH_PATH: &str = "/search";
const BLOGS_PATH: &str = "/diagnostics";
const LEGACY_BLOGS_PATH: &str = "/list-blogs";

/// HTTP transport for the search backend.
///
/// The underlying client keeps a cookie store, so the session cookie handed
/// out by a successful login rides along on every later search.
#[derive(Debug, Clone)]
pub struct XapblrClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: u64,
}

impl XapblrClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&format!("xapblr-client/{}", env!("CARGO_PKG_VERSION")))
            .map_err(|e| ClientError::ConfigInvalid(e.to_string()))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            request_timeout: config.request_timeout,
        })
    }

    /// Submits the login form's fields as-is. Missing or wrong credentials come
    /// back in-band as `success: false`.
    #[instrument(skip(self, form), fields(username = form.get("username").unwrap_or_default()))]
    pub async fn login(&self, form: &Form) -> Result<LoginResponse> {
        let body = self.post_json(LOGIN_PATH, &form.payload()).await?;
        let response: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse login response");
            ClientError::JsonParse(e)
        })?;
        debug!(success = response.success, "Login completed");
        Ok(response)
    }

    #[instrument(skip(self), fields(blog = %request.blog, query = %request.query, page = request.page))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let body = self.post_json(SEARCH_PATH, request).await?;
        let response = SearchResponse::from_json(&body).map_err(|e| {
            error!(error = %e, "Failed to parse search response");
            ClientError::JsonParse(e)
        })?;
        debug!(
            result_count = response.results.len(),
            matches = response.meta.matches,
            "Search completed"
        );
        Ok(response)
    }

    /// Ends the cookie session. The backend answers with a redirect to its
    /// index page, whose body is of no interest here.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.get(LOGOUT_PATH).await?;
        debug!("Logout completed");
        Ok(())
    }

    /// Indexed blogs, for offering blog choices. Older backends only serve
    /// the listing at `/list-blogs`.
    #[instrument(skip(self))]
    pub async fn list_blogs(&self) -> Result<Vec<BlogSummary>> {
        let body = match self.get(BLOGS_PATH).await {
            Err(ClientError::Api { status: 404, .. }) => {
                debug!("Blog listing not found, trying legacy path");
                self.get(LEGACY_BLOGS_PATH).await?
            }
            other => other?,
        };
        let blogs: Vec<BlogSummary> = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse blog listing");
            ClientError::JsonParse(e)
        })?;
        debug!(blog_count = blogs.len(), "Blog listing received");
        Ok(blogs)
    }

    async fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending GET to backend");
        self.send(self.client.get(&url)).await
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending POST to backend");
        self.send(self.client.post(&url).json(payload)).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request.send().await.map_err(|e| self.map_err(e))?;

        let status = response.status();
        debug!(status = %status, "Received response from backend");

        if !status.is_success() {
            let status = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            error!(status, "Backend returned an error status");
            return Err(ClientError::Api { status, message });
        }

        let body = response.text().await.map_err(|e| self.map_err(e))?;
        trace!(body = %body, "Response body");
        Ok(body)
    }

    fn map_err(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            error!("Request timed out");
            ClientError::Timeout(self.request_timeout)
        } else {
            error!(error = %e, "Network error talking to backend");
            ClientError::Http(e)
        }
    }
}
