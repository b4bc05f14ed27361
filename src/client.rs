use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::de::DeserializeOwned;
use std::env;
use std::time::{Duration, Instant};
use url::Url;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{ChatReplyRequest, ChatReplyResponse, Project, ProjectList};

/// Backend URL used when neither an explicit URL nor the environment supplies one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable consulted for the backend URL.
pub const API_URL_ENV: &str = "PROOFCHAT_API_URL";

/// Picks the backend URL: the explicit one, else the environment's, else
/// [`DEFAULT_API_URL`].  Empty values count as unset.
pub fn resolve_base_url(explicit: Option<String>, env_value: Option<String>) -> String {
    explicit
        .filter(|url| !url.trim().is_empty())
        .or_else(|| env_value.filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// HTTP client for a project-scoped chat backend.
#[derive(Debug, Clone)]
pub struct Client {
    client: ReqwestClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the
    /// PROOFCHAT_API_URL environment variable, falling back to
    /// `http://localhost:5000`.  No request timeout is enforced.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = resolve_base_url(base_url, env::var(API_URL_ENV).ok());
        let base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::url(
                format!("{base_url} cannot be used as a base URL"),
                None,
            ));
        }

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The backend URL requests are issued against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// The per-request timeout, if one is enforced.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::url("base URL cannot take path segments", None))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process backend error responses and convert to our Error type
    async fn process_error_response(response: Response, project_id: Option<&str>) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            body
        };

        match status_code {
            404 => Error::not_found(message, project_id.map(String::from)),
            408 => Error::timeout(message, None),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message),
            _ => Error::api(status_code, message),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await.map_err(|e| {
            Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        serde_json::from_slice(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Fetch the project list with `GET {base}/list_projects`.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(&["list_projects"])?;
        tracing::debug!(%url, "fetching project list");
        let start = Instant::now();
        CLIENT_REQUESTS.click();

        let result: Result<Vec<Project>> = async {
            let response = self
                .client
                .get(url)
                .headers(self.default_headers())
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            if !response.status().is_success() {
                return Err(Self::process_error_response(response, None).await);
            }

            let list: ProjectList = Self::decode(response).await?;
            Ok(list.projects)
        }
        .await;

        Self::record(start, result.is_err());
        result
    }

    /// Ask for a reply with `POST {base}/get_chat_reply/{project_id}`.
    pub async fn get_chat_reply(
        &self,
        project_id: &str,
        request: &ChatReplyRequest,
    ) -> Result<ChatReplyResponse> {
        let url = self.endpoint(&["get_chat_reply", project_id])?;
        tracing::debug!(
            %url,
            history = request.message_history.len(),
            "requesting chat reply"
        );
        let start = Instant::now();
        CLIENT_REQUESTS.click();

        let result: Result<ChatReplyResponse> = async {
            let response = self
                .client
                .post(url)
                .headers(self.default_headers())
                .json(request)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;

            if !response.status().is_success() {
                return Err(Self::process_error_response(response, Some(project_id)).await);
            }

            Self::decode::<ChatReplyResponse>(response).await
        }
        .await;

        Self::record(start, result.is_err());
        result
    }

    fn record(start: Instant, failed: bool) {
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if failed {
            CLIENT_REQUEST_ERRORS.click();
        }
    }
}

#[async_trait::async_trait]
impl Backend for Client {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Client::list_projects(self).await
    }

    async fn get_chat_reply(
        &self,
        project_id: &str,
        request: &ChatReplyRequest,
    ) -> Result<ChatReplyResponse> {
        Client::get_chat_reply(self, project_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new(Some("http://localhost:5000".to_string())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/");
        assert_eq!(client.timeout(), None);

        let client = Client::with_options(
            Some("https://chat.example.com/api/".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://chat.example.com/api/");
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn base_url_prefers_explicit_then_env_then_default() {
        assert_eq!(
            resolve_base_url(
                Some("http://flag:1".to_string()),
                Some("http://env:2".to_string())
            ),
            "http://flag:1"
        );
        assert_eq!(
            resolve_base_url(None, Some("http://env:2".to_string())),
            "http://env:2"
        );
        assert_eq!(resolve_base_url(None, None), DEFAULT_API_URL);
        assert_eq!(DEFAULT_API_URL, "http://localhost:5000");
    }

    #[test]
    fn empty_base_url_values_fall_through() {
        assert_eq!(
            resolve_base_url(Some(String::new()), Some("http://env:2".to_string())),
            "http://env:2"
        );
        assert_eq!(
            resolve_base_url(None, Some("  ".to_string())),
            DEFAULT_API_URL
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Client::new(Some("not a url".to_string())).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
        let err = Client::new(Some("mailto:someone@example.com".to_string())).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn endpoints_join_under_base() {
        let client = Client::new(Some("http://localhost:5000".to_string())).unwrap();
        assert_eq!(
            client.endpoint(&["list_projects"]).unwrap().as_str(),
            "http://localhost:5000/list_projects"
        );

        let client = Client::new(Some("http://host/api/".to_string())).unwrap();
        assert_eq!(
            client.endpoint(&["get_chat_reply", "p-1"]).unwrap().as_str(),
            "http://host/api/get_chat_reply/p-1"
        );
    }

    #[test]
    fn project_ids_are_encoded_as_one_segment() {
        let client = Client::new(Some("http://host".to_string())).unwrap();
        assert_eq!(
            client
                .endpoint(&["get_chat_reply", "team docs/2024"])
                .unwrap()
                .as_str(),
            "http://host/get_chat_reply/team%20docs%2F2024"
        );
    }
}
