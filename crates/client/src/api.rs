//! Street API client.
//!
//! [`StreetApi`] is the seam the sync controller talks to; [`StreetsClient`]
//! implements it over HTTP with `reqwest`. One call is one request, with no
//! retries.

use async_trait::async_trait;
use reqwest::{Method, Response};
use url::Url;

use tankstellen_core::{ApiMessage, Street, StreetId, StreetInput};

use crate::error::ClientError;

/// Message used when a failed response carries no readable body.
const FALLBACK_FAILURE: &str = "Operation failed";

/// The four REST operations over the street collection.
#[async_trait]
pub trait StreetApi: Send + Sync {
    /// Fetch the whole collection.
    async fn list(&self) -> Result<Vec<Street>, ClientError>;

    /// Create a record.
    async fn create(&self, input: &StreetInput) -> Result<ApiMessage, ClientError>;

    /// Replace a record.
    async fn update(&self, id: StreetId, input: &StreetInput) -> Result<ApiMessage, ClientError>;

    /// Delete a record.
    async fn delete(&self, id: StreetId) -> Result<ApiMessage, ClientError>;
}

/// HTTP client for the street API.
#[derive(Debug, Clone)]
pub struct StreetsClient {
    client: reqwest::Client,
    base_url: Url,
}

impl StreetsClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or cannot carry a path.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        // Joining relative paths replaces the last segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// The API root every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&StreetInput>,
    ) -> Result<Response, ClientError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "Sending request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}

/// Turn a failed response into a `ClientError::Api`, preferring the
/// server's `message` field.
async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    ClientError::Api {
        status,
        message: failure_message(&text),
    }
}

fn failure_message(text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ApiMessage>(text)
        && !body.message.is_empty()
    {
        return body.message;
    }
    let text = text.trim();
    if text.is_empty() {
        FALLBACK_FAILURE.to_owned()
    } else {
        text.to_owned()
    }
}

/// Read a confirmation body. Plain-text confirmations are accepted as the
/// message itself.
async fn read_message(response: Response) -> Result<ApiMessage, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or_else(|_| ApiMessage::new(text.trim())))
}

#[async_trait]
impl StreetApi for StreetsClient {
    async fn list(&self) -> Result<Vec<Street>, ClientError> {
        let response = self.send(Method::GET, "streets", None).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn create(&self, input: &StreetInput) -> Result<ApiMessage, ClientError> {
        let response = self.send(Method::POST, "streets", Some(input)).await?;
        read_message(response).await
    }

    async fn update(&self, id: StreetId, input: &StreetInput) -> Result<ApiMessage, ClientError> {
        let response = self
            .send(Method::PUT, &format!("streets/{id}"), Some(input))
            .await?;
        read_message(response).await
    }

    async fn delete(&self, id: StreetId) -> Result<ApiMessage, ClientError> {
        let response = self
            .send(Method::DELETE, &format!("streets/{id}"), None)
            .await?;
        read_message(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = StreetsClient::new("http://localhost:5001").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5001/");

        let client = StreetsClient::new("https://example.com/api").unwrap();
        assert_eq!(
            client.endpoint("streets").unwrap().as_str(),
            "https://example.com/api/streets"
        );
    }

    #[test]
    fn test_endpoint_with_id() {
        let client = StreetsClient::new("http://localhost:5001/").unwrap();
        let id = StreetId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(
            client.endpoint(&format!("streets/{id}")).unwrap().as_str(),
            "http://localhost:5001/streets/67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            StreetsClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            StreetsClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_failure_message_prefers_json_message() {
        assert_eq!(
            failure_message(r#"{"message":"Street not found"}"#),
            "Street not found"
        );
        assert_eq!(failure_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(failure_message("  "), FALLBACK_FAILURE);
        assert_eq!(failure_message(r#"{"message":""}"#), r#"{"message":""}"#);
    }
}
