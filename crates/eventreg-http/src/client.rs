use async_trait::async_trait;
use eventreg_core::{EventId, ExistingRegistration, RegistrationId};
use eventreg_storage::{CreatedRegistration, RegistrationPayload, RegistrationStore, StorageError};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::HttpStoreConfig;

/// Registration store backed by the registration REST API.
///
/// Endpoints:
/// - `GET {base}/events/{eventId}/registrations`
/// - `DELETE {base}/registrations/{registrationId}`
/// - `POST {base}/registrations`
pub struct HttpRegistrationStore {
    http: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpRegistrationStore {
    pub fn new(config: &HttpStoreConfig) -> Result<Self, StorageError> {
        let base_url = config
            .parsed_base_url()
            .map_err(StorageError::internal)?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StorageError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StorageError::internal("base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self
            .http
            .request(method, url)
            .header("Accept", "application/json");
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StorageError> {
        req.send().await.map_err(transport_error)
    }
}

#[async_trait]
impl RegistrationStore for HttpRegistrationStore {
    async fn list_registrations(
        &self,
        event_id: &EventId,
    ) -> Result<Vec<ExistingRegistration>, StorageError> {
        let url = self.endpoint(&["events", event_id.as_str(), "registrations"])?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        let resp = ensure_success(resp, None).await?;
        let listed: Vec<ExistingRegistration> = decode(resp).await?;
        // The API keeps cancelled records; callers only see live ones.
        Ok(listed.into_iter().filter(|r| r.is_active()).collect())
    }

    async fn cancel_registration(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<(), StorageError> {
        let url = self.endpoint(&["registrations", registration_id.as_str()])?;
        let resp = self.send(self.request(Method::DELETE, url)).await?;
        ensure_success(resp, Some(registration_id.as_str())).await?;
        Ok(())
    }

    async fn create_registration(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<CreatedRegistration, StorageError> {
        let url = self.endpoint(&["registrations"])?;
        let resp = self
            .send(self.request(Method::POST, url).json(payload))
            .await?;
        let resp = ensure_success(resp, None).await?;
        let created: CreatedRegistration = decode(resp).await?;
        tracing::debug!(
            registration_id = %created.registration_id,
            child = %payload.child_name,
            notification_sent = created.notification_sent,
            "Registration created via REST"
        );
        Ok(created)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

fn transport_error(e: reqwest::Error) -> StorageError {
    if e.is_timeout() {
        StorageError::timeout(e.to_string())
    } else if e.is_decode() {
        StorageError::invalid_response(e.to_string())
    } else {
        StorageError::connection_error(e.to_string())
    }
}

/// Maps non-2xx responses to errors. A 404 on `not_found_id` becomes
/// `NotFound`.
async fn ensure_success(
    resp: Response,
    not_found_id: Option<&str>,
) -> Result<Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND
        && let Some(id) = not_found_id
    {
        return Err(StorageError::not_found(id));
    }
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        return Err(StorageError::timeout(format!("HTTP {status}")));
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StorageError::rejected(
        Some(status.as_u16()),
        error_message(&body).unwrap_or_else(|| status.to_string()),
    ))
}

/// Pulls a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error", "detail"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
                return Some(msg.to_string());
            }
        }
    }
    Some(trimmed.to_string())
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, StorageError> {
    let body = resp.text().await.map_err(transport_error)?;
    serde_json::from_str(&body)
        .map_err(|e| StorageError::invalid_response(format!("Failed to parse response JSON: {e}")))
}
