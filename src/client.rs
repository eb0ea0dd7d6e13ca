use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::{ChatCompletion, ChatCompletionChunk, ChatCompletionParams, ModelListResponse};

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/";
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);
const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// A boxed stream of completion chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk>> + Send>>;

/// Transport for chat completion requests.
///
/// `OpenRouter` is the real implementation; tests substitute a scripted
/// one. The API key is taken per call because the session's configuration
/// is rebuilt from user input on every interaction.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a complete reply in one response.
    async fn complete(
        &self,
        api_key: &str,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletion>;

    /// Request a streamed reply as a finite sequence of chunks.
    async fn complete_stream(
        &self,
        api_key: &str,
        params: ChatCompletionParams,
    ) -> Result<ChunkStream>;
}

/// Client for the OpenRouter API.
#[derive(Debug, Clone)]
pub struct OpenRouter {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl OpenRouter {
    /// Create a new OpenRouter client with the default endpoint and a
    /// 30-second completion timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let timeout = timeout.unwrap_or(COMPLETION_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
        })
    }

    /// Create and return default headers for authenticated API requests.
    fn bearer_headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
            Error::validation(
                "API key contains characters that cannot appear in a header",
                Some("api_key".to_string()),
            )
        })?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Map a reqwest transport failure to the typed taxonomy.
    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        // Get headers we might need for error processing
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|val| val.to_str().ok())
            .map(String::from);

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // Try to parse error response body
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            #[serde(rename = "type")]
            error_type: Option<String>,
            message: Option<String>,
            param: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        // Try to parse as JSON first; otherwise the raw body text is the
        // best diagnostic we have.
        let parsed_error = serde_json::from_str::<ErrorResponse>(&error_body).ok();
        let error_type = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.error_type.clone());
        let error_message = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());
        let error_param = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.param.clone());

        // Map HTTP status code to appropriate error type
        match status_code {
            400 => Error::bad_request(error_message, error_param),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message, request_id),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_type, error_message, request_id),
        }
    }

    /// Fetch the model catalog.
    ///
    /// No authentication is required; the catalog request uses its own
    /// 10-second timeout. No retries on any failure class.
    pub async fn list_models(&self) -> Result<ModelListResponse> {
        let url = format!("{}models", self.base_url);

        CLIENT_REQUESTS.click();
        let response = self
            .client
            .get(&url)
            .timeout(CATALOG_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(CATALOG_TIMEOUT.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        let body = response.text().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        })?;
        serde_json::from_str::<ModelListResponse>(&body).map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(
                format!("Failed to parse model catalog: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Send a completion request and get the full reply in one response.
    pub async fn send(
        &self,
        api_key: &str,
        mut params: ChatCompletionParams,
    ) -> Result<ChatCompletion> {
        params.stream = false;
        let url = format!("{}chat/completions", self.base_url);
        let headers = self.bearer_headers(api_key)?;

        CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                self.map_transport_error(e)
            })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatCompletion>().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Send a completion request and get a streaming response.
    ///
    /// Returns a finite stream of [`ChatCompletionChunk`] values; the
    /// stream is not restartable.
    pub async fn stream(
        &self,
        api_key: &str,
        mut params: ChatCompletionParams,
    ) -> Result<ChunkStream> {
        params.stream = true;
        let url = format!("{}chat/completions", self.base_url);

        let mut headers = self.bearer_headers(api_key)?;
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                self.map_transport_error(e)
            })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        // Get the byte stream from the response and wrap it in the SSE
        // processor.
        let stream = response.bytes_stream();
        Ok(Box::pin(process_sse(stream)))
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenRouter {
    async fn complete(
        &self,
        api_key: &str,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletion> {
        self.send(api_key, params).await
    }

    async fn complete_stream(
        &self,
        api_key: &str,
        params: ChatCompletionParams,
    ) -> Result<ChunkStream> {
        self.stream(api_key, params).await
    }
}
