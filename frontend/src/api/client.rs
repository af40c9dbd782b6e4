use reqwest::Client;

use crate::{api::types::ApiError, config};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    pub(super) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.trim_end_matches('/').to_string()
        } else {
            config::await_api_base_url().await
        }
    }

    pub(super) fn http_client(&self) -> &Client {
        &self.client
    }

    /// Error body of a failed response, or `fallback` when it has none.
    pub(super) async fn error_from(response: reqwest::Response, fallback: &str) -> ApiError {
        let status = response.status();
        match response.json::<ApiError>().await {
            Ok(error) if !error.error.is_empty() => error,
            _ => ApiError::request_failed(format!("{} ({})", fallback, status)),
        }
    }
}
