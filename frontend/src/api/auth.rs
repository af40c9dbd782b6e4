use super::{
    client::ApiClient,
    types::{ApiError, LoginRequest, LoginResponse},
};

impl ApiClient {
    /// `POST {base}/auth/login`. The token is not persisted here; that is the
    /// login flow's job, through the session store.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .http_client()
            .post(format!("{}/auth/login", base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;

        if response.status().is_success() {
            response
                .json::<LoginResponse>()
                .await
                .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
        } else {
            Err(Self::error_from(response, "Login failed").await)
        }
    }
}
