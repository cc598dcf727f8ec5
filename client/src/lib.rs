//! HTTP client for the marketplace backend.
//!
//! One async method per backend endpoint. Failures are reported as
//! [`ApiError`]; non-2xx responses carry the body's message field when the
//! backend provides one. There are no retries: a call is one attempt.

pub mod wallet;

use ledgerwatch_core::config::Config;
use ledgerwatch_core::model::{
    AmmInfo, CheckReceipt, CompanyFullInfo, DistributeReceipt, InvestorsResponse, MatchesResponse,
    Opportunity, RegisterCompany, RegisterReceipt,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request never produced a response (connect, timeout, DNS).
    Network(String),
    /// Response body did not match the expected shape.
    Parse(String),
    /// Backend answered with a non-2xx status.
    Backend { status: u16, message: String },
}

impl ApiError {
    /// Text suitable for a dismissible notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(msg) => format!("Network error: {msg}"),
            ApiError::Parse(msg) => format!("Unexpected response: {msg}"),
            ApiError::Backend { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Backend { status, message } => {
                write!(f, "backend error ({status}): {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Client for the marketplace REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            base_url: config.backend_url.clone(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Marketplace listing for the browse page.
    pub async fn opportunities(&self) -> Result<Vec<Opportunity>, ApiError> {
        let url = format!("{}/companies", self.base_url);
        let response = self.get(&url).await?;
        decode(response).await
    }

    /// Aggregate company + stats + stakeholders + holders + AMM payload.
    pub async fn company_full_info(&self, company_id: &str) -> Result<CompanyFullInfo, ApiError> {
        let url = format!("{}/companies/{company_id}/full_info", self.base_url);
        let response = self.get(&url).await?;
        decode(response).await
    }

    pub async fn register_company(
        &self,
        request: &RegisterCompany,
    ) -> Result<RegisterReceipt, ApiError> {
        let url = format!("{}/companies", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(response).await
    }

    /// Single-attempt distribution trigger; the caller re-enables its action
    /// after this resolves either way.
    pub async fn check_and_distribute(
        &self,
        company_id: &str,
    ) -> Result<DistributeReceipt, ApiError> {
        let url = format!(
            "{}/companies/{company_id}/check_and_distribute",
            self.base_url
        );
        let response = self.post_empty(&url).await?;
        decode(response).await
    }

    pub async fn check_stakeholders(&self, company_id: &str) -> Result<CheckReceipt, ApiError> {
        let url = format!("{}/companies/{company_id}/check_stakeholders", self.base_url);
        let response = self.post_empty(&url).await?;
        decode(response).await
    }

    /// AMM pool snapshot, optionally from another account's perspective.
    pub async fn amm_info(
        &self,
        company_id: &str,
        account: Option<&str>,
    ) -> Result<AmmInfo, ApiError> {
        let mut url = format!("{}/companies/{company_id}/amm_info", self.base_url);
        if let Some(account) = account {
            url = format!("{url}?account={account}");
        }
        let response = self.get(&url).await?;
        // The endpoint wraps the pool as {"amm_info": {...}} while full_info
        // embeds it bare; accept both.
        let value: serde_json::Value = decode(response).await?;
        let inner = value.get("amm_info").cloned().unwrap_or(value);
        serde_json::from_value(inner).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn investors(&self) -> Result<InvestorsResponse, ApiError> {
        let url = format!("{}/matching/all", self.base_url);
        let response = self.get(&url).await?;
        decode(response).await
    }

    pub async fn investor_matches(&self, investor_id: &str) -> Result<MatchesResponse, ApiError> {
        let url = format!("{}/matching/investor/{investor_id}", self.base_url);
        let response = self.get(&url).await?;
        decode(response).await
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn post_empty(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        self.client
            .post(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: backend_message(&body, status),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body. Backends here answer
/// with one of `message`, `error`, or `detail`.
fn backend_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_prefers_message_field() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            backend_message(r#"{"message":"Distribution failed"}"#, status),
            "Distribution failed"
        );
        assert_eq!(
            backend_message(r#"{"error":"Missing required fields"}"#, status),
            "Missing required fields"
        );
        assert_eq!(
            backend_message(r#"{"detail":"Company not found."}"#, status),
            "Company not found."
        );
    }

    #[test]
    fn backend_message_falls_back_to_status_text() {
        let status = reqwest::StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(backend_message("not json at all", status), "Internal Server Error");
        assert_eq!(backend_message("{}", status), "Internal Server Error");
    }

    #[test]
    fn api_error_user_message_surfaces_backend_text() {
        let err = ApiError::Backend {
            status: 400,
            message: "Total percentage (shareholders + liquidity) must equal 100%".into(),
        };
        assert!(err.user_message().contains("must equal 100%"));
        let err = ApiError::Network("connection refused".into());
        assert!(err.user_message().starts_with("Network error"));
    }
}
