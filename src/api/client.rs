use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ApiError;
use crate::models::RemoteEntry;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    user_id: i64,
    date: NaiveDate,
    raw_input: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AskRequest<'a> {
    user_id: i64,
    query: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    answer: String,
}

/// Client for the diary service.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// A client whose requests give up after `timeout`, so a stalled server
    /// surfaces as [`ApiError::Transport`] instead of hanging the caller.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists every entry the server holds for `user_id`.
    pub async fn fetch_diaries(&self, user_id: i64) -> Result<Vec<RemoteEntry>, ApiError> {
        let url = self.url(&format!("/users/{}/diaries", user_id));
        let response = self.http.get(&url).send().await;
        decode(url, response).await
    }

    /// Asks the server to write diary prose for a keyword. Returns the prose.
    pub async fn generate(
        &self,
        user_id: i64,
        date: NaiveDate,
        raw_input: &str,
    ) -> Result<String, ApiError> {
        let url = self.url("/diaries");
        let request = GenerateRequest {
            user_id,
            date,
            raw_input,
        };
        let response = self.http.post(&url).json(&request).send().await;
        let body: GenerateResponse = decode(url, response).await?;
        Ok(body.content)
    }

    /// Asks a free-form question about the user's diary.
    pub async fn ask(&self, user_id: i64, query: &str) -> Result<String, ApiError> {
        let url = self.url("/rag");
        let request = AskRequest { user_id, query };
        let response = self.http.post(&url).json(&request).send().await;
        let body: AskResponse = decode(url, response).await?;
        Ok(body.answer)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    url: String,
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, ApiError> {
    let response = match response {
        Ok(response) => response,
        Err(source) => return Err(ApiError::Transport { url, source }),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status { url, status });
    }

    match response.json::<T>().await {
        Ok(body) => Ok(body),
        Err(source) => Err(ApiError::Decode { url, source }),
    }
}
