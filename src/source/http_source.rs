use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::traits::ContentSource;
use crate::config::EngineConfig;
use crate::domain::{Challenge, Feedback, Story};
use crate::error::FetchError;

/// reqwest-backed client for the content-generation API.
pub struct HttpContentSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpContentSource {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Race a request against the cancellation token. A fired token settles
    /// the call with `Cancelled` and drops the transport future.
    async fn send_cancellable(
        &self,
        req: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, FetchError> {
        tokio::select! {
            resp = req.timeout(self.timeout).send() => {
                resp.map_err(FetchError::from_transport)
            }
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
        }
    }

    /// Check the status and decode the body, still honoring cancellation
    /// while the body streams in.
    async fn read_json<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(server_error(status, resp).await);
        }

        tokio::select! {
            body = resp.json::<T>() => body.map_err(FetchError::from_transport),
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
        }
    }
}

async fn server_error(status: StatusCode, resp: reqwest::Response) -> FetchError {
    let body = resp.text().await.unwrap_or_default();
    let message = extract_api_error(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    warn!("content api error status={} message={}", status.as_u16(), message);
    FetchError::Server {
        status: status.as_u16(),
        message,
    }
}

/// The backend reports failures as `{"error": "..."}`.
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrBody {
        error: String,
    }
    serde_json::from_str::<ErrBody>(body).ok().map(|e| e.error)
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    answer: &'a str,
    correct_answer: &'a str,
    question: &'a str,
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn probe(&self, cancel: &CancellationToken) -> Result<(), FetchError> {
        #[derive(Deserialize)]
        struct Health {
            #[allow(dead_code)]
            status: String,
        }

        let req = self.client.get(self.endpoint("health"));
        let resp = self.send_cancellable(req, cancel).await?;
        let _: Health = self.read_json(resp, cancel).await?;
        Ok(())
    }

    async fn fetch_story(
        &self,
        level: u32,
        cancel: &CancellationToken,
    ) -> Result<Story, FetchError> {
        debug!("fetching story level={}", level);
        let req = self
            .client
            .get(self.endpoint("story"))
            .query(&[("level", level)]);
        let resp = self.send_cancellable(req, cancel).await?;
        self.read_json(resp, cancel).await
    }

    async fn fetch_challenge(
        &self,
        level: u32,
        language: &str,
        objective: &str,
        cancel: &CancellationToken,
    ) -> Result<Challenge, FetchError> {
        debug!("fetching challenge level={} language={}", level, language);
        let req = self
            .client
            .get(self.endpoint("challenge"))
            .query(&[("level", level)])
            .query(&[("language", language), ("objective", objective)]);
        let resp = self.send_cancellable(req, cancel).await?;
        self.read_json(resp, cancel).await
    }

    async fn submit_feedback(
        &self,
        answer: &str,
        correct_answer: &str,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<Feedback, FetchError> {
        debug!("submitting feedback answer_len={}", answer.len());
        let req = self.client.post(self.endpoint("feedback")).json(&FeedbackRequest {
            answer,
            correct_answer,
            question,
        });
        let resp = self.send_cancellable(req, cancel).await?;
        self.read_json(resp, cancel).await
    }
}
