use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ErrorBody,
    protocol::{GameResponse, GuessRequest, RemoteSnapshot, GUESS_ROUTE, HINT_ROUTE, START_ROUTE},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The remote game service. Word selection and guess validation live behind
/// this boundary; the client only sees snapshots.
#[async_trait]
pub trait GameService: Send + Sync {
    async fn start(&self) -> Result<RemoteSnapshot, ClientError>;
    async fn guess(&self, guess: &str) -> Result<RemoteSnapshot, ClientError>;
    async fn hint(&self) -> Result<RemoteSnapshot, ClientError>;
}

pub struct HttpGameClient {
    http: Client,
    base_url: Url,
}

impl HttpGameClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::HttpClient)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post(
        &self,
        route: &'static str,
        body: Option<&GuessRequest>,
    ) -> Result<RemoteSnapshot, ClientError> {
        let url = self.base_url.join(route)?;
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let res = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|source| ClientError::Transport { route, source })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(ClientError::Rejected {
                route,
                status: status.as_u16(),
                message,
            });
        }

        let response: GameResponse =
            serde_json::from_str(&text).map_err(|err| ClientError::MalformedResponse {
                route,
                reason: err.to_string(),
            })?;
        let snapshot =
            RemoteSnapshot::try_from(response).map_err(|err| ClientError::MalformedResponse {
                route,
                reason: err.to_string(),
            })?;
        debug!(
            route,
            breach_level = snapshot.breach_level,
            stage = snapshot.stage_name.as_deref().unwrap_or("-"),
            game_over = snapshot.game_over,
            "received snapshot"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl GameService for HttpGameClient {
    async fn start(&self) -> Result<RemoteSnapshot, ClientError> {
        self.post(START_ROUTE, None).await
    }

    async fn guess(&self, guess: &str) -> Result<RemoteSnapshot, ClientError> {
        self.post(
            GUESS_ROUTE,
            Some(&GuessRequest {
                guess: guess.to_string(),
            }),
        )
        .await
    }

    async fn hint(&self) -> Result<RemoteSnapshot, ClientError> {
        self.post(HINT_ROUTE, None).await
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
