//! Trading backend API client
//!
//! Every call goes through [`ApiClient::execute`], which attaches the bearer
//! credential and turns a missing or rejected credential into
//! [`AuthOutcome::Unauthenticated`] after clearing it and redirecting.
//! Callers must stop on that branch: the page is navigating away.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DashboardError, Result};
use crate::session::SessionGuard;
use crate::types::{
    AccountStatus, ActionReply, CloseRequest, Position, Settings, SettingsReply, Trade,
};

/// Result of an authorized call
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome<T> {
    Authorized(T),
    /// No credential, or the server answered 401. A redirect is in flight.
    Unauthenticated,
}

impl<T> AuthOutcome<T> {
    pub fn authorized(self) -> Option<T> {
        match self {
            AuthOutcome::Authorized(value) => Some(value),
            AuthOutcome::Unauthenticated => None,
        }
    }
}

/// Dashboard API client
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: SessionGuard,
}

impl ApiClient {
    /// Create new client for an absolute API base such as `https://host/api`
    pub fn new(base: Url, session: SessionGuard) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            session,
        }
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    /// Exchange connection and balances
    pub async fn account_status(&self) -> Result<AuthOutcome<AccountStatus>> {
        let url = self.endpoint(&["account", "status"])?;
        self.get(url).await
    }

    /// Current trading settings
    pub async fn settings(&self) -> Result<AuthOutcome<SettingsReply>> {
        let url = self.endpoint(&["settings"])?;
        self.get(url).await
    }

    /// Push the full settings object
    pub async fn update_settings(&self, settings: &Settings) -> Result<AuthOutcome<ActionReply>> {
        let url = self.endpoint(&["settings"])?;
        self.send_json(Method::PUT, url, settings).await
    }

    /// Open positions
    pub async fn positions(&self) -> Result<AuthOutcome<Vec<Position>>> {
        let url = self.endpoint(&["positions"])?;
        self.get(url).await
    }

    /// Close a position with a market order on the opposite side
    pub async fn close_position(
        &self,
        symbol: &str,
        request: &CloseRequest,
    ) -> Result<AuthOutcome<ActionReply>> {
        let url = self.endpoint(&["positions", symbol, "close"])?;
        self.send_json(Method::POST, url, request).await
    }

    /// Most recent trades, newest first
    pub async fn trades(&self, limit: u32) -> Result<AuthOutcome<Vec<Trade>>> {
        let mut url = self.endpoint(&["trades"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get(url).await
    }

    /// A single trade by database id
    pub async fn trade(&self, id: i64) -> Result<AuthOutcome<Trade>> {
        let url = self.endpoint(&["trades", &id.to_string()])?;
        self.get(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| DashboardError::Config(format!("API base {} cannot take a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<AuthOutcome<T>> {
        tracing::debug!(%url, "GET");
        let request = self.http.get(url);
        self.execute(request).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<AuthOutcome<T>> {
        tracing::debug!(%method, %url, "sending");
        let request = self.http.request(method, url).json(body);
        self.execute(request).await
    }

    /// Attach the credential, send, and intercept 401
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<AuthOutcome<T>> {
        let Some(token) = self.session.require() else {
            return Ok(AuthOutcome::Unauthenticated);
        };

        let response = request.bearer_auth(token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Ok(AuthOutcome::Unauthenticated);
        }

        Self::handle_response(response)
            .await
            .map(AuthOutcome::Authorized)
    }

    /// Decode a success body, or turn the status into an API error
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(DashboardError::from)
    }
}

/// Pull `error` or FastAPI's `detail` out of an error body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(field) = value.get("error").or_else(|| value.get("detail")) {
            return field
                .as_str()
                .map_or_else(|| field.to_string(), str::to_string);
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
