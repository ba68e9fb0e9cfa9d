use api_types::expense::TotalSpent;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::error::{AppError, Result};

/// Why a fetch failed. Only logged; users see the fixed [`FetchError`] text.
#[derive(Debug)]
pub enum FetchErrorKind {
    Unauthorized,
    Status(StatusCode),
    Transport(reqwest::Error),
    Decode(reqwest::Error),
}

#[derive(Debug, Error)]
#[error("Failed to fetch total spent")]
pub struct FetchError {
    kind: FetchErrorKind,
}

impl FetchError {
    pub fn kind(&self) -> &FetchErrorKind {
        &self.kind
    }
}

impl From<FetchErrorKind> for FetchError {
    fn from(kind: FetchErrorKind) -> Self {
        tracing::warn!(?kind, "failed to fetch total spent");
        Self { kind }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    total_spent_url: Url,
    username: String,
    password: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|err| AppError::InvalidUrl(err.to_string()))?;
        let total_spent_url = base_url
            .join("expenses/total-spent")
            .map_err(|err| AppError::InvalidUrl(err.to_string()))?;

        Ok(Self {
            total_spent_url,
            username: username.to_string(),
            password: password.to_string(),
            http: reqwest::Client::new(),
        })
    }

    /// `GET /expenses/total-spent` for the configured user.
    pub async fn total_spent(&self) -> std::result::Result<TotalSpent, FetchError> {
        let res = self
            .http
            .get(self.total_spent_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(FetchErrorKind::Transport)?;

        match res.status() {
            status if status.is_success() => Ok(res
                .json::<TotalSpent>()
                .await
                .map_err(FetchErrorKind::Decode)?),
            StatusCode::UNAUTHORIZED => Err(FetchErrorKind::Unauthorized.into()),
            status => Err(FetchErrorKind::Status(status).into()),
        }
    }
}
