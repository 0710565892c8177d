use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Method, StatusCode,
    header::{COOKIE, HeaderMap, HeaderValue},
};
use thiserror::Error;
use url::Url;

use crate::{
    config::SiteCredentials,
    pii::{UserPii, parse_pii_fragment},
    user_info::{UserId, profile_path},
    utils::UNKNOWN_ERROR_MESSAGE,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("{message}")]
    Request { message: String },
    /// A response whose body the caller needed came back unsuccessful.
    #[error("{status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("Unexpected response shape: could not locate {field} in the admin PII response")]
    UnexpectedShape { field: &'static str },
    #[error("Invalid admin endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid session cookie: {0}")]
    InvalidCookie(#[from] reqwest::header::InvalidHeaderValue),
}

/// Status summary of an admin action. Only 200 counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub status: u16,
    pub status_text: String,
}

impl ActionResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

impl From<StatusCode> for ActionResponse {
    fn from(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteReason {
    #[default]
    BanEvasion,
    NoLongerWelcome,
}

impl DeleteReason {
    pub const ALL: [DeleteReason; 2] = [DeleteReason::BanEvasion, DeleteReason::NoLongerWelcome];

    /// Dropdown label.
    pub fn label(&self) -> &'static str {
        match self {
            DeleteReason::BanEvasion => "Ban evasion",
            DeleteReason::NoLongerWelcome => "No longer welcome",
        }
    }

    /// The canonical text the delete endpoint expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteReason::BanEvasion => {
                "This user was created to circumvent system or moderator imposed restrictions and continues to contribute poorly"
            }
            DeleteReason::NoLongerWelcome => {
                "This user is no longer welcome to participate on the site"
            }
        }
    }
}

/// Moderator actions against the site's admin endpoints.
#[async_trait]
pub trait ModActions: Send + Sync {
    async fn delete_user(
        &self,
        user_id: UserId,
        reason: DeleteReason,
        reason_details: &str,
    ) -> Result<ActionResponse, ClientError>;

    async fn annotate_user(
        &self,
        user_id: UserId,
        annotation: &str,
    ) -> Result<ActionResponse, ClientError>;

    /// The canonical profile URL, after redirects.
    async fn fetch_user_profile_url(&self, user_id: UserId) -> Result<String, ClientError>;

    async fn fetch_user_pii(&self, user_id: UserId) -> Result<UserPii, ClientError>;
}

#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: Url,
    fkey: String,
    http: reqwest::Client,
}

impl AdminClient {
    pub fn new(
        base_url: Url,
        credentials: &SiteCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&credentials.cookie)?);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ClientError::Request {
            message: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            fkey: credentials.fkey.clone(),
            http,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    pub fn delete_path(user_id: UserId) -> String {
        format!("/admin/users/{}/delete", user_id)
    }

    pub fn annotate_path(user_id: UserId) -> String {
        format!("/admin/users/{}/annotate", user_id)
    }

    pub fn all_pii_path() -> &'static str {
        "/admin/all-pii"
    }

    async fn post_with_data(
        &self,
        path: &str,
        data: &[(&str, &str)],
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.endpoint(path)?;
        log::info!("POST {}", url);
        self.http
            .post(url)
            .form(data)
            .send()
            .await
            .map_err(|e| ClientError::Request {
                message: e.to_string(),
            })
    }

    async fn post_for_status(
        &self,
        path: &str,
        data: &[(&str, &str)],
    ) -> Result<ActionResponse, ClientError> {
        let response = self.post_with_data(path, data).await?;
        Ok(ActionResponse::from(response.status()))
    }

    async fn post_for_body(
        &self,
        path: &str,
        data: &[(&str, &str)],
    ) -> Result<String, ClientError> {
        let response = self.post_with_data(path, data).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::Request {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let body = if body.trim().is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                body
            };
            return Err(ClientError::Rejected { status, body });
        }
        Ok(body)
    }
}

#[async_trait]
impl ModActions for AdminClient {
    async fn delete_user(
        &self,
        user_id: UserId,
        reason: DeleteReason,
        reason_details: &str,
    ) -> Result<ActionResponse, ClientError> {
        self.post_for_status(
            &Self::delete_path(user_id),
            &[
                ("fkey", self.fkey.as_str()),
                ("deleteReason", reason.as_str()),
                ("deleteReasonDetails", reason_details),
            ],
        )
        .await
    }

    async fn annotate_user(
        &self,
        user_id: UserId,
        annotation: &str,
    ) -> Result<ActionResponse, ClientError> {
        self.post_for_status(
            &Self::annotate_path(user_id),
            &[("fkey", self.fkey.as_str()), ("annotation", annotation)],
        )
        .await
    }

    async fn fetch_user_profile_url(&self, user_id: UserId) -> Result<String, ClientError> {
        let url = self.endpoint(&profile_path(user_id))?;
        let response = self
            .http
            .request(Method::OPTIONS, url)
            .send()
            .await
            .map_err(|e| ClientError::Request {
                message: e.to_string(),
            })?;
        Ok(response.url().to_string())
    }

    async fn fetch_user_pii(&self, user_id: UserId) -> Result<UserPii, ClientError> {
        let id = user_id.to_string();
        let body = self
            .post_for_body(
                Self::all_pii_path(),
                &[("id", id.as_str()), ("fkey", self.fkey.as_str())],
            )
            .await?;
        parse_pii_fragment(&body)
    }
}
