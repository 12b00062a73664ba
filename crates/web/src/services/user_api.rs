//! Client for the external user backend.
//!
//! When `WAKALNI_USER_API_URL` is set, sign-up, login, logout and OTP
//! requests are forwarded to this backend:
//!
//! - `POST /user/register` and `POST /user/login` return `{ user, token }`
//! - `POST /user/verify` with `Cookie: token=<token>` returns the user
//! - `POST /user/logout`
//! - `POST /user/send-otp` with `{ email }`

use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wakalni_core::Role;

use crate::config::UserApiConfig;

/// Errors that can occur when calling the user backend.
#[derive(Debug, Error)]
pub enum UserApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl UserApiError {
    /// Whether the backend refused the credentials themselves.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }
}

/// A user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUser {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, rename = "type")]
    pub role: Option<Role>,
}

/// Response of register and login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: ApiUser,
    pub token: String,
}

/// Body of register.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(rename = "type")]
    pub role: Role,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
}

/// User backend client.
#[derive(Clone)]
pub struct UserApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl UserApiClient {
    /// Create a new user backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &UserApiConfig) -> Result<Self, UserApiError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let auth_value = format!("Bearer {}", key.expose_secret());
            let mut value = HeaderValue::from_str(&auth_value)
                .map_err(|e| UserApiError::InvalidRequest(format!("Invalid API key format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, UserApiError> {
        self.base_url
            .join(path)
            .map_err(|e| UserApiError::InvalidRequest(e.to_string()))
    }

    /// POST `body` to `path` and fail on non-success statuses.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<reqwest::Response, UserApiError> {
        let mut request = self.client.post(self.endpoint(path)?).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(path, status = status.as_u16(), "User API request failed");
            return Err(UserApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses it.
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<AuthResponse, UserApiError> {
        let response = self.post("user/register", Some(request), HeaderMap::new()).await?;
        Ok(response.json().await?)
    }

    /// Sign in with e-mail and password.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the credentials are refused.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, UserApiError> {
        let body = LoginRequest { email, password };
        let response = self.post("user/login", Some(&body), HeaderMap::new()).await?;
        Ok(response.json().await?)
    }

    /// Resolve a session token to its user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the token is refused.
    pub async fn verify(&self, token: &str) -> Result<ApiUser, UserApiError> {
        let response = self
            .post::<()>("user/verify", None, token_cookie(token)?)
            .await?;
        Ok(response.json().await?)
    }

    /// End the backend session of `token`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), UserApiError> {
        let headers = token.map(token_cookie).transpose()?.unwrap_or_default();
        self.post::<()>("user/logout", None, headers).await?;
        Ok(())
    }

    /// Ask the backend to e-mail a one-time password.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn send_otp(&self, email: &str) -> Result<(), UserApiError> {
        self.post("user/send-otp", Some(&OtpRequest { email }), HeaderMap::new())
            .await?;
        Ok(())
    }
}

fn token_cookie(token: &str) -> Result<HeaderMap, UserApiError> {
    let mut value = HeaderValue::from_str(&format!("token={token}"))
        .map_err(|e| UserApiError::InvalidRequest(format!("Invalid token: {e}")))?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, value);
    Ok(headers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> UserApiClient {
        UserApiClient::new(&UserApiConfig {
            base_url: Url::parse(base).unwrap(),
            api_key: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        let api = client("https://api.wakalni.dz/v1/");
        assert_eq!(
            api.endpoint("user/login").unwrap().as_str(),
            "https://api.wakalni.dz/v1/user/login"
        );
    }

    #[test]
    fn test_token_cookie() {
        let headers = token_cookie("abc123").unwrap();
        assert_eq!(headers.get(COOKIE).unwrap(), "token=abc123");
        assert!(token_cookie("bad\ntoken").is_err());
    }

    #[test]
    fn test_auth_response_accepts_mongo_ids() {
        let json = r#"{"user":{"_id":"65a1","email":"a@b.dz","type":"admin"},"token":"t"}"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user.id, "65a1");
        assert_eq!(response.user.role, Some(Role::Admin));
        assert_eq!(response.user.name, None);
    }

    #[test]
    fn test_is_rejection() {
        let refused = UserApiError::Api {
            status: 401,
            message: String::new(),
        };
        let broken = UserApiError::Api {
            status: 503,
            message: String::new(),
        };
        assert!(refused.is_rejection());
        assert!(!broken.is_rejection());
    }
}
