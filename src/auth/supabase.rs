// ==========================================
// 生产进度看板 - Supabase GoTrue 客户端
// ==========================================
// 接口:
// - POST {url}/auth/v1/token?grant_type=password
// - GET  {url}/auth/v1/user
// - POST {url}/auth/v1/logout
// 所有请求带 apikey 头（anon key）
// ==========================================

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::auth::provider::{AuthError, AuthProvider, AuthResponse};
use crate::config::AuthConfig;
use crate::domain::auth::{AuthUser, Session};

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now_unix: i64) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now_unix + secs));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// GoTrue 错误体有多种形状，取第一个可读字段
#[derive(Debug, Default, Deserialize)]
struct GoTrueErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl GoTrueErrorBody {
    fn into_message(self, status: StatusCode) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .unwrap_or_else(|| status.to_string())
    }
}

/// Supabase 认证客户端
pub struct SupabaseAuthClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuthClient {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AuthError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn error_from(resp: reqwest::Response) -> AuthError {
        let status = resp.status();
        let body: GoTrueErrorBody = resp.json().await.unwrap_or_default();
        let message = body.into_message(status);
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            AuthError::InvalidCredentials(message)
        } else {
            AuthError::Provider {
                status: status.as_u16(),
                message,
            }
        }
    }

    async fn password_grant(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let resp = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::Request(format!("登录响应解析失败: {}", e)))?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    async fn fetch_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        let resp = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        match resp.status() {
            s if s.is_success() => resp
                .json::<AuthUser>()
                .await
                .map(Some)
                .map_err(|e| AuthError::Request(format!("用户信息解析失败: {}", e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(Self::error_from(resp).await),
        }
    }

    async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        // 已失效的 token 视为已注销
        if resp.status().is_success() || resp.status() == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(Self::error_from(resp).await)
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResponse<Session> {
        let result = self.password_grant(email, password).await;
        match &result {
            Ok(session) => tracing::info!(user_id = %session.user.id, "用户登录成功"),
            Err(e) => tracing::warn!(error = %e, "用户登录失败"),
        }
        result.into()
    }

    async fn get_session(&self, access_token: &str) -> AuthResponse<Session> {
        match self.fetch_user(access_token).await {
            Ok(Some(user)) => AuthResponse::ok(Session {
                access_token: access_token.to_string(),
                refresh_token: None,
                expires_at: None,
                user,
            }),
            Ok(None) => AuthResponse::empty(),
            Err(e) => {
                tracing::error!(error = %e, "会话校验失败");
                AuthResponse::err(e)
            }
        }
    }

    async fn sign_out(&self, access_token: &str) -> AuthResponse<()> {
        self.logout(access_token).await.into()
    }
}
