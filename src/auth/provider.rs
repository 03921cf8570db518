// ==========================================
// 生产进度看板 - 认证服务契约
// ==========================================
// 每个操作返回 { data, error } 对:
// - 成功: data = Some, error = None
// - 无会话: data = None, error = None
// - 失败: data = None, error = Some
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::auth::Session;

/// 认证错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("认证服务未配置（缺少 SUPABASE_URL / SUPABASE_ANON_KEY）")]
    NotConfigured,

    #[error("登录失败: {0}")]
    InvalidCredentials(String),

    #[error("认证请求失败: {0}")]
    Request(String),

    #[error("认证服务返回错误: status={status}, {message}")]
    Provider { status: u16, message: String },
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NotConfigured => "not_configured",
            AuthError::InvalidCredentials(_) => "invalid_credentials",
            AuthError::Request(_) => "request_failed",
            AuthError::Provider { .. } => "provider_error",
        }
    }
}

/// 序列化用的错误体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&AuthError> for AuthErrorBody {
    fn from(err: &AuthError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// 认证操作结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResponse<T> {
    pub data: Option<T>,
    pub error: Option<AuthErrorBody>,
    #[serde(skip)]
    source: Option<AuthError>,
}

impl<T> AuthResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            source: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
            source: None,
        }
    }

    pub fn err(err: AuthError) -> Self {
        Self {
            data: None,
            error: Some(AuthErrorBody::from(&err)),
            source: Some(err),
        }
    }

    /// 拆成 Result（无数据且无错误时为 Ok(None)）
    pub fn into_result(self) -> Result<Option<T>, AuthError> {
        match self.source {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

impl<T> From<Result<T, AuthError>> for AuthResponse<T> {
    fn from(result: Result<T, AuthError>) -> Self {
        match result {
            Ok(data) => AuthResponse::ok(data),
            Err(err) => AuthResponse::err(err),
        }
    }
}

/// 认证服务
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 邮箱密码登录
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResponse<Session>;

    /// 按 access token 取当前会话（token 无效时 data 为空）
    async fn get_session(&self, access_token: &str) -> AuthResponse<Session>;

    /// 注销
    async fn sign_out(&self, access_token: &str) -> AuthResponse<()>;
}
