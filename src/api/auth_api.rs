// ==========================================
// 生产进度看板 - 认证 API
// ==========================================
// 职责: 包装 AuthProvider；认证服务未配置时所有操作返回 not_configured
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, AuthGuard, AuthProvider, AuthResponse, GuardDecision};
use crate::domain::auth::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthApi {
    provider: Option<Arc<dyn AuthProvider>>,
    guard: AuthGuard,
}

impl AuthApi {
    pub fn new(provider: Option<Arc<dyn AuthProvider>>) -> Self {
        Self {
            provider,
            guard: AuthGuard::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn login(&self, req: &LoginRequest) -> AuthResponse<Session> {
        let Some(provider) = &self.provider else {
            return AuthResponse::err(AuthError::NotConfigured);
        };
        if req.email.trim().is_empty() || req.password.is_empty() {
            return AuthResponse::err(AuthError::InvalidCredentials(
                "email y password son obligatorios".to_string(),
            ));
        }
        provider.sign_in_with_password(req.email.trim(), &req.password).await
    }

    pub async fn logout(&self, access_token: Option<&str>) -> AuthResponse<()> {
        let Some(provider) = &self.provider else {
            return AuthResponse::err(AuthError::NotConfigured);
        };
        match access_token {
            Some(token) => provider.sign_out(token).await,
            // 没有会话，视为已注销
            None => AuthResponse::ok(()),
        }
    }

    pub async fn session(&self, access_token: Option<&str>) -> AuthResponse<Session> {
        let Some(provider) = &self.provider else {
            return AuthResponse::err(AuthError::NotConfigured);
        };
        match access_token {
            Some(token) => provider.get_session(token).await,
            None => AuthResponse::empty(),
        }
    }

    /// 守卫判定（受保护路径需要有效会话）
    pub async fn authorize(&self, path: &str, access_token: Option<&str>) -> GuardDecision {
        if self.guard.is_public(path) {
            return GuardDecision::Reveal;
        }
        let session = match (self.provider.is_some(), access_token) {
            (true, Some(_)) => self.session(access_token).await.into_result().ok().flatten(),
            _ => None,
        };
        self.guard.decide(path, session.as_ref(), Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_provider_reports_not_configured() {
        let api = AuthApi::new(None);
        let resp = api
            .login(&LoginRequest {
                email: "ops@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await;
        assert_eq!(resp.error.unwrap().code, "not_configured");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_guards_everything_but_public() {
        let api = AuthApi::new(None);
        assert_eq!(api.authorize("/health", None).await, GuardDecision::Reveal);
        assert_eq!(
            api.authorize("/api/dashboard", Some("jwt")).await,
            GuardDecision::RedirectToLogin
        );
    }
}
