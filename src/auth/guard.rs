// ==========================================
// 生产进度看板 - 访问守卫
// ==========================================
// 规则: 公开路径直接放行；其余路径无有效会话时跳转登录页
// 公开: /login.html, /api/auth/*, /health
// ==========================================

use crate::domain::auth::Session;

pub const LOGIN_PATH: &str = "/login.html";
pub const SESSION_COOKIE: &str = "sb-access-token";

/// 守卫判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行（展示内容）
    Reveal,
    /// 跳转登录页
    RedirectToLogin,
}

#[derive(Debug, Clone)]
pub struct AuthGuard {
    public_exact: Vec<String>,
    public_prefixes: Vec<String>,
}

impl Default for AuthGuard {
    fn default() -> Self {
        Self {
            public_exact: vec![LOGIN_PATH.to_string(), "/health".to_string()],
            public_prefixes: vec!["/api/auth/".to_string()],
        }
    }
}

impl AuthGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_exact.iter().any(|p| p == path)
            || self.public_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// 判定路径是否可访问
    ///
    /// `now_unix` 用于剔除已过期的会话
    pub fn decide(&self, path: &str, session: Option<&Session>, now_unix: i64) -> GuardDecision {
        if self.is_public(path) {
            return GuardDecision::Reveal;
        }
        match session {
            Some(s) if !s.is_expired_at(now_unix) => GuardDecision::Reveal,
            _ => GuardDecision::RedirectToLogin,
        }
    }
}

/// 从请求头中提取 access token
///
/// 优先 `Authorization: Bearer`，其次 `sb-access-token` cookie
pub fn extract_access_token(authorization: Option<&str>, cookie: Option<&str>) -> Option<String> {
    if let Some(token) = authorization
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    cookie?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|t| !t.is_empty())
}
