// ==========================================
// 生产进度看板 - 认证层
// ==========================================

pub mod guard;
pub mod provider;
pub mod supabase;

pub use guard::{extract_access_token, AuthGuard, GuardDecision, LOGIN_PATH, SESSION_COOKIE};
pub use provider::{AuthError, AuthErrorBody, AuthProvider, AuthResponse};
pub use supabase::SupabaseAuthClient;
