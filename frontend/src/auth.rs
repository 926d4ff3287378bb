//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证与角色信号来检查认证状态。

use crate::components::alert::AlertService;
use crate::web::http::{GradeApi, api_client};
use crate::web::storage::LocalStorage;
use grade_manager_shared::config::ClientConfig;
use grade_manager_shared::session::{Role, Session};
use grade_manager_shared::{ApiError, STORAGE_API_URL_KEY, STORAGE_TOKEN_KEY};
use leptos::logging::{error, log, warn};
use leptos::prelude::*;

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// Bearer Token（与 LocalStorage 同步）
    pub token: Option<String>,
    /// 从 Token 解码的会话
    pub session: Option<Session>,
    /// API 客户端实例（仅在认证成功后存在）
    pub api: Option<GradeApi>,
    /// 后端 URL（用于 UI 显示和自动填充）
    pub backend_url: String,
    /// 是否正在加载
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() && self.api.is_some()
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            is_loading: true,
            ..Default::default()
        });
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::is_authenticated))
    }

    /// 获取当前角色信号（用于路由守卫与菜单过滤）
    pub fn role_signal(&self) -> Signal<Option<Role>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.session.as_ref().map(|session| session.role)))
    }

    /// 当前 API 客户端（不追踪，用于事件处理函数）
    pub fn api(&self) -> Option<GradeApi> {
        self.state.with_untracked(|s| s.api.clone())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复 Token 与后端 URL。无效或已过期的 Token 会被删除。
pub fn init_auth(ctx: &AuthContext) {
    let config = ClientConfig::default().with_base_url(LocalStorage::get(STORAGE_API_URL_KEY).as_deref());

    let restored = LocalStorage::get(STORAGE_TOKEN_KEY).and_then(|token| {
        match Session::restore(&token, now_secs()) {
            Ok(session) => Some((token, session)),
            Err(e) => {
                warn!("[Auth] Discarding stored token: {}", e);
                LocalStorage::delete(STORAGE_TOKEN_KEY);
                None
            }
        }
    });

    if let Some((_, session)) = &restored {
        log!("[Auth] Restored session for {} ({})", session.email, session.role.label());
    }

    ctx.set_state.update(|state| {
        state.backend_url = config.api_base_url.clone();
        state.is_loading = false;
        if let Some((token, session)) = restored {
            state.api = Some(api_client(&config.api_base_url, Some(&token)));
            state.session = Some(session);
            state.token = Some(token);
        }
    });
}

/// 登录并保存状态
///
/// 成功时把 Token 与后端 URL 写入 LocalStorage；失败时返回可直接展示的错误信息。
pub async fn login(
    ctx: &AuthContext,
    url: String,
    email: String,
    password: String,
) -> Result<(), String> {
    let config = ClientConfig::default().with_base_url(Some(&url));
    let base_url = config.api_base_url;

    let token = api_client(&base_url, None)
        .login(&email, &password)
        .await
        .map_err(|e| {
            warn!("[Auth] Login failed: {}", e);
            e.user_message()
        })?;

    let session = Session::from_token(&token).map_err(|e| {
        error!("[Auth] Server issued an unusable token: {}", e);
        "Login succeeded but the session token could not be read".to_string()
    })?;

    LocalStorage::set(STORAGE_TOKEN_KEY, &token);
    LocalStorage::set(STORAGE_API_URL_KEY, &base_url);
    log!("[Auth] Signed in as {} ({})", session.email, session.role.label());

    ctx.set_state.update(|state| {
        state.api = Some(api_client(&base_url, Some(&token)));
        state.session = Some(session);
        state.token = Some(token);
        state.backend_url = base_url;
    });
    Ok(())
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    LocalStorage::delete(STORAGE_TOKEN_KEY);
    ctx.set_state.update(|state| {
        state.api = None;
        state.session = None;
        state.token = None;
        // 保留 URL 方便下次登录
    });
}

/// 统一处理请求失败
///
/// 先记录日志；会话失效时注销，其余错误以 toast 提示。
pub fn report_api_error(ctx: &AuthContext, alerts: &AlertService, action: &str, err: &ApiError) {
    error!("[Api] {} failed: {}", action, err);
    if err.is_unauthorized() {
        alerts.error("Session expired");
        logout(ctx);
    } else {
        alerts.error(format!("{}: {}", action, err.user_message()));
    }
}
