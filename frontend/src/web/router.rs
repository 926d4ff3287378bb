//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 守卫判定本身由共享层的 [`AppRoute::guard`] 完成。

use grade_manager_shared::route::{AppRoute, GuardDecision};
use grade_manager_shared::session::Role;
use leptos::logging::log;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn write_history(route: AppRoute, use_push: bool) {
    let path = route.to_path();
    if use_push {
        push_history_state(&path);
    } else {
        replace_history_state(&path);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证与角色信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
    /// 当前用户角色（注入的信号）
    role: Signal<Option<Role>>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 初始路由同样经过守卫，避免首屏渲染受保护页面。
    fn new(is_authenticated: Signal<bool>, role: Signal<Option<Role>>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial_route =
            requested.resolve(is_authenticated.get_untracked(), role.get_untracked());
        if initial_route != requested {
            log!("[Router] Initial route {} redirected to {}", requested, initial_route);
            replace_history_state(&initial_route.to_path());
        }
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            role,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到指定路由
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn go(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 替换当前历史记录（不产生新的后退项）
    pub fn redirect(&self, route: AppRoute) {
        self.navigate_to_route(route, false);
    }

    /// `use_push` 为 true 使用 pushState，否则使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();
        let role = self.role.get_untracked();

        // --- Step 1: 验证目标路由 ---
        let route = match target_route.guard(is_auth, role) {
            GuardDecision::Allow => target_route,
            GuardDecision::Redirect(redirect) => {
                log!("[Router] Access to {} denied. Redirecting to {}.", target_route, redirect);
                redirect
            }
        };

        // --- Step 2: 加载页面 (更新状态) ---
        write_history(route, use_push);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let role = self.role;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());

            // popstate 时也执行守卫逻辑
            match target_route.guard(is_authenticated.get_untracked(), role.get_untracked()) {
                GuardDecision::Allow => set_route.set(target_route),
                GuardDecision::Redirect(redirect) => {
                    replace_history_state(&redirect.to_path());
                    set_route.set(redirect);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;
        let role = self.role;

        // 使用 Effect 监听认证状态与角色变化
        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let role = role.get();
            let route = current_route.get_untracked();

            if let GuardDecision::Redirect(redirect) = route.guard(is_auth, role) {
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
                if is_auth {
                    log!("[Router] Auth state changed: logged in, redirecting to {}.", redirect);
                } else {
                    log!("[Router] Auth state changed: logged out, redirecting to login.");
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, role: Signal<Option<Role>>) -> RouterService {
    let router = RouterService::new(is_authenticated, role);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 当前用户角色信号
    role: Signal<Option<Role>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(is_authenticated, role);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 应用内链接
///
/// 拦截点击，通过路由服务导航而不是整页跳转。
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    /// 额外的 class
    #[prop(optional)]
    class: &'static str,
    /// 是否高亮为当前菜单项
    #[prop(optional)]
    active: Option<Signal<bool>>,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.go(to);
    };

    let class = move || match active {
        Some(active) if active.get() => format!("{} active", class),
        _ => class.to_string(),
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
