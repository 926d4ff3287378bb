//! Grade Manager 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::router`: 路由服务（核心引擎），路由定义与守卫在 `grade_manager_shared::route`
//! - `web::http`: 基于 gloo-net 的 HTTP 传输
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod alert;
    pub mod layout;
    pub mod modal;
    pub mod widgets;
    pub mod pages {
        pub mod attendance;
        pub mod branches;
        pub mod change_password;
        pub mod courses;
        pub mod dashboard;
        pub mod login;
        pub mod not_found;
        pub mod student_detail;
        pub mod students;
        pub mod teachers;
    }
}

// 浏览器 Web API 封装模块
pub(crate) mod web {
    pub mod http;
    pub mod router;
    pub mod storage;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::alert::{AlertHost, provide_alerts};
use crate::components::layout::Layout;
use crate::components::pages::attendance::AttendancePage;
use crate::components::pages::branches::BranchesPage;
use crate::components::pages::change_password::ChangePasswordPage;
use crate::components::pages::courses::CoursesPage;
use crate::components::pages::dashboard::DashboardPage;
use crate::components::pages::login::LoginPage;
use crate::components::pages::not_found::NotFoundPage;
use crate::components::pages::student_detail::StudentDetailPage;
use crate::components::pages::students::StudentsPage;
use crate::components::pages::teachers::TeachersPage;

use grade_manager_shared::config::ClientConfig;
use grade_manager_shared::route::AppRoute;
use leptos::prelude::*;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，已登录页面包裹在 `Layout` 中。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
        page => view! { <Layout>{page_view(page)}</Layout> }.into_any(),
    }
}

fn page_view(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Branches => view! { <BranchesPage /> }.into_any(),
        AppRoute::Courses => view! { <CoursesPage /> }.into_any(),
        AppRoute::Students => view! { <StudentsPage /> }.into_any(),
        AppRoute::StudentDetail(id) => view! { <StudentDetailPage id=id /> }.into_any(),
        AppRoute::Teachers => view! { <TeachersPage /> }.into_any(),
        AppRoute::Attendance => view! { <AttendancePage /> }.into_any(),
        AppRoute::ChangePassword => view! { <ChangePasswordPage /> }.into_any(),
        AppRoute::Login | AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::default();

    // 1. 提示服务（toast / 确认框）
    provide_alerts(config.toast_timeout_ms);

    // 2. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 3. 初始化认证状态（从 LocalStorage 恢复 Token 与 URL），必须早于路由初始化
    init_auth(&auth_ctx);

    // 4. 获取认证与角色信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let role = auth_ctx.role_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated role=role>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <AlertHost />
    }
}
