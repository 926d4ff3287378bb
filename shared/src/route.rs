//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、认证要求以及按角色的访问权限。

use crate::session::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 控制面板
    Dashboard,
    Branches,
    Courses,
    Students,
    /// 学生详情（选课与成绩）
    StudentDetail(i64),
    Teachers,
    Attendance,
    ChangePassword,
    /// 页面未找到
    NotFound,
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行
    Allow,
    /// 重定向到指定路由
    Redirect(AppRoute),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        // 忽略查询串与尾部斜杠
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login,
            ["dashboard"] => Self::Dashboard,
            ["branches"] => Self::Branches,
            ["courses"] => Self::Courses,
            ["students"] => Self::Students,
            ["students", id] => id
                .parse::<i64>()
                .map(Self::StudentDetail)
                .unwrap_or(Self::NotFound),
            ["teachers"] => Self::Teachers,
            ["attendance"] => Self::Attendance,
            ["change-password"] => Self::ChangePassword,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Branches => "/branches".to_string(),
            Self::Courses => "/courses".to_string(),
            Self::Students => "/students".to_string(),
            Self::StudentDetail(id) => format!("/students/{}", id),
            Self::Teachers => "/teachers".to_string(),
            Self::Attendance => "/attendance".to_string(),
            Self::ChangePassword => "/change-password".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 该角色是否可以访问此路由
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Self::Login | Self::NotFound | Self::Dashboard | Self::ChangePassword => true,
            Self::Branches | Self::Courses | Self::Teachers => role == Role::Admin,
            Self::Students | Self::StudentDetail(_) => matches!(role, Role::Admin | Role::Hod),
            Self::Attendance => matches!(role, Role::Admin | Role::Hod | Role::Teacher),
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页或无权限页面）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 对目标路由执行完整守卫
    ///
    /// `role` 为 `None` 表示已认证但会话尚未解码完成，此时只做认证检查。
    pub fn guard(&self, is_authenticated: bool, role: Option<Role>) -> GuardDecision {
        if self.requires_auth() && !is_authenticated {
            return GuardDecision::Redirect(Self::auth_failure_redirect());
        }
        if is_authenticated && self.should_redirect_when_authenticated() {
            return GuardDecision::Redirect(Self::auth_success_redirect());
        }
        match role {
            Some(role) if is_authenticated && !self.permits(role) => {
                GuardDecision::Redirect(Self::auth_success_redirect())
            }
            _ => GuardDecision::Allow,
        }
    }

    /// 解析守卫结果后的最终路由
    pub fn resolve(self, is_authenticated: bool, role: Option<Role>) -> Self {
        match self.guard(is_authenticated, role) {
            GuardDecision::Allow => self,
            GuardDecision::Redirect(target) => target,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/branches/"), AppRoute::Branches);
        assert_eq!(AppRoute::from_path("/students/42"), AppRoute::StudentDetail(42));
        assert_eq!(AppRoute::from_path("/attendance?x=1"), AppRoute::Attendance);
        assert_eq!(AppRoute::from_path("/change-password"), AppRoute::ChangePassword);
    }

    #[test]
    fn test_parse_unknown_paths() {
        assert_eq!(AppRoute::from_path("/students/abc"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/students/1/extra"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/my-grades"), AppRoute::NotFound);
    }

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::Branches,
            AppRoute::Courses,
            AppRoute::Students,
            AppRoute::StudentDetail(7),
            AppRoute::Teachers,
            AppRoute::Attendance,
            AppRoute::ChangePassword,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_unauthenticated_is_sent_to_login() {
        assert_eq!(
            AppRoute::Branches.guard(false, None),
            GuardDecision::Redirect(AppRoute::Login)
        );
        assert_eq!(AppRoute::Dashboard.resolve(false, None), AppRoute::Login);
        assert_eq!(AppRoute::Login.resolve(false, None), AppRoute::Login);
        assert_eq!(AppRoute::NotFound.resolve(false, None), AppRoute::NotFound);
    }

    #[test]
    fn test_authenticated_leaves_login() {
        assert_eq!(
            AppRoute::Login.resolve(true, Some(Role::Student)),
            AppRoute::Dashboard
        );
    }

    #[test]
    fn test_role_permissions() {
        assert_eq!(AppRoute::Branches.resolve(true, Some(Role::Admin)), AppRoute::Branches);
        assert_eq!(AppRoute::Branches.resolve(true, Some(Role::Hod)), AppRoute::Dashboard);
        assert_eq!(AppRoute::Students.resolve(true, Some(Role::Hod)), AppRoute::Students);
        assert_eq!(
            AppRoute::StudentDetail(3).resolve(true, Some(Role::Teacher)),
            AppRoute::Dashboard
        );
        assert_eq!(
            AppRoute::Attendance.resolve(true, Some(Role::Teacher)),
            AppRoute::Attendance
        );
        assert_eq!(
            AppRoute::Attendance.resolve(true, Some(Role::Student)),
            AppRoute::Dashboard
        );
        for role in Role::ALL {
            assert!(AppRoute::Dashboard.permits(role));
            assert!(AppRoute::ChangePassword.permits(role));
        }
    }
}
