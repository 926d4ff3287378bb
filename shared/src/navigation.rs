//! 侧边栏导航
//!
//! 菜单项与路由守卫共用同一张权限表（[`AppRoute::permits`]），
//! 因此隐藏的菜单项一定也是不可访问的路由。

use crate::route::AppRoute;
use crate::session::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: AppRoute,
}

/// 全量菜单，按显示顺序排列
pub const MENU: [NavItem; 7] = [
    NavItem { label: "Dashboard", route: AppRoute::Dashboard },
    NavItem { label: "Branches", route: AppRoute::Branches },
    NavItem { label: "Courses", route: AppRoute::Courses },
    NavItem { label: "Teachers", route: AppRoute::Teachers },
    NavItem { label: "Students", route: AppRoute::Students },
    NavItem { label: "Attendance", route: AppRoute::Attendance },
    NavItem { label: "Change Password", route: AppRoute::ChangePassword },
];

/// 某个角色可见的菜单项
pub fn menu_for(role: Role) -> Vec<NavItem> {
    MENU.iter()
        .copied()
        .filter(|item| item.route.permits(role))
        .collect()
}

/// 当前路由是否属于某个菜单项（详情页归属到列表页）
pub fn is_active(item: &NavItem, current: AppRoute) -> bool {
    match (item.route, current) {
        (AppRoute::Students, AppRoute::StudentDetail(_)) => true,
        (a, b) => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(role: Role) -> Vec<&'static str> {
        menu_for(role).into_iter().map(|i| i.label).collect()
    }

    #[test]
    fn test_admin_sees_everything() {
        assert_eq!(labels(Role::Admin).len(), MENU.len());
    }

    #[test]
    fn test_menu_per_role() {
        assert_eq!(
            labels(Role::Hod),
            vec!["Dashboard", "Students", "Attendance", "Change Password"]
        );
        assert_eq!(
            labels(Role::Teacher),
            vec!["Dashboard", "Attendance", "Change Password"]
        );
        assert_eq!(labels(Role::Student), vec!["Dashboard", "Change Password"]);
    }

    #[test]
    fn test_detail_page_highlights_students() {
        let students = MENU[4];
        assert!(is_active(&students, AppRoute::StudentDetail(3)));
        assert!(is_active(&students, AppRoute::Students));
        assert!(!is_active(&MENU[0], AppRoute::Students));
    }
}
