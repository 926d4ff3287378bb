//! 已登录页面的外壳：侧边栏导航 + 内容区
//!
//! 菜单按当前角色过滤，与路由守卫使用同一张权限表。

use crate::auth::{logout, use_auth};
use crate::web::router::{Link, use_router};
use grade_manager_shared::navigation::{is_active, menu_for};
use leptos::prelude::*;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let role = auth.role_signal();

    let items = move || role.get().map(menu_for).unwrap_or_default();
    let email = move || {
        auth.state
            .with(|s| s.session.as_ref().map(|session| session.email.clone()))
            .unwrap_or_default()
    };
    let role_label = move || role.get().map(|r| r.label()).unwrap_or_default();

    view! {
        <div class="drawer lg:drawer-open">
            <input id="app-drawer" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content flex flex-col min-h-screen bg-base-200">
                <div class="navbar bg-base-100 shadow lg:hidden">
                    <label for="app-drawer" class="btn btn-ghost btn-square">"☰"</label>
                    <span class="text-lg font-bold">"Grade Manager"</span>
                </div>
                <main class="p-4 md:p-8 max-w-7xl w-full mx-auto">{children()}</main>
            </div>

            <div class="drawer-side z-40">
                <label for="app-drawer" class="drawer-overlay"></label>
                <aside class="w-64 min-h-full bg-base-100 flex flex-col">
                    <div class="p-6 text-xl font-bold text-primary">"Grade Manager"</div>
                    <ul class="menu flex-1 gap-1">
                        <For
                            each=items
                            key=|item| item.label
                            children=move |item| {
                                let active = Signal::derive(move || {
                                    is_active(&item, router.current_route().get())
                                });
                                view! {
                                    <li>
                                        <Link to=item.route active=active>{item.label}</Link>
                                    </li>
                                }
                            }
                        />
                    </ul>
                    <div class="p-4 border-t border-base-200 space-y-2">
                        <div class="text-sm font-medium truncate">{email}</div>
                        <span class="badge badge-primary badge-outline">{role_label}</span>
                        <button
                            class="btn btn-outline btn-error btn-sm w-full"
                            on:click=move |_| logout(&auth)
                        >
                            "Logout"
                        </button>
                    </div>
                </aside>
            </div>
        </div>
    }
}
