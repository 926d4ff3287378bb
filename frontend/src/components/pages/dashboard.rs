use crate::auth::use_auth;
use crate::web::router::Link;
use grade_manager_shared::navigation::menu_for;
use grade_manager_shared::route::AppRoute;
use leptos::prelude::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let role = auth.role_signal();

    let email = move || {
        auth.state
            .with(|s| s.session.as_ref().map(|session| session.email.clone()))
            .unwrap_or_default()
    };
    let role_label = move || role.get().map(|r| r.label()).unwrap_or_default();

    // 快捷入口：当前角色可见的菜单项（不含控制面板自身）
    let shortcuts = move || {
        role.get()
            .map(menu_for)
            .unwrap_or_default()
            .into_iter()
            .filter(|item| item.route != AppRoute::Dashboard)
            .collect::<Vec<_>>()
    };

    view! {
        <div class="space-y-8">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h1 class="card-title text-2xl">"Welcome, " {email}</h1>
                    <p class="text-base-content/70">
                        "You are signed in as " <span class="badge badge-primary">{role_label}</span>
                    </p>
                </div>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <For
                    each=shortcuts
                    key=|item| item.label
                    children=move |item| {
                        view! {
                            <Link to=item.route class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                                <div class="card-body">
                                    <h2 class="card-title">{item.label}</h2>
                                    <p class="text-base-content/60 text-sm">{item.route.to_path()}</p>
                                </div>
                            </Link>
                        }
                    }
                />
            </div>
        </div>
    }
}
