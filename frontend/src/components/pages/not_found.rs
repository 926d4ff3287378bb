use crate::web::router::Link;
use grade_manager_shared::route::AppRoute;
use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <Link to=AppRoute::Dashboard class="btn btn-primary mt-6">"Back to Dashboard"</Link>
            </div>
        </div>
    }
}
