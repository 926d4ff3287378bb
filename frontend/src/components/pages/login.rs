use crate::auth::{login, use_auth};
use crate::components::widgets::FormAlert;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    // 预填上次使用的后端地址
    let url = RwSignal::new(auth.state.with_untracked(|s| s.backend_url.clone()));
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = move || auth.state.with(|s| s.is_loading);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.with_untracked(|e| e.trim().is_empty()) || password.with_untracked(String::is_empty)
        {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            // 成功后由路由服务的认证监听负责跳转
            if let Err(message) = login(
                &auth,
                url.get_untracked(),
                email.get_untracked(),
                password.get_untracked(),
            )
            .await
            {
                set_error_msg.set(Some(message));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <Show
            when=move || !is_loading()
            fallback=|| view! { <div class="flex items-center justify-center min-h-screen"><span class="loading loading-spinner loading-lg text-primary"></span></div> }
        >
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <h1 class="text-3xl font-bold">"Grade Manager"</h1>
                        <p class="text-base-content/70">"Sign in to manage branches, courses and grades"</p>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <FormAlert message=error_msg />

                            <div class="form-control">
                                <label class="label" for="url">
                                    <span class="label-text">"Server URL"</span>
                                </label>
                                <input
                                    id="url"
                                    type="text"
                                    placeholder="http://localhost:8080/api"
                                    on:input=move |ev| url.set(event_target_value(&ev))
                                    prop:value=move || url.get()
                                    class="input input-bordered"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="admin@sgm.com"
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                    prop:value=move || email.get()
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                    prop:value=move || password.get()
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                    } else {
                                        "Login".into_any()
                                    }}
                                </button>
                            </div>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
