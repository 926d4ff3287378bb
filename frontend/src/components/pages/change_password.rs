use crate::auth::{now_secs, report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::widgets::{FormAlert, PageHeader, TextField};
use grade_manager_shared::forms::ChangePasswordForm;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ChangePasswordPage() -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ChangePasswordForm {
            current_password: current.get_untracked(),
            new_password: new_password.get_untracked(),
            confirmation_password: confirmation.get_untracked(),
        };
        let req = match form.validate() {
            Ok(req) => req,
            Err(e) => {
                set_form_error.set(Some(e.to_string()));
                return;
            }
        };
        let Some(api) = auth.api() else { return };

        set_form_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            match api.send(&req).await {
                Ok(()) => {
                    current.set(String::new());
                    new_password.set(String::new());
                    confirmation.set(String::new());
                    alerts.success("Password changed");
                }
                Err(e) => {
                    let expired = auth.state.with_untracked(|s| {
                        s.session.as_ref().is_none_or(|session| session.is_expired(now_secs()))
                    });
                    match ChangePasswordForm::failure_message(&e, expired) {
                        Some(message) => {
                            warn!("[Auth] Password change rejected: {}", e);
                            set_form_error.set(Some(message));
                        }
                        None => report_api_error(&auth, &alerts, "Changing password", &e),
                    }
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <PageHeader title="Change Password" />
        <div class="card bg-base-100 shadow-xl max-w-lg">
            <form class="card-body space-y-2" on:submit=on_submit>
                <FormAlert message=form_error />
                <TextField id="current_password" label="Current Password" value=current input_type="password" required=true />
                <TextField id="new_password" label="New Password" value=new_password input_type="password" required=true />
                <TextField id="confirmation_password" label="Confirm New Password" value=confirmation input_type="password" required=true />
                <div class="card-actions justify-end mt-4">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Update Password"</button>
                </div>
            </form>
        </div>
    }
}
