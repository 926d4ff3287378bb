use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::modal::Modal;
use crate::components::widgets::{FormAlert, PageHeader, TableStatus, TextField};
use grade_manager_shared::Branch;
use grade_manager_shared::forms::{BranchForm, FormMode};
use grade_manager_shared::protocol::{CreateBranch, DeleteBranch, ListBranches, UpdateBranch};
use grade_manager_shared::records::{remove_by_id, upsert};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn BranchesPage() -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    let (branches, set_branches) = signal(Vec::<Branch>::new());
    let (loading, set_loading) = signal(true);

    // 表单状态
    let (modal_open, set_modal_open) = signal(false);
    let (mode, set_mode) = signal(FormMode::Create);
    let name = RwSignal::new(String::new());
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let load = move || {
        let Some(api) = auth.api() else { return };
        set_loading.set(true);
        spawn_local(async move {
            match api.send(&ListBranches).await {
                Ok(list) => set_branches.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading branches", &e),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    load();

    let open_create = move |_| {
        set_mode.set(FormMode::Create);
        name.set(String::new());
        set_form_error.set(None);
        set_modal_open.set(true);
    };

    let open_edit = move |branch: &Branch| {
        set_mode.set(FormMode::Edit(branch.id));
        name.set(BranchForm::from_branch(branch).name);
        set_form_error.set(None);
        set_modal_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = BranchForm {
            name: name.get_untracked(),
        };
        let req = match form.validate() {
            Ok(req) => req,
            Err(e) => {
                set_form_error.set(Some(e.to_string()));
                return;
            }
        };
        let Some(api) = auth.api() else { return };
        let mode = mode.get_untracked();

        set_saving.set(true);
        spawn_local(async move {
            let result = match mode {
                FormMode::Create => api.send(&CreateBranch(req)).await,
                FormMode::Edit(id) => api.send(&UpdateBranch { id, body: req }).await,
            };
            match result {
                Ok(branch) => {
                    set_branches.update(|list| upsert(list, branch));
                    set_modal_open.set(false);
                    alerts.success(if mode.is_edit() {
                        "Branch updated"
                    } else {
                        "Branch created"
                    });
                }
                Err(e) => report_api_error(&auth, &alerts, "Saving branch", &e),
            }
            set_saving.set(false);
        });
    };

    let on_delete = move |branch: Branch| {
        spawn_local(async move {
            let text = format!("Branch \"{}\" will be deleted.", branch.name);
            if !alerts.confirm("Are you sure?", &text).await {
                return;
            }
            let Some(api) = auth.api() else { return };
            match api.send(&DeleteBranch { id: branch.id }).await {
                Ok(()) => {
                    set_branches.update(|list| {
                        remove_by_id(list, branch.id);
                    });
                    alerts.success("Branch deleted");
                }
                Err(e) => report_api_error(&auth, &alerts, "Deleting branch", &e),
            }
        });
    };

    let title = Signal::derive(move || {
        if mode.get().is_edit() {
            "Edit Branch".to_string()
        } else {
            "Add Branch".to_string()
        }
    });

    view! {
        <PageHeader title="Branches" subtitle="Departments that students and teachers belong to.">
            <button class="btn btn-primary" on:click=open_create>"Add Branch"</button>
        </PageHeader>

        <div class="card bg-base-100 shadow-xl">
            <div class="overflow-x-auto">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Name"</th>
                            <th class="text-right">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <TableStatus
                            loading=loading
                            is_empty=Signal::derive(move || branches.with(Vec::is_empty))
                            colspan=3
                            empty_text="No branches yet."
                        />
                        <For
                            each=move || branches.get()
                            key=|b| (b.id, b.name.clone())
                            children=move |branch| {
                                let edit_target = branch.clone();
                                let delete_target = branch.clone();
                                view! {
                                    <tr>
                                        <td class="font-mono">{branch.id}</td>
                                        <td>{branch.name}</td>
                                        <td class="text-right space-x-2">
                                            <button class="btn btn-ghost btn-sm" on:click=move |_| open_edit(&edit_target)>"Edit"</button>
                                            <button class="btn btn-ghost btn-sm text-error" on:click=move |_| on_delete(delete_target.clone())>"Delete"</button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </div>

        <Modal open=modal_open title=title on_close=move |_| set_modal_open.set(false)>
            <form on:submit=on_submit class="space-y-4 mt-4">
                <FormAlert message=form_error />
                <TextField id="branch_name" label="Branch Name" value=name placeholder="Computer Science" required=true />
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| set_modal_open.set(false)>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}
