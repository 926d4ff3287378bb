use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::modal::Modal;
use crate::components::widgets::{BranchSelect, FormAlert, PageHeader, TableStatus, TextField};
use grade_manager_shared::forms::{FormMode, TeacherForm};
use grade_manager_shared::protocol::{
    CreateTeacher, DeleteTeacher, ListBranches, ListTeachers, UpdateTeacher,
};
use grade_manager_shared::records::{remove_by_id, upsert};
use grade_manager_shared::{Branch, Teacher};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
struct TeacherFormState {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    branch_id: RwSignal<String>,
}

impl TeacherFormState {
    fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            branch_id: RwSignal::new(String::new()),
        }
    }

    fn fill(&self, form: TeacherForm) {
        self.first_name.set(form.first_name);
        self.last_name.set(form.last_name);
        self.email.set(form.email);
        self.password.set(form.password);
        self.branch_id.set(form.branch_id);
    }

    fn to_form(&self) -> TeacherForm {
        TeacherForm {
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
            branch_id: self.branch_id.get_untracked(),
        }
    }
}

#[component]
pub fn TeachersPage() -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    let (teachers, set_teachers) = signal(Vec::<Teacher>::new());
    let (branches, set_branches) = signal(Vec::<Branch>::new());
    let (loading, set_loading) = signal(true);

    let form = TeacherFormState::new();
    let (modal_open, set_modal_open) = signal(false);
    let (mode, set_mode) = signal(FormMode::Create);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let load = move || {
        let Some(api) = auth.api() else { return };
        set_loading.set(true);
        spawn_local(async move {
            let (teachers, branches) = futures::join!(api.send(&ListTeachers), api.send(&ListBranches));
            match teachers {
                Ok(list) => set_teachers.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading teachers", &e),
            }
            match branches {
                Ok(list) => set_branches.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading branches", &e),
            }
            set_loading.set(false);
        });
    };

    load();

    let open_form = move |target: Option<&Teacher>| {
        match target {
            Some(teacher) => {
                set_mode.set(FormMode::Edit(teacher.id));
                form.fill(TeacherForm::from_teacher(teacher));
            }
            None => {
                set_mode.set(FormMode::Create);
                form.fill(TeacherForm::default());
            }
        }
        set_form_error.set(None);
        set_modal_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let mode = mode.get_untracked();
        let req = match form.to_form().validate(mode) {
            Ok(req) => req,
            Err(e) => {
                set_form_error.set(Some(e.to_string()));
                return;
            }
        };
        let Some(api) = auth.api() else { return };

        set_saving.set(true);
        spawn_local(async move {
            let result = match mode {
                FormMode::Create => api.send(&CreateTeacher(req)).await,
                FormMode::Edit(id) => api.send(&UpdateTeacher { id, body: req }).await,
            };
            match result {
                Ok(teacher) => {
                    set_teachers.update(|list| upsert(list, teacher));
                    set_modal_open.set(false);
                    alerts.success(if mode.is_edit() {
                        "Teacher updated"
                    } else {
                        "Teacher created"
                    });
                }
                Err(e) => report_api_error(&auth, &alerts, "Saving teacher", &e),
            }
            set_saving.set(false);
        });
    };

    let on_delete = move |teacher: Teacher| {
        spawn_local(async move {
            let text = format!("{} will be deleted.", teacher.full_name());
            if !alerts.confirm("Are you sure?", &text).await {
                return;
            }
            let Some(api) = auth.api() else { return };
            match api.send(&DeleteTeacher { id: teacher.id }).await {
                Ok(()) => {
                    set_teachers.update(|list| {
                        remove_by_id(list, teacher.id);
                    });
                    alerts.success("Teacher deleted");
                }
                Err(e) => report_api_error(&auth, &alerts, "Deleting teacher", &e),
            }
        });
    };

    let title = Signal::derive(move || {
        if mode.get().is_edit() {
            "Edit Teacher".to_string()
        } else {
            "Add Teacher".to_string()
        }
    });

    view! {
        <PageHeader title="Teachers" subtitle="Faculty accounts and their branches.">
            <button class="btn btn-primary" on:click=move |_| open_form(None)>"Add Teacher"</button>
        </PageHeader>

        <div class="card bg-base-100 shadow-xl">
            <div class="overflow-x-auto">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Name"</th>
                            <th>"Email"</th>
                            <th>"Branch"</th>
                            <th class="text-right">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <TableStatus
                            loading=loading
                            is_empty=Signal::derive(move || teachers.with(Vec::is_empty))
                            colspan=4
                            empty_text="No teachers yet."
                        />
                        <For
                            each=move || teachers.get()
                            key=|t| (t.id, t.full_name(), t.email.clone(), t.branch.id)
                            children=move |teacher| {
                                let edit_target = teacher.clone();
                                let delete_target = teacher.clone();
                                view! {
                                    <tr>
                                        <td>{teacher.full_name()}</td>
                                        <td>{teacher.email.clone()}</td>
                                        <td>{teacher.branch.name.clone()}</td>
                                        <td class="text-right space-x-2">
                                            <button class="btn btn-ghost btn-sm" on:click=move |_| open_form(Some(&edit_target))>"Edit"</button>
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
                <div class="grid grid-cols-2 gap-4">
                    <TextField id="first_name" label="First Name" value=form.first_name required=true />
                    <TextField id="last_name" label="Last Name" value=form.last_name />
                </div>
                <TextField id="email" label="Email" value=form.email input_type="email" placeholder="teacher@sgm.com" required=true />
                <BranchSelect value=form.branch_id branches=branches />
                <Show when=move || !mode.get().is_edit()>
                    <TextField id="password" label="Password" value=form.password input_type="password" required=true />
                </Show>
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| set_modal_open.set(false)>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}
