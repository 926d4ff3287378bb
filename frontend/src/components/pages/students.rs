use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::modal::Modal;
use crate::components::widgets::{BranchSelect, FormAlert, PageHeader, TableStatus, TextField};
use crate::web::router::Link;
use grade_manager_shared::forms::{FormMode, StudentForm};
use grade_manager_shared::protocol::{
    CreateStudent, DeleteStudent, ListBranches, ListStudents, UpdateStudent,
};
use grade_manager_shared::records::{remove_by_id, upsert};
use grade_manager_shared::route::AppRoute;
use grade_manager_shared::{Branch, Student};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 学生表单状态
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，便于在闭包间传递。
#[derive(Clone, Copy)]
struct StudentFormState {
    usn: RwSignal<String>,
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    year: RwSignal<String>,
    section: RwSignal<String>,
    branch_id: RwSignal<String>,
}

impl StudentFormState {
    fn new() -> Self {
        Self {
            usn: RwSignal::new(String::new()),
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            year: RwSignal::new(String::new()),
            section: RwSignal::new(String::new()),
            branch_id: RwSignal::new(String::new()),
        }
    }

    fn fill(&self, form: StudentForm) {
        self.usn.set(form.usn);
        self.first_name.set(form.first_name);
        self.last_name.set(form.last_name);
        self.email.set(form.email);
        self.password.set(form.password);
        self.year.set(form.year);
        self.section.set(form.section);
        self.branch_id.set(form.branch_id);
    }

    fn to_form(&self) -> StudentForm {
        StudentForm {
            usn: self.usn.get_untracked(),
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
            year: self.year.get_untracked(),
            section: self.section.get_untracked(),
            branch_id: self.branch_id.get_untracked(),
        }
    }
}

#[component]
pub fn StudentsPage() -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    let (students, set_students) = signal(Vec::<Student>::new());
    let (branches, set_branches) = signal(Vec::<Branch>::new());
    let (loading, set_loading) = signal(true);

    let form = StudentFormState::new();
    let (modal_open, set_modal_open) = signal(false);
    let (mode, set_mode) = signal(FormMode::Create);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    // 学生与分支列表并行加载
    let load = move || {
        let Some(api) = auth.api() else { return };
        set_loading.set(true);
        spawn_local(async move {
            let (students, branches) = futures::join!(api.send(&ListStudents), api.send(&ListBranches));
            match students {
                Ok(list) => set_students.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading students", &e),
            }
            match branches {
                Ok(list) => set_branches.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading branches", &e),
            }
            set_loading.set(false);
        });
    };

    load();

    let open_form = move |target: Option<&Student>| {
        match target {
            Some(student) => {
                set_mode.set(FormMode::Edit(student.id));
                form.fill(StudentForm::from_student(student));
            }
            None => {
                set_mode.set(FormMode::Create);
                form.fill(StudentForm::default());
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
                FormMode::Create => api.send(&CreateStudent(req)).await,
                FormMode::Edit(id) => api.send(&UpdateStudent { id, body: req }).await,
            };
            match result {
                Ok(student) => {
                    set_students.update(|list| upsert(list, student));
                    set_modal_open.set(false);
                    alerts.success(if mode.is_edit() {
                        "Student updated"
                    } else {
                        "Student created"
                    });
                }
                Err(e) => report_api_error(&auth, &alerts, "Saving student", &e),
            }
            set_saving.set(false);
        });
    };

    let on_delete = move |student: Student| {
        spawn_local(async move {
            let text = format!("{} ({}) will be deleted.", student.full_name(), student.usn);
            if !alerts.confirm("Are you sure?", &text).await {
                return;
            }
            let Some(api) = auth.api() else { return };
            match api.send(&DeleteStudent { id: student.id }).await {
                Ok(()) => {
                    set_students.update(|list| {
                        remove_by_id(list, student.id);
                    });
                    alerts.success("Student deleted");
                }
                Err(e) => report_api_error(&auth, &alerts, "Deleting student", &e),
            }
        });
    };

    let title = Signal::derive(move || {
        if mode.get().is_edit() {
            "Edit Student".to_string()
        } else {
            "Add Student".to_string()
        }
    });

    view! {
        <PageHeader title="Students" subtitle="Click a name to manage enrollment and grades.">
            <button class="btn btn-primary" on:click=move |_| open_form(None)>"Add Student"</button>
        </PageHeader>

        <div class="card bg-base-100 shadow-xl">
            <div class="overflow-x-auto">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"USN"</th>
                            <th>"Name"</th>
                            <th class="hidden md:table-cell">"Email"</th>
                            <th>"Year"</th>
                            <th>"Section"</th>
                            <th class="hidden md:table-cell">"Branch"</th>
                            <th class="text-right">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <TableStatus
                            loading=loading
                            is_empty=Signal::derive(move || students.with(Vec::is_empty))
                            colspan=7
                            empty_text="No students yet."
                        />
                        <For
                            each=move || students.get()
                            key=|s| (s.id, s.usn.clone(), s.full_name(), s.email.clone(), s.year, s.section.clone(), s.branch.id)
                            children=move |student| {
                                let edit_target = student.clone();
                                let delete_target = student.clone();
                                let full_name = student.full_name();
                                view! {
                                    <tr>
                                        <td class="font-mono">{student.usn.clone()}</td>
                                        <td>
                                            <Link to=AppRoute::StudentDetail(student.id) class="link link-primary">
                                                {full_name}
                                            </Link>
                                        </td>
                                        <td class="hidden md:table-cell">{student.email.clone()}</td>
                                        <td>{student.year}</td>
                                        <td>{student.section.clone()}</td>
                                        <td class="hidden md:table-cell">{student.branch.name.clone()}</td>
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

        <Modal open=modal_open title=title on_close=move |_| set_modal_open.set(false) wide=true>
            <form on:submit=on_submit class="space-y-4 mt-4">
                <FormAlert message=form_error />
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    <TextField id="usn" label="USN" value=form.usn placeholder="1RV21CS001" required=true />
                    <TextField id="email" label="Email" value=form.email input_type="email" placeholder="student@sgm.com" required=true />
                    <TextField id="first_name" label="First Name" value=form.first_name required=true />
                    <TextField id="last_name" label="Last Name" value=form.last_name />
                    <TextField id="year" label="Year" value=form.year input_type="number" placeholder="1-4" required=true />
                    <TextField id="section" label="Section" value=form.section placeholder="A" required=true />
                    <BranchSelect value=form.branch_id branches=branches />
                    <Show when=move || !mode.get().is_edit()>
                        <TextField id="password" label="Password" value=form.password input_type="password" required=true />
                    </Show>
                </div>
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| set_modal_open.set(false)>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}
