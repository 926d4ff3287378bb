use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::modal::Modal;
use crate::components::widgets::{FormAlert, PageHeader, TableStatus, TextField};
use grade_manager_shared::Course;
use grade_manager_shared::forms::{CourseForm, FormMode};
use grade_manager_shared::protocol::{CreateCourse, DeleteCourse, ListCourses, UpdateCourse};
use grade_manager_shared::records::{remove_by_id, upsert};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 课程表单状态
#[derive(Clone, Copy)]
struct CourseFormState {
    course_name: RwSignal<String>,
    course_code: RwSignal<String>,
    credits: RwSignal<String>,
}

impl CourseFormState {
    fn new() -> Self {
        Self {
            course_name: RwSignal::new(String::new()),
            course_code: RwSignal::new(String::new()),
            credits: RwSignal::new(String::new()),
        }
    }

    fn fill(&self, form: CourseForm) {
        self.course_name.set(form.course_name);
        self.course_code.set(form.course_code);
        self.credits.set(form.credits);
    }

    fn to_form(&self) -> CourseForm {
        CourseForm {
            course_name: self.course_name.get_untracked(),
            course_code: self.course_code.get_untracked(),
            credits: self.credits.get_untracked(),
        }
    }
}

#[component]
pub fn CoursesPage() -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    let (courses, set_courses) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);

    let form = CourseFormState::new();
    let (modal_open, set_modal_open) = signal(false);
    let (mode, set_mode) = signal(FormMode::Create);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let (saving, set_saving) = signal(false);

    let load = move || {
        let Some(api) = auth.api() else { return };
        set_loading.set(true);
        spawn_local(async move {
            match api.send(&ListCourses).await {
                Ok(list) => set_courses.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading courses", &e),
            }
            set_loading.set(false);
        });
    };

    load();

    let open_form = move |target: Option<&Course>| {
        match target {
            Some(course) => {
                set_mode.set(FormMode::Edit(course.id));
                form.fill(CourseForm::from_course(course));
            }
            None => {
                set_mode.set(FormMode::Create);
                form.fill(CourseForm::default());
            }
        }
        set_form_error.set(None);
        set_modal_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = match form.to_form().validate() {
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
                FormMode::Create => api.send(&CreateCourse(req)).await,
                FormMode::Edit(id) => api.send(&UpdateCourse { id, body: req }).await,
            };
            match result {
                Ok(course) => {
                    set_courses.update(|list| upsert(list, course));
                    set_modal_open.set(false);
                    alerts.success(if mode.is_edit() {
                        "Course updated"
                    } else {
                        "Course created"
                    });
                }
                Err(e) => report_api_error(&auth, &alerts, "Saving course", &e),
            }
            set_saving.set(false);
        });
    };

    let on_delete = move |course: Course| {
        spawn_local(async move {
            let text = format!("Course {} will be deleted.", course.course_code);
            if !alerts.confirm("Are you sure?", &text).await {
                return;
            }
            let Some(api) = auth.api() else { return };
            match api.send(&DeleteCourse { id: course.id }).await {
                Ok(()) => {
                    set_courses.update(|list| {
                        remove_by_id(list, course.id);
                    });
                    alerts.success("Course deleted");
                }
                Err(e) => report_api_error(&auth, &alerts, "Deleting course", &e),
            }
        });
    };

    let title = Signal::derive(move || {
        if mode.get().is_edit() {
            "Edit Course".to_string()
        } else {
            "Add Course".to_string()
        }
    });

    view! {
        <PageHeader title="Courses" subtitle="Course catalogue available for enrollment.">
            <button class="btn btn-primary" on:click=move |_| open_form(None)>"Add Course"</button>
        </PageHeader>

        <div class="card bg-base-100 shadow-xl">
            <div class="overflow-x-auto">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Code"</th>
                            <th>"Name"</th>
                            <th>"Credits"</th>
                            <th class="text-right">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <TableStatus
                            loading=loading
                            is_empty=Signal::derive(move || courses.with(Vec::is_empty))
                            colspan=4
                            empty_text="No courses yet."
                        />
                        <For
                            each=move || courses.get()
                            key=|c| (c.id, c.course_code.clone(), c.course_name.clone(), c.credits)
                            children=move |course| {
                                let edit_target = course.clone();
                                let delete_target = course.clone();
                                view! {
                                    <tr>
                                        <td class="font-mono">{course.course_code}</td>
                                        <td>{course.course_name}</td>
                                        <td>{course.credits}</td>
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
                <TextField id="course_name" label="Course Name" value=form.course_name placeholder="Data Structures" required=true />
                <div class="grid grid-cols-2 gap-4">
                    <TextField id="course_code" label="Course Code" value=form.course_code placeholder="CS201" required=true />
                    <TextField id="credits" label="Credits" value=form.credits input_type="number" placeholder="4" required=true />
                </div>
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| set_modal_open.set(false)>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>"Save"</button>
                </div>
            </form>
        </Modal>
    }
}
