//! 学生详情：个人信息、选课管理与成绩录入

mod grade_dialog;

use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::modal::Modal;
use crate::components::widgets::{PageHeader, TableStatus};
use crate::web::router::{Link, use_router};
use grade_dialog::GradeDialog;
use grade_manager_shared::protocol::{
    EnrollStudent, GetStudent, ListCourses, ListEnrolledCourses, UnenrollStudent,
};
use grade_manager_shared::records::{available_courses, remove_by_id, upsert};
use grade_manager_shared::route::AppRoute;
use grade_manager_shared::{Course, Student};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn StudentDetailPage(id: i64) -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();
    let router = use_router();

    let (student, set_student) = signal(Option::<Student>::None);
    let (enrolled, set_enrolled) = signal(Vec::<Course>::new());
    let (all_courses, set_all_courses) = signal(Vec::<Course>::new());
    let (loading, set_loading) = signal(true);

    let (enroll_open, set_enroll_open) = signal(false);
    let selected_course = RwSignal::new(String::new());
    let (enrolling, set_enrolling) = signal(false);

    // 正在录入成绩的课程，`Some` 时打开成绩弹窗
    let grading = RwSignal::new(Option::<Course>::None);

    let load = move || {
        let Some(api) = auth.api() else { return };
        set_loading.set(true);
        spawn_local(async move {
            let student_req = GetStudent { id };
            let enrolled_req = ListEnrolledCourses { student_id: id };
            let (profile, courses, catalogue) = futures::join!(
                api.send(&student_req),
                api.send(&enrolled_req),
                api.send(&ListCourses)
            );
            match profile {
                Ok(s) => set_student.set(Some(s)),
                Err(e) if e.is_not_found() => {
                    alerts.error(format!("Student {} not found", id));
                    router.redirect(AppRoute::Students);
                    return;
                }
                Err(e) => report_api_error(&auth, &alerts, "Loading student", &e),
            }
            match courses {
                Ok(list) => set_enrolled.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading enrolled courses", &e),
            }
            match catalogue {
                Ok(list) => set_all_courses.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading courses", &e),
            }
            set_loading.set(false);
        });
    };

    load();

    let available = Memo::new(move |_| {
        all_courses.with(|all| enrolled.with(|enrolled| available_courses(all, enrolled)))
    });

    let open_enroll = move |_| {
        selected_course.set(String::new());
        set_enroll_open.set(true);
    };

    let on_enroll = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(course_id) = selected_course.get_untracked().parse::<i64>() else {
            alerts.error("Select a course to enroll");
            return;
        };
        let Some(course) =
            all_courses.with_untracked(|all| all.iter().find(|c| c.id == course_id).cloned())
        else {
            return;
        };
        let Some(api) = auth.api() else { return };

        set_enrolling.set(true);
        spawn_local(async move {
            match api.send(&EnrollStudent { student_id: id, course_id }).await {
                Ok(updated) => {
                    let message = format!("Enrolled in {}", course.course_name);
                    set_enrolled.update(|list| upsert(list, course));
                    set_student.set(Some(updated));
                    set_enroll_open.set(false);
                    alerts.success(message);
                }
                Err(e) => report_api_error(&auth, &alerts, "Enrolling student", &e),
            }
            set_enrolling.set(false);
        });
    };

    let on_unenroll = move |course: Course| {
        spawn_local(async move {
            let text = format!("The student will be removed from {}.", course.course_name);
            if !alerts.confirm("Are you sure?", &text).await {
                return;
            }
            let Some(api) = auth.api() else { return };
            match api
                .send(&UnenrollStudent { student_id: id, course_id: course.id })
                .await
            {
                Ok(updated) => {
                    set_enrolled.update(|list| {
                        remove_by_id(list, course.id);
                    });
                    set_student.set(Some(updated));
                    alerts.success("Course removed");
                }
                Err(e) => report_api_error(&auth, &alerts, "Unenrolling student", &e),
            }
        });
    };

    let profile_row = move |label: &'static str, value: fn(&Student) -> String| {
        view! {
            <div>
                <div class="text-xs uppercase text-base-content/50">{label}</div>
                <div class="font-medium">
                    {move || student.with(|s| s.as_ref().map(value).unwrap_or_default())}
                </div>
            </div>
        }
    };

    view! {
        <PageHeader title="Student Details">
            <Link to=AppRoute::Students class="btn btn-ghost">"Back to Students"</Link>
        </PageHeader>

        <div class="card bg-base-100 shadow-xl mb-8">
            <div class="card-body">
                <h2 class="card-title text-2xl">
                    {move || student.with(|s| s.as_ref().map(Student::full_name).unwrap_or_default())}
                </h2>
                <div class="grid grid-cols-2 md:grid-cols-5 gap-4 mt-2">
                    {profile_row("USN", |s| s.usn.clone())}
                    {profile_row("Email", |s| s.email.clone())}
                    {profile_row("Year", |s| s.year.to_string())}
                    {profile_row("Section", |s| s.section.clone())}
                    {profile_row("Branch", |s| s.branch.name.clone())}
                </div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"Enrolled Courses"</h3>
                        <p class="text-base-content/70 text-sm">"Manage grades per course for the current semester."</p>
                    </div>
                    <button class="btn btn-primary" on:click=open_enroll disabled=move || loading.get()>
                        "Enroll in Course"
                    </button>
                </div>
                <div class="overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Code"</th>
                                <th>"Course"</th>
                                <th>"Credits"</th>
                                <th class="text-right">"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <TableStatus
                                loading=loading
                                is_empty=Signal::derive(move || enrolled.with(Vec::is_empty))
                                colspan=4
                                empty_text="Not enrolled in any course."
                            />
                            <For
                                each=move || enrolled.get()
                                key=|c| c.id
                                children=move |course| {
                                    let grade_target = course.clone();
                                    let unenroll_target = course.clone();
                                    view! {
                                        <tr>
                                            <td class="font-mono">{course.course_code}</td>
                                            <td>{course.course_name}</td>
                                            <td>{course.credits}</td>
                                            <td class="text-right space-x-2">
                                                <button class="btn btn-ghost btn-sm" on:click=move |_| grading.set(Some(grade_target.clone()))>
                                                    "Manage Grades"
                                                </button>
                                                <button class="btn btn-ghost btn-sm text-error" on:click=move |_| on_unenroll(unenroll_target.clone())>
                                                    "Unenroll"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>

        <Modal
            open=enroll_open
            title=Signal::derive(|| "Enroll in Course".to_string())
            on_close=move |_| set_enroll_open.set(false)
        >
            <form on:submit=on_enroll class="space-y-4 mt-4">
                <Show
                    when=move || available.with(|list| !list.is_empty())
                    fallback=|| view! { <p class="text-base-content/70">"The student is already enrolled in every course."</p> }
                >
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| selected_course.set(event_target_value(&ev))
                        prop:value=move || selected_course.get()
                    >
                        <option value="" disabled selected=move || selected_course.with(String::is_empty)>
                            "Select a course"
                        </option>
                        <For
                            each=move || available.get()
                            key=|c| c.id
                            children=move |course| {
                                view! {
                                    <option value=course.id.to_string()>
                                        {format!("{} - {}", course.course_code, course.course_name)}
                                    </option>
                                }
                            }
                        />
                    </select>
                </Show>
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| set_enroll_open.set(false)>"Cancel"</button>
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || enrolling.get() || available.with(Vec::is_empty)
                    >
                        "Enroll"
                    </button>
                </div>
            </form>
        </Modal>

        <GradeDialog student=student course=grading />
    }
}
