//! 出勤管理
//!
//! 先按姓名/USN 搜索并选择学生，再选择课程，
//! 然后查看出勤记录或登记新的出勤。

use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::widgets::PageHeader;
use chrono::{Local, NaiveDate};
use grade_manager_shared::protocol::{ListAttendance, ListCourses, ListStudents, MarkAttendance, SearchStudents};
use grade_manager_shared::records::{attendance_percentage, search_matches, upsert_attendance};
use grade_manager_shared::{AttendanceRecord, AttendanceStatus, Course, Student};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AttendancePage() -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    // 学生搜索
    let query = RwSignal::new(String::new());
    let (results, set_results) = signal(Vec::<Student>::new());
    let (searched, set_searched) = signal(false);
    let (searching, set_searching) = signal(false);
    let (selected, set_selected) = signal(Option::<Student>::None);

    // 课程与记录
    let (courses, set_courses) = signal(Vec::<Course>::new());
    let course_id = RwSignal::new(String::new());
    let (records, set_records) = signal(Vec::<AttendanceRecord>::new());
    let (fetched, set_fetched) = signal(false);
    let (fetching, set_fetching) = signal(false);

    // 登记出勤
    let mark_date = RwSignal::new(Local::now().date_naive().to_string());
    let mark_status = RwSignal::new(AttendanceStatus::Present);
    let (marking, set_marking) = signal(false);

    if let Some(api) = auth.api() {
        spawn_local(async move {
            match api.send(&ListCourses).await {
                Ok(list) => set_courses.set(list),
                Err(e) => report_api_error(&auth, &alerts, "Loading courses", &e),
            }
        });
    }

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let q = query.get_untracked().trim().to_string();
        if q.is_empty() {
            set_results.set(Vec::new());
            set_searched.set(false);
            return;
        }
        let Some(api) = auth.api() else { return };

        set_searching.set(true);
        spawn_local(async move {
            let found = match api.send(&SearchStudents { query: q.clone() }).await {
                // 服务端搜索无结果时，退回到本地过滤完整列表
                Ok(list) if list.is_empty() => {
                    log!("[Attendance] Server search for {:?} was empty, filtering locally", q);
                    match api.send(&ListStudents).await {
                        Ok(all) => all.into_iter().filter(|s| search_matches(s, &q)).collect(),
                        Err(e) => {
                            report_api_error(&auth, &alerts, "Searching students", &e);
                            Vec::new()
                        }
                    }
                }
                Ok(list) => list,
                Err(e) => {
                    report_api_error(&auth, &alerts, "Searching students", &e);
                    Vec::new()
                }
            };
            set_results.set(found);
            set_searched.set(true);
            set_searching.set(false);
        });
    };

    let select_student = move |student: Student| {
        set_selected.set(Some(student));
        set_results.set(Vec::new());
        set_searched.set(false);
        set_records.set(Vec::new());
        set_fetched.set(false);
    };

    let selection = move || {
        let student_id = selected.with_untracked(|s| s.as_ref().map(|s| s.id))?;
        let course_id = course_id.get_untracked().parse::<i64>().ok()?;
        Some((student_id, course_id))
    };

    let on_fetch = move |_| {
        let Some((student_id, course_id)) = selection() else {
            alerts.error("Select a student and a course first");
            return;
        };
        let Some(api) = auth.api() else { return };

        set_fetching.set(true);
        spawn_local(async move {
            match api.send(&ListAttendance { student_id, course_id }).await {
                Ok(list) => {
                    set_records.set(list);
                    set_fetched.set(true);
                }
                Err(e) => report_api_error(&auth, &alerts, "Loading attendance", &e),
            }
            set_fetching.set(false);
        });
    };

    let on_mark = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some((student_id, course_id)) = selection() else {
            alerts.error("Select a student and a course first");
            return;
        };
        let Ok(date) = NaiveDate::parse_from_str(&mark_date.get_untracked(), "%Y-%m-%d") else {
            alerts.error("Pick a valid date");
            return;
        };
        let Some(api) = auth.api() else { return };
        let record = AttendanceRecord {
            student_id,
            course_id,
            date,
            status: mark_status.get_untracked(),
        };

        set_marking.set(true);
        spawn_local(async move {
            match api.send(&MarkAttendance(record)).await {
                Ok(saved) => {
                    set_records.update(|list| upsert_attendance(list, saved));
                    set_fetched.set(true);
                    alerts.success("Attendance marked");
                }
                Err(e) => report_api_error(&auth, &alerts, "Marking attendance", &e),
            }
            set_marking.set(false);
        });
    };

    let percentage = move || {
        records.with(|r| {
            attendance_percentage(r)
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "-".to_string())
        })
    };

    view! {
        <PageHeader title="Attendance" subtitle="Search a student, pick a course, then view or mark attendance." />

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-8">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Student"</h3>
                    <form class="join w-full" on:submit=on_search>
                        <input
                            type="text"
                            class="input input-bordered join-item w-full"
                            placeholder="Search by name or USN"
                            on:input=move |ev| query.set(event_target_value(&ev))
                            prop:value=move || query.get()
                        />
                        <button type="submit" class="btn btn-primary join-item" disabled=move || searching.get()>
                            "Search"
                        </button>
                    </form>

                    <Show when=move || searched.get()>
                        <ul class="menu bg-base-200 rounded-box mt-2">
                            <Show when=move || results.with(Vec::is_empty)>
                                <li class="disabled"><span>"No results found."</span></li>
                            </Show>
                            <For
                                each=move || results.get()
                                key=|s| s.id
                                children=move |student| {
                                    let label = format!("{} ({})", student.full_name(), student.usn);
                                    view! {
                                        <li>
                                            <a on:click=move |_| select_student(student.clone())>{label}</a>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>

                    <div class="mt-2 text-sm">
                        {move || match selected.get() {
                            Some(s) => view! {
                                <span>"Selected: " <span class="badge badge-primary">{format!("{} ({})", s.full_name(), s.usn)}</span></span>
                            }.into_any(),
                            None => view! { <span class="text-base-content/50">"No student selected"</span> }.into_any(),
                        }}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Course"</h3>
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| {
                            course_id.set(event_target_value(&ev));
                            set_records.set(Vec::new());
                            set_fetched.set(false);
                        }
                        prop:value=move || course_id.get()
                    >
                        <option value="" disabled selected=move || course_id.with(String::is_empty)>"Select a course"</option>
                        <For
                            each=move || courses.get()
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
                    <div class="card-actions justify-end mt-4">
                        <button class="btn btn-secondary" on:click=on_fetch disabled=move || fetching.get()>
                            "Fetch/Manage Attendance"
                        </button>
                    </div>
                </div>
            </div>
        </div>

        <Show when=move || fetched.get()>
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex flex-wrap items-center justify-between gap-4">
                        <h3 class="card-title">"Attendance Records"</h3>
                        <div class="stat p-0 w-auto">
                            <div class="stat-title">"Present"</div>
                            <div class="stat-value text-primary text-2xl">{percentage}</div>
                        </div>
                    </div>

                    <form class="flex flex-wrap items-end gap-2 mt-4" on:submit=on_mark>
                        <div class="form-control">
                            <label class="label" for="mark_date"><span class="label-text">"Date"</span></label>
                            <input
                                id="mark_date"
                                type="date"
                                class="input input-bordered"
                                on:input=move |ev| mark_date.set(event_target_value(&ev))
                                prop:value=move || mark_date.get()
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="mark_status"><span class="label-text">"Status"</span></label>
                            <select
                                id="mark_status"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    if let Some(status) = AttendanceStatus::parse(&event_target_value(&ev)) {
                                        mark_status.set(status);
                                    }
                                }
                            >
                                {[AttendanceStatus::Present, AttendanceStatus::Absent]
                                    .into_iter()
                                    .map(|status| view! {
                                        <option value=status.as_str() selected=move || mark_status.get() == status>
                                            {status.label()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <button type="submit" class="btn btn-primary" disabled=move || marking.get()>"Mark Attendance"</button>
                    </form>

                    <div class="overflow-x-auto mt-4">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Date"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || records.with(Vec::is_empty)>
                                    <tr>
                                        <td colspan="2" class="text-center py-8 text-base-content/50">"No attendance recorded yet."</td>
                                    </tr>
                                </Show>
                                {move || {
                                    records
                                        .get()
                                        .into_iter()
                                        .map(|record| {
                                            let badge = match record.status {
                                                AttendanceStatus::Present => "badge badge-success",
                                                AttendanceStatus::Absent => "badge badge-error",
                                                AttendanceStatus::Unknown => "badge badge-ghost",
                                            };
                                            view! {
                                                <tr>
                                                    <td>{record.date.format("%d %b %Y").to_string()}</td>
                                                    <td><span class=badge>{record.status.label()}</span></td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </Show>
    }
}
