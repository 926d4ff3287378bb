//! 成绩录入弹窗
//!
//! 打开时按当前学期加载已有成绩（不存在则从空表开始），
//! 录入过程中实时预览 IA，保存后以服务端结果为准。

use crate::auth::{report_api_error, use_auth};
use crate::components::alert::use_alerts;
use crate::components::modal::Modal;
use chrono::Local;
use grade_manager_shared::grades::{GradeField, GradeSheet, final_score, semester_for, sheet_from_lookup};
use grade_manager_shared::protocol::{GetFinalGrade, GetGrades, GradeKey, SaveGrades};
use grade_manager_shared::{Course, GradeResponse, Student};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn format_score(value: f64) -> String {
    format!("{:.1}", value)
}

#[component]
pub fn GradeDialog(
    #[prop(into)] student: Signal<Option<Student>>,
    /// 正在录入的课程，`None` 时弹窗关闭
    course: RwSignal<Option<Course>>,
) -> impl IntoView {
    let auth = use_auth();
    let alerts = use_alerts();

    let sheet = RwSignal::new(GradeSheet::default());
    // 每次从服务端载入后递增，用于刷新输入框的显示值
    let loaded = RwSignal::new(0u32);
    let (final_grade, set_final_grade) = signal(Option::<GradeResponse>::None);
    let (loading, set_loading) = signal(false);
    let (saving, set_saving) = signal(false);
    // 成绩加载失败（非 404）时禁止保存，避免用空表覆盖已有成绩
    let (load_failed, set_load_failed) = signal(false);
    let (field_error, set_field_error) = signal(Option::<String>::None);

    let current_key = move || {
        let student = student.get_untracked()?;
        let course = course.get_untracked()?;
        Some(GradeKey {
            student_id: student.id,
            course_id: course.id,
            semester: semester_for(student.year, Local::now().date_naive()),
        })
    };

    // 打开弹窗时加载成绩
    Effect::new(move |_| {
        if course.with(Option::is_none) {
            return;
        }
        let Some(key) = current_key() else { return };
        let Some(api) = auth.api() else { return };

        sheet.set(GradeSheet::default());
        set_final_grade.set(None);
        set_field_error.set(None);
        set_load_failed.set(false);
        loaded.update(|v| *v += 1);
        set_loading.set(true);

        spawn_local(async move {
            let grades_req = GetGrades { key };
            let final_req = GetFinalGrade { key };
            let (grades, final_res) =
                futures::join!(api.send(&grades_req), api.send(&final_req));
            if matches!(&grades, Err(e) if e.is_not_found()) {
                log!("[Grades] No grades yet for {:?}, starting from an empty sheet", key);
            }
            match sheet_from_lookup(grades) {
                Ok(loaded_sheet) => sheet.set(loaded_sheet),
                Err(e) => {
                    set_load_failed.set(true);
                    report_api_error(&auth, &alerts, "Loading grades", &e);
                }
            }
            match final_res {
                Ok(res) => set_final_grade.set(Some(res)),
                Err(e) if e.is_not_found() => {}
                Err(e) => warn!("[Grades] Final grade unavailable: {}", e),
            }
            loaded.update(|v| *v += 1);
            set_loading.set(false);
        });
    });

    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if load_failed.get_untracked() {
            return;
        }
        let Some(key) = current_key() else { return };
        let Some(api) = auth.api() else { return };
        let body = sheet.get_untracked().to_request(key.semester);

        set_saving.set(true);
        spawn_local(async move {
            match api.send(&SaveGrades { key, body }).await {
                Ok(res) => {
                    log!(
                        "[Grades] Saved {:?}: IA {} / reduced {}",
                        key,
                        res.ia_total,
                        res.reduced_ia_total
                    );
                    alerts.success(format!(
                        "Grades saved (reduced IA {})",
                        format_score(res.reduced_ia_total)
                    ));
                    course.set(None);
                }
                Err(e) => report_api_error(&auth, &alerts, "Saving grades", &e),
            }
            set_saving.set(false);
        });
    };

    let field_input = move |field: GradeField| {
        view! {
            <div class="form-control">
                <label class="label" for=field.name()>
                    <span class="label-text">{field.label()}</span>
                </label>
                <input
                    id=field.name()
                    type="number"
                    step="0.5"
                    min="0"
                    class="input input-bordered input-sm w-full"
                    prop:value=move || {
                        loaded.track();
                        sheet.with_untracked(|s| s.display(field))
                    }
                    on:input=move |ev| {
                        let raw = event_target_value(&ev);
                        match sheet.try_update(|s| s.set_field(field.name(), &raw)) {
                            Some(Err(e)) => set_field_error.set(Some(e.to_string())),
                            _ => set_field_error.set(None),
                        }
                    }
                />
            </div>
        }
    };

    let field_group = move |title: &'static str, fields: &'static [GradeField]| {
        view! {
            <div>
                <h4 class="font-semibold text-sm mb-1">{title}</h4>
                <div class="grid grid-cols-3 gap-3">
                    {fields.iter().map(|f| field_input(*f)).collect_view()}
                </div>
            </div>
        }
    };

    let ia = move || sheet.with(GradeSheet::internal_assessment);

    let title = Signal::derive(move || {
        let name = course.with(|c| c.as_ref().map(|c| c.course_name.clone()).unwrap_or_default());
        let semester = current_key().map(|k| k.semester).unwrap_or_default();
        format!("Grades: {} (Semester {})", name, semester)
    });

    view! {
        <Modal
            open=Signal::derive(move || course.with(Option::is_some))
            title=title
            on_close=move |_| course.set(None)
            wide=true
        >
            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="py-8 text-center"><span class="loading loading-spinner loading-md"></span></div> }
            >
                <form on:submit=on_save class="space-y-4 mt-4">
                    <Show when=move || load_failed.get()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>"Existing grades could not be loaded. Close and try again before saving."</span>
                        </div>
                    </Show>
                    <Show when=move || field_error.with(Option::is_some)>
                        <div role="alert" class="alert alert-warning text-sm py-2">
                            <span>{move || field_error.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    {field_group("Theory", &GradeField::THEORY)}
                    {field_group("Tasks", &GradeField::TASKS)}
                    {field_group("Lab", &GradeField::LAB)}

                    <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                        <div class="stat">
                            <div class="stat-title">"Theory"</div>
                            <div class="stat-value text-lg">{move || format_score(ia().theory_total)}</div>
                            <div class="stat-desc">"out of 50"</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Lab"</div>
                            <div class="stat-value text-lg">{move || format_score(ia().lab_total)}</div>
                            <div class="stat-desc">"out of 50"</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"IA Total"</div>
                            <div class="stat-value text-lg">{move || format_score(ia().ia_total)}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Reduced IA"</div>
                            <div class="stat-value text-lg text-primary">{move || format_score(ia().reduced_ia_total)}</div>
                            <div class="stat-desc">"out of 50"</div>
                        </div>
                    </div>

                    <Show when=move || final_grade.with(Option::is_some)>
                        <p class="text-sm text-base-content/70">
                            {move || {
                                final_grade
                                    .get()
                                    .map(|g| {
                                        format!(
                                            "Recorded: SEE {} / final {}",
                                            g.see_score.map(format_score).unwrap_or_else(|| "-".to_string()),
                                            format_score(final_score(g.reduced_ia_total, g.see_score)),
                                        )
                                    })
                                    .unwrap_or_default()
                            }}
                        </p>
                    </Show>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| course.set(None)>"Cancel"</button>
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get() || load_failed.get()>"Save Grades"</button>
                    </div>
                </form>
            </Show>
        </Modal>
    }
}
