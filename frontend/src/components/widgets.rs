//! 页面间共用的小组件
//!
//! 纯粹的输入/展示渲染，不持有业务状态。

use grade_manager_shared::Branch;
use leptos::prelude::*;

/// 带标签的输入框，绑定到一个 `RwSignal<String>`
#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=input_type.unwrap_or("text")
                placeholder=placeholder
                required=required
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class="input input-bordered w-full"
            />
        </div>
    }
}

/// 分支下拉框，值为分支 id 的字符串形式
#[component]
pub fn BranchSelect(
    value: RwSignal<String>,
    #[prop(into)] branches: Signal<Vec<Branch>>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for="branch" class="label">
                <span class="label-text">"Branch"</span>
            </label>
            <select
                id="branch"
                class="select select-bordered w-full"
                required
                on:change=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
            >
                <option value="" disabled selected=move || value.with(String::is_empty)>
                    "Select a branch"
                </option>
                <For
                    each=move || branches.get()
                    key=|b| b.id
                    children=move |branch| {
                        let id = branch.id.to_string();
                        let selected_id = id.clone();
                        view! {
                            <option value=id selected=move || value.with(|v| *v == selected_id)>
                                {branch.name}
                            </option>
                        }
                    }
                />
            </select>
        </div>
    }
}

/// 表单内联错误
#[component]
pub fn FormAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// 页面标题栏，右侧可放操作按钮
#[component]
pub fn PageHeader(
    title: &'static str,
    #[prop(optional)] subtitle: &'static str,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="flex flex-wrap items-center justify-between gap-4 mb-6">
            <div>
                <h1 class="text-2xl font-bold">{title}</h1>
                <p class="text-base-content/70 text-sm">{subtitle}</p>
            </div>
            <div class="flex gap-2">{children.map(|c| c())}</div>
        </div>
    }
}

/// 表格的加载/空状态行
#[component]
pub fn TableStatus(
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] is_empty: Signal<bool>,
    colspan: u32,
    empty_text: &'static str,
) -> impl IntoView {
    view! {
        <Show when=move || loading.get() && is_empty.get()>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">
                    <span class="loading loading-spinner loading-md"></span>
                    " Loading..."
                </td>
            </tr>
        </Show>
        <Show when=move || !loading.get() && is_empty.get()>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">{empty_text}</td>
            </tr>
        </Show>
    }
}
