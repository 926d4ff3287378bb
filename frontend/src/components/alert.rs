//! 提示与确认服务
//!
//! toast 叠放在右上角并在超时后自动关闭；
//! `confirm` 打开模态确认框，并以 `bool` 返回用户的选择。

use crate::components::modal::Modal;
use futures::channel::oneshot;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    kind: ToastKind,
    message: String,
}

/// 正在显示的确认框内容
#[derive(Debug, Clone, PartialEq)]
struct ConfirmPrompt {
    title: String,
    text: String,
}

#[derive(Clone, Copy)]
pub struct AlertService {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
    prompt: RwSignal<Option<ConfirmPrompt>>,
    pending: StoredValue<Option<oneshot::Sender<bool>>>,
    timeout_ms: u32,
}

impl AlertService {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            prompt: RwSignal::new(None),
            pending: StoredValue::new(None),
            timeout_ms,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| list.push(Toast { id, kind, message }));

        let toasts = self.toasts;
        Timeout::new(self.timeout_ms, move || {
            toasts.try_update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }

    /// 打开确认框并等待用户选择
    ///
    /// 新的确认框会取消尚未答复的旧确认框（旧请求得到 `false`）。
    pub async fn confirm(&self, title: &str, text: &str) -> bool {
        let (tx, rx) = oneshot::channel();
        if let Some(previous) = self.pending.try_update_value(|p| p.replace(tx)).flatten() {
            let _ = previous.send(false);
        }
        self.prompt.set(Some(ConfirmPrompt {
            title: title.to_string(),
            text: text.to_string(),
        }));
        rx.await.unwrap_or(false)
    }

    fn answer(&self, confirmed: bool) {
        self.prompt.set(None);
        if let Some(tx) = self.pending.try_update_value(|p| p.take()).flatten() {
            let _ = tx.send(confirmed);
        }
    }
}

pub fn provide_alerts(timeout_ms: u32) -> AlertService {
    let service = AlertService::new(timeout_ms);
    provide_context(service);
    service
}

/// 从 Context 获取提示服务
pub fn use_alerts() -> AlertService {
    use_context::<AlertService>().expect("AlertService should be provided")
}

/// toast 与确认框的渲染出口，放在应用根部
#[component]
pub fn AlertHost() -> impl IntoView {
    let alerts = use_alerts();
    let prompt = alerts.prompt;

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || alerts.toasts.get()
                key=|t| t.id
                children=move |toast| {
                    let class = match toast.kind {
                        ToastKind::Success => "alert alert-success shadow-lg",
                        ToastKind::Error => "alert alert-error shadow-lg",
                    };
                    let id = toast.id;
                    view! {
                        <div class=class on:click=move |_| alerts.dismiss(id)>
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>

        <Modal
            open=Signal::derive(move || prompt.with(Option::is_some))
            title=Signal::derive(move || prompt.with(|p| p.as_ref().map(|p| p.title.clone()).unwrap_or_default()))
            on_close=move |_| alerts.answer(false)
        >
            <p class="py-4 text-base-content/70">
                {move || prompt.with(|p| p.as_ref().map(|p| p.text.clone()).unwrap_or_default())}
            </p>
            <div class="modal-action">
                <button class="btn btn-ghost" on:click=move |_| alerts.answer(false)>"Cancel"</button>
                <button class="btn btn-error" on:click=move |_| alerts.answer(true)>"Yes, do it!"</button>
            </div>
        </Modal>
    }
}
