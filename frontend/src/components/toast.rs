//! Batch notification, dismissed automatically after [`NOTIFICATION_MS`].

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::types::{Notification, Toast};
use crate::NOTIFICATION_MS;

/// Show `notification`, replacing any toast on screen.
pub fn show_toast(toast: RwSignal<Option<Toast>>, notification: Notification) {
    let seq = toast.get_untracked().map_or(1, |t| t.seq.wrapping_add(1));
    toast.set(Some(Toast { seq, notification }));

    Timeout::new(NOTIFICATION_MS, move || {
        if toast.get_untracked().is_some_and(|t| t.seq == seq) {
            toast.set(None);
        }
    })
    .forget();
}

#[component]
pub fn ToastView(toast: RwSignal<Option<Toast>>) -> impl IntoView {
    move || {
        toast.get().map(|t| {
            view! {
                <div class=t.css_class() role="status" on:click=move |_| toast.set(None)>
                    <div class="toast-title">{t.notification.title.clone()}</div>
                    <div class="toast-description">{t.notification.description.clone()}</div>
                </div>
            }
        })
    }
}
