//! Activity panel for the current upload batch.
//!
//! Lists per-file progress pushed by the orchestrator observer, with
//! auto-scroll support.

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::types::level_class;
use crate::LogEntry;

/// Request animation frame helper for smooth scrolling
fn request_animation_frame(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    if window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .is_ok()
    {
        closure.forget();
    }
}

#[component]
pub fn LogsPanel(logs: RwSignal<Vec<LogEntry>>) -> impl IntoView {
    let logs_container = create_node_ref::<leptos::html::Div>();

    // Auto-scroll to bottom when logs change
    create_effect(move |_| {
        logs.track();
        if let Some(container) = logs_container.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="logs-panel">
            <div class="logs-header">
                <span class="logs-title">"📋 Activity"</span>
                <button class="logs-clear" on:click=move |_| logs.set(vec![])>
                    "Clear"
                </button>
            </div>
            <div class="logs-content" node_ref=logs_container>
                <For
                    each=move || logs.get().into_iter().enumerate()
                    key=|(i, entry)| (*i, entry.message.clone())
                    children=move |(_, entry)| {
                        let indent = format!("padding-left: {}em", entry.indent);
                        view! {
                            <div class=format!("log-entry {}", level_class(entry.level)) style=indent>
                                <span class="log-time">"[" {entry.timestamp.clone()} "] "</span>
                                {entry.message.clone()}
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
