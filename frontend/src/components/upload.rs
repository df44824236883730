//! Image staging and upload with drag & drop support.
//!
//! Selected files are staged with object-URL thumbnails; the submit button
//! publishes every staged file through the wallet and the gateway.

use gallery::mime::format_bytes;
use gallery::{FileSource, Gallery, GalleryConfig, GatewayClient, StagingStore, UploadOrchestrator};
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, HtmlInputElement};

use super::show_toast;
use crate::services::{ArweaveWallet, BrowserFile, ObjectUrls};
use crate::types::{StagedPreview, Toast};
use crate::{push_log, LogEntry, ACCEPTED_TYPES};

type Staging = StagingStore<BrowserFile, ObjectUrls>;

#[component]
pub fn UploadSection(
    wallet: ArweaveWallet,
    ledger: GatewayClient,
    config: GalleryConfig,
    address: RwSignal<Option<String>>,
    logs: RwSignal<Vec<LogEntry>>,
    gallery: RwSignal<Gallery>,
    toast: RwSignal<Option<Toast>>,
) -> impl IntoView {
    let staging = Rc::new(RefCell::new(Staging::new(ObjectUrls)));
    let (staged, set_staged) = create_signal(Vec::<StagedPreview>::new());
    let (uploading, set_uploading) = create_signal(false);
    let (dragging, set_dragging) = create_signal(false);

    let orchestrator = Rc::new(
        UploadOrchestrator::new(wallet, ledger, config)
            .with_observer(move |event| push_log(logs, LogEntry::from(event))),
    );

    // Revoke every preview URL when the section goes away
    {
        let staging = staging.clone();
        on_cleanup(move || staging.borrow_mut().clear());
    }

    let stage = {
        let staging = staging.clone();
        move |files: Vec<BrowserFile>| {
            if uploading.get_untracked() {
                return;
            }
            let report = staging.borrow_mut().add(files);
            for name in &report.rejected {
                push_log(logs, LogEntry::warning(format!("Skipped {}: not an image", name)));
            }
            set_staged.set(previews_of(&staging.borrow()));
        }
    };

    let on_file_change = {
        let stage = stage.clone();
        move |ev: Event| {
            let input: HtmlInputElement = event_target(&ev);
            if let Some(list) = input.files() {
                stage(BrowserFile::from_list(&list));
            }
            // Allow picking the same files again
            input.set_value("");
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
            stage(BrowserFile::from_list(&list));
        }
    };

    let on_submit = {
        let staging = staging.clone();
        let orchestrator = orchestrator.clone();
        move |_| {
            let count = staging.borrow().len();
            if !orchestrator.can_submit(count) {
                return;
            }

            let files = staging.borrow().sources();
            let staging = staging.clone();
            let orchestrator = orchestrator.clone();
            set_uploading.set(true);
            push_log(logs, LogEntry::info(format!("📤 Uploading {} file(s)...", count)));

            spawn_local(async move {
                let outcome = orchestrator.publish(&files).await;

                if outcome.clears_staging() {
                    staging.borrow_mut().clear();
                    set_staged.set(Vec::new());
                }

                let published = outcome.published();
                if !published.is_empty() {
                    gallery.update(|g| {
                        g.extend(published);
                    });
                }

                if let Some(notification) = outcome.notification() {
                    show_toast(toast, notification);
                }
                set_uploading.set(false);
            });
        }
    };

    let on_cancel = {
        let orchestrator = orchestrator.clone();
        move |_| orchestrator.cancel()
    };

    let remove = {
        let staging = staging.clone();
        move |name: String| {
            if uploading.get_untracked() {
                return;
            }
            staging.borrow_mut().remove(&name);
            set_staged.set(previews_of(&staging.borrow()));
        }
    };

    let trigger_file_input = move |_| {
        if uploading.get_untracked() {
            return;
        }
        if let Some(input) = document()
            .get_element_by_id("fileInput")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.click();
        }
    };

    let submit_disabled = move || staged.get().is_empty() || address.get().is_none() || uploading.get();

    view! {
        <div
            class="upload-section"
            class:dragging=move || dragging.get()
            id="uploadZone"
            on:click=trigger_file_input
            on:dragover=move |ev: DragEvent| {
                ev.prevent_default();
                set_dragging.set(true);
            }
            on:dragleave=move |_| set_dragging.set(false)
            on:drop=on_drop
        >
            <div class="upload-icon">"🖼️"</div>
            <div class="upload-text">
                {move || if uploading.get() {
                    "⏳ Uploading..."
                } else {
                    "Drop images here"
                }}
            </div>
            <div class="upload-hint">"or click to select"</div>

            <input
                type="file"
                id="fileInput"
                accept=ACCEPTED_TYPES
                multiple=true
                style="display:none"
                on:change=on_file_change
            />
        </div>

        <Show when=move || !staged.get().is_empty() fallback=|| view! {}>
            <div class="staged-grid">
                <For
                    each=move || staged.get()
                    key=|preview| preview.url.clone()
                    children={
                        let remove = remove.clone();
                        move |preview: StagedPreview| {
                            let remove = remove.clone();
                            let name = preview.name.clone();
                            view! {
                                <div class="staged-item">
                                    <img src=preview.url.clone() alt=preview.name.clone()/>
                                    <div class="staged-meta">
                                        <span class="staged-name">{preview.name.clone()}</span>
                                        <span class="staged-size">{preview.size.clone()}</span>
                                    </div>
                                    <button
                                        class="staged-remove"
                                        disabled=move || uploading.get()
                                        on:click=move |_| remove(name.clone())
                                    >
                                        "✕"
                                    </button>
                                </div>
                            }
                        }
                    }
                />
            </div>
        </Show>

        <div class="upload-actions">
            <button class="upload-button" disabled=submit_disabled on:click=on_submit>
                {move || if uploading.get() { "Uploading..." } else { "Upload" }}
            </button>
            <Show when=move || uploading.get() fallback=|| view! {}>
                <button class="cancel-button" on:click=on_cancel.clone()>"Cancel"</button>
            </Show>
            <Show when=move || address.get().is_none() fallback=|| view! {}>
                <span class="upload-hint">"Connect a wallet to upload"</span>
            </Show>
        </div>
    }
}

fn previews_of(staging: &Staging) -> Vec<StagedPreview> {
    staging
        .files()
        .iter()
        .filter_map(|f| {
            Some(StagedPreview {
                name: f.name().to_string(),
                url: f.preview_url().filter(|u| !u.is_empty())?.to_string(),
                size: format_bytes(f.source().size()),
            })
        })
        .collect()
}
