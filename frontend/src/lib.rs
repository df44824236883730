//! Arweave Gallery - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for publishing images to Arweave with a browser
//! wallet and browsing the images an address published.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (wallet connect / disconnect)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection (dropzone, thumbnails, upload, cancel)   │
//! │  ├── LogsPanel (per-file progress)                          │
//! │  └── GallerySection (refreshed when the address changes)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                              ToastView (9 s)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (StagedPreview, Toast, AppError)
//! - [`components`] - UI components (Header, Upload, Gallery, etc.)
//! - [`services`] - Browser wallet and file capabilities

use gallery::{Gallery, GalleryConfig, GalleryLoader, GatewayClient};
use leptos::*;
use leptos_router::*;
use std::rc::Rc;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Staging
    StagedPreview,
    // Logs
    LogEntry, LogLevel,
    // Toasts
    Notification, NotificationLevel, Toast,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

/// Console logging and panic hook; call once before mounting.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);
}

/// Append a timestamped entry to the activity panel.
pub fn push_log(logs: RwSignal<Vec<LogEntry>>, entry: LogEntry) {
    log::info!("{}", entry.message);
    let entry = entry.with_timestamp(chrono::Local::now().format("%H:%M:%S").to_string());
    logs.update(|logs| {
        logs.push(entry);
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let config = GalleryConfig::default();
    let ledger = GatewayClient::new(&config);
    let wallet = ArweaveWallet::new(config.gateway.clone());

    let address = create_rw_signal(None::<String>);
    let logs = create_rw_signal(Vec::<LogEntry>::new());
    let gallery = create_rw_signal(Gallery::new());
    let toast = create_rw_signal(None::<Toast>);

    wallet.on_switch(move |next| address.set(next));

    // Returning users who already granted access start connected
    let restoring = wallet.clone();
    spawn_local(async move {
        if let Some(restored) = restoring.restore().await {
            if address.get_untracked().is_none() {
                address.set(Some(restored));
            }
        }
    });

    // Reload the gallery for every new address
    let loader = Rc::new(GalleryLoader::new(ledger.clone(), config.clone()));
    create_effect(move |_| {
        let current = address.get();
        let loader = loader.clone();
        spawn_local(async move {
            let mut next = Gallery::new();
            if !loader.refresh(current.as_deref(), &mut next).await {
                return;
            }
            // Drop results for an address that is no longer active
            if address.get_untracked() == current {
                gallery.set(next);
            }
        });
    });

    view! {
        <Header wallet=wallet.clone() address=address logs=logs/>

        <div class="container">
            <Hero/>

            <UploadSection
                wallet=wallet
                ledger=ledger
                config=config
                address=address
                logs=logs
                gallery=gallery
                toast=toast
            />

            <Show when=move || !logs.with(|l| l.is_empty()) fallback=|| view! {}>
                <LogsPanel logs=logs/>
            </Show>

            <GallerySection gallery=gallery address=address/>
        </div>

        <ToastView toast=toast/>
        <Footer/>
    }
}
