//! Entry point for the WASM application

use gallery_frontend::{init_logging, App};
use leptos::*;

pub fn main() {
    init_logging();

    log::info!("🦀 Arweave Gallery - Starting Leptos App");

    mount_to_body(|| view! { <App/> })
}
