//! Footer component

use leptos::*;

use crate::GATEWAY_URL;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>"Stored on Arweave • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href=GATEWAY_URL class="footer-link" target="_blank">
                    "Gateway"
                </a>
                <a href="https://www.arweave.org" class="footer-link" target="_blank">
                    "Arweave"
                </a>
            </div>
        </footer>
    }
}
