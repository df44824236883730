//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Arweave Gallery"</h1>
            <p class="subtitle">
                "Drop images, sign each one with your Arweave wallet and keep them on the permaweb. "
                "Everything you published from this app shows up below."
            </p>
        </div>
    }
}
