use gallery::Gallery;
use leptos::*;

/// Thumbnails of everything the connected address published.
#[component]
pub fn GallerySection(
    gallery: RwSignal<Gallery>,
    address: RwSignal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="gallery-section">
            <div class="gallery-header">
                <span class="gallery-title">"🗂️ Your uploads"</span>
                <span class="gallery-count">{move || gallery.with(|g| g.len())}</span>
            </div>

            <Show
                when=move || !gallery.with(|g| g.is_empty())
                fallback=move || view! {
                    <div class="gallery-empty">
                        {move || if address.get().is_some() {
                            "Nothing published yet."
                        } else {
                            "Connect a wallet to see your images."
                        }}
                    </div>
                }
            >
                <div class="gallery-grid">
                    <For
                        each=move || gallery.with(|g| g.items().to_vec())
                        key=|item| item.id.clone()
                        children=move |item| {
                            view! {
                                <a class="gallery-item" href=item.url.clone() target="_blank">
                                    <img src=item.url.clone() alt=item.id.to_string() loading="lazy"/>
                                </a>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}
