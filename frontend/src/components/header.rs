use leptos::*;

use crate::services::wallet::ArweaveWallet;
use crate::types::short_address;
use crate::LogEntry;

#[component]
pub fn Header(
    wallet: ArweaveWallet,
    address: RwSignal<Option<String>>,
    logs: RwSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (busy, set_busy) = create_signal(false);

    let on_wallet_click = move |_| {
        if busy.get_untracked() {
            return;
        }
        let wallet = wallet.clone();
        set_busy.set(true);

        spawn_local(async move {
            if address.get_untracked().is_some() {
                log::info!("🔌 Disconnecting wallet");
                wallet.disconnect().await;
                address.set(None);
            } else {
                log::info!("🔑 Attempting to connect wallet...");
                match wallet.connect().await {
                    Ok(addr) => address.set(Some(addr)),
                    Err(e) => {
                        log::error!("❌ Wallet connection failed: {}", e);
                        crate::push_log(logs, LogEntry::error(e.to_string()));
                    }
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"ARWEAVE GALLERY"</a>
            </div>
            <div class="header-right">
                <div
                    class="wallet-status"
                    class:connected=move || address.get().is_some()
                    on:click=on_wallet_click
                    style="cursor: pointer;"
                >
                    <span class="wallet-dot" class:connected=move || address.get().is_some()></span>
                    <span id="walletText">
                        {move || match address.get() {
                            Some(addr) => short_address(&addr),
                            None if busy.get() => "Connecting...".to_string(),
                            None => "Connect Wallet".to_string(),
                        }}
                    </span>
                </div>
            </div>
        </header>
    }
}
