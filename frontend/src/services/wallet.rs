//! Arweave wallet extension (ArConnect, Wander, ...) behind the
//! [`gallery::Wallet`] capability.

use async_trait::async_trait;
use gallery::error::{SignError, SignResult};
use gallery::{ContentId, PublishUnit, SignedUnit, Wallet};
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::{ACCESS_ADDRESS, WALLET_APP_NAME, WALLET_PERMISSIONS, WALLET_WAIT_MS};
use crate::types::{AppError, AppResult};

/// Handle on `window.arweaveWallet`. Clones share the cached address.
#[derive(Clone, Default)]
pub struct ArweaveWallet {
    gateway: String,
    address: Rc<RefCell<Option<String>>>,
}

#[derive(Deserialize)]
struct JsSigned {
    id: String,
    tx: serde_json::Value,
}

impl ArweaveWallet {
    pub fn new(gateway: impl Into<String>) -> Self {
        Self {
            gateway: gateway.into(),
            address: Rc::default(),
        }
    }

    pub fn is_available() -> bool {
        let available = is_wallet_available();
        if !available {
            log::warn!("⚠️  No Arweave wallet extension found");
        }
        available
    }

    /// Cached address of the connected account.
    pub fn address(&self) -> Option<String> {
        self.address.borrow().clone()
    }

    /// Ask for permissions and return the active address.
    pub async fn connect(&self) -> AppResult<String> {
        if !Self::is_available() {
            return Err(AppError::NoWallet);
        }

        log::info!("🔌 Connecting to wallet...");
        let permissions = serde_wasm_bindgen::to_value(WALLET_PERMISSIONS)
            .map_err(|e| AppError::Wallet(e.to_string()))?;

        let result = JsFuture::from(connect_wallet(permissions, WALLET_APP_NAME))
            .await
            .map_err(|e| AppError::Wallet(js_error_message(&e)))?;
        let address = result
            .as_string()
            .ok_or_else(|| AppError::Wallet("Address is not a string".to_string()))?;

        log::info!("✅ Connected to wallet: {}", address);
        self.set_address(Some(address.clone()));
        Ok(address)
    }

    /// Pick up a session the user authorised on an earlier visit.
    ///
    /// Never prompts: returns the active address only when the extension
    /// already grants `ACCESS_ADDRESS` to this site.
    pub async fn restore(&self) -> Option<String> {
        let loaded = JsFuture::from(wait_for_wallet(WALLET_WAIT_MS)).await.ok()?;
        if !loaded.as_bool().unwrap_or(false) {
            return None;
        }

        let granted = match JsFuture::from(get_permissions()).await {
            Ok(granted) => granted,
            Err(e) => {
                log::warn!("Could not read wallet permissions: {}", js_error_message(&e));
                return None;
            }
        };
        let granted: Vec<String> = serde_wasm_bindgen::from_value(granted).unwrap_or_default();
        if !grants_address_access(&granted) {
            return None;
        }

        let address = JsFuture::from(get_active_address()).await.ok()?.as_string()?;
        log::info!("✅ Restored wallet session: {}", address);
        self.set_address(Some(address.clone()));
        Some(address)
    }

    pub async fn disconnect(&self) {
        if let Err(e) = JsFuture::from(disconnect_wallet()).await {
            log::warn!("Wallet disconnect failed: {}", js_error_message(&e));
        }
        self.set_address(None);
    }

    /// Run `callback` with the new address when the user switches account.
    pub fn on_switch(&self, callback: impl Fn(Option<String>) + 'static) {
        let wallet = self.clone();
        let closure = Closure::wrap(Box::new(move |address: JsValue| {
            let address = address.as_string();
            wallet.set_address(address.clone());
            callback(address);
        }) as Box<dyn Fn(JsValue)>);

        on_wallet_switch(&closure);
        // Lives as long as the page.
        closure.forget();
    }

    fn set_address(&self, address: Option<String>) {
        *self.address.borrow_mut() = address;
    }
}

#[async_trait(?Send)]
impl Wallet for ArweaveWallet {
    fn is_connected(&self) -> bool {
        self.address.borrow().is_some()
    }

    async fn active_identity(&self) -> SignResult<String> {
        if !self.is_connected() {
            return Err(SignError::NotConnected);
        }

        let result = JsFuture::from(get_active_address())
            .await
            .map_err(|e| SignError::Wallet(js_error_message(&e)))?;
        let address = result.as_string().ok_or(SignError::NotConnected)?;
        self.set_address(Some(address.clone()));
        Ok(address)
    }

    async fn sign(&self, unit: PublishUnit) -> SignResult<SignedUnit> {
        if !self.is_connected() {
            return Err(SignError::NotConnected);
        }

        let data = js_sys::Uint8Array::from(unit.data());
        let tags = serde_wasm_bindgen::to_value(unit.tags())
            .map_err(|e| SignError::Wallet(e.to_string()))?;

        let result = JsFuture::from(sign_transaction(&self.gateway, data, tags))
            .await
            .map_err(|e| classify_sign_error(js_error_message(&e)))?;

        let signed: JsSigned = serde_wasm_bindgen::from_value(result)
            .map_err(|e| SignError::Wallet(format!("Unexpected signature payload: {}", e)))?;

        Ok(SignedUnit {
            id: ContentId::new(signed.id),
            unit,
            envelope: signed.tx,
        })
    }
}

fn grants_address_access(granted: &[String]) -> bool {
    granted.iter().any(|permission| permission == ACCESS_ADDRESS)
}

/// Wallets report a closed or declined prompt as a plain error message.
fn classify_sign_error(message: String) -> SignError {
    let lower = message.to_lowercase();
    if lower.contains("cancel") || lower.contains("reject") || lower.contains("denied") {
        SignError::Rejected(message)
    } else if lower.contains("no arweave wallet") || lower.contains("not connected") {
        SignError::NotConnected
    } else {
        SignError::Wallet(message)
    }
}

fn js_error_message(e: &JsValue) -> String {
    js_sys::Reflect::get(e, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| e.as_string())
        .unwrap_or_else(|| "Unknown JS error".to_string())
}

/// JavaScript functions from wallet.js
#[wasm_bindgen(module = "/src/js/wallet.js")]
extern "C" {
    #[wasm_bindgen(js_name = "isWalletAvailable")]
    fn is_wallet_available() -> bool;

    #[wasm_bindgen(js_name = "waitForWallet")]
    fn wait_for_wallet(timeout_ms: u32) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "getPermissions")]
    fn get_permissions() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "connectWallet")]
    fn connect_wallet(permissions: JsValue, app_name: &str) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "disconnectWallet")]
    fn disconnect_wallet() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "getActiveAddress")]
    fn get_active_address() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "onWalletSwitch")]
    fn on_wallet_switch(callback: &Closure<dyn Fn(JsValue)>);

    #[wasm_bindgen(js_name = "signTransaction")]
    fn sign_transaction(gateway: &str, data: js_sys::Uint8Array, tags: JsValue) -> js_sys::Promise;
}
