//! Application configuration.
//!
//! Gateway, `App-Name` and page size come from [`gallery::GalleryConfig`];
//! this module only holds what the browser side needs on top.

pub use gallery::{APP_NAME, GATEWAY_URL, NOTIFICATION_MS};

/// Application name shown in the wallet extension's permission popup.
pub const WALLET_APP_NAME: &str = "Arweave-Wallet-Kit-Demo";

/// Permission that exposes the active address.
pub const ACCESS_ADDRESS: &str = "ACCESS_ADDRESS";

/// Permissions requested on connect.
pub const WALLET_PERMISSIONS: &[&str] = &[ACCESS_ADDRESS, "SIGN_TRANSACTION"];

/// How long to wait for the extension to inject itself before giving up on
/// restoring a session (ms).
pub const WALLET_WAIT_MS: u32 = 2_000;

/// File picker filter.
pub const ACCEPTED_TYPES: &str = "image/*";

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;
