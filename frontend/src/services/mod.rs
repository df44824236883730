//! Browser capabilities plugged into the core pipeline.
//!
//! # Services
//!
//! - [`wallet`] - Arweave wallet extension as a [`gallery::Wallet`]
//! - [`files`] - Browser files and object-URL previews
//!
//! Posting and gallery queries use [`gallery::GatewayClient`] directly.
//!
//! # JavaScript Bindings
//!
//! `src/js/wallet.js` wraps `window.arweaveWallet` and arweave-js.

pub mod files;
pub mod wallet;

pub use files::*;
pub use wallet::*;
