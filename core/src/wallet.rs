//! Wallet capability.
//!
//! The wallet owns the identity and the signing key. In the browser it is the
//! Arweave wallet extension (`window.arweaveWallet`); in tests it is
//! [`crate::testing::MemoryWallet`]. Signing may wait on a user prompt for an
//! unbounded time.

use async_trait::async_trait;

use crate::error::SignResult;
use crate::models::{PublishUnit, SignedUnit};

#[async_trait(?Send)]
pub trait Wallet {
    /// Whether an identity is currently connected.
    fn is_connected(&self) -> bool;

    /// Address of the connected identity.
    async fn active_identity(&self) -> SignResult<String>;

    /// Sign `unit`, assigning its ledger id.
    async fn sign(&self, unit: PublishUnit) -> SignResult<SignedUnit>;
}

#[async_trait(?Send)]
impl<W: Wallet + ?Sized> Wallet for std::rc::Rc<W> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn active_identity(&self) -> SignResult<String> {
        (**self).active_identity().await
    }

    async fn sign(&self, unit: PublishUnit) -> SignResult<SignedUnit> {
        (**self).sign(unit).await
    }
}
