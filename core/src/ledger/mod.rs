//! Ledger network capability.
//!
//! - [`LedgerClient`] - Submit signed units and query published ones
//! - [`GatewayClient`] - HTTP implementation against an Arweave gateway

#[cfg(feature = "gateway")]
mod gateway;

#[cfg(feature = "gateway")]
pub use gateway::GatewayClient;

use async_trait::async_trait;

use crate::error::{PublishResult, QueryResult};
use crate::models::{ContentId, SignedUnit, SubmitStatus, TagQuery};

#[async_trait(?Send)]
pub trait LedgerClient {
    /// Post a signed unit. Non-2xx statuses are returned, not raised; only
    /// transport failures are errors.
    async fn submit(&self, signed: &SignedUnit) -> PublishResult<SubmitStatus>;

    /// All ids matching `query`.
    async fn query(&self, query: &TagQuery) -> QueryResult<Vec<ContentId>>;
}

#[async_trait(?Send)]
impl<L: LedgerClient + ?Sized> LedgerClient for std::rc::Rc<L> {
    async fn submit(&self, signed: &SignedUnit) -> PublishResult<SubmitStatus> {
        (**self).submit(signed).await
    }

    async fn query(&self, query: &TagQuery) -> QueryResult<Vec<ContentId>> {
        (**self).query(query).await
    }
}
