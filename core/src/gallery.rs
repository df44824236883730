//! Gallery of units previously published by the active identity.
//!
//! The loader asks the ledger for every unit tagged with the configured
//! `App-Name` and owned by the identity, and maps ids to gateway URLs. The
//! displayed list is replaced wholesale on each refresh, so switching
//! identities never mixes two owners' images.

use crate::config::GalleryConfig;
use crate::error::QueryResult;
use crate::ledger::LedgerClient;
use crate::models::{PublishedRef, TagQuery, TAG_APP_NAME};

/// Ordered list of published images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    items: Vec<PublishedRef>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh list.
    pub fn replace(&mut self, items: Vec<PublishedRef>) {
        self.items = items;
    }

    /// Append freshly published refs, skipping ids already shown.
    pub fn extend(&mut self, items: impl IntoIterator<Item = PublishedRef>) -> usize {
        let mut added = 0;
        for item in items {
            if self.items.iter().any(|i| i.id == item.id) {
                continue;
            }
            self.items.push(item);
            added += 1;
        }
        added
    }

    pub fn items(&self) -> &[PublishedRef] {
        &self.items
    }

    pub fn urls(&self) -> Vec<String> {
        self.items.iter().map(|i| i.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Queries the ledger for an identity's images.
pub struct GalleryLoader<L: LedgerClient> {
    ledger: L,
    config: GalleryConfig,
}

impl<L: LedgerClient> GalleryLoader<L> {
    pub fn new(ledger: L, config: GalleryConfig) -> Self {
        Self { ledger, config }
    }

    /// Query matching `{App-Name, owner}` for `identity`.
    pub fn query_for(&self, identity: &str) -> TagQuery {
        TagQuery::new()
            .tag(TAG_APP_NAME, self.config.app_name.clone())
            .owner(identity)
    }

    /// Every image published by `identity` under this app.
    pub async fn load(&self, identity: &str) -> QueryResult<Vec<PublishedRef>> {
        let ids = self.ledger.query(&self.query_for(identity)).await?;
        Ok(ids
            .into_iter()
            .map(|id| PublishedRef {
                url: self.config.url_for(&id),
                id,
            })
            .collect())
    }

    /// Reload `gallery` for `identity`.
    ///
    /// Returns `true` when the gallery was replaced. Without an identity or
    /// on a failed query the gallery is left as it was.
    pub async fn refresh(&self, identity: Option<&str>, gallery: &mut Gallery) -> bool {
        let Some(identity) = identity else {
            return false;
        };

        match self.load(identity).await {
            Ok(items) => {
                log::info!("Gallery: {} image(s) for {}", items.len(), identity);
                gallery.replace(items);
                true
            }
            Err(e) => {
                log::error!("Gallery refresh failed for {}: {}", identity, e);
                false
            }
        }
    }
}
