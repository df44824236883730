//! In-memory capabilities for tests and offline demos.
//!
//! - [`MemoryFile`] - File with bytes in memory, optionally failing on read
//! - [`CountingPreviews`] - Preview allocator that counts acquire/release
//! - [`MemoryWallet`] - Wallet that signs with random 32-char ids, and can
//!   hold a prompt open behind a [`SignGate`]
//! - [`MemoryLedger`] - Ledger that stores units and answers tag queries
//!
//! All doubles are cheap to clone and clones share state, so a test can keep
//! a handle while the orchestrator owns another.

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::json;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use crate::error::{BuildError, BuildResult, PublishResult, QueryError, QueryResult, SignError, SignResult};
use crate::ledger::LedgerClient;
use crate::models::{ContentId, PublishUnit, SignedUnit, SubmitStatus, Tag, TagQuery};
use crate::staging::{FileSource, PreviewAllocator, PreviewHandle};
use crate::wallet::Wallet;

// =============================================================================
// Files
// =============================================================================

/// A file held in memory.
#[derive(Clone)]
pub struct MemoryFile {
    name: String,
    declared_type: Option<String>,
    data: Vec<u8>,
    fail: Option<String>,
    on_read: Option<Rc<dyn Fn()>>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            data,
            fail: None,
            on_read: None,
        }
    }

    /// Declare a MIME type, as a browser would.
    pub fn with_type(mut self, content_type: impl Into<String>) -> Self {
        self.declared_type = Some(content_type.into());
        self
    }

    /// Make every read fail with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fail = Some(reason.into());
        self
    }

    /// Run `hook` at the start of every read.
    pub fn on_read(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_read = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for MemoryFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFile")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[async_trait(?Send)]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_bytes(&self) -> BuildResult<Vec<u8>> {
        if let Some(hook) = &self.on_read {
            hook();
        }
        match &self.fail {
            Some(reason) => Err(BuildError::read(&self.name, reason)),
            None => Ok(self.data.clone()),
        }
    }
}

// =============================================================================
// Previews
// =============================================================================

#[derive(Debug, Default)]
struct PreviewCounts {
    next: usize,
    live: HashSet<String>,
    acquired: usize,
    released: usize,
    double_releases: usize,
}

/// Hands out `mem://preview/<n>` handles and records releases.
#[derive(Debug, Clone, Default)]
pub struct CountingPreviews {
    counts: Rc<RefCell<PreviewCounts>>,
}

impl CountingPreviews {
    pub fn acquired(&self) -> usize {
        self.counts.borrow().acquired
    }

    pub fn released(&self) -> usize {
        self.counts.borrow().released
    }

    /// Releases of handles that were already released.
    pub fn double_releases(&self) -> usize {
        self.counts.borrow().double_releases
    }

    /// Handles acquired and not yet released.
    pub fn live(&self) -> usize {
        self.counts.borrow().live.len()
    }
}

impl<F: FileSource> PreviewAllocator<F> for CountingPreviews {
    fn acquire(&self, _file: &F) -> PreviewHandle {
        let mut counts = self.counts.borrow_mut();
        counts.next += 1;
        counts.acquired += 1;
        let url = format!("mem://preview/{}", counts.next);
        counts.live.insert(url.clone());
        PreviewHandle::new(url)
    }

    fn release(&self, handle: &PreviewHandle) {
        let mut counts = self.counts.borrow_mut();
        if counts.live.remove(handle.url()) {
            counts.released += 1;
        } else {
            counts.double_releases += 1;
        }
    }
}

// =============================================================================
// Wallet
// =============================================================================

#[derive(Debug, Default)]
struct WalletState {
    identity: Option<String>,
    signatures: usize,
    disconnect_after: Option<usize>,
    rejected: HashSet<String>,
    identity_fails: bool,
    held: HashMap<String, oneshot::Receiver<()>>,
}

/// An open signature prompt. The prompt answers on [`SignGate::release`] or
/// when the gate is dropped; keeping it alive models a prompt nobody answers.
#[derive(Debug)]
pub struct SignGate {
    release: oneshot::Sender<()>,
}

impl SignGate {
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

/// Wallet double. Envelopes carry `id`, `owner`, `tags` and `data_size`.
#[derive(Debug, Clone, Default)]
pub struct MemoryWallet {
    state: Rc<RefCell<WalletState>>,
}

impl MemoryWallet {
    pub fn connected(identity: impl Into<String>) -> Self {
        let wallet = Self::default();
        wallet.connect(identity);
        wallet
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connect(&self, identity: impl Into<String>) {
        self.state.borrow_mut().identity = Some(identity.into());
    }

    pub fn disconnect(&self) {
        self.state.borrow_mut().identity = None;
    }

    /// Disconnect right after the `n`-th successful signature.
    pub fn disconnect_after(self, n: usize) -> Self {
        self.state.borrow_mut().disconnect_after = Some(n);
        self
    }

    /// Decline the signature prompt for the file called `name`.
    pub fn reject(self, name: impl Into<String>) -> Self {
        self.state.borrow_mut().rejected.insert(name.into());
        self
    }

    /// Make identity lookups fail while staying connected.
    pub fn failing_identity(self) -> Self {
        self.state.borrow_mut().identity_fails = true;
        self
    }

    /// Keep the prompt for the file called `name` open until the gate lets
    /// it go.
    pub fn hold(&self, name: impl Into<String>) -> SignGate {
        let (release, held) = oneshot::channel();
        self.state.borrow_mut().held.insert(name.into(), held);
        SignGate { release }
    }

    pub fn signatures(&self) -> usize {
        self.state.borrow().signatures
    }
}

#[async_trait(?Send)]
impl Wallet for MemoryWallet {
    fn is_connected(&self) -> bool {
        self.state.borrow().identity.is_some()
    }

    async fn active_identity(&self) -> SignResult<String> {
        let state = self.state.borrow();
        if state.identity_fails {
            return Err(SignError::Wallet("identity unavailable".into()));
        }
        state.identity.clone().ok_or(SignError::NotConnected)
    }

    async fn sign(&self, unit: PublishUnit) -> SignResult<SignedUnit> {
        let held = self.state.borrow_mut().held.remove(unit.name());
        if let Some(prompt) = held {
            let _ = prompt.await;
        }

        let mut state = self.state.borrow_mut();
        let owner = state.identity.clone().ok_or(SignError::NotConnected)?;
        if state.rejected.contains(unit.name()) {
            return Err(SignError::Rejected("user declined".into()));
        }

        state.signatures += 1;
        if state.disconnect_after == Some(state.signatures) {
            state.identity = None;
        }

        let id = ContentId::new(Uuid::new_v4().simple().to_string());
        let envelope = json!({
            "id": id,
            "owner": owner,
            "tags": unit.tags(),
            "data_size": unit.data().len().to_string(),
        });

        Ok(SignedUnit { id, unit, envelope })
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// A unit accepted by [`MemoryLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUnit {
    pub id: ContentId,
    pub owner: String,
    pub tags: Vec<Tag>,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
struct LedgerState {
    units: Vec<StoredUnit>,
    reject_with: Option<u16>,
    network_down: bool,
    queries: usize,
}

/// Ledger double answering queries from the units it accepted.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Rc<RefCell<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every submission with `code` without storing anything.
    pub fn reject_with(self, code: u16) -> Self {
        self.state.borrow_mut().reject_with = Some(code);
        self
    }

    /// Fail every call with a network error.
    pub fn offline(self) -> Self {
        self.set_offline(true);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().network_down = offline;
    }

    /// Store a unit as if it had been published earlier.
    pub fn seed(&self, id: &str, owner: &str, tags: Vec<Tag>) {
        self.state.borrow_mut().units.push(StoredUnit {
            id: ContentId::new(id),
            owner: owner.to_string(),
            tags,
            data: Vec::new(),
        });
    }

    pub fn units(&self) -> Vec<StoredUnit> {
        self.state.borrow().units.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn queries(&self) -> usize {
        self.state.borrow().queries
    }
}

#[async_trait(?Send)]
impl LedgerClient for MemoryLedger {
    async fn submit(&self, signed: &SignedUnit) -> PublishResult<SubmitStatus> {
        let mut state = self.state.borrow_mut();
        if state.network_down {
            return Err(crate::error::PublishError::Network("ledger offline".into()));
        }
        if let Some(code) = state.reject_with {
            return Ok(SubmitStatus::new(code).with_detail("rejected by memory ledger"));
        }

        let owner = signed.envelope["owner"].as_str().unwrap_or_default().to_string();
        state.units.push(StoredUnit {
            id: signed.id.clone(),
            owner,
            tags: signed.unit.tags().to_vec(),
            data: signed.unit.data().to_vec(),
        });
        Ok(SubmitStatus::new(200))
    }

    async fn query(&self, query: &TagQuery) -> QueryResult<Vec<ContentId>> {
        let mut state = self.state.borrow_mut();
        state.queries += 1;
        if state.network_down {
            return Err(QueryError::Network("ledger offline".into()));
        }

        Ok(state
            .units
            .iter()
            .filter(|u| query.matches(&u.owner, &u.tags))
            .map(|u| u.id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wallet_disconnects_after_n() {
        let wallet = MemoryWallet::connected("addr").disconnect_after(1);
        let unit = PublishUnit::new("a.png", vec![1], vec![]);

        let signed = wallet.sign(unit.clone()).await.unwrap();
        assert_eq!(signed.id.as_str().len(), 32);
        assert!(!wallet.is_connected());
        assert_eq!(wallet.sign(unit).await.unwrap_err(), SignError::NotConnected);
    }

    #[tokio::test]
    async fn test_wallet_rejects_named_file() {
        let wallet = MemoryWallet::connected("addr").reject("b.png");
        let err = wallet
            .sign(PublishUnit::new("b.png", vec![1], vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, SignError::Rejected(_)));
        assert_eq!(wallet.signatures(), 0);
    }

    #[tokio::test]
    async fn test_held_prompt_waits_for_gate() {
        use futures::{pin_mut, poll};

        let wallet = MemoryWallet::connected("addr");
        let gate = wallet.hold("a.png");
        let signing = wallet.sign(PublishUnit::new("a.png", vec![1], vec![]));
        pin_mut!(signing);

        assert!(poll!(&mut signing).is_pending());
        assert_eq!(wallet.signatures(), 0);

        gate.release();
        let signed = signing.await.unwrap();
        assert_eq!(signed.unit.name(), "a.png");
        assert_eq!(wallet.signatures(), 1);
    }

    #[test]
    fn test_double_release_is_counted_not_fatal() {
        let previews = CountingPreviews::default();
        let handle = PreviewAllocator::<MemoryFile>::acquire(&previews, &MemoryFile::new("a.png", vec![]));
        PreviewAllocator::<MemoryFile>::release(&previews, &handle);
        PreviewAllocator::<MemoryFile>::release(&previews, &handle);
        assert_eq!(previews.released(), 1);
        assert_eq!(previews.double_releases(), 1);
    }
}
