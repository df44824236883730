//! Upload orchestrator.
//!
//! Drives every staged file through build → sign → publish. Items run
//! concurrently on the caller's executor and fail independently: a file that
//! cannot be read, is rejected by the wallet or refused by the gateway is
//! logged and reported, and its siblings carry on. Nothing is retried.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──all items settled──▶ Idle
//!                      │
//!                      ├─ item: Building → Signing → Publishing → Done
//!                      └─ item: ... → Failed
//! ```
//!
//! A settled batch is reported as a success even when some items failed;
//! the notification carries the failure count.

mod cancel;
mod report;

pub use cancel::CancelToken;
pub use report::{
    BatchReport, ItemEvent, ItemFailure, ItemOutcome, ItemStage, Notification, NotificationLevel,
    SkipReason, SubmitOutcome,
};

use futures::future::{join_all, select, Either};
use futures::pin_mut;
use std::cell::{Cell, RefCell};
use std::future::Future;
use uuid::Uuid;

use crate::builder::TransactionBuilder;
use crate::config::GalleryConfig;
use crate::error::{ItemError, OrchestrationError, PublishError};
use crate::ledger::LedgerClient;
use crate::models::PublishedRef;
use crate::staging::{FileSource, PreviewAllocator, StagingStore};
use crate::wallet::Wallet;

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Submitting,
}

type Observer = Box<dyn Fn(&ItemEvent)>;

/// Publishes batches of staged files with an injected wallet and ledger.
pub struct UploadOrchestrator<W: Wallet, L: LedgerClient> {
    wallet: W,
    ledger: L,
    builder: TransactionBuilder,
    config: GalleryConfig,
    state: Cell<UploadState>,
    cancel: RefCell<CancelToken>,
    observer: Option<Observer>,
}

impl<W: Wallet, L: LedgerClient> UploadOrchestrator<W, L> {
    pub fn new(wallet: W, ledger: L, config: GalleryConfig) -> Self {
        Self {
            wallet,
            ledger,
            builder: TransactionBuilder::from_config(&config),
            config,
            state: Cell::new(UploadState::Idle),
            cancel: RefCell::new(CancelToken::new()),
            observer: None,
        }
    }

    /// Receive every item stage transition.
    pub fn with_observer(mut self, observer: impl Fn(&ItemEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> UploadState {
        self.state.get()
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Whether a submit would run right now.
    pub fn can_submit(&self, staged: usize) -> bool {
        staged > 0 && self.wallet.is_connected() && self.state.get() == UploadState::Idle
    }

    /// Cancel the running batch, if any.
    pub fn cancel(&self) {
        if self.state.get() == UploadState::Submitting {
            log::warn!("Cancelling upload batch");
            self.cancel.borrow().cancel();
        }
    }

    /// Publish everything in `staging`, clearing it if the batch settles.
    pub async fn submit<F, P>(&self, staging: &mut StagingStore<F, P>) -> SubmitOutcome
    where
        F: FileSource,
        P: PreviewAllocator<F>,
    {
        let files = staging.sources();
        let outcome = self.publish(&files).await;
        if outcome.clears_staging() {
            staging.clear();
        }
        outcome
    }

    /// Publish a snapshot of staged files.
    ///
    /// Skipped without side effects when `files` is empty, no wallet is
    /// connected, or a batch is already running.
    pub async fn publish<F: FileSource>(&self, files: &[F]) -> SubmitOutcome {
        if files.is_empty() {
            return SubmitOutcome::Skipped(SkipReason::NothingStaged);
        }
        if !self.wallet.is_connected() {
            return SubmitOutcome::Skipped(SkipReason::NotConnected);
        }
        if self.state.get() == UploadState::Submitting {
            return SubmitOutcome::Skipped(SkipReason::AlreadySubmitting);
        }

        let _submitting = SubmittingGuard::enter(&self.state);
        let cancel = CancelToken::new();
        *self.cancel.borrow_mut() = cancel.clone();

        let identity = match self.wallet.active_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                log::error!("Upload aborted: {}", e);
                return SubmitOutcome::Failed {
                    error: e.into(),
                    partial: None,
                };
            }
        };

        let batch_id = Uuid::new_v4();
        log::info!(
            "Batch {}: publishing {} file(s) as {}",
            batch_id,
            files.len(),
            identity
        );

        let outcomes = join_all(files.iter().map(|file| self.run_item(file, &cancel))).await;
        let report = BatchReport {
            batch_id,
            identity,
            outcomes,
        };

        log::info!(
            "Batch {}: {} published, {} failed",
            batch_id,
            report.total() - report.failed_count(),
            report.failed_count()
        );

        if cancel.is_cancelled() {
            return SubmitOutcome::Failed {
                error: OrchestrationError::Cancelled,
                partial: Some(report),
            };
        }
        SubmitOutcome::Settled(report)
    }

    async fn run_item<F: FileSource>(&self, file: &F, cancel: &CancelToken) -> ItemOutcome {
        let name = file.name().to_string();
        let result = self.pipeline(file, cancel).await;

        match &result {
            Ok(published) => {
                log::info!("'{}' published at {}", name, published.url);
                self.emit(ItemEvent::new(&name, ItemStage::Done));
            }
            Err(failure) => {
                log::warn!("'{}' {}", name, failure);
                self.emit(ItemEvent::failed(&name, failure));
            }
        }

        ItemOutcome { name, result }
    }

    async fn pipeline<F: FileSource>(
        &self,
        file: &F,
        cancel: &CancelToken,
    ) -> Result<PublishedRef, ItemFailure> {
        let name = file.name();

        self.emit(ItemEvent::new(name, ItemStage::Building));
        let unit = self
            .builder
            .build(file)
            .await
            .map_err(|e| ItemFailure::new(ItemStage::Building, e))?;

        checkpoint(cancel, ItemStage::Signing)?;
        self.emit(ItemEvent::new(name, ItemStage::Signing));
        let signed = until_cancelled(cancel, ItemStage::Signing, self.wallet.sign(unit))
            .await?
            .map_err(|e| ItemFailure::new(ItemStage::Signing, e))?;

        checkpoint(cancel, ItemStage::Publishing)?;
        self.emit(ItemEvent::new(name, ItemStage::Publishing));
        let status = until_cancelled(cancel, ItemStage::Publishing, self.ledger.submit(&signed))
            .await?
            .map_err(|e| ItemFailure::new(ItemStage::Publishing, e))?;

        if !status.is_success() {
            return Err(ItemFailure::new(
                ItemStage::Publishing,
                PublishError::Status {
                    code: status.code,
                    body: status.detail,
                },
            ));
        }

        Ok(PublishedRef {
            url: self.config.url_for(&signed.id),
            id: signed.id,
        })
    }

    fn emit(&self, event: ItemEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }
}

fn checkpoint(cancel: &CancelToken, next: ItemStage) -> Result<(), ItemFailure> {
    if cancel.is_cancelled() {
        Err(ItemFailure::new(next, ItemError::Cancelled))
    } else {
        Ok(())
    }
}

/// Await `work` unless the batch is cancelled first; the abandoned call is
/// dropped.
async fn until_cancelled<T>(
    cancel: &CancelToken,
    stage: ItemStage,
    work: impl Future<Output = T>,
) -> Result<T, ItemFailure> {
    let cancelled = cancel.cancelled();
    pin_mut!(work);
    match select(work, cancelled).await {
        Either::Left((value, _)) => Ok(value),
        Either::Right(_) => Err(ItemFailure::new(stage, ItemError::Cancelled)),
    }
}

/// Puts the orchestrator back to Idle however the batch future ends,
/// including when it is dropped mid-flight.
struct SubmittingGuard<'a> {
    state: &'a Cell<UploadState>,
}

impl<'a> SubmittingGuard<'a> {
    fn enter(state: &'a Cell<UploadState>) -> Self {
        state.set(UploadState::Submitting);
        Self { state }
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(UploadState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, SignError};
    use crate::testing::{CountingPreviews, MemoryFile, MemoryLedger, MemoryWallet};
    use std::rc::Rc;

    fn orchestrator(wallet: MemoryWallet, ledger: MemoryLedger) -> UploadOrchestrator<MemoryWallet, MemoryLedger> {
        UploadOrchestrator::new(wallet, ledger, GalleryConfig::default())
    }

    fn files() -> Vec<MemoryFile> {
        vec![
            MemoryFile::new("a.png", vec![1; 2048]),
            MemoryFile::new("b.jpg", vec![2; 3072]),
        ]
    }

    #[tokio::test]
    async fn test_skips_when_nothing_staged() {
        let orch = orchestrator(MemoryWallet::connected("addr"), MemoryLedger::new());
        let outcome = orch.publish::<MemoryFile>(&[]).await;
        assert_eq!(outcome, SubmitOutcome::Skipped(SkipReason::NothingStaged));
        assert_eq!(orch.wallet().signatures(), 0);
    }

    #[tokio::test]
    async fn test_skips_when_not_connected() {
        let orch = orchestrator(MemoryWallet::disconnected(), MemoryLedger::new());
        let outcome = orch.publish(&files()).await;
        assert_eq!(outcome, SubmitOutcome::Skipped(SkipReason::NotConnected));
        assert!(!orch.can_submit(2));
        assert!(orch.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_publishes_every_file() {
        let orch = orchestrator(MemoryWallet::connected("addr"), MemoryLedger::new());
        assert!(orch.can_submit(2));

        let outcome = orch.publish(&files()).await;
        let SubmitOutcome::Settled(report) = &outcome else {
            panic!("expected settled batch, got {:?}", outcome);
        };

        assert_eq!(report.identity, "addr");
        assert_eq!(report.published().len(), 2);
        assert_eq!(report.failed_count(), 0);
        assert_eq!(orch.ledger().len(), 2);
        assert_eq!(orch.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_build_failure_is_contained() {
        let orch = orchestrator(MemoryWallet::connected("addr"), MemoryLedger::new());
        let batch = vec![
            MemoryFile::new("a.png", vec![1]).failing("removed from disk"),
            MemoryFile::new("b.png", vec![2]),
        ];

        let outcome = orch.publish(&batch).await;
        let SubmitOutcome::Settled(report) = &outcome else {
            panic!("expected settled batch");
        };

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "a.png");
        assert_eq!(failures[0].1.stage, ItemStage::Building);
        assert_eq!(
            failures[0].1.error,
            ItemError::Build(BuildError::read("a.png", "removed from disk"))
        );
        assert_eq!(report.published().len(), 1);
        // the failed build never reached the wallet
        assert_eq!(orch.wallet().signatures(), 1);
    }

    #[tokio::test]
    async fn test_rejected_status_is_not_recorded() {
        let ledger = MemoryLedger::new().reject_with(400);
        let orch = orchestrator(MemoryWallet::connected("addr"), ledger);

        let outcome = orch.publish(&files()).await;
        let SubmitOutcome::Settled(report) = &outcome else {
            panic!("expected settled batch");
        };

        assert!(report.published().is_empty());
        assert_eq!(report.failed_count(), 2);
        assert!(matches!(
            report.failures()[0].1.error,
            ItemError::Publish(PublishError::Status { code: 400, .. })
        ));
        let notification = outcome.notification().unwrap();
        assert_eq!(notification.level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_identity_failure_keeps_staging() {
        let wallet = MemoryWallet::connected("addr").failing_identity();
        let orch = orchestrator(wallet, MemoryLedger::new());
        let mut staging = StagingStore::new(CountingPreviews::default());
        staging.add(files());

        let outcome = orch.submit(&mut staging).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                error: OrchestrationError::Identity(SignError::Wallet("identity unavailable".into())),
                partial: None,
            }
        );
        assert_eq!(staging.len(), 2);
        assert_eq!(outcome.notification().unwrap().level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_cancel_before_signing() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let seen = events.clone();
        let orch = Rc::new(
            orchestrator(MemoryWallet::connected("addr"), MemoryLedger::new())
                .with_observer(move |event| seen.borrow_mut().push(event.clone())),
        );

        // The first read cancels the batch, as a user click would mid-flight.
        let handle = orch.clone();
        let cancelling = MemoryFile::new("a.png", vec![1]).on_read(move || handle.cancel());

        let mut staging = StagingStore::new(CountingPreviews::default());
        staging.add(vec![cancelling, MemoryFile::new("b.png", vec![2])]);

        let outcome = orch.submit(&mut staging).await;
        let SubmitOutcome::Failed { error, partial } = &outcome else {
            panic!("expected cancelled batch, got {:?}", outcome);
        };

        assert_eq!(*error, OrchestrationError::Cancelled);
        let partial = partial.as_ref().unwrap();
        assert_eq!(partial.failed_count(), 2);
        assert!(partial
            .failures()
            .iter()
            .all(|(_, f)| f.error == ItemError::Cancelled && f.stage == ItemStage::Signing));
        assert_eq!(staging.len(), 2);
        assert_eq!(orch.wallet().signatures(), 0);
        assert!(events.borrow().iter().any(|e| e.stage == ItemStage::Failed));
        assert_eq!(orch.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_observer_sees_each_stage() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let seen = events.clone();
        let orch = orchestrator(MemoryWallet::connected("addr"), MemoryLedger::new())
            .with_observer(move |event| seen.borrow_mut().push(event.stage));

        orch.publish(&[MemoryFile::new("a.png", vec![1])]).await;

        assert_eq!(
            *events.borrow(),
            vec![
                ItemStage::Building,
                ItemStage::Signing,
                ItemStage::Publishing,
                ItemStage::Done
            ]
        );
    }
}
