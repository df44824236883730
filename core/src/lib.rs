//! # Arweave Gallery - publish images from a browser wallet
//!
//! Stages image files, tags them, has the user's wallet sign one transaction
//! per file, posts them to an Arweave gateway, and lists the images an
//! address published earlier.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Staging   │────▶│   Builder   │────▶│   Wallet    │────▶│   Ledger    │
//! │ (previews)  │     │   (tags)    │     │   (sign)    │     │   (post)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        ▲                  └────────── UploadOrchestrator ──────────┘
//!        │                                                           │
//!     browser                  GalleryLoader ◀── GraphQL query ──────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gallery::{GalleryConfig, StagingStore, UploadOrchestrator};
//! use gallery::testing::{CountingPreviews, MemoryFile, MemoryLedger, MemoryWallet};
//!
//! let orch = UploadOrchestrator::new(
//!     MemoryWallet::connected("addr"),
//!     MemoryLedger::new(),
//!     GalleryConfig::default(),
//! );
//! let mut staging = StagingStore::new(CountingPreviews::default());
//! staging.add(vec![MemoryFile::new("cat.png", bytes)]);
//! let outcome = orch.submit(&mut staging).await;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per pipeline stage
//! - [`config`] - Constants and environment configuration
//! - [`models`] - Tags, units, ids and queries
//! - [`mime`] - Content type resolution
//! - [`staging`] - Selected files and preview handles
//! - [`builder`] - File to tagged unit
//! - [`wallet`] - Signing capability
//! - [`ledger`] - Gateway submit and query
//! - [`upload`] - Batch orchestration
//! - [`gallery`] - Published images per address
//! - [`logs`] - Activity entries and console logger
//! - [`testing`] - In-memory capabilities

// Core modules
pub mod config;
pub mod error;
pub mod models;
pub mod mime;

// Pipeline
pub mod builder;
pub mod ledger;
pub mod staging;
pub mod upload;
pub mod wallet;

// Gallery
pub mod gallery;

// Logging
pub mod logs;

// Test doubles
pub mod testing;

// HTTP server
#[cfg(feature = "native")]
pub mod server;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BuildError, ConfigError, ItemError, OrchestrationError, PublishError, QueryError, ServerError,
    SignError,
};

// =============================================================================
// Re-exports - Configuration & Models
// =============================================================================

pub use config::{GalleryConfig, APP_NAME, GATEWAY_URL, NOTIFICATION_MS};

pub use models::{
    ContentId, PublishUnit, PublishedRef, SignedUnit, SubmitStatus, Tag, TagQuery,
    TAG_APP_NAME, TAG_CONTENT_TYPE,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use builder::TransactionBuilder;
pub use ledger::LedgerClient;
pub use staging::{FileSource, PreviewAllocator, PreviewHandle, StageReport, StagedFile, StagingStore};
pub use upload::{
    BatchReport, CancelToken, ItemEvent, ItemFailure, ItemOutcome, ItemStage, Notification,
    NotificationLevel, SkipReason, SubmitOutcome, UploadOrchestrator, UploadState,
};
pub use wallet::Wallet;

#[cfg(feature = "gateway")]
pub use ledger::GatewayClient;

#[cfg(feature = "native")]
pub use staging::{DiskFile, PathPreviews};

// =============================================================================
// Re-exports - Gallery & Logs
// =============================================================================

pub use gallery::{Gallery, GalleryLoader};
pub use logs::{LogEntry, LogLevel};
