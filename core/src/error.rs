//! Error types for the gallery upload pipeline.
//!
//! Errors are split by the stage that produces them:
//!
//! - [`BuildError`] - Reading a staged file into a publish unit
//! - [`SignError`] - Wallet signature or identity lookup
//! - [`PublishError`] - Submitting a signed unit to the gateway
//! - [`ItemError`] - Any per-item failure inside a batch
//! - [`OrchestrationError`] - Batch-level failures surfaced to the user
//! - [`QueryError`] - Gallery lookups
//! - [`ConfigError`] - Environment configuration
//! - [`ServerError`] - Static file server
//!
//! Per-item errors never escape a batch; they are converted into
//! [`ItemError`] with `From` so the pipeline can use `?` on each step.

use thiserror::Error;

// =============================================================================
// Build Errors
// =============================================================================

/// Errors while turning a staged file into a publish unit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The file bytes could not be read (removed from disk, revoked blob, ...).
    #[error("Failed to read '{name}': {reason}")]
    Read { name: String, reason: String },
}

impl BuildError {
    /// Build a read error for a named file.
    pub fn read(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Sign Errors
// =============================================================================

/// Errors from the wallet capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignError {
    /// No identity is connected.
    #[error("No wallet connected")]
    NotConnected,

    /// The user declined the signature prompt.
    #[error("Signature rejected: {0}")]
    Rejected(String),

    /// The wallet extension failed.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

// =============================================================================
// Publish Errors
// =============================================================================

/// Errors while submitting a signed unit to the ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    /// The gateway answered with a non-success status.
    #[error("Gateway rejected transaction ({code}): {body}")]
    Status { code: u16, body: String },

    /// The request never got an answer.
    #[error("Network error: {0}")]
    Network(String),

    /// The signed envelope could not be encoded.
    #[error("Failed to encode transaction: {0}")]
    Encode(String),
}

// =============================================================================
// Per-item Errors
// =============================================================================

/// A failure contained to one item of a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    #[error("Sign failed: {0}")]
    Sign(#[from] SignError),

    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),

    /// The batch was cancelled before this item finished.
    #[error("Cancelled")]
    Cancelled,
}

// =============================================================================
// Orchestration Errors (surfaced to the user)
// =============================================================================

/// Batch-level errors.
///
/// Unlike [`ItemError`], these are shown to the user and leave the staged
/// files in place so the batch can be retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrchestrationError {
    /// The active identity could not be resolved at submit time.
    #[error("Could not resolve active address: {0}")]
    Identity(#[from] SignError),

    /// The user cancelled the batch.
    #[error("Upload cancelled")]
    Cancelled,
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors while querying previously published units.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway returned status {0}")]
    Status(u16),

    #[error("Invalid GraphQL response: {0}")]
    Decode(String),

    #[error("GraphQL error: {0}")]
    Graphql(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid environment configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

// =============================================================================
// Server Errors
// =============================================================================

/// Errors from the static file server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServerError {
    /// The build output directory does not exist.
    #[error("Frontend build not found at '{0}' (run `trunk build` in frontend/)")]
    MissingDist(String),

    /// The listener could not bind.
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// The server stopped with an error.
    #[error("Server error: {0}")]
    Serve(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Result type for wallet operations.
pub type SignResult<T> = Result<T, SignError>;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Result type for gallery queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for the static server.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_error_conversion() {
        let item: ItemError = BuildError::read("a.png", "revoked").into();
        assert!(item.to_string().contains("a.png"));

        let item: ItemError = SignError::Rejected("user closed popup".into()).into();
        assert!(item.to_string().contains("user closed popup"));

        let item: ItemError = PublishError::Status { code: 400, body: "bad".into() }.into();
        assert!(item.to_string().contains("400"));
    }

    #[test]
    fn test_identity_error_format() {
        let err: OrchestrationError = SignError::NotConnected.into();
        assert_eq!(err.to_string(), "Could not resolve active address: No wallet connected");
    }
}
