//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Staging Types** - Thumbnails of selected files
//! - **Log Types** - Activity panel entries (shared with the core crate)
//! - **Toast Types** - Batch notifications
//! - **Error Types** - Frontend error handling

use std::fmt;

pub use gallery::{LogEntry, LogLevel, Notification, NotificationLevel};

// =============================================================================
// Staging Types
// =============================================================================

/// Thumbnail of a staged file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedPreview {
    pub name: String,
    /// Object URL, valid until the file is unstaged.
    pub url: String,
    /// Human readable size.
    pub size: String,
}

// =============================================================================
// Log Types
// =============================================================================

/// CSS class for a log level.
pub fn level_class(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "log-info",
        LogLevel::Success => "log-success",
        LogLevel::Warning => "log-warning",
        LogLevel::Error => "log-error",
    }
}

// =============================================================================
// Toast Types
// =============================================================================

/// A notification on screen. `seq` identifies it so a dismiss timer never
/// hides a newer toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub seq: u32,
    pub notification: Notification,
}

impl Toast {
    pub fn css_class(&self) -> &'static str {
        match self.notification.level {
            NotificationLevel::Success => "toast toast-success",
            NotificationLevel::Error => "toast toast-error",
        }
    }
}

// =============================================================================
// Wallet Types
// =============================================================================

/// `abcdef...wxyz` form of an address.
pub fn short_address(address: &str) -> String {
    if address.chars().count() <= 12 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}...{}", head, tail)
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    /// No wallet extension in this browser.
    NoWallet,
    /// Wallet connection failed.
    Wallet(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoWallet => write!(f, "No Arweave wallet found. Please install ArConnect or Wander."),
            AppError::Wallet(msg) => write!(f, "Wallet error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
