//! Batch results and user notifications.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::error::{ItemError, OrchestrationError};
use crate::models::PublishedRef;

// =============================================================================
// Per-item
// =============================================================================

/// Where an item is in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStage {
    Building,
    Signing,
    Publishing,
    Done,
    Failed,
}

impl fmt::Display for ItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemStage::Building => "building",
            ItemStage::Signing => "signing",
            ItemStage::Publishing => "publishing",
            ItemStage::Done => "done",
            ItemStage::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Stage transition reported to the progress observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEvent {
    pub name: String,
    pub stage: ItemStage,
    /// Failure text, set on [`ItemStage::Failed`] only.
    pub detail: Option<String>,
}

impl ItemEvent {
    pub fn new(name: impl Into<String>, stage: ItemStage) -> Self {
        Self {
            name: name.into(),
            stage,
            detail: None,
        }
    }

    pub fn failed(name: impl Into<String>, failure: &ItemFailure) -> Self {
        Self {
            detail: Some(failure.to_string()),
            ..Self::new(name, ItemStage::Failed)
        }
    }
}

/// Why an item did not publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Stage that failed.
    pub stage: ItemStage,
    pub error: ItemError,
}

impl ItemFailure {
    pub fn new(stage: ItemStage, error: impl Into<ItemError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed while {}: {}", self.stage, self.error)
    }
}

/// Final result of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub name: String,
    pub result: Result<PublishedRef, ItemFailure>,
}

// =============================================================================
// Batch
// =============================================================================

/// Everything that happened in one settled batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub batch_id: Uuid,
    /// Address the batch was published as.
    pub identity: String,
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Refs of the items that published.
    pub fn published(&self) -> Vec<PublishedRef> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().cloned())
            .collect()
    }

    /// `(name, failure)` of the items that did not.
    pub fn failures(&self) -> Vec<(&str, &ItemFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
            .collect()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Why a submit did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NothingStaged,
    NotConnected,
    AlreadySubmitting,
}

/// Result of a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Preconditions failed; nothing ran.
    Skipped(SkipReason),
    /// Every item settled, whatever its individual result.
    Settled(BatchReport),
    /// A batch-level error; staging must be kept for retry.
    Failed {
        error: OrchestrationError,
        /// Items that ran before the batch failed, if any.
        partial: Option<BatchReport>,
    },
}

impl SubmitOutcome {
    /// Only a settled batch clears the staged files.
    pub fn clears_staging(&self) -> bool {
        matches!(self, SubmitOutcome::Settled(_))
    }

    /// Refs to add to the gallery, including those of a cancelled batch.
    pub fn published(&self) -> Vec<PublishedRef> {
        match self {
            SubmitOutcome::Settled(report) => report.published(),
            SubmitOutcome::Failed {
                partial: Some(report),
                ..
            } => report.published(),
            _ => Vec::new(),
        }
    }

    /// Notification to show, `None` for skipped submits.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmitOutcome::Skipped(_) => None,
            SubmitOutcome::Settled(report) => Some(Notification::success(report)),
            SubmitOutcome::Failed { error, .. } => Some(Notification::error(error.to_string())),
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Toast shown once a batch settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Success is reported for any settled batch, even with failed items;
    /// the failure count is appended to the description.
    pub fn success(report: &BatchReport) -> Self {
        let failed = report.failed_count();
        let description = if failed == 0 {
            "Uploaded successfully.".to_string()
        } else {
            format!(
                "Uploaded successfully. {} of {} file(s) failed.",
                failed,
                report.total()
            )
        };

        Self {
            level: NotificationLevel::Success,
            title: "Success".to_string(),
            description,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignError;
    use crate::models::ContentId;

    fn report(failures: usize) -> BatchReport {
        let mut outcomes = vec![ItemOutcome {
            name: "ok.png".into(),
            result: Ok(PublishedRef {
                id: ContentId::new("id1"),
                url: "https://arweave.net/id1".into(),
            }),
        }];
        for i in 0..failures {
            outcomes.push(ItemOutcome {
                name: format!("bad{}.png", i),
                result: Err(ItemFailure::new(ItemStage::Signing, SignError::NotConnected)),
            });
        }
        BatchReport {
            batch_id: Uuid::new_v4(),
            identity: "addr".into(),
            outcomes,
        }
    }

    #[test]
    fn test_success_notification_mentions_failures() {
        let clean = Notification::success(&report(0));
        assert_eq!(clean.level, NotificationLevel::Success);
        assert_eq!(clean.description, "Uploaded successfully.");

        let partial = Notification::success(&report(2));
        assert_eq!(partial.level, NotificationLevel::Success);
        assert!(partial.description.contains("2 of 3"));
    }

    #[test]
    fn test_outcome_helpers() {
        let settled = SubmitOutcome::Settled(report(1));
        assert!(settled.clears_staging());
        assert_eq!(settled.published().len(), 1);

        let failed = SubmitOutcome::Failed {
            error: OrchestrationError::Cancelled,
            partial: Some(report(1)),
        };
        assert!(!failed.clears_staging());
        assert_eq!(failed.published().len(), 1);
        assert_eq!(failed.notification().unwrap().level, NotificationLevel::Error);

        assert!(SubmitOutcome::Skipped(SkipReason::NotConnected).notification().is_none());
    }

    #[test]
    fn test_failure_display() {
        let failure = ItemFailure::new(ItemStage::Publishing, crate::error::ItemError::Cancelled);
        assert_eq!(failure.to_string(), "failed while publishing: Cancelled");
    }
}
