//! Canonical job status taxonomy.
//!
//! Runtime services report status in their own vocabulary (`JobStatus.DONE`,
//! `queued`, `Cancelled`, ...). Statuses are normalized to the upper-cased
//! text after the last `.` and classified into disjoint sets:
//!
//! ```text
//!   in-progress: INITIALIZING QUEUED RUNNING VALIDATING
//!   failed:      ERROR FAILED CANCELLED CANCELED
//!   completed:   DONE COMPLETED SUCCESS
//!   unknown:     everything else
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

const IN_PROGRESS: &[&str] = &["INITIALIZING", "QUEUED", "RUNNING", "VALIDATING"];
const FAILED: &[&str] = &["ERROR", "FAILED", "CANCELLED", "CANCELED"];
const COMPLETED: &[&str] = &["DONE", "COMPLETED", "SUCCESS"];

/// Classification of a normalized status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// Queued or executing.
    InProgress,
    /// Terminal failure, including cancellation.
    Failed,
    /// Terminal success.
    Completed,
    /// Not recognized.
    Unknown,
}

/// A normalized, upper-case job status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStatus(String);

impl JobStatus {
    /// Status of a completed, formatted result.
    pub const COMPLETED: &'static str = "COMPLETED";
    /// Placeholder for an unknown status right after submission.
    pub const SUBMITTED: &'static str = "SUBMITTED";
    /// Placeholder for an unknown status right after cancellation.
    pub const CANCEL_REQUESTED: &'static str = "CANCEL_REQUESTED";
    /// Status that could not be read.
    pub const UNKNOWN: &'static str = "UNKNOWN";

    /// Normalize a raw status string.
    pub fn normalize(raw: &str) -> Self {
        let tail = raw.rsplit('.').next().unwrap_or_default().trim();
        if tail.is_empty() {
            Self::unknown()
        } else {
            Self(tail.to_uppercase())
        }
    }

    /// The `UNKNOWN` status.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    /// The `COMPLETED` status.
    pub fn completed() -> Self {
        Self(Self::COMPLETED.to_string())
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the status.
    pub fn class(&self) -> StatusClass {
        let s = self.0.as_str();
        if IN_PROGRESS.contains(&s) {
            StatusClass::InProgress
        } else if FAILED.contains(&s) {
            StatusClass::Failed
        } else if COMPLETED.contains(&s) {
            StatusClass::Completed
        } else {
            StatusClass::Unknown
        }
    }

    /// Whether the status is literally `UNKNOWN`.
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Replace a literal `UNKNOWN` with `placeholder`.
    pub fn or_placeholder(self, placeholder: &str) -> Self {
        if self.is_unknown() {
            Self(placeholder.to_string())
        } else {
            self
        }
    }

    /// Whether the status is terminal (failed or completed).
    pub fn is_terminal(&self) -> bool {
        matches!(self.class(), StatusClass::Failed | StatusClass::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_enum_prefix() {
        assert_eq!(JobStatus::normalize("JobStatus.DONE").as_str(), "DONE");
        assert_eq!(JobStatus::normalize("queued").as_str(), "QUEUED");
        assert_eq!(JobStatus::normalize("").as_str(), "UNKNOWN");
        assert_eq!(JobStatus::normalize("Status.").as_str(), "UNKNOWN");
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(JobStatus::normalize("Running").class(), StatusClass::InProgress);
        assert_eq!(JobStatus::normalize("canceled").class(), StatusClass::Failed);
        assert_eq!(JobStatus::normalize("Cancelled").class(), StatusClass::Failed);
        assert_eq!(JobStatus::normalize("success").class(), StatusClass::Completed);
        assert_eq!(JobStatus::normalize("ARCHIVED").class(), StatusClass::Unknown);
    }

    #[test]
    fn test_placeholder_replaces_only_unknown() {
        assert_eq!(
            JobStatus::unknown().or_placeholder(JobStatus::SUBMITTED).as_str(),
            "SUBMITTED"
        );
        assert_eq!(
            JobStatus::normalize("QUEUED")
                .or_placeholder(JobStatus::SUBMITTED)
                .as_str(),
            "QUEUED"
        );
    }

    #[test]
    fn test_terminal() {
        assert!(JobStatus::normalize("ERROR").is_terminal());
        assert!(JobStatus::completed().is_terminal());
        assert!(!JobStatus::normalize("VALIDATING").is_terminal());
    }
}
