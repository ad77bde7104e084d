//! Job application records and their validation rules.
//!
//! A [`Job`] always belongs to exactly one [`UserId`]. Every read and write
//! path takes the owner alongside the job identifier, so ownership is part of
//! the lookup key rather than a check applied afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;

/// Maximum number of characters in a company name.
pub const COMPANY_MAX: usize = 50;
/// Maximum number of characters in a position title.
pub const POSITION_MAX: usize = 100;

/// Identifier of a stored job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Progress of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// An interview has been offered or scheduled.
    Interview,
    /// The application was turned down.
    Declined,
    /// Waiting to hear back.
    Pending,
}

impl JobStatus {
    /// All statuses in the order they are offered to users.
    pub const ALL: [Self; 3] = [Self::Interview, Self::Declined, Self::Pending];

    /// Lowercase storage and form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Declined => "declined",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(JobValidationError::UnknownStatus)
    }
}

/// Reasons a job form submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    /// At least one field was blank.
    MissingFields,
    /// Company exceeded [`COMPANY_MAX`].
    CompanyTooLong {
        /// Permitted maximum length.
        max: usize,
    },
    /// Position exceeded [`POSITION_MAX`].
    PositionTooLong {
        /// Permitted maximum length.
        max: usize,
    },
    /// Status was not one of [`JobStatus::ALL`].
    UnknownStatus,
}

impl fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "All fields are required"),
            Self::CompanyTooLong { max } => {
                write!(f, "Company must be at most {max} characters")
            }
            Self::PositionTooLong { max } => {
                write!(f, "Position must be at most {max} characters")
            }
            Self::UnknownStatus => {
                write!(f, "Status must be one of interview, declined, pending")
            }
        }
    }
}

impl std::error::Error for JobValidationError {}

/// Validated job fields, ready to be created or applied as an update.
///
/// # Examples
/// ```
/// use jobs_tracker::domain::{JobDraft, JobStatus};
///
/// let draft = JobDraft::try_from_parts(" Acme ", "Engineer", "pending").unwrap();
/// assert_eq!(draft.company, "Acme");
/// assert_eq!(draft.status, JobStatus::Pending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    /// Trimmed company name.
    pub company: String,
    /// Trimmed position title.
    pub position: String,
    /// Application status.
    pub status: JobStatus,
}

impl JobDraft {
    /// Trim and validate raw form values.
    ///
    /// Missing fields are reported before length or status problems, so a
    /// form with any blank value always yields
    /// [`JobValidationError::MissingFields`].
    pub fn try_from_parts(
        company: &str,
        position: &str,
        status: &str,
    ) -> Result<Self, JobValidationError> {
        let [company_text, position_text, status_text] =
            [company, position, status].map(str::trim);
        if company_text.is_empty() || position_text.is_empty() || status_text.is_empty() {
            return Err(JobValidationError::MissingFields);
        }
        if company_text.chars().count() > COMPANY_MAX {
            return Err(JobValidationError::CompanyTooLong { max: COMPANY_MAX });
        }
        if position_text.chars().count() > POSITION_MAX {
            return Err(JobValidationError::PositionTooLong { max: POSITION_MAX });
        }
        Ok(Self {
            company: company_text.to_owned(),
            position: position_text.to_owned(),
            status: status_text.parse()?,
        })
    }
}

/// Stored job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Stable identifier.
    pub id: JobId,
    /// The only user allowed to see or change this job.
    pub owner: UserId,
    /// Company applied to.
    pub company: String,
    /// Position applied for.
    pub position: String,
    /// Current status.
    pub status: JobStatus,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Build a new job for `owner` from a validated draft.
    #[must_use]
    pub fn create(owner: UserId, draft: JobDraft, now: DateTime<Utc>) -> Self {
        let JobDraft {
            company,
            position,
            status,
        } = draft;
        Self {
            id: JobId::random(),
            owner,
            company,
            position,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update draft, refreshing the modification time.
    pub fn apply(&mut self, draft: JobDraft, now: DateTime<Utc>) {
        self.company = draft.company;
        self.position = draft.position;
        self.status = draft.status;
        self.updated_at = now;
    }
}
