use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Lifecycle state of a job. Ordered so grouped listings put `pending` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Finished,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Finished => write!(f, "finished"),
        }
    }
}

/// Which creation path a job came through. `pdf` exists in both families,
/// so the family is never inferred from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobFamily {
    Export,
    Import,
}

impl std::fmt::Display for JobFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobFamily::Export => write!(f, "export"),
            JobFamily::Import => write!(f, "import"),
        }
    }
}

/// Implemented by the kind enumerations of each family.
pub trait JobKind:
    Copy + std::fmt::Debug + std::fmt::Display + Serialize + Send + Sync + 'static
{
    const FAMILY: JobFamily;
}

/// Output formats a book can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Epub,
    Pdf,
}

impl ExportKind {
    pub const ALL: [ExportKind; 2] = [ExportKind::Epub, ExportKind::Pdf];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "epub" => Some(ExportKind::Epub),
            "pdf" => Some(ExportKind::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Epub => write!(f, "epub"),
            ExportKind::Pdf => write!(f, "pdf"),
        }
    }
}

impl JobKind for ExportKind {
    const FAMILY: JobFamily = JobFamily::Export;
}

/// Sources a book can be imported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Word,
    Pdf,
    Wattpad,
    Evernote,
}

impl ImportKind {
    pub const ALL: [ImportKind; 4] = [
        ImportKind::Word,
        ImportKind::Pdf,
        ImportKind::Wattpad,
        ImportKind::Evernote,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "word" => Some(ImportKind::Word),
            "pdf" => Some(ImportKind::Pdf),
            "wattpad" => Some(ImportKind::Wattpad),
            "evernote" => Some(ImportKind::Evernote),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportKind::Word => write!(f, "word"),
            ImportKind::Pdf => write!(f, "pdf"),
            ImportKind::Wattpad => write!(f, "wattpad"),
            ImportKind::Evernote => write!(f, "evernote"),
        }
    }
}

impl JobKind for ImportKind {
    const FAMILY: JobFamily = JobFamily::Import;
}

/// A tracked conversion job.
///
/// Build instances through [`ExportJob::new_export`] or
/// [`ImportJob::new_import`]; they guarantee that only import jobs carry a
/// source URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job<K> {
    pub id: Uuid,
    pub book_id: String,
    pub kind: K,
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type ExportJob = Job<ExportKind>;
pub type ImportJob = Job<ImportKind>;

impl Job<ExportKind> {
    pub fn new_export(book_id: String, kind: ExportKind, now: DateTime<Utc>) -> Self {
        Self::pending(book_id, kind, None, now)
    }
}

impl Job<ImportKind> {
    pub fn new_import(
        book_id: String,
        kind: ImportKind,
        source_url: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self::pending(book_id, kind, Some(source_url), now)
    }
}

impl<K> Job<K> {
    fn pending(book_id: String, kind: K, source_url: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            kind,
            state: JobState::Pending,
            source_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == JobState::Pending
    }

    /// Moves a pending job to `finished`. Returns `false` (and leaves the job
    /// untouched) if it already finished.
    ///
    /// `updated_at` always moves forward, even if `at` is not later than the
    /// previous update.
    pub fn finish(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_pending() {
            return false;
        }

        self.state = JobState::Finished;
        self.updated_at = if at > self.updated_at {
            at
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
        true
    }
}

/// Simulated processing time per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobDelays {
    pub epub: Duration,
    pub export_pdf: Duration,
    pub import: Duration,
}

impl JobDelays {
    pub fn for_export(&self, kind: ExportKind) -> Duration {
        match kind {
            ExportKind::Epub => self.epub,
            ExportKind::Pdf => self.export_pdf,
        }
    }

    /// Every import kind takes the same time.
    pub fn for_import(&self, _kind: ImportKind) -> Duration {
        self.import
    }
}

impl Default for JobDelays {
    fn default() -> Self {
        Self {
            epub: Duration::from_secs(10),
            export_pdf: Duration::from_secs(25),
            import: Duration::from_secs(60),
        }
    }
}
