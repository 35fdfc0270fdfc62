use crate::config::Config;
use crate::jobs::JobManager;
use validator::Validate;

use crate::validation::{
    validate_book_id, validate_export_kind, validate_import_kind, validate_source_url,
};

#[derive(Clone)]
pub struct AppState {
    pub jobs: JobManager,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let jobs = JobManager::new(config.jobs.delays());
        Self { jobs, config }
    }
}

// API Request/Response types
//
// Request fields accept any JSON value. Absent, null, empty and non-string
// values all reach the validator, which reports every broken rule at once.

/// A request field as it arrived on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum TextField {
    /// Absent or `null`.
    #[default]
    Missing,
    Text(String),
    /// A number, boolean, array or object.
    NotText,
}

impl TextField {
    /// The value when it is a non-empty string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TextField::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            TextField::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for TextField {
    fn from(text: &str) -> Self {
        TextField::Text(text.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for TextField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => TextField::Missing,
            Some(Raw::Text(text)) => TextField::Text(text),
            Some(Raw::Other(_)) => TextField::NotText,
        })
    }
}

#[derive(Debug, Default, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportJobRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_book_id"))]
    pub book_id: TextField,
    #[serde(default, alias = "type")]
    #[validate(custom(function = "validate_export_kind"))]
    pub kind: TextField,
}

#[derive(Debug, Default, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateImportJobRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_book_id"))]
    pub book_id: TextField,
    #[serde(default, alias = "type")]
    #[validate(custom(function = "validate_import_kind"))]
    pub kind: TextField,
    #[serde(default, alias = "url")]
    #[validate(custom(function = "validate_source_url"))]
    pub source_url: TextField,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
