//! Request validation
//!
//! Field rules live on the request DTOs in [`crate::models`]. This module holds
//! the custom rules and folds `validator` output into the flat error list the
//! API returns. Every message starts with the wire name of its field, which
//! keeps the sorted list in `bookId`, `kind`, `sourceUrl` order.

use std::borrow::Cow;
use validator::{Validate, ValidateUrl, ValidationError, ValidationErrors};

use crate::jobs::{ExportKind, ImportKind};
use crate::models::{CreateExportJobRequest, CreateImportJobRequest, TextField};
use crate::types::{AppError, AppResult};

fn rule(code: &'static str, message: String) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message))
}

fn one_of<K: std::fmt::Display>(kinds: &[K]) -> String {
    kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// The field's text, or the `required` / `must be a string` violation.
fn required_text<'a>(field: &'a TextField, name: &str) -> Result<&'a str, ValidationError> {
    match field {
        TextField::NotText => Err(rule("type", format!("{} must be a string", name))),
        _ => field
            .as_text()
            .ok_or_else(|| rule("required", format!("{} is required", name))),
    }
}

pub fn validate_book_id(book_id: &TextField) -> Result<(), ValidationError> {
    required_text(book_id, "bookId").map(|_| ())
}

pub fn validate_export_kind(kind: &TextField) -> Result<(), ValidationError> {
    let kind = required_text(kind, "kind")?;
    match ExportKind::from_id(kind) {
        Some(_) => Ok(()),
        None => Err(rule(
            "kind",
            format!("kind must be one of: {}", one_of(&ExportKind::ALL)),
        )),
    }
}

pub fn validate_import_kind(kind: &TextField) -> Result<(), ValidationError> {
    let kind = required_text(kind, "kind")?;
    match ImportKind::from_id(kind) {
        Some(_) => Ok(()),
        None => Err(rule(
            "kind",
            format!("kind must be one of: {}", one_of(&ImportKind::ALL)),
        )),
    }
}

pub fn validate_source_url(source_url: &TextField) -> Result<(), ValidationError> {
    let source_url = required_text(source_url, "sourceUrl")?;
    if !source_url.validate_url() {
        return Err(rule("url", "sourceUrl must be a valid URL".to_string()));
    }
    Ok(())
}

/// Flattens `validator` output into sorted, human readable messages.
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages
}

fn check<T: Validate>(request: &T) -> AppResult<()> {
    request
        .validate()
        .map_err(|errors| AppError::Validation(error_messages(&errors)))
}

fn unchecked(field: &str) -> AppError {
    AppError::Internal(format!("{} passed validation but is not usable", field))
}

impl CreateExportJobRequest {
    /// Validates the request and returns the fields the job manager needs.
    pub fn into_parts(self) -> AppResult<(String, ExportKind)> {
        check(&self)?;
        let kind = self
            .kind
            .as_text()
            .and_then(ExportKind::from_id)
            .ok_or_else(|| unchecked("kind"))?;
        let book_id = self.book_id.into_text().ok_or_else(|| unchecked("bookId"))?;
        Ok((book_id, kind))
    }
}

impl CreateImportJobRequest {
    pub fn into_parts(self) -> AppResult<(String, ImportKind, String)> {
        check(&self)?;
        let kind = self
            .kind
            .as_text()
            .and_then(ImportKind::from_id)
            .ok_or_else(|| unchecked("kind"))?;
        let book_id = self.book_id.into_text().ok_or_else(|| unchecked("bookId"))?;
        let source_url = self
            .source_url
            .into_text()
            .ok_or_else(|| unchecked("sourceUrl"))?;
        Ok((book_id, kind, source_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of(result: AppResult<impl std::fmt::Debug>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_export_request() {
        let request = CreateExportJobRequest {
            book_id: "b1".into(),
            kind: "epub".into(),
        };
        let (book_id, kind) = request.into_parts().unwrap();
        assert_eq!(book_id, "b1");
        assert_eq!(kind, ExportKind::Epub);
    }

    #[test]
    fn test_export_rejects_import_only_kind() {
        let request = CreateExportJobRequest {
            book_id: "b1".into(),
            kind: "word".into(),
        };
        assert_eq!(
            errors_of(request.into_parts()),
            vec!["kind must be one of: epub, pdf".to_string()]
        );
    }

    #[test]
    fn test_empty_export_request_lists_both_fields() {
        let errors = errors_of(CreateExportJobRequest::default().into_parts());
        assert_eq!(errors, vec!["bookId is required", "kind is required"]);
    }

    #[test]
    fn test_invalid_import_request_lists_every_field() {
        let request = CreateImportJobRequest {
            book_id: "".into(),
            kind: "bogus".into(),
            source_url: "".into(),
        };
        let errors = errors_of(request.into_parts());

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], "bookId is required");
        assert_eq!(errors[1], "kind must be one of: word, pdf, wattpad, evernote");
        assert_eq!(errors[2], "sourceUrl is required");
    }

    #[test]
    fn test_malformed_source_url() {
        let request = CreateImportJobRequest {
            book_id: "b1".into(),
            kind: "wattpad".into(),
            source_url: "not a url".into(),
        };
        assert_eq!(
            errors_of(request.into_parts()),
            vec!["sourceUrl must be a valid URL".to_string()]
        );
    }

    #[test]
    fn test_valid_import_request() {
        let request = CreateImportJobRequest {
            book_id: "b1".into(),
            kind: "pdf".into(),
            source_url: "https://example.com/book.pdf".into(),
        };
        let (_, kind, url) = request.into_parts().unwrap();
        assert_eq!(kind, ImportKind::Pdf);
        assert_eq!(url, "https://example.com/book.pdf");
    }

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let request: CreateImportJobRequest = serde_json::from_value(serde_json::json!({
            "bookId": "b1",
            "type": "word",
            "url": "https://example.com/a.docx"
        }))
        .unwrap();

        assert_eq!(request.kind, TextField::from("word"));
        assert_eq!(request.source_url, TextField::from("https://example.com/a.docx"));
    }

    #[test]
    fn test_non_string_fields_are_still_validated() {
        let request: CreateImportJobRequest = serde_json::from_value(serde_json::json!({
            "bookId": null,
            "kind": 7,
            "sourceUrl": {"href": "https://example.com"}
        }))
        .unwrap();

        assert_eq!(request.book_id, TextField::Missing);
        assert_eq!(request.kind, TextField::NotText);
        assert_eq!(
            errors_of(request.into_parts()),
            vec![
                "bookId is required",
                "kind must be a string",
                "sourceUrl must be a string",
            ]
        );
    }

    #[test]
    fn test_missing_fields_deserialize_as_missing() {
        let request: CreateExportJobRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.book_id, TextField::Missing);
        assert_eq!(request.kind, TextField::Missing);
    }
}
