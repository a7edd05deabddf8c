// Wire and domain types for the Encompass REST API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token returned by the password grant.
///
/// Expiry is owned by the remote service; callers obtain a fresh one per sequence.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// A named document slot in a loan's eFolder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPlaceholder {
    #[serde(default)]
    pub title: String,
    pub id: String,
}

/// One-shot presigned upload target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub authorization_header: String,
    pub upload_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PipelineQuery<'a> {
    pub include_archived_loans: bool,
    pub filter: PipelineFilter<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PipelineFilter<'a> {
    pub canonical_name: &'static str,
    pub value: &'a str,
    pub match_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PipelineLoan {
    pub loan_guid: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDocumentRequest<'a> {
    pub application_id: &'static str,
    pub title: &'a str,
}

/// Body of the attachment upload URL request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUploadRequest {
    pub assign_to: AssignTo,
    pub file: FileMetadata,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTo {
    pub entity_id: String,
    pub entity_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub content_type: String,
    pub name: String,
    pub size: u64,
}

impl AttachmentUploadRequest {
    pub fn for_document(document_id: &str, file: FileMetadata, title: &str) -> Self {
        Self {
            assign_to: AssignTo {
                entity_id: document_id.to_string(),
                entity_type: "Document".to_string(),
            },
            file,
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadSessionResponse {
    pub authorization_header: Option<String>,
    pub upload_url: Option<String>,
}
