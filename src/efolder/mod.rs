//! eFolder upload orchestration
//!
//! Files a local document into a loan's eFolder:
//!
//! 1. **File-type gate** - reject unsupported files before any network call
//! 2. **Token** - fresh password-grant token for this sequence
//! 3. **Loan lookup** - loan number to loan GUID
//! 4. **Placeholder** - find by title substring, or create
//! 5. **Attachment** - request an upload session, then PUT the bytes
//!
//! Every step runs sequentially. Any failure after the gate ends the sequence
//! with an [`EncompassError`].

pub mod file_type;
pub mod placeholder;

pub use file_type::{is_acceptable, ACCEPTABLE_SUFFIXES};
pub use placeholder::{find_matching, find_or_create};

use crate::encompass::{
    AccessToken, AttachmentUploadRequest, EncompassApi, EncompassError, EncompassResult,
    FileMetadata,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Result of a single upload sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    Uploaded { loan_guid: String, document_id: String },
    /// The file-type gate refused the file; nothing was sent.
    Rejected { filename: String },
}

/// Request an upload session for `path` and push its bytes into `document_id`.
pub async fn upload<A>(
    api: &A,
    token: &AccessToken,
    loan_guid: &str,
    document_id: &str,
    path: &Path,
    title: &str,
) -> EncompassResult<()>
where
    A: EncompassApi + ?Sized,
{
    let size = tokio::fs::metadata(path).await?.len();
    let name = file_name(path)?;

    let request = AttachmentUploadRequest::for_document(
        document_id,
        FileMetadata {
            content_type: mime::APPLICATION_PDF.to_string(),
            name,
            size,
        },
        title,
    );

    let session = api.request_upload_session(token, loan_guid, &request).await?;
    api.put_attachment(&session, path).await
}

fn file_name(path: &Path) -> EncompassResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            EncompassError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            ))
        })
}

/// Drives the full sequence against an [`EncompassApi`].
pub struct EFolderUploader<A> {
    api: A,
}

impl<A: EncompassApi> EFolderUploader<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Upload `path` to the loan numbered `loan_number` under the placeholder `title`.
    pub async fn upload_file(
        &self,
        loan_number: &str,
        title: &str,
        path: &Path,
    ) -> EncompassResult<UploadOutcome> {
        let filename = file_name(path)?;
        if !is_acceptable(&filename) {
            file_type::log_rejection(&filename);
            return Ok(UploadOutcome::Rejected { filename });
        }

        let token = self.api.get_access_token().await?;
        let loan_guid = self.api.resolve_loan_guid(&token, loan_number).await?;
        let document_id = find_or_create(&self.api, &token, &loan_guid, title).await?;

        upload(&self.api, &token, &loan_guid, &document_id, path, title).await?;

        info!(
            loan_number = %loan_number,
            document_id = %document_id,
            filename = %filename,
            "File filed into eFolder"
        );
        Ok(UploadOutcome::Uploaded { loan_guid, document_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encompass::{DocumentPlaceholder, UploadSession};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::io::Write;
    use std::sync::Mutex;

    const LOAN_GUID: &str = "8c5d1f8a-3b2e-4f6a-9d0c-7e1b2a3c4d5e";

    /// In-memory Encompass double recording every call
    #[derive(Default)]
    struct FakeEncompass {
        documents: Vec<DocumentPlaceholder>,
        loans: Vec<(String, String)>,
        fail_create: bool,
        fail_put: bool,
        calls: Mutex<Vec<String>>,
        session_requests: Mutex<Vec<AttachmentUploadRequest>>,
        uploaded: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FakeEncompass {
        fn with_loan(mut self) -> Self {
            self.loans.push(("2024010001".to_string(), LOAN_GUID.to_string()));
            self
        }

        fn with_document(mut self, title: &str, id: &str) -> Self {
            self.documents.push(DocumentPlaceholder {
                title: title.to_string(),
                id: id.to_string(),
            });
            self
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, call: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == call).count()
        }
    }

    #[async_trait]
    impl EncompassApi for FakeEncompass {
        async fn get_access_token(&self) -> EncompassResult<AccessToken> {
            self.record("token");
            Ok(AccessToken::new("tok-123"))
        }

        async fn resolve_loan_guid(&self, _token: &AccessToken, loan_number: &str) -> EncompassResult<String> {
            self.record("loan");
            self.loans
                .iter()
                .find(|(number, _)| number == loan_number)
                .map(|(_, guid)| guid.clone())
                .ok_or_else(|| EncompassError::LoanNotFound(loan_number.to_string()))
        }

        async fn list_documents(&self, _token: &AccessToken, _loan_guid: &str) -> EncompassResult<Vec<DocumentPlaceholder>> {
            self.record("list");
            Ok(self.documents.clone())
        }

        async fn create_document(&self, _token: &AccessToken, _loan_guid: &str, _title: &str) -> EncompassResult<String> {
            self.record("create");
            if self.fail_create {
                return Err(EncompassError::PlaceholderCreation {
                    status: StatusCode::BAD_REQUEST,
                    body: "bad title".to_string(),
                });
            }
            Ok(uuid::Uuid::new_v4().to_string())
        }

        async fn request_upload_session(
            &self,
            _token: &AccessToken,
            _loan_guid: &str,
            request: &AttachmentUploadRequest,
        ) -> EncompassResult<UploadSession> {
            self.record("session");
            self.session_requests.lock().unwrap().push(request.clone());
            Ok(UploadSession {
                authorization_header: "Basic upload-signature".to_string(),
                upload_url: "https://media.example.test/upload/1".to_string(),
            })
        }

        async fn put_attachment(&self, session: &UploadSession, path: &Path) -> EncompassResult<()> {
            self.record("put");
            if self.fail_put {
                return Err(EncompassError::Transfer {
                    status: StatusCode::FORBIDDEN,
                    body: "expired".to_string(),
                });
            }
            let bytes = tokio::fs::read(path).await?;
            self.uploaded
                .lock()
                .unwrap()
                .push((session.authorization_header.clone(), bytes));
            Ok(())
        }
    }

    fn pdf_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_substring_match() {
        let api = FakeEncompass::default()
            .with_document("Appraisal", "doc-1")
            .with_document("Closing Disclosure Final", "doc-2");
        let token = AccessToken::new("tok-123");

        let id = find_or_create(&api, &token, LOAN_GUID, "Closing Disclosure").await.unwrap();

        assert_eq!(id, "doc-2");
        assert_eq!(api.count("create"), 0);
    }

    #[tokio::test]
    async fn test_find_or_create_takes_first_match() {
        let api = FakeEncompass::default()
            .with_document("Bank Statement Jan", "doc-1")
            .with_document("Bank Statement Feb", "doc-2");
        let token = AccessToken::new("tok-123");

        let id = find_or_create(&api, &token, LOAN_GUID, "Bank Statement").await.unwrap();
        assert_eq!(id, "doc-1");
    }

    #[tokio::test]
    async fn test_find_or_create_creates_once_when_missing() {
        let api = FakeEncompass::default().with_document("Appraisal", "doc-1");
        let token = AccessToken::new("tok-123");

        let id = find_or_create(&api, &token, LOAN_GUID, "Flood Certificate").await.unwrap();

        assert_eq!(id.len(), 36);
        assert_eq!(api.count("create"), 1);
    }

    #[tokio::test]
    async fn test_find_or_create_surfaces_creation_failure() {
        let api = FakeEncompass {
            fail_create: true,
            ..Default::default()
        };
        let token = AccessToken::new("tok-123");

        let err = find_or_create(&api, &token, LOAN_GUID, "Flood Certificate").await.unwrap_err();
        assert!(matches!(err, EncompassError::PlaceholderCreation { .. }));
    }

    #[tokio::test]
    async fn test_upload_file_full_sequence() {
        let api = FakeEncompass::default()
            .with_loan()
            .with_document("Closing Disclosure Final", "doc-2");
        let file = pdf_file(b"%PDF-1.4 signed");
        let uploader = EFolderUploader::new(api);

        let outcome = uploader
            .upload_file("2024010001", "Closing Disclosure", file.path())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::Uploaded {
                loan_guid: LOAN_GUID.to_string(),
                document_id: "doc-2".to_string(),
            }
        );
        assert_eq!(uploader.api().calls(), vec!["token", "loan", "list", "session", "put"]);

        let requests = uploader.api().session_requests.lock().unwrap().clone();
        assert_eq!(requests[0].assign_to.entity_id, "doc-2");
        assert_eq!(requests[0].file.content_type, "application/pdf");
        assert_eq!(requests[0].file.size, 15);
        assert_eq!(requests[0].title, "Closing Disclosure");

        let uploaded = uploader.api().uploaded.lock().unwrap().clone();
        assert_eq!(uploaded[0].0, "Basic upload-signature");
        assert_eq!(uploaded[0].1, b"%PDF-1.4 signed".to_vec());
    }

    #[tokio::test]
    async fn test_rejected_file_makes_no_calls() {
        let api = FakeEncompass::default().with_loan();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"png").unwrap();
        let uploader = EFolderUploader::new(api);

        let outcome = uploader.upload_file("2024010001", "Appraisal", &path).await.unwrap();

        assert_eq!(outcome, UploadOutcome::Rejected { filename: "scan.png".to_string() });
        assert!(uploader.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_loan_stops_sequence() {
        let api = FakeEncompass::default();
        let file = pdf_file(b"x");
        let uploader = EFolderUploader::new(api);

        let err = uploader.upload_file("404", "Appraisal", file.path()).await.unwrap_err();

        assert!(matches!(err, EncompassError::LoanNotFound(_)));
        assert_eq!(uploader.api().calls(), vec!["token", "loan"]);
    }

    #[tokio::test]
    async fn test_transfer_failure_is_returned() {
        let api = FakeEncompass {
            fail_put: true,
            ..Default::default()
        }
        .with_loan()
        .with_document("Appraisal", "doc-1");
        let file = pdf_file(b"x");
        let uploader = EFolderUploader::new(api);

        let err = uploader.upload_file("2024010001", "Appraisal", file.path()).await.unwrap_err();
        assert!(matches!(err, EncompassError::Transfer { .. }));
    }
}
