use async_trait::async_trait;
use std::path::Path;

use super::error::EncompassResult;
use super::types::{AccessToken, AttachmentUploadRequest, DocumentPlaceholder, UploadSession};

/// One method per remote Encompass operation.
#[async_trait]
pub trait EncompassApi: Send + Sync {
    /// Exchange the configured credentials for a bearer token. No caching.
    async fn get_access_token(&self) -> EncompassResult<AccessToken>;

    /// Exact-match pipeline search limited to a single result.
    async fn resolve_loan_guid(&self, token: &AccessToken, loan_number: &str) -> EncompassResult<String>;

    /// Active, non-removed document placeholders on the loan.
    async fn list_documents(&self, token: &AccessToken, loan_guid: &str) -> EncompassResult<Vec<DocumentPlaceholder>>;

    /// Create a placeholder and return its id.
    async fn create_document(&self, token: &AccessToken, loan_guid: &str, title: &str) -> EncompassResult<String>;

    async fn request_upload_session(
        &self,
        token: &AccessToken,
        loan_guid: &str,
        request: &AttachmentUploadRequest,
    ) -> EncompassResult<UploadSession>;

    /// PUT the raw bytes at `path` to the presigned URL.
    async fn put_attachment(&self, session: &UploadSession, path: &Path) -> EncompassResult<()>;
}
