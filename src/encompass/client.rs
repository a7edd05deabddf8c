// Encompass REST client
//
// The presigned PUT always declares application/pdf regardless of the file's real type,
// and so does the upload session metadata. The guessed type is only logged.

use crate::config::EncompassConfig;
use crate::encompass::api::EncompassApi;
use crate::encompass::error::{EncompassError, EncompassResult};
use crate::encompass::types::{
    AccessToken, AttachmentUploadRequest, CreateDocumentRequest, DocumentPlaceholder,
    PipelineFilter, PipelineLoan, PipelineQuery, TokenResponse, UploadSession,
    UploadSessionResponse,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TOKEN_PATH: &str = "/oauth2/v1/token";
const PIPELINE_PATH: &str = "/encompass/v1/loanPipeline";

/// Width of the document id at the tail of a `Location` header
pub const DOCUMENT_ID_LEN: usize = 36;

pub struct EncompassClient {
    client: Client,
    config: EncompassConfig,
}

impl EncompassClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(config: EncompassConfig) -> EncompassResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// `user@encompass:instance`, as the token endpoint expects it
    fn grant_username(&self) -> String {
        format!("{}@encompass:{}", self.config.username, self.config.instance_id)
    }

    async fn parse_json<T: DeserializeOwned>(
        response: Response,
        endpoint: &'static str,
    ) -> EncompassResult<T> {
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            error!(endpoint, status = %status, body = %body, "Unparseable Encompass response");
            EncompassError::UnexpectedResponse {
                endpoint,
                reason: format!("status {}: {}", status, e),
            }
        })
    }
}

/// Take the trailing document id from a `Location` header value.
///
/// Values shorter than the id width are returned whole.
pub fn extract_document_id(location: &str) -> String {
    let count = location.chars().count();
    location
        .chars()
        .skip(count.saturating_sub(DOCUMENT_ID_LEN))
        .collect()
}

#[async_trait]
impl EncompassApi for EncompassClient {
    async fn get_access_token(&self) -> EncompassResult<AccessToken> {
        let username = self.grant_username();
        let form = [
            ("grant_type", "password"),
            ("username", username.as_str()),
            ("password", self.config.password.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.access_token)
            .map(|token| {
                debug!("Access token obtained");
                AccessToken::new(token)
            })
            .ok_or_else(|| {
                warn!(status = %status, "Token response did not contain access_token");
                EncompassError::Authentication(format!(
                    "token endpoint returned status {} without an access_token",
                    status
                ))
            })
    }

    async fn resolve_loan_guid(&self, token: &AccessToken, loan_number: &str) -> EncompassResult<String> {
        info!(loan_number = %loan_number, "Searching loan pipeline");

        let query = PipelineQuery {
            include_archived_loans: true,
            filter: PipelineFilter {
                canonical_name: "Loan.LoanNumber",
                value: loan_number,
                match_type: "Exact",
            },
        };

        let response = self
            .client
            .post(self.url(PIPELINE_PATH))
            .query(&[("limit", "1")])
            .header(AUTHORIZATION, token.bearer())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .json(&query)
            .send()
            .await?;

        let loans: Vec<PipelineLoan> = Self::parse_json(response, "loanPipeline").await?;

        loans
            .into_iter()
            .next()
            .and_then(|loan| loan.loan_guid)
            .ok_or_else(|| EncompassError::LoanNotFound(loan_number.to_string()))
    }

    async fn list_documents(&self, token: &AccessToken, loan_guid: &str) -> EncompassResult<Vec<DocumentPlaceholder>> {
        let response = self
            .client
            .get(self.url(&format!("/encompass/v3/loans/{}/documents", loan_guid)))
            .query(&[("requireActiveAttachments", "false"), ("includeRemoved", "false")])
            .header(AUTHORIZATION, token.bearer())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;

        let documents: Vec<DocumentPlaceholder> = Self::parse_json(response, "documents").await?;
        debug!(loan_guid = %loan_guid, count = documents.len(), "Listed document placeholders");
        Ok(documents)
    }

    async fn create_document(&self, token: &AccessToken, loan_guid: &str, title: &str) -> EncompassResult<String> {
        let body = CreateDocumentRequest {
            application_id: "All",
            title,
        };

        let response = self
            .client
            .post(self.url(&format!("/encompass/v1/loans/{}/documents", loan_guid)))
            .header(AUTHORIZATION, token.bearer())
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Failed to create document placeholder");
            return Err(EncompassError::PlaceholderCreation { status, body });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                warn!(title = %title, "Document created, but Location header is missing");
                EncompassError::MissingLocation
            })?;

        let document_id = extract_document_id(location);
        info!(document_id = %document_id, title = %title, "Document placeholder created");
        Ok(document_id)
    }

    async fn request_upload_session(
        &self,
        token: &AccessToken,
        loan_guid: &str,
        request: &AttachmentUploadRequest,
    ) -> EncompassResult<UploadSession> {
        let response = self
            .client
            .post(self.url(&format!("/encompass/v3/loans/{}/attachmentUploadUrl", loan_guid)))
            .header(AUTHORIZATION, token.bearer())
            .json(request)
            .send()
            .await?;

        let session: UploadSessionResponse =
            Self::parse_json(response, "attachmentUploadUrl").await?;

        match (session.authorization_header, session.upload_url) {
            (Some(authorization_header), Some(upload_url)) => Ok(UploadSession {
                authorization_header,
                upload_url,
            }),
            (None, _) => Err(EncompassError::UploadSession(
                "response is missing authorizationHeader".to_string(),
            )),
            (_, None) => Err(EncompassError::UploadSession(
                "response is missing uploadUrl".to_string(),
            )),
        }
    }

    async fn put_attachment(&self, session: &UploadSession, path: &Path) -> EncompassResult<()> {
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        let guessed = mime_guess::from_path(path).first_or_octet_stream();
        if guessed != mime::APPLICATION_PDF {
            debug!(path = %path.display(), guessed = %guessed, "Sending non-PDF file as application/pdf");
        }

        // The file handle moves into the request body and is dropped with it.
        let response = self
            .client
            .put(&session.upload_url)
            .header(AUTHORIZATION, session.authorization_header.as_str())
            .header(CONTENT_TYPE, mime::APPLICATION_PDF.as_ref())
            .header(CONTENT_LENGTH, size)
            .body(file)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            info!(path = %path.display(), bytes = size, "Attachment uploaded successfully");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Failed to upload attachment");
            Err(EncompassError::Transfer { status, body })
        }
    }
}
