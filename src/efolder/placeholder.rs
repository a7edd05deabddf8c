use crate::encompass::{AccessToken, DocumentPlaceholder, EncompassApi, EncompassResult};
use tracing::{debug, info};

/// First placeholder whose title contains `title` as a substring.
pub fn find_matching<'a>(documents: &'a [DocumentPlaceholder], title: &str) -> Option<&'a DocumentPlaceholder> {
    documents.iter().find(|doc| doc.title.contains(title))
}

/// Resolve the placeholder id for `title`, creating the placeholder when none matches.
///
/// At most one create call is made per invocation. Creation failures are returned
/// as errors and must stop the upload sequence.
pub async fn find_or_create<A>(
    api: &A,
    token: &AccessToken,
    loan_guid: &str,
    title: &str,
) -> EncompassResult<String>
where
    A: EncompassApi + ?Sized,
{
    let documents = api.list_documents(token, loan_guid).await?;

    if let Some(existing) = find_matching(&documents, title) {
        debug!(document_id = %existing.id, existing_title = %existing.title, "Using existing placeholder");
        return Ok(existing.id.clone());
    }

    info!(title = %title, loan_guid = %loan_guid, "Placeholder not found, creating it");
    api.create_document(token, loan_guid, title).await
}
