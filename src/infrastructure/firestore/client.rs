//! Cloud Firestore REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, warn};

use super::dto::{ErrorResponse, FirestoreDocument, ListDocumentsResponse, WriteBody};
use super::watcher::{SnapshotSource, spawn_watcher};
use crate::domain::entities::{ApiKey, SpiceFields, SpiceId};
use crate::domain::errors::StoreError;
use crate::domain::ports::{DocumentStorePort, Snapshot, Subscription};
use crate::infrastructure::config::StoreConfig;

const USER_AGENT: &str = concat!("spice-drawers/", env!("CARGO_PKG_VERSION"));
const PAGE_SIZE: u32 = 300;

/// Firestore-backed document store.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    base_url: String,
    project_id: String,
    database: String,
    api_key: Option<ApiKey>,
    poll_interval: Duration,
}

impl FirestoreClient {
    /// Creates client from the static connection config.
    ///
    /// # Errors
    /// Returns error if the project id is missing or the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::rejected(
                "no Firebase project id configured (set store.project_id or SPICE_PROJECT_ID)",
            ));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.trim().to_string(),
            database: config.database.clone(),
            api_key: config.api_key(),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(100)),
        })
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url, self.project_id, self.database
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.documents_root())
    }

    fn document_url(&self, collection: &str, id: &SpiceId) -> String {
        format!("{}/{collection}/{id}", self.documents_root())
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = self.with_key(request).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach Firestore");
            if e.is_timeout() {
                StoreError::network("request timed out")
            } else if e.is_connect() {
                StoreError::network("failed to connect to Firestore")
            } else {
                StoreError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error_response(status, response).await)
        }
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> StoreError {
        let path = response.url().path().to_string();
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
            Ok(envelope) => format!("{}: {}", envelope.error.status, envelope.error.message),
            Err(_) => format!("HTTP {status}"),
        };

        map_status(status, path, error_message)
    }

    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        let mut request = self
            .client
            .get(self.collection_url(collection))
            .query(&[("pageSize", PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        self.send(request)
            .await?
            .json::<ListDocumentsResponse>()
            .await
            .map_err(|e| StoreError::malformed(format!("failed to parse listing: {e}")))
    }

    /// Reads the whole collection, following page tokens.
    ///
    /// # Errors
    /// Returns `StoreError` if any page fails or a document does not decode.
    pub async fn list_documents(&self, collection: &str) -> Result<Snapshot, StoreError> {
        read_all_pages(self, collection).await
    }
}

/// One listing request. Split from the client so paging runs without HTTP.
#[async_trait]
trait PageSource: Sync {
    async fn page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError>;
}

#[async_trait]
impl PageSource for FirestoreClient {
    async fn page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        self.list_page(collection, page_token).await
    }
}

/// Concatenates pages in the order served until the token runs out.
/// An empty `nextPageToken` counts as the last page.
async fn read_all_pages<P: PageSource + ?Sized>(
    source: &P,
    collection: &str,
) -> Result<Snapshot, StoreError> {
    let mut documents = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = source.page(collection, page_token.as_deref()).await?;
        for raw in page.documents {
            documents.push(raw.into_document()?);
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    debug!(collection = %collection, count = documents.len(), "Collection read");
    Ok(Snapshot::new(documents))
}

fn created_id(document: &FirestoreDocument) -> Result<SpiceId, StoreError> {
    document.id().ok_or_else(|| {
        StoreError::malformed(format!("created document has no id: {}", document.name))
    })
}

fn map_status(status: StatusCode, path: String, message: String) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::not_found(path),
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::rejected(message)
        }
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => StoreError::network(message),
        _ => StoreError::unexpected(format!("unexpected response: {status} - {message}")),
    }
}

#[async_trait]
impl SnapshotSource for FirestoreClient {
    async fn fetch(&self, collection: &str) -> Result<Snapshot, StoreError> {
        self.list_documents(collection).await
    }
}

#[async_trait]
impl DocumentStorePort for FirestoreClient {
    fn subscribe(&self, collection: &str) -> Result<Subscription, StoreError> {
        Ok(spawn_watcher(
            self.clone(),
            collection.to_string(),
            self.poll_interval,
        ))
    }

    async fn create_document(
        &self,
        collection: &str,
        fields: &SpiceFields,
    ) -> Result<SpiceId, StoreError> {
        let body = WriteBody::from_fields(fields)?;
        let request = self.client.post(self.collection_url(collection)).json(&body);

        let document: FirestoreDocument = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::malformed(format!("failed to parse created document: {e}")))?;

        created_id(&document)
    }

    async fn replace_document(
        &self,
        collection: &str,
        id: &SpiceId,
        fields: &SpiceFields,
    ) -> Result<(), StoreError> {
        // No updateMask: Firestore replaces the whole document.
        let body = WriteBody::from_fields(fields)?;
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .json(&body);

        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use parking_lot::Mutex;
    use serde_json::json;

    /// Serves canned pages and records the token of every request.
    struct ScriptedPages {
        pages: Mutex<VecDeque<Result<ListDocumentsResponse, StoreError>>>,
        tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedPages {
        fn new(pages: Vec<Result<ListDocumentsResponse, StoreError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                tokens: Mutex::new(Vec::new()),
            }
        }

        fn requested_tokens(&self) -> Vec<Option<String>> {
            self.tokens.lock().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedPages {
        async fn page(
            &self,
            _collection: &str,
            page_token: Option<&str>,
        ) -> Result<ListDocumentsResponse, StoreError> {
            self.tokens.lock().push(page_token.map(str::to_string));
            self.pages
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(StoreError::unexpected("no more scripted pages")))
        }
    }

    fn stored(id: &str, name: &str) -> FirestoreDocument {
        serde_json::from_value(json!({
            "name": format!("projects/p/databases/(default)/documents/spices/{id}"),
            "fields": { "name": { "stringValue": name } }
        }))
        .unwrap()
    }

    fn page(ids: &[(&str, &str)], next: Option<&str>) -> ListDocumentsResponse {
        ListDocumentsResponse {
            documents: ids.iter().map(|(id, name)| stored(id, name)).collect(),
            next_page_token: next.map(str::to_string),
        }
    }

    fn names(snapshot: &Snapshot) -> Vec<String> {
        snapshot
            .documents()
            .iter()
            .map(|d| d.fields.name.clone())
            .collect()
    }

    fn config() -> StoreConfig {
        StoreConfig {
            project_id: "spice-drwrs".to_string(),
            api_key: "AIzaSyExampleExampleExample123".to_string(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_client_requires_project_id() {
        let result = FirestoreClient::new(&StoreConfig::default());
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
    }

    #[test]
    fn test_resource_urls() {
        let client = FirestoreClient::new(&config()).unwrap();
        let id = SpiceId::new("a1").unwrap();

        assert_eq!(
            client.collection_url("spices"),
            "https://firestore.googleapis.com/v1/projects/spice-drwrs/databases/(default)/documents/spices"
        );
        assert_eq!(
            client.document_url("spices", &id),
            "https://firestore.googleapis.com/v1/projects/spice-drwrs/databases/(default)/documents/spices/a1"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let mut config = config();
        config.base_url = "http://localhost:8080/v1/".to_string();
        let client = FirestoreClient::new(&config).unwrap();

        assert!(client.collection_url("spices").starts_with("http://localhost:8080/v1/projects/"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::NOT_FOUND, "/x".into(), String::new()),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, "/x".into(), "denied".into()),
            StoreError::Rejected { .. }
        ));
        assert!(
            map_status(StatusCode::SERVICE_UNAVAILABLE, "/x".into(), "busy".into())
                .is_network_error()
        );
    }

    #[tokio::test]
    async fn test_pages_are_joined_in_order() {
        let source = ScriptedPages::new(vec![
            Ok(page(&[("a", "Anise"), ("b", "Basil")], Some("tok-2"))),
            Ok(page(&[("c", "Cumin")], None)),
        ]);

        let snapshot = read_all_pages(&source, "spices").await.unwrap();

        assert_eq!(names(&snapshot), ["Anise", "Basil", "Cumin"]);
        assert_eq!(source.requested_tokens(), [None, Some("tok-2".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_page_token_ends_listing() {
        let source = ScriptedPages::new(vec![
            Ok(page(&[("a", "Anise")], Some(""))),
            Ok(page(&[("z", "Never read")], None)),
        ]);

        let snapshot = read_all_pages(&source, "spices").await.unwrap();

        assert_eq!(names(&snapshot), ["Anise"]);
        assert_eq!(source.requested_tokens().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_reads_as_empty_snapshot() {
        let source = ScriptedPages::new(vec![Ok(ListDocumentsResponse::default())]);

        let snapshot = read_all_pages(&source, "spices").await.unwrap();

        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_failed_later_page_fails_whole_read() {
        let source = ScriptedPages::new(vec![
            Ok(page(&[("a", "Anise")], Some("tok-2"))),
            Err(StoreError::network("connection reset")),
        ]);

        let result = read_all_pages(&source, "spices").await;

        assert!(result.unwrap_err().is_network_error());
    }

    #[test]
    fn test_created_id_comes_from_resource_name() {
        let document = stored("abc", "Cardamom");
        assert_eq!(created_id(&document).unwrap().as_str(), "abc");
    }

    #[test]
    fn test_created_document_without_id_is_malformed() {
        let document: FirestoreDocument = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/spices/"
        }))
        .unwrap();

        assert!(matches!(
            created_id(&document),
            Err(StoreError::MalformedResponse { .. })
        ));
    }
}
