//! Firestore documents REST client.
//!
//! One client per process, cloneable via `Arc`. Every call takes the
//! session's [`AccessToken`] explicitly; nothing here remembers who is
//! signed in.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::config::FirebaseConfig;
use crate::platform::documents::Document;
use crate::platform::{AccessToken, PlatformError, decode_error};

/// Client for the Firestore documents API.
///
/// Paths follow the REST layout
/// `{host}/v1/projects/{project}/databases/{database}/documents/...`.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    /// URL of the documents root, without a trailing slash.
    documents_root: String,
}

/// Response shape of the list endpoint.
///
/// Firestore omits the `documents` key entirely for an empty
/// collection.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        let documents_root = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            config.firestore_host, config.project_id, config.database_id
        );

        Self {
            inner: Arc::new(FirestoreClientInner {
                client: reqwest::Client::new(),
                documents_root,
            }),
        }
    }

    /// Read every document in a collection.
    ///
    /// No pagination: behavior is defined for collections small enough
    /// to fit in one response, which is all this application ever
    /// stores.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request fails or the platform
    /// rejects it.
    pub async fn list(
        &self,
        collection: &str,
        token: &AccessToken,
    ) -> Result<Vec<Document>, PlatformError> {
        let url = format!("{}/{collection}", self.inner.documents_root);
        let body = self.send(self.inner.client.get(&url), token).await?;
        let response: ListResponse = serde_json::from_str(&body)?;
        debug!(collection, count = response.documents.len(), "listed documents");
        Ok(response.documents)
    }

    /// Read one document by id. Absent documents are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` for any failure other than a missing
    /// document.
    pub async fn get(
        &self,
        collection: &str,
        id: &str,
        token: &AccessToken,
    ) -> Result<Option<Document>, PlatformError> {
        let url = format!("{}/{collection}/{id}", self.inner.documents_root);
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(decode_error(status, &body));
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Create a document with a server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request fails or the platform
    /// rejects it.
    pub async fn create(
        &self,
        collection: &str,
        document: &Document,
        token: &AccessToken,
    ) -> Result<Document, PlatformError> {
        let url = format!("{}/{collection}", self.inner.documents_root);
        let body = self
            .send(self.inner.client.post(&url).json(document), token)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Patch only the named fields of a document.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request fails or the platform
    /// rejects it.
    pub async fn patch(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        field_paths: &[&str],
        token: &AccessToken,
    ) -> Result<Document, PlatformError> {
        let url = format!("{}/{collection}/{id}", self.inner.documents_root);
        let mask: Vec<(&str, &str)> = field_paths
            .iter()
            .map(|path| ("updateMask.fieldPaths", *path))
            .collect();
        let body = self
            .send(
                self.inner.client.patch(&url).query(&mask).json(document),
                token,
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Overwrite a document at a caller-chosen id, creating it if
    /// absent. Patch without an update mask is Firestore's set
    /// semantics: last write wins for the whole document.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request fails or the platform
    /// rejects it.
    pub async fn set(
        &self,
        collection: &str,
        id: &str,
        document: &Document,
        token: &AccessToken,
    ) -> Result<Document, PlatformError> {
        let url = format!("{}/{collection}/{id}", self.inner.documents_root);
        let body = self
            .send(self.inner.client.patch(&url).json(document), token)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete a document by id.
    ///
    /// Deleting an already-absent document succeeds, matching the
    /// platform's semantics.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request fails or the platform
    /// rejects it.
    pub async fn delete(
        &self,
        collection: &str,
        id: &str,
        token: &AccessToken,
    ) -> Result<(), PlatformError> {
        let url = format!("{}/{collection}/{id}", self.inner.documents_root);
        self.send(self.inner.client.delete(&url), token).await?;
        Ok(())
    }

    /// Attach the bearer credential, send, and surface error envelopes.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        token: &AccessToken,
    ) -> Result<String, PlatformError> {
        let response = request.bearer_auth(token.expose()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(decode_error(status, &body));
        }

        Ok(body)
    }
}
