//! Object store collaborator.
//!
//! Provides a trait-based abstraction over whole-document get/put storage to
//! keep the request handlers testable without a live store. The production
//! implementation talks to an S3-style HTTP gateway; tests use the in-memory
//! double from the [`mock`] module.

use std::{future::Future, pin::Pin, time::Duration};

use bytes::Bytes;

use crate::error::StoreError;

/// Key-addressed durable storage for whole documents.
///
/// The handlers read a document once and write it once per invocation,
/// non-transactionally; there is no conditional-write guard, so concurrent
/// writers to the same key can race (accepted lost-update hazard).
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetches the document stored under `key`.
    ///
    /// Returns [`StoreError::NotFound`] when the key does not exist; callers
    /// decide whether absence is an error.
    fn get(&self, key: String) -> Pin<Box<dyn Future<Output = Result<Bytes, StoreError>> + Send + '_>>;

    /// Overwrites the document stored under `key`.
    fn put(
        &self,
        key: String,
        body: Bytes,
        content_type: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;
}

/// Configuration for the HTTP object store client.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the object store gateway.
    pub base_url: String,
    /// Bucket holding the service's documents.
    pub bucket: String,
    /// Timeout for store requests.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            bucket: "noticeboard".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Noticeboard/1.0".to_string(),
        }
    }
}

/// Production object store backed by an S3-style HTTP gateway.
///
/// Objects live at `{base_url}/{bucket}/{key}`. A 404 response maps to
/// [`StoreError::NotFound`]; any other non-success status or transport
/// failure is an infrastructure fault.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl HttpObjectStore {
    /// Creates a new store client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| StoreError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, key)
    }
}

fn transport_error(err: &reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::transport(format!("request timed out: {err}"))
    } else if err.is_connect() {
        StoreError::transport(format!("connection failed: {err}"))
    } else {
        StoreError::transport(err.to_string())
    }
}

impl ObjectStore for HttpObjectStore {
    fn get(&self, key: String) -> Pin<Box<dyn Future<Output = Result<Bytes, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let url = self.object_url(&key);
            tracing::debug!(%url, "Fetching object");

            let response = self.client.get(&url).send().await.map_err(|e| transport_error(&e))?;

            let status = response.status();
            if status.is_success() {
                response.bytes().await.map_err(|e| transport_error(&e))
            } else if status == reqwest::StatusCode::NOT_FOUND {
                Err(StoreError::NotFound { key })
            } else {
                tracing::warn!(%url, status = status.as_u16(), "Unexpected store response");
                Err(StoreError::UnexpectedStatus { status: status.as_u16() })
            }
        })
    }

    fn put(
        &self,
        key: String,
        body: Bytes,
        content_type: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            let url = self.object_url(&key);
            tracing::debug!(%url, size = body.len(), "Storing object");

            let response = self
                .client
                .put(&url)
                .header("content-type", content_type)
                .body(body)
                .send()
                .await
                .map_err(|e| transport_error(&e))?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                tracing::warn!(%url, status = status.as_u16(), "Store rejected write");
                Err(StoreError::UnexpectedStatus { status: status.as_u16() })
            }
        })
    }
}

pub mod mock {
    //! In-memory object store for testing.
    //!
    //! Stores documents in a shared map with configurable error injection
    //! and write recording, so tests can verify both happy paths and the
    //! no-side-effect guarantees of the validation failures.

    use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

    use bytes::Bytes;
    use tokio::sync::RwLock;

    use super::ObjectStore;
    use crate::error::StoreError;

    #[derive(Debug, Clone)]
    struct StoredObject {
        body: Bytes,
        content_type: String,
    }

    /// In-memory store double with error injection and put recording.
    ///
    /// Clones share state, so a test can keep a handle while the router owns
    /// another.
    #[derive(Clone)]
    pub struct MemoryObjectStore {
        objects: Arc<RwLock<HashMap<String, StoredObject>>>,
        puts: Arc<RwLock<Vec<String>>>,
        get_error: Arc<RwLock<Option<StoreError>>>,
        put_error: Arc<RwLock<Option<StoreError>>>,
    }

    impl MemoryObjectStore {
        /// Creates a new store with no documents.
        pub fn new() -> Self {
            Self {
                objects: Arc::new(RwLock::new(HashMap::new())),
                puts: Arc::new(RwLock::new(Vec::new())),
                get_error: Arc::new(RwLock::new(None)),
                put_error: Arc::new(RwLock::new(None)),
            }
        }

        /// Seeds a document without recording it as a handler write.
        pub async fn seed(&self, key: &str, body: impl Into<Bytes>, content_type: &str) {
            self.objects.write().await.insert(
                key.to_string(),
                StoredObject { body: body.into(), content_type: content_type.to_string() },
            );
        }

        /// Injects an error for the next `get` call.
        pub async fn inject_get_error(&self, error: StoreError) {
            *self.get_error.write().await = Some(error);
        }

        /// Injects an error for the next `put` call.
        pub async fn inject_put_error(&self, error: StoreError) {
            *self.put_error.write().await = Some(error);
        }

        /// Returns the raw bytes stored under `key`, if any.
        pub async fn object(&self, key: &str) -> Option<Bytes> {
            self.objects.read().await.get(key).map(|o| o.body.clone())
        }

        /// Returns the content type stored under `key`, if any.
        pub async fn content_type(&self, key: &str) -> Option<String> {
            self.objects.read().await.get(key).map(|o| o.content_type.clone())
        }

        /// Returns how many writes the store has accepted.
        pub async fn put_count(&self) -> usize {
            self.puts.read().await.len()
        }
    }

    impl Default for MemoryObjectStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ObjectStore for MemoryObjectStore {
        fn get(
            &self,
            key: String,
        ) -> Pin<Box<dyn Future<Output = Result<Bytes, StoreError>> + Send + '_>> {
            let objects = self.objects.clone();
            let get_error = self.get_error.clone();

            Box::pin(async move {
                if let Some(error) = get_error.write().await.take() {
                    return Err(error);
                }

                objects
                    .read()
                    .await
                    .get(&key)
                    .map(|o| o.body.clone())
                    .ok_or(StoreError::NotFound { key })
            })
        }

        fn put(
            &self,
            key: String,
            body: Bytes,
            content_type: String,
        ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
            let objects = self.objects.clone();
            let puts = self.puts.clone();
            let put_error = self.put_error.clone();

            Box::pin(async move {
                if let Some(error) = put_error.write().await.take() {
                    return Err(error);
                }

                puts.write().await.push(key.clone());
                objects.write().await.insert(key, StoredObject { body, content_type });
                Ok(())
            })
        }
    }
}
