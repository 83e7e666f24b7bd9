//! Pub/sub notifier collaborator.
//!
//! Covers the two outbound side effects of the service: broadcasting a
//! message to the announcement topic and registering an email endpoint as a
//! topic subscriber. Mirrors the store module's shape: a trait for the
//! handlers, an HTTP implementation for production, a recording double for
//! tests.

use std::{future::Future, pin::Pin, time::Duration};

use serde::Serialize;

use crate::error::NotifyError;

/// A message to broadcast to the topic's subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    /// Subject line shown to subscribers.
    pub subject: String,
    /// Message body.
    pub message: String,
}

/// Delivers publications to a named topic and manages its subscribers.
pub trait Notifier: Send + Sync + 'static {
    /// Publishes a message to the configured topic.
    fn publish(
        &self,
        publication: Publication,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>>;

    /// Registers `endpoint` as an email-protocol subscriber of the topic.
    ///
    /// Re-registering an existing endpoint must succeed; the notifier owns
    /// deduplication on its side.
    fn subscribe_email(
        &self,
        endpoint: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>>;
}

/// Configuration for the HTTP notifier client.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Base URL of the notification gateway.
    pub base_url: String,
    /// Topic identifier for publishes and subscriptions.
    pub topic: String,
    /// Timeout for notifier requests.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9100".to_string(),
            topic: "announcements".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Noticeboard/1.0".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionRequest<'a> {
    protocol: &'a str,
    endpoint: &'a str,
}

/// Production notifier backed by an HTTP pub/sub gateway.
///
/// Publishes to `{base_url}/topics/{topic}/publish` and registers
/// subscribers at `{base_url}/topics/{topic}/subscriptions`.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    base_url: String,
    topic: String,
}

impl HttpNotifier {
    /// Creates a new notifier client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: NotifierConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NotifyError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            topic: config.topic,
        })
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: String, body: &T) -> Result<(), NotifyError> {
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                NotifyError::transport(format!("request timed out: {e}"))
            } else {
                NotifyError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::warn!(%url, status = status.as_u16(), "Notifier rejected request");
            Err(NotifyError::UnexpectedStatus { status: status.as_u16() })
        }
    }
}

impl Notifier for HttpNotifier {
    fn publish(
        &self,
        publication: Publication,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>> {
        Box::pin(async move {
            let url = format!("{}/topics/{}/publish", self.base_url, self.topic);
            tracing::debug!(topic = %self.topic, subject = %publication.subject, "Publishing to topic");
            self.post_json(url, &publication).await
        })
    }

    fn subscribe_email(
        &self,
        endpoint: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>> {
        Box::pin(async move {
            let url = format!("{}/topics/{}/subscriptions", self.base_url, self.topic);
            tracing::debug!(topic = %self.topic, "Registering email subscriber");
            self.post_json(url, &SubscriptionRequest { protocol: "email", endpoint: &endpoint }).await
        })
    }
}

pub mod mock {
    //! Recording notifier for testing.

    use std::{future::Future, pin::Pin, sync::Arc};

    use tokio::sync::RwLock;

    use super::{Notifier, Publication};
    use crate::error::NotifyError;

    /// Notifier double that records calls and supports error injection.
    ///
    /// Clones share state, so a test can keep a handle while the router owns
    /// another.
    #[derive(Clone)]
    pub struct RecordingNotifier {
        publications: Arc<RwLock<Vec<Publication>>>,
        subscriptions: Arc<RwLock<Vec<String>>>,
        publish_error: Arc<RwLock<Option<NotifyError>>>,
        subscribe_error: Arc<RwLock<Option<NotifyError>>>,
    }

    impl RecordingNotifier {
        /// Creates a new notifier with no recorded calls.
        pub fn new() -> Self {
            Self {
                publications: Arc::new(RwLock::new(Vec::new())),
                subscriptions: Arc::new(RwLock::new(Vec::new())),
                publish_error: Arc::new(RwLock::new(None)),
                subscribe_error: Arc::new(RwLock::new(None)),
            }
        }

        /// Injects an error for the next `publish` call.
        pub async fn inject_publish_error(&self, error: NotifyError) {
            *self.publish_error.write().await = Some(error);
        }

        /// Injects an error for the next `subscribe_email` call.
        pub async fn inject_subscribe_error(&self, error: NotifyError) {
            *self.subscribe_error.write().await = Some(error);
        }

        /// Returns all recorded publications.
        pub async fn publications(&self) -> Vec<Publication> {
            self.publications.read().await.clone()
        }

        /// Returns all recorded subscription endpoints.
        pub async fn subscriptions(&self) -> Vec<String> {
            self.subscriptions.read().await.clone()
        }
    }

    impl Default for RecordingNotifier {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Notifier for RecordingNotifier {
        fn publish(
            &self,
            publication: Publication,
        ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>> {
            let publications = self.publications.clone();
            let publish_error = self.publish_error.clone();

            Box::pin(async move {
                if let Some(error) = publish_error.write().await.take() {
                    return Err(error);
                }
                publications.write().await.push(publication);
                Ok(())
            })
        }

        fn subscribe_email(
            &self,
            endpoint: String,
        ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + '_>> {
            let subscriptions = self.subscriptions.clone();
            let subscribe_error = self.subscribe_error.clone();

            Box::pin(async move {
                if let Some(error) = subscribe_error.write().await.take() {
                    return Err(error);
                }
                subscriptions.write().await.push(endpoint);
                Ok(())
            })
        }
    }
}
