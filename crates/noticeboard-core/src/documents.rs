//! Whole-document JSON list persistence.
//!
//! Both handlers share the same read-modify-write protocol: fetch a JSON
//! array stored under a fixed key, mutate it in memory, and overwrite the
//! document. An absent key is the expected first-run state and reads as an
//! empty list; a document that does not parse as a list is discarded and
//! also reads as empty. Any other store fault propagates to the caller.
//!
//! Writes are unconditional overwrites with no version guard, so two
//! concurrent invocations appending to the same key can lose one update.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use crate::{error::StoreError, store::ObjectStore};

/// Content type used for persisted list documents.
pub const DOCUMENT_CONTENT_TYPE: &str = "application/json";

/// Loads the list stored under `key`, normalizing absence and corruption.
///
/// # Errors
///
/// Propagates every store fault except [`StoreError::NotFound`], which maps
/// to an empty list.
pub async fn load_list<T: DeserializeOwned>(
    store: &dyn ObjectStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    let body = match store.get(key.to_string()).await {
        Ok(body) => body,
        Err(err) if err.is_not_found() => {
            tracing::debug!(key, "Document absent, starting with empty list");
            return Ok(Vec::new());
        },
        Err(err) => return Err(err),
    };

    match serde_json::from_slice(&body) {
        Ok(items) => Ok(items),
        Err(err) => {
            tracing::warn!(key, error = %err, "Document is not a valid list, discarding");
            Ok(Vec::new())
        },
    }
}

/// Serializes `items` as a JSON array and overwrites the document at `key`.
///
/// `serde_json` leaves non-ASCII characters unescaped, so the persisted
/// document stays readable UTF-8.
///
/// # Errors
///
/// Returns [`StoreError::Encoding`] if serialization fails, or the store's
/// error if the write is rejected.
pub async fn save_list<T: Serialize>(
    store: &dyn ObjectStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let body = serde_json::to_vec(items).map_err(|e| StoreError::encoding(e.to_string()))?;
    store.put(key.to_string(), Bytes::from(body), DOCUMENT_CONTENT_TYPE.to_string()).await
}
