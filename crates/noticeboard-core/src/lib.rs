//! Core domain for the noticeboard announcement service.
//!
//! Provides the collaborator contracts (object store, pub/sub notifier) with
//! production HTTP implementations and in-memory test doubles, the error
//! taxonomy, and the whole-document JSON list persistence protocol shared by
//! both request handlers. The API crate depends on these foundations for
//! type safety and substitutable collaborators.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod documents;
pub mod error;
pub mod notify;
pub mod store;

pub use error::{NotifyError, StoreError};
pub use notify::{HttpNotifier, Notifier, NotifierConfig, Publication};
pub use store::{HttpObjectStore, ObjectStore, StoreConfig};
