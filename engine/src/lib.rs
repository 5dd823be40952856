//! # UMApp Engine
//!
//! A user store that layers a locally persisted overlay on top of a remote
//! `users` REST resource.
//!
//! The remote origin (by default the public jsonplaceholder API) serves a
//! baseline list of users and accepts writes, but does not keep them. The
//! store forwards every write to the remote and then records the result in a
//! local overlay so that created and edited users survive across requests.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`UserRecord`] is `{ id, name, email, phone }`. Remote ids are small
//! integers assigned by the remote; local ids are millisecond timestamps
//! handed out by [`LocalIds`].
//!
//! ### Overlay
//!
//! The [`Overlay`] is an ordered list of records stored as one JSON array under
//! a single key of an [`OverlayStorage`]. It is read before every operation
//! and rewritten in full after every mutation. Missing or malformed content is
//! treated as an empty overlay.
//!
//! ### Combined view
//!
//! [`UserStore::list_users`] returns remote records followed by overlay
//! records. Nothing about the combination is persisted.
//!
//! ## Seams
//!
//! - [`RemoteUsers`] - the remote collection; [`HttpRemote`] is the reqwest client
//! - [`OverlayStorage`] - the blob slot; [`MemoryStorage`], `FileStorage`
//!   (native) and `LocalStorage` (wasm32 with the `web` feature)
//! - [`Clock`] - time source for local ids
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use umapp_engine::{MemoryStorage, StoreConfig, UserFields, UserStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = UserStore::from_config(StoreConfig::default(), MemoryStorage::new())?;
//!
//! let bob = store
//!     .create_user(UserFields::new("Bob", "bob@example.com", "555-0100"))
//!     .await?;
//!
//! let users = store.list_users().await?;
//! assert_eq!(users.last(), Some(&bob));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Mutations are an unguarded read-modify-write of the overlay. Two mutations
//! that interleave between the read and the write lose the earlier write.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod overlay;
pub mod record;
pub mod remote;
pub mod storage;
pub mod store;

// Re-export main types at crate root
pub use clock::{Clock, FixedClock, LocalIds, SystemClock};
pub use config::{ConfigError, StoreConfig, DEFAULT_BASE_URL, DEFAULT_STORAGE_KEY};
pub use error::Error;
pub use events::{EventBus, OverlayEvent};
pub use overlay::Overlay;
pub use record::{UserFields, UserRecord};
pub use remote::{HttpRemote, RemoteError, RemoteUsers};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use storage::LocalStorage;
pub use storage::{MemoryStorage, OverlayStorage, StorageError};
pub use store::UserStore;

/// Type aliases for clarity
pub type UserId = u64;
pub type Timestamp = u64;
