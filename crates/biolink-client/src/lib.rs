//! Client side of the profile page: the admin editor that edits and saves the
//! profile document, and the display renderer that turns it into a page model
//! and keeps it fresh.

pub mod controller;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod http;
pub mod local_storage;
pub mod renderer;
pub mod resolver;
pub mod splash;
pub mod sync;
pub mod typewriter;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{ConfigChange, ConfigController};
pub use editor::{AdminEditor, EditorError, FormInput, Notice, NoticeKind, SaveOutcome};
pub use error::ClientError;
pub use http::StoreClient;
pub use local_storage::{LocalStorage, StorageEvent, PROFILE_CONFIG_KEY, PROFILE_VIEWS_KEY};
pub use renderer::{render, DisplayRenderer, RenderedProfile};
pub use resolver::{ConfigSource, Resolved, SourceResolver};
pub use sync::{rolling_hash, HashTracker, LiveSync};
