//! Local session and liked/saved image state for a photo gallery.
//!
//! The gallery front end forwards every user intent (log in, like from the
//! grid, save from the lightbox, remove from the liked page, ...) to a single
//! `CollectionStateManager`, which validates input, keeps the two collections
//! duplicate-free and writes each change to a `PersistenceStore`.

pub mod catalog;
pub mod collection;
pub mod config;
pub mod error;
pub mod manager;
pub mod session;
pub mod store;
pub mod validation;
pub mod viewer;

pub use catalog::{Catalog, CatalogEntry, ImageCatalog};
pub use collection::{Collection, CollectionKind, ImageRef};
pub use config::Config;
pub use error::{CatalogError, Error, PersistenceError, Result, ValidationError};
pub use manager::{CollectionStateManager, Snapshot, StateChange};
pub use session::Session;
pub use store::{FileStore, MemoryStore, PersistenceStore};
pub use viewer::Lightbox;
