//! Session and liked/saved collection state.
//!
//! `CollectionStateManager` is the single owner of the logged-in session and
//! the two image collections. Every UI entry point (grid overlay, lightbox,
//! profile tabs, liked/saved pages) goes through the same methods, and each
//! mutation is written to the store before the method returns.
//!
//! When a write fails the in-memory change is rolled back, so callers never
//! see state that differs from what was persisted.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::catalog::ImageCatalog;
use crate::collection::{Collection, CollectionKind, ImageRef};
use crate::config::StorageKeys;
use crate::error::{Error, PersistenceError, Result};
use crate::session::Session;
use crate::store::PersistenceStore;

/// Capacity of the change notification channel
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Notification that part of the state has changed
///
/// The payload only says what changed; subscribers read the new values
/// from the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Session,
    Liked,
    Saved,
    /// Logout wiped the session and both collections
    Cleared,
    /// State was reloaded from the store
    Loaded,
}

impl From<CollectionKind> for StateChange {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Liked => Self::Liked,
            CollectionKind::Saved => Self::Saved,
        }
    }
}

/// Read-only copy of the state for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub session: Option<Session>,
    pub liked: Vec<ImageRef>,
    pub saved: Vec<ImageRef>,
}

#[derive(Debug, Clone)]
struct SavedState {
    session: Option<Session>,
    liked: Collection,
    saved: Collection,
}

pub struct CollectionStateManager<S> {
    store: S,
    keys: StorageKeys,
    session: Option<Session>,
    liked: Collection,
    saved: Collection,
    changes: broadcast::Sender<StateChange>,
}

impl<S: PersistenceStore> CollectionStateManager<S> {
    /// Create an empty, logged-out manager using the default slot names
    ///
    /// Nothing is read from the store; call `load_from_store` to hydrate.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    pub fn with_keys(store: S, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            session: None,
            liked: Collection::new(),
            saved: Collection::new(),
            changes: broadcast::channel(CHANGE_CHANNEL_CAPACITY).0,
        }
    }

    /// Create a manager and hydrate it from the store
    pub fn open(store: S, keys: StorageKeys) -> Self {
        let mut manager = Self::with_keys(store, keys);
        manager.load_from_store();
        manager
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Log in with an email and password
    ///
    /// The password is only checked for length; the display name is the
    /// email's local part.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session> {
        let session = Session::from_login(email, password)?;
        self.start_session(session)
    }

    /// Create an account and log in with it
    pub fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<Session> {
        let session = Session::from_signup(name, email, password)?;
        self.start_session(session)
    }

    fn start_session(&mut self, session: Session) -> Result<Session> {
        let previous = self.session.replace(session.clone());
        if let Err(e) = self.persist_session() {
            tracing::error!(%e, "Failed to persist session, keeping previous one");
            self.session = previous;
            return Err(e.into());
        }

        tracing::info!(name = %session.name, email = %session.email, "Logged in");
        self.notify(StateChange::Session);
        Ok(session)
    }

    /// Log out and forget liked and saved images
    ///
    /// Likes and saves belong to the session, so they are wiped together with it.
    /// The caller is responsible for asking the user to confirm first.
    pub fn logout(&mut self) -> Result<()> {
        let previous = self.take_state();

        if let Err(e) = self.save_to_store() {
            tracing::error!(%e, "Failed to persist logout, restoring previous state");
            self.restore_state(previous);
            return Err(e.into());
        }

        tracing::info!(
            liked = previous.liked.len(),
            saved = previous.saved.len(),
            "Logged out"
        );
        self.notify(StateChange::Cleared);
        Ok(())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    // ------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------

    /// Like or unlike an image
    ///
    /// Returns `true` if the image is now liked. Requires a session.
    pub fn toggle_liked(&mut self, image: &ImageRef) -> Result<bool> {
        self.toggle(CollectionKind::Liked, image)
    }

    /// Save or unsave an image
    ///
    /// Returns `true` if the image is now saved. Requires a session.
    pub fn toggle_saved(&mut self, image: &ImageRef) -> Result<bool> {
        self.toggle(CollectionKind::Saved, image)
    }

    /// Toggle membership of `image` in one collection
    pub fn toggle(&mut self, kind: CollectionKind, image: &ImageRef) -> Result<bool> {
        if !self.is_authenticated() {
            tracing::debug!(collection = kind.label(), %image, "Toggle rejected: not logged in");
            return Err(Error::NotAuthenticated);
        }

        let previous = self.collection(kind).clone();
        let added = self.collection_mut(kind).toggle(image);
        self.commit_collection(kind, previous)?;

        tracing::debug!(collection = kind.label(), %image, added, "Toggled image");
        Ok(added)
    }

    /// Remove an image from the liked collection
    ///
    /// Returns `true` if something was removed.
    pub fn remove_liked(&mut self, image: &ImageRef) -> Result<bool> {
        self.remove(CollectionKind::Liked, image)
    }

    /// Remove an image from the saved collection
    ///
    /// Returns `true` if something was removed.
    pub fn remove_saved(&mut self, image: &ImageRef) -> Result<bool> {
        self.remove(CollectionKind::Saved, image)
    }

    /// Remove `image` from one collection without any session check
    pub fn remove(&mut self, kind: CollectionKind, image: &ImageRef) -> Result<bool> {
        if !self.collection(kind).contains(image) {
            return Ok(false);
        }

        let previous = self.collection(kind).clone();
        self.collection_mut(kind).remove(image);
        self.commit_collection(kind, previous)?;

        tracing::debug!(collection = kind.label(), %image, "Removed image");
        Ok(true)
    }

    pub fn is_liked(&self, image: &ImageRef) -> bool {
        self.liked.contains(image)
    }

    pub fn is_saved(&self, image: &ImageRef) -> bool {
        self.saved.contains(image)
    }

    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    pub fn liked(&self) -> &Collection {
        &self.liked
    }

    pub fn saved(&self) -> &Collection {
        &self.saved
    }

    pub fn collection(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::Liked => &self.liked,
            CollectionKind::Saved => &self.saved,
        }
    }

    fn collection_mut(&mut self, kind: CollectionKind) -> &mut Collection {
        match kind {
            CollectionKind::Liked => &mut self.liked,
            CollectionKind::Saved => &mut self.saved,
        }
    }

    /// Persist a changed collection, or put `previous` back if that fails
    fn commit_collection(&mut self, kind: CollectionKind, previous: Collection) -> Result<()> {
        if let Err(e) = self.persist_collection(kind) {
            tracing::error!(collection = kind.label(), %e, "Failed to persist, rolling back");
            *self.collection_mut(kind) = previous;
            return Err(e.into());
        }
        self.notify(kind.into());
        Ok(())
    }

    /// Catalog position of the `index`-th liked image, for opening it in the viewer
    pub fn resolve_liked<C: ImageCatalog>(&self, index: usize, catalog: &C) -> Option<usize> {
        self.resolve(CollectionKind::Liked, index, catalog)
    }

    /// Catalog position of the `index`-th saved image, for opening it in the viewer
    pub fn resolve_saved<C: ImageCatalog>(&self, index: usize, catalog: &C) -> Option<usize> {
        self.resolve(CollectionKind::Saved, index, catalog)
    }

    fn resolve<C: ImageCatalog>(
        &self,
        kind: CollectionKind,
        index: usize,
        catalog: &C,
    ) -> Option<usize> {
        let image = self.collection(kind).get(index)?;
        catalog.resolve_position(image)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.clone(),
            liked: self.liked.as_slice().to_vec(),
            saved: self.saved.as_slice().to_vec(),
        }
    }

    /// Subscribe to state changes
    ///
    /// Each successful mutation sends one notification.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    fn notify(&self, change: StateChange) {
        // No subscribers is fine
        self.changes.send(change).ok();
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Replace the in-memory state with what the store holds
    ///
    /// Absent, unreadable or malformed slots fall back to logged-out / empty.
    pub fn load_from_store(&mut self) {
        self.session = self
            .read_slot::<Option<Session>>(&self.keys.session)
            .flatten()
            .filter(|session| match session.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(key = %self.keys.session, %e, "Stored session is invalid, logging out");
                    false
                }
            });
        self.liked = self.read_slot(&self.keys.liked).unwrap_or_default();
        self.saved = self.read_slot(&self.keys.saved).unwrap_or_default();

        tracing::debug!(
            logged_in = self.session.is_some(),
            liked = self.liked.len(),
            saved = self.saved.len(),
            "Loaded state from store"
        );
        self.notify(StateChange::Loaded);
    }

    /// Write the session and both collections to the store
    pub fn save_to_store(&mut self) -> std::result::Result<(), PersistenceError> {
        self.persist_session()?;
        self.persist_collection(CollectionKind::Liked)?;
        self.persist_collection(CollectionKind::Saved)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, %e, "Failed to read slot, using default");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, %e, "Malformed slot, using default");
                None
            }
        }
    }

    fn write_slot<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> std::result::Result<(), PersistenceError> {
        let content = serde_json::to_string(value).map_err(|source| PersistenceError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &content)
    }

    fn persist_session(&mut self) -> std::result::Result<(), PersistenceError> {
        let key = self.keys.session.clone();
        match self.session.clone() {
            Some(session) => self.write_slot(&key, &session),
            None => self.store.remove(&key),
        }
    }

    fn persist_collection(
        &mut self,
        kind: CollectionKind,
    ) -> std::result::Result<(), PersistenceError> {
        let key = match kind {
            CollectionKind::Liked => self.keys.liked.clone(),
            CollectionKind::Saved => self.keys.saved.clone(),
        };
        let collection = self.collection(kind).clone();

        tracing::debug!(key = %key, count = collection.len(), "Saving collection");
        self.write_slot(&key, &collection)
    }

    fn take_state(&mut self) -> SavedState {
        SavedState {
            session: self.session.take(),
            liked: std::mem::take(&mut self.liked),
            saved: std::mem::take(&mut self.saved),
        }
    }

    /// Put a previous state back and try to bring the store in line with it
    fn restore_state(&mut self, state: SavedState) {
        self.session = state.session;
        self.liked = state.liked;
        self.saved = state.saved;

        if let Err(e) = self.save_to_store() {
            tracing::error!(%e, "Failed to re-persist restored state");
        }
    }
}
