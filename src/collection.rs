//! Liked/saved image collections.
//!
//! This module provides:
//! - `ImageRef`: Stable identifier (source URL) of a catalog image
//! - `Collection`: Insertion-ordered, duplicate-free list of image refs
//! - `CollectionKind`: Which of the two collections an operation targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single image, usually its source URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

impl From<String> for ImageRef {
    fn from(src: String) -> Self {
        Self(src)
    }
}

/// The two user collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Liked,
    Saved,
}

impl CollectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Saved => "saved",
        }
    }
}

/// Ordered set of image refs (serialized as a plain JSON array)
///
/// Deserializing an array with repeated entries keeps the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ImageRef>", into = "Vec<ImageRef>")]
pub struct Collection {
    items: Vec<ImageRef>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an image
    ///
    /// Returns `true` if the image was present.
    pub fn remove(&mut self, image: &ImageRef) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i != image);
        self.items.len() != before
    }

    /// Toggle membership (append if absent, remove if present)
    ///
    /// Returns `true` if the image is now in the collection, `false` if removed.
    pub fn toggle(&mut self, image: &ImageRef) -> bool {
        if self.remove(image) {
            false
        } else {
            self.items.push(image.clone());
            true
        }
    }

    /// Check if an image is in the collection
    pub fn contains(&self, image: &ImageRef) -> bool {
        self.items.iter().any(|i| i == image)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entry at `index` in insertion order
    pub fn get(&self, index: usize) -> Option<&ImageRef> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ImageRef] {
        &self.items
    }
}

impl From<Vec<ImageRef>> for Collection {
    fn from(items: Vec<ImageRef>) -> Self {
        items.into_iter().collect()
    }
}

impl From<Collection> for Vec<ImageRef> {
    fn from(collection: Collection) -> Self {
        collection.items
    }
}

impl FromIterator<ImageRef> for Collection {
    fn from_iter<T: IntoIterator<Item = ImageRef>>(iter: T) -> Self {
        let mut collection = Self::new();
        for image in iter {
            if !collection.contains(&image) {
                collection.items.push(image);
            }
        }
        collection
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a ImageRef;
    type IntoIter = std::slice::Iter<'a, ImageRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
