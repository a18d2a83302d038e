//! Image catalog backing the infinite-scroll grid.
//!
//! Positions are stable: the catalog is append-only, so a position handed to
//! the viewer stays valid for the catalog's lifetime.

use std::ops::Range;

use crate::collection::ImageRef;
use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// Read-only view of the known images, in grid order
pub trait ImageCatalog {
    /// Position of the first entry showing `image`
    fn resolve_position(&self, image: &ImageRef) -> Option<usize>;

    /// Image at `position`
    fn get(&self, position: usize) -> Option<&ImageRef>;

    /// Number of known images
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single grid entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub image: ImageRef,
    /// Seed the image URL was generated from
    pub seed: u64,
}

/// Paginated catalog of generated placeholder images
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    config: CatalogConfig,
    entries: Vec<CatalogEntry>,
    /// Number of pages loaded so far
    pages_loaded: u64,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
            pages_loaded: 0,
        }
    }

    /// Append the next page of images
    ///
    /// Returns the positions of the new entries, or `None` once `max_pages`
    /// pages have been loaded.
    pub fn load_next_page(&mut self) -> Option<Range<usize>> {
        if self.pages_loaded >= self.config.max_pages {
            return None;
        }

        let page_size = self.config.page_size as u64;
        let first_seed = self.pages_loaded * page_size;
        let start = self.entries.len();

        self.entries.extend((first_seed..first_seed + page_size).map(|seed| CatalogEntry {
            image: ImageRef::new(self.config.image_url(seed)),
            seed,
        }));
        self.pages_loaded += 1;

        tracing::debug!(
            page = self.pages_loaded,
            first_seed,
            total = self.entries.len(),
            "Loaded catalog page"
        );
        Some(start..self.entries.len())
    }

    /// Load pages until at least `pages` have been loaded
    ///
    /// Nothing is loaded when `pages` exceeds the configured limit.
    pub fn load_pages(&mut self, pages: u64) -> Result<(), CatalogError> {
        let max = self.config.max_pages;
        if pages > max {
            return Err(CatalogError::PageLimit {
                requested: pages,
                max,
            });
        }
        while self.pages_loaded < pages && self.load_next_page().is_some() {}
        Ok(())
    }

    /// Load pages until `position` exists and return the image there
    pub fn load_through(&mut self, position: usize) -> Result<&ImageRef, CatalogError> {
        let page_size = self.config.page_size;
        if page_size == 0 {
            return Err(CatalogError::EmptyPages);
        }

        let capacity = self.config.max_pages.saturating_mul(page_size as u64);
        if position as u64 >= capacity {
            return Err(CatalogError::PositionOutOfRange {
                position,
                last: capacity.saturating_sub(1) as usize,
            });
        }

        self.load_pages((position / page_size) as u64 + 1)?;
        let last = self.entries.len().saturating_sub(1);
        self.get(position)
            .ok_or(CatalogError::PositionOutOfRange { position, last })
    }

    pub fn pages_loaded(&self) -> u64 {
        self.pages_loaded
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl ImageCatalog for Catalog {
    fn resolve_position(&self, image: &ImageRef) -> Option<usize> {
        self.entries.iter().position(|e| &e.image == image)
    }

    fn get(&self, position: usize) -> Option<&ImageRef> {
        self.entries.get(position).map(|e| &e.image)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = Catalog::new(CatalogConfig::default());
        assert!(catalog.is_empty());
        assert_eq!(catalog.pages_loaded(), 0);
        assert_eq!(catalog.get(0), None);
    }

    #[test]
    fn test_load_next_page_appends() {
        let mut catalog = Catalog::new(CatalogConfig::default());

        assert_eq!(catalog.load_next_page(), Some(0..12));
        assert_eq!(catalog.load_next_page(), Some(12..24));
        assert_eq!(catalog.len(), 24);

        // Seeds continue across pages
        assert_eq!(catalog.entries()[12].seed, 12);
        assert_eq!(
            catalog.get(12).map(ImageRef::as_str),
            Some("https://picsum.photos/seed/12/500/380")
        );
    }

    #[test]
    fn test_load_pages_is_idempotent() {
        let mut catalog = Catalog::new(CatalogConfig {
            page_size: 4,
            ..CatalogConfig::default()
        });
        catalog.load_pages(3).unwrap();
        catalog.load_pages(2).unwrap();
        assert_eq!(catalog.pages_loaded(), 3);
        assert_eq!(catalog.len(), 12);
    }

    #[test]
    fn test_load_pages_beyond_limit() {
        let mut catalog = Catalog::new(CatalogConfig {
            max_pages: 3,
            ..CatalogConfig::default()
        });

        assert_eq!(
            catalog.load_pages(1_000_000_000),
            Err(CatalogError::PageLimit {
                requested: 1_000_000_000,
                max: 3
            })
        );
        // Rejected up front, nothing was loaded
        assert!(catalog.is_empty());

        catalog.load_pages(3).unwrap();
        assert_eq!(catalog.load_next_page(), None);
        assert_eq!(catalog.len(), 36);
    }

    #[test]
    fn test_load_through_loads_needed_pages() {
        let mut catalog = Catalog::new(CatalogConfig::default());

        let image = catalog.load_through(13).cloned().unwrap();
        assert_eq!(catalog.pages_loaded(), 2);
        assert_eq!(image.as_str(), "https://picsum.photos/seed/13/500/420");

        // Already loaded positions don't load more
        catalog.load_through(0).unwrap();
        assert_eq!(catalog.pages_loaded(), 2);
    }

    #[test]
    fn test_load_through_rejects_huge_position() {
        let mut catalog = Catalog::new(CatalogConfig {
            max_pages: 2,
            ..CatalogConfig::default()
        });

        assert_eq!(
            catalog.load_through(999_999_999_999).unwrap_err(),
            CatalogError::PositionOutOfRange {
                position: 999_999_999_999,
                last: 23
            }
        );
        assert!(catalog.is_empty());

        // The last loadable position still works
        assert!(catalog.load_through(23).is_ok());
    }

    #[test]
    fn test_load_through_empty_pages() {
        let mut catalog = Catalog::new(CatalogConfig {
            page_size: 0,
            ..CatalogConfig::default()
        });
        assert_eq!(catalog.load_through(0).unwrap_err(), CatalogError::EmptyPages);
    }

    #[test]
    fn test_resolve_position() {
        let mut catalog = Catalog::new(CatalogConfig::default());
        catalog.load_next_page();

        let image = catalog.get(5).cloned().unwrap();
        assert_eq!(catalog.resolve_position(&image), Some(5));
        assert_eq!(
            catalog.resolve_position(&ImageRef::from("https://elsewhere/img.jpg")),
            None
        );
    }
}
