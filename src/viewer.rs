use crate::catalog::ImageCatalog;
use crate::collection::ImageRef;

/// Lightbox cursor over the catalog
///
/// Navigation is bounded: `next` at the last image and `prev` at the first
/// are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    current_index: usize,
    open: bool,
}

impl Lightbox {
    /// Create a closed lightbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the image at `position`
    ///
    /// Returns `None` (and leaves the lightbox untouched) if the position is out of range.
    pub fn open<'a, C: ImageCatalog>(
        &mut self,
        position: usize,
        catalog: &'a C,
    ) -> Option<&'a ImageRef> {
        let image = catalog.get(position)?;
        self.current_index = position;
        self.open = true;
        Some(image)
    }

    /// Show a specific image, e.g. an entry picked from the liked page
    pub fn open_image<'a, C: ImageCatalog>(
        &mut self,
        image: &ImageRef,
        catalog: &'a C,
    ) -> Option<&'a ImageRef> {
        let position = catalog.resolve_position(image)?;
        self.open(position, catalog)
    }

    /// Hide the lightbox; the last position is kept
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Check if we can go back
    pub fn can_go_prev(&self) -> bool {
        self.open && self.current_index > 0
    }

    /// Check if we can go forward
    pub fn can_go_next<C: ImageCatalog>(&self, catalog: &C) -> bool {
        self.open && self.current_index < catalog.len().saturating_sub(1)
    }

    /// Move to the next image, returns it if the cursor moved
    pub fn next<'a, C: ImageCatalog>(&mut self, catalog: &'a C) -> Option<&'a ImageRef> {
        if !self.can_go_next(catalog) {
            return None;
        }
        self.current_index += 1;
        catalog.get(self.current_index)
    }

    /// Move to the previous image, returns it if the cursor moved
    pub fn prev<'a, C: ImageCatalog>(&mut self, catalog: &'a C) -> Option<&'a ImageRef> {
        if !self.can_go_prev() {
            return None;
        }
        self.current_index -= 1;
        catalog.get(self.current_index)
    }

    /// Position of the shown image
    pub fn current_index(&self) -> Option<usize> {
        self.open.then_some(self.current_index)
    }

    /// Image currently shown
    pub fn current<'a, C: ImageCatalog>(&self, catalog: &'a C) -> Option<&'a ImageRef> {
        catalog.get(self.current_index()?)
    }

    /// Suggested file name when downloading the shown image (1-based)
    pub fn download_file_name(&self) -> Option<String> {
        self.current_index()
            .map(|index| format!("image-{}.jpg", index + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::CatalogConfig;

    fn catalog_with(size: usize) -> Catalog {
        let mut catalog = Catalog::new(CatalogConfig {
            page_size: size,
            ..CatalogConfig::default()
        });
        catalog.load_next_page();
        catalog
    }

    #[test]
    fn test_new_lightbox_is_closed() {
        let catalog = catalog_with(3);
        let lightbox = Lightbox::new();
        assert!(!lightbox.is_open());
        assert_eq!(lightbox.current(&catalog), None);
        assert!(!lightbox.can_go_prev());
        assert!(!lightbox.can_go_next(&catalog));
        assert_eq!(lightbox.download_file_name(), None);
    }

    #[test]
    fn test_open_out_of_range() {
        let catalog = catalog_with(3);
        let mut lightbox = Lightbox::new();
        assert_eq!(lightbox.open(3, &catalog), None);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_navigation_is_bounded() {
        let catalog = catalog_with(3);
        let mut lightbox = Lightbox::new();
        lightbox.open(0, &catalog).unwrap();

        assert!(!lightbox.can_go_prev());
        assert_eq!(lightbox.prev(&catalog), None);

        assert_eq!(lightbox.next(&catalog), catalog.get(1));
        assert_eq!(lightbox.next(&catalog), catalog.get(2));
        assert!(!lightbox.can_go_next(&catalog));
        // No wrap-around at the end
        assert_eq!(lightbox.next(&catalog), None);
        assert_eq!(lightbox.current_index(), Some(2));

        assert_eq!(lightbox.prev(&catalog), catalog.get(1));
    }

    #[test]
    fn test_open_image_resolves_position() {
        let catalog = catalog_with(5);
        let image = catalog.get(4).cloned().unwrap();
        let mut lightbox = Lightbox::new();

        assert_eq!(lightbox.open_image(&image, &catalog), Some(&image));
        assert_eq!(lightbox.current_index(), Some(4));
        assert_eq!(lightbox.download_file_name().as_deref(), Some("image-5.jpg"));

        // Unknown images leave the viewer as it was
        assert_eq!(
            lightbox.open_image(&ImageRef::from("https://elsewhere/x.jpg"), &catalog),
            None
        );
        assert_eq!(lightbox.current_index(), Some(4));
    }

    #[test]
    fn test_close_keeps_position() {
        let catalog = catalog_with(3);
        let mut lightbox = Lightbox::new();
        lightbox.open(1, &catalog);
        lightbox.close();
        assert_eq!(lightbox.current_index(), None);

        // Navigation is disabled while closed
        assert_eq!(lightbox.next(&catalog), None);
    }
}
