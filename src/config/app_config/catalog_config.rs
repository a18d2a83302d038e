use serde::{Deserialize, Serialize};

/// Images appended per page of the infinite grid
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Upper bound on pages a catalog will load
pub const DEFAULT_MAX_PAGES: u64 = 100;

/// Placeholder image service the grid draws from
pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> u64 {
    DEFAULT_MAX_PAGES
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_width() -> u32 {
    500
}

fn default_base_height() -> u32 {
    300
}

fn default_height_step() -> u32 {
    40
}

fn default_height_variants() -> u32 {
    10
}

/// Configuration for catalog paging and image URL shape
///
/// Image heights cycle through `height_variants` steps above `base_height`
/// to give the grid its staggered look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Requests needing more pages than this are rejected
    #[serde(default = "default_max_pages")]
    pub max_pages: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_base_height")]
    pub base_height: u32,
    #[serde(default = "default_height_step")]
    pub height_step: u32,
    #[serde(default = "default_height_variants")]
    pub height_variants: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            base_url: default_base_url(),
            width: default_width(),
            base_height: default_base_height(),
            height_step: default_height_step(),
            height_variants: default_height_variants(),
        }
    }
}

impl CatalogConfig {
    /// Image URL for a given seed
    pub fn image_url(&self, seed: u64) -> String {
        let variant = seed % u64::from(self.height_variants.max(1));
        let height = u64::from(self.base_height) + variant * u64::from(self.height_step);
        format!(
            "{}/seed/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            seed,
            self.width,
            height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_heights_cycle() {
        let config = CatalogConfig::default();
        assert_eq!(config.image_url(0), "https://picsum.photos/seed/0/500/300");
        assert_eq!(config.image_url(3), "https://picsum.photos/seed/3/500/420");
        assert_eq!(config.image_url(13), "https://picsum.photos/seed/13/500/420");
    }

    #[test]
    fn test_image_url_trailing_slash_and_zero_variants() {
        let config = CatalogConfig {
            base_url: "http://localhost:8080/".to_string(),
            height_variants: 0,
            ..CatalogConfig::default()
        };
        assert_eq!(config.image_url(7), "http://localhost:8080/seed/7/500/300");
    }
}
