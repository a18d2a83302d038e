use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default slot holding the logged-in user
pub const DEFAULT_SESSION_KEY: &str = "session";

/// Default slot holding the liked images
pub const DEFAULT_LIKED_KEY: &str = "liked";

/// Default slot holding the saved images
pub const DEFAULT_SAVED_KEY: &str = "saved";

/// Names of the three persisted slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageKeys {
    pub session: String,
    pub liked: String,
    pub saved: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session: DEFAULT_SESSION_KEY.to_string(),
            liked: DEFAULT_LIKED_KEY.to_string(),
            saved: DEFAULT_SAVED_KEY.to_string(),
        }
    }
}

/// Configuration for where and under which keys state is persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Directory of the file store (None = platform data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub keys: StorageKeys,
}
