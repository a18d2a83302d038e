// Config module - user configuration loaded from config.json

mod app_config;
pub use app_config::*;
