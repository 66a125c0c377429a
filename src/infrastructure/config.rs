//! Process configuration: defaults overridden by environment, built once at
//! startup and passed explicitly. Components never read env vars themselves.

use std::env;
use std::path::PathBuf;

/// Preferred corpus file names, in canonical order.
pub const DEFAULT_DATA_FILES: [&str; 2] = ["majmaolbayan.txt", "alborhan.txt"];

pub const DEFAULT_EMBED_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";
pub const DEFAULT_COLLECTION_NAME: &str = "quran_persian_collection";
pub const DEFAULT_PERSIST_DIR: &str = "artifacts/vector_index";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LLM_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub persist_dir: PathBuf,
    pub data_dir: PathBuf,
    pub collection_name: String,
    pub embed_model: String,
    pub llm_model: String,
    pub openrouter_base_url: String,
    pub openrouter_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            persist_dir: PathBuf::from(DEFAULT_PERSIST_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            openrouter_api_key: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            persist_dir: path_from_env("QPQ_INDEX_DIR", defaults.persist_dir),
            data_dir: path_from_env("QPQ_DATA_DIR", defaults.data_dir),
            collection_name: string_from_env("QPQ_COLLECTION_NAME", defaults.collection_name),
            embed_model: string_from_env("QPQ_EMBED_MODEL", defaults.embed_model),
            llm_model: string_from_env("OPENROUTER_MODEL", defaults.llm_model),
            openrouter_base_url: string_from_env(
                "OPENROUTER_BASE_URL",
                defaults.openrouter_base_url,
            ),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
        }
    }
}

fn path_from_env(key: &str, default: PathBuf) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn string_from_env(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.collection_name, DEFAULT_COLLECTION_NAME);
        assert_eq!(config.embed_model, DEFAULT_EMBED_MODEL);
        assert_eq!(config.persist_dir, PathBuf::from(DEFAULT_PERSIST_DIR));
        assert!(config.openrouter_api_key.is_none());
    }
}
