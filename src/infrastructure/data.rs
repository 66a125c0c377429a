//! Source-corpus utilities: discovering input files and fetching the
//! default corpus.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{DomainError, Result};
use crate::infrastructure::config::DEFAULT_DATA_FILES;

/// Download locations for the default commentary corpus.
pub const DEFAULT_DATA_URLS: [(&str, &str); 2] = [
    (
        "majmaolbayan.txt",
        "https://filedn.eu/l1MYFwJMIh4Y60BIIrYyMiy/Quran_Persian_QA/majmaolbayan.txt",
    ),
    (
        "alborhan.txt",
        "https://filedn.eu/l1MYFwJMIh4Y60BIIrYyMiy/Quran_Persian_QA/alborhan.txt",
    ),
];

/// Finds the input files for an index build.
///
/// If any preferred default-named file exists in `data_dir`, exactly the
/// existing preferred files are returned in canonical order; otherwise all
/// `*.txt` files, sorted lexicographically by path.
pub fn find_text_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let preferred: Vec<PathBuf> = DEFAULT_DATA_FILES
        .iter()
        .map(|name| data_dir.join(name))
        .filter(|path| path.is_file())
        .collect();
    if !preferred.is_empty() {
        return Ok(preferred);
    }

    let entries = match std::fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(DomainError::internal(format!(
                "cannot read data dir '{}': {e}",
                data_dir.display()
            )))
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    Ok(files)
}

/// Fetches the default corpus files into `data_dir`, keeping any that
/// already exist. Returns the paths in canonical order.
pub async fn download_default_data(data_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| DomainError::internal(format!("cannot create data dir: {e}")))?;

    let client = reqwest::Client::new();
    let mut downloaded = Vec::with_capacity(DEFAULT_DATA_URLS.len());

    for (name, url) in DEFAULT_DATA_URLS {
        let destination = data_dir.join(name);
        if destination.is_file() {
            downloaded.push(destination);
            continue;
        }

        info!(file = name, url, "downloading default corpus file");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("download of '{name}' failed: {e}")))?;
        if !response.status().is_success() {
            return Err(DomainError::external(format!(
                "download of '{name}' failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::external(format!("download of '{name}' failed: {e}")))?;
        std::fs::write(&destination, &bytes)
            .map_err(|e| DomainError::internal(format!("cannot write '{name}': {e}")))?;
        downloaded.push(destination);
    }

    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "content").unwrap();
        path
    }

    #[test]
    fn test_discovery_prefers_default_names() {
        let dir = tempfile::tempdir().unwrap();
        let preferred = touch(dir.path(), DEFAULT_DATA_FILES[0]);
        touch(dir.path(), "other.txt");

        let files = find_text_files(dir.path()).unwrap();
        assert_eq!(files, vec![preferred]);
    }

    #[test]
    fn test_discovery_falls_back_to_sorted_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        let b = touch(dir.path(), "b.txt");
        let a = touch(dir.path(), "a.txt");
        touch(dir.path(), "notes.md");

        let files = find_text_files(dir.path()).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_discovery_missing_dir_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let files = find_text_files(&missing).unwrap();
        assert!(files.is_empty());
    }
}
