use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

/// Configuration for document reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 64KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics for one document read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Async reader that loads and parses JSON documents
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    fn failure<T>(&self, path: &Path, error_msg: String, bytes_read: u64, start: std::time::Instant) -> Result<(Option<T>, ReadStats)> {
        warn!("{}", error_msg);

        if self.config.fail_fast {
            return Err(anyhow::anyhow!(error_msg));
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read,
            duration_ms: start.elapsed().as_millis() as u64,
            read_error: Some(error_msg),
        };
        Ok((None, stats))
    }

    /// Read and parse one JSON document
    ///
    /// Without `fail_fast`, I/O, UTF-8 and JSON errors are reported in the stats and the
    /// document is `None`; with `fail_fast` they are returned as errors.
    pub async fn read_document<T, P>(&self, file_path: P) -> Result<(Option<T>, ReadStats)>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of document: {}", path.display());

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                let error_msg = format!("Failed to open file {}: {}", path.display(), e);
                return self.failure(path, error_msg, 0, start_time);
            }
        };

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut content = String::new();
        if let Err(e) = reader.read_to_string(&mut content).await {
            let error_msg = format!("UTF-8 decoding error in {}: {}", path.display(), e);
            return self.failure(path, error_msg, content.len() as u64, start_time);
        }

        let bytes_read = content.len() as u64;
        let document = match serde_json::from_str::<T>(&content) {
            Ok(document) => document,
            Err(e) => {
                let error_msg = format!("Invalid JSON in {}: {}", path.display(), e);
                return self.failure(path, error_msg, bytes_read, start_time);
            }
        };

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };

        info!(
            "Successfully read {}: {} bytes in {}ms",
            path.display(),
            bytes_read,
            stats.duration_ms
        );

        Ok((Some(document), stats))
    }
}

/// Read a single document with default configuration, failing on any error
pub async fn read_document_async<T, P>(file_path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let reader = DocumentReader::new(ReaderConfig {
        fail_fast: true,
        ..Default::default()
    });
    let path = file_path.as_ref();
    let (document, _stats) = reader.read_document(path).await?;
    document.ok_or_else(|| anyhow::anyhow!("No document read from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SourceDocument;
    use tempfile::TempDir;
    use tokio::fs;

    async fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> Result<std::path::PathBuf> {
        let file_path = dir.join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_read_valid_document() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig::default());

        let content = r#"{"title": "रघुवंशम्", "data": [{"c": "1", "n": "1", "v": "वागर्थाविव", "mn": "इति।"}]}"#;
        let file_path = create_test_file(temp_dir.path(), "doc.json", content.as_bytes()).await.unwrap();

        let (doc, stats) = reader.read_document::<SourceDocument, _>(&file_path).await.unwrap();
        let doc = doc.unwrap();

        assert_eq!(doc.title, "रघुवंशम्");
        assert_eq!(doc.data.len(), 1);
        assert_eq!(stats.bytes_read, content.len() as u64);
        assert!(stats.read_error.is_none());
    }

    #[tokio::test]
    async fn test_read_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig { fail_fast: false, ..Default::default() });

        let file_path = temp_dir.path().join("nonexistent.json");
        let (doc, stats) = reader.read_document::<SourceDocument, _>(&file_path).await.unwrap();

        assert!(doc.is_none());
        assert!(stats.read_error.is_some());
    }

    #[tokio::test]
    async fn test_read_nonexistent_file_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig { fail_fast: true, ..Default::default() });

        let file_path = temp_dir.path().join("nonexistent.json");
        let result = reader.read_document::<SourceDocument, _>(&file_path).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_reported() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig::default());

        let file_path = create_test_file(temp_dir.path(), "bad.json", &[0xFF, 0xFE, 0xFD]).await.unwrap();
        let (doc, stats) = reader.read_document::<SourceDocument, _>(&file_path).await.unwrap();

        assert!(doc.is_none());
        assert!(stats.read_error.unwrap().contains("UTF-8"));
    }

    #[tokio::test]
    async fn test_invalid_json_reported() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig::default());

        let file_path = create_test_file(temp_dir.path(), "broken.json", b"{\"data\": [").await.unwrap();
        let (doc, stats) = reader.read_document::<SourceDocument, _>(&file_path).await.unwrap();

        assert!(doc.is_none());
        assert!(stats.read_error.unwrap().contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn test_small_buffer_reads_whole_document() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig { fail_fast: false, buffer_size: 16 });

        let commentary = "अ".repeat(2048);
        let content = format!(r#"{{"title": "t", "data": [{{"c": 1, "n": 1, "mn": "{commentary}"}}]}}"#);
        let file_path = create_test_file(temp_dir.path(), "large.json", content.as_bytes()).await.unwrap();

        let doc: SourceDocument = read_document_async(&file_path).await.unwrap();
        assert_eq!(doc.data[0].mn.as_deref(), Some(commentary.as_str()));

        let (_, stats) = reader.read_document::<SourceDocument, _>(&file_path).await.unwrap();
        assert!(stats.read_error.is_none());
    }
}
