use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use glob::{glob, GlobResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Configuration for document discovery behavior
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// File name pattern, relative to the searched directory
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            pattern: "*.json".to_string(),
        }
    }
}

/// Result of document discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Expand `<root_dir>/<pattern>`; the root is escaped so its own characters never act as
/// glob syntax
fn glob_entries(root_dir: &Path, pattern: &str) -> Result<Vec<GlobResult>> {
    let full_pattern = format!("{}/{}", glob::Pattern::escape(&root_dir.display().to_string()), pattern);
    debug!("Expanding document pattern: {}", full_pattern);

    let paths = glob(&full_pattern).map_err(|e| anyhow::anyhow!("Invalid document pattern {full_pattern}: {e}"))?;
    Ok(paths.collect())
}

/// Lists the files matching `config.pattern` directly under `root_dir` and validates
/// each one as the stream is polled.
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_dir = root_dir.as_ref();
    let entries: Vec<Result<GlobResult>> = match glob_entries(root_dir, &config.pattern) {
        Ok(entries) => {
            info!("Found {} candidate documents in {}", entries.len(), root_dir.display());
            entries.into_iter().map(Ok).collect()
        }
        Err(e) => vec![Err(e)],
    };

    let fail_fast = config.fail_fast;
    stream::iter(entries).then(move |entry| validate_entry(entry, fail_fast))
}

fn invalid(path: PathBuf, error: String, fail_fast: bool) -> Result<FileValidation> {
    warn!("{}", error);
    if fail_fast {
        anyhow::bail!(error);
    }
    Ok(FileValidation {
        path,
        error: Some(error),
    })
}

async fn validate_entry(entry: Result<GlobResult>, fail_fast: bool) -> Result<FileValidation> {
    let path = match entry? {
        Ok(path) => path,
        Err(e) => {
            let error = format!("Cannot read {}: {}", e.path().display(), e.error());
            return invalid(e.path().to_path_buf(), error, fail_fast);
        }
    };

    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {
            debug!("Found document: {}", path.display());
            Ok(FileValidation { path, error: None })
        }
        // A directory named like a document is reported but never fatal
        Ok(_) => {
            let error = format!("Path is not a file: {}", path.display());
            invalid(path, error, false)
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            invalid(path, error, fail_fast)
        }
    }
}

/// Collect all discovered files, sorted by path
pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(discover_files(root_dir, config));

    while let Some(result) = stream.next().await {
        files.push(result?);
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;

    if invalid_count > 0 {
        warn!("Found {} documents with validation issues", invalid_count);
    }
    info!("Document discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Paths of all valid documents under `root_dir`
pub async fn find_documents<P: AsRef<Path>>(root_dir: P, config: DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let validations = collect_discovered_files(root_dir, config).await?;

    Ok(validations
        .into_iter()
        .filter(|v| v.error.is_none())
        .map(|v| v.path)
        .collect())
}
