// WHY: Output naming and skip checks so re-runs only extract documents without output

use std::path::{Path, PathBuf};

/// Document name derived from the source file stem (`raghuvansham.json` -> `raghuvansham`)
pub fn document_name(source_path: &Path) -> String {
    source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Extract output path: `<output_dir>/<stem>_Extract.json`
pub fn generate_extract_path(output_dir: &Path, source_path: &Path) -> PathBuf {
    output_dir.join(format!("{}_Extract.json", document_name(source_path)))
}

/// Check if an extract already exists for the given source
pub fn extract_exists(output_dir: &Path, source_path: &Path) -> bool {
    generate_extract_path(output_dir, source_path).exists()
}

/// Whether a source needs (re)processing
pub fn should_process(output_dir: &Path, source_path: &Path, overwrite_all: bool) -> bool {
    overwrite_all || !extract_exists(output_dir, source_path)
}
