// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use prayoga::ExtractDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for a temporary corpus: `In/` sources and `extract/` outputs
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root_path.join("In")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root_path.join("extract")
    }

    /// Write a source document under `In/`
    pub fn create_source_document(&self, file_name: &str, content: &str) -> PathBuf {
        self.create_file(self.input_dir().join(file_name), content)
    }

    /// Write any file below the fixture root
    pub fn create_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Extract path matching the pipeline's naming
    pub fn extract_path(&self, document_name: &str) -> PathBuf {
        self.output_dir().join(format!("{document_name}_Extract.json"))
    }

    pub fn extract_exists(&self, document_name: &str) -> bool {
        self.extract_path(document_name).exists()
    }

    pub fn read_extract(&self, document_name: &str) -> ExtractDocument {
        let content = fs::read_to_string(self.extract_path(document_name)).expect("Failed to read extract");
        serde_json::from_str(&content).expect("Extract should be valid JSON")
    }
}

/// One line per sutra sentence: index<TAB>loc<TAB>sutra<TAB>sentence
pub fn format_sutra_sentences(document: &ExtractDocument) -> String {
    document
        .sentences()
        .enumerate()
        .map(|(i, (entry, s))| format!("{}\t{}\t{}\t{}", i, entry.loc, s.sutra, s.sentence))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines\nActual:\n{}",
            context,
            expected_lines.len(),
            actual_lines.len(),
            actual
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
