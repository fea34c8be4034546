//! The reference documents every answer is grounded in.
//!
//! Documents are read once from a folder, each prefixed with a
//! `--- <file name> ---` header, and joined into a single immutable
//! `KnowledgeContext` that is shared read-only by every session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::KnowledgeError;

/// Source of the aggregated knowledge text.
pub trait ContextRepository: Send + Sync {
    /// Full concatenated text of every loaded document, or `""` if none.
    fn context_text(&self) -> &str;

    /// Whether any usable knowledge is loaded.
    fn is_empty(&self) -> bool {
        self.context_text().trim().is_empty()
    }
}

/// Immutable aggregated knowledge text, cheap to clone and share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeContext {
    text: Arc<str>,
}

impl Default for KnowledgeContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl KnowledgeContext {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    /// A context with no documents ("no knowledge base" mode).
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ContextRepository for KnowledgeContext {
    fn context_text(&self) -> &str {
        &self.text
    }
}

/// Extracts plain text from one document format.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Reader name for logs.
    fn name(&self) -> &str;

    /// Whether this reader handles the given lower-case file extension.
    fn supports(&self, extension: &str) -> bool;

    /// Extract the document's text.
    async fn read(&self, path: &Path) -> Result<String, KnowledgeError>;
}

/// Reader for UTF-8 text and markdown files.
pub struct PlainTextReader;

#[async_trait]
impl DocumentReader for PlainTextReader {
    fn name(&self) -> &str {
        "plain_text"
    }

    fn supports(&self, extension: &str) -> bool {
        matches!(extension, "txt" | "md" | "markdown")
    }

    async fn read(&self, path: &Path) -> Result<String, KnowledgeError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| KnowledgeError::ReadFailed {
                name: file_name(path),
                reason: e.to_string(),
            })
    }
}

/// A document that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub document: String,
    pub reason: String,
}

/// Outcome of loading a knowledge folder.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub context: KnowledgeContext,
    /// Documents that contributed text, in load order.
    pub loaded: Vec<String>,
    /// Documents skipped because they contained only whitespace.
    pub blank: Vec<String>,
    /// Documents whose extraction failed.
    pub failures: Vec<LoadFailure>,
}

/// Loads every supported document in a folder into a `KnowledgeContext`.
pub struct KnowledgeLoader {
    root: PathBuf,
    readers: Vec<Arc<dyn DocumentReader>>,
}

impl KnowledgeLoader {
    /// Create a loader for `root` with the built-in text reader.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            readers: vec![Arc::new(PlainTextReader) as Arc<dyn DocumentReader>],
        }
    }

    /// Register an extra reader (e.g. PDF or DOCX extraction).
    pub fn with_reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.readers.push(reader);
        self
    }

    /// Read every document under the root folder.
    ///
    /// A missing folder is created and yields an empty context. A failure on
    /// one document is recorded in the report and loading continues; only a
    /// failure to list the folder itself is returned as an error.
    pub async fn load(&self) -> Result<LoadReport, KnowledgeError> {
        let mut report = LoadReport {
            context: KnowledgeContext::empty(),
            loaded: Vec::new(),
            blank: Vec::new(),
            failures: Vec::new(),
        };

        if !self.root.exists() {
            warn!(path = %self.root.display(), "Knowledge folder not found, creating it");
            fs::create_dir_all(&self.root).await?;
            return Ok(report);
        }

        let mut files = Vec::new();
        let mut read_dir = fs::read_dir(&self.root).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut blocks = Vec::new();
        for path in files {
            let name = file_name(&path);
            let Some(reader) = self.reader_for(&path) else {
                debug!(document = %name, "Skipping unsupported document");
                continue;
            };

            match reader.read(&path).await {
                Ok(text) if text.trim().is_empty() => {
                    debug!(document = %name, "Skipping blank document");
                    report.blank.push(name);
                }
                Ok(text) => {
                    debug!(document = %name, reader = reader.name(), chars = text.len(), "Loaded document");
                    blocks.push(format!("--- {name} ---\n{text}"));
                    report.loaded.push(name);
                }
                Err(e) => {
                    warn!(document = %name, error = %e, "Failed to read document");
                    report.failures.push(LoadFailure {
                        document: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.context = KnowledgeContext::new(blocks.join("\n\n"));
        info!(
            documents = report.loaded.len(),
            failures = report.failures.len(),
            chars = report.context.context_text().len(),
            "Knowledge base loaded"
        );
        Ok(report)
    }

    fn reader_for(&self, path: &Path) -> Option<&Arc<dyn DocumentReader>> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        self.readers.iter().find(|r| r.supports(&extension))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
