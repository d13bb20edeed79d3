//! Persisting the document.
//!
//! The document is written once, when the process winds down. Hosts either
//! call [`DocumentWriter::flush`] from their shutdown hook or keep a
//! [`FlushGuard`] alive for the lifetime of the server.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use herodotus_telemetry::metrics;

use crate::aggregator::DocumentAggregator;
use crate::document::DocumentHeader;
use crate::error::{DocsError, DocsResult};

/// Result of a flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// No traffic was observed; the filesystem was not touched.
    Skipped,
    /// The document was written.
    Written {
        /// Output path.
        path: PathBuf,
        /// Bytes written.
        bytes: usize,
    },
}

/// Serializes the aggregated document to a fixed path.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    header: DocumentHeader,
    path: PathBuf,
    pretty: bool,
}

impl DocumentWriter {
    /// Creates a writer producing compact JSON at `path`.
    #[must_use]
    pub fn new(header: DocumentHeader, path: impl Into<PathBuf>) -> Self {
        Self {
            header,
            path: path.into(),
            pretty: false,
        }
    }

    /// Switches between pretty and compact output.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header block written above the paths.
    #[must_use]
    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    /// Serializes the current document without writing it.
    pub fn render(&self, aggregator: &DocumentAggregator) -> DocsResult<String> {
        let document = self.header.document(aggregator.snapshot());
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(rendered)
    }

    /// Writes the document, overwriting any previous file.
    ///
    /// Does nothing if the aggregator never saw an observation.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::Serialization`] or [`DocsError::Io`]; failures are
    /// not retried.
    pub fn flush(&self, aggregator: &DocumentAggregator) -> DocsResult<FlushOutcome> {
        if !aggregator.has_observations() {
            metrics::record_flush("skipped");
            tracing::debug!("No traffic observed, documentation not written");
            return Ok(FlushOutcome::Skipped);
        }

        match self.write(aggregator) {
            Ok(bytes) => {
                metrics::record_flush("written");
                tracing::info!(
                    output_path = %self.path.display(),
                    bytes,
                    paths = aggregator.len(),
                    "Documentation written"
                );
                Ok(FlushOutcome::Written {
                    path: self.path.clone(),
                    bytes,
                })
            }
            Err(e) => {
                metrics::record_flush("failed");
                Err(e)
            }
        }
    }

    fn write(&self, aggregator: &DocumentAggregator) -> DocsResult<usize> {
        let rendered = self.render(aggregator)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
        }
        fs::write(&self.path, rendered.as_bytes()).map_err(|e| DocsError::io(&self.path, e))?;
        Ok(rendered.len())
    }
}

/// Flushes the document when dropped.
///
/// ```rust,ignore
/// let _guard = FlushGuard::new(writer, aggregator);
/// server.run().await?;
/// // document written here, when `_guard` goes out of scope
/// ```
#[derive(Debug)]
pub struct FlushGuard {
    writer: Arc<DocumentWriter>,
    aggregator: Arc<DocumentAggregator>,
    flushed: bool,
}

impl FlushGuard {
    /// Creates a guard over `writer` and `aggregator`.
    #[must_use]
    pub fn new(writer: Arc<DocumentWriter>, aggregator: Arc<DocumentAggregator>) -> Self {
        Self {
            writer,
            aggregator,
            flushed: false,
        }
    }

    /// Flushes now and disarms the guard.
    pub fn finish(mut self) -> DocsResult<FlushOutcome> {
        self.flushed = true;
        self.writer.flush(&self.aggregator)
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;
        if let Err(e) = self.writer.flush(&self.aggregator) {
            tracing::error!(
                output_path = %self.writer.path().display(),
                error = %e,
                "Failed to write documentation"
            );
        }
    }
}
