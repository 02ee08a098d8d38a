// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace so each integration test
// can write, load, and save configuration files without touching the real
// filesystem or each other.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use inicfg::{Document, Section};

/// An isolated directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct Workspace {
    /// Temporary directory holding the test files.
    pub root: tempfile::TempDir,
}

impl Workspace {
    /// Create a new, empty workspace.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Absolute path of `name` inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write `content` to `name` and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    /// Read `path` back as text.
    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("read file")
    }
}

/// Fluent builder for documents assembled through the mutation API.
pub struct DocBuilder {
    doc: Document,
}

impl DocBuilder {
    /// Begin with an empty document.
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
        }
    }

    /// Append a section holding `pairs` in order.
    pub fn section(mut self, name: &str, pairs: &[(&str, &str)]) -> Self {
        let section = self.doc.add_section(name).expect("add section");
        for (key, value) in pairs {
            section.add_key(key, value).expect("add key");
        }
        self
    }

    /// Finish building.
    pub fn build(self) -> Document {
        self.doc
    }
}

/// Flatten a document into `(section, [(key, value)])` tuples for
/// order-sensitive comparison.
pub fn shape(doc: &Document) -> Vec<(String, Vec<(String, String)>)> {
    doc.sections().iter().map(section_shape).collect()
}

fn section_shape(section: &Section) -> (String, Vec<(String, String)>) {
    (
        section.name().to_string(),
        section
            .entries()
            .iter()
            .map(|kv| (kv.key().to_string(), kv.value().to_string()))
            .collect(),
    )
}

/// Route `tracing` output from the library through the test harness for the
/// lifetime of the returned guard.
pub fn capture_logs() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("inicfg=trace"))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}
