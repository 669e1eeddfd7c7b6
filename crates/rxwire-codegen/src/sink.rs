//! Artifact sinks
//!
//! A sink receives every artifact that passed validation, one file name and
//! its text at a time. Sinks never see rejected artifacts.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Receiver of validated artifacts
pub trait ArtifactSink {
    /// Store one artifact
    fn emit(&mut self, file_name: &str, text: &str) -> Result<()>;
}

/// Keeps artifacts in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, String>,
}

impl MemorySink {
    /// Text of an emitted artifact
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.files.get(file_name).map(String::as_str)
    }

    /// Emitted file names, sorted
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of emitted artifacts
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Take the emitted artifacts
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.files
    }
}

impl ArtifactSink for MemorySink {
    fn emit(&mut self, file_name: &str, text: &str) -> Result<()> {
        if self.files.contains_key(file_name) {
            return Err(Error::SinkError {
                file: file_name.to_string(),
                message: "an artifact with this name was already emitted".to_string(),
            });
        }
        self.files.insert(file_name.to_string(), text.to_string());
        Ok(())
    }
}

/// Manifest entry for one written artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// File name relative to the output directory
    pub file: String,

    /// Hex-encoded SHA-256 of the contents
    pub sha256: String,

    /// Size in bytes
    pub bytes: usize,
}

/// Writes artifacts into a directory
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: BTreeMap<String, ManifestEntry>,
}

impl DirectorySink {
    /// Name of the manifest written by [`DirectorySink::write_manifest`]
    pub const MANIFEST_FILE: &'static str = "manifest.json";

    /// Create a sink writing below `root`; the directory is created on demand
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: BTreeMap::new(),
        }
    }

    /// Output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries for every artifact written so far, sorted by file name
    pub fn manifest(&self) -> Vec<ManifestEntry> {
        self.written.values().cloned().collect()
    }

    /// Write `manifest.json` next to the artifacts
    pub fn write_manifest(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(Self::MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&self.manifest())?;
        std::fs::write(&path, json + "\n")?;
        Ok(path)
    }
}

impl ArtifactSink for DirectorySink {
    fn emit(&mut self, file_name: &str, text: &str) -> Result<()> {
        let is_plain_name = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !is_plain_name || file_name == Self::MANIFEST_FILE {
            return Err(Error::SinkError {
                file: file_name.to_string(),
                message: "not a plain artifact file name".to_string(),
            });
        }

        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(file_name);
        std::fs::write(&path, text)?;
        tracing::debug!("Wrote {}", path.display());

        self.written.insert(
            file_name.to_string(),
            ManifestEntry {
                file: file_name.to_string(),
                sha256: hex::encode(Sha256::digest(text.as_bytes())),
                bytes: text.len(),
            },
        );
        Ok(())
    }
}
