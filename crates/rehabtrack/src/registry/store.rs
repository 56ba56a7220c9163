//! Durable storage for the registry document.
//!
//! The whole registry is one JSON object keyed by username. Loading never
//! fails: a missing or unparseable document yields an empty registry. A record
//! that is valid JSON but not a valid account is kept verbatim and written back
//! on save. Saving replaces the whole document.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::error::{Error, Result};

/// All accounts, keyed by username.
pub type Accounts = BTreeMap<String, Account>;

/// Records that could not be read as accounts, keyed by username.
pub type RawRecords = BTreeMap<String, Value>;

/// The registry document: readable accounts plus records kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Records that decoded into accounts.
    pub accounts: Accounts,
    /// Records that did not, preserved for the next save.
    pub unreadable: RawRecords,
}

impl Document {
    /// Check if the document holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.unreadable.is_empty()
    }

    /// Check if any record, readable or not, uses `username`.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(username) || self.unreadable.contains_key(username)
    }
}

impl From<Accounts> for Document {
    fn from(accounts: Accounts) -> Self {
        Self {
            accounts,
            unreadable: RawRecords::new(),
        }
    }
}

/// One entry of the written document.
#[derive(Serialize)]
#[serde(untagged)]
enum Record<'a> {
    Account(&'a Account),
    Raw(&'a Value),
}

/// Where the registry document lives.
pub trait Store: Debug + Send + Sync {
    /// Read the full registry.
    ///
    /// A missing or unparseable document is treated as an empty registry.
    fn load(&self) -> Document;

    /// Replace the stored document with `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save(&self, document: &Document) -> Result<()>;

    /// Human-readable location of the document, for status output.
    fn location(&self) -> String;
}

/// Render the registry as the pretty-printed document stored on disk.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_document(document: &Document) -> Result<Vec<u8>> {
    let records: BTreeMap<&str, Record<'_>> = document
        .unreadable
        .iter()
        .map(|(username, raw)| (username.as_str(), Record::Raw(raw)))
        .chain(
            document
                .accounts
                .iter()
                .map(|(username, account)| (username.as_str(), Record::Account(account))),
        )
        .collect();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Parse a registry document.
///
/// A document that is not a JSON object gives an empty registry. Inside an
/// object, each record is decoded on its own; records that fail are kept raw.
#[must_use]
pub fn from_document(source: &str, bytes: &[u8]) -> Document {
    let records = match serde_json::from_slice::<BTreeMap<String, Value>>(bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!("Registry at {} is malformed ({}); starting empty", source, e);
            return Document::default();
        }
    };

    let mut document = Document::default();
    for (username, raw) in records {
        match Account::deserialize(&raw) {
            Ok(account) => {
                document.accounts.insert(username, account);
            }
            Err(e) => {
                warn!(
                    "Record '{}' in {} is not a valid account ({}); keeping it unchanged",
                    username, source, e
                );
                document.unreadable.insert(username, raw);
            }
        }
    }

    debug!(
        "Loaded {} accounts ({} unreadable) from {}",
        document.accounts.len(),
        document.unreadable.len(),
        source
    );
    document
}

/// Registry stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the registry document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary sibling the document is written to before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::StorageWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Document {
        match std::fs::read(&self.path) {
            Ok(bytes) => from_document(&self.path.display().to_string(), &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No registry at {}; starting empty",
                    self.path.display()
                );
                Document::default()
            }
            Err(e) => {
                warn!(
                    "Could not read registry at {} ({}); starting empty",
                    self.path.display(),
                    e
                );
                Document::default()
            }
        }
    }

    fn save(&self, document: &Document) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let bytes = to_document(document)?;
        let staging = self.staging_path();

        let written = std::fs::File::create(&staging).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&staging);
            return Err(self.write_error(e));
        }

        if let Err(e) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(self.write_error(e));
        }

        debug!(
            "Saved {} accounts to {}",
            document.accounts.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Registry document held in memory, for tests and embedding.
///
/// The document goes through the same JSON encoding as [`JsonFileStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `document`.
    #[must_use]
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into().into_bytes())),
        }
    }

    /// The last document saved, if any.
    #[must_use]
    pub fn document(&self) -> Option<String> {
        self.bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    fn bytes(&self) -> Option<Vec<u8>> {
        self.document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Document {
        match self.bytes() {
            Some(bytes) => from_document(":memory:", &bytes),
            None => Document::default(),
        }
    }

    fn save(&self, document: &Document) -> Result<()> {
        let bytes = to_document(document)?;
        *self
            .document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(bytes);
        Ok(())
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}
