//! Storage layer for kennel.
//!
//! Each record lives in its own file, `<root>/<name>.<extension>`, holding the
//! raw body bytes and nothing else. The store keeps no cache and takes no locks;
//! two writers racing on the same name resolve as last-writer-wins.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{Record, RecordName};

/// Default file extension for record files.
pub const DEFAULT_EXTENSION: &str = "dog";

/// How [`RecordStore::save`] puts bytes on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Write a temp file next to the target and rename it into place.
    ///
    /// Readers see either the old body or the new one, never a partial write.
    #[default]
    Atomic,

    /// Truncate the target and write into it directly.
    InPlace,
}

/// File-per-record storage engine.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Directory holding the record files.
    root: PathBuf,
    /// Extension appended to every record name.
    extension: String,
    /// Strategy used by `save`.
    write_mode: WriteMode,
}

impl RecordStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(
        root: impl AsRef<Path>,
        extension: impl Into<String>,
        write_mode: WriteMode,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            fs::create_dir_all(&root).map_err(|source| Error::DirectoryCreate {
                path: root.clone(),
                source,
            })?;
        }

        info!("Record store opened at {}", root.display());
        Ok(Self {
            root,
            extension: extension.into(),
            write_mode,
        })
    }

    /// Get the directory holding the record files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the record file extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Get the configured write strategy.
    #[must_use]
    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Map a record name to the file that stores it.
    ///
    /// This is the only place a name becomes a path. It takes a
    /// [`RecordName`], so the component it joins is always plain alphanumerics.
    #[must_use]
    pub fn path_for(&self, name: &RecordName) -> PathBuf {
        self.root.join(format!("{name}.{}", self.extension))
    }

    /// Load the record stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if nothing has been saved under this
    /// name, or [`Error::RecordIo`] if the file exists but can't be read.
    pub fn load(&self, name: &RecordName) -> Result<Record> {
        let path = self.path_for(name);
        match fs::read(&path) {
            Ok(body) => {
                debug!("Loaded {} bytes from {}", body.len(), path.display());
                Ok(Record::new(name.clone(), body))
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(Error::RecordNotFound {
                    name: name.to_string(),
                })
            }
            Err(source) => Err(Error::RecordIo { path, source }),
        }
    }

    /// Save a record, creating its file or replacing the previous body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordIo`] if the body can't be written.
    pub fn save(&self, record: &Record) -> Result<()> {
        let path = self.path_for(&record.name);
        let written = match self.write_mode {
            WriteMode::Atomic => self.write_atomic(&path, &record.body),
            WriteMode::InPlace => write_in_place(&path, &record.body),
        };
        written.map_err(|source| Error::RecordIo {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} bytes to {}", record.body.len(), path.display());
        Ok(())
    }

    fn write_atomic(&self, path: &Path, body: &[u8]) -> io::Result<()> {
        // Same directory as the target so the rename never crosses filesystems.
        let mut temp = tempfile::Builder::new()
            .prefix(".kennel-")
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        temp.write_all(body)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

fn write_in_place(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(body)
}
