//! File-backed credential store.
//!
//! The credential lives in a single file named after
//! [`CREDENTIAL_KEY`](crate::domain::ports::CREDENTIAL_KEY) inside a directory
//! opened once through `cap_std`, so the adapter cannot touch anything outside
//! it. Writes go through a temporary file and a rename.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::Credential;
use crate::domain::ports::{CREDENTIAL_KEY, CredentialStore, CredentialStoreError};

const STAGING_SUFFIX: &str = ".tmp";

fn io_error(action: &str, error: &io::Error) -> CredentialStoreError {
    CredentialStoreError::io(format!("{action}: {error}"))
}

/// Credential store rooted at one directory.
#[derive(Debug)]
pub struct FileCredentialStore {
    dir: Dir,
    root: PathBuf,
}

impl FileCredentialStore {
    /// Open (creating if needed) the credential directory.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Path) -> Result<Self, CredentialStoreError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|error| io_error("create credential directory", &error))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|error| io_error("open credential directory", &error))?;
        Ok(Self {
            dir,
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the credential file.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let raw = match self.dir.read_to_string(CREDENTIAL_KEY) {
            Ok(raw) => Zeroizing::new(raw),
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                return Err(CredentialStoreError::corrupt(error.to_string()));
            }
            Err(error) => return Err(io_error("read credential", &error)),
        };
        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Credential::new(token)
            .map(Some)
            .map_err(|error| CredentialStoreError::corrupt(error.to_string()))
    }

    fn persist(&self, credential: &Credential) -> Result<(), CredentialStoreError> {
        let staging = format!("{CREDENTIAL_KEY}{STAGING_SUFFIX}");
        self.dir
            .write(&staging, credential.expose())
            .map_err(|error| io_error("write credential", &error))?;
        self.dir
            .rename(&staging, &self.dir, CREDENTIAL_KEY)
            .map_err(|error| io_error("replace credential", &error))?;
        debug!(root = %self.root.display(), "credential persisted");
        Ok(())
    }

    fn erase(&self) -> Result<(), CredentialStoreError> {
        match self.dir.remove_file(CREDENTIAL_KEY) {
            Ok(()) => {
                debug!(root = %self.root.display(), "credential erased");
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error("remove credential", &error)),
        }
    }
}
