// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! File-backed token store.
//!
//! Each key maps to one file under the per-user credentials directory.
//! On Unix the directory is created `0o700` and files are written `0o600`,
//! so blobs are readable by the owning user only.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::TokenStore;

/// Directory under the home directory holding credential files.
const CREDENTIALS_DIR: &str = ".nosh/credentials";

/// A token store writing one owner-only file per key.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    /// Open the store at the default per-user location.
    pub fn open() -> Result<Self, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::IoError("could not determine home directory".to_string()))?;
        Self::open_at(&home.join(CREDENTIALS_DIR))
    }

    /// Open the store at a specific directory.
    ///
    /// This is useful for testing or when you want a custom location.
    pub fn open_at(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        std::fs::write(&path, bytes)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileTokenStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = FileTokenStore::open_at(&temp.path().join("credentials")).unwrap();
        (store, temp)
    }

    #[test]
    fn test_save_load_round_trip() {
        let (store, _temp) = create_test_store();

        store.save("auth_tokens", b"{\"access_token\":\"a\"}").unwrap();
        let loaded = store.load("auth_tokens").unwrap().unwrap();
        assert_eq!(loaded, b"{\"access_token\":\"a\"}");
    }

    #[test]
    fn test_load_absent_key() {
        let (store, _temp) = create_test_store();
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_file() {
        let (store, _temp) = create_test_store();

        store.save("cached_user", b"{}").unwrap();
        assert!(store.load("cached_user").unwrap().is_some());

        store.delete("cached_user").unwrap();
        assert!(store.load("cached_user").unwrap().is_none());

        // Deleting again is still ok.
        store.delete("cached_user").unwrap();
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let (store, _temp) = create_test_store();

        store.save("k", b"one").unwrap();
        store.save("k", b"two").unwrap();
        assert_eq!(store.load("k").unwrap().unwrap(), b"two");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = create_test_store();
        store.save("auth_tokens", b"secret").unwrap();

        let meta = std::fs::metadata(store.dir().join("auth_tokens.json")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}
