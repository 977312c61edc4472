//! Named-file storage rooted at one directory.
//!
//! Names are flat: no separators, no leading dot. Dot-files are reserved for
//! staged writes and never show up in [`Storage::list`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A file written under a temporary name, waiting for [`Storage::commit`].
#[derive(Debug)]
pub struct StagedFile {
    name: String,
    temp_name: String,
}

/// Listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub created: SystemTime,
    pub len: u64,
}

pub trait Storage: Send + Sync {
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    fn exists(&self, name: &str) -> bool;

    /// Write `bytes` under a temporary name; nothing is visible under `name` yet.
    fn stage(&self, name: &str, bytes: &[u8]) -> io::Result<StagedFile>;

    /// Atomically move a staged file into place, replacing any previous file.
    fn commit(&self, staged: StagedFile) -> io::Result<()>;

    /// Drop a staged file without committing it.
    fn discard(&self, staged: StagedFile);

    fn delete(&self, name: &str) -> io::Result<()>;

    fn list(&self) -> io::Result<Vec<StoredFile>>;

    /// Listing entry for one file; `NotFound` when it is absent.
    fn stat(&self, name: &str) -> io::Result<StoredFile> {
        self.list()?
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name} not found")))
    }

    /// Stage and commit in one step.
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let staged = self.stage(name, bytes)?;
        self.commit(staged)
    }
}

/// Filesystem storage under a single root directory
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Open (and create if missing) a storage root
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        check_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Reject names that could leave the root or collide with staged files
pub fn check_name(name: &str) -> io::Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().map(|f| f == name).unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid storage name: {name:?}"),
        ))
    }
}

impl Storage for FsStorage {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.path_for(name)?;
        tracing::trace!(path = %path.display(), "Reading stored file");
        fs::read(path)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn stage(&self, name: &str, bytes: &[u8]) -> io::Result<StagedFile> {
        check_name(name)?;
        let suffix: u64 = rand::random();
        let temp_name = format!(".{name}.{suffix:016x}.tmp");
        fs::write(self.root.join(&temp_name), bytes)?;
        Ok(StagedFile {
            name: name.to_string(),
            temp_name,
        })
    }

    fn commit(&self, staged: StagedFile) -> io::Result<()> {
        let from = self.root.join(&staged.temp_name);
        let to = self.root.join(&staged.name);
        if let Err(e) = fs::rename(&from, &to) {
            let _ = fs::remove_file(&from);
            return Err(e);
        }
        Ok(())
    }

    fn discard(&self, staged: StagedFile) {
        let path = self.root.join(&staged.temp_name);
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), %e, "Failed to remove staged file");
        }
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path_for(name)?)
    }

    fn stat(&self, name: &str) -> io::Result<StoredFile> {
        let meta = fs::metadata(self.path_for(name)?)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{name} is not a file"),
            ));
        }
        Ok(stored_file(name.to_string(), &meta))
    }

    fn list(&self) -> io::Result<Vec<StoredFile>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            // Files can vanish between read_dir and metadata
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            files.push(stored_file(name, &meta));
        }
        Ok(files)
    }
}

fn stored_file(name: String, meta: &fs::Metadata) -> StoredFile {
    let created = meta
        .created()
        .or_else(|_| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);
    StoredFile {
        name,
        created,
        len: meta.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, FsStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::open(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_write_read_delete() {
        let (_dir, storage) = storage();
        storage.write("a.bin", b"hello").unwrap();
        assert!(storage.exists("a.bin"));
        assert_eq!(storage.read("a.bin").unwrap(), b"hello");

        storage.delete("a.bin").unwrap();
        assert!(!storage.exists("a.bin"));
        assert_eq!(
            storage.read("a.bin").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_staged_file_invisible_until_commit() {
        let (_dir, storage) = storage();
        let staged = storage.stage("a.bin", b"new").unwrap();
        assert!(!storage.exists("a.bin"));
        assert!(storage.list().unwrap().is_empty());

        storage.commit(staged).unwrap();
        assert_eq!(storage.read("a.bin").unwrap(), b"new");
    }

    #[test]
    fn test_discard_leaves_nothing() {
        let (dir, storage) = storage();
        let staged = storage.stage("a.bin", b"new").unwrap();
        storage.discard(staged);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_replaces_existing() {
        let (_dir, storage) = storage();
        storage.write("a.bin", b"old").unwrap();
        storage.write("a.bin", b"new").unwrap();
        assert_eq!(storage.read("a.bin").unwrap(), b"new");
        assert_eq!(storage.list().unwrap().len(), 1);
    }

    #[test]
    fn test_names_cannot_escape_root() {
        let (_dir, storage) = storage();
        for name in ["", "..", "../x", "a/b", ".hidden", "a\\b"] {
            assert_eq!(
                storage.write(name, b"x").unwrap_err().kind(),
                io::ErrorKind::InvalidInput,
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_list_reports_sizes() {
        let (_dir, storage) = storage();
        storage.write("one", b"1").unwrap();
        storage.write("two", b"22").unwrap();
        let mut files = storage.list().unwrap();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(files[0].name, "one");
        assert_eq!(files[0].len, 1);
        assert_eq!(files[1].len, 2);
    }

    #[test]
    fn test_stat_matches_listing() {
        let (_dir, storage) = storage();
        storage.write("one", b"1").unwrap();
        assert_eq!(storage.stat("one").unwrap(), storage.list().unwrap()[0]);
        assert_eq!(
            storage.stat("two").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
