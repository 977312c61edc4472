use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ArtifactError;
use crate::models::CallerIdentity;
use crate::services::storage::{StagedFile, Storage, StoredFile};

/// Member of an identity's artifact set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Packed panel frame
    Buffer,
    /// PNG rendering of the same frame
    Preview,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Buffer, ArtifactKind::Preview];

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Buffer => "bin",
            ArtifactKind::Preview => "png",
        }
    }

    pub fn file_name(self, identity: &CallerIdentity) -> String {
        format!("{}.{}", identity.as_str(), self.extension())
    }

    fn from_file_name(name: &str) -> Option<(&str, ArtifactKind)> {
        let (stem, ext) = name.rsplit_once('.')?;
        let kind = ArtifactKind::ALL.into_iter().find(|k| k.extension() == ext)?;
        Some((stem, kind))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Buffer => write!(f, "buffer"),
            ArtifactKind::Preview => write!(f, "preview"),
        }
    }
}

/// One stored artifact file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub identity: String,
    pub kind: ArtifactKind,
    pub file_name: String,
    pub created: DateTime<Utc>,
    pub len: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub kept: usize,
    pub removed: Vec<String>,
}

/// Number of identity lock stripes
const LOCK_STRIPES: usize = 64;

/// Per-identity artifact sets: `<identity>.bin` and `<identity>.png`.
///
/// Saves for the same identity are serialized and replace both files
/// together: both members are staged first, then renamed into place, so a
/// reader never sees a buffer next to a preview from another conversion.
///
/// Identities map onto a fixed set of lock stripes. Two identities may
/// share a stripe; no code path holds more than one stripe at a time.
pub struct ArtifactStore {
    storage: Arc<dyn Storage>,
    locks: [Mutex<()>; LOCK_STRIPES],
}

impl ArtifactStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    fn stripe(identity: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        identity.hash(&mut hasher);
        (hasher.finish() % LOCK_STRIPES as u64) as usize
    }

    fn identity_lock(&self, identity: &str) -> MutexGuard<'_, ()> {
        self.locks[Self::stripe(identity)]
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn save(
        &self,
        identity: &CallerIdentity,
        buffer: &[u8],
        preview: &[u8],
    ) -> Result<(), ArtifactError> {
        let _guard = self.identity_lock(identity.as_str());

        let staged_buffer = self
            .storage
            .stage(&ArtifactKind::Buffer.file_name(identity), buffer)?;
        let staged_preview = match self
            .storage
            .stage(&ArtifactKind::Preview.file_name(identity), preview)
        {
            Ok(staged) => staged,
            Err(e) => {
                self.storage.discard(staged_buffer);
                return Err(e.into());
            }
        };

        self.commit_pair(identity, staged_buffer, staged_preview)?;

        tracing::info!(
            identity = %identity,
            buffer_bytes = buffer.len(),
            preview_bytes = preview.len(),
            "Saved artifact set"
        );
        Ok(())
    }

    fn commit_pair(
        &self,
        identity: &CallerIdentity,
        buffer: StagedFile,
        preview: StagedFile,
    ) -> Result<(), ArtifactError> {
        if let Err(e) = self.storage.commit(buffer) {
            self.storage.discard(preview);
            return Err(e.into());
        }
        if let Err(e) = self.storage.commit(preview) {
            // Do not leave a new buffer next to an old preview
            let name = ArtifactKind::Buffer.file_name(identity);
            if let Err(del) = self.storage.delete(&name) {
                tracing::warn!(file = %name, %del, "Failed to roll back buffer");
            }
            return Err(e.into());
        }
        Ok(())
    }

    pub fn read(&self, identity: &CallerIdentity, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactError> {
        let _guard = self.identity_lock(identity.as_str());

        match self.storage.read(&kind.file_name(identity)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ArtifactError::ArtifactNotFound {
                identity: identity.to_string(),
                kind,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// All artifact files, newest first
    pub fn entries(&self) -> Result<Vec<ArtifactEntry>, ArtifactError> {
        let mut files: Vec<StoredFile> = self.storage.list()?;
        files.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.name.cmp(&b.name)));
        Ok(files
            .into_iter()
            .filter_map(|f| {
                let (identity, kind) = ArtifactKind::from_file_name(&f.name)?;
                Some(ArtifactEntry {
                    identity: identity.to_string(),
                    kind,
                    file_name: f.name.clone(),
                    created: DateTime::<Utc>::from(f.created),
                    len: f.len,
                })
            })
            .collect())
    }

    /// Keep the `keep` most recently created artifact files across all
    /// identities and delete the rest.
    ///
    /// Files are counted, not sets: a busy identity can push another
    /// identity's files out entirely, and an odd `keep` may split a set.
    ///
    /// Each deletion happens under the identity's lock and only if the file
    /// is still the one seen in the listing. A file replaced by a concurrent
    /// save is left alone.
    pub fn sweep(&self, keep: usize) -> Result<SweepReport, ArtifactError> {
        let entries = self.entries()?;
        let mut report = SweepReport {
            kept: entries.len().min(keep),
            removed: Vec::new(),
        };

        for entry in entries.into_iter().skip(keep) {
            if self.remove_if_unchanged(&entry) {
                report.removed.push(entry.file_name);
            }
        }

        if !report.removed.is_empty() {
            tracing::debug!(
                kept = report.kept,
                removed = report.removed.len(),
                "Swept artifacts"
            );
        }
        Ok(report)
    }

    fn remove_if_unchanged(&self, entry: &ArtifactEntry) -> bool {
        let _guard = self.identity_lock(&entry.identity);

        match self.storage.stat(&entry.file_name) {
            Ok(current) if DateTime::<Utc>::from(current.created) == entry.created => {}
            Ok(_) => {
                tracing::debug!(file = %entry.file_name, "Artifact replaced since listing, keeping it");
                return false;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return false,
            Err(e) => {
                tracing::warn!(file = %entry.file_name, %e, "Failed to stat artifact");
                return false;
            }
        }

        match self.storage.delete(&entry.file_name) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(file = %entry.file_name, %e, "Failed to remove artifact");
                false
            }
        }
    }
}
