use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::codec::{decode, encode};
use super::{remove_if_exists, Arena};
use crate::error::ResourceError;

/// Backing storage for the shared arena. Callers hold the gate around
/// every load/store pair.
pub trait ArenaStore {
    /// Current arena, or `None` if it has not been created (or was destroyed).
    fn load(&self) -> Result<Option<Arena>, ResourceError>;

    fn store(&self, arena: &Arena) -> Result<(), ResourceError>;

    /// Remove the arena entirely.
    fn destroy(&self) -> Result<(), ResourceError>;
}

/// Arena kept in a file that every attached process maps by path.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: &Path) -> Self {
        FileStore {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArenaStore for FileStore {
    fn load(&self) -> Result<Option<Arena>, ResourceError> {
        match fs::read(&self.path) {
            Ok(bytes) => decode(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, arena: &Arena) -> Result<(), ResourceError> {
        let mut bytes = Vec::new();
        encode(arena, &mut bytes)?;

        // Write then rename so a crash mid-write never leaves a torn arena.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn destroy(&self) -> Result<(), ResourceError> {
        remove_if_exists(&self.path)?;
        Ok(())
    }
}

/// Arena bytes held in memory; clones share the same bytes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArenaStore for MemoryStore {
    fn load(&self) -> Result<Option<Arena>, ResourceError> {
        self.bytes.lock().as_deref().map(decode).transpose()
    }

    fn store(&self, arena: &Arena) -> Result<(), ResourceError> {
        let mut bytes = Vec::new();
        encode(arena, &mut bytes)?;
        *self.bytes.lock() = Some(bytes);
        Ok(())
    }

    fn destroy(&self) -> Result<(), ResourceError> {
        *self.bytes.lock() = None;
        Ok(())
    }
}
