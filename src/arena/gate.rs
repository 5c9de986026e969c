use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::fcntl::{Flock, FlockArg};
use parking_lot::{Condvar, Mutex};

use crate::error::GateError;

/// The single binary lock serializing every touch of the shared arena.
///
/// Not reentrant: acquiring twice from the same handle is an error rather
/// than a self-deadlock. Waiters are woken in no particular order.
pub trait Gate {
    /// Block until the lock is free, then take it.
    fn acquire(&self) -> Result<(), GateError>;

    /// Free the lock and wake one waiter.
    fn release(&self) -> Result<(), GateError>;
}

struct Semaphore {
    locked: Mutex<bool>,
    freed: Condvar,
}

/// In-process gate: a binary semaphore shared by handles on several threads,
/// each thread standing in for one agent process.
pub struct LocalGate {
    shared: Arc<Semaphore>,
    holding: AtomicBool,
}

impl LocalGate {
    pub fn new() -> Self {
        LocalGate {
            shared: Arc::new(Semaphore {
                locked: Mutex::new(false),
                freed: Condvar::new(),
            }),
            holding: AtomicBool::new(false),
        }
    }

    /// Another handle onto the same lock, as a second process would have.
    pub fn share(&self) -> LocalGate {
        LocalGate {
            shared: Arc::clone(&self.shared),
            holding: AtomicBool::new(false),
        }
    }
}

impl Default for LocalGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate for LocalGate {
    fn acquire(&self) -> Result<(), GateError> {
        if self.holding.load(Ordering::Acquire) {
            return Err(GateError::Reentrant);
        }
        let mut locked = self.shared.locked.lock();
        while *locked {
            self.shared.freed.wait(&mut locked);
        }
        *locked = true;
        self.holding.store(true, Ordering::Release);
        Ok(())
    }

    fn release(&self) -> Result<(), GateError> {
        if !self.holding.swap(false, Ordering::AcqRel) {
            return Err(GateError::NotHeld);
        }
        *self.shared.locked.lock() = false;
        self.shared.freed.notify_one();
        Ok(())
    }
}

/// Cross-process gate: an exclusive `flock` on a lock file.
///
/// Each open of the file is its own lock holder, so two `FileGate`s on the
/// same path exclude each other even inside one process. The lock file
/// outlives every detach: a process may already hold it open, and a new file
/// at the same path would be a second, unrelated lock. Only a forced reset
/// removes it.
pub struct FileGate {
    file: File,
    held: Mutex<Option<Flock<File>>>,
}

impl FileGate {
    /// Open (creating if needed) the lock file. A fresh file starts unlocked.
    pub fn open(path: &Path) -> Result<Self, GateError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Ok(FileGate {
            file,
            held: Mutex::new(None),
        })
    }
}

impl Gate for FileGate {
    fn acquire(&self) -> Result<(), GateError> {
        let mut held = self.held.lock();
        if held.is_some() {
            return Err(GateError::Reentrant);
        }
        let handle = self.file.try_clone()?;
        let lock = Flock::lock(handle, FlockArg::LockExclusive)
            .map_err(|(_, errno)| GateError::Primitive(format!("flock lock: {errno}")))?;
        *held = Some(lock);
        Ok(())
    }

    fn release(&self) -> Result<(), GateError> {
        let lock = self.held.lock().take().ok_or(GateError::NotHeld)?;
        lock.unlock()
            .map_err(|(_, errno)| GateError::Primitive(format!("flock unlock: {errno}")))?;
        Ok(())
    }
}
