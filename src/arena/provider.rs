use std::fs;

use super::{remove_if_exists, Arena, ArenaStore, FileGate, FileStore, Gate};
use crate::config::{BoardConfig, ResourceConfig};
use crate::error::ResourceError;
use crate::game::AgentId;

/// What a process learns when it attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub agent_id: AgentId,
    /// Attached processes including this one.
    pub attach_count: u32,
    /// True when this process found no live arena and cleared it.
    pub initialized: bool,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detachment {
    /// Other processes are still attached.
    Remaining(u32),
    /// This process was the last one and destroyed the shared resources.
    Destroyed,
}

/// The arena plus the gate guarding it, as seen by one process.
pub struct SharedResources<G: Gate, S: ArenaStore> {
    gate: G,
    store: S,
    width: usize,
    height: usize,
}

impl SharedResources<FileGate, FileStore> {
    /// Open the file-backed gate and arena named by `resources`.
    pub fn open(resources: &ResourceConfig, board: &BoardConfig) -> Result<Self, ResourceError> {
        fs::create_dir_all(&resources.dir)?;
        let gate = FileGate::open(&resources.lock_path())?;
        let store = FileStore::new(&resources.arena_path());
        tracing::debug!(arena = %store.path().display(), "opened shared resources");
        Ok(SharedResources::new(gate, store, board.width, board.height))
    }

    /// Remove every shared resource, the lock file included, without taking
    /// the gate. Only safe when no agent process is running.
    pub fn force_reset(resources: &ResourceConfig) -> Result<(), ResourceError> {
        FileStore::new(&resources.arena_path()).destroy()?;
        remove_if_exists(&resources.lock_path())?;
        tracing::info!(dir = %resources.dir.display(), name = %resources.name, "shared resources removed");
        Ok(())
    }
}

impl<G: Gate, S: ArenaStore> SharedResources<G, S> {
    /// `width`/`height` are only used if this process ends up creating the arena.
    pub fn new(gate: G, store: S, width: usize, height: usize) -> Self {
        SharedResources {
            gate,
            store,
            width,
            height,
        }
    }

    /// Join the arena: the first process in resets it, everyone bumps the
    /// attach count and receives a fresh agent id.
    pub fn attach(&self) -> Result<Attachment, ResourceError> {
        self.gated(|store| {
            let (mut arena, initialized) = match store.load()? {
                Some(arena) if arena.attach_count() > 0 => (arena, false),
                _ => (Arena::new(self.width, self.height), true),
            };

            let (width, height) = (arena.board.width(), arena.board.height());
            if initialized {
                tracing::info!(width, height, "first process: initializing shared arena");
            } else if (width, height) != (self.width, self.height) {
                tracing::warn!(
                    width,
                    height,
                    configured_width = self.width,
                    configured_height = self.height,
                    "arena already exists with other dimensions; using the arena's"
                );
            }

            let attach_count = arena.increment_attach();
            let agent_id = arena.issue_agent_id();
            store.store(&arena)?;
            tracing::info!(%agent_id, attach_count, "attached");

            Ok(Attachment {
                agent_id,
                attach_count,
                initialized,
                width,
                height,
            })
        })
    }

    /// Run `f` against the arena as one atomic read-modify-write.
    pub fn critical_section<T>(&self, f: impl FnOnce(&mut Arena) -> T) -> Result<T, ResourceError> {
        self.gated(|store| {
            let mut arena = store.load()?.ok_or(ResourceError::Destroyed)?;
            let out = f(&mut arena);
            store.store(&arena)?;
            Ok(out)
        })
    }

    /// Consistent copy of the whole arena.
    pub fn snapshot(&self) -> Result<Arena, ResourceError> {
        self.gated(|store| store.load()?.ok_or(ResourceError::Destroyed))
    }

    /// Leave the arena. The last process out destroys the arena; the gate
    /// stays so that every later process locks the same primitive.
    pub fn detach(&self) -> Result<Detachment, ResourceError> {
        let outcome = self.gated(|store| {
            let Some(mut arena) = store.load()? else {
                return Ok(Detachment::Destroyed);
            };
            if arena.attach_count() <= 1 {
                store.destroy()?;
                return Ok(Detachment::Destroyed);
            }
            let remaining = arena.decrement_attach();
            store.store(&arena)?;
            Ok(Detachment::Remaining(remaining))
        })?;

        match outcome {
            Detachment::Destroyed => {
                tracing::info!("last process: shared arena destroyed");
            }
            Detachment::Remaining(remaining) => {
                tracing::info!(remaining, "detached");
            }
        }
        Ok(outcome)
    }

    /// Hold the gate around `f`, releasing it even when `f` fails.
    fn gated<T>(&self, f: impl FnOnce(&S) -> Result<T, ResourceError>) -> Result<T, ResourceError> {
        self.gate.acquire()?;
        let result = f(&self.store);
        let released = self.gate.release();
        let value = result?;
        released?;
        Ok(value)
    }
}
