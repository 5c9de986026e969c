//! # Territory
//!
//! A territory-capture game played by independent processes. Each process
//! owns one piece on a shared board, chases the nearest opponent and
//! captures by flanking. All processes read and write the same arena under
//! a single exclusive lock.
//!
//! ## Modules
//!
//! - [`game`]: Board, teams, game flags and the team registry
//! - [`ai`]: Spawning, movement, capture and the per-agent state machine
//! - [`arena`]: The shared arena: byte layout, lock, stores, attach/detach
//! - [`play`]: The tick loop and team notifications
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod play;
