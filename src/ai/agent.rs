use rand::rngs::StdRng;
use rand::Rng;

use super::capture::{capture_flanked, has_lost, has_won, Capture};
use super::movement::{advance, Movement};
use super::spawn::spawn;
use crate::arena::Arena;
use crate::error::JoinError;
use crate::game::{AgentId, Position, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    Joining,
    WaitingForStart,
    Acting,
    Won,
    Lost,
}

impl AgentPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, AgentPhase::Won | AgentPhase::Lost)
    }
}

/// What one tick did, for logging and notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// Placed on the board and registered. `started` is true if this join
    /// was the one that started the game.
    Joined { position: Position, started: bool },
    /// Polled for the start flag; `started` is true if this poll flipped it.
    Waiting { started: bool },
    Acted {
        movement: Movement,
        captures: Vec<Capture>,
    },
    Won,
    Lost,
}

/// One process's piece and its state machine:
/// Joining -> WaitingForStart -> Acting -> Won | Lost.
///
/// The board is the authority; `position` is only the last place this agent
/// put its piece and is checked against the board every acting tick.
pub struct PlayerAgent<R: Rng = StdRng> {
    team: TeamId,
    agent_id: AgentId,
    position: Option<Position>,
    phase: AgentPhase,
    spawn_trials: usize,
    rng: R,
}

impl<R: Rng> PlayerAgent<R> {
    pub fn new(team: TeamId, agent_id: AgentId, rng: R, spawn_trials: usize) -> Self {
        PlayerAgent {
            team,
            agent_id,
            position: None,
            phase: AgentPhase::Joining,
            spawn_trials,
            rng,
        }
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    /// Advance the state machine by one tick. The caller must hold the gate
    /// for the whole call.
    pub fn tick(&mut self, arena: &mut Arena) -> Result<TickEvent, JoinError> {
        match self.phase {
            AgentPhase::Joining => self.join(arena),
            AgentPhase::WaitingForStart => Ok(self.poll_start(arena)),
            AgentPhase::Acting => Ok(self.act(arena)),
            AgentPhase::Won => Ok(TickEvent::Won),
            AgentPhase::Lost => Ok(TickEvent::Lost),
        }
    }

    /// Take this agent's piece off the board as its process leaves. Returns
    /// the cleared cell, or `None` if the board no longer shows the piece.
    /// The caller must hold the gate.
    pub fn withdraw(&mut self, arena: &mut Arena) -> Option<Position> {
        let position = self.position.take()?;
        if self.phase == AgentPhase::Lost || has_lost(&arena.board, position, self.team) {
            return None;
        }
        arena.board.clear(position);
        tracing::info!(team = %self.team, agent = %self.agent_id, %position, "withdrew");
        Some(position)
    }

    fn join(&mut self, arena: &mut Arena) -> Result<TickEvent, JoinError> {
        let position = spawn(&mut arena.board, self.team, &mut self.rng, self.spawn_trials)?;
        if let Err(e) = arena.registry.register(self.team, self.agent_id) {
            arena.board.clear(position);
            return Err(e);
        }
        let started = arena.state.detect_start(&arena.board);

        self.position = Some(position);
        self.phase = AgentPhase::WaitingForStart;
        tracing::info!(team = %self.team, agent = %self.agent_id, %position, "joined");
        Ok(TickEvent::Joined { position, started })
    }

    fn poll_start(&mut self, arena: &mut Arena) -> TickEvent {
        let started = arena.state.detect_start(&arena.board);
        if arena.state.is_started() {
            self.phase = AgentPhase::Acting;
        }
        TickEvent::Waiting { started }
    }

    fn act(&mut self, arena: &mut Arena) -> TickEvent {
        arena.state.mark_turn(self.team);

        let Some(position) = self
            .position
            .filter(|&pos| !has_lost(&arena.board, pos, self.team))
        else {
            self.phase = AgentPhase::Lost;
            return TickEvent::Lost;
        };

        if has_won(&arena.board, self.team) {
            self.phase = AgentPhase::Won;
            return TickEvent::Won;
        }

        let movement = advance(&mut arena.board, position, self.team, &mut self.rng);
        let position = movement.destination().unwrap_or(position);
        self.position = Some(position);

        let captures = capture_flanked(&mut arena.board, position, self.team);
        tracing::debug!(
            team = %self.team,
            agent = %self.agent_id,
            ?movement,
            captures = captures.len(),
            "acted"
        );
        TickEvent::Acted { movement, captures }
    }
}
