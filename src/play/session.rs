use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rand::Rng;

use super::notify::Notifier;
use crate::ai::{AgentPhase, PlayerAgent, TickEvent};
use crate::arena::{ArenaStore, Gate, SharedResources};
use crate::error::AgentError;
use crate::game::{Board, Position};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Won,
    Lost,
    /// The stop flag was raised before the game finished for this agent.
    Interrupted,
}

/// Drives one agent: take the gate, tick, release, sleep, repeat.
pub struct Session<G: Gate, S: ArenaStore, N: Notifier> {
    resources: SharedResources<G, S>,
    notifier: N,
    tick_interval: Duration,
}

impl<G: Gate, S: ArenaStore, N: Notifier> Session<G, S, N> {
    pub fn new(resources: SharedResources<G, S>, notifier: N, tick_interval: Duration) -> Self {
        Session {
            resources,
            notifier,
            tick_interval,
        }
    }

    pub fn resources(&self) -> &SharedResources<G, S> {
        &self.resources
    }

    /// Tick `agent` until it wins, loses, or `stop` is raised. `stop` is
    /// checked between ticks, never inside one.
    pub fn run<R: Rng>(
        &self,
        agent: &mut PlayerAgent<R>,
        stop: &AtomicBool,
    ) -> Result<SessionEnd, AgentError> {
        loop {
            if stop.load(Ordering::SeqCst) {
                tracing::info!(agent = %agent.agent_id(), "stop requested");
                return Ok(SessionEnd::Interrupted);
            }

            self.step(agent)?;
            match agent.phase() {
                AgentPhase::Won => return Ok(SessionEnd::Won),
                AgentPhase::Lost => return Ok(SessionEnd::Lost),
                _ => {}
            }
            thread::sleep(self.tick_interval);
        }
    }

    /// One gated tick, reported to the log and the notifier.
    pub fn step<R: Rng>(&self, agent: &mut PlayerAgent<R>) -> Result<TickEvent, AgentError> {
        let (event, board) = self
            .resources
            .critical_section(|arena| (agent.tick(arena), arena.board.snapshot()))?;
        let event = event?;
        self.report(agent, &event, &board);
        Ok(event)
    }

    /// Take the agent's piece off the board before the process detaches.
    pub fn withdraw<R: Rng>(
        &self,
        agent: &mut PlayerAgent<R>,
    ) -> Result<Option<Position>, AgentError> {
        Ok(self
            .resources
            .critical_section(|arena| agent.withdraw(arena))?)
    }

    fn report<R: Rng>(&self, agent: &PlayerAgent<R>, event: &TickEvent, board: &Board) {
        let team = agent.team();
        match event {
            TickEvent::Joined { position, started } => {
                self.notifier.notify(
                    team,
                    &format!("{} joined team {team} at {position}", agent.agent_id()),
                );
                if *started {
                    self.announce_start(agent);
                }
            }
            TickEvent::Waiting { started } => {
                if *started {
                    self.announce_start(agent);
                }
            }
            TickEvent::Acted { captures, .. } => {
                for capture in captures {
                    tracing::info!(team = %team, victim = %capture.victim, position = %capture.position, "capture");
                    self.notifier.notify(
                        capture.victim,
                        &format!("piece at {} captured by team {team}", capture.position),
                    );
                }
                tracing::debug!("board after team {team} acted:\n{board}");
            }
            TickEvent::Won => {
                tracing::info!(team = %team, agent = %agent.agent_id(), "won");
                self.notifier.notify(team, &format!("team {team} holds the board"));
            }
            TickEvent::Lost => {
                tracing::info!(team = %team, agent = %agent.agent_id(), "lost");
                self.notifier
                    .notify(team, &format!("{} was captured", agent.agent_id()));
            }
        }
    }

    fn announce_start<R: Rng>(&self, agent: &PlayerAgent<R>) {
        tracing::info!(team = %agent.team(), "game started");
        self.notifier.notify(agent.team(), "game started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::{LocalGate, MemoryStore};
    use crate::arena::Detachment;
    use crate::game::{AgentId, Cell, TeamId};
    use crate::play::RecordingNotifier;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    type TestSession = Session<LocalGate, MemoryStore, RecordingNotifier>;

    fn team(i: u8) -> TeamId {
        TeamId::new(i).unwrap()
    }

    /// An attached session with an opponent piece at (2,2) and the agent
    /// ticked into the Acting phase.
    fn acting_session() -> (TestSession, PlayerAgent, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let resources = SharedResources::new(LocalGate::new(), MemoryStore::new(), 3, 3);
        let attachment = resources.attach().unwrap();
        resources
            .critical_section(|arena| arena.board.place(Position::new(2, 2), team(2)))
            .unwrap()
            .unwrap();

        let session = Session::new(resources, notifier.clone(), Duration::ZERO);
        let mut agent = PlayerAgent::new(team(1), attachment.agent_id, StdRng::seed_from_u64(4), 5);
        assert!(matches!(
            session.step(&mut agent).unwrap(),
            TickEvent::Joined { started: true, .. }
        ));
        assert_eq!(session.step(&mut agent).unwrap(), TickEvent::Waiting { started: false });
        assert_eq!(agent.phase(), AgentPhase::Acting);
        (session, agent, notifier)
    }

    #[test]
    fn test_run_ends_in_loss_when_captured() {
        let (session, mut agent, notifier) = acting_session();
        let position = agent.position().unwrap();
        session
            .resources()
            .critical_section(|arena| arena.board.clear(position))
            .unwrap();

        let end = session.run(&mut agent, &AtomicBool::new(false)).unwrap();
        assert_eq!(end, SessionEnd::Lost);
        let (to, text) = notifier.messages().pop().unwrap();
        assert_eq!(to, team(1));
        assert!(text.ends_with("was captured"));
    }

    #[test]
    fn test_run_ends_in_win_when_alone() {
        let (session, mut agent, notifier) = acting_session();
        session
            .resources()
            .critical_section(|arena| arena.board.clear(Position::new(2, 2)))
            .unwrap();

        let end = session.run(&mut agent, &AtomicBool::new(false)).unwrap();
        assert_eq!(end, SessionEnd::Won);
        assert_eq!(
            notifier.messages().last().unwrap(),
            &(team(1), "team 1 holds the board".to_string())
        );
        let arena = session.resources().snapshot().unwrap();
        assert_eq!(arena.state.current_turn_team(), Some(team(1)));
    }

    #[test]
    fn test_join_notifies_start() {
        let (_, _, notifier) = acting_session();
        let texts: Vec<_> = notifier.messages().into_iter().map(|(_, t)| t).collect();
        assert!(texts[0].contains("joined team 1"));
        assert_eq!(texts[1], "game started");
        assert_eq!(texts.len(), 2);
    }

    #[test]
    fn test_run_returns_when_stopped() {
        let resources = SharedResources::new(LocalGate::new(), MemoryStore::new(), 3, 3);
        let attachment = resources.attach().unwrap();
        let session = Session::new(resources, RecordingNotifier::new(), Duration::ZERO);
        let mut agent = PlayerAgent::new(team(0), attachment.agent_id, StdRng::seed_from_u64(0), 5);

        let end = session.run(&mut agent, &AtomicBool::new(true)).unwrap();
        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(agent.phase(), AgentPhase::Joining);
    }

    #[test]
    fn test_interrupted_agent_leaves_no_piece() {
        let gate = LocalGate::new();
        let store = MemoryStore::new();
        let observer = SharedResources::new(gate.share(), store.clone(), 3, 3);
        observer.attach().unwrap();

        let resources = SharedResources::new(gate.share(), store.clone(), 3, 3);
        let attachment = resources.attach().unwrap();
        let session = Session::new(resources, RecordingNotifier::new(), Duration::ZERO);
        let mut agent = PlayerAgent::new(team(1), attachment.agent_id, StdRng::seed_from_u64(8), 5);
        session.step(&mut agent).unwrap();
        let position = agent.position().unwrap();

        let end = session.run(&mut agent, &AtomicBool::new(true)).unwrap();
        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(session.withdraw(&mut agent).unwrap(), Some(position));
        assert_eq!(session.resources().detach().unwrap(), Detachment::Remaining(1));

        let arena = observer.snapshot().unwrap();
        assert_eq!(arena.board.get(position), Some(Cell::Empty));
        assert_eq!(arena.attach_count(), 1);
    }

    #[test]
    fn test_run_fails_without_arena() {
        let session = Session::new(
            SharedResources::new(LocalGate::new(), MemoryStore::new(), 3, 3),
            RecordingNotifier::new(),
            Duration::ZERO,
        );
        let mut agent = PlayerAgent::new(team(0), AgentId::new(1), StdRng::seed_from_u64(0), 5);
        assert!(matches!(
            session.run(&mut agent, &AtomicBool::new(false)),
            Err(AgentError::Resource(_))
        ));
    }

    #[test]
    fn test_concurrent_ticks_match_serial_replay() {
        const AGENTS: usize = 4;
        const TICKS: usize = 40;

        let gate = LocalGate::new();
        let store = MemoryStore::new();
        let setup = SharedResources::new(gate.share(), store.clone(), 4, 4);
        let ids: Vec<AgentId> = (0..AGENTS)
            .map(|_| setup.attach().map(|a| a.agent_id))
            .collect::<Result<_, _>>()
            .unwrap();
        let initial = setup.snapshot().unwrap();
        let make_agent = |i: usize| {
            PlayerAgent::new(team((i % 2) as u8), ids[i], StdRng::seed_from_u64(i as u64), 5)
        };

        // Gate acquisition order, recorded from inside each critical section.
        let order = Arc::new(Mutex::new(Vec::new()));
        let handles: Vec<_> = (0..AGENTS)
            .map(|i| {
                let resources = SharedResources::new(gate.share(), store.clone(), 4, 4);
                let order = Arc::clone(&order);
                let mut agent = make_agent(i);
                thread::spawn(move || {
                    for _ in 0..TICKS {
                        resources
                            .critical_section(|arena| {
                                order.lock().push(i);
                                agent.tick(arena)
                            })
                            .unwrap()
                            .unwrap();
                        if agent.phase().is_terminal() {
                            break;
                        }
                        thread::yield_now();
                    }
                    agent
                })
            })
            .collect();
        let live: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let concurrent = setup.snapshot().unwrap();

        let mut arena = initial;
        let mut replayed: Vec<_> = (0..AGENTS).map(|i| make_agent(i)).collect();
        for &i in order.lock().iter() {
            replayed[i].tick(&mut arena).unwrap();
        }

        assert_eq!(arena, concurrent);
        for (live, replayed) in live.iter().zip(&replayed) {
            assert_eq!(live.position(), replayed.position());
            assert_eq!(live.phase(), replayed.phase());
        }
    }

    #[test]
    fn test_every_piece_is_claimed_after_concurrent_sessions() {
        let gate = LocalGate::new();
        let store = MemoryStore::new();
        let stop = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = (0..5u64)
            .map(|i| {
                let resources = SharedResources::new(gate.share(), store.clone(), 5, 5);
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    let attachment = resources.attach().unwrap();
                    let session = Session::new(
                        resources,
                        RecordingNotifier::new(),
                        Duration::from_millis(1),
                    );
                    let mut agent = PlayerAgent::new(
                        team((i % 3) as u8),
                        attachment.agent_id,
                        StdRng::seed_from_u64(i),
                        5,
                    );
                    session.run(&mut agent, &stop).unwrap();
                    agent
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(150));
        stop.store(true, Ordering::SeqCst);
        let finished: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let arena = SharedResources::new(gate.share(), store.clone(), 5, 5)
            .snapshot()
            .unwrap();
        assert_eq!(arena.attach_count(), 5);
        assert!(arena.state.is_started());
        for (pos, cell) in arena.board.cells() {
            let Cell::Team(owner) = cell else { continue };
            assert!(
                finished
                    .iter()
                    .any(|agent| agent.team() == owner && agent.position() == Some(pos)),
                "piece of team {owner} at {pos} has no agent"
            );
        }
    }
}
