//! Fixed little-endian layout of the shared arena.
//!
//! ```text
//! magic u32 | version u16 | width u16 | height u16 | attach_count u32
//! next_agent_id u64 | started u8 | current_turn_team u8 (0xFF = none)
//! MAX_TEAMS x [ count u16 | MAX_AGENTS_PER_TEAM x agent u64 ]
//! height x width cells u8 (0 = Empty, team + 1 otherwise)
//! ```

use std::io::{self, Cursor, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::Arena;
use crate::error::ResourceError;
use crate::game::{
    AgentId, Board, GameState, Position, TeamId, TeamRegistry, MAX_AGENTS_PER_TEAM, MAX_TEAMS,
};

const MAGIC: u32 = 0x5445_5252;
const VERSION: u16 = 1;
const NO_TEAM: u8 = 0xFF;
const HEADER_LEN: usize = 4 + 2 + 2 + 2 + 4 + 8 + 1 + 1;
const REGISTRY_LEN: usize = MAX_TEAMS * (2 + MAX_AGENTS_PER_TEAM * 8);

/// Total encoded size for a board of the given dimensions.
pub fn encoded_len(width: usize, height: usize) -> usize {
    HEADER_LEN + REGISTRY_LEN + width * height
}

fn dimension(name: &str, value: usize) -> io::Result<u16> {
    u16::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("board {name} {value} does not fit the arena layout"),
        )
    })
}

pub fn encode(arena: &Arena, wtr: &mut impl Write) -> io::Result<()> {
    let board = &arena.board;
    wtr.write_u32::<LittleEndian>(MAGIC)?;
    wtr.write_u16::<LittleEndian>(VERSION)?;
    wtr.write_u16::<LittleEndian>(dimension("width", board.width())?)?;
    wtr.write_u16::<LittleEndian>(dimension("height", board.height())?)?;
    wtr.write_u32::<LittleEndian>(arena.attach_count())?;
    wtr.write_u64::<LittleEndian>(arena.next_agent_id())?;
    wtr.write_u8(arena.state.is_started() as u8)?;
    wtr.write_u8(
        arena
            .state
            .current_turn_team()
            .map_or(NO_TEAM, TeamId::as_u8),
    )?;

    for team in TeamId::all() {
        let members = arena.registry.members(team);
        wtr.write_u16::<LittleEndian>(members.len() as u16)?;
        for slot in 0..MAX_AGENTS_PER_TEAM {
            let raw = members.get(slot).map_or(0, |id| id.as_u64());
            wtr.write_u64::<LittleEndian>(raw)?;
        }
    }

    for (_, cell) in board.cells() {
        wtr.write_u8(cell.team().map_or(0, |team| team.as_u8() + 1))?;
    }
    Ok(())
}

pub fn decode(bytes: &[u8]) -> Result<Arena, ResourceError> {
    if bytes.len() < HEADER_LEN {
        return Err(ResourceError::Corrupt(format!(
            "arena is {} bytes, shorter than its header",
            bytes.len()
        )));
    }
    let mut rdr = Cursor::new(bytes);
    let truncated = |_| ResourceError::Corrupt("arena truncated".into());

    let magic = rdr.read_u32::<LittleEndian>().map_err(truncated)?;
    if magic != MAGIC {
        return Err(ResourceError::Corrupt(format!("bad magic {magic:#010x}")));
    }
    let version = rdr.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != VERSION {
        return Err(ResourceError::Corrupt(format!(
            "unsupported layout version {version}"
        )));
    }
    let width = rdr.read_u16::<LittleEndian>().map_err(truncated)? as usize;
    let height = rdr.read_u16::<LittleEndian>().map_err(truncated)? as usize;
    let expected = encoded_len(width, height);
    if bytes.len() != expected {
        return Err(ResourceError::Corrupt(format!(
            "arena is {} bytes, expected {expected} for {width}x{height}",
            bytes.len()
        )));
    }

    let attach_count = rdr.read_u32::<LittleEndian>().map_err(truncated)?;
    let next_agent_id = rdr.read_u64::<LittleEndian>().map_err(truncated)?;
    let started = rdr.read_u8().map_err(truncated)? != 0;
    let turn = match rdr.read_u8().map_err(truncated)? {
        NO_TEAM => None,
        raw => Some(
            TeamId::new(raw)
                .ok_or_else(|| ResourceError::Corrupt(format!("bad turn team {raw}")))?,
        ),
    };

    let mut registry = TeamRegistry::new();
    for team in TeamId::all() {
        let count = rdr.read_u16::<LittleEndian>().map_err(truncated)? as usize;
        if count > MAX_AGENTS_PER_TEAM {
            return Err(ResourceError::Corrupt(format!(
                "team {team} lists {count} agents"
            )));
        }
        for slot in 0..MAX_AGENTS_PER_TEAM {
            let raw = rdr.read_u64::<LittleEndian>().map_err(truncated)?;
            if slot < count {
                registry
                    .register(team, AgentId::new(raw))
                    .map_err(|e| ResourceError::Corrupt(e.to_string()))?;
            }
        }
    }

    let mut board = Board::new(width, height);
    for row in 0..height {
        for col in 0..width {
            let raw = rdr.read_u8().map_err(truncated)?;
            if raw == 0 {
                continue;
            }
            let team = TeamId::new(raw - 1)
                .ok_or_else(|| ResourceError::Corrupt(format!("bad cell value {raw}")))?;
            board
                .place(Position::new(row, col), team)
                .map_err(|e| ResourceError::Corrupt(format!("cell write failed: {e:?}")))?;
        }
    }

    Ok(Arena::from_parts(
        board,
        GameState::from_parts(started, turn),
        registry,
        attach_count,
        next_agent_id,
    ))
}
