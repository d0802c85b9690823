use serde::{Deserialize, Serialize};
use std::fmt;

pub type AgentId = u32;
pub type Timestep = u32;

/// Grid cell in `(row, col)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: u32,
    pub col: u32,
}

impl Coordinate {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Order in which the solver writes the two numbers of a position pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateOrder {
    #[default]
    RowCol,
    ColRow,
}

impl CoordinateOrder {
    pub fn coordinate(self, first: u32, second: u32) -> Coordinate {
        match self {
            CoordinateOrder::RowCol => Coordinate::new(first, second),
            CoordinateOrder::ColRow => Coordinate::new(second, first),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionFact {
    pub agent_id: AgentId,
    pub coordinate: Coordinate,
    /// Carried through from the solver, never interpreted.
    pub heading: String,
    pub timestep: Timestep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFact {
    pub agent_id: AgentId,
    pub action: String,
    pub timestep: Timestep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    Position(PositionFact),
    Action(ActionFact),
}

/// Facts extracted from one answer set, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facts {
    pub positions: Vec<PositionFact>,
    pub actions: Vec<ActionFact>,
    /// Atoms that looked like a recognised fact but carried malformed fields.
    pub dropped: usize,
}

impl Facts {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.actions.is_empty()
    }

    pub fn push(&mut self, fact: Fact) {
        match fact {
            Fact::Position(p) => self.positions.push(p),
            Fact::Action(a) => self.actions.push(a),
        }
    }
}
