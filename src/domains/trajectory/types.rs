use super::facts::{AgentId, Coordinate, Timestep};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What is known about one agent at one timestep. Either half may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub timestep: Timestep,
    pub position: Option<Coordinate>,
    pub action: Option<String>,
}

impl Waypoint {
    pub fn new(timestep: Timestep, position: Option<Coordinate>, action: Option<String>) -> Self {
        Self {
            timestep,
            position,
            action,
        }
    }
}

/// Waypoints of one agent, ascending by timestep. Gaps are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    pub agent_id: AgentId,
    pub waypoints: Vec<Waypoint>,
}

impl Trajectory {
    pub fn positioned(&self) -> impl Iterator<Item = (&Waypoint, Coordinate)> {
        self.waypoints
            .iter()
            .filter_map(|w| w.position.map(|p| (w, p)))
    }
}

/// All trajectories of one answer, iterated in ascending agent id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectorySet {
    agents: BTreeMap<AgentId, Trajectory>,
}

impl TrajectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group keyed waypoints into per-agent trajectories. The map's key order
    /// already sorts agents and timesteps.
    pub fn from_keyed(keyed: BTreeMap<(AgentId, Timestep), Waypoint>) -> Self {
        let mut agents: BTreeMap<AgentId, Trajectory> = BTreeMap::new();
        for ((agent_id, _), waypoint) in keyed {
            agents
                .entry(agent_id)
                .or_insert_with(|| Trajectory {
                    agent_id,
                    waypoints: Vec::new(),
                })
                .waypoints
                .push(waypoint);
        }
        Self { agents }
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn get(&self, agent_id: AgentId) -> Option<&Trajectory> {
        self.agents.get(&agent_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.agents.values()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn waypoint_count(&self) -> usize {
        self.agents.values().map(|t| t.waypoints.len()).sum()
    }

    /// Copy with every action cleared, for comparisons against sources that
    /// do not persist actions.
    pub fn without_actions(&self) -> Self {
        let mut copy = self.clone();
        for trajectory in copy.agents.values_mut() {
            for waypoint in &mut trajectory.waypoints {
                waypoint.action = None;
            }
        }
        copy
    }
}
