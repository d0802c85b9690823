use super::facts::{AgentId, Coordinate, Facts, Timestep};
use super::types::{TrajectorySet, Waypoint};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Full outer join of position and action facts on `(agent, timestep)`.
///
/// The solver may emit the same fact kind twice for one key; the last one
/// encountered wins. That outcome depends on solver output order and is not
/// corrected here.
pub fn build_trajectories(facts: Facts) -> TrajectorySet {
    let mut positions: BTreeMap<(AgentId, Timestep), Coordinate> = BTreeMap::new();
    for fact in facts.positions {
        let key = (fact.agent_id, fact.timestep);
        if positions.insert(key, fact.coordinate).is_some() {
            debug!(agent = key.0, timestep = key.1, "duplicate position fact, keeping last");
        }
    }

    let mut actions: BTreeMap<(AgentId, Timestep), String> = BTreeMap::new();
    for fact in facts.actions {
        let key = (fact.agent_id, fact.timestep);
        if actions.insert(key, fact.action).is_some() {
            debug!(agent = key.0, timestep = key.1, "duplicate action fact, keeping last");
        }
    }

    let keys: BTreeSet<(AgentId, Timestep)> =
        positions.keys().chain(actions.keys()).copied().collect();

    let joined = keys
        .into_iter()
        .map(|key| {
            let waypoint = Waypoint::new(key.1, positions.remove(&key), actions.remove(&key));
            (key, waypoint)
        })
        .collect();

    TrajectorySet::from_keyed(joined)
}
