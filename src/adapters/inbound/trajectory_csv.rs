use crate::common::{ImportError, ImportResult};
use crate::domains::trajectory::term::parse_term;
use crate::domains::trajectory::{
    AgentId, Coordinate, CoordinateOrder, Timestep, TrajectorySet, Waypoint,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TrajectoryRow {
    agent: AgentId,
    timestep: Timestep,
    #[serde(default)]
    position: Option<String>,
    #[serde(default, alias = "given_command")]
    action: Option<String>,
}

/// Reads a persisted `agent;timestep;position[;action]` table back into a
/// [`TrajectorySet`].
///
/// `position` may be `(3, 4)` or carry typed-integer wrappers such as
/// `(np.int64(3), np.int64(4))`; both become plain integers. Empty, `nan`
/// and `None` cells mean no position. Other columns are ignored.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryCsvImporter {
    delimiter: u8,
    order: CoordinateOrder,
}

impl Default for TrajectoryCsvImporter {
    fn default() -> Self {
        Self {
            delimiter: b';',
            order: CoordinateOrder::RowCol,
        }
    }
}

impl TrajectoryCsvImporter {
    pub fn new(delimiter: u8, order: CoordinateOrder) -> Self {
        Self { delimiter, order }
    }

    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> ImportResult<TrajectorySet> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| ImportError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let set = self.collect(reader)?;
        debug!(path = %path.display(), agents = set.len(), "imported trajectory table");
        Ok(set)
    }

    pub fn import_reader<R: Read>(&self, input: R) -> ImportResult<TrajectorySet> {
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        self.collect(reader)
    }

    fn collect<R: Read>(&self, mut reader: csv::Reader<R>) -> ImportResult<TrajectorySet> {
        let mut keyed: BTreeMap<(AgentId, Timestep), Waypoint> = BTreeMap::new();
        for (index, record) in reader.deserialize::<TrajectoryRow>().enumerate() {
            let row = index + 1;
            let record = record.map_err(|source| ImportError::Row { row, source })?;
            let position = match record.position.as_deref().filter(|p| !is_missing(p)) {
                Some(text) => Some(self.parse_position(row, text)?),
                None => None,
            };
            let action = record.action.filter(|a| !is_missing(a));
            keyed.insert(
                (record.agent, record.timestep),
                Waypoint::new(record.timestep, position, action),
            );
        }
        Ok(TrajectorySet::from_keyed(keyed))
    }

    fn parse_position(&self, row: usize, text: &str) -> ImportResult<Coordinate> {
        let malformed = || ImportError::Position {
            row,
            text: text.to_string(),
        };
        let term = parse_term(text).map_err(|_| malformed())?;
        match term.tuple() {
            Some([first, second]) => {
                let first = first.unwrap_u32().ok_or_else(malformed)?;
                let second = second.unwrap_u32().ok_or_else(malformed)?;
                Ok(self.order.coordinate(first, second))
            }
            _ => Err(malformed()),
        }
    }
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell == "None"
}
