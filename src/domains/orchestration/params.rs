use serde::{Deserialize, Serialize};

/// Generator parameters. `None` leaves the value already in the generator's
/// side file untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentParams {
    /// Number of columns.
    pub width: Option<u32>,
    /// Number of rows.
    pub height: Option<u32>,
    pub number_of_agents: Option<u32>,
    pub max_num_cities: Option<u32>,
    pub seed: Option<u64>,
    pub grid_mode: Option<bool>,
    pub max_rails_between_cities: Option<u32>,
    pub max_rail_pairs_in_city: Option<u32>,
    pub remove_agents_at_target: Option<bool>,
    /// Written verbatim, e.g. `{1:1}`.
    pub speed_ratio_map: Option<String>,
    /// Written verbatim, e.g. `3/10`.
    pub malfunction_rate: Option<String>,
    pub min_duration: Option<u32>,
    pub max_duration: Option<u32>,
}

impl EnvironmentParams {
    /// `key=value` overrides for every field that is set, in the generator's
    /// own value syntax.
    pub fn to_overrides(&self) -> Vec<(String, String)> {
        fn push<T: ToString>(out: &mut Vec<(String, String)>, key: &str, value: &Option<T>) {
            if let Some(v) = value {
                out.push((key.to_string(), v.to_string()));
            }
        }
        fn push_bool(out: &mut Vec<(String, String)>, key: &str, value: Option<bool>) {
            if let Some(v) = value {
                let text = if v { "True" } else { "False" };
                out.push((key.to_string(), text.to_string()));
            }
        }

        let mut out = Vec::new();
        push(&mut out, "width", &self.width);
        push(&mut out, "height", &self.height);
        push(&mut out, "number_of_agents", &self.number_of_agents);
        push(&mut out, "max_num_cities", &self.max_num_cities);
        push(&mut out, "seed", &self.seed);
        push_bool(&mut out, "grid_mode", self.grid_mode);
        push(&mut out, "max_rails_between_cities", &self.max_rails_between_cities);
        push(&mut out, "max_rail_pairs_in_city", &self.max_rail_pairs_in_city);
        push_bool(&mut out, "remove_agents_at_target", self.remove_agents_at_target);
        push(&mut out, "speed_ratio_map", &self.speed_ratio_map);
        push(&mut out, "malfunction_rate", &self.malfunction_rate);
        push(&mut out, "min_duration", &self.min_duration);
        push(&mut out, "max_duration", &self.max_duration);
        out
    }
}
