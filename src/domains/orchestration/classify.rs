use super::process::ProcessOutput;
use serde::{Deserialize, Serialize};

/// Typed reason a generator run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorFailure {
    /// Integer overflow in the generator's random-seed arithmetic. Transient:
    /// a re-run draws a different seed.
    SeedOverflow,
    Other,
}

impl GeneratorFailure {
    pub fn is_transient(self) -> bool {
        matches!(self, GeneratorFailure::SeedOverflow)
    }
}

/// Maps a failed generator run to a [`GeneratorFailure`] once, at the
/// process boundary.
///
/// Dedicated exit codes are checked first. The stderr signature is a
/// fallback for generators that only report the overflow as text: every
/// fragment must be present for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureClassifier {
    pub transient_exit_codes: Vec<i32>,
    pub transient_signature: Vec<String>,
}

impl Default for FailureClassifier {
    fn default() -> Self {
        Self {
            transient_exit_codes: Vec::new(),
            transient_signature: vec![
                "OverflowError: Python integer".to_string(),
                "out of bounds for uint16".to_string(),
            ],
        }
    }
}

impl FailureClassifier {
    pub fn classify(&self, output: &ProcessOutput) -> GeneratorFailure {
        if let Some(code) = output.code {
            if self.transient_exit_codes.contains(&code) {
                return GeneratorFailure::SeedOverflow;
            }
        }
        if !self.transient_signature.is_empty()
            && self
                .transient_signature
                .iter()
                .all(|fragment| output.stderr.contains(fragment.as_str()))
        {
            return GeneratorFailure::SeedOverflow;
        }
        GeneratorFailure::Other
    }
}
