use super::facts::{ActionFact, CoordinateOrder, Fact, Facts, PositionFact};
use super::term::{parse_term, split_atoms, Term};
use tracing::debug;

const POSITION: &str = "position";
const ACTION: &str = "action";

/// Outcome of looking at a single atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomOutcome {
    Recognized(Fact),
    /// Matches a known predicate but a field could not be read.
    Malformed,
    /// Not part of the visualised vocabulary.
    Ignored,
}

/// Extracts position and action facts from a raw answer-set string.
///
/// Recognised shapes:
/// - `position(Agent, (A, B), Heading, T)`
/// - `action(train(Agent), Name, T)` (a bare `Agent` is accepted too)
///
/// `(A, B)` is mapped to a coordinate according to the configured
/// [`CoordinateOrder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FactParser {
    order: CoordinateOrder,
}

impl FactParser {
    pub fn new(order: CoordinateOrder) -> Self {
        Self { order }
    }

    pub fn parse(&self, answer: &str) -> Facts {
        let mut facts = Facts::default();
        for atom in split_atoms(answer) {
            match self.parse_atom(atom) {
                AtomOutcome::Recognized(fact) => facts.push(fact),
                AtomOutcome::Malformed => {
                    debug!(atom, "dropping malformed atom");
                    facts.dropped += 1;
                }
                AtomOutcome::Ignored => {}
            }
        }
        facts
    }

    pub fn parse_atom(&self, atom: &str) -> AtomOutcome {
        let term = match parse_term(atom) {
            Ok(term) => term,
            Err(err) => {
                let head = atom.split('(').next().unwrap_or_default().trim();
                if head == POSITION || head == ACTION {
                    debug!(atom, error = %err, "atom failed to tokenize");
                    return AtomOutcome::Malformed;
                }
                return AtomOutcome::Ignored;
            }
        };

        match term.function() {
            Some((POSITION, args)) if args.len() == 4 => self
                .position(args)
                .map(|p| AtomOutcome::Recognized(Fact::Position(p)))
                .unwrap_or(AtomOutcome::Malformed),
            Some((ACTION, args)) if args.len() == 3 => action(args)
                .map(|a| AtomOutcome::Recognized(Fact::Action(a)))
                .unwrap_or(AtomOutcome::Malformed),
            _ => AtomOutcome::Ignored,
        }
    }

    fn position(&self, args: &[Term]) -> Option<PositionFact> {
        let agent_id = args[0].unwrap_u32()?;
        let pair = args[1].tuple()?;
        if pair.len() != 2 {
            return None;
        }
        let first = integer_field(&pair[0])?;
        let second = integer_field(&pair[1])?;
        let timestep = integer_field(&args[3])?;
        Some(PositionFact {
            agent_id,
            coordinate: self.order.coordinate(first, second),
            heading: args[2].to_string(),
            timestep,
        })
    }
}

/// Parse with the default `(row, col)` convention.
pub fn parse_answer(answer: &str) -> Facts {
    FactParser::default().parse(answer)
}

fn action(args: &[Term]) -> Option<ActionFact> {
    let agent_id = args[0].unwrap_u32()?;
    let action = match &args[1] {
        Term::Integer(_) => return None,
        Term::Symbol(s) | Term::Str(s) => s.clone(),
        other => other.to_string(),
    };
    let timestep = integer_field(&args[2])?;
    Some(ActionFact {
        agent_id,
        action,
        timestep,
    })
}

/// Plain non-negative integer; wrappers are not accepted inside facts.
fn integer_field(term: &Term) -> Option<u32> {
    match term {
        Term::Integer(v) => u32::try_from(*v).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::trajectory::facts::Coordinate;

    #[test]
    fn extracts_both_fact_kinds_in_encounter_order() {
        let facts = parse_answer(
            "position(0,(1,2),n,0) action(train(0),move_forward,0) position(0,(1,3),n,1)",
        );
        assert_eq!(facts.positions.len(), 2);
        assert_eq!(facts.actions.len(), 1);
        assert_eq!(facts.positions[0].coordinate, Coordinate::new(1, 2));
        assert_eq!(facts.positions[1].timestep, 1);
        assert_eq!(facts.actions[0].action, "move_forward");
        assert_eq!(facts.dropped, 0);
    }

    #[test]
    fn ignores_unrelated_vocabulary() {
        let facts = parse_answer("edge((1,2),(1,3)) cell(4,5) position(1,2) occupied");
        assert!(facts.is_empty());
        assert_eq!(facts.dropped, 0);
    }

    #[test]
    fn drops_malformed_atoms_without_failing_the_parse() {
        let facts = parse_answer(
            "position(0,(1,-2),n,0) position(x,(1,2),n,0) action(train(0),move,abc) \
             position(0,(99999999999999999999,1),n,0) position(1,(3,4),e,7)",
        );
        assert_eq!(facts.positions.len(), 1);
        assert_eq!(facts.positions[0].agent_id, 1);
        assert_eq!(facts.positions[0].heading, "e");
        assert_eq!(facts.dropped, 4);
    }

    #[test]
    fn column_first_order_swaps_the_pair() {
        let parser = FactParser::new(CoordinateOrder::ColRow);
        let facts = parser.parse("position(2,(7,3),s,4)");
        assert_eq!(facts.positions[0].coordinate, Coordinate::new(3, 7));
    }

    #[test]
    fn bare_agent_ids_are_accepted_for_actions() {
        let outcome = FactParser::default().parse_atom("action(5,wait,2)");
        assert_eq!(
            outcome,
            AtomOutcome::Recognized(Fact::Action(ActionFact {
                agent_id: 5,
                action: "wait".to_string(),
                timestep: 2
            }))
        );
    }
}
