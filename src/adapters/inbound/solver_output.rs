use crate::domains::orchestration::{AnswerSet, SolveOutcome};

/// Parse the text protocol the solver prints on stdout.
///
/// ```text
/// Solving...
/// Answer: 1
/// position(0,(1,2),n,0) action(train(0),move_forward,0)
/// SATISFIABLE
/// ```
///
/// The line after each `Answer: N` header holds that model's atoms (it is
/// empty for an empty model). The one-line `Answer Set N: <atoms>` form is
/// accepted too. `UNSATISFIABLE` wins over everything else.
pub fn parse_solver_output(stdout: &str) -> SolveOutcome {
    let mut answers = Vec::new();
    let mut unsatisfiable = false;
    let mut lines = stdout.lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if let Some((_, atoms)) = line
            .strip_prefix("Answer Set ")
            .and_then(|rest| rest.split_once(':'))
        {
            answers.push(AnswerSet {
                index: answers.len() + 1,
                atoms: atoms.trim().to_string(),
            });
        } else if line.starts_with("Answer:") {
            let atoms = lines.next().unwrap_or_default().trim().to_string();
            answers.push(AnswerSet {
                index: answers.len() + 1,
                atoms,
            });
        } else if line == "UNSATISFIABLE" {
            unsatisfiable = true;
        }
    }

    if unsatisfiable {
        SolveOutcome::Unsatisfiable
    } else if answers.is_empty() {
        SolveOutcome::Unknown
    } else {
        SolveOutcome::Satisfiable(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_model_in_order() {
        let stdout = "clingo version 5.6.2\nReading from trans.lp ...\nSolving...\n\
                      Answer: 1\nposition(0,(1,2),n,0)\n\
                      Answer: 2\nposition(0,(1,3),n,0)\nOptimization: 4\n\
                      SATISFIABLE\n\nModels       : 2+\n";
        let outcome = parse_solver_output(stdout);
        let answers = outcome.answers();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].index, 1);
        assert_eq!(answers[1].atoms, "position(0,(1,3),n,0)");
    }

    #[test]
    fn reads_single_line_answer_sets() {
        let stdout = "Answer Set 1: position(0,(1,2),n,0) action(train(0),wait,0)\n\
                      Answer Set 2: position(0,(1,3),n,0)\n";
        let outcome = parse_solver_output(stdout);
        assert_eq!(
            outcome,
            SolveOutcome::Satisfiable(vec![
                AnswerSet {
                    index: 1,
                    atoms: "position(0,(1,2),n,0) action(train(0),wait,0)".to_string()
                },
                AnswerSet {
                    index: 2,
                    atoms: "position(0,(1,3),n,0)".to_string()
                },
            ])
        );
    }

    #[test]
    fn empty_model_is_still_an_answer() {
        let outcome = parse_solver_output("Solving...\nAnswer: 1\n\nSATISFIABLE\n");
        assert_eq!(
            outcome,
            SolveOutcome::Satisfiable(vec![AnswerSet {
                index: 1,
                atoms: String::new()
            }])
        );
    }

    #[test]
    fn recognises_unsatisfiable_and_undecided_runs() {
        assert_eq!(
            parse_solver_output("Solving...\nUNSATISFIABLE\n"),
            SolveOutcome::Unsatisfiable
        );
        assert_eq!(parse_solver_output("Solving...\nUNKNOWN\n"), SolveOutcome::Unknown);
    }
}
