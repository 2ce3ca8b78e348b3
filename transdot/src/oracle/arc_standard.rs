use log::debug;

use super::{GoldDependents, Oracle};
use crate::error::TransdotError;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

/// Static oracle for the arc-standard system.
///
/// The two topmost stack tokens are reduced when they are connected in
/// the gold tree and the dependent has collected all of its own
/// dependents. Left reductions take precedence over right reductions.
#[derive(Clone, Debug, Default)]
pub struct ArcStandardOracle {
    gold: GoldDependents,
}

impl ArcStandardOracle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Oracle for ArcStandardOracle {
    fn begin_sentence(&mut self, sentence: &Sentence) {
        self.gold = GoldDependents::new(sentence);
    }

    fn next_action(&mut self, config: &Configuration) -> Result<Action, TransdotError> {
        self.gold.check_sentence(config)?;

        let (top, second) = match (config.stack_at(0), config.stack_at(1)) {
            (Some(top), Some(second)) => (top, second),
            _ => return Ok(Action::Shift),
        };

        let sentence = config.sentence();

        if sentence[second].head() == Some(top) && self.gold.all_connected(second) {
            self.gold.connect(second);
            return Ok(Action::ReduceLeft);
        }

        if sentence[top].head() == Some(second) && self.gold.all_connected(top) {
            self.gold.connect(top);
            return Ok(Action::ReduceRight);
        }

        if config.input_exhausted() {
            debug!(
                "No reduction possible on exhausted input, stack: {:?}",
                config.stack()
            );
        }

        Ok(Action::Shift)
    }
}

#[cfg(test)]
mod tests {
    use maplit::hashset;

    use super::ArcStandardOracle;
    use crate::oracle::tests::oracle_parse;
    use crate::sentence::tests::sentence_with_heads;
    use crate::system::Action::*;
    use crate::system::TransitionSystem;

    #[test]
    fn right_branching_chain() {
        let sentence = sentence_with_heads(&[0, 1, 2]);
        let mut oracle = ArcStandardOracle::new();

        let (actions, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcStandard, &sentence);

        assert_eq!(
            actions,
            vec![
                Shift,
                Shift,
                Shift,
                Shift,
                ReduceRight,
                ReduceRight,
                ReduceRight
            ]
        );
        assert_eq!(graph.edge_set(), hashset! {(0, 1), (1, 2), (2, 3)});
    }

    #[test]
    fn left_branching_chain() {
        let sentence = sentence_with_heads(&[2, 3, 0]);
        let mut oracle = ArcStandardOracle::new();

        let (actions, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcStandard, &sentence);

        assert_eq!(
            actions,
            vec![
                Shift,
                Shift,
                Shift,
                ReduceLeft,
                Shift,
                ReduceLeft,
                ReduceRight
            ]
        );
        assert_eq!(graph.edge_set(), hashset! {(2, 1), (3, 2), (0, 3)});
    }

    #[test]
    fn head_waits_for_its_dependents() {
        // Token 2 has a right dependent, so it cannot be attached to
        // token 1 before token 3 is attached.
        let sentence = sentence_with_heads(&[0, 1, 2]);
        let mut oracle = ArcStandardOracle::new();
        let (actions, _) = oracle_parse(&mut oracle, TransitionSystem::ArcStandard, &sentence);

        let first_reduce = actions.iter().position(|&a| a != Shift).unwrap();
        assert_eq!(first_reduce, 4);
    }
}
