use log::debug;

use super::{GoldDependents, Oracle};
use crate::error::TransdotError;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

/// Static oracle for the arc-eager system.
///
/// When several actions lead to the gold tree, the preference order is
/// `ReduceLeft`, `ReduceRight`, `Pop`, `Shift`. See: *An efficient
/// algorithm for projective dependency parsing*, Nivre, 2003.
#[derive(Clone, Debug)]
pub struct ArcEagerOracle {
    gold: GoldDependents,
    pop_when_can: bool,
}

impl ArcEagerOracle {
    /// Construct an arc-eager oracle.
    ///
    /// If `pop_when_can` is `true`, a token is popped as soon as it is
    /// attached and has collected all its dependents. Otherwise, the
    /// token is only popped when a token further up in the tree still
    /// needs to be attached to the right.
    pub fn new(pop_when_can: bool) -> Self {
        ArcEagerOracle {
            gold: GoldDependents::default(),
            pop_when_can,
        }
    }

    /// Check whether a token must be popped before the tree can be completed.
    ///
    /// Walks up the heads that were already assigned, starting at `top`.
    /// Popping is required when one of the ancestors has a gold dependent
    /// to the right of `top` or when the gold head of an ancestor is to
    /// the right of `top`.
    fn must_pop(&self, config: &Configuration, top: usize) -> bool {
        let sentence = config.sentence();
        let graph = config.graph();

        let mut ancestor = graph.head(top).map(|edge| edge.head());
        while let Some(token) = ancestor {
            if self
                .gold
                .dependents(token)
                .iter()
                .any(|&dependent| dependent > top)
            {
                return true;
            }

            if sentence[token].head().map(|head| head > top).unwrap_or(false) {
                return true;
            }

            ancestor = graph.head(token).map(|edge| edge.head());
        }

        false
    }
}

impl Oracle for ArcEagerOracle {
    fn begin_sentence(&mut self, sentence: &Sentence) {
        self.gold = GoldDependents::new(sentence);
    }

    fn next_action(&mut self, config: &Configuration) -> Result<Action, TransdotError> {
        self.gold.check_sentence(config)?;

        let top = match config.stack_at(0) {
            Some(top) => top,
            None => return Ok(Action::Shift),
        };

        let sentence = config.sentence();

        if let Some(next) = config.next_token() {
            if sentence[top].head() == Some(next) {
                self.gold.connect(top);
                return Ok(Action::ReduceLeft);
            }

            if sentence[next].head() == Some(top) {
                if config.graph().has_head(next) {
                    debug!("Token {} already has a head, not attaching to {}", next, top);
                } else {
                    self.gold.connect(next);
                    return Ok(Action::ReduceRight);
                }
            }
        }

        if config.stack().len() > 1
            && self.gold.all_connected(top)
            && config.graph().has_head(top)
            && (self.pop_when_can || self.must_pop(config, top))
        {
            return Ok(Action::Pop);
        }

        if !config.input_exhausted() {
            return Ok(Action::Shift);
        }

        Err(TransdotError::OracleExhausted {
            stack: config.stack().to_owned(),
            cursor: config.cursor(),
        })
    }
}

#[cfg(test)]
mod tests {
    use maplit::hashset;

    use super::ArcEagerOracle;
    use crate::oracle::tests::oracle_parse;
    use crate::oracle::Oracle;
    use crate::sentence::tests::{read_sentences, sentence_with_heads, NON_PROJECTIVE_DATA};
    use crate::system::Action::*;
    use crate::system::{Configuration, TransitionSystem};

    #[test]
    fn eager_pop_before_shift() {
        // Token 2 is attached to 1 and has no dependents. With eager
        // popping it is removed before token 3 is shifted.
        let sentence = sentence_with_heads(&[0, 1, 0]);
        let mut oracle = ArcEagerOracle::new(true);
        oracle.begin_sentence(&sentence);

        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        for action in &[Shift, ReduceRight, ReduceRight] {
            assert_eq!(oracle.next_action(&config).unwrap(), *action);
            config.apply(*action).unwrap();
        }

        assert_eq!(config.stack(), &[0, 1, 2]);
        assert_eq!(oracle.next_action(&config).unwrap(), Pop);
    }

    #[test]
    fn full_eager_derivation() {
        let sentence = sentence_with_heads(&[0, 1, 0]);
        let mut oracle = ArcEagerOracle::new(true);

        let (actions, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcEager, &sentence);

        assert_eq!(actions, vec![Shift, ReduceRight, ReduceRight, Pop, Pop, ReduceRight]);
        assert_eq!(graph.edge_set(), hashset! {(0, 1), (1, 2), (0, 3)});
    }

    #[test]
    fn pop_policies_agree_without_pending_attachments() {
        // 1 <- 2 -> 3, with 2 attached to the root. No token ever needs
        // to be popped, so both policies give the same derivation.
        let sentence = sentence_with_heads(&[2, 0, 2]);

        let mut eager = ArcEagerOracle::new(true);
        let (eager_actions, eager_graph) =
            oracle_parse(&mut eager, TransitionSystem::ArcEager, &sentence);

        let mut lazy = ArcEagerOracle::new(false);
        let (lazy_actions, lazy_graph) =
            oracle_parse(&mut lazy, TransitionSystem::ArcEager, &sentence);

        assert_eq!(eager_graph.edge_set(), sentence.gold_edges());
        assert_eq!(lazy_graph, eager_graph);
        assert_eq!(
            lazy_actions,
            vec![Shift, Shift, ReduceLeft, ReduceRight, ReduceRight]
        );
        assert_eq!(eager_actions, lazy_actions);
    }

    #[test]
    fn lazy_pop_pops_when_needed() {
        // Token 3 must be attached to the root, so 1 and 2 must be popped.
        let sentence = sentence_with_heads(&[0, 1, 0]);

        let mut lazy = ArcEagerOracle::new(false);
        let (actions, graph) = oracle_parse(&mut lazy, TransitionSystem::ArcEager, &sentence);

        assert_eq!(graph.edge_set(), sentence.gold_edges());
        assert_eq!(actions, vec![Shift, ReduceRight, ReduceRight, Pop, Pop, ReduceRight]);
    }

    #[test]
    fn non_projective_sentences_only_get_gold_edges() {
        for &pop_when_can in &[true, false] {
            let mut oracle = ArcEagerOracle::new(pop_when_can);
            for (_, sentence) in read_sentences(NON_PROJECTIVE_DATA) {
                let (_, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcEager, &sentence);
                assert!(graph.edge_set().is_subset(&sentence.gold_edges()));
            }
        }
    }
}
