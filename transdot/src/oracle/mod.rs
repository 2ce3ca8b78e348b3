//! Static oracles.
//!
//! An oracle computes the action that leads to the gold tree of a
//! sentence. Oracles keep a per-sentence cache of the gold dependents of
//! every token and of the tokens that were attached to their head. The
//! cache must be rebuilt with [`Oracle::begin_sentence`] before an oracle
//! is used for a new sentence.

use crate::error::TransdotError;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration, TransitionSystem};

mod arc_eager;
pub use arc_eager::ArcEagerOracle;

mod arc_standard;
pub use arc_standard::ArcStandardOracle;

/// Oracle for a transition system.
pub trait Oracle {
    /// Rebuild the per-sentence cache for `sentence`.
    fn begin_sentence(&mut self, sentence: &Sentence);

    /// Get the gold action for a configuration.
    ///
    /// The configuration must be reachable from the initial configuration
    /// of the sentence passed to the last `begin_sentence` call, using
    /// only actions returned by this oracle.
    fn next_action(&mut self, config: &Configuration) -> Result<Action, TransdotError>;
}

/// Static oracle for either transition system.
#[derive(Clone, Debug)]
pub enum StaticOracle {
    ArcStandard(ArcStandardOracle),
    ArcEager(ArcEagerOracle),
}

impl StaticOracle {
    /// Construct the oracle for a transition system.
    ///
    /// `pop_when_can` is only used by the arc-eager oracle.
    pub fn new(system: TransitionSystem, pop_when_can: bool) -> Self {
        match system {
            TransitionSystem::ArcStandard => StaticOracle::ArcStandard(ArcStandardOracle::new()),
            TransitionSystem::ArcEager => {
                StaticOracle::ArcEager(ArcEagerOracle::new(pop_when_can))
            }
        }
    }
}

impl Oracle for StaticOracle {
    fn begin_sentence(&mut self, sentence: &Sentence) {
        match self {
            StaticOracle::ArcStandard(oracle) => oracle.begin_sentence(sentence),
            StaticOracle::ArcEager(oracle) => oracle.begin_sentence(sentence),
        }
    }

    fn next_action(&mut self, config: &Configuration) -> Result<Action, TransdotError> {
        match self {
            StaticOracle::ArcStandard(oracle) => oracle.next_action(config),
            StaticOracle::ArcEager(oracle) => oracle.next_action(config),
        }
    }
}

/// Gold dependents of each token and the tokens that were connected.
#[derive(Clone, Debug, Default)]
pub(crate) struct GoldDependents {
    dependents: Vec<Vec<usize>>,
    connected: Vec<bool>,
}

impl GoldDependents {
    pub fn new(sentence: &Sentence) -> Self {
        let mut dependents = vec![Vec::new(); sentence.len()];
        for token in sentence.tokens() {
            if let Some(head) = token.head() {
                if head < dependents.len() {
                    dependents[head].push(token.id());
                }
            }
        }

        GoldDependents {
            dependents,
            connected: vec![false; sentence.len()],
        }
    }

    /// Check whether all gold dependents of `token` were connected.
    pub fn all_connected(&self, token: usize) -> bool {
        self.dependents[token]
            .iter()
            .all(|&dependent| self.connected[dependent])
    }

    /// Mark `token` as connected to its head.
    pub fn connect(&mut self, token: usize) {
        self.connected[token] = true;
    }

    /// Gold dependents of `token`.
    pub fn dependents(&self, token: usize) -> &[usize] {
        &self.dependents[token]
    }

    /// Fail when the cache was not built for the sentence of `config`.
    pub fn check_sentence(&self, config: &Configuration) -> Result<(), TransdotError> {
        if self.dependents.len() != config.sentence().len() {
            return Err(TransdotError::IllegalConfigurationError(
                "Oracle was not prepared for this sentence, call begin_sentence first"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Oracle, StaticOracle};
    use crate::error::TransdotError;
    use crate::graph::DependencyGraph;
    use crate::sentence::tests::{read_sentences, sentence_with_heads, PROJECTIVE_DATA};
    use crate::sentence::Sentence;
    use crate::system::{Action, Configuration, TransitionSystem};

    /// Parse a sentence with an oracle, checking that each action is valid.
    pub(crate) fn oracle_parse(
        oracle: &mut impl Oracle,
        system: TransitionSystem,
        sentence: &Sentence,
    ) -> (Vec<Action>, DependencyGraph) {
        oracle.begin_sentence(sentence);
        let mut config = Configuration::new(system, sentence);
        while !config.is_terminal() {
            let action = oracle.next_action(&config).unwrap();
            assert!(
                config.valid_actions().contains(&action),
                "Oracle proposed illegal action {} (stack: {:?}, cursor: {})",
                action,
                config.stack(),
                config.cursor()
            );
            config.apply(action).unwrap();
        }

        (config.history().to_owned(), config.into_graph())
    }

    #[test]
    fn oracles_reconstruct_projective_trees() {
        for system in &[TransitionSystem::ArcStandard, TransitionSystem::ArcEager] {
            for &pop_when_can in &[true, false] {
                let mut oracle = StaticOracle::new(*system, pop_when_can);
                for (_, sentence) in read_sentences(PROJECTIVE_DATA) {
                    let (_, graph) = oracle_parse(&mut oracle, *system, &sentence);
                    assert_eq!(graph.edge_set(), sentence.gold_edges());
                }
            }
        }
    }

    #[test]
    fn oracle_cache_is_rebuilt_per_sentence() {
        let mut oracle = StaticOracle::new(TransitionSystem::ArcStandard, true);

        // Parse two sentences that have the same length, but different trees.
        let first = sentence_with_heads(&[0, 1, 2]);
        let second = sentence_with_heads(&[2, 0, 2]);

        let (_, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcStandard, &first);
        assert_eq!(graph.edge_set(), first.gold_edges());
        let (_, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcStandard, &second);
        assert_eq!(graph.edge_set(), second.gold_edges());
        let (_, graph) = oracle_parse(&mut oracle, TransitionSystem::ArcStandard, &first);
        assert_eq!(graph.edge_set(), first.gold_edges());
    }

    #[test]
    fn oracle_requires_begin_sentence() {
        let mut oracle = StaticOracle::new(TransitionSystem::ArcEager, true);
        let sentence = sentence_with_heads(&[0, 1]);
        let config = Configuration::new(TransitionSystem::ArcEager, &sentence);

        assert!(matches!(
            oracle.next_action(&config),
            Err(TransdotError::IllegalConfigurationError(_))
        ));
    }
}
