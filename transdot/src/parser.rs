//! Greedy transition-based parser.

use crate::error::TransdotError;
use crate::graph::DependencyGraph;
use crate::guide::ActionDecider;
use crate::sentence::Sentence;
use crate::system::{Configuration, TransitionSystem};

/// Greedy parser.
///
/// The parser starts from the initial configuration of a sentence and
/// applies the first legal action proposed by the decider, until a
/// terminal configuration is reached.
pub struct Parser<D> {
    system: TransitionSystem,
    decider: D,
}

impl<D> Parser<D>
where
    D: ActionDecider,
{
    pub fn new(system: TransitionSystem, decider: D) -> Self {
        Parser { system, decider }
    }

    pub fn decider(&self) -> &D {
        &self.decider
    }

    pub fn decider_mut(&mut self) -> &mut D {
        &mut self.decider
    }

    pub fn into_decider(self) -> D {
        self.decider
    }

    /// Parse a sentence, returning the dependency graph.
    pub fn parse(&mut self, sentence: &Sentence) -> Result<DependencyGraph, TransdotError> {
        self.parse_configuration(sentence)
            .map(Configuration::into_graph)
    }

    /// Parse a sentence, returning the terminal configuration.
    ///
    /// Fails when the decider fails or when none of the actions that the
    /// decider proposes is legal.
    pub fn parse_configuration<'a>(
        &mut self,
        sentence: &'a Sentence,
    ) -> Result<Configuration<'a>, TransdotError> {
        self.decider.begin_sentence(sentence);

        let mut config = Configuration::new(self.system, sentence);
        while !config.is_terminal() {
            let actions = self.decider.next_actions(&config)?;

            let action = actions
                .iter()
                .copied()
                .find(|&action| config.is_legal(action))
                .ok_or_else(|| TransdotError::NoLegalAction {
                    actions: actions.clone(),
                })?;

            config.apply(action)?;
        }

        Ok(config)
    }

    pub fn system(&self) -> TransitionSystem {
        self.system
    }
}
