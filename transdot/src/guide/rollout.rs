use std::collections::HashSet;

use log::debug;
use ordered_float::OrderedFloat;

use super::{system_scores, ActionDecider};
use crate::error::TransdotError;
use crate::features::FeatureExtractor;
use crate::graph::DependencyGraph;
use crate::learner::Learner;
use crate::oracle::Oracle;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

/// Loss of a missing gold edge.
const MISSING_EDGE_LOSS: f32 = 0.2;

/// Loss of a predicted edge that is not in the gold tree.
const SPURIOUS_EDGE_LOSS: f32 = 1.0;

/// Structural loss of a predicted graph.
///
/// Every gold edge that is not predicted costs 0.2, every predicted
/// edge that is not in the gold tree costs 1.0.
pub fn score_deps(predicted: &DependencyGraph, gold: &HashSet<(usize, usize)>) -> f32 {
    let predicted = predicted.edge_set();

    let missing = gold.difference(&predicted).count();
    let spurious = predicted.difference(gold).count();

    missing as f32 * MISSING_EDGE_LOSS + spurious as f32 * SPURIOUS_EDGE_LOSS
}

/// Cost-sensitive trainer.
///
/// When the model disagrees with the oracle, the trainer updates the
/// model towards the oracle action only when this helps: the
/// configuration is greedily parsed to the end with the current model
/// and with the updated model. The update is kept when it results in a
/// strictly lower structural loss (see [`score_deps`]), otherwise it is
/// reverted exactly.
///
/// Rollouts are done on copies of the configuration, the configuration
/// that is being parsed is never modified. The oracle action is always
/// returned.
pub struct RolloutTrainer<'a, O, F, L> {
    oracle: O,
    features: F,
    learner: &'a mut L,
    gold_edges: HashSet<(usize, usize)>,
}

impl<'a, O, F, L> RolloutTrainer<'a, O, F, L>
where
    O: Oracle,
    F: FeatureExtractor,
    L: Learner,
{
    pub fn new(oracle: O, features: F, learner: &'a mut L) -> Self {
        RolloutTrainer {
            oracle,
            features,
            learner,
            gold_edges: HashSet::new(),
        }
    }

    /// The highest-scoring legal action.
    fn best_legal_action(&self, config: &Configuration) -> Option<Action> {
        let features = self.features.extract(config);
        let scores = self.learner.scores(&features);
        best_legal(config, &scores)
    }

    /// Greedily parse a copy of `config` to the end and compute the loss.
    fn rollout_loss(&self, config: &Configuration) -> f32 {
        let mut config = config.clone();

        while !config.is_terminal() {
            let action = match self.best_legal_action(&config) {
                Some(action) => action,
                None => break,
            };

            // The action was checked for legality.
            if config.apply(action).is_err() {
                break;
            }
        }

        score_deps(config.graph(), &self.gold_edges)
    }
}

impl<'a, O, F, L> ActionDecider for RolloutTrainer<'a, O, F, L>
where
    O: Oracle,
    F: FeatureExtractor,
    L: Learner,
{
    fn begin_sentence(&mut self, sentence: &Sentence) {
        self.oracle.begin_sentence(sentence);
        self.gold_edges = sentence.gold_edges();
    }

    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError> {
        let features = self.features.extract(config);
        let gold = self.oracle.next_action(config)?;

        let predicted = best_legal(config, &self.learner.scores(&features));
        self.learner.tick();

        let predicted = match predicted {
            Some(predicted) if predicted != gold => predicted,
            _ => return Ok(vec![gold]),
        };

        let noupdate_loss = self.rollout_loss(config);

        self.learner.add(&features, gold.index(), 1.);
        self.learner.add(&features, predicted.index(), -1.);

        let update_loss = self.rollout_loss(config);

        if update_loss < noupdate_loss {
            debug!(
                "Keeping update {} -> {}, loss: {} -> {}",
                predicted, gold, noupdate_loss, update_loss
            );
        } else {
            debug!(
                "Reverting update {} -> {}, loss: {} -> {}",
                predicted, gold, noupdate_loss, update_loss
            );
            self.learner.add(&features, gold.index(), -1.);
            self.learner.add(&features, predicted.index(), 1.);
        }

        Ok(vec![gold])
    }

    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError> {
        let features = self.features.extract(config);
        system_scores(config, &self.learner.scores(&features))
    }
}

/// The highest-scoring legal action, ties go to the highest index.
fn best_legal(config: &Configuration, scores: &[f32]) -> Option<Action> {
    config
        .valid_actions()
        .into_iter()
        .filter(|action| action.index() < scores.len())
        .max_by_key(|action| OrderedFloat(scores[action.index()]))
}
